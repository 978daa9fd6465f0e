use thiserror::Error;

use crate::pipeline::PipelineError;
use crate::query::TranslateError;

/// Failure of a repository operation.
///
/// A missing record is not an error: lookups return `Ok(None)` and deletes
/// return `Ok(false)`. Malformed identifiers fold into the same not-found
/// outcome and never surface here.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),

    #[error("query translation failed: {0}")]
    Translate(#[from] TranslateError),

    #[error("invalid {field} reference: {value:?}")]
    InvalidReference { field: &'static str, value: String },

    #[error("aggregation failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("document {id} in {collection} kept changing; gave up after {attempts} attempts")]
    Conflict {
        collection: &'static str,
        id: String,
        attempts: u32,
    },

    #[error("{collection} record vanished right after upsert")]
    MissingAfterUpsert { collection: &'static str },
}

pub type RepoResult<T> = Result<T, RepoError>;
