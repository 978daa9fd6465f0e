use chrono::{DateTime, Utc};
use coursekit_db::DomainEntity;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// An email broadcast or drip sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    pub id: String,
    pub domain: String,
    pub sequence_id: String,
    pub title: String,
    /// `broadcast` or `sequence`.
    pub kind: String,
    /// `draft`, `active`, `paused` or `completed`.
    pub status: String,
    pub creator_id: String,
    pub trigger: Json,
    pub emails: Json,
    /// User ids currently enrolled in the sequence.
    pub entrants: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewSequence {
    pub domain: String,
    pub sequence_id: String,
    pub title: String,
    pub kind: String,
    pub status: String,
    pub creator_id: String,
    pub trigger: Json,
    pub emails: Json,
    pub entrants: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequencePatch {
    pub title: Option<String>,
    pub status: Option<String>,
    pub trigger: Option<Json>,
    pub emails: Option<Json>,
    pub entrants: Option<Vec<String>>,
}

impl DomainEntity for Sequence {
    type Draft = NewSequence;
    type Patch = SequencePatch;
}
