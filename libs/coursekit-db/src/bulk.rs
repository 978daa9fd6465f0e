//! Per-document edits of JSON array columns.
//!
//! Used by relationship maintenance such as "remove this tag from every user
//! of a site". Each affected row is rewritten with a compare-and-swap
//! `UPDATE ... WHERE id = ? AND col = <old>`, so a single row never loses a
//! concurrent write. The set of rows as a whole is not atomic.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbBackend, EntityTrait, QueryFilter, QuerySelect,
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr},
};
use serde_json::Value as Json;
use uuid::Uuid;

use crate::error::{RepoError, RepoResult};
use crate::query::{id_to_string, translate::like_escape};

const MAX_ATTEMPTS: u32 = 5;

/// Rows whose JSON text contains `needle` as a string literal anywhere.
///
/// A cheap narrowing filter for [`edit_json_column`] scopes: it may admit
/// rows where the string sits under an unrelated key, never drops a row
/// that holds it in serialized form. The edit itself decides.
///
/// # Errors
/// Returns `RepoError::Serialization` if `needle` cannot be encoded.
pub fn json_mentions<C: ColumnTrait>(col: C, needle: &str) -> RepoResult<SimpleExpr> {
    let quoted = serde_json::to_string(needle)?;
    Ok(Expr::col(col)
        .cast_as(Alias::new("TEXT"))
        .like(LikeExpr::new(format!("%{}%", like_escape(&quoted))).escape('\\')))
}

/// Apply `edit` to the JSON column of every row matching `scope`.
///
/// `edit` mutates the document value in place and returns `true` if it
/// changed anything; unchanged rows are not written. Returns the number of
/// rows written.
///
/// # Errors
/// Returns `RepoError::Db` on backend failure and `RepoError::Conflict` if a
/// row kept changing underneath the edit.
pub async fn edit_json_column<E, C, F>(
    conn: &C,
    collection: &'static str,
    scope: Condition,
    id_col: E::Column,
    json_col: E::Column,
    mut edit: F,
) -> RepoResult<u64>
where
    E: EntityTrait,
    C: ConnectionTrait,
    F: FnMut(&mut Json) -> bool + Send,
{
    let rows: Vec<(Uuid, Json)> = E::find()
        .select_only()
        .column(id_col)
        .column(json_col)
        .filter(scope)
        .into_tuple()
        .all(conn)
        .await?;

    let scanned = rows.len();
    let mut written = 0_u64;
    for (id, current) in rows {
        if swap_one::<E, C, F>(conn, collection, id, id_col, json_col, current, &mut edit).await? {
            written += 1;
        }
    }
    tracing::debug!(collection, scanned, written, "json column edit finished");
    Ok(written)
}

#[allow(clippy::too_many_arguments)]
async fn swap_one<E, C, F>(
    conn: &C,
    collection: &'static str,
    id: Uuid,
    id_col: E::Column,
    json_col: E::Column,
    mut current: Json,
    edit: &mut F,
) -> RepoResult<bool>
where
    E: EntityTrait,
    C: ConnectionTrait,
    F: FnMut(&mut Json) -> bool + Send,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let mut next = current.clone();
        if !edit(&mut next) {
            return Ok(false);
        }
        let res = E::update_many()
            .col_expr(json_col, Expr::value(next))
            .filter(Expr::col(id_col).eq(id))
            .filter(same_document(conn.get_database_backend(), json_col, &current)?)
            .exec(conn)
            .await?;
        if res.rows_affected > 0 {
            return Ok(true);
        }

        tracing::warn!(collection, %id, attempt, "document changed during edit, retrying");
        let fresh: Option<Json> = E::find()
            .select_only()
            .column(json_col)
            .filter(Expr::col(id_col).eq(id))
            .into_tuple()
            .one(conn)
            .await?;
        match fresh {
            Some(v) => current = v,
            // deleted meanwhile
            None => return Ok(false),
        }
    }
    Err(RepoError::Conflict {
        collection,
        id: id_to_string(id),
        attempts: MAX_ATTEMPTS,
    })
}

/// Compare the stored document with `current` by value, not by its text.
///
/// SQLite keeps JSON as TEXT, so both sides go through `json()` to drop
/// insignificant whitespace. Postgres `jsonb` already compares by value.
fn same_document<C: ColumnTrait>(
    backend: DbBackend,
    col: C,
    current: &Json,
) -> RepoResult<SimpleExpr> {
    Ok(match backend {
        DbBackend::Sqlite => {
            let json = || Func::cust(Alias::new("json"));
            Expr::expr(json().arg(Expr::col(col)))
                .eq(json().arg(Expr::val(serde_json::to_string(current)?)))
        }
        _ => Expr::col(col).eq(current.clone()),
    })
}
