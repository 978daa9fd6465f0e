//! Binding between domain entities and their sea-orm persistence models.

use chrono::{DateTime, Utc};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::error::{RepoError, RepoResult};
use crate::query::{FieldMap, parse_id};

/// A domain entity as business logic sees it: string `id`, string `domain`
/// where tenant-owned, plain Rust field types.
pub trait DomainEntity: Send + Sync + 'static {
    /// Creation payload. Carries no identifier.
    type Draft: Send + 'static;
    /// Partial update. Carries neither identifier nor tenant reference.
    type Patch: Send + 'static;
}

pub type ModelOf<M> = <<M as EntityMapping>::Db as EntityTrait>::Model;
pub type ActiveModelOf<M> = <<M as EntityMapping>::Db as EntityTrait>::ActiveModel;
pub type ColumnOf<M> = <<M as EntityMapping>::Db as EntityTrait>::Column;

/// Per-entity mapping used by [`SeaOrmRepository`](crate::SeaOrmRepository).
///
/// Every record that leaves a repository passes through
/// [`EntityMapping::to_entity`], which is where native keys become strings.
pub trait EntityMapping: Send + Sync + 'static {
    type Db: EntityTrait;
    type Entity: DomainEntity;

    /// Logical name of the backing collection, also the registry key.
    const COLLECTION: &'static str;

    fn id_column() -> ColumnOf<Self>;

    /// Column holding the owning site, if the entity is tenant-owned.
    fn tenant_column() -> Option<ColumnOf<Self>>;

    /// Columns reachable through criteria filters and sorts.
    fn field_map() -> FieldMap<Self::Db>;

    fn to_entity(model: ModelOf<Self>) -> Self::Entity;

    /// # Errors
    /// Returns `RepoError::InvalidReference` if the draft's tenant reference
    /// is not a well-formed identifier.
    fn draft_to_active_model(
        id: Uuid,
        draft: <Self::Entity as DomainEntity>::Draft,
        now: DateTime<Utc>,
    ) -> RepoResult<ActiveModelOf<Self>>;

    /// Only the fields present in the patch are set; everything else stays
    /// `NotSet` so the update touches nothing else. Must always set the
    /// modification timestamp.
    ///
    /// # Errors
    /// Returns `RepoError::Serialization` if a JSON field cannot be encoded.
    fn patch_to_active_model(
        patch: <Self::Entity as DomainEntity>::Patch,
        now: DateTime<Utc>,
    ) -> RepoResult<ActiveModelOf<Self>>;
}

/// Parse a tenant reference carried by a draft.
///
/// # Errors
/// Returns `RepoError::InvalidReference` when `domain` is not a native key.
pub fn tenant_ref(domain: &str) -> RepoResult<Uuid> {
    parse_id(domain).ok_or_else(|| RepoError::InvalidReference {
        field: "domain",
        value: domain.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn tenant_ref_rejects_garbage() {
        assert!(matches!(
            tenant_ref("site-1"),
            Err(RepoError::InvalidReference { field: "domain", .. })
        ));
        let id = Uuid::new_v4();
        assert_eq!(tenant_ref(&id.to_string()).unwrap(), id);
    }
}
