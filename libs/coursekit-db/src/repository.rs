use async_trait::async_trait;
use coursekit_criteria::{Criteria, PaginationResult};
use serde::Serialize;

use crate::error::RepoResult;
use crate::mapping::DomainEntity;

/// Storage-agnostic CRUD and query contract for one entity type.
///
/// Lookups by a malformed identifier behave exactly like lookups by an
/// identifier that does not exist. Generic operations do not apply tenant
/// scoping; callers put `domain` into the criteria themselves.
#[async_trait]
pub trait Repository<T: DomainEntity>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<T>>;

    /// First match in sort order, or in backend order when unsorted.
    async fn find_one(&self, criteria: Criteria) -> RepoResult<Option<T>>;

    /// At most `criteria.limit()` matches.
    async fn find_many(&self, criteria: Criteria) -> RepoResult<Vec<T>>;

    /// Counts the filtered set, then fetches the requested window of it.
    async fn find_paginated(&self, criteria: Criteria) -> RepoResult<PaginationResult<T>>;

    async fn create(&self, draft: T::Draft) -> RepoResult<T>;

    /// Overwrites only the fields present in `patch`. Nested and array
    /// fields in the patch replace the stored value wholesale.
    async fn update(&self, id: &str, patch: T::Patch) -> RepoResult<Option<T>>;

    /// `true` if a record was removed.
    async fn delete(&self, id: &str) -> RepoResult<bool>;

    /// Size of the filtered set; pagination is ignored.
    async fn count(&self, criteria: Criteria) -> RepoResult<u64>;

    /// Removes every match of the filter; pagination is ignored.
    async fn delete_many(&self, criteria: Criteria) -> RepoResult<u64>;
}

/// Outcome of an insert-if-absent by natural key.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Upserted<T> {
    pub entity: T,
    /// `false` when a record with the same natural key already existed; it is
    /// returned unchanged.
    pub created: bool,
}

impl<T> Upserted<T> {
    #[must_use]
    pub fn into_inner(self) -> T {
        self.entity
    }
}
