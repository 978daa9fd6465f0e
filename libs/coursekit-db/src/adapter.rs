//! The single [`Repository`] implementation, generic over an [`EntityMapping`].

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use coursekit_criteria::{Criteria, PaginationResult};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QuerySelect,
    sea_query::{Expr, OnConflict},
};
use serde_json::Value as Json;

use crate::bulk::edit_json_column;
use crate::error::{RepoError, RepoResult};
use crate::mapping::{ActiveModelOf, ColumnOf, DomainEntity, EntityMapping, ModelOf};
use crate::query::{FieldMap, LimitCfg, Translated, new_id, parse_id};
use crate::repository::{Repository, Upserted};

/// Repository bound at construction to the table of mapping `M`.
///
/// Holds the shared connection pool and the entity's field map, nothing
/// per call. Cheap to wrap in an `Arc` and share.
pub struct SeaOrmRepository<M: EntityMapping> {
    conn: DatabaseConnection,
    fields: FieldMap<M::Db>,
    limits: LimitCfg,
    _mapping: PhantomData<fn() -> M>,
}

impl<M> SeaOrmRepository<M>
where
    M: EntityMapping,
    ModelOf<M>: IntoActiveModel<ActiveModelOf<M>> + Sync,
    ActiveModelOf<M>: ActiveModelTrait<Entity = M::Db> + ActiveModelBehavior + Send,
{
    #[must_use]
    pub fn new(conn: DatabaseConnection, limits: LimitCfg) -> Self {
        Self {
            conn,
            fields: M::field_map(),
            limits,
            _mapping: PhantomData,
        }
    }

    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    #[must_use]
    pub fn collection(&self) -> &'static str {
        M::COLLECTION
    }

    fn translate(&self, criteria: &Criteria) -> RepoResult<Translated<M::Db>> {
        Ok(Translated::new(criteria, &self.fields, self.limits)?)
    }

    fn id_condition(id: uuid::Uuid) -> Condition {
        Condition::all().add(Expr::col(M::id_column()).eq(id))
    }

    /// Condition restricting rows to one tenant.
    ///
    /// `None` when `domain` is not a well-formed identifier: nothing can
    /// belong to such a tenant. Entities without a tenant column are not
    /// restricted.
    #[must_use]
    pub fn tenant_scope(domain: &str) -> Option<Condition> {
        let tenant = parse_id(domain)?;
        Some(match M::tenant_column() {
            Some(col) => Condition::all().add(Expr::col(col).eq(tenant)),
            None => Condition::all(),
        })
    }

    /// First row matching a native condition, mapped.
    ///
    /// # Errors
    /// Returns `RepoError::Db` on backend failure.
    pub async fn find_first(&self, condition: Condition) -> RepoResult<Option<M::Entity>> {
        let model = <M::Db as EntityTrait>::find().filter(condition).one(&self.conn).await?;
        Ok(model.map(M::to_entity))
    }

    /// Every row matching a native condition, mapped. Unbounded; meant for
    /// tenant-scoped aggregation sources.
    ///
    /// # Errors
    /// Returns `RepoError::Db` on backend failure.
    pub async fn find_all(&self, condition: Condition) -> RepoResult<Vec<M::Entity>> {
        let models = <M::Db as EntityTrait>::find().filter(condition).all(&self.conn).await?;
        Ok(models.into_iter().map(M::to_entity).collect())
    }

    /// Lookup by a natural key column, scoped to `domain` when given.
    /// A malformed `domain` is a miss.
    ///
    /// # Errors
    /// Returns `RepoError::Db` on backend failure.
    pub async fn find_by_natural_key(
        &self,
        domain: Option<&str>,
        col: ColumnOf<M>,
        value: impl Into<sea_orm::Value> + Send,
    ) -> RepoResult<Option<M::Entity>> {
        let scope = match domain {
            Some(d) => match Self::tenant_scope(d) {
                Some(scope) => scope,
                None => return Ok(None),
            },
            None => Condition::all(),
        };
        self.find_first(scope.add(Expr::col(col).eq(value.into())))
            .await
    }

    /// Insert `draft` unless a row with the same natural key exists, then
    /// read the row back through `lookup`.
    ///
    /// The insert is a single `INSERT ... ON CONFLICT DO NOTHING`, so two
    /// racing callers end up with one row and exactly one `created: true`.
    /// An existing row is returned untouched.
    ///
    /// # Errors
    /// Returns `RepoError::InvalidReference` for a malformed tenant reference,
    /// `RepoError::Db` on backend failure.
    pub async fn insert_if_absent(
        &self,
        draft: <M::Entity as DomainEntity>::Draft,
        conflict_cols: Vec<ColumnOf<M>>,
        lookup: Condition,
    ) -> RepoResult<Upserted<M::Entity>> {
        let am = M::draft_to_active_model(new_id(), draft, Utc::now())?;
        let inserted = <M::Db as EntityTrait>::insert(am)
            .on_conflict(OnConflict::columns(conflict_cols).do_nothing().to_owned())
            .exec_without_returning(&self.conn)
            .await?;

        let model = <M::Db as EntityTrait>::find()
            .filter(lookup)
            .one(&self.conn)
            .await?
            .ok_or(RepoError::MissingAfterUpsert {
                collection: M::COLLECTION,
            })?;

        let created = inserted > 0;
        tracing::debug!(collection = M::COLLECTION, created, "insert-if-absent");
        Ok(Upserted {
            entity: M::to_entity(model),
            created,
        })
    }

    /// Rewrite a JSON array column of every row in `scope`, one
    /// compare-and-swap update per changed row.
    ///
    /// # Errors
    /// Returns `RepoError::Db` on backend failure, `RepoError::Conflict` if a
    /// row kept changing underneath the edit.
    pub async fn edit_json_documents<F>(
        &self,
        scope: Condition,
        json_col: ColumnOf<M>,
        edit: F,
    ) -> RepoResult<u64>
    where
        F: FnMut(&mut Json) -> bool + Send,
    {
        edit_json_column::<M::Db, _, _>(
            &self.conn,
            M::COLLECTION,
            scope,
            M::id_column(),
            json_col,
            edit,
        )
        .await
    }
}

#[async_trait]
impl<M> Repository<M::Entity> for SeaOrmRepository<M>
where
    M: EntityMapping,
    ModelOf<M>: IntoActiveModel<ActiveModelOf<M>> + Sync,
    ActiveModelOf<M>: ActiveModelTrait<Entity = M::Db> + ActiveModelBehavior + Send,
{
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<M::Entity>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        self.find_first(Self::id_condition(id)).await
    }

    async fn find_one(&self, criteria: Criteria) -> RepoResult<Option<M::Entity>> {
        let t = self.translate(&criteria)?;
        let model = t.filtered().offset(t.offset).one(&self.conn).await?;
        Ok(model.map(M::to_entity))
    }

    async fn find_many(&self, criteria: Criteria) -> RepoResult<Vec<M::Entity>> {
        let t = self.translate(&criteria)?;
        let models = t.select().all(&self.conn).await?;
        tracing::debug!(
            collection = M::COLLECTION,
            rows = models.len(),
            limit = t.limit,
            "find_many"
        );
        Ok(models.into_iter().map(M::to_entity).collect())
    }

    async fn find_paginated(&self, criteria: Criteria) -> RepoResult<PaginationResult<M::Entity>> {
        let t = self.translate(&criteria)?;
        let total = <M::Db as EntityTrait>::find()
            .filter(t.condition.clone())
            .count(&self.conn)
            .await?;
        let models = t.select().all(&self.conn).await?;
        tracing::debug!(
            collection = M::COLLECTION,
            total,
            rows = models.len(),
            offset = t.offset,
            "find_paginated"
        );
        let data = models.into_iter().map(M::to_entity).collect();
        Ok(PaginationResult::new(data, total, t.offset, t.limit))
    }

    async fn create(&self, draft: <M::Entity as DomainEntity>::Draft) -> RepoResult<M::Entity> {
        let am = M::draft_to_active_model(new_id(), draft, Utc::now())?;
        let model = am.insert(&self.conn).await?;
        tracing::debug!(collection = M::COLLECTION, "created");
        Ok(M::to_entity(model))
    }

    async fn update(
        &self,
        id: &str,
        patch: <M::Entity as DomainEntity>::Patch,
    ) -> RepoResult<Option<M::Entity>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let am = M::patch_to_active_model(patch, Utc::now())?;
        let res = <M::Db as EntityTrait>::update_many()
            .set(am)
            .filter(Self::id_condition(id))
            .exec(&self.conn)
            .await?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        self.find_first(Self::id_condition(id)).await
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let res = <M::Db as EntityTrait>::delete_many()
            .filter(Self::id_condition(id))
            .exec(&self.conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn count(&self, criteria: Criteria) -> RepoResult<u64> {
        let t = self.translate(&criteria)?;
        Ok(<M::Db as EntityTrait>::find().filter(t.condition).count(&self.conn).await?)
    }

    async fn delete_many(&self, criteria: Criteria) -> RepoResult<u64> {
        let t = self.translate(&criteria)?;
        let res = <M::Db as EntityTrait>::delete_many()
            .filter(t.condition)
            .exec(&self.conn)
            .await?;
        tracing::debug!(
            collection = M::COLLECTION,
            removed = res.rows_affected,
            "delete_many"
        );
        Ok(res.rows_affected)
    }
}
