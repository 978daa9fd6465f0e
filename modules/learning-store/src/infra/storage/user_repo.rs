//! `SeaORM` repository implementation for users.
//!
//! Tag and group removal edit the JSON array columns of candidate rows only;
//! candidates are picked by [`json_mentions`] on the serialized column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursekit_criteria::SortDir;
use coursekit_db::{
    EntityMapping, FieldKind, FieldMap, RepoResult, SeaOrmRepository, Upserted,
    bulk::json_mentions, id_to_string, parse_id,
    pipeline::{Accumulator, GROUP_KEY, Pipeline, Projection},
    tenant_ref,
};
use sea_orm::{ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, Set};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::entity::{site, user};
use super::json_ops::{decode, pull, pull_nested};
use crate::domain::models::{NewUser, User, UserPatch};
use crate::domain::repos::{TagUsage, UserRepository};

pub struct UserMapping;

impl EntityMapping for UserMapping {
    type Db = user::Entity;
    type Entity = User;

    const COLLECTION: &'static str = "users";

    fn id_column() -> user::Column {
        user::Column::Id
    }

    fn tenant_column() -> Option<user::Column> {
        Some(user::Column::Domain)
    }

    fn field_map() -> FieldMap<user::Entity> {
        FieldMap::new()
            .insert("id", user::Column::Id, FieldKind::Id)
            .insert("domain", user::Column::Domain, FieldKind::Id)
            .insert("userId", user::Column::UserId, FieldKind::String)
            .insert("email", user::Column::Email, FieldKind::String)
            .insert("name", user::Column::Name, FieldKind::String)
            .insert("active", user::Column::Active, FieldKind::Bool)
            .insert("createdAt", user::Column::CreatedAt, FieldKind::DateTimeUtc)
            .insert("updatedAt", user::Column::UpdatedAt, FieldKind::DateTimeUtc)
    }

    fn to_entity(m: user::Model) -> User {
        User {
            id: id_to_string(m.id),
            domain: id_to_string(m.domain),
            user_id: m.user_id,
            email: m.email,
            name: m.name,
            active: m.active,
            permissions: decode(m.permissions),
            tags: decode(m.tags),
            purchases: decode(m.purchases),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn draft_to_active_model(
        id: Uuid,
        d: NewUser,
        now: DateTime<Utc>,
    ) -> RepoResult<user::ActiveModel> {
        Ok(user::ActiveModel {
            id: Set(id),
            domain: Set(tenant_ref(&d.domain)?),
            user_id: Set(d.user_id),
            email: Set(d.email),
            name: Set(d.name),
            active: Set(d.active),
            permissions: Set(serde_json::to_value(d.permissions)?),
            tags: Set(serde_json::to_value(d.tags)?),
            purchases: Set(serde_json::to_value(d.purchases)?),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }

    fn patch_to_active_model(p: UserPatch, now: DateTime<Utc>) -> RepoResult<user::ActiveModel> {
        Ok(user::ActiveModel {
            id: NotSet,
            domain: NotSet,
            user_id: NotSet,
            email: p.email.map_or(NotSet, Set),
            name: p.name.map_or(NotSet, Set),
            active: p.active.map_or(NotSet, Set),
            permissions: match p.permissions {
                Some(v) => Set(serde_json::to_value(v)?),
                None => NotSet,
            },
            tags: match p.tags {
                Some(v) => Set(serde_json::to_value(v)?),
                None => NotSet,
            },
            purchases: match p.purchases {
                Some(v) => Set(serde_json::to_value(v)?),
                None => NotSet,
            },
            created_at: NotSet,
            updated_at: Set(now),
        })
    }
}

pub type UserStore = SeaOrmRepository<UserMapping>;

/// Output row of the tag usage pipeline.
#[derive(Deserialize)]
struct TagRow {
    #[serde(rename = "_id")]
    tag: String,
    count: u64,
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_user_id(&self, domain: &str, user_id: &str) -> RepoResult<Option<User>> {
        self.find_by_natural_key(Some(domain), user::Column::UserId, user_id)
            .await
    }

    async fn find_by_email(&self, domain: &str, email: &str) -> RepoResult<Option<User>> {
        self.find_by_natural_key(Some(domain), user::Column::Email, email)
            .await
    }

    async fn find_or_create_by_email(&self, draft: NewUser) -> RepoResult<Upserted<User>> {
        let lookup = Condition::all()
            .add(user::Column::Domain.eq(tenant_ref(&draft.domain)?))
            .add(user::Column::Email.eq(draft.email.clone()));
        self.insert_if_absent(
            draft,
            vec![user::Column::Domain, user::Column::Email],
            lookup,
        )
        .await
    }

    async fn remove_tag_from_all_users(&self, tag: &str, domain: &str) -> RepoResult<()> {
        let Some(scope) = Self::tenant_scope(domain) else {
            return Ok(());
        };
        let scope = scope.add(json_mentions(user::Column::Tags, tag)?);
        let written = self
            .edit_json_documents(scope, user::Column::Tags, |doc| pull(doc, tag))
            .await?;
        tracing::debug!(tag, domain, written, "tag removed from users");
        Ok(())
    }

    async fn remove_group_from_purchases(
        &self,
        group_id: &str,
        course_id: &str,
        domain: &str,
    ) -> RepoResult<()> {
        let Some(scope) = Self::tenant_scope(domain) else {
            return Ok(());
        };
        let scope = scope
            .add(json_mentions(user::Column::Purchases, course_id)?)
            .add(json_mentions(user::Column::Purchases, group_id)?);
        self.edit_json_documents(scope, user::Column::Purchases, |doc| {
            pull_nested(doc, "courseId", course_id, "accessibleGroups", group_id)
        })
        .await?;
        Ok(())
    }

    async fn tag_usage(&self, domain: &str) -> RepoResult<Vec<TagUsage>> {
        let Some(site_id) = parse_id(domain) else {
            return Ok(Vec::new());
        };
        let users = self
            .find_all(Condition::all().add(user::Column::Domain.eq(site_id)))
            .await?;
        let declared: Vec<String> = site::Entity::find_by_id(site_id)
            .one(self.conn())
            .await?
            .map(|s| decode(s.tags))
            .unwrap_or_default();

        let docs = users
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let unused = declared
            .into_iter()
            .map(|tag| json!({ GROUP_KEY: tag, "count": 0 }))
            .collect();

        let rows = Pipeline::new()
            .project([("tags", Projection::Field("tags".into()))])
            .unwind("tags")
            .group("tags", [("count", Accumulator::Count)])
            .union_with(unused)
            .group(GROUP_KEY, [("count", Accumulator::Sum("count".into()))])
            .sort([("count", SortDir::Desc), (GROUP_KEY, SortDir::Asc)])
            .run(docs)?;

        rows.into_iter()
            .map(|row| -> RepoResult<TagUsage> {
                let TagRow { tag, count } = serde_json::from_value(row)?;
                Ok(TagUsage { tag, count })
            })
            .collect()
    }
}
