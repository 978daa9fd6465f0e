//! `SeaORM` repository implementation for communities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursekit_db::{
    EntityMapping, FieldKind, FieldMap, RepoResult, SeaOrmRepository, id_to_string, tenant_ref,
};
use sea_orm::{ActiveValue::NotSet, Set};
use uuid::Uuid;

use super::entity::community;
use super::json_ops::decode;
use crate::domain::models::{Community, CommunityPatch, NewCommunity};
use crate::domain::repos::CommunityRepository;

pub struct CommunityMapping;

impl EntityMapping for CommunityMapping {
    type Db = community::Entity;
    type Entity = Community;

    const COLLECTION: &'static str = "communities";

    fn id_column() -> community::Column {
        community::Column::Id
    }

    fn tenant_column() -> Option<community::Column> {
        Some(community::Column::Domain)
    }

    fn field_map() -> FieldMap<community::Entity> {
        FieldMap::new()
            .insert("id", community::Column::Id, FieldKind::Id)
            .insert("domain", community::Column::Domain, FieldKind::Id)
            .insert("communityId", community::Column::CommunityId, FieldKind::String)
            .insert("name", community::Column::Name, FieldKind::String)
            .insert("enabled", community::Column::Enabled, FieldKind::Bool)
            .insert("deleted", community::Column::Deleted, FieldKind::Bool)
            .insert("createdAt", community::Column::CreatedAt, FieldKind::DateTimeUtc)
            .insert("updatedAt", community::Column::UpdatedAt, FieldKind::DateTimeUtc)
    }

    fn to_entity(m: community::Model) -> Community {
        Community {
            id: id_to_string(m.id),
            domain: id_to_string(m.domain),
            community_id: m.community_id,
            name: m.name,
            description: m.description,
            enabled: m.enabled,
            categories: decode(m.categories),
            default_payment_plan: m.default_payment_plan,
            deleted: m.deleted,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn draft_to_active_model(
        id: Uuid,
        d: NewCommunity,
        now: DateTime<Utc>,
    ) -> RepoResult<community::ActiveModel> {
        Ok(community::ActiveModel {
            id: Set(id),
            domain: Set(tenant_ref(&d.domain)?),
            community_id: Set(d.community_id),
            name: Set(d.name),
            description: Set(d.description),
            enabled: Set(d.enabled),
            categories: Set(serde_json::to_value(d.categories)?),
            default_payment_plan: Set(d.default_payment_plan),
            deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }

    fn patch_to_active_model(
        p: CommunityPatch,
        now: DateTime<Utc>,
    ) -> RepoResult<community::ActiveModel> {
        Ok(community::ActiveModel {
            id: NotSet,
            domain: NotSet,
            community_id: NotSet,
            name: p.name.map_or(NotSet, Set),
            description: p.description.map_or(NotSet, Set),
            enabled: p.enabled.map_or(NotSet, Set),
            categories: match p.categories {
                Some(v) => Set(serde_json::to_value(v)?),
                None => NotSet,
            },
            default_payment_plan: p.default_payment_plan.map_or(NotSet, Set),
            deleted: p.deleted.map_or(NotSet, Set),
            created_at: NotSet,
            updated_at: Set(now),
        })
    }
}

pub type CommunityStore = SeaOrmRepository<CommunityMapping>;

#[async_trait]
impl CommunityRepository for CommunityStore {
    async fn find_by_community_id(
        &self,
        domain: &str,
        community_id: &str,
    ) -> RepoResult<Option<Community>> {
        self.find_by_natural_key(Some(domain), community::Column::CommunityId, community_id)
            .await
    }

    async fn find_by_name(&self, domain: &str, name: &str) -> RepoResult<Option<Community>> {
        self.find_by_natural_key(Some(domain), community::Column::Name, name)
            .await
    }
}
