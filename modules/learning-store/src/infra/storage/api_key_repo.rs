//! `SeaORM` repository implementation for API keys.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursekit_db::{
    EntityMapping, FieldKind, FieldMap, RepoResult, SeaOrmRepository, id_to_string, tenant_ref,
};
use sea_orm::{ActiveValue::NotSet, Set};
use uuid::Uuid;

use super::entity::api_key;
use crate::domain::models::{ApiKey, ApiKeyPatch, NewApiKey};
use crate::domain::repos::ApiKeyRepository;

pub struct ApiKeyMapping;

impl EntityMapping for ApiKeyMapping {
    type Db = api_key::Entity;
    type Entity = ApiKey;

    const COLLECTION: &'static str = "api_keys";

    fn id_column() -> api_key::Column {
        api_key::Column::Id
    }

    fn tenant_column() -> Option<api_key::Column> {
        Some(api_key::Column::Domain)
    }

    fn field_map() -> FieldMap<api_key::Entity> {
        FieldMap::new()
            .insert("id", api_key::Column::Id, FieldKind::Id)
            .insert("domain", api_key::Column::Domain, FieldKind::Id)
            .insert("key", api_key::Column::Key, FieldKind::String)
            .insert("name", api_key::Column::Name, FieldKind::String)
            .insert("purpose", api_key::Column::Purpose, FieldKind::String)
            .insert("createdAt", api_key::Column::CreatedAt, FieldKind::DateTimeUtc)
    }

    fn to_entity(m: api_key::Model) -> ApiKey {
        ApiKey {
            id: id_to_string(m.id),
            domain: id_to_string(m.domain),
            key: m.key,
            name: m.name,
            purpose: m.purpose,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn draft_to_active_model(
        id: Uuid,
        d: NewApiKey,
        now: DateTime<Utc>,
    ) -> RepoResult<api_key::ActiveModel> {
        Ok(api_key::ActiveModel {
            id: Set(id),
            domain: Set(tenant_ref(&d.domain)?),
            key: Set(d.key),
            name: Set(d.name),
            purpose: Set(d.purpose),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }

    fn patch_to_active_model(
        p: ApiKeyPatch,
        now: DateTime<Utc>,
    ) -> RepoResult<api_key::ActiveModel> {
        Ok(api_key::ActiveModel {
            id: NotSet,
            domain: NotSet,
            key: NotSet,
            name: p.name.map_or(NotSet, Set),
            purpose: p.purpose.map_or(NotSet, Set),
            created_at: NotSet,
            updated_at: Set(now),
        })
    }
}

pub type ApiKeyStore = SeaOrmRepository<ApiKeyMapping>;

#[async_trait]
impl ApiKeyRepository for ApiKeyStore {
    async fn find_by_key(&self, domain: &str, key: &str) -> RepoResult<Option<ApiKey>> {
        self.find_by_natural_key(Some(domain), api_key::Column::Key, key)
            .await
    }
}
