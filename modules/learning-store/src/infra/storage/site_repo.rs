//! `SeaORM` repository implementation for sites.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursekit_db::{
    EntityMapping, FieldKind, FieldMap, RepoResult, SeaOrmRepository, Upserted, id_to_string,
    parse_id,
};
use sea_orm::{ActiveValue::NotSet, ColumnTrait, Condition, Set};
use uuid::Uuid;

use super::entity::site;
use super::json_ops::{add_to_set, decode};
use crate::domain::models::{NewSite, Site, SitePatch};
use crate::domain::repos::SiteRepository;

pub struct SiteMapping;

impl EntityMapping for SiteMapping {
    type Db = site::Entity;
    type Entity = Site;

    const COLLECTION: &'static str = "sites";

    fn id_column() -> site::Column {
        site::Column::Id
    }

    fn tenant_column() -> Option<site::Column> {
        None
    }

    fn field_map() -> FieldMap<site::Entity> {
        FieldMap::new()
            .insert("id", site::Column::Id, FieldKind::Id)
            .insert("name", site::Column::Name, FieldKind::String)
            .insert("host", site::Column::Host, FieldKind::String)
            .insert("title", site::Column::Title, FieldKind::String)
            .insert("createdAt", site::Column::CreatedAt, FieldKind::DateTimeUtc)
            .insert("updatedAt", site::Column::UpdatedAt, FieldKind::DateTimeUtc)
    }

    fn to_entity(m: site::Model) -> Site {
        Site {
            id: id_to_string(m.id),
            name: m.name,
            host: m.host,
            title: m.title,
            tags: decode(m.tags),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn draft_to_active_model(
        id: Uuid,
        d: NewSite,
        now: DateTime<Utc>,
    ) -> RepoResult<site::ActiveModel> {
        Ok(site::ActiveModel {
            id: Set(id),
            name: Set(d.name),
            host: Set(d.host),
            title: Set(d.title),
            tags: Set(serde_json::to_value(d.tags)?),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }

    fn patch_to_active_model(p: SitePatch, now: DateTime<Utc>) -> RepoResult<site::ActiveModel> {
        Ok(site::ActiveModel {
            id: NotSet,
            name: NotSet,
            host: p.host.map_or(NotSet, Set),
            title: p.title.map_or(NotSet, Set),
            tags: match p.tags {
                Some(t) => Set(serde_json::to_value(t)?),
                None => NotSet,
            },
            created_at: NotSet,
            updated_at: Set(now),
        })
    }
}

pub type SiteStore = SeaOrmRepository<SiteMapping>;

#[async_trait]
impl SiteRepository for SiteStore {
    async fn find_by_host(&self, host: &str) -> RepoResult<Option<Site>> {
        self.find_by_natural_key(None, site::Column::Host, host)
            .await
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Site>> {
        self.find_by_natural_key(None, site::Column::Name, name)
            .await
    }

    async fn get_or_create_by_name(&self, draft: NewSite) -> RepoResult<Upserted<Site>> {
        let lookup = Condition::all().add(site::Column::Name.eq(draft.name.clone()));
        self.insert_if_absent(draft, vec![site::Column::Name], lookup)
            .await
    }

    async fn add_tags(&self, site_id: &str, tags: &[String]) -> RepoResult<()> {
        let Some(id) = parse_id(site_id) else {
            return Ok(());
        };
        let scope = Condition::all().add(site::Column::Id.eq(id));
        self.edit_json_documents(scope, site::Column::Tags, |doc| add_to_set(doc, tags))
            .await?;
        Ok(())
    }
}
