//! `SeaORM` repository implementation for mail sequences.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursekit_db::{
    EntityMapping, FieldKind, FieldMap, RepoResult, SeaOrmRepository, id_to_string, tenant_ref,
};
use sea_orm::{ActiveValue::NotSet, Set};
use uuid::Uuid;

use super::entity::sequence;
use super::json_ops::decode;
use crate::domain::models::{NewSequence, Sequence, SequencePatch};
use crate::domain::repos::SequenceRepository;

pub struct SequenceMapping;

impl EntityMapping for SequenceMapping {
    type Db = sequence::Entity;
    type Entity = Sequence;

    const COLLECTION: &'static str = "sequences";

    fn id_column() -> sequence::Column {
        sequence::Column::Id
    }

    fn tenant_column() -> Option<sequence::Column> {
        Some(sequence::Column::Domain)
    }

    fn field_map() -> FieldMap<sequence::Entity> {
        FieldMap::new()
            .insert("id", sequence::Column::Id, FieldKind::Id)
            .insert("domain", sequence::Column::Domain, FieldKind::Id)
            .insert("sequenceId", sequence::Column::SequenceId, FieldKind::String)
            .insert("title", sequence::Column::Title, FieldKind::String)
            .insert("kind", sequence::Column::Kind, FieldKind::String)
            .insert("status", sequence::Column::Status, FieldKind::String)
            .insert("creatorId", sequence::Column::CreatorId, FieldKind::String)
            .insert("createdAt", sequence::Column::CreatedAt, FieldKind::DateTimeUtc)
            .insert("updatedAt", sequence::Column::UpdatedAt, FieldKind::DateTimeUtc)
    }

    fn to_entity(m: sequence::Model) -> Sequence {
        Sequence {
            id: id_to_string(m.id),
            domain: id_to_string(m.domain),
            sequence_id: m.sequence_id,
            title: m.title,
            kind: m.kind,
            status: m.status,
            creator_id: m.creator_id,
            trigger: m.trigger,
            emails: m.emails,
            entrants: decode(m.entrants),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn draft_to_active_model(
        id: Uuid,
        d: NewSequence,
        now: DateTime<Utc>,
    ) -> RepoResult<sequence::ActiveModel> {
        Ok(sequence::ActiveModel {
            id: Set(id),
            domain: Set(tenant_ref(&d.domain)?),
            sequence_id: Set(d.sequence_id),
            title: Set(d.title),
            kind: Set(d.kind),
            status: Set(d.status),
            creator_id: Set(d.creator_id),
            trigger: Set(d.trigger),
            emails: Set(d.emails),
            entrants: Set(serde_json::to_value(d.entrants)?),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }

    fn patch_to_active_model(
        p: SequencePatch,
        now: DateTime<Utc>,
    ) -> RepoResult<sequence::ActiveModel> {
        Ok(sequence::ActiveModel {
            id: NotSet,
            domain: NotSet,
            sequence_id: NotSet,
            title: p.title.map_or(NotSet, Set),
            kind: NotSet,
            status: p.status.map_or(NotSet, Set),
            creator_id: NotSet,
            trigger: p.trigger.map_or(NotSet, Set),
            emails: p.emails.map_or(NotSet, Set),
            entrants: match p.entrants {
                Some(v) => Set(serde_json::to_value(v)?),
                None => NotSet,
            },
            created_at: NotSet,
            updated_at: Set(now),
        })
    }
}

pub type SequenceStore = SeaOrmRepository<SequenceMapping>;

#[async_trait]
impl SequenceRepository for SequenceStore {
    async fn find_by_sequence_id(
        &self,
        domain: &str,
        sequence_id: &str,
    ) -> RepoResult<Option<Sequence>> {
        self.find_by_natural_key(Some(domain), sequence::Column::SequenceId, sequence_id)
            .await
    }
}
