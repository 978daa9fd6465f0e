//! `SeaORM` repository implementation for memberships.
//!
//! Removing a product rewrites `included_products` row by row, see
//! [`coursekit_db::bulk`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursekit_db::{
    EntityMapping, FieldKind, FieldMap, RepoResult, SeaOrmRepository, Upserted,
    bulk::json_mentions, id_to_string, tenant_ref,
};
use sea_orm::{ActiveValue::NotSet, ColumnTrait, Condition, Set};
use uuid::Uuid;

use super::entity::membership;
use super::json_ops::{decode, pull};
use crate::domain::models::{Membership, MembershipPatch, NewMembership};
use crate::domain::repos::MembershipRepository;

pub struct MembershipMapping;

impl EntityMapping for MembershipMapping {
    type Db = membership::Entity;
    type Entity = Membership;

    const COLLECTION: &'static str = "memberships";

    fn id_column() -> membership::Column {
        membership::Column::Id
    }

    fn tenant_column() -> Option<membership::Column> {
        Some(membership::Column::Domain)
    }

    fn field_map() -> FieldMap<membership::Entity> {
        FieldMap::new()
            .insert("id", membership::Column::Id, FieldKind::Id)
            .insert("domain", membership::Column::Domain, FieldKind::Id)
            .insert(
                "membershipId",
                membership::Column::MembershipId,
                FieldKind::String,
            )
            .insert("userId", membership::Column::UserId, FieldKind::String)
            .insert("entityId", membership::Column::EntityId, FieldKind::String)
            .insert("entityType", membership::Column::EntityType, FieldKind::String)
            .insert("status", membership::Column::Status, FieldKind::String)
            .insert(
                "paymentPlanId",
                membership::Column::PaymentPlanId,
                FieldKind::String,
            )
            .insert("createdAt", membership::Column::CreatedAt, FieldKind::DateTimeUtc)
            .insert("updatedAt", membership::Column::UpdatedAt, FieldKind::DateTimeUtc)
    }

    fn to_entity(m: membership::Model) -> Membership {
        Membership {
            id: id_to_string(m.id),
            domain: id_to_string(m.domain),
            membership_id: m.membership_id,
            user_id: m.user_id,
            entity_id: m.entity_id,
            entity_type: m.entity_type,
            status: m.status,
            payment_plan_id: m.payment_plan_id,
            included_products: decode(m.included_products),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn draft_to_active_model(
        id: Uuid,
        d: NewMembership,
        now: DateTime<Utc>,
    ) -> RepoResult<membership::ActiveModel> {
        Ok(membership::ActiveModel {
            id: Set(id),
            domain: Set(tenant_ref(&d.domain)?),
            membership_id: Set(d.membership_id),
            user_id: Set(d.user_id),
            entity_id: Set(d.entity_id),
            entity_type: Set(d.entity_type),
            status: Set(d.status),
            payment_plan_id: Set(d.payment_plan_id),
            included_products: Set(serde_json::to_value(d.included_products)?),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }

    fn patch_to_active_model(
        p: MembershipPatch,
        now: DateTime<Utc>,
    ) -> RepoResult<membership::ActiveModel> {
        Ok(membership::ActiveModel {
            id: NotSet,
            domain: NotSet,
            membership_id: NotSet,
            user_id: NotSet,
            entity_id: NotSet,
            entity_type: NotSet,
            status: p.status.map_or(NotSet, Set),
            payment_plan_id: p.payment_plan_id.map_or(NotSet, Set),
            included_products: match p.included_products {
                Some(v) => Set(serde_json::to_value(v)?),
                None => NotSet,
            },
            created_at: NotSet,
            updated_at: Set(now),
        })
    }
}

pub type MembershipStore = SeaOrmRepository<MembershipMapping>;

#[async_trait]
impl MembershipRepository for MembershipStore {
    async fn find_by_membership_id(
        &self,
        domain: &str,
        membership_id: &str,
    ) -> RepoResult<Option<Membership>> {
        self.find_by_natural_key(Some(domain), membership::Column::MembershipId, membership_id)
            .await
    }

    async fn find_for_entity(
        &self,
        domain: &str,
        user_id: &str,
        entity_id: &str,
        entity_type: &str,
    ) -> RepoResult<Option<Membership>> {
        let Some(scope) = Self::tenant_scope(domain) else {
            return Ok(None);
        };
        self.find_first(
            scope
                .add(membership::Column::UserId.eq(user_id))
                .add(membership::Column::EntityId.eq(entity_id))
                .add(membership::Column::EntityType.eq(entity_type)),
        )
        .await
    }

    async fn get_or_create(&self, draft: NewMembership) -> RepoResult<Upserted<Membership>> {
        let lookup = Condition::all()
            .add(membership::Column::Domain.eq(tenant_ref(&draft.domain)?))
            .add(membership::Column::UserId.eq(draft.user_id.clone()))
            .add(membership::Column::EntityId.eq(draft.entity_id.clone()))
            .add(membership::Column::EntityType.eq(draft.entity_type.clone()));
        self.insert_if_absent(
            draft,
            vec![
                membership::Column::Domain,
                membership::Column::UserId,
                membership::Column::EntityId,
                membership::Column::EntityType,
            ],
            lookup,
        )
        .await
    }

    async fn remove_product_from_memberships(
        &self,
        product_id: &str,
        domain: &str,
    ) -> RepoResult<()> {
        let Some(scope) = Self::tenant_scope(domain) else {
            return Ok(());
        };
        let scope = scope.add(json_mentions(membership::Column::IncludedProducts, product_id)?);
        self.edit_json_documents(scope, membership::Column::IncludedProducts, |doc| {
            pull(doc, product_id)
        })
        .await?;
        Ok(())
    }
}
