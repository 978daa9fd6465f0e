//! `SeaORM` repository implementation for payment plans.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursekit_db::{
    EntityMapping, FieldKind, FieldMap, RepoResult, SeaOrmRepository, id_to_string, tenant_ref,
};
use sea_orm::{ActiveValue::NotSet, Set};
use uuid::Uuid;

use super::entity::payment_plan;
use crate::domain::models::{NewPaymentPlan, PaymentPlan, PaymentPlanPatch};
use crate::domain::repos::PaymentPlanRepository;

pub struct PaymentPlanMapping;

impl EntityMapping for PaymentPlanMapping {
    type Db = payment_plan::Entity;
    type Entity = PaymentPlan;

    const COLLECTION: &'static str = "payment_plans";

    fn id_column() -> payment_plan::Column {
        payment_plan::Column::Id
    }

    fn tenant_column() -> Option<payment_plan::Column> {
        Some(payment_plan::Column::Domain)
    }

    fn field_map() -> FieldMap<payment_plan::Entity> {
        FieldMap::new()
            .insert("id", payment_plan::Column::Id, FieldKind::Id)
            .insert("domain", payment_plan::Column::Domain, FieldKind::Id)
            .insert("planId", payment_plan::Column::PlanId, FieldKind::String)
            .insert("name", payment_plan::Column::Name, FieldKind::String)
            .insert("kind", payment_plan::Column::Kind, FieldKind::String)
            .insert("entityId", payment_plan::Column::EntityId, FieldKind::String)
            .insert("entityType", payment_plan::Column::EntityType, FieldKind::String)
            .insert("amount", payment_plan::Column::Amount, FieldKind::I64)
            .insert("archived", payment_plan::Column::Archived, FieldKind::Bool)
            .insert("createdAt", payment_plan::Column::CreatedAt, FieldKind::DateTimeUtc)
    }

    fn to_entity(m: payment_plan::Model) -> PaymentPlan {
        PaymentPlan {
            id: id_to_string(m.id),
            domain: id_to_string(m.domain),
            plan_id: m.plan_id,
            name: m.name,
            kind: m.kind,
            entity_id: m.entity_id,
            entity_type: m.entity_type,
            amount: m.amount,
            archived: m.archived,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn draft_to_active_model(
        id: Uuid,
        d: NewPaymentPlan,
        now: DateTime<Utc>,
    ) -> RepoResult<payment_plan::ActiveModel> {
        Ok(payment_plan::ActiveModel {
            id: Set(id),
            domain: Set(tenant_ref(&d.domain)?),
            plan_id: Set(d.plan_id),
            name: Set(d.name),
            kind: Set(d.kind),
            entity_id: Set(d.entity_id),
            entity_type: Set(d.entity_type),
            amount: Set(d.amount),
            archived: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }

    fn patch_to_active_model(
        p: PaymentPlanPatch,
        now: DateTime<Utc>,
    ) -> RepoResult<payment_plan::ActiveModel> {
        Ok(payment_plan::ActiveModel {
            id: NotSet,
            domain: NotSet,
            plan_id: NotSet,
            name: p.name.map_or(NotSet, Set),
            kind: NotSet,
            entity_id: NotSet,
            entity_type: NotSet,
            amount: p.amount.map_or(NotSet, Set),
            archived: p.archived.map_or(NotSet, Set),
            created_at: NotSet,
            updated_at: Set(now),
        })
    }
}

pub type PaymentPlanStore = SeaOrmRepository<PaymentPlanMapping>;

#[async_trait]
impl PaymentPlanRepository for PaymentPlanStore {
    async fn find_by_plan_id(&self, domain: &str, plan_id: &str) -> RepoResult<Option<PaymentPlan>> {
        self.find_by_natural_key(Some(domain), payment_plan::Column::PlanId, plan_id)
            .await
    }
}
