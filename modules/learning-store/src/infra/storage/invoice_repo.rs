//! `SeaORM` repository implementation for invoices.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursekit_db::{
    EntityMapping, FieldKind, FieldMap, RepoResult, SeaOrmRepository, id_to_string, tenant_ref,
};
use sea_orm::{ActiveValue::NotSet, Set};
use uuid::Uuid;

use super::entity::invoice;
use crate::domain::models::{Invoice, InvoicePatch, NewInvoice};
use crate::domain::repos::InvoiceRepository;

pub struct InvoiceMapping;

impl EntityMapping for InvoiceMapping {
    type Db = invoice::Entity;
    type Entity = Invoice;

    const COLLECTION: &'static str = "invoices";

    fn id_column() -> invoice::Column {
        invoice::Column::Id
    }

    fn tenant_column() -> Option<invoice::Column> {
        Some(invoice::Column::Domain)
    }

    fn field_map() -> FieldMap<invoice::Entity> {
        FieldMap::new()
            .insert("id", invoice::Column::Id, FieldKind::Id)
            .insert("domain", invoice::Column::Domain, FieldKind::Id)
            .insert("invoiceId", invoice::Column::InvoiceId, FieldKind::String)
            .insert("membershipId", invoice::Column::MembershipId, FieldKind::String)
            .insert("paymentPlanId", invoice::Column::PaymentPlanId, FieldKind::String)
            .insert("amount", invoice::Column::Amount, FieldKind::I64)
            .insert("currency", invoice::Column::Currency, FieldKind::String)
            .insert("status", invoice::Column::Status, FieldKind::String)
            .insert(
                "paymentProcessor",
                invoice::Column::PaymentProcessor,
                FieldKind::String,
            )
            .insert("createdAt", invoice::Column::CreatedAt, FieldKind::DateTimeUtc)
            .insert("updatedAt", invoice::Column::UpdatedAt, FieldKind::DateTimeUtc)
    }

    fn to_entity(m: invoice::Model) -> Invoice {
        Invoice {
            id: id_to_string(m.id),
            domain: id_to_string(m.domain),
            invoice_id: m.invoice_id,
            membership_id: m.membership_id,
            payment_plan_id: m.payment_plan_id,
            amount: m.amount,
            currency: m.currency,
            status: m.status,
            payment_processor: m.payment_processor,
            processor_transaction_id: m.processor_transaction_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn draft_to_active_model(
        id: Uuid,
        d: NewInvoice,
        now: DateTime<Utc>,
    ) -> RepoResult<invoice::ActiveModel> {
        Ok(invoice::ActiveModel {
            id: Set(id),
            domain: Set(tenant_ref(&d.domain)?),
            invoice_id: Set(d.invoice_id),
            membership_id: Set(d.membership_id),
            payment_plan_id: Set(d.payment_plan_id),
            amount: Set(d.amount),
            currency: Set(d.currency),
            status: Set(d.status),
            payment_processor: Set(d.payment_processor),
            processor_transaction_id: Set(d.processor_transaction_id),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }

    fn patch_to_active_model(
        p: InvoicePatch,
        now: DateTime<Utc>,
    ) -> RepoResult<invoice::ActiveModel> {
        Ok(invoice::ActiveModel {
            id: NotSet,
            domain: NotSet,
            invoice_id: NotSet,
            membership_id: NotSet,
            payment_plan_id: NotSet,
            amount: NotSet,
            currency: NotSet,
            status: p.status.map_or(NotSet, Set),
            payment_processor: NotSet,
            processor_transaction_id: p.processor_transaction_id.map_or(NotSet, Set),
            created_at: NotSet,
            updated_at: Set(now),
        })
    }
}

pub type InvoiceStore = SeaOrmRepository<InvoiceMapping>;

#[async_trait]
impl InvoiceRepository for InvoiceStore {
    async fn find_by_invoice_id(
        &self,
        domain: &str,
        invoice_id: &str,
    ) -> RepoResult<Option<Invoice>> {
        self.find_by_natural_key(Some(domain), invoice::Column::InvoiceId, invoice_id)
            .await
    }
}
