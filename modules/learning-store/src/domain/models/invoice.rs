use chrono::{DateTime, Utc};
use coursekit_db::DomainEntity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub domain: String,
    pub invoice_id: String,
    pub membership_id: String,
    pub payment_plan_id: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    /// `pending`, `paid` or `failed`.
    pub status: String,
    pub payment_processor: String,
    pub processor_transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewInvoice {
    pub domain: String,
    pub invoice_id: String,
    pub membership_id: String,
    pub payment_plan_id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub payment_processor: String,
    pub processor_transaction_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvoicePatch {
    pub status: Option<String>,
    pub processor_transaction_id: Option<Option<String>>,
}

impl DomainEntity for Invoice {
    type Draft = NewInvoice;
    type Patch = InvoicePatch;
}
