use chrono::{DateTime, Utc};
use coursekit_db::DomainEntity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlan {
    pub id: String,
    pub domain: String,
    pub plan_id: String,
    pub name: String,
    /// `free`, `onetime`, `subscription` or `emi`.
    pub kind: String,
    pub entity_id: String,
    pub entity_type: String,
    pub amount: i64,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPaymentPlan {
    pub domain: String,
    pub plan_id: String,
    pub name: String,
    pub kind: String,
    pub entity_id: String,
    pub entity_type: String,
    pub amount: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentPlanPatch {
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub archived: Option<bool>,
}

impl DomainEntity for PaymentPlan {
    type Draft = NewPaymentPlan;
    type Patch = PaymentPlanPatch;
}
