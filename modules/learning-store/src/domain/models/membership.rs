use chrono::{DateTime, Utc};
use coursekit_db::DomainEntity;
use serde::{Deserialize, Serialize};

/// A user's access to a course or community, optionally paid for through a
/// payment plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub domain: String,
    pub membership_id: String,
    pub user_id: String,
    pub entity_id: String,
    /// `course` or `community`.
    pub entity_type: String,
    /// `pending`, `active`, `expired`, `rejected` or `paused`.
    pub status: String,
    pub payment_plan_id: Option<String>,
    /// Products granted along with the membership's own entity.
    pub included_products: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMembership {
    pub domain: String,
    pub membership_id: String,
    pub user_id: String,
    pub entity_id: String,
    pub entity_type: String,
    pub status: String,
    pub payment_plan_id: Option<String>,
    pub included_products: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MembershipPatch {
    pub status: Option<String>,
    pub payment_plan_id: Option<Option<String>>,
    pub included_products: Option<Vec<String>>,
}

impl DomainEntity for Membership {
    type Draft = NewMembership;
    type Patch = MembershipPatch;
}
