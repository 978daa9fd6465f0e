use chrono::{DateTime, Utc};
use coursekit_db::DomainEntity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    pub domain: String,
    pub community_id: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub categories: Vec<String>,
    pub default_payment_plan: Option<String>,
    /// Soft-delete marker; deleted communities stay queryable.
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCommunity {
    pub domain: String,
    pub community_id: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub categories: Vec<String>,
    pub default_payment_plan: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommunityPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub enabled: Option<bool>,
    pub categories: Option<Vec<String>>,
    pub default_payment_plan: Option<Option<String>>,
    pub deleted: Option<bool>,
}

impl DomainEntity for Community {
    type Draft = NewCommunity;
    type Patch = CommunityPatch;
}
