use chrono::{DateTime, Utc};
use coursekit_db::DomainEntity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    pub domain: String,
    pub key: String,
    pub name: String,
    pub purpose: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewApiKey {
    pub domain: String,
    pub key: String,
    pub name: String,
    pub purpose: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiKeyPatch {
    pub name: Option<String>,
    pub purpose: Option<Option<String>>,
}

impl DomainEntity for ApiKey {
    type Draft = NewApiKey;
    type Patch = ApiKeyPatch;
}
