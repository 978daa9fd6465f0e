use chrono::{DateTime, Utc};
use coursekit_db::DomainEntity;
use serde::{Deserialize, Serialize};

/// A school hosted on the platform. Every other entity belongs to one site
/// through its `domain` field, which holds the site's `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    pub host: String,
    pub title: String,
    /// Tags declared for the site's users, whether or not any user has them.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSite {
    pub name: String,
    pub host: String,
    pub title: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SitePatch {
    pub host: Option<String>,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl DomainEntity for Site {
    type Draft = NewSite;
    type Patch = SitePatch;
}
