use chrono::{DateTime, Utc};
use coursekit_db::DomainEntity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub domain: String,
    /// Public identifier, unique within the site.
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub active: bool,
    pub permissions: Vec<String>,
    pub tags: Vec<String>,
    pub purchases: Vec<Purchase>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course the user is enrolled in, with their progress.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub course_id: String,
    #[serde(default)]
    pub completed_lessons: Vec<String>,
    /// Drip groups of the course this user has unlocked.
    #[serde(default)]
    pub accessible_groups: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub domain: String,
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub active: bool,
    pub permissions: Vec<String>,
    pub tags: Vec<String>,
    pub purchases: Vec<Purchase>,
}

impl NewUser {
    /// Active user with no name, permissions, tags or purchases.
    #[must_use]
    pub fn new(
        domain: impl Into<String>,
        user_id: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            user_id: user_id.into(),
            email: email.into(),
            name: None,
            active: true,
            permissions: Vec::new(),
            tags: Vec::new(),
            purchases: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    /// `Some(None)` clears the name.
    pub name: Option<Option<String>>,
    pub active: Option<bool>,
    pub permissions: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub purchases: Option<Vec<Purchase>>,
}

impl DomainEntity for User {
    type Draft = NewUser;
    type Patch = UserPatch;
}
