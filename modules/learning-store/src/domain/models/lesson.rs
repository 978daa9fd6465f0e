use chrono::{DateTime, Utc};
use coursekit_db::DomainEntity;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub domain: String,
    pub lesson_id: String,
    pub course_id: String,
    pub group_id: String,
    pub title: String,
    /// `text`, `video`, `audio`, `pdf`, `file`, `embed` or `quiz`.
    pub kind: String,
    /// Kind-specific body, stored as-is.
    pub content: Json,
    pub requires_enrollment: bool,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewLesson {
    pub domain: String,
    pub lesson_id: String,
    pub course_id: String,
    pub group_id: String,
    pub title: String,
    pub kind: String,
    pub content: Json,
    pub requires_enrollment: bool,
    pub published: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LessonPatch {
    pub group_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<Json>,
    pub requires_enrollment: Option<bool>,
    pub published: Option<bool>,
}

impl DomainEntity for Lesson {
    type Draft = NewLesson;
    type Patch = LessonPatch;
}
