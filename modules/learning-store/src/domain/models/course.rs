use chrono::{DateTime, Utc};
use coursekit_db::DomainEntity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub domain: String,
    pub course_id: String,
    pub title: String,
    pub slug: String,
    /// `course`, `download` or `blog`.
    pub kind: String,
    pub published: bool,
    /// Price in minor currency units.
    pub cost: i64,
    pub creator_id: String,
    /// Lesson ids in display order.
    pub lessons: Vec<String>,
    pub groups: Vec<CourseGroup>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGroup {
    pub id: String,
    pub name: String,
    pub rank: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCourse {
    pub domain: String,
    pub course_id: String,
    pub title: String,
    pub slug: String,
    pub kind: String,
    pub published: bool,
    pub cost: i64,
    pub creator_id: String,
    pub lessons: Vec<String>,
    pub groups: Vec<CourseGroup>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub published: Option<bool>,
    pub cost: Option<i64>,
    pub lessons: Option<Vec<String>>,
    pub groups: Option<Vec<CourseGroup>>,
}

impl DomainEntity for Course {
    type Draft = NewCourse;
    type Patch = CoursePatch;
}
