//! `SeaORM` repository implementation for courses, including the
//! per-course enrollment progress report.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursekit_criteria::{Criteria, Operator, SortDir};
use coursekit_db::{
    EntityMapping, FieldKind, FieldMap, RepoResult, SeaOrmRepository, id_to_string, parse_id,
    pipeline::{Accumulator, GROUP_KEY, Pipeline, Projection},
    tenant_ref,
};
use sea_orm::{ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::entity::{course, user};
use super::json_ops::decode;
use crate::domain::models::{Course, CoursePatch, NewCourse};
use crate::domain::repos::{CourseRepository, EnrollmentSummary};

pub struct CourseMapping;

impl EntityMapping for CourseMapping {
    type Db = course::Entity;
    type Entity = Course;

    const COLLECTION: &'static str = "courses";

    fn id_column() -> course::Column {
        course::Column::Id
    }

    fn tenant_column() -> Option<course::Column> {
        Some(course::Column::Domain)
    }

    fn field_map() -> FieldMap<course::Entity> {
        FieldMap::new()
            .insert("id", course::Column::Id, FieldKind::Id)
            .insert("domain", course::Column::Domain, FieldKind::Id)
            .insert("courseId", course::Column::CourseId, FieldKind::String)
            .insert("title", course::Column::Title, FieldKind::String)
            .insert("slug", course::Column::Slug, FieldKind::String)
            .insert("kind", course::Column::Kind, FieldKind::String)
            .insert("published", course::Column::Published, FieldKind::Bool)
            .insert("cost", course::Column::Cost, FieldKind::I64)
            .insert("creatorId", course::Column::CreatorId, FieldKind::String)
            .insert("createdAt", course::Column::CreatedAt, FieldKind::DateTimeUtc)
            .insert("updatedAt", course::Column::UpdatedAt, FieldKind::DateTimeUtc)
    }

    fn to_entity(m: course::Model) -> Course {
        Course {
            id: id_to_string(m.id),
            domain: id_to_string(m.domain),
            course_id: m.course_id,
            title: m.title,
            slug: m.slug,
            kind: m.kind,
            published: m.published,
            cost: m.cost,
            creator_id: m.creator_id,
            lessons: decode(m.lessons),
            groups: decode(m.groups),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn draft_to_active_model(
        id: Uuid,
        d: NewCourse,
        now: DateTime<Utc>,
    ) -> RepoResult<course::ActiveModel> {
        Ok(course::ActiveModel {
            id: Set(id),
            domain: Set(tenant_ref(&d.domain)?),
            course_id: Set(d.course_id),
            title: Set(d.title),
            slug: Set(d.slug),
            kind: Set(d.kind),
            published: Set(d.published),
            cost: Set(d.cost),
            creator_id: Set(d.creator_id),
            lessons: Set(serde_json::to_value(d.lessons)?),
            groups: Set(serde_json::to_value(d.groups)?),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }

    fn patch_to_active_model(
        p: CoursePatch,
        now: DateTime<Utc>,
    ) -> RepoResult<course::ActiveModel> {
        Ok(course::ActiveModel {
            id: NotSet,
            domain: NotSet,
            course_id: NotSet,
            title: p.title.map_or(NotSet, Set),
            slug: p.slug.map_or(NotSet, Set),
            kind: NotSet,
            published: p.published.map_or(NotSet, Set),
            cost: p.cost.map_or(NotSet, Set),
            creator_id: NotSet,
            lessons: match p.lessons {
                Some(v) => Set(serde_json::to_value(v)?),
                None => NotSet,
            },
            groups: match p.groups {
                Some(v) => Set(serde_json::to_value(v)?),
                None => NotSet,
            },
            created_at: NotSet,
            updated_at: Set(now),
        })
    }
}

pub type CourseStore = SeaOrmRepository<CourseMapping>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressRow {
    #[serde(rename = "_id")]
    course_id: String,
    title: String,
    total_lessons: u64,
    enrolled: u64,
    lessons_completed: u64,
}

impl From<ProgressRow> for EnrollmentSummary {
    fn from(r: ProgressRow) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let average_progress = if r.enrolled == 0 || r.total_lessons == 0 {
            0.0
        } else {
            r.lessons_completed as f64 / (r.enrolled * r.total_lessons) as f64
        };
        Self {
            course_id: r.course_id,
            title: r.title,
            total_lessons: r.total_lessons,
            enrolled: r.enrolled,
            lessons_completed: r.lessons_completed,
            average_progress,
        }
    }
}

#[async_trait]
impl CourseRepository for CourseStore {
    async fn find_by_course_id(&self, domain: &str, course_id: &str) -> RepoResult<Option<Course>> {
        self.find_by_natural_key(Some(domain), course::Column::CourseId, course_id)
            .await
    }

    async fn find_by_slug(&self, domain: &str, slug: &str) -> RepoResult<Option<Course>> {
        self.find_by_natural_key(Some(domain), course::Column::Slug, slug)
            .await
    }

    async fn enrollment_progress(&self, domain: &str) -> RepoResult<Vec<EnrollmentSummary>> {
        let Some(site_id) = parse_id(domain) else {
            return Ok(Vec::new());
        };
        let courses = self
            .find_all(Condition::all().add(course::Column::Domain.eq(site_id)))
            .await?;
        let purchases: Vec<serde_json::Value> = user::Entity::find()
            .filter(user::Column::Domain.eq(site_id))
            .all(self.conn())
            .await?
            .into_iter()
            .map(|u| json!({ "purchases": u.purchases }))
            .collect();

        // Every course contributes a zero row so unenrolled courses are
        // reported, and only these rows carry a title.
        let catalogue = courses
            .iter()
            .map(|c| {
                json!({
                    GROUP_KEY: c.course_id,
                    "title": c.title,
                    "totalLessons": c.lessons.len(),
                    "enrolled": 0,
                    "lessonsCompleted": 0,
                })
            })
            .collect();

        let rows = Pipeline::new()
            .unwind("purchases")
            .project([
                ("courseId", Projection::Field("purchases.courseId".into())),
                (
                    "completed",
                    Projection::Size("purchases.completedLessons".into()),
                ),
            ])
            .group(
                "courseId",
                [
                    ("enrolled", Accumulator::Count),
                    ("lessonsCompleted", Accumulator::Sum("completed".into())),
                ],
            )
            .union_with(catalogue)
            .group(
                GROUP_KEY,
                [
                    ("title", Accumulator::First("title".into())),
                    ("totalLessons", Accumulator::Max("totalLessons".into())),
                    ("enrolled", Accumulator::Sum("enrolled".into())),
                    (
                        "lessonsCompleted",
                        Accumulator::Sum("lessonsCompleted".into()),
                    ),
                ],
            )
            .matching(&Criteria::new().filter("title", Operator::Exists, true))
            .sort([("enrolled", SortDir::Desc), (GROUP_KEY, SortDir::Asc)])
            .run(purchases)?;

        tracing::debug!(domain, courses = rows.len(), "enrollment progress computed");
        rows.into_iter()
            .map(|row| -> RepoResult<EnrollmentSummary> {
                Ok(serde_json::from_value::<ProgressRow>(row)?.into())
            })
            .collect()
    }
}
