//! `SeaORM` repository implementation for lessons.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursekit_db::{
    EntityMapping, FieldKind, FieldMap, RepoResult, SeaOrmRepository, id_to_string, tenant_ref,
};
use sea_orm::{ActiveValue::NotSet, Set};
use uuid::Uuid;

use super::entity::lesson;
use crate::domain::models::{Lesson, LessonPatch, NewLesson};
use crate::domain::repos::LessonRepository;

pub struct LessonMapping;

impl EntityMapping for LessonMapping {
    type Db = lesson::Entity;
    type Entity = Lesson;

    const COLLECTION: &'static str = "lessons";

    fn id_column() -> lesson::Column {
        lesson::Column::Id
    }

    fn tenant_column() -> Option<lesson::Column> {
        Some(lesson::Column::Domain)
    }

    fn field_map() -> FieldMap<lesson::Entity> {
        FieldMap::new()
            .insert("id", lesson::Column::Id, FieldKind::Id)
            .insert("domain", lesson::Column::Domain, FieldKind::Id)
            .insert("lessonId", lesson::Column::LessonId, FieldKind::String)
            .insert("courseId", lesson::Column::CourseId, FieldKind::String)
            .insert("groupId", lesson::Column::GroupId, FieldKind::String)
            .insert("title", lesson::Column::Title, FieldKind::String)
            .insert("kind", lesson::Column::Kind, FieldKind::String)
            .insert(
                "requiresEnrollment",
                lesson::Column::RequiresEnrollment,
                FieldKind::Bool,
            )
            .insert("published", lesson::Column::Published, FieldKind::Bool)
            .insert("createdAt", lesson::Column::CreatedAt, FieldKind::DateTimeUtc)
            .insert("updatedAt", lesson::Column::UpdatedAt, FieldKind::DateTimeUtc)
    }

    fn to_entity(m: lesson::Model) -> Lesson {
        Lesson {
            id: id_to_string(m.id),
            domain: id_to_string(m.domain),
            lesson_id: m.lesson_id,
            course_id: m.course_id,
            group_id: m.group_id,
            title: m.title,
            kind: m.kind,
            content: m.content,
            requires_enrollment: m.requires_enrollment,
            published: m.published,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn draft_to_active_model(
        id: Uuid,
        d: NewLesson,
        now: DateTime<Utc>,
    ) -> RepoResult<lesson::ActiveModel> {
        Ok(lesson::ActiveModel {
            id: Set(id),
            domain: Set(tenant_ref(&d.domain)?),
            lesson_id: Set(d.lesson_id),
            course_id: Set(d.course_id),
            group_id: Set(d.group_id),
            title: Set(d.title),
            kind: Set(d.kind),
            content: Set(d.content),
            requires_enrollment: Set(d.requires_enrollment),
            published: Set(d.published),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }

    fn patch_to_active_model(
        p: LessonPatch,
        now: DateTime<Utc>,
    ) -> RepoResult<lesson::ActiveModel> {
        Ok(lesson::ActiveModel {
            id: NotSet,
            domain: NotSet,
            lesson_id: NotSet,
            course_id: NotSet,
            group_id: p.group_id.map_or(NotSet, Set),
            title: p.title.map_or(NotSet, Set),
            kind: NotSet,
            content: p.content.map_or(NotSet, Set),
            requires_enrollment: p.requires_enrollment.map_or(NotSet, Set),
            published: p.published.map_or(NotSet, Set),
            created_at: NotSet,
            updated_at: Set(now),
        })
    }
}

pub type LessonStore = SeaOrmRepository<LessonMapping>;

#[async_trait]
impl LessonRepository for LessonStore {
    async fn find_by_lesson_id(&self, domain: &str, lesson_id: &str) -> RepoResult<Option<Lesson>> {
        self.find_by_natural_key(Some(domain), lesson::Column::LessonId, lesson_id)
            .await
    }
}
