#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

//! A small tenant-owned `tasks` entity used to exercise the generic adapter.

use chrono::{DateTime, Utc};
use coursekit_db::{
    DatabaseConfig, DomainEntity, EntityMapping, FieldKind, FieldMap, LimitCfg, RepoResult,
    SeaOrmRepository, id_to_string, tenant_ref,
};
use sea_orm::{ActiveValue::NotSet, ConnectionTrait, DatabaseConnection, Set};
use uuid::Uuid;

pub mod ent {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "tasks")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub domain: Uuid,
        pub title: String,
        pub status: String,
        pub score: i64,
        #[sea_orm(column_type = "JsonBinary")]
        pub tags: Json,
        pub created_at: ChronoDateTimeUtc,
        pub updated_at: ChronoDateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub id: String,
    pub domain: String,
    pub title: String,
    pub status: String,
    pub score: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewTask {
    pub domain: String,
    pub title: String,
    pub status: String,
    pub score: i64,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl DomainEntity for Task {
    type Draft = NewTask;
    type Patch = TaskPatch;
}

pub struct TaskMapping;

impl EntityMapping for TaskMapping {
    type Db = ent::Entity;
    type Entity = Task;

    const COLLECTION: &'static str = "tasks";

    fn id_column() -> ent::Column {
        ent::Column::Id
    }

    fn tenant_column() -> Option<ent::Column> {
        Some(ent::Column::Domain)
    }

    fn field_map() -> FieldMap<ent::Entity> {
        FieldMap::new()
            .insert("id", ent::Column::Id, FieldKind::Id)
            .insert("domain", ent::Column::Domain, FieldKind::Id)
            .insert("title", ent::Column::Title, FieldKind::String)
            .insert("status", ent::Column::Status, FieldKind::String)
            .insert("score", ent::Column::Score, FieldKind::I64)
            .insert("createdAt", ent::Column::CreatedAt, FieldKind::DateTimeUtc)
    }

    fn to_entity(m: ent::Model) -> Task {
        Task {
            id: id_to_string(m.id),
            domain: id_to_string(m.domain),
            title: m.title,
            status: m.status,
            score: m.score,
            tags: serde_json::from_value(m.tags).unwrap_or_default(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    fn draft_to_active_model(
        id: Uuid,
        d: NewTask,
        now: DateTime<Utc>,
    ) -> RepoResult<ent::ActiveModel> {
        Ok(ent::ActiveModel {
            id: Set(id),
            domain: Set(tenant_ref(&d.domain)?),
            title: Set(d.title),
            status: Set(d.status),
            score: Set(d.score),
            tags: Set(serde_json::json!(d.tags)),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }

    fn patch_to_active_model(p: TaskPatch, now: DateTime<Utc>) -> RepoResult<ent::ActiveModel> {
        Ok(ent::ActiveModel {
            id: NotSet,
            domain: NotSet,
            title: p.title.map_or(NotSet, Set),
            status: p.status.map_or(NotSet, Set),
            score: NotSet,
            tags: p.tags.map_or(NotSet, |t| Set(serde_json::json!(t))),
            created_at: NotSet,
            updated_at: Set(now),
        })
    }
}

pub type TaskRepo = SeaOrmRepository<TaskMapping>;

pub async fn setup() -> (DatabaseConnection, TaskRepo) {
    let conn = coursekit_db::connect(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory sqlite");
    conn.execute_unprepared(
        "CREATE TABLE tasks (
id BLOB PRIMARY KEY NOT NULL,
domain BLOB NOT NULL,
title TEXT NOT NULL,
status TEXT NOT NULL,
score INTEGER NOT NULL,
tags TEXT NOT NULL,
created_at TEXT NOT NULL,
updated_at TEXT NOT NULL
);
CREATE UNIQUE INDEX tasks_domain_title ON tasks (domain, title);",
    )
    .await
    .expect("schema");
    let repo = TaskRepo::new(conn.clone(), LimitCfg::default());
    (conn, repo)
}

pub fn tenant() -> String {
    id_to_string(Uuid::new_v4())
}

pub fn new_task(domain: &str, title: &str, status: &str) -> NewTask {
    NewTask {
        domain: domain.to_owned(),
        title: title.to_owned(),
        status: status.to_owned(),
        score: 0,
        tags: Vec::new(),
    }
}
