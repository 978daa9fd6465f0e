#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

//! Fresh migrated database and registry per test.

use std::path::Path;

use coursekit_db::{DatabaseConfig, LimitCfg, Repository};
use learning_store::models::{Course, NewCourse, NewSite, NewUser, Purchase, Site, User};
use learning_store::{Registry, run_migrations};

pub async fn setup() -> Registry {
    setup_with(&DatabaseConfig::in_memory()).await
}

/// File-backed database under `dir` with a pool of several connections.
pub async fn setup_pooled(dir: &Path) -> Registry {
    let cfg = DatabaseConfig {
        dsn: format!("sqlite://{}?mode=rwc", dir.join("store.db").display()),
        max_conns: 4,
        ..DatabaseConfig::default()
    };
    setup_with(&cfg).await
}

async fn setup_with(cfg: &DatabaseConfig) -> Registry {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();

    let conn = coursekit_db::connect(cfg).await.expect("sqlite");
    run_migrations(&conn).await.expect("migrations");
    Registry::new(&conn, LimitCfg::default()).expect("registry")
}

pub async fn site(reg: &Registry, name: &str, tags: &[&str]) -> Site {
    reg.sites()
        .create(NewSite {
            name: name.to_owned(),
            host: format!("{name}.school.test"),
            title: format!("{name} school"),
            tags: strings(tags),
        })
        .await
        .expect("site")
}

pub async fn user(reg: &Registry, site: &Site, user_id: &str, tags: &[&str]) -> User {
    let mut draft = NewUser::new(&site.id, user_id, format!("{user_id}@mail.test"));
    draft.tags = strings(tags);
    reg.users().create(draft).await.expect("user")
}

pub async fn student(reg: &Registry, site: &Site, user_id: &str, purchases: Vec<Purchase>) -> User {
    let mut draft = NewUser::new(&site.id, user_id, format!("{user_id}@mail.test"));
    draft.purchases = purchases;
    reg.users().create(draft).await.expect("student")
}

pub async fn course(reg: &Registry, site: &Site, course_id: &str, lessons: usize) -> Course {
    reg.courses()
        .create(NewCourse {
            domain: site.id.clone(),
            course_id: course_id.to_owned(),
            title: format!("Course {course_id}"),
            slug: format!("course-{course_id}"),
            kind: "course".to_owned(),
            published: true,
            cost: 0,
            creator_id: "creator".to_owned(),
            lessons: (0..lessons).map(|i| format!("{course_id}-l{i}")).collect(),
            groups: Vec::new(),
        })
        .await
        .expect("course")
}

pub fn purchase(course_id: &str, completed: &[&str], groups: &[&str]) -> Purchase {
    Purchase {
        course_id: course_id.to_owned(),
        completed_lessons: strings(completed),
        accessible_groups: strings(groups),
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}
