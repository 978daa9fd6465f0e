#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{setup, site};
use coursekit_db::Repository;
use learning_store::infra::storage::{CourseStore, UserStore};
use learning_store::{Registry, RegistryError, UserRepository};

#[tokio::test]
async fn every_collection_is_bound_once() {
    let reg = setup().await;
    assert_eq!(
        reg.entity_names(),
        [
            "api_keys",
            "communities",
            "courses",
            "invoices",
            "lessons",
            "memberships",
            "payment_plans",
            "sequences",
            "sites",
            "users",
        ]
    );
}

#[tokio::test]
async fn resolve_by_name_returns_the_bound_store() {
    let reg = setup().await;
    let x = site(&reg, "alpha", &[]).await;
    common::user(&reg, &x, "u1", &[]).await;

    let users = reg.resolve::<UserStore>("users").unwrap();
    assert!(std::sync::Arc::ptr_eq(&users, reg.users()));
    assert!(users.find_by_user_id(&x.id, "u1").await.unwrap().is_some());

    assert!(matches!(
        reg.resolve::<CourseStore>("users"),
        Err(RegistryError::TypeMismatch(name)) if name == "users"
    ));
    assert!(matches!(
        reg.resolve::<UserStore>("students"),
        Err(RegistryError::NotFound(_))
    ));
}

#[tokio::test]
async fn install_publishes_once() {
    let first = setup().await;
    let second = setup().await;

    let installed = first.install().unwrap();
    assert!(std::ptr::eq(installed, Registry::global().unwrap()));
    assert!(matches!(
        second.install(),
        Err(RegistryError::AlreadyInstalled)
    ));

    let x = site(installed, "alpha", &[]).await;
    assert_eq!(
        installed.sites().find_by_id(&x.id).await.unwrap().map(|s| s.name),
        Some("alpha".to_owned())
    );
}
