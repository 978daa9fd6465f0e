#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{course, purchase, setup, site, student};
use coursekit_db::{Criteria, Repository, SortDir};
use learning_store::CourseRepository;

#[tokio::test]
async fn enrollment_progress_rolls_up_per_course() {
    let reg = setup().await;
    let x = site(&reg, "alpha", &[]).await;
    let y = site(&reg, "beta", &[]).await;

    course(&reg, &x, "c1", 4).await;
    course(&reg, &x, "c2", 2).await;
    course(&reg, &y, "c9", 3).await;

    student(&reg, &x, "u1", vec![purchase("c1", &["a", "b"], &[])]).await;
    student(
        &reg,
        &x,
        "u2",
        vec![purchase("c1", &["a"], &[]), purchase("ghost", &["z"], &[])],
    )
    .await;
    student(&reg, &x, "u3", Vec::new()).await;
    student(&reg, &y, "u1", vec![purchase("c9", &["a"], &[])]).await;

    let report = reg.courses().enrollment_progress(&x.id).await.unwrap();
    assert_eq!(report.len(), 2, "orphan purchases are dropped");

    let c1 = &report[0];
    assert_eq!(c1.course_id, "c1");
    assert_eq!(c1.title, "Course c1");
    assert_eq!(c1.total_lessons, 4);
    assert_eq!(c1.enrolled, 2);
    assert_eq!(c1.lessons_completed, 3);
    assert!((c1.average_progress - 0.375).abs() < f64::EPSILON);

    let c2 = &report[1];
    assert_eq!(c2.course_id, "c2");
    assert_eq!(c2.total_lessons, 2);
    assert_eq!(c2.enrolled, 0);
    assert_eq!(c2.lessons_completed, 0);
    assert!(c2.average_progress.abs() < f64::EPSILON);
}

#[tokio::test]
async fn enrollment_progress_of_unknown_site_is_empty() {
    let reg = setup().await;
    assert!(reg.courses().enrollment_progress("garbage").await.unwrap().is_empty());
}

#[tokio::test]
async fn courses_resolve_by_id_and_slug() {
    let reg = setup().await;
    let x = site(&reg, "alpha", &[]).await;
    let y = site(&reg, "beta", &[]).await;
    let c = course(&reg, &x, "c1", 1).await;

    let courses = reg.courses();
    assert_eq!(courses.find_by_course_id(&x.id, "c1").await.unwrap(), Some(c.clone()));
    assert_eq!(courses.find_by_slug(&x.id, "course-c1").await.unwrap(), Some(c));
    assert!(courses.find_by_slug(&y.id, "course-c1").await.unwrap().is_none());
    assert!(courses.find_by_course_id("nope", "c1").await.unwrap().is_none());
}

#[tokio::test]
async fn paginated_courses_stay_inside_the_site() {
    let reg = setup().await;
    let x = site(&reg, "alpha", &[]).await;
    let y = site(&reg, "beta", &[]).await;
    for i in 0..7 {
        course(&reg, &x, &format!("c{i}"), i).await;
    }
    course(&reg, &y, "other", 1).await;

    let criteria = Criteria::new()
        .eq("domain", x.id.as_str())
        .order_by("courseId", SortDir::Asc)
        .skip(5)
        .take(5);
    let page = reg.courses().find_paginated(criteria.clone()).await.unwrap();

    assert_eq!(page.total, 7);
    assert_eq!(page.total, reg.courses().count(criteria).await.unwrap());
    let ids: Vec<_> = page.data.iter().map(|c| c.course_id.as_str()).collect();
    assert_eq!(ids, ["c5", "c6"]);
}
