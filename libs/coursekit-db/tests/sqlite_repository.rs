#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{TaskPatch, TaskRepo, ent, new_task, setup, tenant};
use coursekit_db::{
    Criteria, Operator, RepoError, Repository, SortDir, bulk::json_mentions,
    query::TranslateError,
};
use sea_orm::{Condition, ConnectionTrait, sea_query::Expr};
use serde_json::Value as Json;

#[tokio::test]
async fn create_then_find_by_id_round_trips() {
    let (_conn, repo) = setup().await;
    let site = tenant();

    let created = repo.create(new_task(&site, "write intro", "PENDING")).await.unwrap();
    assert_eq!(created.domain, site);
    assert_eq!(created.created_at, created.updated_at);

    let found = repo.find_by_id(&created.id).await.unwrap().expect("stored");
    assert_eq!(found.id, created.id);
    assert_eq!(found.title, "write intro");
}

#[tokio::test]
async fn malformed_ids_are_misses_not_errors() {
    let (_conn, repo) = setup().await;
    assert!(repo.find_by_id("not-a-key").await.unwrap().is_none());
    assert!(repo.update("not-a-key", TaskPatch::default()).await.unwrap().is_none());
    assert!(!repo.delete("not-a-key").await.unwrap());

    let hits = repo
        .find_many(Criteria::new().eq("id", "not-a-key"))
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn malformed_domain_in_draft_is_rejected() {
    let (_conn, repo) = setup().await;
    let err = repo
        .create(new_task("site-1", "x", "PENDING"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidReference { field: "domain", .. }));
}

#[tokio::test]
async fn delete_removes_once() {
    let (_conn, repo) = setup().await;
    let t = repo.create(new_task(&tenant(), "a", "PENDING")).await.unwrap();

    assert!(repo.delete(&t.id).await.unwrap());
    assert!(repo.find_by_id(&t.id).await.unwrap().is_none());
    assert!(!repo.delete(&t.id).await.unwrap());
}

async fn seed(repo: &TaskRepo, site: &str) {
    for i in 0..15 {
        repo.create(new_task(site, &format!("pending {i:02}"), "PENDING"))
            .await
            .unwrap();
    }
    for i in 0..5 {
        repo.create(new_task(site, &format!("done {i:02}"), "DONE"))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn paginated_total_matches_count() {
    let (_conn, repo) = setup().await;
    let site = tenant();
    seed(&repo, &site).await;
    seed(&repo, &tenant()).await;

    let criteria = Criteria::new()
        .eq("domain", site.as_str())
        .eq("status", "PENDING")
        .order_by("createdAt", SortDir::Desc)
        .take(10);

    let page = repo.find_paginated(criteria.clone()).await.unwrap();
    assert_eq!(page.data.len(), 10);
    assert_eq!(page.total, 15);
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 10);
    assert_eq!(repo.count(criteria).await.unwrap(), 15);

    assert!(page.data.iter().all(|t| t.status == "PENDING"));
    assert!(
        page.data
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at)
    );
}

#[tokio::test]
async fn second_page_reports_page_number() {
    let (_conn, repo) = setup().await;
    let site = tenant();
    seed(&repo, &site).await;

    let page = repo
        .find_paginated(
            Criteria::new()
                .eq("domain", site.as_str())
                .order_by("title", SortDir::Asc)
                .skip(10)
                .take(10),
        )
        .await
        .unwrap();
    assert_eq!(page.page, 2);
    assert_eq!(page.total, 20);
    assert_eq!(page.data.len(), 10);
    assert!(!page.has_next());
}

#[tokio::test]
async fn contains_is_case_insensitive_substring() {
    let (_conn, repo) = setup().await;
    let site = tenant();
    repo.create(new_task(&site, "Summer Sale banner", "PENDING")).await.unwrap();
    repo.create(new_task(&site, "winter notes", "PENDING")).await.unwrap();
    repo.create(new_task(&site, "100% done", "PENDING")).await.unwrap();

    let hits = repo
        .find_many(Criteria::new().filter("title", Operator::Contains, "summer"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Summer Sale banner");

    // wildcard characters are literal
    let pct = repo
        .find_many(Criteria::new().filter("title", Operator::Contains, "%"))
        .await
        .unwrap();
    assert_eq!(pct.len(), 1);
}

#[tokio::test]
async fn contains_matches_accented_titles() {
    let (_conn, repo) = setup().await;
    let site = tenant();
    repo.create(new_task(&site, "Émile notes", "PENDING")).await.unwrap();
    repo.create(new_task(&site, "emile draft", "PENDING")).await.unwrap();

    let hits = repo
        .find_many(Criteria::new().filter("title", Operator::Contains, "Émile"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Émile notes");

    let hits = repo
        .find_many(Criteria::new().filter("title", Operator::Contains, "ÉMILE NOTES"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1, "ASCII letters still fold");
}

#[tokio::test]
async fn update_merges_patch_fields() {
    let (_conn, repo) = setup().await;
    let mut draft = new_task(&tenant(), "draft", "PENDING");
    draft.score = 7;
    let t = repo.create(draft).await.unwrap();

    let updated = repo
        .update(
            &t.id,
            TaskPatch {
                status: Some("DONE".into()),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap()
        .expect("row exists");

    assert_eq!(updated.status, "DONE");
    assert_eq!(updated.title, "draft");
    assert_eq!(updated.score, 7);
    assert_eq!(updated.created_at, t.created_at);
    assert!(updated.updated_at >= t.updated_at);
}

#[tokio::test]
async fn update_of_missing_row_is_none() {
    let (_conn, repo) = setup().await;
    let ghost = coursekit_db::id_to_string(uuid::Uuid::new_v4());
    assert!(repo.update(&ghost, TaskPatch::default()).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_many_ignores_paging() {
    let (_conn, repo) = setup().await;
    let site = tenant();
    seed(&repo, &site).await;

    let removed = repo
        .delete_many(Criteria::new().eq("status", "PENDING").take(3))
        .await
        .unwrap();
    assert_eq!(removed, 15);
    assert_eq!(repo.count(Criteria::new()).await.unwrap(), 5);
}

#[tokio::test]
async fn find_one_honours_sort() {
    let (_conn, repo) = setup().await;
    let site = tenant();
    for (title, score) in [("low", 1), ("high", 9), ("mid", 5)] {
        let mut d = new_task(&site, title, "PENDING");
        d.score = score;
        repo.create(d).await.unwrap();
    }

    let top = repo
        .find_one(Criteria::new().order_by("score", SortDir::Desc))
        .await
        .unwrap()
        .expect("rows exist");
    assert_eq!(top.title, "high");

    let none = repo
        .find_one(Criteria::new().filter("score", Operator::Gt, 100_i64))
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn unknown_field_is_a_translate_error() {
    let (_conn, repo) = setup().await;
    let err = repo
        .find_many(Criteria::new().eq("nope", 1_i64))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Translate(TranslateError::UnknownField(ref f)) if f == "nope"
    ));
}

#[tokio::test]
async fn insert_if_absent_reports_created_then_existing() {
    let (_conn, repo) = setup().await;
    let site = tenant();
    let domain = coursekit_db::parse_id(&site).unwrap();
    let lookup = || {
        Condition::all()
            .add(Expr::col(ent::Column::Domain).eq(domain))
            .add(Expr::col(ent::Column::Title).eq("onboarding"))
    };
    let cols = || vec![ent::Column::Domain, ent::Column::Title];

    let first = repo
        .insert_if_absent(new_task(&site, "onboarding", "PENDING"), cols(), lookup())
        .await
        .unwrap();
    assert!(first.created);

    let second = repo
        .insert_if_absent(new_task(&site, "onboarding", "DONE"), cols(), lookup())
        .await
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.entity.id, first.entity.id);
    assert_eq!(second.entity.status, "PENDING");
    assert_eq!(repo.count(Criteria::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn json_edit_stays_inside_tenant() {
    let (_conn, repo) = setup().await;
    let (site_a, site_b) = (tenant(), tenant());
    for site in [&site_a, &site_b] {
        let mut d = new_task(site, "tagged", "PENDING");
        d.tags = vec!["vip".into(), "beta".into()];
        repo.create(d).await.unwrap();
        repo.create(new_task(site, "untagged", "PENDING")).await.unwrap();
    }

    let scope = TaskRepo::tenant_scope(&site_a).expect("well-formed");
    let written = repo
        .edit_json_documents(scope, ent::Column::Tags, |doc| match doc {
            Json::Array(items) => {
                let before = items.len();
                items.retain(|t| t != "vip");
                items.len() != before
            }
            _ => false,
        })
        .await
        .unwrap();
    assert_eq!(written, 1);

    let a = repo
        .find_one(Criteria::new().eq("domain", site_a.as_str()).eq("title", "tagged"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a.tags, vec!["beta".to_owned()]);

    let b = repo
        .find_one(Criteria::new().eq("domain", site_b.as_str()).eq("title", "tagged"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(b.tags, vec!["vip".to_owned(), "beta".to_owned()]);
}

fn pull_vip(doc: &mut Json) -> bool {
    match doc {
        Json::Array(items) => {
            let before = items.len();
            items.retain(|t| t != "vip");
            items.len() != before
        }
        _ => false,
    }
}

#[tokio::test]
async fn json_mentions_narrows_the_rows_handed_to_the_edit() {
    let (_conn, repo) = setup().await;
    let site = tenant();
    for (title, tags) in [
        ("holder", vec!["vip", "beta"]),
        ("lookalike", vec!["vipper", "v_p"]),
        ("plain", vec![]),
    ] {
        let mut d = new_task(&site, title, "PENDING");
        d.tags = tags.into_iter().map(str::to_owned).collect();
        repo.create(d).await.unwrap();
    }

    let scope = TaskRepo::tenant_scope(&site)
        .expect("well-formed")
        .add(json_mentions(ent::Column::Tags, "vip").unwrap());
    let mut seen = Vec::new();
    let written = repo
        .edit_json_documents(scope, ent::Column::Tags, |doc| {
            seen.push(doc.clone());
            pull_vip(doc)
        })
        .await
        .unwrap();
    assert_eq!(written, 1);
    assert_eq!(seen, [serde_json::json!(["vip", "beta"])]);

    // LIKE wildcards in the needle are literal
    let scope = TaskRepo::tenant_scope(&site)
        .expect("well-formed")
        .add(json_mentions(ent::Column::Tags, "v_p").unwrap());
    let hits = repo.find_all(scope).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "lookalike");
}

#[tokio::test]
async fn json_edit_matches_rows_not_in_compact_form() {
    let (conn, repo) = setup().await;
    let site = tenant();
    repo.create(new_task(&site, "imported", "PENDING")).await.unwrap();
    conn.execute_unprepared(r#"UPDATE tasks SET tags = '[ "vip",  "beta" ]'"#)
        .await
        .unwrap();

    let scope = TaskRepo::tenant_scope(&site).expect("well-formed");
    let written = repo
        .edit_json_documents(scope, ent::Column::Tags, pull_vip)
        .await
        .unwrap();
    assert_eq!(written, 1);

    let task = repo.find_one(Criteria::new().eq("title", "imported")).await.unwrap().unwrap();
    assert_eq!(task.tags, vec!["beta".to_owned()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn json_edit_gives_up_on_a_row_that_keeps_changing() {
    let (conn, repo) = setup().await;
    let site = tenant();
    let mut d = new_task(&site, "contended", "PENDING");
    d.tags = vec!["vip".into()];
    repo.create(d).await.unwrap();

    let scope = TaskRepo::tenant_scope(&site).expect("well-formed");
    let (err, writes, repo) = tokio::spawn(async move {
        let mut writes = 0_u32;
        let res = repo
            .edit_json_documents(scope, ent::Column::Tags, |doc| {
                // another writer lands between the read and the swap
                writes += 1;
                let sql = format!(r#"UPDATE tasks SET tags = '["vip","w{writes}"]'"#);
                tokio::task::block_in_place(|| {
                    tokio::runtime::Handle::current().block_on(conn.execute_unprepared(&sql))
                })
                .unwrap();
                pull_vip(doc)
            })
            .await;
        (res.unwrap_err(), writes, repo)
    })
    .await
    .unwrap();

    assert!(
        matches!(err, RepoError::Conflict { collection: "tasks", attempts: 5, .. }),
        "{err:?}"
    );
    assert_eq!(writes, 5);
    let task = repo.find_one(Criteria::new().eq("title", "contended")).await.unwrap().unwrap();
    assert_eq!(task.tags, vec!["vip".to_owned(), "w5".to_owned()]);
}

#[tokio::test]
async fn malformed_tenant_has_no_scope() {
    assert!(TaskRepo::tenant_scope("garbage").is_none());
}
