#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{setup, site};
use coursekit_db::{Criteria, Repository};
use learning_store::models::{
    NewApiKey, NewCommunity, NewInvoice, NewLesson, NewPaymentPlan, NewSequence, NewSite,
    SequencePatch,
};
use learning_store::{
    ApiKeyRepository, CommunityRepository, InvoiceRepository, LessonRepository,
    PaymentPlanRepository, SequenceRepository, SiteRepository,
};
use serde_json::json;

#[tokio::test]
async fn sites_resolve_by_host_and_name() -> anyhow::Result<()> {
    let reg = setup().await;
    let x = site(&reg, "alpha", &[]).await;

    let sites = reg.sites();
    assert_eq!(sites.find_by_host("alpha.school.test").await?, Some(x.clone()));
    assert_eq!(sites.find_by_name("alpha").await?, Some(x));
    assert!(sites.find_by_name("beta").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn get_or_create_by_name_returns_the_existing_site() {
    let reg = setup().await;
    let draft = |host: &str| NewSite {
        name: "alpha".to_owned(),
        host: host.to_owned(),
        title: "Alpha".to_owned(),
        tags: Vec::new(),
    };

    let first = reg.sites().get_or_create_by_name(draft("a.test")).await.unwrap();
    let second = reg.sites().get_or_create_by_name(draft("b.test")).await.unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(second.entity.host, "a.test");
    assert_eq!(reg.sites().count(Criteria::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn lesson_and_community_lookups() {
    let reg = setup().await;
    let x = site(&reg, "alpha", &[]).await;
    let y = site(&reg, "beta", &[]).await;

    let lesson = reg
        .lessons()
        .create(NewLesson {
            domain: x.id.clone(),
            lesson_id: "l1".to_owned(),
            course_id: "c1".to_owned(),
            group_id: "g1".to_owned(),
            title: "Intro".to_owned(),
            kind: "text".to_owned(),
            content: json!({ "blocks": [{ "type": "paragraph", "text": "hi" }] }),
            requires_enrollment: true,
            published: false,
        })
        .await
        .unwrap();
    assert_eq!(reg.lessons().find_by_lesson_id(&x.id, "l1").await.unwrap(), Some(lesson));
    assert!(reg.lessons().find_by_lesson_id(&y.id, "l1").await.unwrap().is_none());

    let community = reg
        .communities()
        .create(NewCommunity {
            domain: x.id.clone(),
            community_id: "k1".to_owned(),
            name: "Makers".to_owned(),
            description: None,
            enabled: true,
            categories: vec!["General".to_owned()],
            default_payment_plan: None,
        })
        .await
        .unwrap();
    assert!(!community.deleted);
    assert_eq!(
        reg.communities().find_by_name(&x.id, "Makers").await.unwrap(),
        Some(community.clone())
    );
    assert_eq!(
        reg.communities().find_by_community_id(&x.id, "k1").await.unwrap(),
        Some(community)
    );
    assert!(reg.communities().find_by_name("bad", "Makers").await.unwrap().is_none());
}

#[tokio::test]
async fn billing_lookups() -> anyhow::Result<()> {
    let reg = setup().await;
    let x = site(&reg, "alpha", &[]).await;

    let plan = reg
        .payment_plans()
        .create(NewPaymentPlan {
            domain: x.id.clone(),
            plan_id: "pp1".to_owned(),
            name: "Monthly".to_owned(),
            kind: "subscription".to_owned(),
            entity_id: "c1".to_owned(),
            entity_type: "course".to_owned(),
            amount: 1900,
        })
        .await?;
    assert!(!plan.archived);
    assert_eq!(reg.payment_plans().find_by_plan_id(&x.id, "pp1").await?, Some(plan));

    let invoice = reg
        .invoices()
        .create(NewInvoice {
            domain: x.id.clone(),
            invoice_id: "inv1".to_owned(),
            membership_id: "m1".to_owned(),
            payment_plan_id: "pp1".to_owned(),
            amount: 1900,
            currency: "usd".to_owned(),
            status: "pending".to_owned(),
            payment_processor: "stripe".to_owned(),
            processor_transaction_id: None,
        })
        .await?;
    assert_eq!(
        reg.invoices().find_by_invoice_id(&x.id, "inv1").await?,
        Some(invoice)
    );
    assert!(reg.invoices().find_by_invoice_id(&x.id, "inv2").await?.is_none());

    let key = reg
        .api_keys()
        .create(NewApiKey {
            domain: x.id.clone(),
            key: "k-123".to_owned(),
            name: "zapier".to_owned(),
            purpose: None,
        })
        .await?;
    assert_eq!(reg.api_keys().find_by_key(&x.id, "k-123").await?, Some(key));
    assert!(reg.api_keys().find_by_key("garbage", "k-123").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn sequence_json_fields_are_replaced_on_update() {
    let reg = setup().await;
    let x = site(&reg, "alpha", &[]).await;

    let seq = reg
        .sequences()
        .create(NewSequence {
            domain: x.id.clone(),
            sequence_id: "s1".to_owned(),
            title: "Welcome".to_owned(),
            kind: "sequence".to_owned(),
            status: "draft".to_owned(),
            creator_id: "admin".to_owned(),
            trigger: json!({ "type": "tag_added", "data": "vip" }),
            emails: json!([{ "emailId": "e1", "delayInMillis": 0 }]),
            entrants: vec!["u1".to_owned()],
        })
        .await
        .unwrap();
    assert_eq!(
        reg.sequences().find_by_sequence_id(&x.id, "s1").await.unwrap(),
        Some(seq.clone())
    );

    let updated = reg
        .sequences()
        .update(
            &seq.id,
            SequencePatch {
                emails: Some(json!([])),
                entrants: Some(Vec::new()),
                ..SequencePatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.emails, json!([]));
    assert!(updated.entrants.is_empty());
    assert_eq!(updated.trigger, seq.trigger);
    assert_eq!(updated.title, "Welcome");
}
