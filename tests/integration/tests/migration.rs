//! Bulk migration integration tests.

use huddle_integration_tests::{message, profile_with_bio, test_pipeline, SeededChatStore};
use huddle_pipeline::{MigrateOptions, ScopeFilter};

#[tokio::test]
async fn test_backfill_whole_store() {
    let mut store = SeededChatStore::with_messages(vec![
        message("m1", "W1", "C1", "u1", "standup at ten", 1000),
        message("m2", "W1", "C1", "u2", "deploy is green", 2000),
        message("m3", "W2", "C9", "u1", "different tenant", 3000),
    ]);
    store.add_profile(profile_with_bio("u1", "Ada", "compilers and rowing"));
    let ctx = test_pipeline(store);

    let report = ctx.migrate_all(MigrateOptions::default()).await.unwrap();
    assert_eq!(report.total_messages, 3);
    assert_eq!(report.total_bios, 1);
    assert_eq!(report.total_processed, 4);
    assert!(report.errors.is_empty());

    // backfilled records are queryable under their own tenant only
    let w1 = ctx
        .query_context("deploy", Some(ScopeFilter::workspace("W1")), Some(10))
        .await
        .unwrap();
    assert_eq!(w1.len(), 2);
    assert!(w1.iter().all(|r| r.id != "m3"));

    let w2 = ctx
        .query_context("tenant", Some(ScopeFilter::workspace("W2")), Some(10))
        .await
        .unwrap();
    assert_eq!(w2.len(), 1);
    assert_eq!(w2[0].id, "m3");
}

#[tokio::test]
async fn test_thread_messages_are_migrated() {
    let mut reply = message("t1", "W1", "C1", "u1", "reply in thread", 5000);
    reply.thread_id = Some("T1".into());
    let store = SeededChatStore::with_messages(vec![
        message("m1", "W1", "C1", "u1", "top level", 1000),
        reply,
    ]);
    let ctx = test_pipeline(store);

    let report = ctx.migrate_all(MigrateOptions::default()).await.unwrap();
    assert_eq!(report.total_messages, 2);

    let results = ctx
        .query_context("thread", Some(ScopeFilter::workspace("W1")), Some(10))
        .await
        .unwrap();
    let threaded = results.iter().find(|r| r.id == "t1").unwrap();
    assert_eq!(threaded.context, "workspace:W1/channel:C1/thread:T1");
}

#[tokio::test]
async fn test_rerun_does_not_duplicate() {
    let store = SeededChatStore::with_messages(vec![message(
        "m1", "W1", "C1", "u1", "only one", 1000,
    )]);
    let ctx = test_pipeline(store);

    ctx.migrate_all(MigrateOptions::default()).await.unwrap();
    ctx.migrate_all(MigrateOptions::default()).await.unwrap();

    assert_eq!(ctx.workspace_index().count().await.unwrap(), 1);
}
