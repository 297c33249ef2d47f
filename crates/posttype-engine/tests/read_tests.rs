//! Read-one redaction, read-many scopes and paging, status summaries

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use posttype_core::errors::PtErrorKind;
use posttype_core::policy::AllowAllListPolicy;
use posttype_core::status::DeleteOrRestore;
use posttype_core::store::memory::seed;
use posttype_core::{ListRequest, ListScope};
use serde_json::{json, Value};
use std::sync::Arc;

fn ids(items: &[Value]) -> Vec<&str> {
    items.iter().map(|v| v["_id"].as_str().unwrap()).collect()
}

async fn listing_fixture() -> Fixture {
    let fx = Fixture::new().await;
    fx.post("a1", "alice", APPROVED).await;
    fx.post("a2", "bob", FEATURED).await;
    fx.post("a3", "alice", DATA_COMPLETE).await;
    fx.post("a4", "alice", DELETED).await;
    fx.post("a5", "bob", BANNED).await;
    fx
}

fn request(author: Option<&str>, scope: Option<ListScope>) -> ListRequest {
    ListRequest {
        author: author.map(str::to_string),
        scope,
        ..ListRequest::default()
    }
}

#[tokio::test]
async fn test_read_one_missing_is_none() {
    let fx = Fixture::new().await;
    let found = fx.ops.read_one(&ctx(), "post", None, "nope").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_read_one_unknown_post_type() {
    let fx = Fixture::new().await;
    let err = fx
        .ops
        .read_one(&ctx(), "article", None, "p1")
        .await
        .unwrap_err();
    assert_eq!(err.op(), Some("read_one"));
    assert_eq!(err.post_type(), Some("article"));
}

#[tokio::test]
async fn test_read_one_hides_restricted_fields() {
    let fx = Fixture::new().await;
    fx.post("p1", "alice", APPROVED).await;

    let stranger = fx
        .ops
        .read_one(&ctx(), "post", Some(&fx.bob), "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stranger["title"], json!("title of p1"));
    assert!(stranger.get("notes").is_none());
    assert!(stranger.get("audit").is_none());

    let author = fx
        .ops
        .read_one(&ctx(), "post", Some(&fx.alice), "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(author["notes"], json!("author notes"));
    assert!(author.get("audit").is_none());

    let admin = fx
        .ops
        .read_one(&ctx(), "post", Some(&fx.admin), "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin["audit"], json!("admin audit"));
}

#[tokio::test]
async fn test_banned_record_read_by_its_author() {
    let fx = Fixture::new().await;
    fx.post("p1", "alice", BANNED).await;

    let seen = fx
        .ops
        .read_one(&ctx(), "post", Some(&fx.alice), "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        seen,
        json!({"_id": "p1", "_status": BANNED, "_authorStatus": DATA_COMPLETE, "title": ""})
    );

    let admin = fx
        .ops
        .read_one(&ctx(), "post", Some(&fx.admin), "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin["title"], json!("title of p1"));
}

#[tokio::test]
async fn test_deleted_record_visible_to_author_only() {
    let fx = Fixture::new().await;
    fx.post("p1", "alice", DELETED).await;

    let author = fx
        .ops
        .read_one(&ctx(), "post", Some(&fx.alice), "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(author["title"], json!("title of p1"));

    let stranger = fx
        .ops
        .read_one(&ctx(), "post", Some(&fx.bob), "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stranger["title"], json!(""));
    assert!(stranger.get("_author").is_none());
}

#[tokio::test]
async fn test_records_of_deleted_accounts_are_hidden() {
    let fx = Fixture::new().await;
    seed(
        fx.store.as_ref(),
        "user",
        json!({"_id": "ghost", "_status": DELETED, "name": "ghost"}),
    )
    .await
    .unwrap();
    fx.post("p1", "ghost", APPROVED).await;

    let stranger = fx
        .ops
        .read_one(&ctx(), "post", Some(&fx.bob), "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stranger["title"], json!(""));

    let admin = fx
        .ops
        .read_one(&ctx(), "post", Some(&fx.admin), "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin["title"], json!("title of p1"));
}

#[tokio::test]
async fn test_author_status_snapshot_when_account_is_gone() {
    let fx = Fixture::new().await;
    seed(
        fx.store.as_ref(),
        "post",
        json!({"_id": "p1", "_author": "vanished", "_authorStatus": DELETED, "_status": APPROVED, "title": "t"}),
    )
    .await
    .unwrap();

    let seen = fx
        .ops
        .read_one(&ctx(), "post", None, "p1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen["title"], json!(""));
}

#[tokio::test]
async fn test_read_many_anonymous_defaults_to_approved() {
    let fx = listing_fixture().await;
    let page = fx
        .ops
        .read_many(&ctx(), "post", None, &ListRequest::default())
        .await
        .unwrap();

    assert_eq!(ids(&page.items), vec!["a2", "a1"]);
    assert_eq!(page.page_info.item_count, 2);
    assert!(page.items[1].get("notes").is_none());
}

#[tokio::test]
async fn test_read_many_rejects_scope_outside_whitelist() {
    let fx = listing_fixture().await;

    let anonymous = fx
        .ops
        .read_many(&ctx(), "post", None, &request(None, Some(ListScope::Deleted)))
        .await
        .unwrap_err();
    assert_eq!(anonymous.kind(), PtErrorKind::AccessDenied);
    assert_eq!(anonymous.message(), "access denied");

    let foreign = fx
        .ops
        .read_many(
            &ctx(),
            "post",
            Some(&fx.alice),
            &request(Some("bob"), Some(ListScope::Deleted)),
        )
        .await
        .unwrap_err();
    assert_eq!(foreign.kind(), PtErrorKind::AccessDenied);
}

#[tokio::test]
async fn test_read_many_own_records() {
    let fx = listing_fixture().await;

    let deleted = fx
        .ops
        .read_many(
            &ctx(),
            "post",
            Some(&fx.alice),
            &request(Some("alice"), Some(ListScope::Deleted)),
        )
        .await
        .unwrap();
    assert_eq!(ids(&deleted.items), vec!["a4"]);
    assert_eq!(deleted.items[0]["notes"], json!("author notes"));

    let live = fx
        .ops
        .read_many(
            &ctx(),
            "post",
            Some(&fx.alice),
            &request(Some("alice"), Some(ListScope::NotDeleted)),
        )
        .await
        .unwrap();
    assert_eq!(ids(&live.items), vec!["a3", "a1"]);
}

#[tokio::test]
async fn test_read_many_admin_sees_every_scope() {
    let fx = listing_fixture().await;

    let all = fx
        .ops
        .read_many(&ctx(), "post", Some(&fx.admin), &ListRequest::default())
        .await
        .unwrap();
    assert_eq!(ids(&all.items), vec!["a5", "a4", "a3", "a2", "a1"]);

    let banned = fx
        .ops
        .read_many(
            &ctx(),
            "post",
            Some(&fx.admin),
            &request(None, Some(ListScope::Banned)),
        )
        .await
        .unwrap();
    assert_eq!(ids(&banned.items), vec!["a5"]);
}

#[tokio::test]
async fn test_read_many_paging() {
    let fx = listing_fixture().await;
    let page = fx
        .ops
        .read_many(
            &ctx(),
            "post",
            Some(&fx.admin),
            &ListRequest {
                page: Some(2),
                per_page: Some(2),
                ..ListRequest::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(ids(&page.items), vec!["a3", "a2"]);
    assert_eq!(page.page_info.current_page, 2);
    assert_eq!(page.page_info.page_count, 3);
    assert_eq!(page.page_info.item_count, 5);
    assert!(page.page_info.has_next_page);
    assert!(page.page_info.has_previous_page);
}

#[tokio::test]
async fn test_read_many_clamps_page_size() {
    let fx = listing_fixture().await;
    let page = fx
        .ops
        .read_many(
            &ctx(),
            "post",
            Some(&fx.admin),
            &ListRequest {
                per_page: Some(10_000),
                ..ListRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.page_info.per_page, 100);
}

#[tokio::test]
async fn test_read_many_with_custom_policy() {
    let fx = listing_fixture().await;
    let ops = fx.ops.clone().with_policy(Arc::new(AllowAllListPolicy));

    let page = ops
        .read_many(&ctx(), "post", None, &request(None, Some(ListScope::Deleted)))
        .await
        .unwrap();
    assert_eq!(ids(&page.items), vec!["a4"]);
    // listing does not bypass redaction
    assert_eq!(page.items[0]["title"], json!(""));
}

#[tokio::test]
async fn test_status_summary() {
    let fx = listing_fixture().await;

    let summary = fx.ops.status_summary(&ctx(), "post", "a3").await.unwrap();
    assert_eq!(summary.status_name, "data complete");
    assert_eq!(summary.status, DATA_COMPLETE);
    assert_eq!(summary.delete_or_restore, Some(DeleteOrRestore::Delete));
    assert!(summary.approve_enable);
    assert!(summary.featured_enable);
    assert!(summary.ban_enable);

    let banned = fx.ops.status_summary(&ctx(), "post", "a5").await.unwrap();
    assert_eq!(banned.delete_or_restore, Some(DeleteOrRestore::Restore));
    assert!(!banned.ban_enable);

    let missing = fx
        .ops
        .status_summary(&ctx(), "post", "nope")
        .await
        .unwrap_err();
    assert_eq!(missing.message(), "Post not found");
}
