//! `Command` dispatch and the boundary events every operation emits

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use posttype_core::logging_facility::test_capture::init_test_capture;
use posttype_core::{Command, ListRequest};
use posttype_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use posttype_core_types::{RequestContext, RequestId, Sensitive};
use posttype_engine::{apply_command, CommandResult};
use serde_json::json;

#[tokio::test]
async fn test_apply_create_then_read() {
    let fx = Fixture::new().await;

    let created = fx
        .ops
        .apply(
            &ctx(),
            Some(&fx.alice),
            Command::Create {
                post_type: "post".to_string(),
                record: Some(json!({"title": "via command"})),
            },
        )
        .await
        .unwrap();
    let CommandResult::Mutation(response) = created else {
        panic!("expected a mutation result");
    };
    let id = response.record().unwrap()["_id"].as_str().unwrap().to_string();

    let read = apply_command(
        &fx.ops,
        &ctx(),
        None,
        Command::ReadOne {
            post_type: "post".to_string(),
            id: id.clone(),
        },
    )
    .await
    .unwrap();
    assert_eq!(read.into_value()["title"], json!("via command"));
}

#[tokio::test]
async fn test_apply_feature_with_sensitive_code() {
    let fx = Fixture::new().await;
    fx.post("p1", "alice", APPROVED).await;

    let result = fx
        .ops
        .apply(
            &ctx(),
            Some(&fx.admin),
            Command::Feature {
                post_type: "post".to_string(),
                id: "p1".to_string(),
                master_code: Some(Sensitive::new(MASTER_CODE.to_string())),
            },
        )
        .await
        .unwrap();
    assert_eq!(result.into_value()["record"]["_status"], json!(FEATURED));
}

#[tokio::test]
async fn test_apply_read_many_serializes_page() {
    let fx = Fixture::new().await;
    fx.post("p1", "alice", APPROVED).await;

    let result = fx
        .ops
        .apply(
            &ctx(),
            None,
            Command::ReadMany {
                post_type: "post".to_string(),
                request: ListRequest::default(),
            },
        )
        .await
        .unwrap();
    let value = result.into_value();
    assert_eq!(value["items"][0]["_id"], json!("p1"));
    assert_eq!(value["pageInfo"]["itemCount"], json!(1));
}

#[tokio::test]
async fn test_apply_read_missing_is_null() {
    let fx = Fixture::new().await;
    let result = fx
        .ops
        .apply(
            &ctx(),
            None,
            Command::ReadOne {
                post_type: "post".to_string(),
                id: "nope".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(result, CommandResult::One(None));
    assert!(result.into_value().is_null());
}

#[tokio::test]
async fn test_mutation_emits_start_and_end() {
    let capture = init_test_capture();
    let fx = Fixture::new().await;
    fx.post("log-approve-1", "alice", DATA_COMPLETE).await;

    let response = fx
        .ops
        .approve(&ctx(), "post", Some(&fx.admin), "log-approve-1")
        .await;
    assert!(!response.is_error());

    let events: Vec<_> = capture
        .events_for_op("approve")
        .into_iter()
        .filter(|e| e.field("record_id") == Some("log-approve-1"))
        .collect();
    let kinds: Vec<_> = events.iter().filter_map(|e| e.event.as_deref()).collect();
    assert_eq!(kinds, vec![EVENT_START, EVENT_END]);
    assert!(events.iter().all(|e| e.field("post_type") == Some("post")));
    assert!(events[1].field("duration_ms").is_some());
}

#[tokio::test]
async fn test_failed_mutation_emits_error_event() {
    let capture = init_test_capture();
    let fx = Fixture::new().await;

    let response = fx
        .ops
        .ban(&ctx(), "post", Some(&fx.admin), "log-ban-missing")
        .await;
    assert!(response.is_error());

    let errors: Vec<_> = capture
        .events_for_op("ban")
        .into_iter()
        .filter(|e| {
            e.field("record_id") == Some("log-ban-missing")
                && e.event.as_deref() == Some(EVENT_END_ERROR)
        })
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("err.code"), Some("ERR_NOT_FOUND"));
    assert_eq!(errors[0].field("err.kind"), Some("NotFound"));
}

#[tokio::test]
async fn test_read_error_carries_request_context() {
    let fx = Fixture::new().await;
    let ctx = RequestContext::with_request_id(RequestId::from_string("req-42".to_string()))
        .with_caller_id("alice");

    let err = fx
        .ops
        .read_many(&ctx, "article", Some(&fx.alice), &ListRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.op(), Some("read_many"));
    assert_eq!(err.request_id().map(RequestId::as_str), Some("req-42"));
}
