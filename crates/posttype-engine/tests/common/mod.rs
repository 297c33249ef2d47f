//! Shared fixtures: a "user" account type, a moderated "post" type and a
//! handful of accounts at different status levels.

#![allow(dead_code)]

use posttype_core::schema::{FieldSchema, Visibility, WriteCondition};
use posttype_core::status::{PrimitiveType, RequiredShape};
use posttype_core::store::memory::seed;
use posttype_core::{MemoryRecordStore, PostTypeConfig, PostTypeRegistry, Record, RecordStore};
use posttype_core_types::{RequestContext, Sensitive};
use posttype_engine::Operations;
use serde_json::{json, Value};
use std::sync::Arc;

pub const MASTER_CODE: &str = "s3cret";

pub const BANNED: i64 = 20;
pub const DELETED: i64 = 30;
pub const CREATED: i64 = 40;
pub const DATA_COMPLETE: i64 = 50;
pub const APPROVED: i64 = 100;
pub const FEATURED: i64 = 120;

pub struct Fixture {
    pub ops: Operations,
    pub store: Arc<dyn RecordStore>,
    pub admin: Record,
    pub alice: Record,
    pub bob: Record,
    pub newbie: Record,
}

impl Fixture {
    /// Fixture over an in-memory store
    pub async fn new() -> Self {
        let store = MemoryRecordStore::new().with_unique("user", "email");
        Self::with_store(Arc::new(store)).await
    }

    pub async fn with_store(store: Arc<dyn RecordStore>) -> Self {
        let ops = Operations::new(Arc::new(registry()), store.clone());
        let admin = account(&store, "admin", FEATURED).await;
        let alice = account(&store, "alice", DATA_COMPLETE).await;
        let bob = account(&store, "bob", DATA_COMPLETE).await;
        let newbie = account(&store, "newbie", CREATED).await;
        Self {
            ops,
            store,
            admin,
            alice,
            bob,
            newbie,
        }
    }

    /// Store a post as-is, bypassing every check
    pub async fn post(&self, id: &str, author: &str, status: i64) -> Record {
        seed(
            self.store.as_ref(),
            "post",
            json!({
                "_id": id,
                "_author": author,
                "_authorStatus": DATA_COMPLETE,
                "_status": status,
                "title": format!("title of {}", id),
                "notes": "author notes",
                "audit": "admin audit"
            }),
        )
        .await
        .unwrap()
    }

    /// Raw stored status of a post
    pub async fn stored_status(&self, id: &str) -> Option<Value> {
        let record = self
            .store
            .find_one("post", &posttype_core::FindFilter::by_id(id))
            .await
            .unwrap()?;
        record.get("_status").cloned()
    }
}

pub fn ctx() -> RequestContext {
    RequestContext::new()
}

pub fn registry() -> PostTypeRegistry {
    let mut registry = PostTypeRegistry::new().with_account_type("user");
    registry
        .register(
            "user",
            PostTypeConfig::default(),
            FieldSchema::object()
                .property("name", FieldSchema::string())
                .property("email", FieldSchema::string()),
        )
        .unwrap();

    let config = PostTypeConfig {
        required_shape: RequiredShape::new().require_type("title", PrimitiveType::String),
        master_code: Some(Sensitive::new(MASTER_CODE.to_string())),
        ..PostTypeConfig::default()
    };
    registry
        .register(
            "post",
            config,
            FieldSchema::object()
                .property("title", FieldSchema::string().required())
                .property("body", FieldSchema::string())
                .property(
                    "notes",
                    FieldSchema::string().visible_to(Visibility::AuthorOrAdmin),
                )
                .property(
                    "audit",
                    FieldSchema::string()
                        .visible_to(Visibility::Admin)
                        .writable_by(WriteCondition::Admin),
                ),
        )
        .unwrap();
    registry
}

async fn account(store: &Arc<dyn RecordStore>, id: &str, status: i64) -> Record {
    seed(
        store.as_ref(),
        "user",
        json!({"_id": id, "_status": status, "name": id, "email": format!("{}@example.com", id)}),
    )
    .await
    .unwrap()
}
