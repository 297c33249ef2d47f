use posttype_core::schema::FieldSchema;
use posttype_core::status::{RequiredShape, StatusValues};
use posttype_core::{AuthContext, PostType, PostTypeConfig, Record, StatusManager};
use serde_json::Value;

/// Status manager with the default thresholds (20/30/40/50/100/120)
#[allow(dead_code)]
pub fn default_manager() -> StatusManager {
    StatusManager::new(StatusValues::default(), "_status", RequiredShape::new()).unwrap()
}

#[allow(dead_code)]
pub fn manager_with(required: RequiredShape) -> StatusManager {
    StatusManager::new(StatusValues::default(), "_status", required).unwrap()
}

#[allow(dead_code)]
pub fn record(value: Value) -> Record {
    Record::from_value(value).unwrap()
}

/// Auth context with explicit role flags and a non-deleted author
#[allow(dead_code)]
pub fn auth(admin: bool, author: bool) -> AuthContext {
    AuthContext {
        editor_is_author: author,
        editor_is_admin: admin,
        editor_is_author_or_admin: admin || author,
        editor_is_not_deleted: true,
        editor_is_validated: true,
        author_is_not_deleted: true,
    }
}

/// "post" type with a title, a body, author-only notes and admin-only audit
#[allow(dead_code)]
pub fn post_type() -> PostType {
    let schema = FieldSchema::object()
        .property("title", FieldSchema::string())
        .property("body", FieldSchema::string())
        .property(
            "notes",
            FieldSchema::string().visible_to(posttype_core::schema::Visibility::AuthorOrAdmin),
        )
        .property(
            "audit",
            FieldSchema::string().visible_to(posttype_core::schema::Visibility::Admin),
        );
    PostType::new("post", PostTypeConfig::default(), schema, Some("user")).unwrap()
}
