use serde_json::{Map, Value};

use crate::auth::AuthContext;
use crate::model::{Record, AUTHOR_STATUS_FIELD, ID_FIELD};
use crate::schema::{FieldContext, FieldSchema, Visibility};
use crate::status::StatusManager;

/// Redact `record` for the caller described by `auth`
///
/// Fields outside the schema never leave. When the record is deleted,
/// banned, or written by a deleted author, callers without the matching
/// role only get `_id`, the status field and `_authorStatus`. Required
/// fields that end up hidden are emitted as empty placeholders.
pub fn filter_output(
    auth: &AuthContext,
    record: &Record,
    schema: &FieldSchema,
    status: &StatusManager,
) -> Map<String, Value> {
    let current = status.current_status(record);
    let hidden_as_deleted = !status.is_not_deleted(current) && !auth.editor_is_author_or_admin;
    let hidden_as_banned = status.is_banned(current) && !auth.editor_is_admin;
    let hidden_by_author = !auth.author_is_not_deleted && !auth.editor_is_admin;
    let gated = hidden_as_deleted || hidden_as_banned || hidden_by_author;

    if gated {
        tracing::debug!(
            record_id = record.id(),
            status = current,
            "record content hidden from caller"
        );
    }

    let exempt = |key: &str| {
        key == ID_FIELD || key == status.status_field() || key == AUTHOR_STATUS_FIELD
    };

    let mut out = Map::new();
    for (key, field) in &schema.properties {
        if gated && !exempt(key) {
            backfill(&mut out, key, field);
            continue;
        }
        redact_field(auth, record.as_map(), key, field, &mut out);
    }
    out
}

fn redact_object(
    auth: &AuthContext,
    object: &Map<String, Value>,
    schema: &FieldSchema,
) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, field) in &schema.properties {
        redact_field(auth, object, key, field, &mut out);
    }
    out
}

fn redact_field(
    auth: &AuthContext,
    object: &Map<String, Value>,
    key: &str,
    field: &FieldSchema,
    out: &mut Map<String, Value>,
) {
    let value = object.get(key);
    let ctx = FieldContext {
        record: object,
        key,
        value,
    };
    let allowed = match field.meta.visibility.resolve(&ctx) {
        Visibility::Everyone => true,
        Visibility::Admin => auth.editor_is_admin,
        Visibility::AuthorOrAdmin => auth.editor_is_author_or_admin,
    };

    if allowed {
        match value {
            Some(Value::Object(inner)) if field.is_nested() => {
                out.insert(key.to_string(), Value::Object(redact_object(auth, inner, field)));
            }
            Some(_) if field.is_nested() => {}
            Some(value) => {
                out.insert(key.to_string(), value.clone());
            }
            None => {}
        }
    }
    backfill(out, key, field);
}

fn backfill(out: &mut Map<String, Value>, key: &str, field: &FieldSchema) {
    if !field.meta.required {
        return;
    }
    if matches!(out.get(key), None | Some(Value::Null)) {
        out.insert(key.to_string(), placeholder(field));
    }
}

fn placeholder(field: &FieldSchema) -> Value {
    if field.is_nested() {
        let mut object = Map::new();
        for (key, child) in &field.properties {
            backfill(&mut object, key, child);
        }
        Value::Object(object)
    } else {
        field.value_type.empty_value()
    }
}
