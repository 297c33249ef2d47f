use serde_json::{Map, Value};

use super::path::FieldPath;
use super::result::InputFilterResult;
use crate::auth::AuthContext;
use crate::errors::FieldViolation;
use crate::schema::{FieldContext, FieldSchema, ValueType, WriteCondition};

pub const MISSING_MESSAGE: &str = "required";
pub const DENIED_MESSAGE: &str = "access denied";

/// Sanitize caller-supplied fields against `schema`
///
/// Read-only and disabled fields are never taken. Fields the caller may
/// not write are dropped and, if supplied, reported as denied. Every
/// remaining value is type-checked, validated and pattern-matched; all
/// violations across the record are collected.
pub fn filter_input(
    auth: &AuthContext,
    input: Option<&Value>,
    schema: &FieldSchema,
) -> InputFilterResult {
    let mut result = InputFilterResult::default();
    let root = FieldPath::root();
    match input {
        Some(Value::Object(map)) => {
            let sanitized = walk(auth, map, schema, &root, &mut result);
            result.record = Some(sanitized);
        }
        _ => {
            if schema.requires_anything() {
                result
                    .missing
                    .push(FieldViolation::new(root.to_string(), MISSING_MESSAGE));
            }
        }
    }
    tracing::debug!(
        missing = result.missing.len(),
        invalid = result.invalid.len(),
        denied = result.denied.len(),
        "input filtered"
    );
    result
}

fn may_write(auth: &AuthContext, condition: WriteCondition) -> bool {
    match condition {
        WriteCondition::Everyone => true,
        WriteCondition::AuthorOrAdmin => auth.editor_is_author_or_admin,
        WriteCondition::Admin => auth.editor_is_admin,
    }
}

fn walk(
    auth: &AuthContext,
    object: &Map<String, Value>,
    schema: &FieldSchema,
    path: &FieldPath,
    out: &mut InputFilterResult,
) -> Map<String, Value> {
    let mut sanitized = Map::new();

    for (key, field) in &schema.properties {
        if field.meta.read_only || field.meta.disabled {
            continue;
        }
        let value = object.get(key);
        let field_path = path.child(key);

        if !may_write(auth, field.meta.write) {
            if value.is_some() {
                out.denied
                    .push(FieldViolation::new(field_path.to_string(), DENIED_MESSAGE));
            }
            continue;
        }

        if field.is_nested() {
            let required = field.requires_anything();
            match value {
                Some(Value::Object(inner)) => {
                    let nested = walk(auth, inner, field, &field_path, out);
                    sanitized.insert(key.clone(), Value::Object(nested));
                }
                Some(Value::Null) if !required => {
                    sanitized.insert(key.clone(), Value::Null);
                }
                _ if required => {
                    out.missing
                        .push(FieldViolation::new(field_path.to_string(), MISSING_MESSAGE));
                }
                // partial optional objects are allowed
                _ => {}
            }
            continue;
        }

        let required = field.meta.required;
        let value = match value {
            None | Some(Value::Null) => {
                if required {
                    out.missing
                        .push(FieldViolation::new(field_path.to_string(), MISSING_MESSAGE));
                } else if value.is_some() {
                    sanitized.insert(key.clone(), Value::Null);
                }
                continue;
            }
            Some(value) => value,
        };

        if required && is_blank_string(field.value_type, value) {
            out.missing
                .push(FieldViolation::new(field_path.to_string(), MISSING_MESSAGE));
            continue;
        }

        let ctx = FieldContext {
            record: object,
            key,
            value: Some(value),
        };
        if leaf_is_valid(field, value, &ctx) {
            sanitized.insert(key.clone(), value.clone());
        } else {
            let message = field
                .meta
                .validation_message
                .clone()
                .unwrap_or_else(|| field.value_type.default_invalid_message().to_string());
            out.invalid
                .push(FieldViolation::new(field_path.to_string(), message));
            if required && is_falsy(value) {
                out.missing
                    .push(FieldViolation::new(field_path.to_string(), MISSING_MESSAGE));
            }
        }
    }

    sanitized
}

fn leaf_is_valid(field: &FieldSchema, value: &Value, ctx: &FieldContext<'_>) -> bool {
    if !type_matches(field, value) {
        return false;
    }
    if let Some(validator) = &field.meta.validator {
        if !validator.check(ctx) {
            return false;
        }
    }
    if let Some(pattern) = &field.meta.pattern {
        return match value {
            Value::Array(elements) => elements
                .iter()
                .all(|element| pattern.is_match(&stringify(element))),
            scalar => pattern.is_match(&stringify(scalar)),
        };
    }
    true
}

fn type_matches(field: &FieldSchema, value: &Value) -> bool {
    if !field.value_type.accepts(value) {
        return false;
    }
    match (value, &field.items) {
        (Value::Array(elements), Some(items)) => elements
            .iter()
            .all(|element| items.value_type.accepts(element)),
        _ => true,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_blank_string(value_type: ValueType, value: &Value) -> bool {
    matches!(
        value_type,
        ValueType::String | ValueType::Date | ValueType::Id
    ) && value.as_str().is_some_and(str::is_empty)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Validator, Visibility};
    use regex::Regex;
    use serde_json::json;

    fn editor(admin: bool, author: bool) -> AuthContext {
        AuthContext {
            editor_is_author: author,
            editor_is_admin: admin,
            editor_is_author_or_admin: admin || author,
            editor_is_not_deleted: true,
            editor_is_validated: true,
            author_is_not_deleted: true,
        }
    }

    #[test]
    fn test_empty_required_string_is_missing_and_dropped() {
        let schema = FieldSchema::object().property("title", FieldSchema::string().required());
        let result = filter_input(&editor(false, true), Some(&json!({"title": ""})), &schema);

        assert_eq!(result.missing.len(), 1);
        assert_eq!(result.missing[0].path, "record.title");
        assert!(result.invalid.is_empty());
        assert!(!result.record.unwrap().contains_key("title"));
    }

    #[test]
    fn test_read_only_and_disabled_are_skipped() {
        let schema = FieldSchema::object()
            .property("_status", FieldSchema::integer().read_only())
            .property("legacy", FieldSchema::string().disabled());
        let result = filter_input(
            &editor(true, true),
            Some(&json!({"_status": 120, "legacy": "x"})),
            &schema,
        );
        assert!(result.record.as_ref().unwrap().is_empty());
        assert!(result.errors().is_empty());
        assert!(result.denied.is_empty());
    }

    #[test]
    fn test_admin_only_field_denied_for_author() {
        let schema = FieldSchema::object()
            .property("promoted", FieldSchema::boolean().writable_by(WriteCondition::Admin))
            .property("title", FieldSchema::string());
        let input = json!({"promoted": true, "title": "Hi"});

        let result = filter_input(&editor(false, true), Some(&input), &schema);
        assert_eq!(result.denied.len(), 1);
        assert_eq!(result.denied[0].path, "record.promoted");
        let record = result.record.unwrap();
        assert!(!record.contains_key("promoted"));
        assert_eq!(record["title"], json!("Hi"));

        let admin = filter_input(&editor(true, false), Some(&input), &schema);
        assert!(admin.denied.is_empty());
        assert_eq!(admin.record.unwrap()["promoted"], json!(true));
    }

    #[test]
    fn test_absent_restricted_field_is_not_denied() {
        let schema = FieldSchema::object()
            .property("promoted", FieldSchema::boolean().writable_by(WriteCondition::Admin));
        let result = filter_input(&editor(false, false), Some(&json!({})), &schema);
        assert!(result.denied.is_empty());
    }

    #[test]
    fn test_type_and_pattern_violations() {
        let schema = FieldSchema::object()
            .property("age", FieldSchema::integer())
            .property(
                "slug",
                FieldSchema::string()
                    .pattern(Regex::new("^[a-z-]+$").unwrap())
                    .validation_message("lowercase letters and dashes only"),
            );
        let result = filter_input(
            &editor(false, true),
            Some(&json!({"age": "ten", "slug": "Hello World"})),
            &schema,
        );

        let errors = result.errors();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| e.path == "record.age" && e.message == "must be an integer"));
        assert!(errors.iter().any(
            |e| e.path == "record.slug" && e.message == "lowercase letters and dashes only"
        ));
    }

    #[test]
    fn test_null_clears_optional_field_bypassing_pattern() {
        let schema = FieldSchema::object().property(
            "slug",
            FieldSchema::string().pattern(Regex::new("^[a-z]+$").unwrap()),
        );
        let result = filter_input(&editor(false, true), Some(&json!({"slug": null})), &schema);
        assert!(result.errors().is_empty());
        assert_eq!(result.record.unwrap()["slug"], Value::Null);
    }

    #[test]
    fn test_null_on_required_is_missing() {
        let schema = FieldSchema::object().property("title", FieldSchema::string().required());
        let result = filter_input(&editor(false, true), Some(&json!({"title": null})), &schema);
        assert_eq!(result.missing.len(), 1);
    }

    #[test]
    fn test_required_pattern_mismatch_with_falsy_value_reports_missing_only() {
        let schema = FieldSchema::object().property(
            "code",
            FieldSchema::number()
                .required()
                .pattern(Regex::new("^[1-9][0-9]*$").unwrap()),
        );
        let result = filter_input(&editor(false, true), Some(&json!({"code": 0})), &schema);

        assert_eq!(result.invalid.len(), 1);
        assert_eq!(result.missing.len(), 1);
        let errors = result.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, MISSING_MESSAGE);
    }

    #[test]
    fn test_array_elements_checked_individually() {
        let schema = FieldSchema::object().property(
            "tags",
            FieldSchema::array(FieldSchema::string()).pattern(Regex::new("^#").unwrap()),
        );
        let ok = filter_input(&editor(false, true), Some(&json!({"tags": ["#a", "#b"]})), &schema);
        assert!(ok.errors().is_empty());

        let bad_pattern =
            filter_input(&editor(false, true), Some(&json!({"tags": ["#a", "b"]})), &schema);
        assert_eq!(bad_pattern.invalid.len(), 1);

        let bad_type = filter_input(&editor(false, true), Some(&json!({"tags": ["#a", 3]})), &schema);
        assert_eq!(bad_type.invalid.len(), 1);
    }

    #[test]
    fn test_custom_validator_sees_sibling_fields() {
        let schema = FieldSchema::object()
            .property("min", FieldSchema::number())
            .property(
                "max",
                FieldSchema::number().validator(Validator::new(|ctx| {
                    let min = ctx.record.get("min").and_then(Value::as_f64).unwrap_or(0.0);
                    ctx.value.and_then(Value::as_f64).is_some_and(|max| max >= min)
                })),
            );

        let ok = filter_input(&editor(false, true), Some(&json!({"min": 1, "max": 5})), &schema);
        assert!(ok.errors().is_empty());
        let bad = filter_input(&editor(false, true), Some(&json!({"min": 9, "max": 5})), &schema);
        assert_eq!(bad.invalid[0].path, "record.max");
        assert_eq!(bad.invalid[0].message, "must be a number");
    }

    #[test]
    fn test_nested_objects() {
        let schema = FieldSchema::object()
            .property(
                "address",
                FieldSchema::object()
                    .property("city", FieldSchema::string().required())
                    .property("zip", FieldSchema::string()),
            )
            .property(
                "social",
                FieldSchema::object().property("site", FieldSchema::string()),
            );

        let missing = filter_input(&editor(false, true), Some(&json!({"social": "x"})), &schema);
        assert_eq!(missing.missing.len(), 1);
        assert_eq!(missing.missing[0].path, "record.address");
        assert!(!missing.record.unwrap().contains_key("social"));

        let partial = filter_input(
            &editor(false, true),
            Some(&json!({"address": {"zip": "0150"}})),
            &schema,
        );
        assert_eq!(partial.missing[0].path, "record.address.city");
    }

    #[test]
    fn test_non_object_input() {
        let optional = FieldSchema::object().property("title", FieldSchema::string());
        let result = filter_input(&editor(false, true), Some(&json!("nope")), &optional);
        assert!(result.record.is_none());
        assert!(result.errors().is_empty());

        let required = FieldSchema::object().property("title", FieldSchema::string().required());
        let result = filter_input(&editor(false, true), None, &required);
        assert_eq!(result.missing[0].path, "record");
    }

    #[test]
    fn test_visibility_does_not_affect_writes() {
        let schema = FieldSchema::object()
            .property("secret", FieldSchema::string().visible_to(Visibility::Admin));
        let result = filter_input(&editor(false, true), Some(&json!({"secret": "s"})), &schema);
        assert_eq!(result.record.unwrap()["secret"], json!("s"));
    }
}
