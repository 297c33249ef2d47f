use serde::Serialize;
use serde_json::Value;

use super::required::RequiredShape;
use super::values::{StatusLevel, StatusValues};
use crate::errors::Result;
use crate::model::{Messages, Record};

/// The fixed set of lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    New,
    RestoreByAdmin,
    RestoreByAuthor,
    Delete,
    Ban,
    Approve,
    Feature,
    RemoveFeatured,
}

impl Transition {
    pub const ALL: [Transition; 8] = [
        Transition::New,
        Transition::RestoreByAdmin,
        Transition::RestoreByAuthor,
        Transition::Delete,
        Transition::Ban,
        Transition::Approve,
        Transition::Feature,
        Transition::RemoveFeatured,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Transition::New => "set_new",
            Transition::RestoreByAdmin => "restore_by_admin",
            Transition::RestoreByAuthor => "restore_by_author",
            Transition::Delete => "set_deleted",
            Transition::Ban => "set_banned",
            Transition::Approve => "set_approved",
            Transition::Feature => "set_featured",
            Transition::RemoveFeatured => "remove_featured",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteOrRestore {
    Delete,
    Restore,
}

/// What a UI needs to render the moderation controls of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub status_name: String,
    pub status: i64,
    pub delete_or_restore: Option<DeleteOrRestore>,
    pub approve_enable: bool,
    pub featured_enable: bool,
    pub ban_enable: bool,
}

/// Lifecycle rules of one post type
///
/// All methods are pure. Transitions compute a status; writing it back is
/// up to the caller.
#[derive(Debug, Clone)]
pub struct StatusManager {
    values: StatusValues,
    status_field: String,
    required: RequiredShape,
}

impl StatusManager {
    /// # Errors
    ///
    /// Fails with `StatusOrderViolation` when `values` are not strictly increasing.
    pub fn new(
        values: StatusValues,
        status_field: impl Into<String>,
        required: RequiredShape,
    ) -> Result<Self> {
        values.validate()?;
        Ok(Self {
            values,
            status_field: status_field.into(),
            required,
        })
    }

    pub fn values(&self) -> &StatusValues {
        &self.values
    }

    pub fn status_field(&self) -> &str {
        &self.status_field
    }

    pub fn required_shape(&self) -> &RequiredShape {
        &self.required
    }

    pub fn value(&self, level: StatusLevel) -> i64 {
        self.values.value(level)
    }

    /// Read the status of a record as an integer
    ///
    /// An absent status field reads as the field default (`created`).
    /// Null, non-numeric and non-finite values read as 0.
    pub fn current_status(&self, record: &Record) -> i64 {
        match record.get(&self.status_field) {
            None => self.values.created,
            Some(value) => read_status(value),
        }
    }

    pub fn is_data_complete(&self, record: Option<&Record>) -> bool {
        self.required.is_satisfied_by(record.map(Record::as_map))
    }

    fn dynamic(&self, complete: bool) -> i64 {
        if complete {
            self.values.data_complete
        } else {
            self.values.created
        }
    }

    fn unchanged(&self, cur: i64) -> i64 {
        self.values.value(self.values.snap(cur))
    }

    /// Status `record` moves to under `transition`
    pub fn next_status(&self, transition: Transition, record: &Record) -> i64 {
        let cur = self.current_status(record);
        let complete = self.is_data_complete(Some(record));
        self.apply(transition, cur, complete)
    }

    /// Transition table over a raw status reading
    ///
    /// `cur == 0` is the falsy reading. The result is always one of the six
    /// configured values.
    pub fn apply(&self, transition: Transition, cur: i64, complete: bool) -> i64 {
        let v = &self.values;
        let falsy = cur == 0;
        match transition {
            Transition::New => {
                if falsy {
                    v.created
                } else {
                    self.dynamic(complete)
                }
            }
            Transition::RestoreByAdmin => {
                if cur < v.deleted {
                    self.dynamic(complete)
                } else {
                    self.unchanged(cur)
                }
            }
            Transition::RestoreByAuthor => {
                if falsy {
                    v.deleted
                } else if cur == v.deleted {
                    self.dynamic(complete)
                } else {
                    self.unchanged(cur)
                }
            }
            Transition::Delete => {
                if falsy || (cur > v.deleted && cur < v.featured) {
                    v.deleted
                } else {
                    self.unchanged(cur)
                }
            }
            Transition::Ban => {
                if falsy {
                    v.created
                } else if cur > v.banned && cur < v.featured {
                    v.banned
                } else {
                    self.unchanged(cur)
                }
            }
            Transition::Approve => {
                if falsy {
                    v.created
                } else if cur >= v.data_complete && cur < v.featured {
                    v.approved
                } else {
                    self.unchanged(cur)
                }
            }
            Transition::Feature => {
                if falsy {
                    v.created
                } else if cur >= v.data_complete {
                    v.featured
                } else {
                    self.unchanged(cur)
                }
            }
            Transition::RemoveFeatured => {
                if falsy {
                    v.created
                } else if cur == v.featured {
                    v.approved
                } else {
                    self.unchanged(cur)
                }
            }
        }
    }

    pub fn is_featured(&self, status: i64) -> bool {
        status >= self.values.featured
    }

    pub fn is_approved(&self, status: i64) -> bool {
        status >= self.values.approved
    }

    pub fn is_validated(&self, status: i64) -> bool {
        status >= self.values.data_complete
    }

    pub fn is_not_deleted(&self, status: i64) -> bool {
        status >= self.values.created
    }

    pub fn is_deleted(&self, status: i64) -> bool {
        status == self.values.deleted
    }

    pub fn is_banned(&self, status: i64) -> bool {
        status < self.values.deleted
    }

    /// Moderation summary of `record` with its status named from `messages`
    pub fn summary(&self, record: Option<&Record>, messages: &Messages) -> StatusSummary {
        let Some(record) = record else {
            return StatusSummary {
                status_name: "not found".to_string(),
                status: self.values.banned - 1,
                delete_or_restore: None,
                approve_enable: false,
                featured_enable: false,
                ban_enable: false,
            };
        };

        let v = &self.values;
        let cur = match self.current_status(record) {
            0 => v.created,
            status => status,
        };
        let delete_or_restore = if cur < v.created {
            DeleteOrRestore::Restore
        } else {
            DeleteOrRestore::Delete
        };
        let status_name = v
            .level_of(cur)
            .map(|level| messages.status_name(level))
            .unwrap_or(messages.status_created.as_str())
            .to_string();

        StatusSummary {
            status_name,
            status: cur,
            delete_or_restore: Some(delete_or_restore),
            approve_enable: cur >= v.data_complete && cur < v.approved,
            featured_enable: cur >= v.data_complete && cur < v.featured,
            ban_enable: cur > v.banned,
        }
    }
}

fn read_status(value: &Value) -> i64 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => n.trunc() as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::required::PrimitiveType;
    use serde_json::json;

    fn manager(required: RequiredShape) -> StatusManager {
        StatusManager::new(StatusValues::default(), "_status", required).unwrap()
    }

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn test_absent_status_reads_as_created() {
        let m = manager(RequiredShape::new());
        assert_eq!(m.current_status(&record(json!({"_id": "a"}))), 40);
    }

    #[test]
    fn test_garbage_status_reads_as_zero() {
        let m = manager(RequiredShape::new());
        assert_eq!(m.current_status(&record(json!({"_id": "a", "_status": null}))), 0);
        assert_eq!(m.current_status(&record(json!({"_id": "a", "_status": "abc"}))), 0);
        assert_eq!(m.current_status(&record(json!({"_id": "a", "_status": "100"}))), 100);
        assert_eq!(m.current_status(&record(json!({"_id": "a", "_status": true}))), 0);
    }

    #[test]
    fn test_set_new_on_absent_status_with_empty_shape() {
        let m = manager(RequiredShape::new());
        let r = record(json!({"_id": "a"}));
        assert_eq!(m.next_status(Transition::New, &r), 50);
    }

    #[test]
    fn test_set_new_falsy_is_created() {
        let m = manager(RequiredShape::new());
        assert_eq!(m.apply(Transition::New, 0, true), 40);
    }

    #[test]
    fn test_set_new_recomputes_dynamic_tier() {
        let m = manager(RequiredShape::new().require_type("title", PrimitiveType::String));
        let incomplete = record(json!({"_id": "a", "_status": 50}));
        let complete = record(json!({"_id": "a", "_status": 40, "title": "x"}));
        assert_eq!(m.next_status(Transition::New, &incomplete), 40);
        assert_eq!(m.next_status(Transition::New, &complete), 50);
    }

    #[test]
    fn test_restore_rules() {
        let m = manager(RequiredShape::new());
        assert_eq!(m.apply(Transition::RestoreByAdmin, 20, true), 50);
        assert_eq!(m.apply(Transition::RestoreByAdmin, 30, true), 30);
        assert_eq!(m.apply(Transition::RestoreByAuthor, 30, false), 40);
        assert_eq!(m.apply(Transition::RestoreByAuthor, 20, true), 20);
        assert_eq!(m.apply(Transition::RestoreByAuthor, 0, true), 30);
    }

    #[test]
    fn test_delete_ban_rules() {
        let m = manager(RequiredShape::new());
        assert_eq!(m.apply(Transition::Delete, 100, true), 30);
        assert_eq!(m.apply(Transition::Delete, 120, true), 120);
        assert_eq!(m.apply(Transition::Delete, 20, true), 20);
        assert_eq!(m.apply(Transition::Ban, 40, true), 20);
        assert_eq!(m.apply(Transition::Ban, 120, true), 120);
        assert_eq!(m.apply(Transition::Ban, 0, true), 40);
    }

    #[test]
    fn test_approve_feature_rules() {
        let m = manager(RequiredShape::new());
        assert_eq!(m.apply(Transition::Approve, 50, true), 100);
        assert_eq!(m.apply(Transition::Approve, 40, true), 40);
        assert_eq!(m.apply(Transition::Approve, 120, true), 120);
        assert_eq!(m.apply(Transition::Feature, 100, true), 120);
        assert_eq!(m.apply(Transition::Feature, 40, true), 40);
        assert_eq!(m.apply(Transition::RemoveFeatured, 120, true), 100);
        assert_eq!(m.apply(Transition::RemoveFeatured, 100, true), 100);
    }

    #[test]
    fn test_unchanged_snaps_to_configured_level() {
        let m = manager(RequiredShape::new());
        assert_eq!(m.apply(Transition::Delete, -5, true), 20);
        assert_eq!(m.apply(Transition::Approve, 45, true), 40);
        assert_eq!(m.apply(Transition::Feature, 999, true), 120);
    }

    #[test]
    fn test_predicates() {
        let m = manager(RequiredShape::new());
        assert!(m.is_banned(20));
        assert!(m.is_banned(0));
        assert!(!m.is_banned(30));
        assert!(m.is_deleted(30));
        assert!(!m.is_not_deleted(30));
        assert!(m.is_not_deleted(40));
        assert!(m.is_validated(50));
        assert!(!m.is_approved(50));
        assert!(m.is_approved(100));
        assert!(m.is_featured(120));
    }

    #[test]
    fn test_summary() {
        let m = manager(RequiredShape::new());
        let messages = Messages::for_post_type("post");

        let approved = m.summary(Some(&record(json!({"_id": "a", "_status": 100}))), &messages);
        assert_eq!(approved.status_name, "approved");
        assert_eq!(approved.delete_or_restore, Some(DeleteOrRestore::Delete));
        assert!(!approved.approve_enable);
        assert!(approved.featured_enable);
        assert!(approved.ban_enable);

        let deleted = m.summary(Some(&record(json!({"_id": "a", "_status": 30}))), &messages);
        assert_eq!(deleted.delete_or_restore, Some(DeleteOrRestore::Restore));

        let missing = m.summary(None, &messages);
        assert_eq!(missing.status_name, "not found");
        assert_eq!(missing.status, 19);
    }
}
