use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{PostTypeError, Result};

pub const ID_FIELD: &str = "_id";
pub const CREATED_DATE_FIELD: &str = "_createdDate";
pub const AUTHOR_FIELD: &str = "_author";
pub const AUTHOR_STATUS_FIELD: &str = "_authorStatus";
pub const DEFAULT_STATUS_FIELD: &str = "_status";

/// One stored instance of a post type
///
/// A record is a JSON object that always carries a string `_id`. All other
/// keys, including the well-known `_createdDate`, `_author`, the status
/// field and `_authorStatus`, are optional at this level; the schema and
/// the operation handlers decide which of them must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create an empty record with the given id
    pub fn new(id: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(ID_FIELD.to_string(), Value::String(id.into()));
        Self { fields }
    }

    /// Wrap a JSON object. Fails unless `_id` is a non-empty string.
    pub fn from_map(fields: Map<String, Value>) -> Result<Self> {
        match fields.get(ID_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => Ok(Self { fields }),
            Some(_) => Err(PostTypeError::InvalidRecord {
                reason: format!("{} must be a non-empty string", ID_FIELD),
            }),
            None => Err(PostTypeError::InvalidRecord {
                reason: format!("missing {}", ID_FIELD),
            }),
        }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(PostTypeError::InvalidRecord {
                reason: format!("expected an object, got {}", type_name(&other)),
            }),
        }
    }

    pub fn id(&self) -> &str {
        self.fields
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Id of the owning account, if any
    pub fn author(&self) -> Option<&str> {
        self.fields.get(AUTHOR_FIELD).and_then(Value::as_str)
    }

    /// Snapshot of the author's status taken when the record was last written
    pub fn author_status(&self) -> Option<i64> {
        self.fields.get(AUTHOR_STATUS_FIELD).and_then(Value::as_i64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Follow a dotted path (`address.city`) through nested objects
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.fields.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set a field. Writes to `_id` are ignored unless the value is a
    /// non-empty string.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if key == ID_FIELD && !matches!(&value, Value::String(s) if !s.is_empty()) {
            return;
        }
        self.fields.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if key == ID_FIELD {
            return None;
        }
        self.fields.remove(key)
    }

    /// Merge `patch` into this record
    ///
    /// Objects merge key by key, every other value replaces what was there.
    /// `_id` is never touched.
    pub fn merge(&mut self, patch: &Map<String, Value>) {
        for (key, value) in patch {
            if key == ID_FIELD {
                continue;
            }
            match (self.fields.get_mut(key), value) {
                (Some(Value::Object(existing)), Value::Object(incoming)) => {
                    merge_objects(existing, incoming);
                }
                _ => {
                    self.fields.insert(key.clone(), value.clone());
                }
            }
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

fn merge_objects(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_objects(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl TryFrom<Value> for Record {
    type Error = PostTypeError;

    fn try_from(value: Value) -> Result<Self> {
        Record::from_value(value)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_string_id() {
        assert!(Record::from_value(json!({"_id": "r1"})).is_ok());
        assert!(Record::from_value(json!({"title": "x"})).is_err());
        assert!(Record::from_value(json!({"_id": 7})).is_err());
        assert!(Record::from_value(json!({"_id": ""})).is_err());
        assert!(Record::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn test_id_cannot_be_overwritten_with_garbage() {
        let mut record = Record::new("r1");
        record.set(ID_FIELD, Value::Null);
        assert_eq!(record.id(), "r1");
        assert!(record.remove(ID_FIELD).is_none());
    }

    #[test]
    fn test_get_path_walks_nested_objects() {
        let record =
            Record::from_value(json!({"_id": "r1", "address": {"city": "Oslo"}})).unwrap();
        assert_eq!(record.get_path("address.city"), Some(&json!("Oslo")));
        assert_eq!(record.get_path("address.zip"), None);
        assert_eq!(record.get_path("missing.city"), None);
    }

    #[test]
    fn test_merge_is_deep_for_objects() {
        let mut record = Record::from_value(json!({
            "_id": "r1",
            "title": "old",
            "address": {"city": "Oslo", "zip": "0150"}
        }))
        .unwrap();

        let patch = json!({"_id": "evil", "title": "new", "address": {"city": "Bergen"}});
        record.merge(patch.as_object().unwrap());

        assert_eq!(record.id(), "r1");
        assert_eq!(record.get("title"), Some(&json!("new")));
        assert_eq!(record.get_path("address.city"), Some(&json!("Bergen")));
        assert_eq!(record.get_path("address.zip"), Some(&json!("0150")));
    }

    #[test]
    fn test_serde_goes_through_validation() {
        let ok: std::result::Result<Record, _> = serde_json::from_value(json!({"_id": "a"}));
        assert!(ok.is_ok());
        let bad: std::result::Result<Record, _> = serde_json::from_value(json!({"x": 1}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_author_accessors() {
        let record = Record::from_value(json!({
            "_id": "r1",
            "_author": "u1",
            "_authorStatus": 50
        }))
        .unwrap();
        assert_eq!(record.author(), Some("u1"));
        assert_eq!(record.author_status(), Some(50));
    }
}
