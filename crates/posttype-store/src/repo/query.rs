//! Translation of `FindFilter` into a SQL `WHERE` clause
//!
//! Field names are turned into quoted JSON paths and bound as parameters;
//! nothing caller-supplied is spliced into the SQL text.

use posttype_core::model::AUTHOR_FIELD;
use posttype_core::store::FindFilter;
use rusqlite::types::Value as SqlValue;
use serde_json::Value;

use crate::errors::{invalid_field_name, Result};

/// JSON path addressing a top-level field of the record body
pub(crate) fn json_path(field: &str) -> Result<String> {
    if field.is_empty() || field.contains(['"', '\\']) || field.chars().any(char::is_control) {
        return Err(invalid_field_name(field));
    }
    Ok(format!("$.\"{}\"", field))
}

/// `WHERE` clause text plus its parameters, in order
#[derive(Debug, Default)]
pub(crate) struct WhereClause {
    conditions: Vec<String>,
    pub(crate) params: Vec<SqlValue>,
}

impl WhereClause {
    fn push(&mut self, condition: &str, params: impl IntoIterator<Item = SqlValue>) {
        self.conditions.push(condition.to_string());
        self.params.extend(params);
    }

    pub(crate) fn sql(&self) -> String {
        self.conditions.join(" AND ")
    }

    pub(crate) fn build(post_type: &str, filter: &FindFilter) -> Result<Self> {
        let mut clause = Self::default();
        clause.push("post_type = ?", [SqlValue::Text(post_type.to_string())]);

        if let Some(id) = &filter.id {
            clause.push("id = ?", [SqlValue::Text(id.clone())]);
        }
        if let Some(author) = &filter.author {
            clause.push(
                "json_type(body, ?) = 'text' AND json_extract(body, ?) = ?",
                [
                    SqlValue::Text(json_path(AUTHOR_FIELD)?),
                    SqlValue::Text(json_path(AUTHOR_FIELD)?),
                    SqlValue::Text(author.clone()),
                ],
            );
        }
        if let Some(status) = &filter.status {
            let path = json_path(&status.field)?;
            clause.push(
                "json_type(body, ?) = 'integer'",
                [SqlValue::Text(path.clone())],
            );
            if let Some(min) = status.range.gte {
                clause.push(
                    "json_extract(body, ?) >= ?",
                    [SqlValue::Text(path.clone()), SqlValue::Integer(min)],
                );
            }
            if let Some(max) = status.range.lt {
                clause.push(
                    "json_extract(body, ?) < ?",
                    [SqlValue::Text(path.clone()), SqlValue::Integer(max)],
                );
            }
        }
        for (field, value) in &filter.equals {
            clause.push_equals(&json_path(field)?, value);
        }
        Ok(clause)
    }

    /// Equality on one field, typed the way `serde_json::Value` compares
    pub(crate) fn push_equals(&mut self, path: &str, value: &Value) {
        let path = SqlValue::Text(path.to_string());
        match value {
            Value::Null => self.push("json_type(body, ?) = 'null'", [path]),
            Value::Bool(b) => self.push(
                "json_type(body, ?) = ?",
                [path, SqlValue::Text(b.to_string())],
            ),
            Value::String(s) => self.push(
                "json_type(body, ?) = 'text' AND json_extract(body, ?) = ?",
                [path.clone(), path, SqlValue::Text(s.clone())],
            ),
            Value::Number(n) => {
                let (json_type, bound) = match n.as_i64() {
                    Some(i) => ("integer", SqlValue::Integer(i)),
                    None => ("real", SqlValue::Real(n.as_f64().unwrap_or(f64::NAN))),
                };
                self.push(
                    "json_type(body, ?) = ? AND json_extract(body, ?) = ?",
                    [path.clone(), SqlValue::Text(json_type.to_string()), path, bound],
                );
            }
            Value::Array(_) | Value::Object(_) => self.push(
                "json_type(body, ?) IN ('array', 'object') AND json_extract(body, ?) = json(?)",
                [path.clone(), path, SqlValue::Text(value.to_string())],
            ),
        }
    }
}
