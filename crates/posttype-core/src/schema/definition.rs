use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::field::{FieldSchema, ValueType, Visibility, VisibilityRule, WriteCondition};
use crate::errors::{PostTypeError, Result};

/// Deepest nesting a schema definition may have
pub const MAX_SCHEMA_DEPTH: usize = 32;

/// Serializable, JSON-Schema-like schema description
///
/// ```json
/// { "type": "object",
///   "properties": {
///     "title": { "type": "string", "meta": { "required": true } },
///     "notes": { "type": "string", "meta": { "private": "author" } } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SchemaDefinition {
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaDefinition>>,
    #[serde(default)]
    pub meta: MetaDefinition,
}

/// Descriptor bag of one definition node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MetaDefinition {
    pub required: bool,
    pub read_only: bool,
    pub disabled: bool,
    pub pattern: Option<String>,
    pub validation_message: Option<String>,
    pub private: Option<Visibility>,
    pub write_condition: Option<WriteCondition>,
    #[serde(alias = "ref")]
    pub reference: Option<String>,
}

impl SchemaDefinition {
    /// Compile into a `FieldSchema`
    ///
    /// # Errors
    ///
    /// `InvalidPattern` for a pattern that does not compile, `SchemaTooDeep`
    /// past `MAX_SCHEMA_DEPTH`, `InvalidSchema` for `items` on a non-array
    /// or `properties` on a non-object.
    pub fn compile(&self) -> Result<FieldSchema> {
        self.compile_at("record", 1)
    }

    fn compile_at(&self, path: &str, depth: usize) -> Result<FieldSchema> {
        if depth > MAX_SCHEMA_DEPTH {
            return Err(PostTypeError::SchemaTooDeep {
                path: path.to_string(),
                max_depth: MAX_SCHEMA_DEPTH,
            });
        }
        if !self.properties.is_empty() && self.value_type != ValueType::Object {
            return Err(PostTypeError::InvalidSchema {
                path: path.to_string(),
                reason: "properties are only allowed on objects".to_string(),
            });
        }
        if self.items.is_some() && self.value_type != ValueType::Array {
            return Err(PostTypeError::InvalidSchema {
                path: path.to_string(),
                reason: "items are only allowed on arrays".to_string(),
            });
        }

        let mut schema = FieldSchema::of(self.value_type);
        for (key, child) in &self.properties {
            let child_path = format!("{}.{}", path, key);
            schema
                .properties
                .insert(key.clone(), child.compile_at(&child_path, depth + 1)?);
        }
        if let Some(items) = &self.items {
            let items_path = format!("{}[]", path);
            schema.items = Some(Box::new(items.compile_at(&items_path, depth + 1)?));
        }

        let meta = &self.meta;
        schema.meta.required = meta.required;
        schema.meta.read_only = meta.read_only;
        schema.meta.disabled = meta.disabled;
        schema.meta.validation_message = meta.validation_message.clone();
        schema.meta.visibility = VisibilityRule::Static(meta.private.unwrap_or_default());
        schema.meta.write = meta.write_condition.unwrap_or_default();
        schema.meta.reference = meta.reference.clone();
        if let Some(pattern) = &meta.pattern {
            let regex = Regex::new(pattern).map_err(|e| PostTypeError::InvalidPattern {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
            schema.meta.pattern = Some(regex);
        }
        Ok(schema)
    }
}
