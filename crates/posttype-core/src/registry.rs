//! Owned table of registered post types
//!
//! Built once at startup and shared read-only (behind `Arc`) by every
//! operation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::PostTypeConfig;
use crate::errors::{PostTypeError, Result};
use crate::model::{Messages, Record};
use crate::schema::{with_base_fields, FieldSchema, SchemaDefinition};
use crate::status::{StatusManager, StatusSummary};

/// Everything the engines need to know about one post type
#[derive(Debug)]
pub struct PostType {
    name: String,
    config: PostTypeConfig,
    status: StatusManager,
    schema: FieldSchema,
    messages: Messages,
}

impl PostType {
    /// Validate `config` and `schema` and assemble the post type
    ///
    /// # Errors
    ///
    /// Any configuration invariant failure: misordered statuses, unknown
    /// message keys, a non-object or too deep schema.
    pub fn new(
        name: &str,
        config: PostTypeConfig,
        schema: FieldSchema,
        account_type: Option<&str>,
    ) -> Result<Self> {
        if !is_valid_name(name) {
            return Err(PostTypeError::InvalidSchema {
                path: "name".to_string(),
                reason: format!("'{}' is not a valid post type name", name),
            });
        }
        config.validate()?;
        let status = StatusManager::new(
            config.statuses,
            config.status_field.clone(),
            config.required_shape.clone(),
        )?;
        let messages = Messages::for_post_type(name).with_overrides(&config.messages)?;
        let schema = with_base_fields(schema, &config.status_field, account_type)?;

        Ok(Self {
            name: name.to_string(),
            config,
            status,
            schema,
            messages,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &PostTypeConfig {
        &self.config
    }

    pub fn status(&self) -> &StatusManager {
        &self.status
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn summary(&self, record: Option<&Record>) -> StatusSummary {
        self.status.summary(record, &self.messages)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Post types keyed by name
#[derive(Debug, Default)]
pub struct PostTypeRegistry {
    types: HashMap<String, Arc<PostType>>,
    account_type: Option<String>,
}

impl PostTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the post type whose records are caller accounts
    ///
    /// Post types registered afterwards point `_author` at it.
    pub fn with_account_type(mut self, name: impl Into<String>) -> Self {
        self.account_type = Some(name.into());
        self
    }

    pub fn account_type(&self) -> Option<&str> {
        self.account_type.as_deref()
    }

    /// # Errors
    ///
    /// `DuplicatePostType` if `name` is taken, otherwise whatever
    /// `PostType::new` rejects.
    pub fn register(
        &mut self,
        name: &str,
        config: PostTypeConfig,
        schema: FieldSchema,
    ) -> Result<Arc<PostType>> {
        if self.types.contains_key(name) {
            return Err(PostTypeError::DuplicatePostType {
                name: name.to_string(),
            });
        }
        let post_type = Arc::new(PostType::new(
            name,
            config,
            schema,
            self.account_type.as_deref(),
        )?);
        self.types.insert(name.to_string(), post_type.clone());
        tracing::info!(post_type = name, "post type registered");
        Ok(post_type)
    }

    /// Compile `definition` and register it
    ///
    /// # Errors
    ///
    /// Compilation errors of the definition, then as `register`.
    pub fn register_definition(
        &mut self,
        name: &str,
        config: PostTypeConfig,
        definition: &SchemaDefinition,
    ) -> Result<Arc<PostType>> {
        let schema = definition.compile()?;
        self.register(name, config, schema)
    }

    /// # Errors
    ///
    /// `UnknownPostType` when nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<PostType>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| PostTypeError::UnknownPostType {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
