//! Field schema of a post type

pub mod definition;
pub mod field;

pub use definition::{MetaDefinition, SchemaDefinition, MAX_SCHEMA_DEPTH};
pub use field::{
    FieldContext, FieldMeta, FieldSchema, ValueType, Validator, Visibility, VisibilityRule,
    WriteCondition,
};

use crate::errors::{PostTypeError, Result};
use crate::model::{AUTHOR_FIELD, AUTHOR_STATUS_FIELD, CREATED_DATE_FIELD, ID_FIELD};

/// Add the read-only base fields every record carries
///
/// Base fields replace any user declaration under the same key.
///
/// # Errors
///
/// `InvalidSchema` unless `schema` is an object, `SchemaTooDeep` when it
/// nests past `MAX_SCHEMA_DEPTH`.
pub fn with_base_fields(
    mut schema: FieldSchema,
    status_field: &str,
    account_type: Option<&str>,
) -> Result<FieldSchema> {
    if schema.value_type != ValueType::Object {
        return Err(PostTypeError::InvalidSchema {
            path: "record".to_string(),
            reason: "the root of a post type schema must be an object".to_string(),
        });
    }
    if schema.depth() > MAX_SCHEMA_DEPTH {
        return Err(PostTypeError::SchemaTooDeep {
            path: "record".to_string(),
            max_depth: MAX_SCHEMA_DEPTH,
        });
    }

    let mut author = FieldSchema::id().read_only();
    if let Some(account_type) = account_type {
        author = author.reference(account_type);
    }

    schema.properties.insert(ID_FIELD.to_string(), FieldSchema::id().read_only());
    schema
        .properties
        .insert(CREATED_DATE_FIELD.to_string(), FieldSchema::date().read_only());
    schema.properties.insert(AUTHOR_FIELD.to_string(), author);
    schema
        .properties
        .insert(status_field.to_string(), FieldSchema::integer().read_only());
    schema
        .properties
        .insert(AUTHOR_STATUS_FIELD.to_string(), FieldSchema::integer().read_only());
    Ok(schema)
}
