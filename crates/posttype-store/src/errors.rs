//! Error handling for posttype-store
//!
//! Wraps posttype-core PtError with store-specific helpers

use posttype_core::errors::{FieldViolation, PtError, PtErrorKind};

/// Result type alias using PtError
pub type Result<T> = std::result::Result<T, PtError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> PtError {
    PtError::new(PtErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> PtError {
    PtError::new(PtErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a unique constraint error carrying one violation per field
pub fn unique_violation(post_type: &str, record_id: &str, fields: &[String]) -> PtError {
    let errors = fields
        .iter()
        .map(|field| {
            FieldViolation::new(format!("record.{}", field), format!("{} already exists", field))
        })
        .collect();
    PtError::new(PtErrorKind::Persistence)
        .with_op("save")
        .with_post_type(post_type)
        .with_record_id(record_id)
        .with_message("unique constraint failed")
        .with_errors(errors)
}

/// Create an error for a field name that cannot be addressed in a query
pub fn invalid_field_name(field: &str) -> PtError {
    PtError::new(PtErrorKind::InvalidInput)
        .with_op("query")
        .with_message(format!("field name cannot be queried: {:?}", field))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> PtError {
    PtError::new(PtErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an error for a stored body that is not a valid record
pub fn corrupt_record(post_type: &str, record_id: &str, reason: &str) -> PtError {
    PtError::new(PtErrorKind::Serialization)
        .with_op("load_record")
        .with_post_type(post_type)
        .with_record_id(record_id)
        .with_message(reason.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> PtError {
    PtError::new(PtErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
