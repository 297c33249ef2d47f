//! Result envelopes of mutating operations

use posttype_core::errors::{FieldViolation, PtError};
use serde::Serialize;
use serde_json::Value;

/// `{"message": ..., "errors": [{path, message}]}`; `errors` is omitted when empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseError {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldViolation>,
}

/// What a mutating operation hands back to its transport
///
/// Serializes to `{"record": ...}` or `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationResponse {
    Record(Value),
    Error(ResponseError),
}

impl MutationResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, MutationResponse::Error(_))
    }

    pub fn record(&self) -> Option<&Value> {
        match self {
            MutationResponse::Record(record) => Some(record),
            MutationResponse::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ResponseError> {
        match self {
            MutationResponse::Record(_) => None,
            MutationResponse::Error(error) => Some(error),
        }
    }
}

impl From<Result<Value, PtError>> for MutationResponse {
    fn from(result: Result<Value, PtError>) -> Self {
        match result {
            Ok(record) => MutationResponse::Record(record),
            Err(err) => {
                let message = if err.message().is_empty() {
                    err.code().to_string()
                } else {
                    err.message().to_string()
                };
                MutationResponse::Error(ResponseError {
                    message,
                    errors: err.errors().to_vec(),
                })
            }
        }
    }
}
