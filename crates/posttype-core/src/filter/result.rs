use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::errors::FieldViolation;

/// Outcome of sanitizing one input record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputFilterResult {
    /// Sanitized fields, `None` when the input was not an object
    pub record: Option<Map<String, Value>>,
    pub missing: Vec<FieldViolation>,
    pub invalid: Vec<FieldViolation>,
    pub denied: Vec<FieldViolation>,
}

impl InputFilterResult {
    pub fn has_violations(&self) -> bool {
        !self.missing.is_empty() || !self.invalid.is_empty()
    }

    pub fn is_denied(&self) -> bool {
        !self.denied.is_empty()
    }

    /// Missing and invalid violations as one list
    ///
    /// Missing comes first. An invalid violation on a path that is also
    /// missing is dropped, and each path appears once.
    pub fn errors(&self) -> Vec<FieldViolation> {
        let mut seen = HashSet::new();
        self.missing
            .iter()
            .chain(self.invalid.iter())
            .filter(|v| seen.insert(v.path.clone()))
            .cloned()
            .collect()
    }
}
