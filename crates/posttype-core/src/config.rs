//! Registration options of a post type

use posttype_core_types::Sensitive;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::errors::{PostTypeError, Result};
use crate::model::DEFAULT_STATUS_FIELD;
use crate::status::{RequiredShape, StatusValues};

/// Page size settings for read-many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PerPage {
    pub default: u32,
    pub limit: u32,
}

impl Default for PerPage {
    fn default() -> Self {
        Self {
            default: 20,
            limit: 100,
        }
    }
}

impl PerPage {
    /// Requested page size, defaulted and clamped to `1..=limit`
    pub fn resolve(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default).clamp(1, self.limit)
    }
}

/// Options accepted when registering a post type
///
/// ```json
/// { "statuses": { "banned": 20, "featured": 120 },
///   "statusField": "_status",
///   "requiredShape": { "title": { "type": "string" } },
///   "messages": { "notFound": "No such post" },
///   "perPage": { "default": 20, "limit": 100 },
///   "masterCode": "..." }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PostTypeConfig {
    pub statuses: StatusValues,
    pub status_field: String,
    #[serde(alias = "requiredData", alias = "requiredDataForStatus")]
    pub required_shape: RequiredShape,
    pub messages: HashMap<String, String>,
    pub per_page: PerPage,
    pub master_code: Option<Sensitive<String>>,
}

impl Default for PostTypeConfig {
    fn default() -> Self {
        Self {
            statuses: StatusValues::default(),
            status_field: DEFAULT_STATUS_FIELD.to_string(),
            required_shape: RequiredShape::default(),
            messages: HashMap::new(),
            per_page: PerPage::default(),
            master_code: None,
        }
    }
}

impl PostTypeConfig {
    /// # Errors
    ///
    /// `StatusOrderViolation` for misordered statuses, `InvalidSchema` for an
    /// empty status field name or unusable page sizes.
    pub fn validate(&self) -> Result<()> {
        self.statuses.validate()?;
        if self.status_field.trim().is_empty() {
            return Err(PostTypeError::InvalidSchema {
                path: "statusField".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.per_page.default == 0 || self.per_page.limit < self.per_page.default {
            return Err(PostTypeError::InvalidSchema {
                path: "perPage".to_string(),
                reason: format!(
                    "need 0 < default <= limit, got default={} limit={}",
                    self.per_page.default, self.per_page.limit
                ),
            });
        }
        Ok(())
    }

    /// Whether `supplied` matches the configured master code
    ///
    /// Always false when no master code is configured. Both sides are
    /// compared as SHA-256 digests.
    pub fn master_code_matches(&self, supplied: Option<&str>) -> bool {
        match (&self.master_code, supplied) {
            (Some(expected), Some(supplied)) => {
                digest(expected.expose()) == digest(supplied)
            }
            _ => false,
        }
    }
}

fn digest(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}
