use serde::{Deserialize, Serialize};

use crate::errors::{PostTypeError, Result};

/// The six named lifecycle levels, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusLevel {
    Banned,
    Deleted,
    Created,
    DataComplete,
    Approved,
    Featured,
}

impl StatusLevel {
    pub const ALL: [StatusLevel; 6] = [
        StatusLevel::Banned,
        StatusLevel::Deleted,
        StatusLevel::Created,
        StatusLevel::DataComplete,
        StatusLevel::Approved,
        StatusLevel::Featured,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StatusLevel::Banned => "banned",
            StatusLevel::Deleted => "deleted",
            StatusLevel::Created => "created",
            StatusLevel::DataComplete => "dataComplete",
            StatusLevel::Approved => "approved",
            StatusLevel::Featured => "featured",
        }
    }
}

/// Configured integer for each status level
///
/// `requiredData` is accepted as an alias of `dataComplete`. Missing keys
/// fall back to the defaults (20/30/40/50/100/120).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct StatusValues {
    pub banned: i64,
    pub deleted: i64,
    pub created: i64,
    #[serde(alias = "requiredData")]
    pub data_complete: i64,
    pub approved: i64,
    pub featured: i64,
}

impl Default for StatusValues {
    fn default() -> Self {
        Self {
            banned: 20,
            deleted: 30,
            created: 40,
            data_complete: 50,
            approved: 100,
            featured: 120,
        }
    }
}

impl StatusValues {
    pub fn value(&self, level: StatusLevel) -> i64 {
        match level {
            StatusLevel::Banned => self.banned,
            StatusLevel::Deleted => self.deleted,
            StatusLevel::Created => self.created,
            StatusLevel::DataComplete => self.data_complete,
            StatusLevel::Approved => self.approved,
            StatusLevel::Featured => self.featured,
        }
    }

    /// Check `banned < deleted < created < dataComplete < approved < featured`
    ///
    /// # Errors
    ///
    /// Returns `StatusOrderViolation` naming the first pair out of order.
    pub fn validate(&self) -> Result<()> {
        for pair in StatusLevel::ALL.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            if self.value(lower) >= self.value(upper) {
                return Err(PostTypeError::StatusOrderViolation {
                    lower: lower.key().to_string(),
                    lower_value: self.value(lower),
                    upper: upper.key().to_string(),
                    upper_value: self.value(upper),
                });
            }
        }
        Ok(())
    }

    /// Level whose value equals `status` exactly
    pub fn level_of(&self, status: i64) -> Option<StatusLevel> {
        StatusLevel::ALL
            .into_iter()
            .find(|level| self.value(*level) == status)
    }

    /// Highest level at or below `status`; anything under `banned` is `banned`
    pub fn snap(&self, status: i64) -> StatusLevel {
        StatusLevel::ALL
            .into_iter()
            .rev()
            .find(|level| self.value(*level) <= status)
            .unwrap_or(StatusLevel::Banned)
    }
}
