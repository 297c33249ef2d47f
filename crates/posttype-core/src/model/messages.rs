use serde::Serialize;
use std::collections::HashMap;

use crate::errors::{PostTypeError, Result};
use crate::status::StatusLevel;

/// User-facing texts of one post type
///
/// Defaults are derived from the post type name; configuration may
/// override any of them by key (`notFound`, `accessDenied`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    pub save_default_fail: String,
    pub invalid_data: String,
    pub missing_data: String,
    pub low_status_level: String,
    pub not_found: String,
    pub access_denied: String,
    pub status_banned: String,
    pub status_deleted: String,
    pub status_created: String,
    pub status_data_complete: String,
    pub status_approved: String,
    pub status_featured: String,
}

impl Messages {
    pub fn for_post_type(name: &str) -> Self {
        Self {
            save_default_fail: format!(
                "Sorry, there was an issue save the {}, please try again",
                name
            ),
            invalid_data: "Invalid data".to_string(),
            missing_data: "Missing data".to_string(),
            low_status_level: "Your status level is too low to perform the operation"
                .to_string(),
            not_found: format!("{} not found", capitalize(name)),
            access_denied: "access denied".to_string(),
            status_banned: "banned".to_string(),
            status_deleted: "deleted".to_string(),
            status_created: "created".to_string(),
            status_data_complete: "data complete".to_string(),
            status_approved: "approved".to_string(),
            status_featured: "featured".to_string(),
        }
    }

    /// Apply configured overrides. Unknown keys are a configuration error.
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Result<Self> {
        for (key, text) in overrides {
            let slot = match key.as_str() {
                "saveDefaultFail" | "savePostDefaultFail" => &mut self.save_default_fail,
                "invalidData" => &mut self.invalid_data,
                "missingData" => &mut self.missing_data,
                "lowStatusLevel" => &mut self.low_status_level,
                "notFound" | "postNotFound" => &mut self.not_found,
                "accessDenied" => &mut self.access_denied,
                "statusBanned" => &mut self.status_banned,
                "statusDeleted" => &mut self.status_deleted,
                "statusCreated" => &mut self.status_created,
                "statusDataComplete" | "statusRequiredData" => &mut self.status_data_complete,
                "statusApproved" => &mut self.status_approved,
                "statusFeatured" => &mut self.status_featured,
                _ => {
                    return Err(PostTypeError::UnknownMessageKey { key: key.clone() });
                }
            };
            *slot = text.clone();
        }
        Ok(self)
    }

    pub fn status_name(&self, level: StatusLevel) -> &str {
        match level {
            StatusLevel::Banned => &self.status_banned,
            StatusLevel::Deleted => &self.status_deleted,
            StatusLevel::Created => &self.status_created,
            StatusLevel::DataComplete => &self.status_data_complete,
            StatusLevel::Approved => &self.status_approved,
            StatusLevel::Featured => &self.status_featured,
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
