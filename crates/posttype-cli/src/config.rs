//! Application configuration file
//!
//! ```toml
//! database = ".posttype/store.db"
//! log_profile = "development"
//! account_type = "user"
//!
//! [post_types.user]
//! unique = ["email"]
//! config = { statusField = "_status" }
//! schema = { type = "object", properties = { email = { type = "string" } } }
//! ```

use posttype_core::errors::{PtError, PtErrorKind};
use posttype_core::logging_facility::Profile;
use posttype_core::{PostTypeConfig, PostTypeRegistry, SchemaDefinition};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "posttype.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite file, relative to the configuration file
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default = "default_profile")]
    pub log_profile: Profile,
    /// Post type whose records are the callers
    pub account_type: Option<String>,
    #[serde(default)]
    pub post_types: BTreeMap<String, PostTypeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostTypeEntry {
    #[serde(default)]
    pub config: PostTypeConfig,
    pub schema: SchemaDefinition,
    /// Fields that must not repeat across records of this type
    #[serde(default)]
    pub unique: Vec<String>,
}

fn default_database() -> PathBuf {
    PathBuf::from(".posttype/store.db")
}

fn default_profile() -> Profile {
    Profile::Development
}

impl AppConfig {
    /// # Errors
    ///
    /// `Io` when the file cannot be read, otherwise as [`AppConfig::parse`].
    pub fn load(path: &Path) -> Result<Self, PtError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PtError::new(PtErrorKind::Io)
                .with_message(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::parse(&text)?;
        if config.database.is_relative() {
            if let Some(dir) = path.parent() {
                config.database = dir.join(&config.database);
            }
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// `ConfigurationInvariant` for malformed TOML or unknown keys.
    pub fn parse(text: &str) -> Result<Self, PtError> {
        toml::from_str(text).map_err(|e| {
            PtError::new(PtErrorKind::ConfigurationInvariant)
                .with_op("load_config")
                .with_message(e.to_string())
        })
    }

    /// Compile and register every configured post type
    ///
    /// # Errors
    ///
    /// The first post type that fails its configuration checks, or an
    /// account type that is not among the configured post types.
    pub fn registry(&self) -> Result<PostTypeRegistry, PtError> {
        let mut registry = PostTypeRegistry::new();
        if let Some(account_type) = &self.account_type {
            if !self.post_types.contains_key(account_type) {
                return Err(PtError::new(PtErrorKind::ConfigurationInvariant)
                    .with_post_type(account_type.as_str())
                    .with_message("account_type is not a configured post type"));
            }
            registry = registry.with_account_type(account_type.as_str());
        }
        for (name, entry) in &self.post_types {
            registry
                .register_definition(name, entry.config.clone(), &entry.schema)
                .map_err(|e| PtError::from(e).with_post_type(name.as_str()))?;
        }
        Ok(registry)
    }
}
