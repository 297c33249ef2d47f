//! Posttype Core - lifecycle and field authorization kernel
//!
//! This crate provides the building blocks shared by every post type:
//! - Record model and per-type user messages
//! - Status lifecycle engine (levels, transitions, data completeness)
//! - Field schema with write conditions and visibility rules
//! - Input sanitation and output redaction
//! - Post type configuration and the owned registry
//! - The persistence contract with an in-memory implementation
//! - Error and logging facilities

pub mod auth;
pub mod commands;
pub mod config;
pub mod errors;
pub mod filter;
pub mod logging_facility;
pub mod model;
pub mod policy;
pub mod registry;
pub mod schema;
pub mod status;
pub mod store;

// Re-export commonly used types
pub use auth::AuthContext;
pub use commands::{Command, ListRequest};
pub use config::{PerPage, PostTypeConfig};
pub use errors::{FieldViolation, PostTypeError, PtError, PtErrorKind, Result};
pub use filter::{filter_input, filter_output, InputFilterResult};
pub use model::{Messages, Record};
pub use policy::{DefaultListPolicy, ListAccess, ListPolicy, ListScope};
pub use registry::{PostType, PostTypeRegistry};
pub use schema::{FieldSchema, SchemaDefinition};
pub use status::{StatusLevel, StatusManager, StatusValues, Transition};
pub use store::{FindFilter, MemoryRecordStore, Page, PageInfo, PageRequest, RecordStore};
