//! Posttype Store - SQLite persistence for post-type records
//!
//! Provides:
//! - Connection management
//! - SQLite schema with an embedded, checksummed migrations framework
//! - `SqliteRecordStore`, the SQLite implementation of `RecordStore`

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteRecordStore;
