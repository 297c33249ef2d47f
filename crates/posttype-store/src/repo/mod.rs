//! Repository layer: records as JSON documents in SQLite

mod query;
mod sqlite_repo;

pub use sqlite_repo::SqliteRecordStore;
