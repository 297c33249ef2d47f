//! SQLite implementation of `RecordStore`
//!
//! Each record is one row of `records`, keyed by `(post_type, id)`, with
//! the whole document as JSON in `body`.

use async_trait::async_trait;
use posttype_core::errors::{PtError, PtErrorKind};
use posttype_core::model::Record;
use posttype_core::store::{FindFilter, Page, PageInfo, PageRequest, RecordStore};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Transaction};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::query::{json_path, WhereClause};
use crate::db;
use crate::errors::{corrupt_record, from_rusqlite, unique_violation, Result};
use crate::migrations::apply_migrations;

/// `RecordStore` over a single SQLite connection
///
/// Calls run synchronously under the connection lock; the lock is never
/// held across an await.
#[derive(Debug)]
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
    unique: HashMap<String, Vec<String>>,
}

impl SqliteRecordStore {
    /// Open (or create) the database at `path` and migrate it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(db::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Configure and migrate an already opened connection
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            unique: HashMap::new(),
        })
    }

    /// Reject saves that would duplicate `field` within `post_type`
    pub fn with_unique(mut self, post_type: &str, field: &str) -> Self {
        self.unique
            .entry(post_type.to_string())
            .or_default()
            .push(field.to_string());
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            PtError::new(PtErrorKind::Internal).with_message("sqlite store lock poisoned")
        })
    }

    /// Number of stored records of `post_type`
    pub fn count(&self, post_type: &str) -> Result<u64> {
        let conn = self.lock()?;
        count_matching(&conn, &WhereClause::build(post_type, &FindFilter::default())?)
    }

    fn unique_conflicts(
        &self,
        tx: &Transaction<'_>,
        post_type: &str,
        record: &Record,
    ) -> Result<Vec<String>> {
        let Some(fields) = self.unique.get(post_type) else {
            return Ok(Vec::new());
        };

        let mut conflicts = Vec::new();
        for field in fields {
            let Some(value) = record.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let mut clause = WhereClause::build(post_type, &FindFilter::default())?;
            clause.push_equals(&json_path(field)?, value);
            let sql = format!("SELECT 1 FROM records WHERE {} AND id != ? LIMIT 1", clause.sql());
            let mut params = clause.params;
            params.push(rusqlite::types::Value::Text(record.id().to_string()));

            let taken = tx
                .query_row(&sql, params_from_iter(params), |_| Ok(()))
                .optional()
                .map_err(from_rusqlite)?
                .is_some();
            if taken {
                conflicts.push(field.clone());
            }
        }
        Ok(conflicts)
    }
}

fn count_matching(conn: &Connection, clause: &WhereClause) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM records WHERE {}", clause.sql());
    let count: i64 = conn
        .query_row(&sql, params_from_iter(clause.params.iter()), |row| row.get(0))
        .map_err(from_rusqlite)?;
    Ok(count.max(0) as u64)
}

fn hydrate(post_type: &str, id: &str, body: &str) -> Result<Record> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| corrupt_record(post_type, id, &e.to_string()))?;
    Record::from_value(value).map_err(|e| corrupt_record(post_type, id, &e.to_string()))
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn find_one(
        &self,
        post_type: &str,
        filter: &FindFilter,
    ) -> std::result::Result<Option<Record>, PtError> {
        let clause = WhereClause::build(post_type, filter)?;
        let sql = format!(
            "SELECT id, body FROM records WHERE {} ORDER BY id DESC LIMIT 1",
            clause.sql()
        );

        let conn = self.lock()?;
        let row: Option<(String, String)> = conn
            .query_row(&sql, params_from_iter(clause.params.iter()), |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()
            .map_err(from_rusqlite)?;

        row.map(|(id, body)| hydrate(post_type, &id, &body))
            .transpose()
    }

    async fn save(&self, post_type: &str, record: &Record) -> std::result::Result<Record, PtError> {
        let body = serde_json::to_string(record.as_map())
            .map_err(|e| corrupt_record(post_type, record.id(), &e.to_string()))?;
        let now = chrono::Utc::now().timestamp();

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(from_rusqlite)?;

        let conflicts = self.unique_conflicts(&tx, post_type, record)?;
        if !conflicts.is_empty() {
            return Err(unique_violation(post_type, record.id(), &conflicts));
        }

        tx.execute(
            "INSERT INTO records (post_type, id, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(post_type, id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at",
            rusqlite::params![post_type, record.id(), body, now],
        )
        .map_err(|e| {
            from_rusqlite(e)
                .with_post_type(post_type)
                .with_record_id(record.id())
        })?;
        tx.commit().map_err(from_rusqlite)?;

        tracing::debug!(post_type, record_id = record.id(), "record saved");
        Ok(record.clone())
    }

    async fn find_many(
        &self,
        post_type: &str,
        filter: &FindFilter,
        page: &PageRequest,
    ) -> std::result::Result<Page<Record>, PtError> {
        let clause = WhereClause::build(post_type, filter)?;
        let sql = format!(
            "SELECT id, body FROM records WHERE {} ORDER BY id DESC LIMIT ? OFFSET ?",
            clause.sql()
        );
        let mut params = clause.params.clone();
        params.push(rusqlite::types::Value::Integer(i64::from(page.per_page)));
        params.push(rusqlite::types::Value::Integer(page.offset() as i64));

        let conn = self.lock()?;
        let item_count = count_matching(&conn, &clause)?;

        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        let items = rows
            .iter()
            .map(|(id, body)| hydrate(post_type, id, body))
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            items,
            page_info: PageInfo::new(page, item_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posttype_core::store::memory::seed;
    use posttype_core::store::StatusRange;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_and_find_one() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        seed(&store, "post", json!({"_id": "p1", "_author": "u1", "title": "a"}))
            .await
            .unwrap();

        let found = store.find_one("post", &FindFilter::by_id("p1")).await.unwrap();
        assert_eq!(found.unwrap().get("title"), Some(&json!("a")));
        assert!(store
            .find_one("comment", &FindFilter::by_id("p1"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_by_id() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        seed(&store, "post", json!({"_id": "p1", "title": "a"}))
            .await
            .unwrap();
        seed(&store, "post", json!({"_id": "p1", "title": "b"}))
            .await
            .unwrap();

        assert_eq!(store.count("post").unwrap(), 1);
        let found = store.find_one("post", &FindFilter::by_id("p1")).await.unwrap();
        assert_eq!(found.unwrap().get("title"), Some(&json!("b")));
    }

    #[tokio::test]
    async fn test_status_filter_ignores_non_integer_status() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        seed(&store, "post", json!({"_id": "p1", "_status": 100}))
            .await
            .unwrap();
        seed(&store, "post", json!({"_id": "p2", "_status": "100"}))
            .await
            .unwrap();

        let page = store
            .find_many(
                "post",
                &FindFilter::default().with_status("_status", StatusRange::at_least(50)),
                &PageRequest::new(1, 10),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = page.items.iter().map(Record::id).collect();
        assert_eq!(ids, vec!["p1"]);
    }
}
