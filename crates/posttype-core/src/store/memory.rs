use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use super::{FindFilter, Page, PageInfo, PageRequest, RecordStore};
use crate::errors::{FieldViolation, PtError, PtErrorKind};
use crate::model::Record;

type Tables = HashMap<String, BTreeMap<String, Record>>;

/// `RecordStore` backed by a map per post type
///
/// The lock is taken and released inside each call, never across an await.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: Mutex<Tables>,
    unique: HashMap<String, Vec<String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject saves that would duplicate `field` within `post_type`
    pub fn with_unique(mut self, post_type: &str, field: &str) -> Self {
        self.unique
            .entry(post_type.to_string())
            .or_default()
            .push(field.to_string());
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, PtError> {
        self.tables.lock().map_err(|_| {
            PtError::new(PtErrorKind::Internal).with_message("memory store lock poisoned")
        })
    }

    fn unique_violations(
        &self,
        table: Option<&BTreeMap<String, Record>>,
        record: &Record,
        post_type: &str,
    ) -> Vec<FieldViolation> {
        let (Some(fields), Some(table)) = (self.unique.get(post_type), table) else {
            return Vec::new();
        };
        fields
            .iter()
            .filter(|field| {
                let Some(value) = record.get(field).filter(|v| !v.is_null()) else {
                    return false;
                };
                table
                    .values()
                    .any(|other| other.id() != record.id() && other.get(field) == Some(value))
            })
            .map(|field| {
                FieldViolation::new(format!("record.{}", field), format!("{} already exists", field))
            })
            .collect()
    }

    /// Number of stored records of `post_type`
    pub fn len(&self, post_type: &str) -> usize {
        self.lock()
            .map(|tables| tables.get(post_type).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, post_type: &str) -> bool {
        self.len(post_type) == 0
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_one(
        &self,
        post_type: &str,
        filter: &FindFilter,
    ) -> Result<Option<Record>, PtError> {
        let tables = self.lock()?;
        let Some(table) = tables.get(post_type) else {
            return Ok(None);
        };
        if let Some(id) = &filter.id {
            return Ok(table.get(id).filter(|r| filter.matches(r)).cloned());
        }
        Ok(table.values().rev().find(|r| filter.matches(r)).cloned())
    }

    async fn save(&self, post_type: &str, record: &Record) -> Result<Record, PtError> {
        let mut tables = self.lock()?;
        let violations = self.unique_violations(tables.get(post_type), record, post_type);
        if !violations.is_empty() {
            return Err(PtError::new(PtErrorKind::Persistence)
                .with_op("save")
                .with_post_type(post_type)
                .with_record_id(record.id())
                .with_message("unique constraint failed")
                .with_errors(violations));
        }
        tables
            .entry(post_type.to_string())
            .or_default()
            .insert(record.id().to_string(), record.clone());
        tracing::debug!(post_type, record_id = record.id(), "record saved");
        Ok(record.clone())
    }

    async fn find_many(
        &self,
        post_type: &str,
        filter: &FindFilter,
        page: &PageRequest,
    ) -> Result<Page<Record>, PtError> {
        let tables = self.lock()?;
        let matching: Vec<&Record> = tables
            .get(post_type)
            .map(|table| table.values().rev().filter(|r| filter.matches(r)).collect())
            .unwrap_or_default();

        let item_count = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset())
            .take(page.per_page as usize)
            .cloned()
            .collect();
        Ok(Page {
            items,
            page_info: PageInfo::new(page, item_count),
        })
    }
}

/// Convenience for tests and fixtures: store `value` as-is
///
/// # Errors
///
/// `InvalidInput` when `value` is not a record, otherwise as `save`.
pub async fn seed(
    store: &dyn RecordStore,
    post_type: &str,
    value: Value,
) -> Result<Record, PtError> {
    let record = Record::from_value(value).map_err(PtError::from)?;
    store.save(post_type, &record).await
}
