//! Persistence contract consumed by the operation layer
//!
//! Storage itself lives outside the core. `MemoryRecordStore` is the
//! reference implementation used by tests and embedders; `posttype-store`
//! provides a SQLite one.

pub mod memory;

pub use memory::MemoryRecordStore;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::errors::PtError;
use crate::model::{Record, AUTHOR_FIELD};

/// Half-open status interval `[gte, lt)`; `None` bounds are open
///
/// Stores match it against integer status values only. Records written
/// through the operation layer always carry one; a record seeded without a
/// status, or with a numeric string, is invisible to status-range listings
/// until an operation saves it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusRange {
    pub gte: Option<i64>,
    pub lt: Option<i64>,
}

impl StatusRange {
    pub fn at_least(min: i64) -> Self {
        Self {
            gte: Some(min),
            lt: None,
        }
    }

    pub fn below(max: i64) -> Self {
        Self {
            gte: None,
            lt: Some(max),
        }
    }

    pub fn between(min: i64, max: i64) -> Self {
        Self {
            gte: Some(min),
            lt: Some(max),
        }
    }

    pub fn contains(&self, status: i64) -> bool {
        self.gte.map_or(true, |min| status >= min) && self.lt.map_or(true, |max| status < max)
    }
}

/// Status constraint on a named field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusFilter {
    pub field: String,
    pub range: StatusRange,
}

/// Conjunction of lookup criteria
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FindFilter {
    pub id: Option<String>,
    pub author: Option<String>,
    pub status: Option<StatusFilter>,
    /// Top-level field equalities
    pub equals: Vec<(String, Value)>,
}

impl FindFilter {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_status(mut self, field: impl Into<String>, range: StatusRange) -> Self {
        self.status = Some(StatusFilter {
            field: field.into(),
            range,
        });
        self
    }

    pub fn with_equals(mut self, field: impl Into<String>, value: Value) -> Self {
        self.equals.push((field.into(), value));
        self
    }

    /// In-memory evaluation of the filter
    ///
    /// A record without a numeric status never matches a status filter.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(id) = &self.id {
            if record.id() != id {
                return false;
            }
        }
        if let Some(author) = &self.author {
            if record.get(AUTHOR_FIELD).and_then(Value::as_str) != Some(author.as_str()) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            let matched = record
                .get(&status.field)
                .and_then(Value::as_i64)
                .is_some_and(|s| status.range.contains(s));
            if !matched {
                return false;
            }
        }
        self.equals
            .iter()
            .all(|(field, value)| record.get(field) == Some(value))
    }
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.per_page as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub per_page: u32,
    pub page_count: u32,
    pub item_count: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageInfo {
    pub fn new(request: &PageRequest, item_count: u64) -> Self {
        let per_page = request.per_page.max(1);
        let page_count = item_count.div_ceil(u64::from(per_page)) as u32;
        Self {
            current_page: request.page,
            per_page,
            page_count,
            item_count,
            has_next_page: request.page < page_count,
            has_previous_page: request.page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}

/// Storage of records, partitioned by post type
///
/// `save` inserts or replaces by `_id`. Constraint failures come back as
/// `Persistence` errors whose `errors()` carry per-path detail
/// (`record.<field>`). Results of `find_many` are ordered by `_id`,
/// newest first.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_one(&self, post_type: &str, filter: &FindFilter)
        -> Result<Option<Record>, PtError>;

    async fn save(&self, post_type: &str, record: &Record) -> Result<Record, PtError>;

    async fn find_many(
        &self,
        post_type: &str,
        filter: &FindFilter,
        page: &PageRequest,
    ) -> Result<Page<Record>, PtError>;
}
