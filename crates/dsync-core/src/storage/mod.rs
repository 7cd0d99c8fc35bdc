//! Table storage adapters
//!
//! A table is written whole: [`TableStorage::store_data`] replaces every
//! column and row of the named table. Backends are swappable behind the
//! trait; the orchestrator never sees which one it talks to.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::cmp::Ordering;

use dsync_ingest::Value;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::model::DatasetId;

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MAX_PAGE_SIZE: usize = 1000;

/// Persistent home for dataset tables.
pub trait TableStorage: Send + Sync {
    /// Replace the content of `table` with `columns` and `rows`.
    ///
    /// Storing the same content twice leaves the same table.
    fn store_data(
        &self,
        dataset: &DatasetId,
        table: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> Result<()>;

    /// One page of rows, optionally sorted.
    fn get_data(&self, table: &str, request: &PageRequest) -> Result<DataPage>;

    fn columns(&self, table: &str) -> Result<Vec<String>>;

    /// Number of stored rows; 0 for a missing table.
    fn row_count(&self, table: &str) -> Result<u64>;

    fn table_exists(&self, table: &str) -> Result<bool>;

    /// Drop the table. Returns whether it existed.
    fn delete_data(&self, table: &str) -> Result<bool>;
}

/// Which rows to return from [`TableStorage::get_data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
    pub sort_column: Option<String>,
    pub descending: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_column: None,
            descending: false,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            ..Default::default()
        }
    }

    pub fn sorted_by(mut self, column: impl Into<String>, descending: bool) -> Self {
        self.sort_column = Some(column.into());
        self.descending = descending;
        self
    }

    /// Clamp out-of-range values instead of failing.
    fn normalized(&self) -> (usize, usize) {
        let page = self.page.max(1);
        let page_size = match self.page_size {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };
        (page, page_size)
    }
}

/// A page of table rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPage {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub page: usize,
    pub page_size: usize,
    pub total_rows: u64,
    pub total_pages: u64,
}

/// Cut one page out of a full table.
///
/// An unknown sort column leaves rows in stored order. Sorting is stable, so
/// equal keys keep their stored order in both directions.
pub(crate) fn paginate(columns: &[String], rows: &[Vec<Value>], request: &PageRequest) -> DataPage {
    let (page, page_size) = request.normalized();
    let total_rows = rows.len();

    let mut order: Vec<usize> = (0..total_rows).collect();
    let sort_index = request
        .sort_column
        .as_deref()
        .and_then(|name| columns.iter().position(|c| c == name));
    if let Some(index) = sort_index {
        order.sort_by(|&a, &b| {
            let ordering = compare_cells(rows[a].get(index), rows[b].get(index));
            if request.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    let start = (page - 1).saturating_mul(page_size).min(total_rows);
    let end = start.saturating_add(page_size).min(total_rows);
    let page_rows = order[start..end].iter().map(|&i| rows[i].clone()).collect();

    DataPage {
        columns: columns.to_vec(),
        rows: page_rows,
        page,
        page_size,
        total_rows: total_rows as u64,
        total_pages: total_rows.div_ceil(page_size) as u64,
    }
}

/// Numbers compare numerically, everything else as text; nulls first.
fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.and_then(Value::as_str);
    let b = b.and_then(Value::as_str);
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.cmp(b),
        },
    }
}
