//! Folder snapshot produced by one read

use serde::{Deserialize, Serialize};

use crate::Value;

/// Columns and rows read from one folder at one point in time.
///
/// Every row holds exactly `columns.len()` values; the reader rejects ragged
/// input instead of padding it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSnapshot {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Files that contributed rows, in read order
    pub files: Vec<String>,
}

impl FolderSnapshot {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
