//! JSON-file table storage
//!
//! One document per table at `<root>/<table>.json`. The document carries a
//! checksum of its columns and rows; a store call whose content matches the
//! existing checksum does not touch the disk.

use chrono::{DateTime, Utc};
use dsync_fs::checksum::compute_checksum;
use dsync_fs::{NormalizedPath, io};
use dsync_ingest::Value;
use serde::{Deserialize, Serialize};

use super::{DataPage, PageRequest, TableStorage, paginate};
use crate::model::DatasetId;
use crate::naming::validate_table_name;
use crate::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
struct TableDocument {
    dataset_id: DatasetId,
    table: String,
    checksum: String,
    stored_at: DateTime<Utc>,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

#[derive(Serialize)]
struct TableContent<'a> {
    columns: &'a [String],
    rows: &'a [Vec<Value>],
}

/// Tables persisted as JSON documents under a root directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: NormalizedPath,
}

impl FileStorage {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Checksum recorded for `table`, if stored.
    pub fn checksum(&self, table: &str) -> Result<Option<String>> {
        Ok(self.load(table)?.map(|doc| doc.checksum))
    }

    fn table_path(&self, table: &str) -> Result<NormalizedPath> {
        validate_table_name(table)?;
        Ok(self.root.join(&format!("{table}.json")))
    }

    fn load(&self, table: &str) -> Result<Option<TableDocument>> {
        let path = self.table_path(table)?;
        if !path.exists() {
            return Ok(None);
        }
        let bytes = io::read_bytes(&path).map_err(|e| storage_error(table, e))?;
        let doc = serde_json::from_slice(&bytes).map_err(|e| storage_error(table, e))?;
        Ok(Some(doc))
    }

    fn load_existing(&self, table: &str) -> Result<TableDocument> {
        self.load(table)?.ok_or_else(|| Error::TableNotFound {
            table: table.to_string(),
        })
    }
}

fn storage_error(table: &str, err: impl std::fmt::Display) -> Error {
    Error::Storage {
        table: table.to_string(),
        message: err.to_string(),
    }
}

impl TableStorage for FileStorage {
    fn store_data(
        &self,
        dataset: &DatasetId,
        table: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> Result<()> {
        let path = self.table_path(table)?;
        let content = serde_json::to_vec(&TableContent { columns, rows })
            .map_err(|e| storage_error(table, e))?;
        let checksum = compute_checksum(&content);

        // An unreadable existing document is simply replaced
        if let Ok(Some(existing)) = self.load(table)
            && existing.checksum == checksum
            && existing.dataset_id == *dataset
        {
            tracing::debug!(dataset = %dataset, table, "Table content unchanged, skipping write");
            return Ok(());
        }

        let doc = TableDocument {
            dataset_id: *dataset,
            table: table.to_string(),
            checksum,
            stored_at: Utc::now(),
            columns: columns.to_vec(),
            rows: rows.to_vec(),
        };
        let bytes = serde_json::to_vec_pretty(&doc).map_err(|e| storage_error(table, e))?;
        io::write_atomic(&path, &bytes).map_err(|e| storage_error(table, e))?;

        tracing::debug!(dataset = %dataset, table, rows = rows.len(), path = %path, "Stored table");
        Ok(())
    }

    fn get_data(&self, table: &str, request: &PageRequest) -> Result<DataPage> {
        let doc = self.load_existing(table)?;
        Ok(paginate(&doc.columns, &doc.rows, request))
    }

    fn columns(&self, table: &str) -> Result<Vec<String>> {
        Ok(self.load_existing(table)?.columns)
    }

    fn row_count(&self, table: &str) -> Result<u64> {
        Ok(self.load(table)?.map_or(0, |doc| doc.rows.len() as u64))
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.table_path(table)?.exists())
    }

    fn delete_data(&self, table: &str) -> Result<bool> {
        let path = self.table_path(table)?;
        let removed = io::remove_if_exists(&path).map_err(|e| storage_error(table, e))?;
        // Leftover advisory lock file from earlier writes
        let _ = io::remove_if_exists(&self.root.join(&format!("{table}.json.lock")));
        Ok(removed)
    }
}
