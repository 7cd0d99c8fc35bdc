//! In-memory table storage

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use dsync_ingest::Value;

use super::{DataPage, PageRequest, TableStorage, paginate};
use crate::model::DatasetId;
use crate::naming::validate_table_name;
use crate::{Error, Result};

#[derive(Debug, Clone)]
struct StoredTable {
    dataset: DatasetId,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Tables held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<HashMap<String, StoredTable>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dataset that last wrote `table`.
    pub fn owner(&self, table: &str) -> Option<DatasetId> {
        self.read().get(table).map(|t| t.dataset)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, StoredTable>> {
        self.tables
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, StoredTable>> {
        self.tables
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TableStorage for MemoryStorage {
    fn store_data(
        &self,
        dataset: &DatasetId,
        table: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> Result<()> {
        validate_table_name(table)?;
        self.write().insert(
            table.to_string(),
            StoredTable {
                dataset: *dataset,
                columns: columns.to_vec(),
                rows: rows.to_vec(),
            },
        );
        tracing::debug!(dataset = %dataset, table, rows = rows.len(), "Stored table in memory");
        Ok(())
    }

    fn get_data(&self, table: &str, request: &PageRequest) -> Result<DataPage> {
        let tables = self.read();
        let stored = tables.get(table).ok_or_else(|| Error::TableNotFound {
            table: table.to_string(),
        })?;
        Ok(paginate(&stored.columns, &stored.rows, request))
    }

    fn columns(&self, table: &str) -> Result<Vec<String>> {
        self.read()
            .get(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| Error::TableNotFound {
                table: table.to_string(),
            })
    }

    fn row_count(&self, table: &str) -> Result<u64> {
        Ok(self.read().get(table).map_or(0, |t| t.rows.len() as u64))
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.read().contains_key(table))
    }

    fn delete_data(&self, table: &str) -> Result<bool> {
        Ok(self.write().remove(table).is_some())
    }
}
