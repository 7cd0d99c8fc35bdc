//! TOML-file dataset store
//!
//! All records live in one registry file:
//!
//! ```toml
//! version = "1.0"
//!
//! [[datasets]]
//! id = "6f1c..."
//! name = "Sales"
//! table_name = "sales"
//! folder_path = "/data/sales"
//! status = "ready"
//! ```
//!
//! Reads take a shared lock, writes go through an exclusive lock and a
//! temp-file rename, so a crash never leaves a half-written registry.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use dsync_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};

use super::{DatasetStore, ensure_unique, sort_oldest_first};
use crate::model::{Dataset, DatasetId, StatusUpdate};
use crate::{Error, Result};

const REGISTRY_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Registry {
    version: String,
    #[serde(default)]
    datasets: Vec<Dataset>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            version: REGISTRY_VERSION.to_string(),
            datasets: Vec::new(),
        }
    }
}

/// Dataset records persisted in a TOML registry file.
#[derive(Debug)]
pub struct FileDatasetStore {
    path: NormalizedPath,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileDatasetStore {
    /// Store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<NormalizedPath>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(&self) -> Result<Registry> {
        if !self.path.exists() {
            return Ok(Registry::default());
        }
        let content = io::read_text(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Registry::default());
        }
        let registry: Registry = toml::from_str(&content).map_err(|e| self.error(e))?;
        if registry.version != REGISTRY_VERSION {
            tracing::warn!(
                path = %self.path,
                version = %registry.version,
                "Dataset registry has unexpected version"
            );
        }
        Ok(registry)
    }

    fn save(&self, registry: &Registry) -> Result<()> {
        let content = toml::to_string_pretty(registry).map_err(|e| self.error(e))?;
        io::write_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }

    fn error(&self, err: impl std::fmt::Display) -> Error {
        Error::Registry {
            path: self.path.to_native(),
            message: err.to_string(),
        }
    }
}

impl DatasetStore for FileDatasetStore {
    fn get(&self, id: &DatasetId) -> Result<Dataset> {
        self.load()?
            .datasets
            .into_iter()
            .find(|d| d.id == *id)
            .ok_or(Error::DatasetNotFound { id: *id })
    }

    fn list(&self) -> Result<Vec<Dataset>> {
        let mut datasets = self.load()?.datasets;
        sort_oldest_first(&mut datasets);
        Ok(datasets)
    }

    fn create(&self, dataset: Dataset) -> Result<()> {
        let _guard = self.lock();
        let mut registry = self.load()?;
        ensure_unique(&registry.datasets, &dataset)?;
        tracing::debug!(dataset = %dataset.id, name = %dataset.name, "Recording dataset");
        registry.datasets.push(dataset);
        self.save(&registry)
    }

    fn apply(&self, id: &DatasetId, update: StatusUpdate) -> Result<Dataset> {
        let _guard = self.lock();
        let mut registry = self.load()?;
        let record = registry
            .datasets
            .iter_mut()
            .find(|d| d.id == *id)
            .ok_or(Error::DatasetNotFound { id: *id })?;
        record.apply(update, Utc::now())?;
        let updated = record.clone();
        self.save(&registry)?;
        tracing::trace!(dataset = %id, status = %updated.status, "Status persisted");
        Ok(updated)
    }
}
