//! Caller-facing dataset operations
//!
//! [`DatasetService`] is the narrow surface an HTTP layer or CLI talks to:
//! register a folder, trigger a sync, poll status, read the synced table.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dsync_fs::NormalizedPath;
use dsync_git::HistoryBackend;
use dsync_ingest::FolderReader;
use serde::Serialize;

use crate::config::{StorageBackend, SyncConfig};
use crate::model::{Dataset, DatasetId, NewDataset, SyncStatus};
use crate::naming::{to_table_name, validate_table_name};
use crate::storage::{DataPage, FileStorage, MemoryStorage, PageRequest, TableStorage};
use crate::store::{DatasetStore, FileDatasetStore, ensure_unique};
use crate::sync::{SyncOutcome, SyncService};
use crate::{Error, Result};

/// Input for [`DatasetService::register_dataset`].
#[derive(Debug, Clone, Default)]
pub struct RegisterDataset {
    pub folder_path: String,
    pub name: String,
    /// Derived from `name` when absent
    pub table_name: Option<String>,
    pub description: Option<String>,
}

/// A newly registered dataset and the commit that captured its folder.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub dataset: Dataset,
    pub initial_commit: String,
}

/// What a triggered sync did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TriggerOutcome {
    Synced { commit_hash: String, row_count: u64 },
    UpToDate {
        commit_hash: Option<String>,
        row_count: u64,
    },
}

impl TriggerOutcome {
    pub fn row_count(&self) -> u64 {
        match self {
            Self::Synced { row_count, .. } | Self::UpToDate { row_count, .. } => *row_count,
        }
    }
}

impl From<SyncOutcome> for TriggerOutcome {
    fn from(outcome: SyncOutcome) -> Self {
        Self::Synced {
            commit_hash: outcome.commit_hash,
            row_count: outcome.row_count,
        }
    }
}

/// Durable sync fields plus the live in-flight flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatusReport {
    pub id: DatasetId,
    pub name: String,
    pub status: SyncStatus,
    pub error_message: Option<String>,
    pub last_commit_hash: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub row_count: u64,
    /// A sync is running in this process right now
    pub syncing: bool,
}

pub struct DatasetService {
    sync: SyncService,
}

impl DatasetService {
    pub fn new(
        history: Arc<dyn HistoryBackend>,
        reader: FolderReader,
        storage: Arc<dyn TableStorage>,
        store: Arc<dyn DatasetStore>,
    ) -> Self {
        Self {
            sync: SyncService::new(history, reader, storage, store),
        }
    }

    /// Build the service from configuration, resolving relative paths
    /// against `state_dir`.
    pub fn from_config(config: &SyncConfig, state_dir: &Path) -> Result<Self> {
        config.validate()?;

        let storage: Arc<dyn TableStorage> = match config.storage.backend {
            StorageBackend::File => Arc::new(FileStorage::new(config.storage_root(state_dir))),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        let store = Arc::new(FileDatasetStore::new(config.registry_path(state_dir)));

        tracing::debug!(
            state_dir = %state_dir.display(),
            backend = ?config.storage.backend,
            "Building dataset service"
        );
        Ok(Self::new(
            Arc::new(config.history()),
            config.reader()?,
            storage,
            store,
        ))
    }

    pub fn sync_service(&self) -> &SyncService {
        &self.sync
    }

    /// Start tracking a folder and record it as a `pending` dataset.
    pub fn register_dataset(&self, request: RegisterDataset) -> Result<Registration> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidConfig {
                message: "dataset name must not be empty".to_string(),
            });
        }
        let folder = NormalizedPath::new(request.folder_path.trim());
        if folder.is_empty() {
            return Err(Error::InvalidConfig {
                message: "folder path must not be empty".to_string(),
            });
        }

        let table_name = match request.table_name.as_deref().map(str::trim) {
            Some(table) if !table.is_empty() => table.to_string(),
            _ => to_table_name(name),
        };
        validate_table_name(&table_name)?;
        self.sync.reader().validate_folder(&folder)?;
        let folder = folder.resolve()?;

        let dataset = Dataset::new(
            NewDataset {
                name: name.to_string(),
                description: request.description,
                table_name,
                folder_path: folder.to_string(),
            },
            Utc::now(),
        );
        // Checked again by `create`; this one keeps a rejected request from
        // touching the folder's history.
        ensure_unique(&self.sync.store().list()?, &dataset)?;

        let initial_commit = self.sync.initialize_dataset(&folder)?;
        self.sync.store().create(dataset.clone())?;
        tracing::info!(
            dataset = %dataset.id,
            table = %dataset.table_name,
            folder = %dataset.folder_path,
            "Registered dataset"
        );

        Ok(Registration {
            dataset,
            initial_commit,
        })
    }

    /// Sync a dataset if its folder changed, or unconditionally with `force`.
    ///
    /// `force` retries a dataset whose last attempt committed but failed to
    /// store; change detection would report it as current.
    pub fn trigger_sync(&self, id: &DatasetId, force: bool) -> Result<TriggerOutcome> {
        let dataset = self.sync.store().get(id)?;
        let outcome = if force {
            Some(self.sync.sync_dataset(&dataset)?)
        } else {
            self.sync.sync_if_needed(&dataset)?
        };

        Ok(match outcome {
            Some(outcome) => outcome.into(),
            None => TriggerOutcome::UpToDate {
                commit_hash: dataset.last_commit().map(str::to_string),
                row_count: dataset.row_count,
            },
        })
    }

    /// Whether the dataset's folder changed since its last sync.
    pub fn check(&self, id: &DatasetId) -> Result<bool> {
        let dataset = self.sync.store().get(id)?;
        self.sync.needs_sync(&dataset)
    }

    pub fn sync_status(&self, id: &DatasetId) -> Result<SyncStatusReport> {
        let dataset = self.sync.store().get(id)?;
        Ok(SyncStatusReport {
            id: dataset.id,
            syncing: self.sync.is_syncing(&dataset.id),
            name: dataset.name,
            status: dataset.status,
            error_message: dataset.error_message,
            last_commit_hash: dataset.last_commit_hash,
            last_synced_at: dataset.last_synced_at,
            row_count: dataset.row_count,
        })
    }

    pub fn get_dataset(&self, id: &DatasetId) -> Result<Dataset> {
        self.sync.store().get(id)
    }

    pub fn list_datasets(&self) -> Result<Vec<Dataset>> {
        self.sync.store().list()
    }

    /// Datasets recorded as `syncing` with no sync running in this process.
    ///
    /// These were left behind by a crashed or killed process. They do not
    /// block a new sync.
    pub fn stale_syncing(&self) -> Result<Vec<Dataset>> {
        let running = self.sync.syncing_ids();
        Ok(self
            .sync
            .store()
            .list()?
            .into_iter()
            .filter(|d| d.status == SyncStatus::Syncing && !running.contains(&d.id))
            .collect())
    }

    /// A page of the dataset's synced table.
    pub fn table_data(&self, id: &DatasetId, request: &PageRequest) -> Result<DataPage> {
        let dataset = self.sync.store().get(id)?;
        self.sync.storage().get_data(&dataset.table_name, request)
    }
}

impl std::fmt::Debug for DatasetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetService")
            .field("sync", &self.sync)
            .finish()
    }
}
