//! SyncService implementation

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use dsync_fs::NormalizedPath;
use dsync_git::HistoryBackend;
use dsync_ingest::FolderReader;

use super::guard::InFlight;
use super::{SyncOutcome, SyncStage};
use crate::model::{Dataset, DatasetId, StatusUpdate};
use crate::storage::TableStorage;
use crate::store::DatasetStore;
use crate::{Error, Result};

/// Coordinates history, ingestion and storage for dataset syncs.
///
/// Safe to share between threads. Syncs of different datasets run in
/// parallel; a second sync of the same dataset fails immediately with
/// [`Error::AlreadySyncing`] instead of waiting.
pub struct SyncService {
    history: Arc<dyn HistoryBackend>,
    reader: FolderReader,
    storage: Arc<dyn TableStorage>,
    store: Arc<dyn DatasetStore>,
    in_flight: InFlight,
}

impl SyncService {
    pub fn new(
        history: Arc<dyn HistoryBackend>,
        reader: FolderReader,
        storage: Arc<dyn TableStorage>,
        store: Arc<dyn DatasetStore>,
    ) -> Self {
        Self {
            history,
            reader,
            storage,
            store,
            in_flight: InFlight::new(),
        }
    }

    pub fn reader(&self) -> &FolderReader {
        &self.reader
    }

    pub fn storage(&self) -> &Arc<dyn TableStorage> {
        &self.storage
    }

    pub fn store(&self) -> &Arc<dyn DatasetStore> {
        &self.store
    }

    /// Whether the dataset's folder moved past its last synced commit.
    ///
    /// A dataset that was never synced always needs a sync; history is not
    /// consulted in that case.
    pub fn needs_sync(&self, dataset: &Dataset) -> Result<bool> {
        let folder = dataset
            .folder()
            .ok_or(Error::MissingFolderPath { id: dataset.id })?;

        let Some(last_commit) = dataset.last_commit() else {
            tracing::debug!(dataset = %dataset.id, "Never synced");
            return Ok(true);
        };

        let changed = self
            .history
            .has_changes_since(&folder, last_commit)
            .map_err(|source| Error::ChangeCheck {
                folder: folder.to_string(),
                source,
            })?;
        tracing::debug!(dataset = %dataset.id, commit = %last_commit, changed, "Checked for changes");
        Ok(changed)
    }

    /// Run one sync attempt for the dataset.
    ///
    /// Every failure after the dataset is marked `syncing` is written to its
    /// record as `error` and returned as [`Error::SyncFailed`] naming the
    /// stage. A commit made before a later failure is kept and recorded.
    pub fn sync_dataset(&self, dataset: &Dataset) -> Result<SyncOutcome> {
        let id = dataset.id;
        let folder = dataset.folder().ok_or(Error::MissingFolderPath { id })?;

        let Some(_guard) = self.in_flight.try_acquire(id) else {
            tracing::info!(dataset = %id, "Sync already in progress");
            return Err(Error::AlreadySyncing { id });
        };

        let span = tracing::info_span!("sync", dataset = %id, table = %dataset.table_name);
        let _enter = span.enter();

        self.store
            .apply(&id, StatusUpdate::Syncing)
            .map_err(|e| stage_error(id, SyncStage::MarkSyncing, e))?;
        tracing::debug!("Marked dataset as syncing");

        let message = format!(
            "Dataset sync at {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        let commit_hash = match self.history.commit_all(&folder, &message) {
            Ok(hash) => hash,
            Err(e) => return Err(self.fail(id, SyncStage::Commit, e.into(), None)),
        };
        tracing::debug!(commit = %commit_hash, "Captured folder state");

        let snapshot = match self.reader.read_folder(&folder) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                return Err(self.fail(id, SyncStage::Read, e.into(), Some(commit_hash)));
            }
        };

        if let Err(e) =
            self.storage
                .store_data(&id, &dataset.table_name, &snapshot.columns, &snapshot.rows)
        {
            return Err(self.fail(id, SyncStage::Store, e, Some(commit_hash)));
        }

        let row_count = snapshot.row_count() as u64;
        if let Err(e) = self.store.apply(
            &id,
            StatusUpdate::Ready {
                commit_hash: commit_hash.clone(),
                row_count,
                synced_at: Utc::now(),
            },
        ) {
            return Err(self.fail(id, SyncStage::Finalize, e, Some(commit_hash)));
        }

        tracing::info!(commit = %commit_hash, rows = row_count, files = snapshot.files.len(), "Dataset synced");
        Ok(SyncOutcome {
            commit_hash,
            row_count,
        })
    }

    /// Sync only if [`needs_sync`](Self::needs_sync) says so.
    ///
    /// `Ok(None)` means the dataset is already current.
    pub fn sync_if_needed(&self, dataset: &Dataset) -> Result<Option<SyncOutcome>> {
        if !self.needs_sync(dataset)? {
            tracing::debug!(dataset = %dataset.id, "Dataset is up to date");
            return Ok(None);
        }
        self.sync_dataset(dataset).map(Some)
    }

    /// Validate a folder and start tracking it; returns the commit that
    /// captures its current content.
    ///
    /// A folder that is already tracked is captured with a regular commit
    /// instead, so registering the same folder again succeeds.
    pub fn initialize_dataset(&self, folder: &NormalizedPath) -> Result<String> {
        self.reader.validate_folder(folder)?;

        match self.history.init_repo(folder) {
            Ok(hash) => {
                tracing::info!(folder = %folder, commit = %hash, "Started tracking folder");
                Ok(hash)
            }
            Err(dsync_git::Error::AlreadyTracked { .. }) => {
                let message = format!(
                    "Dataset registered at {}",
                    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
                );
                let hash = self.history.commit_all(folder, &message)?;
                tracing::info!(folder = %folder, commit = %hash, "Folder already tracked");
                Ok(hash)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a sync of the dataset is running in this process.
    pub fn is_syncing(&self, id: &DatasetId) -> bool {
        self.in_flight.contains(id)
    }

    /// Ids of all datasets currently syncing in this process.
    pub fn syncing_ids(&self) -> HashSet<DatasetId> {
        self.in_flight.snapshot()
    }

    /// Record a failed stage on the dataset and build the returned error.
    fn fail(
        &self,
        id: DatasetId,
        stage: SyncStage,
        error: Error,
        commit_hash: Option<String>,
    ) -> Error {
        let message = format!("{}: {}", stage.failure_prefix(), error);
        tracing::warn!(stage = %stage, error = %error, "Sync failed");

        if let Err(record_err) = self.store.apply(
            &id,
            StatusUpdate::Failed {
                message,
                commit_hash,
            },
        ) {
            tracing::error!(error = %record_err, "Could not record sync failure");
        }
        stage_error(id, stage, error)
    }
}

fn stage_error(id: DatasetId, stage: SyncStage, source: Error) -> Error {
    Error::SyncFailed {
        id,
        stage,
        source: Box::new(source),
    }
}

impl std::fmt::Debug for SyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncService")
            .field("reader", &self.reader)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}
