//! Shared doubles for dsync-core tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};

use chrono::Utc;
use dsync_core::{
    Dataset, DatasetId, DatasetStore, Error, MemoryDatasetStore, MemoryStorage, NewDataset,
    PageRequest, Result, StatusUpdate, SyncService, TableStorage,
};
use dsync_core::storage::DataPage;
use dsync_fs::NormalizedPath;
use dsync_git::HistoryBackend;
use dsync_ingest::{FolderReader, Value};
use dsync_test_utils::TestFolder;

// ============================================================================
// History
// ============================================================================

/// Scripted history: the folder "changes" whenever a test says so.
#[derive(Debug, Default)]
pub struct MockHistory {
    head: Mutex<Option<String>>,
    next: AtomicUsize,
    pub changed: AtomicBool,
    pub fail_commit: AtomicBool,
    pub fail_check: AtomicBool,
    pub check_calls: AtomicUsize,
    pub commit_calls: AtomicUsize,
}

impl MockHistory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn touch(&self) {
        self.changed.store(true, Ordering::SeqCst);
    }

    pub fn head(&self) -> Option<String> {
        self.head.lock().unwrap().clone()
    }

    pub fn checks(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commit_calls.load(Ordering::SeqCst)
    }

    fn new_head(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let hash = format!("{n:040x}");
        *self.head.lock().unwrap() = Some(hash.clone());
        self.changed.store(false, Ordering::SeqCst);
        hash
    }
}

impl HistoryBackend for MockHistory {
    fn has_changes_since(&self, folder: &NormalizedPath, commit_hash: &str) -> dsync_git::Result<bool> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_check.load(Ordering::SeqCst) {
            return Err(dsync_git::Error::UnknownCommit {
                hash: commit_hash.to_string(),
                path: folder.to_native(),
            });
        }
        let head = self.head();
        Ok(self.changed.load(Ordering::SeqCst) || head.as_deref() != Some(commit_hash))
    }

    fn commit_all(&self, folder: &NormalizedPath, _message: &str) -> dsync_git::Result<String> {
        self.commit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_commit.load(Ordering::SeqCst) {
            return Err(dsync_git::Error::NotTracked {
                path: folder.to_native(),
            });
        }
        match self.head() {
            Some(head) if !self.changed.load(Ordering::SeqCst) => Ok(head),
            _ => Ok(self.new_head()),
        }
    }

    fn init_repo(&self, folder: &NormalizedPath) -> dsync_git::Result<String> {
        if self.head().is_some() {
            return Err(dsync_git::Error::AlreadyTracked {
                path: folder.to_native(),
            });
        }
        Ok(self.new_head())
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Memory storage that counts writes.
#[derive(Debug, Default)]
pub struct CountingStorage {
    pub inner: MemoryStorage,
    writes: AtomicUsize,
}

impl CountingStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl TableStorage for CountingStorage {
    fn store_data(
        &self,
        dataset: &DatasetId,
        table: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.store_data(dataset, table, columns, rows)
    }

    fn get_data(&self, table: &str, request: &PageRequest) -> Result<DataPage> {
        self.inner.get_data(table, request)
    }

    fn columns(&self, table: &str) -> Result<Vec<String>> {
        self.inner.columns(table)
    }

    fn row_count(&self, table: &str) -> Result<u64> {
        self.inner.row_count(table)
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        self.inner.table_exists(table)
    }

    fn delete_data(&self, table: &str) -> Result<bool> {
        self.inner.delete_data(table)
    }
}

/// Storage whose writes always fail.
#[derive(Debug, Default)]
pub struct FailingStorage;

impl TableStorage for FailingStorage {
    fn store_data(&self, _: &DatasetId, table: &str, _: &[String], _: &[Vec<Value>]) -> Result<()> {
        Err(Error::Storage {
            table: table.to_string(),
            message: "connection refused".to_string(),
        })
    }

    fn get_data(&self, table: &str, _: &PageRequest) -> Result<DataPage> {
        Err(Error::TableNotFound {
            table: table.to_string(),
        })
    }

    fn columns(&self, table: &str) -> Result<Vec<String>> {
        Err(Error::TableNotFound {
            table: table.to_string(),
        })
    }

    fn row_count(&self, _: &str) -> Result<u64> {
        Ok(0)
    }

    fn table_exists(&self, _: &str) -> Result<bool> {
        Ok(false)
    }

    fn delete_data(&self, _: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Storage that parks every write until the test releases it.
pub struct GatedStorage {
    inner: MemoryStorage,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl GatedStorage {
    /// Returns the storage, a receiver signalled when a write starts, and a
    /// sender that lets one parked write finish.
    pub fn new() -> (Arc<Self>, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let storage = Arc::new(Self {
            inner: MemoryStorage::new(),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        });
        (storage, entered_rx, release_tx)
    }
}

impl TableStorage for GatedStorage {
    fn store_data(
        &self,
        dataset: &DatasetId,
        table: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> Result<()> {
        self.entered.lock().unwrap().send(()).unwrap();
        self.release.lock().unwrap().recv().unwrap();
        self.inner.store_data(dataset, table, columns, rows)
    }

    fn get_data(&self, table: &str, request: &PageRequest) -> Result<DataPage> {
        self.inner.get_data(table, request)
    }

    fn columns(&self, table: &str) -> Result<Vec<String>> {
        self.inner.columns(table)
    }

    fn row_count(&self, table: &str) -> Result<u64> {
        self.inner.row_count(table)
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        self.inner.table_exists(table)
    }

    fn delete_data(&self, table: &str) -> Result<bool> {
        self.inner.delete_data(table)
    }
}

// ============================================================================
// Record store
// ============================================================================

/// Memory store whose first `Ready` write fails, as a registry that drops
/// out between the store step and the final status write would.
pub struct FlakyReadyStore {
    pub inner: MemoryDatasetStore,
    rejected: AtomicBool,
}

impl FlakyReadyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryDatasetStore::new(),
            rejected: AtomicBool::new(false),
        })
    }
}

impl DatasetStore for FlakyReadyStore {
    fn get(&self, id: &DatasetId) -> Result<Dataset> {
        self.inner.get(id)
    }

    fn list(&self) -> Result<Vec<Dataset>> {
        self.inner.list()
    }

    fn create(&self, dataset: Dataset) -> Result<()> {
        self.inner.create(dataset)
    }

    fn apply(&self, id: &DatasetId, update: StatusUpdate) -> Result<Dataset> {
        if matches!(update, StatusUpdate::Ready { .. }) && !self.rejected.swap(true, Ordering::SeqCst)
        {
            return Err(Error::Registry {
                path: "datasets.toml".into(),
                message: "disk full".into(),
            });
        }
        self.inner.apply(id, update)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Folder with the two-row sales file used across scenarios.
pub fn sales_folder() -> TestFolder {
    let folder = TestFolder::new();
    folder.write_csv(
        "sales.csv",
        &["date", "amount"],
        &[&["2024-01-01", "100.00"], &["2024-01-02", "250.00"]],
    );
    folder
}

/// Record a pending dataset for `folder_path` in `store`.
pub fn record_dataset(store: &dyn DatasetStore, table: &str, folder_path: &str) -> Dataset {
    let dataset = Dataset::new(
        NewDataset {
            name: table.to_string(),
            description: None,
            table_name: table.to_string(),
            folder_path: folder_path.to_string(),
        },
        Utc::now(),
    );
    store.create(dataset.clone()).unwrap();
    dataset
}

pub fn service(
    history: Arc<MockHistory>,
    storage: Arc<dyn TableStorage>,
    store: Arc<MemoryDatasetStore>,
) -> SyncService {
    SyncService::new(history, FolderReader::new(), storage, store)
}
