//! End-to-end sync scenarios against real backends
//!
//! Each test drives a [`SyncService`] wired to git history, the JSON file
//! storage and the TOML registry, all rooted in temporary directories.

use std::sync::Arc;

use chrono::Utc;
use dsync_core::{
    Dataset, DatasetStore, ErrorKind, FileDatasetStore, FileStorage, NewDataset, PageRequest,
    SyncService, SyncStage, SyncStatus, TableStorage,
};
use dsync_fs::NormalizedPath;
use dsync_git::GitHistory;
use dsync_ingest::{FolderReader, Value};
use dsync_test_utils::TestFolder;
use dsync_test_utils::git::{commit_count, head_hash};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Env {
    _state: TempDir,
    folder: TestFolder,
    store: Arc<FileDatasetStore>,
    storage: Arc<FileStorage>,
    sync: SyncService,
}

impl Env {
    /// `data/sales` style folder with one two-row CSV file.
    fn new() -> Self {
        let state = TempDir::new().unwrap();
        let folder = TestFolder::new();
        folder.write_csv(
            "sales.csv",
            &["date", "amount"],
            &[&["2024-01-01", "100.00"], &["2024-01-02", "250.00"]],
        );

        let store = Arc::new(FileDatasetStore::new(state.path().join("datasets.toml")));
        let storage = Arc::new(FileStorage::new(state.path().join("tables")));
        let sync = SyncService::new(
            Arc::new(GitHistory::new()),
            FolderReader::new(),
            storage.clone(),
            store.clone(),
        );

        Self {
            _state: state,
            folder,
            store,
            storage,
            sync,
        }
    }

    fn folder_path(&self) -> NormalizedPath {
        NormalizedPath::new(self.folder.path())
    }

    /// Record a dataset for the folder without syncing it.
    fn record(&self, folder_path: String) -> Dataset {
        let dataset = Dataset::new(
            NewDataset {
                name: "Sales".into(),
                table_name: "sales".into(),
                folder_path,
                ..Default::default()
            },
            Utc::now(),
        );
        self.store.create(dataset.clone()).unwrap();
        dataset
    }

    fn table_document(&self) -> String {
        std::fs::read_to_string(self.storage.root().to_native().join("sales.json")).unwrap()
    }
}

fn row(cells: &[&str]) -> Vec<Value> {
    cells.iter().map(|c| Value::from(*c)).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

/// Initialize, then a first sync reads the folder at the initial commit.
#[test]
fn scenario_a_first_sync_stores_initial_content() {
    let env = Env::new();

    let h0 = env.sync.initialize_dataset(&env.folder_path()).unwrap();
    assert_eq!(head_hash(env.folder.path()), Some(h0.clone()));

    let dataset = env.record(env.folder.path_string());
    assert_eq!(dataset.last_commit_hash, None);

    let outcome = env.sync.sync_dataset(&dataset).unwrap();
    assert_eq!(outcome.commit_hash, h0);
    assert_eq!(outcome.row_count, 2);
    assert_eq!(commit_count(env.folder.path()), 1);

    let stored = env.store.get(&dataset.id).unwrap();
    assert_eq!(stored.status, SyncStatus::Ready);
    assert_eq!(stored.row_count, 2);
    assert_eq!(stored.last_commit_hash, Some(h0));
    assert_eq!(stored.error_message, None);
    assert!(stored.last_synced_at.is_some());

    let page = env.storage.get_data("sales", &PageRequest::default()).unwrap();
    assert_eq!(page.columns, vec!["date", "amount"]);
    assert_eq!(
        page.rows,
        vec![
            row(&["2024-01-01", "100.00"]),
            row(&["2024-01-02", "250.00"])
        ]
    );
}

/// An unchanged folder neither commits nor writes storage.
#[test]
fn scenario_b_unchanged_folder_is_current() {
    let env = Env::new();
    env.sync.initialize_dataset(&env.folder_path()).unwrap();
    let dataset = env.record(env.folder.path_string());
    env.sync.sync_dataset(&dataset).unwrap();

    let synced = env.store.get(&dataset.id).unwrap();
    let document = env.table_document();
    let commits = commit_count(env.folder.path());

    assert!(!env.sync.needs_sync(&synced).unwrap());
    assert_eq!(env.sync.sync_if_needed(&synced).unwrap(), None);

    assert_eq!(commit_count(env.folder.path()), commits);
    assert_eq!(env.table_document(), document);
    assert_eq!(env.store.get(&dataset.id).unwrap(), synced);
}

/// A new row is detected and synced at a new commit.
#[test]
fn scenario_c_appended_row_is_synced() {
    let env = Env::new();
    let h0 = env.sync.initialize_dataset(&env.folder_path()).unwrap();
    let dataset = env.record(env.folder.path_string());
    env.sync.sync_dataset(&dataset).unwrap();

    env.folder.append_row("sales.csv", &["2024-01-03", "75.00"]);
    let synced = env.store.get(&dataset.id).unwrap();
    assert!(env.sync.needs_sync(&synced).unwrap());

    let outcome = env.sync.sync_dataset(&synced).unwrap();
    assert_ne!(outcome.commit_hash, h0);
    assert_eq!(outcome.row_count, 3);
    assert_eq!(commit_count(env.folder.path()), 2);

    let stored = env.store.get(&dataset.id).unwrap();
    assert_eq!(stored.last_commit_hash, Some(outcome.commit_hash));
    assert_eq!(stored.row_count, 3);
    assert_eq!(env.storage.row_count("sales").unwrap(), 3);
}

/// A dataset without a folder path fails change detection as a
/// configuration problem and is left untouched.
#[test]
fn scenario_d_missing_folder_path_is_configuration_error() {
    let env = Env::new();
    let dataset = env.record(String::new());

    let err = env.sync.needs_sync(&dataset).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = env.sync.sync_if_needed(&dataset).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let stored = env.store.get(&dataset.id).unwrap();
    assert_eq!(stored.status, SyncStatus::Pending);
    assert!(!env.storage.table_exists("sales").unwrap());
}

// =============================================================================
// Failure paths
// =============================================================================

#[test]
fn test_read_failure_keeps_commit_and_records_error() {
    let env = Env::new();
    let h0 = env.sync.initialize_dataset(&env.folder_path()).unwrap();
    let dataset = env.record(env.folder.path_string());
    env.sync.sync_dataset(&dataset).unwrap();

    env.folder.write_file("broken.csv", "date,amount\n2024-02-01\n");
    let synced = env.store.get(&dataset.id).unwrap();

    let err = env.sync.sync_dataset(&synced).unwrap_err();
    assert_eq!(err.sync_stage(), Some(SyncStage::Read));
    assert_eq!(err.kind(), ErrorKind::Ingestion);

    let stored = env.store.get(&dataset.id).unwrap();
    assert_eq!(stored.status, SyncStatus::Error);
    let message = stored.error_message.clone().unwrap();
    assert!(message.starts_with("Failed to read folder: "), "{message}");
    assert!(message.contains("broken.csv, line 2"), "{message}");

    // The commit made before the read failed is recorded.
    let head = head_hash(env.folder.path()).unwrap();
    assert_ne!(head, h0);
    assert_eq!(stored.last_commit_hash, Some(head));
    assert_eq!(env.storage.row_count("sales").unwrap(), 2);
}

#[test]
fn test_folder_removed_after_registration() {
    let env = Env::new();
    env.sync.initialize_dataset(&env.folder_path()).unwrap();
    let dataset = env.record(env.folder.path_string());
    env.sync.sync_dataset(&dataset).unwrap();

    let synced = env.store.get(&dataset.id).unwrap();
    std::fs::remove_dir_all(env.folder.path()).unwrap();

    let err = env.sync.needs_sync(&synced).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_initialize_rejects_folder_without_tabular_files() {
    let env = Env::new();
    env.folder.remove_file("sales.csv");
    env.folder.write_file("readme.txt", "no data here");

    let err = env.sync.initialize_dataset(&env.folder_path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(head_hash(env.folder.path()), None);
}
