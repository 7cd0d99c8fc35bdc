//! Durable record behaviour across service instances
//!
//! A fresh [`DatasetService`] built from the same state directory stands in
//! for a restarted process.

use dsync_core::{
    DatasetService, DatasetStore, Error, FileDatasetStore, RegisterDataset, StatusUpdate,
    SyncConfig, SyncStatus, TriggerOutcome,
};
use dsync_test_utils::TestFolder;
use dsync_test_utils::git::{commit_count, head_hash, real_git_repo};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn service(state: &TempDir) -> DatasetService {
    DatasetService::from_config(&SyncConfig::default(), state.path()).unwrap()
}

fn sales_folder() -> TestFolder {
    let folder = TestFolder::new();
    folder.write_csv(
        "sales.csv",
        &["date", "amount"],
        &[&["2024-01-01", "100.00"], &["2024-01-02", "250.00"]],
    );
    folder
}

fn register(service: &DatasetService, folder: &TestFolder) -> dsync_core::Dataset {
    service
        .register_dataset(RegisterDataset {
            folder_path: folder.path_string(),
            name: "Sales".into(),
            ..Default::default()
        })
        .unwrap()
        .dataset
}

#[test]
fn test_sync_result_survives_restart() {
    let state = TempDir::new().unwrap();
    let folder = sales_folder();

    let first = service(&state);
    let dataset = register(&first, &folder);
    let synced = first.trigger_sync(&dataset.id, false).unwrap();
    drop(first);

    let second = service(&state);
    let stored = second.get_dataset(&dataset.id).unwrap();
    assert_eq!(stored.status, SyncStatus::Ready);
    assert_eq!(stored.row_count, 2);

    let TriggerOutcome::Synced { commit_hash, .. } = synced else {
        panic!("first sync should run, got {synced:?}");
    };
    assert_eq!(
        second.trigger_sync(&dataset.id, false).unwrap(),
        TriggerOutcome::UpToDate {
            commit_hash: Some(commit_hash),
            row_count: 2,
        }
    );
    assert!(!second.check(&dataset.id).unwrap());
}

#[test]
fn test_interrupted_sync_is_stale_and_recoverable() {
    let state = TempDir::new().unwrap();
    let folder = sales_folder();

    let first = service(&state);
    let dataset = register(&first, &folder);
    drop(first);

    // A process that died after marking the dataset.
    let store = FileDatasetStore::new(state.path().join("datasets.toml"));
    store.apply(&dataset.id, StatusUpdate::Syncing).unwrap();

    let second = service(&state);
    let stale = second.stale_syncing().unwrap();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].id, dataset.id);

    let outcome = second.trigger_sync(&dataset.id, false).unwrap();
    assert_eq!(outcome.row_count(), 2);
    assert!(second.stale_syncing().unwrap().is_empty());
    assert_eq!(
        second.sync_status(&dataset.id).unwrap().status,
        SyncStatus::Ready
    );
}

#[test]
fn test_second_registration_of_folder_is_rejected() {
    let state = TempDir::new().unwrap();
    let folder = sales_folder();
    let service = service(&state);

    let first = register(&service, &folder);
    let err = service
        .register_dataset(RegisterDataset {
            folder_path: folder.path_string(),
            name: "Sales Copy".into(),
            ..Default::default()
        })
        .unwrap_err();

    assert!(matches!(err, Error::FolderInUse { id, .. } if id == first.id));
    assert_eq!(commit_count(folder.path()), 1);
    assert_eq!(service.list_datasets().unwrap().len(), 1);
}

#[test]
fn test_register_folder_with_existing_repository() {
    let state = TempDir::new().unwrap();
    let folder = sales_folder();
    real_git_repo(folder.path());
    let service = service(&state);

    let registration = service
        .register_dataset(RegisterDataset {
            folder_path: folder.path_string(),
            name: "Sales".into(),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(commit_count(folder.path()), 1);
    assert_eq!(head_hash(folder.path()), Some(registration.initial_commit));
}

#[test]
fn test_two_datasets_sync_independently() {
    let state = TempDir::new().unwrap();
    let sales = sales_folder();
    let costs = TestFolder::new();
    costs.write_file("costs.tsv", "month\tcost\n2024-01\t40\n");

    let service = service(&state);
    let sales_id = register(&service, &sales).id;
    let costs_id = service
        .register_dataset(RegisterDataset {
            folder_path: costs.path_string(),
            name: "Costs".into(),
            ..Default::default()
        })
        .unwrap()
        .dataset
        .id;

    assert_eq!(service.trigger_sync(&sales_id, false).unwrap().row_count(), 2);
    assert_eq!(service.trigger_sync(&costs_id, false).unwrap().row_count(), 1);

    sales.append_row("sales.csv", &["2024-01-03", "75.00"]);
    assert!(service.check(&sales_id).unwrap());
    assert!(!service.check(&costs_id).unwrap());
}
