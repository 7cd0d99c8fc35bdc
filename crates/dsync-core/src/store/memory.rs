//! In-memory dataset store

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::{DatasetStore, ensure_unique, sort_oldest_first};
use crate::model::{Dataset, DatasetId, StatusUpdate};
use crate::{Error, Result};

/// Dataset records held in process memory.
#[derive(Debug, Default)]
pub struct MemoryDatasetStore {
    records: Mutex<HashMap<DatasetId, Dataset>>,
}

impl MemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<DatasetId, Dataset>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DatasetStore for MemoryDatasetStore {
    fn get(&self, id: &DatasetId) -> Result<Dataset> {
        self.records()
            .get(id)
            .cloned()
            .ok_or(Error::DatasetNotFound { id: *id })
    }

    fn list(&self) -> Result<Vec<Dataset>> {
        let mut datasets: Vec<Dataset> = self.records().values().cloned().collect();
        sort_oldest_first(&mut datasets);
        Ok(datasets)
    }

    fn create(&self, dataset: Dataset) -> Result<()> {
        let mut records = self.records();
        ensure_unique(records.values(), &dataset)?;
        records.insert(dataset.id, dataset);
        Ok(())
    }

    fn apply(&self, id: &DatasetId, update: StatusUpdate) -> Result<Dataset> {
        let mut records = self.records();
        let record = records
            .get_mut(id)
            .ok_or(Error::DatasetNotFound { id: *id })?;
        record.apply(update, Utc::now())?;
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewDataset, SyncStatus};

    fn dataset(name: &str) -> Dataset {
        Dataset::new(
            NewDataset {
                name: name.into(),
                table_name: name.to_lowercase(),
                folder_path: format!("/data/{name}"),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn create_get_apply() {
        let store = MemoryDatasetStore::new();
        let ds = dataset("Sales");
        let id = ds.id;
        store.create(ds).unwrap();

        let updated = store.apply(&id, StatusUpdate::Syncing).unwrap();
        assert_eq!(updated.status, SyncStatus::Syncing);
        assert_eq!(store.get(&id).unwrap().status, SyncStatus::Syncing);
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let store = MemoryDatasetStore::new();
        let ds = dataset("Sales");
        store.create(ds.clone()).unwrap();
        assert!(matches!(
            store.create(ds),
            Err(Error::DuplicateDataset { .. })
        ));
    }

    #[test]
    fn table_and_folder_are_owned_once() {
        let store = MemoryDatasetStore::new();
        let first = dataset("Sales");
        store.create(first.clone()).unwrap();

        let mut same_table = dataset("Sales");
        same_table.folder_path = "/data/other".into();
        assert!(matches!(
            store.create(same_table),
            Err(Error::TableInUse { id, .. }) if id == first.id
        ));

        let mut same_folder = dataset("Costs");
        same_folder.folder_path = first.folder_path.clone();
        assert!(matches!(
            store.create(same_folder),
            Err(Error::FolderInUse { id, .. }) if id == first.id
        ));

        store.create(dataset("Costs")).unwrap();
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn rejected_transition_leaves_record_untouched() {
        let store = MemoryDatasetStore::new();
        let ds = dataset("Sales");
        let id = ds.id;
        store.create(ds).unwrap();

        let err = store
            .apply(
                &id,
                StatusUpdate::Failed {
                    message: "x".into(),
                    commit_hash: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
        assert_eq!(store.get(&id).unwrap().status, SyncStatus::Pending);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = MemoryDatasetStore::new();
        assert!(matches!(
            store.get(&DatasetId::new()),
            Err(Error::DatasetNotFound { .. })
        ));
    }
}
