//! Durable dataset record store
//!
//! The orchestrator reads dataset records and overwrites their sync fields
//! through [`DatasetStore::apply`]. Each call is atomic for one record.

mod file;
mod memory;

pub use file::FileDatasetStore;
pub use memory::MemoryDatasetStore;

use crate::model::{Dataset, DatasetId, StatusUpdate};
use crate::{Error, Result};

/// Keyed store of dataset records.
pub trait DatasetStore: Send + Sync {
    /// Fetch one record; [`Error::DatasetNotFound`](crate::Error::DatasetNotFound)
    /// when the id is unknown.
    fn get(&self, id: &DatasetId) -> Result<Dataset>;

    /// All records, oldest first.
    fn list(&self) -> Result<Vec<Dataset>>;

    /// Insert a new record.
    ///
    /// Fails if the id exists, or if another record already owns the table
    /// name or the folder. The check and the insert happen under one lock.
    fn create(&self, dataset: Dataset) -> Result<()>;

    /// Apply a status update as one atomic overwrite and return the result.
    fn apply(&self, id: &DatasetId, update: StatusUpdate) -> Result<Dataset>;
}

/// Reject `dataset` if `existing` already holds its id, table or folder.
///
/// Two datasets on one folder would share its git index.
pub(crate) fn ensure_unique<'a>(
    existing: impl IntoIterator<Item = &'a Dataset>,
    dataset: &Dataset,
) -> Result<()> {
    let folder = dataset.folder();
    for other in existing {
        if other.id == dataset.id {
            return Err(Error::DuplicateDataset { id: dataset.id });
        }
        if other.table_name == dataset.table_name {
            return Err(Error::TableInUse {
                table: dataset.table_name.clone(),
                id: other.id,
            });
        }
        if let Some(folder) = &folder
            && other.folder().as_ref() == Some(folder)
        {
            return Err(Error::FolderInUse {
                folder: folder.to_string(),
                id: other.id,
            });
        }
    }
    Ok(())
}

fn sort_oldest_first(datasets: &mut [Dataset]) {
    datasets.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}
