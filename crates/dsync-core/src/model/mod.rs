//! Dataset records and their sync state

mod dataset;
mod status;

pub use dataset::{Dataset, DatasetId, NewDataset};
pub use status::{StatusUpdate, SyncStatus};
