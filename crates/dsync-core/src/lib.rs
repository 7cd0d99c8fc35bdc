//! Dataset synchronization for dataset-sync
//!
//! Keeps a managed table in sync with a folder of source files, using the
//! folder's git history for change detection and as an audit trail.
//!
//! # Architecture
//!
//! `dsync-core` sits above the Layer 0 crates and below the CLI:
//!
//! ```text
//!                    CLI / API
//!                        |
//!                   dsync-core
//!                        |
//!          +-------------+-------------+
//!          |             |             |
//!      dsync-fs      dsync-git    dsync-ingest
//! ```
//!
//! - [`SyncService`] sequences commit, read and store for one dataset and
//!   guards each dataset with an in-process in-flight marker.
//! - [`DatasetStore`] persists dataset records and their sync status.
//! - [`TableStorage`] persists synced tables.
//! - [`DatasetService`] is the caller-facing surface.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use dsync_core::{DatasetService, RegisterDataset, SyncConfig};
//!
//! fn example() -> dsync_core::Result<()> {
//!     let service = DatasetService::from_config(&SyncConfig::default(), Path::new("/tmp/dsync"))?;
//!     let registration = service.register_dataset(RegisterDataset {
//!         folder_path: "/data/sales".into(),
//!         name: "Sales".into(),
//!         ..Default::default()
//!     })?;
//!     let outcome = service.trigger_sync(&registration.dataset.id, false)?;
//!     println!("{} rows", outcome.row_count());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod naming;
pub mod service;
pub mod storage;
pub mod store;
pub mod sync;

pub use config::{StorageBackend, SyncConfig, default_state_dir};
pub use error::{Error, ErrorKind, Result};
pub use model::{Dataset, DatasetId, NewDataset, StatusUpdate, SyncStatus};
pub use naming::{to_table_name, validate_table_name};
pub use service::{DatasetService, RegisterDataset, Registration, SyncStatusReport, TriggerOutcome};
pub use storage::{DataPage, FileStorage, MemoryStorage, PageRequest, TableStorage};
pub use store::{DatasetStore, FileDatasetStore, MemoryDatasetStore};
pub use sync::{SyncOutcome, SyncService, SyncStage};
