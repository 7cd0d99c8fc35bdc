//! Error types for dsync-core

use std::path::PathBuf;

use crate::model::{DatasetId, SyncStatus};
use crate::sync::SyncStage;

/// Result type for dsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Dataset record carries no source folder
    #[error("Dataset {id} has no folder path configured")]
    MissingFolderPath { id: DatasetId },

    /// Invalid input or configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Table name cannot be used by a storage backend
    #[error("Invalid table name '{name}': {reason}")]
    InvalidTableName { name: String, reason: String },

    /// Another dataset already writes to this table
    #[error("Table '{table}' is already used by dataset {id}")]
    TableInUse { table: String, id: DatasetId },

    /// Another dataset already tracks this folder
    #[error("Folder {folder} is already registered as dataset {id}")]
    FolderInUse { folder: String, id: DatasetId },

    /// Malformed dataset id
    #[error("Invalid dataset id: {0}")]
    InvalidId(String),

    /// A sync for this dataset is running in this process
    #[error("Dataset {id} is already syncing")]
    AlreadySyncing { id: DatasetId },

    /// History lookup failed while deciding whether to sync
    #[error("Failed to check for changes in {folder}: {source}")]
    ChangeCheck {
        folder: String,
        #[source]
        source: dsync_git::Error,
    },

    /// A sync attempt failed at `stage`
    #[error("Sync of dataset {id} failed at {stage}: {source}")]
    SyncFailed {
        id: DatasetId,
        stage: SyncStage,
        #[source]
        source: Box<Error>,
    },

    #[error("Dataset not found: {id}")]
    DatasetNotFound { id: DatasetId },

    #[error("Dataset already exists: {id}")]
    DuplicateDataset { id: DatasetId },

    /// Status change rejected by the record
    #[error("Invalid status transition for dataset {id}: {from} -> {to}")]
    InvalidTransition {
        id: DatasetId,
        from: SyncStatus,
        to: SyncStatus,
    },

    /// Dataset registry could not be read or written
    #[error("Dataset registry error at {path}: {message}")]
    Registry { path: PathBuf, message: String },

    /// Table storage write or read failure
    #[error("Storage error for table {table}: {message}")]
    Storage { table: String, message: String },

    #[error("Table not found: {table}")]
    TableNotFound { table: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from dsync-fs
    #[error(transparent)]
    Fs(#[from] dsync_fs::Error),

    /// History error from dsync-git
    #[error(transparent)]
    Git(#[from] dsync_git::Error),

    /// Ingestion error from dsync-ingest
    #[error(transparent)]
    Ingest(#[from] dsync_ingest::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failure classes a caller can act on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad or missing setup; retrying will not help
    Configuration,
    /// Another sync holds the dataset; back off and poll
    Concurrency,
    /// History lookup or commit failure
    ChangeDetection,
    /// Malformed source content
    Ingestion,
    /// Table storage failure; retry is safe
    Storage,
    /// Durable record failure
    Record,
    NotFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Concurrency => "concurrency",
            Self::ChangeDetection => "change-detection",
            Self::Ingestion => "ingestion",
            Self::Storage => "storage",
            Self::Record => "record",
            Self::NotFound => "not-found",
        }
    }

    /// Whether repeating the same call later can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Concurrency | Self::Storage)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFolderPath { .. }
            | Self::InvalidConfig { .. }
            | Self::InvalidTableName { .. }
            | Self::TableInUse { .. }
            | Self::FolderInUse { .. }
            | Self::InvalidId(_) => ErrorKind::Configuration,
            Self::AlreadySyncing { .. } => ErrorKind::Concurrency,
            Self::ChangeCheck { source: err, .. } | Self::Git(err) => match err {
                dsync_git::Error::FolderInaccessible { .. } => ErrorKind::Configuration,
                _ => ErrorKind::ChangeDetection,
            },
            Self::SyncFailed { source, .. } => source.kind(),
            Self::DatasetNotFound { .. } | Self::TableNotFound { .. } => ErrorKind::NotFound,
            Self::Ingest(err) => match err {
                dsync_ingest::Error::FolderNotFound { .. }
                | dsync_ingest::Error::NotADirectory { .. }
                | dsync_ingest::Error::NoTabularFiles { .. }
                | dsync_ingest::Error::UnsupportedExtension { .. } => ErrorKind::Configuration,
                _ => ErrorKind::Ingestion,
            },
            Self::Storage { .. } => ErrorKind::Storage,
            Self::DuplicateDataset { .. }
            | Self::InvalidTransition { .. }
            | Self::Registry { .. }
            | Self::Fs(_)
            | Self::Json(_) => ErrorKind::Record,
        }
    }

    /// Stage of a failed sync attempt, if this is one.
    pub fn sync_stage(&self) -> Option<SyncStage> {
        match self {
            Self::SyncFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
