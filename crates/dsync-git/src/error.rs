//! Error types for dsync-git

use std::path::PathBuf;

/// Result type for dsync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dsync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] dsync_fs::Error),

    #[error("Folder is not accessible: {path}")]
    FolderInaccessible { path: PathBuf },

    #[error("Folder {path} is already tracked")]
    AlreadyTracked { path: PathBuf },

    #[error("Folder {path} is not tracked; initialize it first")]
    NotTracked { path: PathBuf },

    #[error("Commit '{hash}' not found in history of {path}")]
    UnknownCommit { hash: String, path: PathBuf },
}
