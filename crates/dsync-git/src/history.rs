//! History backend trait for change detection

use crate::Result;
use dsync_fs::NormalizedPath;

/// Content-addressed history of a folder.
///
/// Implementations must be shareable across threads: the orchestrator calls
/// them from concurrent sync attempts on different datasets.
pub trait HistoryBackend: Send + Sync {
    /// Whether the folder's current content differs from the snapshot
    /// identified by `commit_hash`.
    ///
    /// Fails with [`Error::UnknownCommit`](crate::Error::UnknownCommit) if the
    /// hash is not part of the folder's history, or with an access error if
    /// the folder cannot be read.
    fn has_changes_since(&self, folder: &NormalizedPath, commit_hash: &str) -> Result<bool>;

    /// Capture the folder's full current content as a new commit.
    ///
    /// When nothing changed since the head commit, the head hash is returned
    /// and no commit is written. Callers must not assume a fresh hash.
    fn commit_all(&self, folder: &NormalizedPath, message: &str) -> Result<String>;

    /// Start tracking an untracked folder and write its first commit.
    ///
    /// Fails with [`Error::AlreadyTracked`](crate::Error::AlreadyTracked) if
    /// the folder already has history.
    fn init_repo(&self, folder: &NormalizedPath) -> Result<String>;
}
