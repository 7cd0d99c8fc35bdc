//! Git-backed change detection for dataset folders
//!
//! A tracked folder is a plain git repository whose work tree is the folder
//! itself. Every sync captures the folder's full content as a commit, and the
//! commit hash recorded on the dataset is how later calls ask "did anything
//! change since then".
//!
//! The orchestrator only sees the [`HistoryBackend`] trait; [`GitHistory`] is
//! the git2 implementation.

pub mod commits;
pub mod error;
pub mod history;
pub mod repository;

pub use commits::CommitInfo;
pub use error::{Error, Result};
pub use history::HistoryBackend;
pub use repository::GitHistory;
