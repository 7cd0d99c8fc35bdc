//! Sync orchestration
//!
//! [`SyncService`] sequences one sync attempt: commit the folder, read it,
//! store the rows, and record the result on the dataset. It is the only
//! component that writes sync status.

mod guard;
mod orchestrator;

pub use guard::{InFlight, InFlightGuard};
pub use orchestrator::SyncService;

use serde::{Deserialize, Serialize};

/// Step of a sync attempt at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStage {
    MarkSyncing,
    Commit,
    Read,
    Store,
    Finalize,
}

impl SyncStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarkSyncing => "mark-syncing",
            Self::Commit => "commit",
            Self::Read => "read",
            Self::Store => "store",
            Self::Finalize => "finalize",
        }
    }

    /// Prefix of the message recorded on the dataset.
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            Self::MarkSyncing => "Failed to mark dataset as syncing",
            Self::Commit => "Git commit failed",
            Self::Read => "Failed to read folder",
            Self::Store => "Failed to store data",
            Self::Finalize => "Failed to record sync result",
        }
    }
}

impl std::fmt::Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a completed sync attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub commit_hash: String,
    pub row_count: u64,
}
