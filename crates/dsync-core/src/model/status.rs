//! Sync status and the updates that move it

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Durable sync state of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Registered, never synced
    Pending,
    Syncing,
    Ready,
    Error,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Syncing => "syncing",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }

    /// Whether the record may move from `self` to `next`.
    ///
    /// Any state may enter `syncing`, including `syncing` itself so a record
    /// left behind by a crashed process can be re-synced. Only `syncing`
    /// may leave for `ready` or `error`.
    pub fn can_transition_to(&self, next: SyncStatus) -> bool {
        match next {
            Self::Syncing => true,
            Self::Ready | Self::Error => *self == Self::Syncing,
            Self::Pending => false,
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "syncing" => Ok(Self::Syncing),
            "ready" => Ok(Self::Ready),
            "error" => Ok(Self::Error),
            other => Err(Error::InvalidConfig {
                message: format!("unknown sync status '{other}'"),
            }),
        }
    }
}

/// Single-record overwrite of the sync-relevant fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// A sync attempt started; clears any previous error.
    Syncing,
    /// The attempt failed. `commit_hash` is the commit the attempt made, if
    /// it got that far; the record's hash advances to it.
    Failed {
        message: String,
        commit_hash: Option<String>,
    },
    Ready {
        commit_hash: String,
        row_count: u64,
        synced_at: DateTime<Utc>,
    },
}

impl StatusUpdate {
    /// Status the record ends up in.
    pub fn target(&self) -> SyncStatus {
        match self {
            Self::Syncing => SyncStatus::Syncing,
            Self::Failed { .. } => SyncStatus::Error,
            Self::Ready { .. } => SyncStatus::Ready,
        }
    }
}
