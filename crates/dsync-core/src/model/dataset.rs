//! Dataset record

use std::str::FromStr;

use chrono::{DateTime, Utc};
use dsync_fs::NormalizedPath;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{StatusUpdate, SyncStatus};
use crate::{Error, Result};

/// Fallback error text; an `error` record never carries an empty message.
const UNSPECIFIED_FAILURE: &str = "Sync failed";

/// Opaque dataset identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(Uuid);

impl DatasetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatasetId {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::InvalidId(s.to_string()))
    }
}

impl From<Uuid> for DatasetId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Fields supplied when a dataset is first recorded.
#[derive(Debug, Clone, Default)]
pub struct NewDataset {
    pub name: String,
    pub description: Option<String>,
    pub table_name: String,
    pub folder_path: String,
}

/// Durable record of one logical dataset.
///
/// Only the sync orchestrator changes the sync-state fields, and only
/// through [`Dataset::apply`], which enforces the status transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub table_name: String,
    pub folder_path: String,
    pub status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit_hash: Option<String>,
    #[serde(default)]
    pub row_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dataset {
    /// A freshly registered dataset in `pending` state.
    pub fn new(new: NewDataset, now: DateTime<Utc>) -> Self {
        Self {
            id: DatasetId::new(),
            name: new.name,
            description: new.description.filter(|d| !d.trim().is_empty()),
            table_name: new.table_name,
            folder_path: new.folder_path,
            status: SyncStatus::Pending,
            error_message: None,
            last_commit_hash: None,
            row_count: 0,
            last_synced_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Source folder, or `None` when the path is blank.
    pub fn folder(&self) -> Option<NormalizedPath> {
        let path = NormalizedPath::new(&self.folder_path);
        (!path.is_empty()).then_some(path)
    }

    /// Last synced commit; an empty stored hash counts as never synced.
    pub fn last_commit(&self) -> Option<&str> {
        self.last_commit_hash
            .as_deref()
            .filter(|hash| !hash.trim().is_empty())
    }

    /// Apply a status update, rejecting transitions the lifecycle forbids.
    pub fn apply(&mut self, update: StatusUpdate, now: DateTime<Utc>) -> Result<()> {
        let target = update.target();
        if !self.status.can_transition_to(target) {
            return Err(Error::InvalidTransition {
                id: self.id,
                from: self.status,
                to: target,
            });
        }

        match update {
            StatusUpdate::Syncing => {
                self.error_message = None;
            }
            StatusUpdate::Failed {
                message,
                commit_hash,
            } => {
                let message = message.trim();
                self.error_message = Some(if message.is_empty() {
                    UNSPECIFIED_FAILURE.to_string()
                } else {
                    message.to_string()
                });
                if let Some(hash) = commit_hash {
                    self.last_commit_hash = Some(hash);
                }
            }
            StatusUpdate::Ready {
                commit_hash,
                row_count,
                synced_at,
            } => {
                self.error_message = None;
                self.last_commit_hash = Some(commit_hash);
                self.row_count = row_count;
                self.last_synced_at = Some(synced_at);
            }
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }
}
