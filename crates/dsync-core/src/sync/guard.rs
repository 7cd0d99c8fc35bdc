//! Per-dataset in-flight markers

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::model::DatasetId;

/// Set of dataset ids with a sync attempt running in this process.
///
/// The lock is held only to check-and-insert or remove an id, never while
/// the attempt does I/O.
#[derive(Debug, Default)]
pub struct InFlight {
    ids: Mutex<HashSet<DatasetId>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id`, or `None` if it is already claimed.
    ///
    /// The claim is released when the returned guard drops, whichever way
    /// the attempt ends.
    pub fn try_acquire(&self, id: DatasetId) -> Option<InFlightGuard<'_>> {
        if self.ids().insert(id) {
            Some(InFlightGuard { owner: self, id })
        } else {
            None
        }
    }

    pub fn contains(&self, id: &DatasetId) -> bool {
        self.ids().contains(id)
    }

    /// Ids claimed at the moment of the call.
    pub fn snapshot(&self) -> HashSet<DatasetId> {
        self.ids().clone()
    }

    fn ids(&self) -> MutexGuard<'_, HashSet<DatasetId>> {
        // A panic while holding the lock cannot leave the set half-updated
        self.ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases a dataset's in-flight claim on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    id: DatasetId,
}

impl InFlightGuard<'_> {
    pub fn id(&self) -> DatasetId {
        self.id
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.ids().remove(&self.id);
        tracing::trace!(dataset = %self.id, "Released in-flight marker");
    }
}
