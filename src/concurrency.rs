//! In-flight fetch tracking
//!
//! One marker per node id while a fetch for it is outstanding. A second caller
//! asking for the same id gets `None` instead of issuing a duplicate request.
//! The marker is released when the returned guard drops, so an error, an early
//! return, or a dropped future all clear it.

use crate::types::NodeId;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Per-node in-flight registry
#[derive(Debug, Clone, Default)]
pub struct FetchTracker {
    in_flight: Arc<Mutex<HashSet<NodeId>>>,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for fetching. `None` means a fetch is already running.
    pub fn begin(&self, id: &NodeId) -> Option<FetchGuard> {
        let mut set = self.in_flight.lock();
        if !set.insert(id.clone()) {
            return None;
        }
        Some(FetchGuard {
            id: id.clone(),
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_in_flight(&self, id: &NodeId) -> bool {
        self.in_flight.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.in_flight.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.lock().is_empty()
    }
}

/// Held for the duration of one fetch.
#[derive(Debug)]
pub struct FetchGuard {
    id: NodeId,
    in_flight: Arc<Mutex<HashSet<NodeId>>>,
}

impl FetchGuard {
    pub fn id(&self) -> &NodeId {
        &self.id
    }
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.id);
    }
}
