//! Single-writer store for the equipment cache.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use gridstudy_core::config::equipment::EquipmentConfig;

use crate::cache::{EquipmentAction, EquipmentCache};

/// Holds the current equipment cache snapshot.
///
/// Every mutation goes through [`dispatch`](StudyStore::dispatch), which runs
/// the reducer to completion under the channel's write lock; concurrent
/// dispatches are serialized. Readers get immutable `Arc` snapshots and
/// subscribers are woken only when a dispatch changed something.
#[derive(Debug)]
pub struct StudyStore {
    tx: watch::Sender<Arc<EquipmentCache>>,
}

impl StudyStore {
    /// Creates a store holding an empty cache.
    pub fn new(config: &EquipmentConfig) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(EquipmentCache::new(config)));
        Self { tx }
    }

    /// Applies `action` and returns the resulting snapshot.
    pub fn dispatch(&self, action: EquipmentAction) -> Arc<EquipmentCache> {
        let name = action.name();
        let changed = self.tx.send_if_modified(|state| {
            let mut next = EquipmentCache::clone(state);
            let changed = next.reduce(action);
            if changed {
                *state = Arc::new(next);
            }
            changed
        });
        debug!(action = name, changed, "Equipment action dispatched");
        self.state()
    }

    /// Current snapshot.
    pub fn state(&self) -> Arc<EquipmentCache> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<Arc<EquipmentCache>> {
        self.tx.subscribe()
    }
}

impl Default for StudyStore {
    fn default() -> Self {
        Self::new(&EquipmentConfig::default())
    }
}
