//! Shared holder of the current registry snapshot.
//!
//! Readers clone the inner `Arc` and work on that snapshot for as long as
//! they like. Publishing builds the next snapshot outside the lock and then
//! replaces the `Arc` in one store, so a reader sees either the old or the
//! new snapshot, never a mix.

use std::sync::Arc;

use parking_lot::RwLock;

use homeref_domain::snapshot::{RegistryData, RegistrySnapshot};

/// Anything that can hand out the current snapshot.
pub trait SnapshotProvider: Send + Sync {
    fn snapshot(&self) -> Arc<RegistrySnapshot>;
}

impl<T: SnapshotProvider> SnapshotProvider for Arc<T> {
    fn snapshot(&self) -> Arc<RegistrySnapshot> {
        (**self).snapshot()
    }
}

/// Cheaply cloneable cell holding the current [`RegistrySnapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotCell {
    current: Arc<RwLock<Arc<RegistrySnapshot>>>,
}

impl SnapshotCell {
    #[must_use]
    pub fn new(snapshot: RegistrySnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// Build a snapshot from `data` and make it current.
    pub fn publish(&self, data: RegistryData) -> Arc<RegistrySnapshot> {
        let next = Arc::new(RegistrySnapshot::build(data));
        *self.current.write() = Arc::clone(&next);
        tracing::info!(
            entities = next.len(),
            areas = next.areas().len(),
            tokens = next.name_index().len(),
            "registry snapshot published"
        );
        next
    }
}

impl SnapshotProvider for SnapshotCell {
    fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.current.read())
    }
}
