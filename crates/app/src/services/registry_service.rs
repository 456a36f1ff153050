//! Registry service: loads, refreshes and publishes registry snapshots.

use std::sync::Arc;
use std::time::Duration;

use homeref_domain::error::HomeRefError;
use homeref_domain::snapshot::{RegistryData, RegistrySnapshot};

use crate::cache::{CacheLayer, RefreshHandle};
use crate::ports::{CacheStore, RegistrySource};
use crate::snapshot_cell::{SnapshotCell, SnapshotProvider};

/// Cache key the registry payload is stored under.
pub const REGISTRY_CACHE_KEY: &str = "registry";

/// Owns the current registry snapshot and keeps it up to date.
pub struct RegistryService<R, S> {
    source: Arc<R>,
    cache: CacheLayer<S>,
    cell: SnapshotCell,
}

impl<R, S> RegistryService<R, S>
where
    R: RegistrySource + 'static,
    S: CacheStore + 'static,
{
    /// Create a service with an empty snapshot; call [`load`](Self::load) next.
    pub fn new(source: R, cache: CacheLayer<S>) -> Self {
        Self {
            source: Arc::new(source),
            cache,
            cell: SnapshotCell::default(),
        }
    }

    /// The cache the registry is stored in.
    pub fn cache(&self) -> &CacheLayer<S> {
        &self.cache
    }

    /// A handle on the snapshot cell, for read-only services.
    pub fn cell(&self) -> SnapshotCell {
        self.cell.clone()
    }

    /// The current complete snapshot.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.cell.snapshot()
    }

    /// Load the registry through the cache and publish it.
    ///
    /// When the source fails and a stale registry is still known, that one
    /// is published instead.
    ///
    /// # Errors
    ///
    /// Returns the source error when no registry was ever cached.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Result<Arc<RegistrySnapshot>, HomeRefError> {
        let source = Arc::clone(&self.source);
        let fetched = self
            .cache
            .get_or_fetch(REGISTRY_CACHE_KEY, None, move || async move {
                source.fetch_registry().await
            })
            .await;
        let data = match fetched {
            Ok(data) => data,
            Err(err) => {
                let Some(stale) = self
                    .cache
                    .get_last_known::<RegistryData>(REGISTRY_CACHE_KEY)
                    .await
                else {
                    return Err(err);
                };
                tracing::warn!(error = %err, "registry fetch failed, serving last known registry");
                stale
            }
        };
        Ok(self.publish(data))
    }

    /// Fetch the registry from the source, store it and publish it.
    ///
    /// # Errors
    ///
    /// Returns the source error; the current snapshot stays in place.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Arc<RegistrySnapshot>, HomeRefError> {
        let data = self.source.fetch_registry().await?;
        self.cache.set(REGISTRY_CACHE_KEY, &data, None).await?;
        Ok(self.publish(data))
    }

    /// Build a snapshot from `data` and swap it in.
    pub fn publish(&self, data: RegistryData) -> Arc<RegistrySnapshot> {
        self.cell.publish(data)
    }

    /// Refresh the registry every `interval` in the background.
    pub fn start_auto_refresh(&self, interval: Duration) -> RefreshHandle {
        let source = Arc::clone(&self.source);
        let cell = self.cell.clone();
        tracing::info!(?interval, "registry auto-refresh started");
        self.cache
            .auto_refresh(REGISTRY_CACHE_KEY, interval, None, move || {
                let source = Arc::clone(&source);
                let cell = cell.clone();
                async move {
                    let data = source.fetch_registry().await?;
                    cell.publish(data.clone());
                    Ok(data)
                }
            })
    }
}

impl<R, S> SnapshotProvider for RegistryService<R, S>
where
    R: Send + Sync,
    S: Send + Sync,
{
    fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.cell.snapshot()
    }
}
