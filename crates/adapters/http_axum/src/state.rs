//! Shared application state for axum handlers.

use std::sync::Arc;

use homeref_app::ports::{CacheStore, RegistrySource};
use homeref_app::services::registry_service::RegistryService;
use homeref_app::services::resolver_service::ResolverService;
use homeref_app::services::search_service::SearchService;
use homeref_app::snapshot_cell::SnapshotCell;

/// Application state shared across all axum handlers.
///
/// Generic over the registry source and cache store to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<R, S> {
    /// Registry loading and refresh.
    pub registry_service: Arc<RegistryService<R, S>>,
    /// Reference resolution against the current snapshot.
    pub resolver_service: Arc<ResolverService<SnapshotCell>>,
    /// Fuzzy search against the current snapshot.
    pub search_service: Arc<SearchService<SnapshotCell>>,
}

impl<R, S> Clone for AppState<R, S> {
    fn clone(&self) -> Self {
        Self {
            registry_service: Arc::clone(&self.registry_service),
            resolver_service: Arc::clone(&self.resolver_service),
            search_service: Arc::clone(&self.search_service),
        }
    }
}

impl<R, S> AppState<R, S>
where
    R: RegistrySource + 'static,
    S: CacheStore + 'static,
{
    /// Create a new application state from the registry service.
    pub fn new(registry_service: RegistryService<R, S>) -> Self {
        Self::from_arc(Arc::new(registry_service))
    }

    /// Create a new application state from a pre-wrapped registry service.
    ///
    /// Use this when the service is shared with background tasks before
    /// constructing the HTTP state.
    pub fn from_arc(registry_service: Arc<RegistryService<R, S>>) -> Self {
        let cell = registry_service.cell();
        Self {
            resolver_service: Arc::new(ResolverService::new(cell.clone())),
            search_service: Arc::new(SearchService::new(cell)),
            registry_service,
        }
    }
}
