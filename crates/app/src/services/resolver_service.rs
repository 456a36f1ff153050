//! Resolver service: turns a reference into exactly one entity.

use serde::Serialize;

use homeref_domain::entity::Entity;
use homeref_domain::error::{HomeRefError, NotFoundError};
use homeref_domain::id::EntityId;
use homeref_domain::query::{ResolutionQuery, SearchQuery};
use homeref_domain::snapshot::RegistrySnapshot;

use crate::services::search_service::{SearchHit, ranked_hits};
use crate::snapshot_cell::SnapshotProvider;

/// Outcome of [`ResolverService::resolve_or_suggest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved { entity_id: EntityId },
    NotFound { suggestions: Vec<SearchHit> },
}

fn not_found(query: &ResolutionQuery) -> HomeRefError {
    NotFoundError {
        entity: "Entity",
        id: query.describe(),
    }
    .into()
}

fn resolve_in(snapshot: &RegistrySnapshot, query: &ResolutionQuery) -> Result<EntityId, HomeRefError> {
    let resolved = snapshot
        .resolve_detailed(query)
        .ok_or_else(|| not_found(query))?;
    if resolved.is_ambiguous() {
        tracing::info!(
            entity_id = %resolved.entity_id,
            candidates = resolved.remaining,
            "ambiguous reference, picked first candidate"
        );
    } else {
        tracing::debug!(entity_id = %resolved.entity_id, kind = ?resolved.kind, "reference resolved");
    }
    Ok(resolved.entity_id)
}

/// Application service resolving references against the current snapshot.
pub struct ResolverService<P> {
    snapshots: P,
}

impl<P: SnapshotProvider> ResolverService<P> {
    /// Create a new service reading from the given snapshot provider.
    pub fn new(snapshots: P) -> Self {
        Self { snapshots }
    }

    /// Resolve `query` to one entity id.
    ///
    /// An explicit id is returned as-is, even when the registry does not
    /// know it.
    ///
    /// # Errors
    ///
    /// Returns [`HomeRefError::NotFound`] when nothing matches.
    #[tracing::instrument(skip(self))]
    pub fn resolve(&self, query: &ResolutionQuery) -> Result<EntityId, HomeRefError> {
        resolve_in(&self.snapshots.snapshot(), query)
    }

    /// Resolve `query` and return the entity itself.
    ///
    /// # Errors
    ///
    /// Returns [`HomeRefError::NotFound`] when nothing matches or when an
    /// explicit id is not part of the registry.
    #[tracing::instrument(skip(self))]
    pub fn resolve_entity(&self, query: &ResolutionQuery) -> Result<Entity, HomeRefError> {
        let snapshot = self.snapshots.snapshot();
        let id = resolve_in(&snapshot, query)?;
        snapshot.entity(&id).cloned().ok_or_else(|| {
            NotFoundError {
                entity: "Entity",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Resolve `query`, or rank up to `limit` near misses for the caller.
    #[tracing::instrument(skip(self))]
    pub fn resolve_or_suggest(&self, query: &ResolutionQuery, limit: usize) -> Resolution {
        let snapshot = self.snapshots.snapshot();
        if let Ok(entity_id) = resolve_in(&snapshot, query) {
            return Resolution::Resolved { entity_id };
        }
        let search = SearchQuery {
            text: query.name.clone().unwrap_or_default(),
            limit,
            domain_hint: query.domain_hint.clone(),
            area_hint: query.area.clone(),
        };
        let suggestions = ranked_hits(&snapshot, &search);
        tracing::debug!(suggestions = suggestions.len(), "reference not found");
        Resolution::NotFound { suggestions }
    }
}
