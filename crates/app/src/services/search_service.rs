//! Search service: ranked fuzzy search over the current snapshot.

use std::collections::BTreeSet;

use serde::Serialize;

use homeref_domain::entity::{Entity, EntityState};
use homeref_domain::fuzzy::{FuzzyMatcher, Relevance, ScoredEntity, is_near_match};
use homeref_domain::id::EntityId;
use homeref_domain::name::{normalize, words};
use homeref_domain::query::SearchQuery;
use homeref_domain::snapshot::RegistrySnapshot;

use crate::snapshot_cell::SnapshotProvider;

/// Below this many hits, suggestions are computed.
pub const SUGGESTION_THRESHOLD: usize = 3;

/// One search result, flattened for callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub entity_id: EntityId,
    pub name: String,
    pub domain: String,
    pub state: EntityState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub score: i32,
    pub relevance: Relevance,
}

impl SearchHit {
    #[must_use]
    pub fn new(snapshot: &RegistrySnapshot, scored: &ScoredEntity<'_>) -> Self {
        let entity = scored.entity;
        Self {
            entity_id: entity.id.clone(),
            name: entity.display_name().to_string(),
            domain: entity.domain().to_string(),
            state: entity.state.clone(),
            area: snapshot.area_of(entity).map(|area| area.name.clone()),
            score: scored.score,
            relevance: scored.relevance,
        }
    }
}

/// Hits plus hints for narrowing a query that found little.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub suggestions: Vec<String>,
}

/// Rank `snapshot` against `query` and flatten the results.
pub(crate) fn ranked_hits(snapshot: &RegistrySnapshot, query: &SearchQuery) -> Vec<SearchHit> {
    snapshot
        .search(query)
        .iter()
        .map(|scored| SearchHit::new(snapshot, scored))
        .collect()
}

fn relates_to(candidate: &str, query_words: &[String]) -> bool {
    let candidate = normalize(candidate);
    words(&candidate).any(|word| {
        query_words
            .iter()
            .any(|q| word.contains(q.as_str()) || is_near_match(word, q))
    })
}

/// Area names, then domains, related to a query word.
fn suggestions(snapshot: &RegistrySnapshot, query_words: &[String]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for area in snapshot.areas() {
        if relates_to(&area.name, query_words) && !found.contains(&area.name) {
            found.push(area.name.clone());
        }
    }
    let domains: BTreeSet<&str> = snapshot.entities().iter().map(Entity::domain).collect();
    for domain in domains {
        if relates_to(domain, query_words) && !found.iter().any(|s| s == domain) {
            found.push(domain.to_string());
        }
    }
    found
}

/// Application service for free-text entity search.
pub struct SearchService<P> {
    snapshots: P,
}

impl<P: SnapshotProvider> SearchService<P> {
    /// Create a new service reading from the given snapshot provider.
    pub fn new(snapshots: P) -> Self {
        Self { snapshots }
    }

    /// Search the current snapshot.
    ///
    /// A query that is empty after normalization yields an empty outcome.
    #[tracing::instrument(skip(self))]
    pub fn search(&self, query: &SearchQuery) -> SearchOutcome {
        let matcher = FuzzyMatcher::new(query);
        if matcher.is_empty() {
            tracing::debug!("empty search query");
            return SearchOutcome::default();
        }
        let snapshot = self.snapshots.snapshot();
        let hits: Vec<SearchHit> = matcher
            .rank(&snapshot, query.limit)
            .iter()
            .map(|scored| SearchHit::new(&snapshot, scored))
            .collect();
        let suggestions = if hits.len() < SUGGESTION_THRESHOLD {
            suggestions(&snapshot, matcher.words())
        } else {
            Vec::new()
        };
        tracing::debug!(
            hits = hits.len(),
            suggestions = suggestions.len(),
            "search finished"
        );
        SearchOutcome { hits, suggestions }
    }
}
