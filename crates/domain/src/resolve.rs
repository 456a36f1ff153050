//! Resolution of a [`ResolutionQuery`] to exactly one entity id.
//!
//! The steps run in a fixed order:
//!
//! 1. an explicit id is returned as-is;
//! 2. the normalized name is looked up exactly, then partially;
//! 3. a single candidate wins immediately;
//! 4. domain, area and floor hints narrow the set in that order, each one
//!    skipped when it would leave nothing;
//! 5. the first remaining id (lexicographic order) wins.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::id::EntityId;
use crate::name::normalize;
use crate::query::ResolutionQuery;
use crate::snapshot::RegistrySnapshot;

/// Which step produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Explicit,
    Exact,
    Partial,
}

/// A successful resolution with enough context to log it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub entity_id: EntityId,
    pub kind: MatchKind,
    /// Candidates left once every hint was applied.
    pub remaining: usize,
}

impl Resolved {
    /// Whether several entities were still tied when the first was picked.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.remaining > 1
    }
}

fn narrow<F>(candidates: BTreeSet<EntityId>, keep: F) -> BTreeSet<EntityId>
where
    F: Fn(&EntityId) -> bool,
{
    let narrowed: BTreeSet<EntityId> = candidates.iter().filter(|id| keep(id)).cloned().collect();
    if narrowed.is_empty() {
        candidates
    } else {
        narrowed
    }
}

fn normalized_hint(value: Option<&str>) -> Option<String> {
    value.map(normalize).filter(|hint| !hint.is_empty())
}

impl RegistrySnapshot {
    /// Resolve `query` to a single entity id, or `None`.
    #[must_use]
    pub fn resolve(&self, query: &ResolutionQuery) -> Option<EntityId> {
        self.resolve_detailed(query).map(|resolved| resolved.entity_id)
    }

    /// Like [`resolve`](Self::resolve), also reporting how the id was found.
    #[must_use]
    pub fn resolve_detailed(&self, query: &ResolutionQuery) -> Option<Resolved> {
        if let Some(id) = &query.explicit_id {
            return Some(Resolved {
                entity_id: id.clone(),
                kind: MatchKind::Explicit,
                remaining: 1,
            });
        }

        let token = normalize(query.name.as_deref()?);
        if token.is_empty() {
            return None;
        }

        let (mut candidates, kind) = match self.name_index().lookup(&token) {
            Some(ids) if !ids.is_empty() => (ids.clone(), MatchKind::Exact),
            _ => (self.name_index().partial_matches(&token), MatchKind::Partial),
        };

        if candidates.len() > 1 {
            candidates = self.apply_hints(candidates, query);
        }

        let remaining = candidates.len();
        candidates.into_iter().next().map(|entity_id| Resolved {
            entity_id,
            kind,
            remaining,
        })
    }

    fn apply_hints(
        &self,
        mut candidates: BTreeSet<EntityId>,
        query: &ResolutionQuery,
    ) -> BTreeSet<EntityId> {
        if let Some(domain) = normalized_hint(query.domain_hint.as_deref()) {
            candidates = narrow(candidates, |id| normalize(id.domain()) == domain);
        }
        if let Some(area) = normalized_hint(query.area.as_deref()) {
            candidates = narrow(candidates, |id| {
                self.entity(id)
                    .is_some_and(|entity| self.in_area(entity, &area))
            });
        }
        if let Some(floor) = normalized_hint(query.floor.as_deref()) {
            candidates = narrow(candidates, |id| {
                self.entity(id)
                    .and_then(|entity| self.floor_of(entity))
                    .is_some_and(|value| normalize(value) == floor)
            });
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::snapshot;

    fn resolve(query: &ResolutionQuery) -> Option<String> {
        snapshot().resolve(query).map(|id| id.as_str().to_string())
    }

    #[test]
    fn should_return_explicit_id_without_lookup() {
        let resolved = snapshot()
            .resolve_detailed(&ResolutionQuery::by_id("switch.not_in_registry"))
            .unwrap();
        assert_eq!(resolved.entity_id.as_str(), "switch.not_in_registry");
        assert_eq!(resolved.kind, MatchKind::Explicit);
    }

    #[test]
    fn should_resolve_exact_name() {
        let resolved = snapshot()
            .resolve_detailed(&ResolutionQuery::by_name("Office Lights"))
            .unwrap();
        assert_eq!(resolved.entity_id.as_str(), "light.sam_office_tube");
        assert_eq!(resolved.kind, MatchKind::Exact);
        assert!(!resolved.is_ambiguous());
    }

    #[test]
    fn should_fall_back_to_partial_match() {
        let resolved = snapshot()
            .resolve_detailed(&ResolutionQuery::by_name("office light"))
            .unwrap();
        assert_eq!(resolved.entity_id.as_str(), "light.sam_office_tube");
        assert_eq!(resolved.kind, MatchKind::Partial);
        assert_eq!(resolved.remaining, 1);
    }

    #[test]
    fn should_resolve_by_identifier_text() {
        assert_eq!(
            resolve(&ResolutionQuery::by_name("light.kitchen_ceiling")).as_deref(),
            Some("light.kitchen_ceiling")
        );
    }

    #[test]
    fn should_narrow_shared_name_by_area() {
        assert_eq!(
            resolve(&ResolutionQuery::by_name("fan").in_area("office")).as_deref(),
            Some("fan.office_fan")
        );
        // Area reached through the owning device.
        assert_eq!(
            resolve(&ResolutionQuery::by_name("fan").in_area("Sleeping Room")).as_deref(),
            Some("fan.bedroom_fan")
        );
    }

    #[test]
    fn should_narrow_shared_name_by_floor() {
        assert_eq!(
            resolve(&ResolutionQuery::by_name("fan").on_floor("ground")).as_deref(),
            Some("fan.office_fan")
        );
    }

    #[test]
    fn should_pick_first_identifier_when_still_ambiguous() {
        let resolved = snapshot()
            .resolve_detailed(&ResolutionQuery::by_name("fan"))
            .unwrap();
        assert_eq!(resolved.entity_id.as_str(), "fan.bedroom_fan");
        assert!(resolved.is_ambiguous());
    }

    #[test]
    fn should_skip_hint_that_matches_nothing() {
        let resolved = snapshot()
            .resolve_detailed(&ResolutionQuery::by_name("fan").in_area("garage"))
            .unwrap();
        assert_eq!(resolved.entity_id.as_str(), "fan.bedroom_fan");
        assert_eq!(resolved.remaining, 2);
    }

    #[test]
    fn should_narrow_by_domain_hint() {
        // "kitchen" is contained in every kitchen entity token.
        assert_eq!(
            resolve(&ResolutionQuery::by_name("kitchen").in_domain("sensor")).as_deref(),
            Some("sensor.kitchen_temperature")
        );
    }

    #[test]
    fn should_not_resolve_unknown_or_blank_names() {
        assert_eq!(resolve(&ResolutionQuery::by_name("garage door")), None);
        assert_eq!(resolve(&ResolutionQuery::by_name("  ?! ")), None);
        assert_eq!(resolve(&ResolutionQuery::default()), None);
    }

    #[test]
    fn should_not_resolve_against_empty_snapshot() {
        let empty = RegistrySnapshot::empty();
        assert_eq!(empty.resolve(&ResolutionQuery::by_name("fan")), None);
    }
}
