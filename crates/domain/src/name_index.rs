//! Name index: exact and partial lookup from normalized names to entity ids.
//!
//! The index is built in one go from a slice of entities and never mutated
//! afterwards. A refresh builds a new index next to the old one and the
//! owning [`RegistrySnapshot`](crate::snapshot::RegistrySnapshot) is swapped
//! as a whole, so readers never see a half-filled index.

use std::collections::{BTreeSet, HashMap};

use crate::entity::Entity;
use crate::id::EntityId;
use crate::name::normalize;

/// Mapping from normalized name tokens to the entities they designate.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: HashMap<String, BTreeSet<EntityId>>,
}

impl NameIndex {
    /// Build a fresh index over `entities`.
    ///
    /// Every entity is indexed under its normalized display name and its
    /// normalized identifier (`light.office` → `light_office`). The bare
    /// slug is not a token of its own: a slug such as `office` would be
    /// contained in most queries mentioning the room.
    #[must_use]
    pub fn build<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        let mut index = Self::default();
        for entity in entities {
            index.insert(entity.display_name(), &entity.id);
            index.insert(entity.id.as_str(), &entity.id);
        }
        index
    }

    fn insert(&mut self, text: &str, id: &EntityId) {
        let token = normalize(text);
        if token.is_empty() {
            return;
        }
        self.entries.entry(token).or_default().insert(id.clone());
    }

    /// Exact lookup of an already-normalized token.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&BTreeSet<EntityId>> {
        self.entries.get(token)
    }

    /// Candidates whose token contains `token` or is contained in it.
    ///
    /// A cheap substring pre-filter used by the resolver; ranking is the
    /// fuzzy matcher's job. Returns an empty set for an empty token.
    #[must_use]
    pub fn partial_matches(&self, token: &str) -> BTreeSet<EntityId> {
        if token.is_empty() {
            return BTreeSet::new();
        }
        self.entries
            .iter()
            .filter(|(candidate, _)| {
                candidate.contains(token) || token.contains(candidate.as_str())
            })
            .flat_map(|(_, ids)| ids.iter().cloned())
            .collect()
    }

    /// All indexed tokens, in no particular order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no token at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
