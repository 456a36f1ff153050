//! Fuzzy matcher: additive scoring of entities against noisy text.
//!
//! Whole-string signals (exact, prefix, substring) are compared on the
//! normalized display name and identifier. Each query word then adds its
//! best per-token signal on the name and, separately, on the identifier.
//! Domain and area hints add a flat bonus; degraded entities lose a little.
//!
//! ```
//! use homeref_domain::fuzzy::is_near_match;
//!
//! assert!(is_near_match("ligt", "light"));
//! assert!(!is_near_match("light", "television"));
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::name::{normalize, words};
use crate::query::SearchQuery;
use crate::snapshot::{RegistrySnapshot, SearchEntry};

pub const EXACT_MATCH: i32 = 1000;
pub const PREFIX_MATCH: i32 = 500;
pub const NAME_SUBSTRING: i32 = 250;
pub const ID_SUBSTRING: i32 = 200;
pub const DOMAIN_HINT_BONUS: i32 = 150;
pub const AREA_HINT_BONUS: i32 = 150;
pub const DEGRADED_PENALTY: i32 = 50;

/// Score at or above which a match is [`Relevance::High`].
pub const HIGH_RELEVANCE: i32 = 500;
/// Score at or above which a match is at least [`Relevance::Medium`].
pub const MEDIUM_RELEVANCE: i32 = 100;

const MAX_LENGTH_DELTA: usize = 2;
const MAX_MISMATCHES: usize = 2;

#[derive(Debug, Clone, Copy)]
struct TokenWeights {
    exact: i32,
    prefix: i32,
    contains: i32,
    near: i32,
}

const NAME_TOKEN: TokenWeights = TokenWeights {
    exact: 100,
    prefix: 50,
    contains: 25,
    near: 15,
};

const ID_TOKEN: TokenWeights = TokenWeights {
    exact: 80,
    prefix: 40,
    contains: 20,
    near: 10,
};

/// Coarse bucket of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    Low,
    Medium,
    High,
}

impl Relevance {
    #[must_use]
    pub fn from_score(score: i32) -> Self {
        if score >= HIGH_RELEVANCE {
            Self::High
        } else if score >= MEDIUM_RELEVANCE {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One ranked search result.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredEntity<'a> {
    pub entity: &'a Entity,
    pub score: i32,
    pub relevance: Relevance,
}

/// Whether two tokens differ by at most a couple of characters.
///
/// Compares characters position by position over the longer token. Pairs
/// whose lengths differ by more than two are rejected outright.
#[must_use]
pub fn is_near_match(a: &str, b: &str) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > MAX_LENGTH_DELTA {
        return false;
    }
    let longest = a.len().max(b.len());
    let mismatches = (0..longest).filter(|&i| a.get(i) != b.get(i)).count();
    mismatches <= MAX_MISMATCHES
}

fn token_signal(word: &str, tokens: &[String], weights: TokenWeights) -> i32 {
    tokens
        .iter()
        .map(|token| {
            if token == word {
                weights.exact
            } else if token.starts_with(word) {
                weights.prefix
            } else if token.contains(word) {
                weights.contains
            } else if is_near_match(token, word) {
                weights.near
            } else {
                0
            }
        })
        .max()
        .unwrap_or(0)
}

/// A search query prepared for scoring: normalized once, applied to many
/// entities.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    text: String,
    words: Vec<String>,
    domain: Option<String>,
    area: Option<String>,
}

impl FuzzyMatcher {
    #[must_use]
    pub fn new(query: &SearchQuery) -> Self {
        let text = normalize(&query.text);
        let words = words(&text).map(str::to_string).collect();
        let hint = |value: Option<&str>| value.map(normalize).filter(|hint| !hint.is_empty());
        Self {
            text,
            words,
            domain: hint(query.domain_hint.as_deref()),
            area: hint(query.area_hint.as_deref()),
        }
    }

    /// Whether the query text normalizes to nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Normalized query words.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    fn text_score(&self, entry: &SearchEntry) -> i32 {
        let q = self.text.as_str();
        let mut score = 0;
        if entry.name == q || entry.id == q {
            score += EXACT_MATCH;
        }
        if entry.name.starts_with(q) || entry.id.starts_with(q) {
            score += PREFIX_MATCH;
        }
        if entry.name.contains(q) {
            score += NAME_SUBSTRING;
        }
        if entry.id.contains(q) {
            score += ID_SUBSTRING;
        }
        for word in &self.words {
            score += token_signal(word, &entry.name_words, NAME_TOKEN);
            score += token_signal(word, &entry.id_words, ID_TOKEN);
        }
        score
    }

    /// Total score of one entity of `snapshot`.
    #[must_use]
    pub fn score(&self, snapshot: &RegistrySnapshot, entity: &Entity, entry: &SearchEntry) -> i32 {
        if self.is_empty() {
            return 0;
        }
        let mut score = self.text_score(entry);
        if self.domain.as_ref().is_some_and(|d| &entry.domain == d) {
            score += DOMAIN_HINT_BONUS;
        }
        if self
            .area
            .as_ref()
            .is_some_and(|a| snapshot.in_area(entity, a))
        {
            score += AREA_HINT_BONUS;
        }
        if entity.state.is_degraded() {
            score -= DEGRADED_PENALTY;
        }
        score
    }

    /// Positive-scoring entities, best first, at most `limit` of them.
    ///
    /// Equal scores keep registry order.
    #[must_use]
    pub fn rank<'a>(&self, snapshot: &'a RegistrySnapshot, limit: usize) -> Vec<ScoredEntity<'a>> {
        if self.is_empty() || limit == 0 {
            return Vec::new();
        }
        let mut scored: Vec<ScoredEntity<'a>> = snapshot
            .entities()
            .iter()
            .zip(snapshot.search_entries())
            .filter_map(|(entity, entry)| {
                let score = self.score(snapshot, entity, entry);
                (score > 0).then(|| ScoredEntity {
                    entity,
                    score,
                    relevance: Relevance::from_score(score),
                })
            })
            .collect();
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(limit);
        scored
    }
}

impl RegistrySnapshot {
    /// Rank the snapshot's entities against `query`.
    #[must_use]
    pub fn search(&self, query: &SearchQuery) -> Vec<ScoredEntity<'_>> {
        FuzzyMatcher::new(query).rank(self, query.limit)
    }
}
