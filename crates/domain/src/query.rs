//! Per-call query values for resolution and search.

use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// Result count used when the caller does not ask for a specific limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// A reference to a single entity: an explicit id, or a name plus hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionQuery {
    #[serde(default)]
    pub explicit_id: Option<EntityId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub domain_hint: Option<String>,
}

impl ResolutionQuery {
    /// Query that always resolves to `id`.
    #[must_use]
    pub fn by_id(id: impl Into<EntityId>) -> Self {
        Self {
            explicit_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Query by free-text name.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    #[must_use]
    pub fn on_floor(mut self, floor: impl Into<String>) -> Self {
        self.floor = Some(floor.into());
        self
    }

    #[must_use]
    pub fn in_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain_hint = Some(domain.into());
        self
    }

    /// Short label for logs and error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        if let Some(id) = &self.explicit_id {
            return id.to_string();
        }
        let mut label = self.name.clone().unwrap_or_default();
        if let Some(area) = &self.area {
            label.push_str(" in ");
            label.push_str(area);
        }
        if let Some(floor) = &self.floor {
            label.push_str(" on ");
            label.push_str(floor);
        }
        label
    }
}

/// A ranked search over the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub domain_hint: Option<String>,
    #[serde(default)]
    pub area_hint: Option<String>,
}

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl SearchQuery {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            domain_hint: None,
            area_hint: None,
        }
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain_hint = Some(domain.into());
        self
    }

    #[must_use]
    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area_hint = Some(area.into());
        self
    }
}
