//! Area: a logical grouping (room, zone) for devices and entities.

use serde::{Deserialize, Serialize};

use crate::error::{HomeRefError, ValidationError};
use crate::id::AreaId;
use crate::name::normalize;

/// A logical grouping such as a room or zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub floor_id: Option<String>,
}

impl Area {
    /// Create a builder for constructing an [`Area`].
    #[must_use]
    pub fn builder() -> AreaBuilder {
        AreaBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomeRefError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), HomeRefError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Whether a normalized hint designates this area, by name, id or alias.
    #[must_use]
    pub fn matches(&self, hint: &str) -> bool {
        if hint.is_empty() {
            return false;
        }
        normalize(&self.name) == hint
            || normalize(self.id.as_str()) == hint
            || self.aliases.iter().any(|alias| normalize(alias) == hint)
    }
}

/// Step-by-step builder for [`Area`].
#[derive(Debug, Default)]
pub struct AreaBuilder {
    id: Option<AreaId>,
    name: Option<String>,
    aliases: Vec<String>,
    floor_id: Option<String>,
}

impl AreaBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<AreaId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    #[must_use]
    pub fn floor_id(mut self, floor_id: impl Into<String>) -> Self {
        self.floor_id = Some(floor_id.into());
        self
    }

    /// Consume the builder, validate, and return an [`Area`].
    ///
    /// When no id is given, the normalized name is used.
    ///
    /// # Errors
    ///
    /// Returns [`HomeRefError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Area, HomeRefError> {
        let name = self.name.unwrap_or_default();
        let area = Area {
            id: self.id.unwrap_or_else(|| AreaId::new(normalize(&name))),
            name,
            aliases: self.aliases,
            floor_id: self.floor_id,
        };
        area.validate()?;
        Ok(area)
    }
}
