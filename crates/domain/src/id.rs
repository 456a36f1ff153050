//! Typed identifier newtypes backed by the registry's string identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a registry identifier as-is.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of an [`Entity`](crate::entity::Entity), e.g. `light.office_tube`.
    EntityId
);

define_id!(
    /// Identifier of a [`Device`](crate::device::Device).
    DeviceId
);

define_id!(
    /// Identifier of an [`Area`](crate::area::Area).
    AreaId
);

impl EntityId {
    /// Capability class prefix (`light` in `light.office_tube`).
    ///
    /// Returns an empty string when the identifier has no domain separator.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('.').map_or("", |(domain, _)| domain)
    }

    /// Slug after the domain separator (`office_tube` in `light.office_tube`).
    #[must_use]
    pub fn object_id(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(_, slug)| slug)
    }

    /// Check that the identifier has the `<domain>.<slug>` shape.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyEntityId`] for an empty identifier and
    /// [`ValidationError::MalformedEntityId`] when the domain or slug is missing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            return Err(ValidationError::EmptyEntityId);
        }
        match self.0.split_once('.') {
            Some((domain, slug)) if !domain.is_empty() && !slug.is_empty() => Ok(()),
            _ => Err(ValidationError::MalformedEntityId(self.0.clone())),
        }
    }
}

impl FromStr for EntityId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Self::new(s.trim());
        id.validate()?;
        Ok(id)
    }
}
