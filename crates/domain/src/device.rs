//! Device: a physical unit that hosts one or more entities.

use serde::{Deserialize, Serialize};

use crate::error::{HomeRefError, ValidationError};
use crate::id::{AreaId, DeviceId, EntityId};

/// A physical or virtual device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// Manufacturer-assigned name.
    pub name: String,
    /// User override; wins over [`name`](Self::name) when present.
    #[serde(default)]
    pub name_by_user: Option<String>,
    #[serde(default)]
    pub area_id: Option<AreaId>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub entity_ids: Vec<EntityId>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomeRefError::Validation`] when the device has neither a
    /// name nor a user override.
    pub fn validate(&self) -> Result<(), HomeRefError> {
        if self.display_name().trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Name shown to users: the user override if set, else the manufacturer name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name_by_user
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    name_by_user: Option<String>,
    area_id: Option<AreaId>,
    manufacturer: Option<String>,
    model: Option<String>,
    entity_ids: Vec<EntityId>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn name_by_user(mut self, name: impl Into<String>) -> Self {
        self.name_by_user = Some(name.into());
        self
    }

    #[must_use]
    pub fn area_id(mut self, area_id: impl Into<AreaId>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    #[must_use]
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn entity(mut self, entity_id: impl Into<EntityId>) -> Self {
        self.entity_ids.push(entity_id.into());
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`HomeRefError::Validation`] if no usable name was given.
    pub fn build(self) -> Result<Device, HomeRefError> {
        let name = self.name.unwrap_or_default();
        let device = Device {
            id: self.id.unwrap_or_else(|| DeviceId::new(name.clone())),
            name,
            name_by_user: self.name_by_user,
            area_id: self.area_id,
            manufacturer: self.manufacturer,
            model: self.model,
            entity_ids: self.entity_ids,
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_prefer_user_name_over_manufacturer_name() {
        let device = Device::builder()
            .id("dev_1")
            .name("LYWSD03MMC")
            .name_by_user("Bedroom Thermometer")
            .build()
            .unwrap();
        assert_eq!(device.display_name(), "Bedroom Thermometer");
    }

    #[test]
    fn should_fall_back_to_manufacturer_name() {
        let device = Device::builder()
            .id("dev_1")
            .name("Hue Bridge")
            .build()
            .unwrap();
        assert_eq!(device.display_name(), "Hue Bridge");
    }

    #[test]
    fn should_reject_device_without_any_name() {
        let result = Device::builder().id("dev_1").build();
        assert!(matches!(
            result,
            Err(HomeRefError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_accept_user_name_alone() {
        let device = Device::builder()
            .id("dev_2")
            .name_by_user("Desk Fan")
            .entity("fan.desk")
            .build()
            .unwrap();
        assert_eq!(device.display_name(), "Desk Fan");
        assert_eq!(device.entity_ids, vec![EntityId::new("fan.desk")]);
    }
}
