//! Entity: the central state-holding concept in homeref.
//!
//! An entity represents a single observable/controllable aspect of a device
//! (e.g., a light's on/off state, a temperature sensor's reading). Inside a
//! [`RegistrySnapshot`](crate::snapshot::RegistrySnapshot) entities are never
//! mutated; each refresh produces new values.

mod attribute_value;
mod state;

pub use attribute_value::AttributeValue;
pub use state::EntityState;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::HomeRefError;
use crate::id::{AreaId, DeviceId, EntityId};
use crate::time::{Timestamp, now};

/// A single entity as reported by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub state: EntityState,
    #[serde(default)]
    pub attributes: HashMap<String, AttributeValue>,
    #[serde(default)]
    pub device_id: Option<DeviceId>,
    #[serde(default)]
    pub area_id: Option<AreaId>,
    #[serde(default = "now")]
    pub last_changed: Timestamp,
    #[serde(default = "now")]
    pub last_updated: Timestamp,
}

impl Entity {
    /// Create a builder for constructing an [`Entity`].
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomeRefError::Validation`] when the identifier is empty or
    /// lacks the `<domain>.<slug>` shape.
    pub fn validate(&self) -> Result<(), HomeRefError> {
        self.id.validate()?;
        Ok(())
    }

    /// Display name, falling back to the identifier.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.friendly_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.id.as_str())
    }

    /// Capability class of this entity (`light`, `fan`, …).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.id.domain()
    }

    /// Whether the entity is reachable.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state.is_available()
    }

    /// Look up a single attribute.
    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Battery percentage, if the entity reports one.
    #[must_use]
    pub fn battery_level(&self) -> Option<f64> {
        self.get_attribute("battery_level")
            .or_else(|| self.get_attribute("battery"))
            .and_then(AttributeValue::as_f64)
    }

    /// Device class (`motion`, `temperature`, `door`, …).
    #[must_use]
    pub fn device_class(&self) -> Option<&str> {
        self.get_attribute("device_class")
            .and_then(AttributeValue::as_str)
    }

    /// Unit of the state value (`°C`, `%`, …).
    #[must_use]
    pub fn unit_of_measurement(&self) -> Option<&str> {
        self.get_attribute("unit_of_measurement")
            .and_then(AttributeValue::as_str)
    }

    /// Floor attribute, when set directly on the entity.
    #[must_use]
    pub fn floor(&self) -> Option<&str> {
        self.get_attribute("floor").and_then(AttributeValue::as_str)
    }

    /// Brightness (0–255) for dimmable lights.
    #[must_use]
    pub fn brightness(&self) -> Option<i64> {
        self.get_attribute("brightness")
            .and_then(AttributeValue::as_i64)
    }
}

/// Step-by-step builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    id: Option<EntityId>,
    friendly_name: Option<String>,
    state: EntityState,
    attributes: HashMap<String, AttributeValue>,
    device_id: Option<DeviceId>,
    area_id: Option<AreaId>,
    last_changed: Option<Timestamp>,
}

impl EntityBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: impl Into<EntityState>) -> Self {
        self.state = state.into();
        self
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: impl Into<DeviceId>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    #[must_use]
    pub fn area_id(mut self, area_id: impl Into<AreaId>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    #[must_use]
    pub fn last_changed(mut self, ts: Timestamp) -> Self {
        self.last_changed = Some(ts);
        self
    }

    /// Consume the builder, validate, and return an [`Entity`].
    ///
    /// Missing timestamps default to the current time.
    ///
    /// # Errors
    ///
    /// Returns [`HomeRefError::Validation`] if the identifier is missing or malformed.
    pub fn build(self) -> Result<Entity, HomeRefError> {
        let ts = now();
        let last_changed = self.last_changed.unwrap_or(ts);
        let entity = Entity {
            id: self.id.unwrap_or_else(|| EntityId::new("")),
            friendly_name: self.friendly_name,
            state: self.state,
            attributes: self.attributes,
            device_id: self.device_id,
            area_id: self.area_id,
            last_changed,
            last_updated: last_changed.max(ts),
        };
        entity.validate()?;
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn should_build_valid_entity_when_id_provided() {
        let entity = Entity::builder()
            .id("light.kitchen")
            .friendly_name("Kitchen Light")
            .state(EntityState::On)
            .build()
            .unwrap();
        assert_eq!(entity.id.as_str(), "light.kitchen");
        assert_eq!(entity.domain(), "light");
        assert_eq!(entity.display_name(), "Kitchen Light");
    }

    #[test]
    fn should_reject_missing_id() {
        let result = Entity::builder().friendly_name("Orphan").build();
        assert!(matches!(
            result,
            Err(HomeRefError::Validation(ValidationError::EmptyEntityId))
        ));
    }

    #[test]
    fn should_reject_id_without_domain() {
        let result = Entity::builder().id("kitchen").build();
        assert!(matches!(
            result,
            Err(HomeRefError::Validation(ValidationError::MalformedEntityId(_)))
        ));
    }

    #[test]
    fn should_fall_back_to_id_when_name_missing_or_blank() {
        let entity = Entity::builder().id("fan.attic").build().unwrap();
        assert_eq!(entity.display_name(), "fan.attic");

        let blank = Entity::builder()
            .id("fan.attic")
            .friendly_name("  ")
            .build()
            .unwrap();
        assert_eq!(blank.display_name(), "fan.attic");
    }

    #[test]
    fn should_expose_capability_accessors() {
        let entity = Entity::builder()
            .id("sensor.hall_motion")
            .attribute("battery", AttributeValue::Int(87))
            .attribute(
                "device_class",
                AttributeValue::String("motion".to_string()),
            )
            .attribute("floor", AttributeValue::String("ground".to_string()))
            .build()
            .unwrap();

        assert_eq!(entity.battery_level(), Some(87.0));
        assert_eq!(entity.device_class(), Some("motion"));
        assert_eq!(entity.floor(), Some("ground"));
        assert_eq!(entity.unit_of_measurement(), None);
        assert_eq!(entity.brightness(), None);
    }

    #[test]
    fn should_prefer_battery_level_over_battery() {
        let entity = Entity::builder()
            .id("sensor.door")
            .attribute("battery_level", AttributeValue::Float(55.5))
            .attribute("battery", AttributeValue::Int(10))
            .build()
            .unwrap();
        assert_eq!(entity.battery_level(), Some(55.5));
    }

    #[test]
    fn should_deserialize_with_defaults_for_optional_fields() {
        let json = r#"{
            "id": "switch.porch",
            "state": "off",
            "last_changed": "2024-01-01T00:00:00Z",
            "last_updated": "2024-01-01T00:00:00Z"
        }"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.state, EntityState::Off);
        assert!(entity.attributes.is_empty());
        assert!(entity.area_id.is_none());
    }
}
