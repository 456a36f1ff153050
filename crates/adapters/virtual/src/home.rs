//! Built-in demo home.
//!
//! | Area | Entities |
//! |------|----------|
//! | Office (ground) | `light.sam_office_tube` "office lights", `fan.office` "Fan" |
//! | Bedroom (upstairs) | `fan.bedroom` "Fan" through a ceiling fan device, `light.bedside` |
//! | Kitchen (ground) | `light.kitchen_ceiling`, `sensor.kitchen_temperature` |
//! | Living Room (ground) | `climate.living_room`, `media_player.living_room_tv`, `sensor.living_room_humidity` |
//!
//! `light.porch` has no area and is `unavailable`.

use homeref_domain::area::Area;
use homeref_domain::device::Device;
use homeref_domain::entity::{AttributeValue, Entity, EntityBuilder, EntityState};
use homeref_domain::error::HomeRefError;
use homeref_domain::snapshot::RegistryData;

fn entity(id: &str, name: &str, state: &str) -> EntityBuilder {
    Entity::builder().id(id).friendly_name(name).state(state)
}

fn text(value: &str) -> AttributeValue {
    AttributeValue::String(value.to_string())
}

fn areas() -> Result<Vec<Area>, HomeRefError> {
    Ok(vec![
        Area::builder()
            .id("office")
            .name("Office")
            .alias("Study")
            .floor_id("ground")
            .build()?,
        Area::builder()
            .id("bedroom")
            .name("Bedroom")
            .alias("Sleeping Room")
            .floor_id("upstairs")
            .build()?,
        Area::builder()
            .id("kitchen")
            .name("Kitchen")
            .floor_id("ground")
            .build()?,
        Area::builder()
            .id("living_room")
            .name("Living Room")
            .alias("Lounge")
            .floor_id("ground")
            .build()?,
    ])
}

fn devices() -> Result<Vec<Device>, HomeRefError> {
    Ok(vec![
        Device::builder()
            .id("dev_bedroom_fan")
            .name("Ceiling Fan")
            .manufacturer("homeref")
            .model("VFan-1")
            .area_id("bedroom")
            .entity("fan.bedroom")
            .build()?,
        Device::builder()
            .id("dev_living_room_thermostat")
            .name("Thermostat")
            .name_by_user("Living Room Thermostat")
            .manufacturer("homeref")
            .model("VTherm-2")
            .area_id("living_room")
            .entity("climate.living_room")
            .entity("sensor.living_room_humidity")
            .build()?,
    ])
}

fn entities() -> Result<Vec<Entity>, HomeRefError> {
    Ok(vec![
        entity("light.sam_office_tube", "office lights", "on")
            .area_id("office")
            .attribute("brightness", AttributeValue::Int(180))
            .build()?,
        entity("fan.office", "Fan", "off").area_id("office").build()?,
        entity("fan.bedroom", "Fan", "on")
            .device_id("dev_bedroom_fan")
            .build()?,
        entity("light.bedside", "Bedside Lamp", "off")
            .area_id("bedroom")
            .build()?,
        entity("light.kitchen_ceiling", "Kitchen Light", "on")
            .area_id("kitchen")
            .build()?,
        entity("sensor.kitchen_temperature", "Kitchen Temperature", "21.5")
            .area_id("kitchen")
            .attribute("unit_of_measurement", text("\u{b0}C"))
            .attribute("device_class", text("temperature"))
            .build()?,
        entity("climate.living_room", "Living Room Thermostat", "heat")
            .device_id("dev_living_room_thermostat")
            .attribute("temperature", AttributeValue::Float(21.0))
            .build()?,
        entity("sensor.living_room_humidity", "Living Room Humidity", "45")
            .device_id("dev_living_room_thermostat")
            .attribute("unit_of_measurement", text("%"))
            .attribute("device_class", text("humidity"))
            .build()?,
        entity("media_player.living_room_tv", "TV", "off")
            .area_id("living_room")
            .build()?,
        Entity::builder()
            .id("light.porch")
            .friendly_name("Porch Light")
            .state(EntityState::Unavailable)
            .build()?,
    ])
}

/// Registry payload of the demo home.
///
/// # Errors
///
/// Returns a validation error if a demo record violates a domain invariant.
pub fn demo_registry() -> Result<RegistryData, HomeRefError> {
    Ok(RegistryData {
        entities: entities()?,
        devices: devices()?,
        areas: areas()?,
    })
}

#[cfg(test)]
mod tests {
    use homeref_domain::query::{ResolutionQuery, SearchQuery};
    use homeref_domain::snapshot::RegistrySnapshot;

    use super::*;

    fn snapshot() -> RegistrySnapshot {
        RegistrySnapshot::build(demo_registry().unwrap())
    }

    #[test]
    fn should_build_every_demo_record() {
        let data = demo_registry().unwrap();
        assert_eq!(snapshot().len(), data.entities.len());
        assert_eq!(data.areas.len(), 4);
    }

    #[test]
    fn should_resolve_office_light_in_demo_home() {
        let id = snapshot().resolve(&ResolutionQuery::by_name("office light"));
        assert_eq!(id.unwrap().as_str(), "light.sam_office_tube");
    }

    #[test]
    fn should_disambiguate_fans_by_area() {
        let snapshot = snapshot();
        let bedroom = snapshot.resolve(&ResolutionQuery::by_name("fan").in_area("bedroom"));
        let office = snapshot.resolve(&ResolutionQuery::by_name("fan").in_area("study"));
        assert_eq!(bedroom.unwrap().as_str(), "fan.bedroom");
        assert_eq!(office.unwrap().as_str(), "fan.office");
    }

    #[test]
    fn should_find_typo_in_demo_home() {
        let snapshot = snapshot();
        let results = snapshot.search(&SearchQuery::new("offic ligt"));
        assert_eq!(results[0].entity.id.as_str(), "light.sam_office_tube");
    }
}
