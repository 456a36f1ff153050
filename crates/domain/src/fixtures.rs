//! Small registry shared by the unit tests of this crate.

use crate::area::Area;
use crate::device::Device;
use crate::entity::{AttributeValue, Entity, EntityState};
use crate::snapshot::{RegistryData, RegistrySnapshot};

fn entity(id: &str, name: &str) -> crate::entity::EntityBuilder {
    Entity::builder().id(id).friendly_name(name).state("on")
}

pub(crate) fn registry_data() -> RegistryData {
    RegistryData {
        entities: vec![
            entity("light.sam_office_tube", "office lights")
                .area_id("office")
                .build()
                .unwrap(),
            entity("fan.bedroom_fan", "fan")
                .device_id("dev_bedroom_fan")
                .build()
                .unwrap(),
            entity("fan.office_fan", "fan")
                .area_id("office")
                .build()
                .unwrap(),
            entity("light.kitchen_ceiling", "Kitchen Light")
                .area_id("kitchen")
                .build()
                .unwrap(),
            entity("light.kitchen_light_strip", "Kitchen Light Strip")
                .area_id("kitchen")
                .build()
                .unwrap(),
            entity("sensor.kitchen_temperature", "Kitchen Temperature")
                .state("21.5")
                .attribute("unit_of_measurement", AttributeValue::String("°C".to_string()))
                .area_id("kitchen")
                .build()
                .unwrap(),
            entity("light.hallway", "Hallway")
                .state(EntityState::Unavailable)
                .attribute("floor", AttributeValue::String("upstairs".to_string()))
                .build()
                .unwrap(),
        ],
        devices: vec![
            Device::builder()
                .id("dev_bedroom_fan")
                .name("Ceiling Fan")
                .area_id("bedroom")
                .entity("fan.bedroom_fan")
                .build()
                .unwrap(),
        ],
        areas: vec![
            Area::builder()
                .id("office")
                .name("Office")
                .floor_id("ground")
                .build()
                .unwrap(),
            Area::builder()
                .id("bedroom")
                .name("Bedroom")
                .alias("Sleeping Room")
                .floor_id("upstairs")
                .build()
                .unwrap(),
            Area::builder()
                .id("kitchen")
                .name("Kitchen")
                .floor_id("ground")
                .build()
                .unwrap(),
        ],
    }
}

pub(crate) fn snapshot() -> RegistrySnapshot {
    RegistrySnapshot::build(registry_data())
}
