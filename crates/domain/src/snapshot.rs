//! Registry snapshot: a complete, immutable, point-in-time registry view.
//!
//! A snapshot bundles entities, devices, areas and the [`NameIndex`] built
//! from them. It is assembled in one step by [`RegistrySnapshot::build`] and
//! never mutated afterwards; refreshing means building a new snapshot and
//! swapping the shared reference.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};

use crate::area::Area;
use crate::device::Device;
use crate::entity::Entity;
use crate::id::{AreaId, DeviceId, EntityId};
use crate::name::{normalize, words};
use crate::name_index::NameIndex;
use crate::time::{Timestamp, now};

/// Raw registry content as fetched from the remote system.
///
/// This is the unit stored in the cache and the input of a snapshot build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryData {
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub areas: Vec<Area>,
}

/// Pre-normalized text of one entity, parallel to the snapshot's entity list.
#[derive(Debug, Clone)]
pub struct SearchEntry {
    pub name: String,
    pub id: String,
    pub name_words: Vec<String>,
    pub id_words: Vec<String>,
    pub domain: String,
}

impl SearchEntry {
    fn from_entity(entity: &Entity) -> Self {
        let name = normalize(entity.display_name());
        let id = normalize(entity.id.as_str());
        let name_words = words(&name).map(str::to_string).collect();
        let id_words = words(&id).map(str::to_string).collect();
        Self {
            name,
            id,
            name_words,
            id_words,
            domain: normalize(entity.domain()),
        }
    }
}

/// Immutable registry view shared by the resolver and the search engine.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    entities: Vec<Entity>,
    positions: HashMap<EntityId, usize>,
    search_entries: Vec<SearchEntry>,
    devices: HashMap<DeviceId, Device>,
    areas: Vec<Area>,
    area_positions: HashMap<AreaId, usize>,
    index: NameIndex,
    built_at: Timestamp,
}

impl Default for RegistrySnapshot {
    fn default() -> Self {
        Self::build(RegistryData::default())
    }
}

impl RegistrySnapshot {
    /// Snapshot with no entity at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a snapshot and its name index from raw registry data.
    ///
    /// Entities with a malformed identifier are dropped; for duplicated
    /// identifiers the first occurrence wins. Registry order is preserved.
    #[must_use]
    pub fn build(data: RegistryData) -> Self {
        let mut entities = Vec::with_capacity(data.entities.len());
        let mut positions = HashMap::with_capacity(data.entities.len());
        for entity in data.entities {
            if entity.validate().is_err() {
                continue;
            }
            if let Entry::Vacant(slot) = positions.entry(entity.id.clone()) {
                slot.insert(entities.len());
                entities.push(entity);
            }
        }

        let mut areas = Vec::with_capacity(data.areas.len());
        let mut area_positions = HashMap::with_capacity(data.areas.len());
        for area in data.areas {
            if let Entry::Vacant(slot) = area_positions.entry(area.id.clone()) {
                slot.insert(areas.len());
                areas.push(area);
            }
        }

        let devices = data
            .devices
            .into_iter()
            .map(|device| (device.id.clone(), device))
            .collect();

        let search_entries = entities.iter().map(SearchEntry::from_entity).collect();
        let index = NameIndex::build(&entities);

        Self {
            entities,
            positions,
            search_entries,
            devices,
            areas,
            area_positions,
            index,
            built_at: now(),
        }
    }

    /// Entities in registry order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Look up an entity by identifier.
    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.positions.get(id).map(|&pos| &self.entities[pos])
    }

    /// Whether the snapshot holds `id`.
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.positions.contains_key(id)
    }

    /// Areas in registry order.
    #[must_use]
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Look up an area by identifier.
    #[must_use]
    pub fn area(&self, id: &AreaId) -> Option<&Area> {
        self.area_positions.get(id).map(|&pos| &self.areas[pos])
    }

    /// Look up a device by identifier.
    #[must_use]
    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    /// All devices, in no particular order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// The name index built with this snapshot.
    #[must_use]
    pub fn name_index(&self) -> &NameIndex {
        &self.index
    }

    /// Pre-normalized search text, index-aligned with [`entities`](Self::entities).
    #[must_use]
    pub fn search_entries(&self) -> &[SearchEntry] {
        &self.search_entries
    }

    /// When this snapshot was assembled.
    #[must_use]
    pub fn built_at(&self) -> Timestamp {
        self.built_at
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the snapshot holds no entity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Area id of an entity: its own assignment, else its owning device's.
    #[must_use]
    pub fn area_id_of<'a>(&'a self, entity: &'a Entity) -> Option<&'a AreaId> {
        entity.area_id.as_ref().or_else(|| {
            entity
                .device_id
                .as_ref()
                .and_then(|id| self.devices.get(id))
                .and_then(|device| device.area_id.as_ref())
        })
    }

    /// Area record of an entity, when its area is known to the registry.
    #[must_use]
    pub fn area_of(&self, entity: &Entity) -> Option<&Area> {
        self.area_id_of(entity).and_then(|id| self.area(id))
    }

    /// Whether a normalized area hint designates the entity's area.
    ///
    /// Matches the area's name, id or aliases; an area id that has no area
    /// record is compared directly.
    #[must_use]
    pub fn in_area(&self, entity: &Entity, hint: &str) -> bool {
        match self.area_id_of(entity) {
            Some(id) => match self.area(id) {
                Some(area) => area.matches(hint),
                None => !hint.is_empty() && normalize(id.as_str()) == hint,
            },
            None => false,
        }
    }

    /// Floor of an entity: its `floor` attribute, else its area's floor.
    #[must_use]
    pub fn floor_of<'a>(&'a self, entity: &'a Entity) -> Option<&'a str> {
        entity
            .floor()
            .or_else(|| self.area_of(entity).and_then(|area| area.floor_id.as_deref()))
    }

    /// Entities filtered by optional domain and area hints (raw text).
    #[must_use]
    pub fn filter(&self, domain: Option<&str>, area: Option<&str>) -> Vec<&Entity> {
        let domain = domain.map(normalize);
        let area = area.map(normalize);
        self.entities
            .iter()
            .zip(&self.search_entries)
            .filter(|(_, entry)| domain.as_ref().is_none_or(|d| &entry.domain == d))
            .filter(|(entity, _)| area.as_ref().is_none_or(|a| self.in_area(entity, a)))
            .map(|(entity, _)| entity)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{registry_data, snapshot};

    #[test]
    fn should_build_index_alongside_entities() {
        let snapshot = snapshot();
        assert_eq!(snapshot.len(), 7);
        for entity in snapshot.entities() {
            let ids = snapshot
                .name_index()
                .lookup(&normalize(entity.display_name()))
                .unwrap();
            assert!(ids.contains(&entity.id));
        }
        assert_eq!(snapshot.search_entries().len(), snapshot.len());
    }

    #[test]
    fn should_resolve_area_through_owning_device() {
        let snapshot = snapshot();
        let fan = snapshot.entity(&EntityId::new("fan.bedroom_fan")).unwrap();
        assert_eq!(snapshot.area_of(fan).unwrap().name, "Bedroom");
        assert!(snapshot.in_area(fan, "sleeping_room"));
        assert_eq!(snapshot.floor_of(fan), Some("upstairs"));
    }

    #[test]
    fn should_prefer_floor_attribute_over_area_floor() {
        let snapshot = snapshot();
        let hallway = snapshot.entity(&EntityId::new("light.hallway")).unwrap();
        assert!(snapshot.area_of(hallway).is_none());
        assert_eq!(snapshot.floor_of(hallway), Some("upstairs"));
    }

    #[test]
    fn should_compare_dangling_area_id_directly() {
        let mut data = registry_data();
        data.areas.clear();
        let snapshot = RegistrySnapshot::build(data);
        let light = snapshot
            .entity(&EntityId::new("light.sam_office_tube"))
            .unwrap();
        assert!(snapshot.area_of(light).is_none());
        assert!(snapshot.in_area(light, "office"));
    }

    #[test]
    fn should_drop_duplicates_and_malformed_entities() {
        let mut data = registry_data();
        let mut duplicate = data.entities[0].clone();
        duplicate.friendly_name = Some("shadow".to_string());
        data.entities.push(duplicate);
        let mut malformed = data.entities[1].clone();
        malformed.id = EntityId::new("nodomain");
        data.entities.push(malformed);

        let snapshot = RegistrySnapshot::build(data);
        assert_eq!(snapshot.len(), 7);
        let light = snapshot
            .entity(&EntityId::new("light.sam_office_tube"))
            .unwrap();
        assert_eq!(light.display_name(), "office lights");
        assert!(!snapshot.contains(&EntityId::new("nodomain")));
    }

    #[test]
    fn should_filter_by_domain_and_area() {
        let snapshot = snapshot();
        let office_fans: Vec<&str> = snapshot
            .filter(Some("fan"), Some("Office"))
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(office_fans, vec!["fan.office_fan"]);

        let kitchen = snapshot.filter(None, Some("kitchen"));
        assert_eq!(kitchen.len(), 3);
        assert_eq!(snapshot.filter(None, None).len(), 7);
    }

    #[test]
    fn should_build_empty_snapshot() {
        let snapshot = RegistrySnapshot::empty();
        assert!(snapshot.is_empty());
        assert!(snapshot.name_index().is_empty());
    }

    #[test]
    fn should_parse_registry_data_with_missing_sections() {
        let data: RegistryData = serde_json::from_str(
            r#"{"entities": [{"id": "light.porch", "state": "off"}]}"#,
        )
        .unwrap();
        assert!(data.devices.is_empty());
        let snapshot = RegistrySnapshot::build(data);
        let porch = snapshot.entity(&EntityId::new("light.porch")).unwrap();
        assert_eq!(porch.display_name(), "light.porch");
    }
}
