//! In-memory port implementations shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use homeref_domain::area::Area;
use homeref_domain::device::Device;
use homeref_domain::entity::{Entity, EntityState};
use homeref_domain::error::{BoxError, HomeRefError};
use homeref_domain::snapshot::RegistryData;

use crate::ports::{CacheRecord, CacheStore, RegistrySource};

fn offline() -> BoxError {
    Box::new(std::io::Error::other("registry offline"))
}

pub(crate) fn registry_data() -> RegistryData {
    let entity = |id: &str, name: &str| Entity::builder().id(id).friendly_name(name).state("on");
    RegistryData {
        entities: vec![
            entity("light.sam_office_tube", "office lights")
                .area_id("office")
                .build()
                .unwrap(),
            entity("fan.bedroom", "Fan")
                .device_id("dev_bedroom_fan")
                .build()
                .unwrap(),
            entity("fan.office", "Fan").area_id("office").build().unwrap(),
            entity("light.kitchen_ceiling", "Kitchen Light")
                .area_id("kitchen")
                .build()
                .unwrap(),
            entity("sensor.kitchen_temperature", "Kitchen Temperature")
                .state("21.5")
                .area_id("kitchen")
                .build()
                .unwrap(),
            entity("light.porch", "Porch")
                .state(EntityState::Unavailable)
                .build()
                .unwrap(),
        ],
        devices: vec![
            Device::builder()
                .id("dev_bedroom_fan")
                .name("Ceiling Fan")
                .area_id("bedroom")
                .entity("fan.bedroom")
                .build()
                .unwrap(),
        ],
        areas: vec![
            Area::builder().id("office").name("Office").build().unwrap(),
            Area::builder()
                .id("bedroom")
                .name("Bedroom")
                .floor_id("upstairs")
                .build()
                .unwrap(),
            Area::builder().id("kitchen").name("Kitchen").build().unwrap(),
        ],
    }
}

/// Registry source serving a fixed payload, with a failure switch.
#[derive(Default)]
pub(crate) struct InMemorySource {
    data: Mutex<RegistryData>,
    fetches: AtomicUsize,
    failing: AtomicBool,
}

impl InMemorySource {
    pub(crate) fn new(data: RegistryData) -> Self {
        Self {
            data: Mutex::new(data),
            ..Self::default()
        }
    }

    pub(crate) fn set_data(&self, data: RegistryData) {
        *self.data.lock() = data;
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of entity fetches, i.e. of full registry fetches.
    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), HomeRefError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HomeRefError::Upstream(offline()));
        }
        Ok(())
    }
}

impl RegistrySource for InMemorySource {
    async fn fetch_entities(&self) -> Result<Vec<Entity>, HomeRefError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.data.lock().entities.clone())
    }

    async fn fetch_devices(&self) -> Result<Vec<Device>, HomeRefError> {
        self.check()?;
        Ok(self.data.lock().devices.clone())
    }

    async fn fetch_areas(&self) -> Result<Vec<Area>, HomeRefError> {
        self.check()?;
        Ok(self.data.lock().areas.clone())
    }
}

/// Durable tier kept in a map, with a write-failure switch.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    records: Mutex<HashMap<String, CacheRecord<Value>>>,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub(crate) fn insert(&self, key: &str, record: CacheRecord<Value>) {
        self.records.lock().insert(key.to_string(), record);
    }

    pub(crate) fn get(&self, key: &str) -> Option<CacheRecord<Value>> {
        self.records.lock().get(key).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub(crate) fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl CacheStore for InMemoryStore {
    async fn load(&self, key: &str) -> Result<Option<CacheRecord<Value>>, HomeRefError> {
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, record: &CacheRecord<Value>) -> Result<(), HomeRefError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HomeRefError::Storage(Box::new(std::io::Error::other(
                "disk full",
            ))));
        }
        self.insert(key, record.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), HomeRefError> {
        self.records.lock().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), HomeRefError> {
        self.records.lock().clear();
        Ok(())
    }
}
