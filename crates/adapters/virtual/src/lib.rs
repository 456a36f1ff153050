//! # homeref-adapter-virtual
//!
//! Registry source that needs no remote system: either the built-in demo
//! home (see [`home`]) or a registry fixture read from a JSON file.
//!
//! A fixture is re-read on every fetch, so editing the file is picked up by
//! the next refresh.
//!
//! ## Dependency rule
//!
//! Depends on `homeref-app` (port traits) and `homeref-domain` only.

pub mod error;
pub mod home;

use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use homeref_app::ports::RegistrySource;
use homeref_domain::area::Area;
use homeref_domain::device::Device;
use homeref_domain::entity::Entity;
use homeref_domain::error::HomeRefError;
use homeref_domain::snapshot::RegistryData;

use crate::error::VirtualError;

enum Backing {
    Static(RwLock<RegistryData>),
    Fixture(PathBuf),
}

/// Virtual registry source.
pub struct VirtualRegistry {
    backing: Backing,
}

impl VirtualRegistry {
    /// Serve a fixed registry payload.
    #[must_use]
    pub fn new(data: RegistryData) -> Self {
        Self {
            backing: Backing::Static(RwLock::new(data)),
        }
    }

    /// Serve the built-in demo home.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a demo record is invalid.
    pub fn demo() -> Result<Self, HomeRefError> {
        home::demo_registry().map(Self::new)
    }

    /// Serve the registry stored in the JSON file at `path`.
    ///
    /// The file is not read until the first fetch.
    pub fn from_fixture(path: impl Into<PathBuf>) -> Self {
        Self {
            backing: Backing::Fixture(path.into()),
        }
    }

    /// Replace the served payload. Has no effect on a fixture-backed source.
    pub fn replace(&self, data: RegistryData) {
        match &self.backing {
            Backing::Static(current) => *current.write() = data,
            Backing::Fixture(path) => {
                tracing::warn!(path = %path.display(), "ignoring replace on fixture-backed registry");
            }
        }
    }

    async fn load(&self) -> Result<RegistryData, VirtualError> {
        match &self.backing {
            Backing::Static(data) => {
                let data = data.read().clone();
                Ok(data)
            }
            Backing::Fixture(path) => read_fixture(path).await,
        }
    }
}

/// Read and parse a registry fixture.
///
/// # Errors
///
/// Returns [`VirtualError::Read`] or [`VirtualError::Parse`].
pub async fn read_fixture(path: &Path) -> Result<RegistryData, VirtualError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| VirtualError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let data: RegistryData =
        serde_json::from_slice(&bytes).map_err(|source| VirtualError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(
        path = %path.display(),
        entities = data.entities.len(),
        "registry fixture loaded"
    );
    Ok(data)
}

impl RegistrySource for VirtualRegistry {
    async fn fetch_entities(&self) -> Result<Vec<Entity>, HomeRefError> {
        Ok(self.load().await?.entities)
    }

    async fn fetch_devices(&self) -> Result<Vec<Device>, HomeRefError> {
        Ok(self.load().await?.devices)
    }

    async fn fetch_areas(&self) -> Result<Vec<Area>, HomeRefError> {
        Ok(self.load().await?.areas)
    }

    async fn fetch_registry(&self) -> Result<RegistryData, HomeRefError> {
        Ok(self.load().await?)
    }
}
