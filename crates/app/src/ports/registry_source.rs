//! Registry source port: read access to the remote home-automation registry.

use std::future::Future;
use std::sync::Arc;

use homeref_domain::area::Area;
use homeref_domain::device::Device;
use homeref_domain::entity::Entity;
use homeref_domain::error::HomeRefError;
use homeref_domain::snapshot::RegistryData;

/// Remote registry the snapshots are built from.
///
/// Every fetch is idempotent and returns an error rather than partial data.
/// Implementations bound their own network calls; callers add no timeout.
pub trait RegistrySource: Send + Sync {
    /// Fetch every entity with its current state and attributes.
    fn fetch_entities(&self) -> impl Future<Output = Result<Vec<Entity>, HomeRefError>> + Send;

    /// Fetch the device registry.
    fn fetch_devices(&self) -> impl Future<Output = Result<Vec<Device>, HomeRefError>> + Send;

    /// Fetch the area registry.
    fn fetch_areas(&self) -> impl Future<Output = Result<Vec<Area>, HomeRefError>> + Send;

    /// Fetch all three registries concurrently.
    fn fetch_registry(&self) -> impl Future<Output = Result<RegistryData, HomeRefError>> + Send {
        async move {
            let (entities, devices, areas) = tokio::try_join!(
                self.fetch_entities(),
                self.fetch_devices(),
                self.fetch_areas()
            )?;
            Ok(RegistryData {
                entities,
                devices,
                areas,
            })
        }
    }
}

impl<T: RegistrySource> RegistrySource for Arc<T> {
    fn fetch_entities(&self) -> impl Future<Output = Result<Vec<Entity>, HomeRefError>> + Send {
        (**self).fetch_entities()
    }

    fn fetch_devices(&self) -> impl Future<Output = Result<Vec<Device>, HomeRefError>> + Send {
        (**self).fetch_devices()
    }

    fn fetch_areas(&self) -> impl Future<Output = Result<Vec<Area>, HomeRefError>> + Send {
        (**self).fetch_areas()
    }

    fn fetch_registry(&self) -> impl Future<Output = Result<RegistryData, HomeRefError>> + Send {
        (**self).fetch_registry()
    }
}
