//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod cache_store;
pub mod clock;
pub mod registry_source;

pub use cache_store::{CacheRecord, CacheStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use registry_source::RegistrySource;
