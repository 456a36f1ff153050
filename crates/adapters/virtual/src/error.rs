//! Errors raised while loading a registry fixture.

use std::path::PathBuf;

use homeref_domain::error::HomeRefError;

/// Errors originating from the virtual registry source.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// The fixture file could not be read.
    #[error("registry fixture {path} could not be read")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fixture file is not a valid registry document.
    #[error("registry fixture {path} is not valid registry JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<VirtualError> for HomeRefError {
    fn from(err: VirtualError) -> Self {
        Self::Upstream(Box::new(err))
    }
}
