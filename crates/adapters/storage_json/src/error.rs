//! Storage-specific error type wrapping filesystem and JSON errors.

use std::path::PathBuf;

use homeref_domain::error::HomeRefError;

/// Errors originating from the JSON file store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading, writing or listing a cache file failed.
    #[error("cache file {path} could not be accessed")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

impl From<StorageError> for HomeRefError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
