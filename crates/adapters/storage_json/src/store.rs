//! [`CacheStore`] implementation writing one JSON file per key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use homeref_app::ports::{CacheRecord, CacheStore};
use homeref_domain::error::HomeRefError;

use crate::error::StorageError;

const EXTENSION: &str = "json";
const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Map a cache key to a safe file stem.
///
/// `[A-Za-z0-9-]` is kept as is and every other byte, `_` included, becomes
/// `_XX` (uppercase hex). Distinct keys get distinct stems and no stem can
/// escape the cache directory. The empty key maps to `_`, which no other
/// key produces.
#[must_use]
pub fn sanitize_key(key: &str) -> String {
    if key.is_empty() {
        return "_".to_string();
    }
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push('_');
            stem.push(char::from(HEX[usize::from(byte >> 4)]));
            stem.push(char::from(HEX[usize::from(byte & 0x0F)]));
        }
    }
    stem
}

/// Durable cache tier rooted at a directory.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(sanitize_key(key))
            .with_extension(EXTENSION)
    }

    async fn read(&self, key: &str) -> Result<Option<CacheRecord<Value>>, StorageError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::io(path)(err)),
        };
        match serde_json::from_slice(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring malformed cache file");
                Ok(None)
            }
        }
    }

    async fn write(&self, key: &str, record: &CacheRecord<Value>) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(StorageError::io(&self.dir))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(record)?;
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(StorageError::io(&tmp))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(StorageError::io(&path))?;
        tracing::debug!(path = %path.display(), "cache file written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(StorageError::io(path)(err)),
            _ => Ok(()),
        }
    }

    async fn delete_all(&self) -> Result<(), StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(StorageError::io(&self.dir)(err)),
        };
        let mut removed = 0_usize;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(StorageError::io(&self.dir))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                tokio::fs::remove_file(&path)
                    .await
                    .map_err(StorageError::io(&path))?;
                removed += 1;
            }
        }
        tracing::debug!(dir = %self.dir.display(), removed, "cache directory cleared");
        Ok(())
    }
}

impl CacheStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<CacheRecord<Value>>, HomeRefError> {
        Ok(self.read(key).await?)
    }

    async fn save(&self, key: &str, record: &CacheRecord<Value>) -> Result<(), HomeRefError> {
        Ok(self.write(key, record).await?)
    }

    async fn remove(&self, key: &str) -> Result<(), HomeRefError> {
        Ok(self.delete(key).await?)
    }

    async fn clear(&self) -> Result<(), HomeRefError> {
        Ok(self.delete_all().await?)
    }
}
