//! Cache store port: the durable tier of the cache layer.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use homeref_domain::error::HomeRefError;

/// A cached value with the time it was written and how long it stays fresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord<T> {
    pub data: T,
    /// Write time, epoch milliseconds.
    pub timestamp: i64,
    /// Time to live, milliseconds.
    pub ttl: u64,
}

impl<T> CacheRecord<T> {
    pub fn new(data: T, timestamp: i64, ttl: u64) -> Self {
        Self {
            data,
            timestamp,
            ttl,
        }
    }

    /// Fresh iff `now - timestamp < ttl`.
    #[must_use]
    pub fn is_fresh(&self, now_millis: i64) -> bool {
        let age = now_millis.saturating_sub(self.timestamp);
        age < i64::try_from(self.ttl).unwrap_or(i64::MAX)
    }
}

/// Durable key/value storage for [`CacheRecord`]s.
///
/// Records are stored as opaque JSON; the cache layer owns (de)serialization
/// of the payload.
pub trait CacheStore: Send + Sync {
    /// Read the record stored under `key`, if any.
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<CacheRecord<Value>>, HomeRefError>> + Send;

    /// Write `record` under `key`, replacing any previous record.
    fn save(
        &self,
        key: &str,
        record: &CacheRecord<Value>,
    ) -> impl Future<Output = Result<(), HomeRefError>> + Send;

    /// Remove the record stored under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), HomeRefError>> + Send;

    /// Remove every record.
    fn clear(&self) -> impl Future<Output = Result<(), HomeRefError>> + Send;
}

impl<T: CacheStore> CacheStore for Arc<T> {
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<CacheRecord<Value>>, HomeRefError>> + Send {
        (**self).load(key)
    }

    fn save(
        &self,
        key: &str,
        record: &CacheRecord<Value>,
    ) -> impl Future<Output = Result<(), HomeRefError>> + Send {
        (**self).save(key, record)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), HomeRefError>> + Send {
        (**self).remove(key)
    }

    fn clear(&self) -> impl Future<Output = Result<(), HomeRefError>> + Send {
        (**self).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_be_fresh_strictly_before_ttl_elapses() {
        let record = CacheRecord::new((), 1_000, 500);
        assert!(record.is_fresh(1_000));
        assert!(record.is_fresh(1_499));
        assert!(!record.is_fresh(1_500));
    }

    #[test]
    fn should_never_be_fresh_with_zero_ttl() {
        let record = CacheRecord::new((), 1_000, 0);
        assert!(!record.is_fresh(1_000));
    }

    #[test]
    fn should_serialize_with_data_timestamp_and_ttl() {
        let record = CacheRecord::new(serde_json::json!({"a": 1}), 42, 7);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"data": {"a": 1}, "timestamp": 42, "ttl": 7}));
    }
}
