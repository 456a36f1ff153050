//! Two-tier cache with per-key auto-refresh.
//!
//! The fast tier is an in-process map; the durable tier is any
//! [`CacheStore`]. Values are stored as JSON so one cache can hold several
//! payload types. Freshness is judged against the injected [`Clock`], while
//! refresh scheduling runs on tokio time.
//!
//! Durable-tier failures never surface to callers: reads degrade to a miss
//! and writes are logged.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use homeref_domain::error::HomeRefError;

use crate::ports::{CacheRecord, CacheStore, Clock, SystemClock};

/// Shortest period an auto-refresh task runs at.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Handle on one auto-refresh task.
///
/// Cloning the handle does not clone the task; every clone cancels the same
/// task.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    key: Arc<str>,
    token: CancellationToken,
}

impl RefreshHandle {
    /// Key refreshed by the task.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stop scheduling refreshes. A refresh already running completes.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

struct Inner<S> {
    store: S,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
    entries: DashMap<String, CacheRecord<Value>>,
    in_flight: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
    refreshers: parking_lot::Mutex<HashMap<String, RefreshHandle>>,
    shutdown: CancellationToken,
}

/// Fast in-memory tier in front of a durable [`CacheStore`].
///
/// Cheap to clone; clones share the same tiers and refresh tasks.
pub struct CacheLayer<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for CacheLayer<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

impl<S: CacheStore> CacheLayer<S> {
    /// Create a cache judging freshness with the system clock.
    pub fn new(store: S, default_ttl: Duration) -> Self {
        Self::with_clock(store, default_ttl, Arc::new(SystemClock))
    }

    /// Create a cache judging freshness with `clock`.
    pub fn with_clock(store: S, default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                clock,
                default_ttl,
                entries: DashMap::new(),
                in_flight: DashMap::new(),
                refreshers: parking_lot::Mutex::new(HashMap::new()),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// TTL applied when a caller passes none.
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    fn decode<T: DeserializeOwned>(key: &str, data: &Value) -> Option<T> {
        match serde_json::from_value(data.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "cached value does not decode, treating as miss");
                None
            }
        }
    }

    /// Fast-tier read. No guard on the map outlives this call.
    fn fast_get<T: DeserializeOwned>(&self, key: &str, fresh_only: bool) -> Option<T> {
        let now = self.inner.clock.now_millis();
        let entry = self.inner.entries.get(key)?;
        if fresh_only && !entry.is_fresh(now) {
            return None;
        }
        Self::decode(key, &entry.data)
    }

    async fn durable_get<T: DeserializeOwned>(&self, key: &str, fresh_only: bool) -> Option<T> {
        let record = match self.inner.store.load(key).await {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key, error = %err, "durable cache read failed, treating as miss");
                return None;
            }
        };
        if fresh_only && !record.is_fresh(self.inner.clock.now_millis()) {
            return None;
        }
        let value = Self::decode(key, &record.data)?;
        self.inner.entries.insert(key.to_string(), record);
        Some(value)
    }

    /// Fresh value for `key`, from the fast tier or else the durable tier.
    ///
    /// A fresh durable hit is promoted into the fast tier. Stale, missing
    /// and undecodable records are all misses.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(value) = self.fast_get(key, true) {
            return Some(value);
        }
        self.durable_get(key, true).await
    }

    /// Last value written for `key`, fresh or not.
    ///
    /// Reads the fast tier, then the durable tier, so a value persisted
    /// before a restart is still available.
    pub async fn get_last_known<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(value) = self.fast_get(key, false) {
            return Some(value);
        }
        self.durable_get(key, false).await
    }

    /// Store `value` in both tiers with `ttl`, or the default TTL.
    ///
    /// # Errors
    ///
    /// Returns [`HomeRefError::Codec`] when `value` cannot be serialized.
    /// Durable write failures are logged, not returned.
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), HomeRefError> {
        let data = serde_json::to_value(value)?;
        let ttl = ttl_millis(ttl.unwrap_or(self.inner.default_ttl));
        let record = CacheRecord::new(data, self.inner.clock.now_millis(), ttl);
        self.inner.entries.insert(key.to_string(), record.clone());
        if let Err(err) = self.inner.store.save(key, &record).await {
            tracing::warn!(key, error = %err, "durable cache write failed");
        }
        Ok(())
    }

    /// Fresh cached value for `key`, or the result of `fetch`, stored.
    ///
    /// Concurrent misses on the same key wait for a single fetch.
    ///
    /// # Errors
    ///
    /// Propagates the error of `fetch`; cached data is left untouched.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        fetch: F,
    ) -> Result<T, HomeRefError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, HomeRefError>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let lock = Arc::clone(&self.inner.in_flight.entry(key.to_string()).or_default());
        let result = {
            let _guard = lock.lock().await;
            // A concurrent caller may have filled the key while we waited.
            if let Some(value) = self.get(key).await {
                Ok(value)
            } else {
                tracing::debug!(key, "cache miss, fetching");
                match fetch().await {
                    Ok(value) => {
                        let stored = self.set(key, &value, ttl).await;
                        stored.map(|()| value)
                    }
                    Err(err) => Err(err),
                }
            }
        };
        self.inner
            .in_flight
            .remove_if(key, |_, current| Arc::strong_count(current) <= 2);
        result
    }

    /// Periodically overwrite `key` with the result of `refresh`.
    ///
    /// The first refresh happens one `interval` after registration. A failing
    /// refresh is logged and the last known value stays in place. Registering
    /// a key again cancels its previous task. Intervals shorter than
    /// [`MIN_REFRESH_INTERVAL`] are raised to it.
    pub fn auto_refresh<T, F, Fut>(
        &self,
        key: &str,
        interval: Duration,
        ttl: Option<Duration>,
        refresh: F,
    ) -> RefreshHandle
    where
        S: 'static,
        T: Serialize + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, HomeRefError>> + Send + 'static,
    {
        let interval = if interval < MIN_REFRESH_INTERVAL {
            tracing::warn!(
                key,
                requested = ?interval,
                applied = ?MIN_REFRESH_INTERVAL,
                "refresh interval too short, clamping"
            );
            MIN_REFRESH_INTERVAL
        } else {
            interval
        };
        let token = self.inner.shutdown.child_token();
        let handle = RefreshHandle {
            key: Arc::from(key),
            token: token.clone(),
        };
        if let Some(previous) = self
            .inner
            .refreshers
            .lock()
            .insert(key.to_string(), handle.clone())
        {
            tracing::debug!(key, "replacing existing refresh task");
            previous.cancel();
        }

        let cache = self.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                // A refresh that is running when the task is cancelled still
                // completes and stores its value; it is just not scheduled again.
                match refresh().await {
                    Ok(value) => match cache.set(&key, &value, ttl).await {
                        Ok(()) => tracing::debug!(key = %key, "cache entry refreshed"),
                        Err(err) => tracing::warn!(key = %key, error = %err, "refreshed value not stored"),
                    },
                    Err(err) => {
                        tracing::warn!(key = %key, error = %err, "refresh failed, keeping last known value");
                    }
                }
            }
            tracing::debug!(key = %key, "refresh task stopped");
        });

        handle
    }

    /// Remove `key` from both tiers. Its refresh task, if any, keeps running.
    pub async fn invalidate(&self, key: &str) {
        self.inner.entries.remove(key);
        if let Err(err) = self.inner.store.remove(key).await {
            tracing::warn!(key, error = %err, "durable cache remove failed");
        }
    }

    /// Remove every key from both tiers and cancel every refresh task.
    pub async fn clear(&self) {
        self.cancel_refreshers();
        self.inner.entries.clear();
        if let Err(err) = self.inner.store.clear().await {
            tracing::warn!(error = %err, "durable cache clear failed");
        }
    }

    /// Cancel every refresh task, now and for later registrations. Data stays.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        let cancelled = self.cancel_refreshers();
        tracing::info!(cancelled, "cache refresh tasks stopped");
    }

    fn cancel_refreshers(&self) -> usize {
        let handles: Vec<RefreshHandle> = self
            .inner
            .refreshers
            .lock()
            .drain()
            .map(|(_, handle)| handle)
            .collect();
        for handle in &handles {
            handle.cancel();
        }
        handles.len()
    }

    /// Keys with a live refresh task, sorted.
    #[must_use]
    pub fn refresh_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .inner
            .refreshers
            .lock()
            .iter()
            .filter(|(_, handle)| !handle.is_cancelled())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Number of keys in the fast tier, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }
}
