//! Breach cache
//!
//! A bounded, TTL-expiring map from password digest to breach verdict,
//! persisted as one JSON document through a [`CacheStorage`]. The cache is a
//! latency optimization only: storage failures never surface from [`BreachCache::get`],
//! and an unreadable store is treated as empty.

mod storage;

pub use storage::{CacheStorage, FileStorage, MemoryStorage};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::{BreachConfig, CacheConfig};
use crate::error::CacheError;
use crate::result::BreachResult;

/// Source of the current time for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CacheEntry {
    result: BreachResult,
    /// Milliseconds since the Unix epoch.
    timestamp: u64,
}

type CacheMap = HashMap<String, CacheEntry>;

/// Cache bucketing key for a password: 64-bit FNV-1a, lower hex.
///
/// This is NOT a security hash. Two passwords that collide share a cache
/// slot, so one can be served the other's verdict until the entry expires.
pub fn cache_key(password: &str) -> String {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let hash = password
        .as_bytes()
        .iter()
        .fold(OFFSET_BASIS, |h, b| (h ^ u64::from(*b)).wrapping_mul(PRIME));
    format!("{hash:016x}")
}

pub struct BreachCache {
    storage: Box<dyn CacheStorage>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl BreachCache {
    pub fn new<S: CacheStorage + 'static>(storage: S, config: CacheConfig) -> Self {
        Self::with_clock(storage, config, Arc::new(SystemClock))
    }

    pub fn with_clock<S: CacheStorage + 'static>(
        storage: S,
        config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            storage: Box::new(storage),
            clock,
            config,
        }
    }

    /// File-backed cache with default sizing.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self::new(FileStorage::new(path), CacheConfig::default())
    }

    /// File-backed cache at `config.cache_path`, sized by `config.cache`.
    pub fn from_config(config: &BreachConfig) -> Self {
        Self::new(FileStorage::new(config.cache_path.clone()), config.cache)
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new(), CacheConfig::default())
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Whether lookups and writes block on I/O and belong off the async runtime.
    pub fn is_blocking(&self) -> bool {
        self.storage.is_blocking()
    }

    /// Returns the cached verdict if present and younger than the TTL.
    ///
    /// Expired entries are removed. Storage and parse failures are logged
    /// and reported as a miss.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn get(&self, password: &SecretString) -> Option<BreachResult> {
        let key = cache_key(password.expose_secret());

        let mut map = match self.load() {
            Ok(map) => map,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Breach cache unreadable, treating as miss: {}", e);
                return None;
            }
        };

        let ttl_ms = self.config.ttl.as_millis();
        let now = self.now_millis();

        match map.get(&key) {
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(key = %key, "breach cache miss");
                return None;
            }
            Some(entry) if u128::from(now.saturating_sub(entry.timestamp)) < ttl_ms => {
                #[cfg(feature = "tracing")]
                tracing::debug!(key = %key, "breach cache hit");
                return Some(entry.result.clone());
            }
            Some(_) => {}
        }

        map.remove(&key);

        #[cfg(feature = "tracing")]
        tracing::debug!(key = %key, "breach cache entry expired");

        if let Err(e) = self.persist(&map) {
            #[cfg(feature = "tracing")]
            tracing::warn!("Failed to persist expired breach cache entry removal: {}", e);
        }
        None
    }

    /// Stores a verdict stamped with the current time.
    ///
    /// Past `capacity` entries, only the newest `low_water` are kept. A
    /// corrupt store is replaced rather than merged.
    ///
    /// # Errors
    ///
    /// Returns error if the updated cache cannot be encoded or written.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn set(&self, password: &SecretString, result: BreachResult) -> Result<(), CacheError> {
        let key = cache_key(password.expose_secret());

        let mut map = self.load().unwrap_or_else(|e| {
            #[cfg(feature = "tracing")]
            tracing::warn!("Discarding unreadable breach cache: {}", e);
            CacheMap::new()
        });

        map.insert(
            key,
            CacheEntry {
                result,
                timestamp: self.now_millis(),
            },
        );

        if map.len() > self.config.capacity {
            self.evict(&mut map);
        }

        self.persist(&map)
    }

    /// Number of stored entries, expired or not. 0 if unreadable.
    pub fn len(&self) -> usize {
        self.load().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// # Errors
    ///
    /// Returns error if the empty cache cannot be written.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.persist(&CacheMap::new())
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn evict(&self, map: &mut CacheMap) {
        let before = map.len();

        let mut entries: Vec<(String, CacheEntry)> = map.drain().collect();
        entries.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
        entries.truncate(self.config.low_water);
        map.extend(entries);

        #[cfg(feature = "tracing")]
        tracing::debug!("Breach cache evicted {} entries", before - map.len());
    }

    fn load(&self) -> Result<CacheMap, CacheError> {
        match self.storage.read()? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(CacheMap::new()),
        }
    }

    fn persist(&self, map: &CacheMap) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(map)?;
        self.storage.write(&bytes)?;
        Ok(())
    }

    fn now_millis(&self) -> u64 {
        self.clock
            .now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}
