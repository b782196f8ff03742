//! Tunables and environment configuration.
//!
//! # Environment Variables
//!
//! - `PWD_BREACH_CACHE_PATH`: breach cache file (default: `./breach-cache.json`)
//! - `PWD_BREACH_ENDPOINT`: remote verification endpoint (no default)
//! - `PWD_BREACH_TOKEN`: bearer token sent to the endpoint
//! - `PWD_BREACH_DEBOUNCE_MS`: debounce delay in milliseconds (default: 500)

use std::path::PathBuf;
use std::time::Duration;

/// Entries older than this are never served.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Hard cap on the number of cached verdicts.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Number of entries kept after an eviction pass.
pub const DEFAULT_LOW_WATER: usize = 800;

/// Quiet period before a breach check is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

const DEFAULT_CACHE_PATH: &str = "./breach-cache.json";

/// Breach cache sizing and expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub capacity: usize,
    pub low_water: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            capacity: DEFAULT_CAPACITY,
            low_water: DEFAULT_LOW_WATER,
        }
    }
}

/// Process-level settings for wiring a breach checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreachConfig {
    pub cache_path: PathBuf,
    pub endpoint: Option<String>,
    pub api_token: Option<String>,
    pub debounce: Duration,
    pub cache: CacheConfig,
}

impl Default for BreachConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            endpoint: None,
            api_token: None,
            debounce: DEFAULT_DEBOUNCE,
            cache: CacheConfig::default(),
        }
    }
}

impl BreachConfig {
    /// Builds the configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cache_path = std::env::var("PWD_BREACH_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_path);

        let endpoint = std::env::var("PWD_BREACH_ENDPOINT")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let api_token = std::env::var("PWD_BREACH_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let debounce = std::env::var("PWD_BREACH_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.debounce);

        Self {
            cache_path,
            endpoint,
            api_token,
            debounce,
            cache: defaults.cache,
        }
    }
}
