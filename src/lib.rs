//! Password security analysis library
//!
//! Estimates password entropy and offline crack time, obfuscates keywords
//! into stronger candidates, and checks passwords against breach corpora
//! through a persistent, TTL-bounded cache.
//!
//! # Features
//!
//! - `async` (default): breach checking, debouncing and cancellation
//! - `http` (default): `reqwest`-backed remote breach verifier
//! - `tracing` (default): Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_BLACKLIST_PATH`: custom offline corpus file (default: bundled list)
//! - `PWD_BREACH_CACHE_PATH`: breach cache file (default: `./breach-cache.json`)
//! - `PWD_BREACH_ENDPOINT`, `PWD_BREACH_TOKEN`: remote verification service
//! - `PWD_BREACH_DEBOUNCE_MS`: debounce delay (default: 500)
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_audit::{estimate, obfuscate_keyword};
//! use secrecy::SecretString;
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! let metrics = estimate(&password);
//! println!("{:.1} bits, cracked in {}", metrics.entropy_bits, metrics.crack_time.human_readable);
//!
//! let candidate = obfuscate_keyword("sunshine", true, true, true);
//! println!("Try: {}", candidate);
//! ```
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "async", feature = "http"))]
//! # async fn run() {
//! use std::sync::Arc;
//! use pwd_audit::{BreachCache, BreachChecker, BreachConfig, Blacklist, HttpVerifier};
//! use secrecy::SecretString;
//!
//! let config = BreachConfig::from_env();
//! let remote = HttpVerifier::from_config(&config)
//!     .unwrap_or_else(|| HttpVerifier::new("https://breach.example.com/check"));
//! let checker = BreachChecker::new(
//!     BreachCache::from_config(&config),
//!     Arc::new(remote),
//!     Arc::new(Blacklist::from_env().unwrap_or_default()),
//! );
//!
//! let result = checker.check(&SecretString::new("hunter2".to_string().into())).await;
//! println!("{}: {}", result.severity, result.message);
//! # }
//! ```

// Internal modules
mod blacklist;
mod cache;
mod config;
mod error;
mod estimator;
mod obfuscator;
mod result;
mod report;
mod sections;

#[cfg(feature = "async")]
mod checker;
#[cfg(feature = "async")]
mod debounce;
#[cfg(feature = "async")]
mod remote;

// Public API
pub use blacklist::{get_blacklist_path, Blacklist, BlacklistError, CorpusVerdict, LocalCorpus};
pub use cache::{cache_key, BreachCache, CacheStorage, Clock, FileStorage, MemoryStorage, SystemClock};
pub use config::{
    BreachConfig, CacheConfig, DEFAULT_CAPACITY, DEFAULT_DEBOUNCE, DEFAULT_LOW_WATER, DEFAULT_TTL,
};
pub use error::{CacheError, CorpusError, RemoteError, StorageError};
pub use estimator::{estimate, CrackTime, PasswordMetrics, GUESSES_PER_SECOND, GUESS_RATE_ASSUMPTION};
pub use obfuscator::{obfuscate, obfuscate_keyword, ObfuscationRequest};
pub use report::PasswordAnalysis;
pub use result::{BreachResult, BreachSource, Severity};
pub use sections::crack_time_display;

#[cfg(feature = "async")]
pub use checker::BreachChecker;
#[cfg(feature = "async")]
pub use debounce::{BreachQueryState, DebouncedBreachQuery};
#[cfg(feature = "async")]
pub use remote::{RemoteVerdict, RemoteVerifier};
#[cfg(feature = "async")]
pub use report::analyze;
#[cfg(feature = "http")]
pub use remote::HttpVerifier;

#[cfg(feature = "async")]
pub use tokio_util::sync::CancellationToken;
