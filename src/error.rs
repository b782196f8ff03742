//! Error types for the storage, cache, corpus and remote layers.
//!
//! None of these ever reach the caller of a breach check: the checker
//! recovers from every one of them. They surface only from the lower-level
//! APIs (`BreachCache::set`, storage backends, collaborators).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read cache store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write cache store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cache store lock poisoned")]
    Poisoned,
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Malformed cache contents: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("Cache worker task failed: {0}")]
    Task(String),
}

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Breach service unreachable: {0}")]
    Transport(String),
    #[error("Breach service responded with status code {0}")]
    Status(u16),
    #[error("Malformed breach service response: {0}")]
    Payload(String),
}

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Local corpus unavailable: {0}")]
    Unavailable(String),
}
