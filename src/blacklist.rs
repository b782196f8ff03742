//! Blacklist management module
//!
//! The offline breach corpus: a finite list of commonly used passwords that
//! the breach checker falls back to when the remote service is unavailable.

use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::CorpusError;

const BUNDLED_BLACKLIST: &str = include_str!("../assets/common-passwords.txt");

#[derive(Error, Debug)]
pub enum BlacklistError {
    #[error("Blacklist file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read blacklist file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Blacklist file is empty")]
    EmptyFile,
}

/// Verdict of a local corpus lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusVerdict {
    pub is_breached: bool,
    pub passwords_checked: u64,
}

/// Offline breach corpus consulted when the remote service fails.
pub trait LocalCorpus: Send + Sync {
    fn lookup(&self, password: &str) -> Result<CorpusVerdict, CorpusError>;
}

/// Returns the blacklist file path override, if any.
///
/// Reads the environment variable `PWD_BLACKLIST_PATH`.
pub fn get_blacklist_path() -> Option<PathBuf> {
    std::env::var("PWD_BLACKLIST_PATH").ok().map(PathBuf::from)
}

/// Case-insensitive set of known-breached passwords.
#[derive(Debug, Clone)]
pub struct Blacklist {
    entries: HashSet<String>,
}

impl Blacklist {
    /// The list compiled into the crate.
    pub fn bundled() -> Self {
        Self {
            entries: parse_lines(BUNDLED_BLACKLIST),
        }
    }

    /// Loads the blacklist from a specific file path, one password per line.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File is empty
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, BlacklistError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Blacklist initialization FAILED: FileNotFound {:?}", path);
            return Err(BlacklistError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;

        if content.trim().is_empty() {
            #[cfg(feature = "tracing")]
            tracing::error!("Blacklist initialization FAILED: Empty file {:?}", path);
            return Err(BlacklistError::EmptyFile);
        }

        let entries = parse_lines(&content);

        #[cfg(feature = "tracing")]
        tracing::info!("Blacklist initialized: {} passwords from {:?}", entries.len(), path);

        Ok(Self { entries })
    }

    /// Loads from `PWD_BLACKLIST_PATH` when set, otherwise the bundled list.
    ///
    /// # Errors
    ///
    /// Same as [`Blacklist::from_path`] when the variable is set.
    pub fn from_env() -> Result<Self, BlacklistError> {
        match get_blacklist_path() {
            Some(path) => Self::from_path(path),
            None => Ok(Self::bundled()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the password is in the blacklist (case-insensitive).
    pub fn contains(&self, password: &str) -> bool {
        self.entries.contains(&password.to_lowercase())
    }
}

impl Default for Blacklist {
    fn default() -> Self {
        Self::bundled()
    }
}

impl LocalCorpus for Blacklist {
    fn lookup(&self, password: &str) -> Result<CorpusVerdict, CorpusError> {
        Ok(CorpusVerdict {
            is_breached: self.contains(password),
            passwords_checked: self.entries.len() as u64,
        })
    }
}

fn parse_lines(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}
