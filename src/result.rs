//! Breach verdict types.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Which collaborator produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreachSource {
    Remote,
    Local,
}

/// Normalized outcome of a breach determination.
///
/// Built only through the constructors below, which keep `severity` at
/// [`Severity::Low`] whenever `is_breached` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreachResult {
    pub is_breached: bool,
    pub severity: Severity,
    pub message: String,
    pub source: BreachSource,
    /// Size of the corpus consulted. Display only.
    pub passwords_checked: u64,
}

impl BreachResult {
    /// Verdict from the remote verification service.
    pub fn remote(is_breached: bool, passwords_checked: u64) -> Self {
        let (severity, message) = if is_breached {
            (
                Severity::High,
                "This password has appeared in a known data breach. Choose a different one.",
            )
        } else {
            (Severity::Low, "This password was not found in known data breaches.")
        };
        Self {
            is_breached,
            severity,
            message: message.to_string(),
            source: BreachSource::Remote,
            passwords_checked,
        }
    }

    /// Verdict from the bundled offline corpus.
    pub fn local(is_breached: bool, passwords_checked: u64) -> Self {
        let (severity, message) = if is_breached {
            (
                Severity::Medium,
                "This password is on a list of commonly used passwords.",
            )
        } else {
            (
                Severity::Low,
                "This password was not found in the offline list of common passwords.",
            )
        };
        Self {
            is_breached,
            severity,
            message: message.to_string(),
            source: BreachSource::Local,
            passwords_checked,
        }
    }

    pub(crate) fn empty_input() -> Self {
        Self::advisory("Enter a password to check")
    }

    pub(crate) fn unavailable() -> Self {
        Self::advisory("Unable to check breach status")
    }

    fn advisory(message: &str) -> Self {
        Self {
            is_breached: false,
            severity: Severity::Low,
            message: message.to_string(),
            source: BreachSource::Local,
            passwords_checked: 0,
        }
    }
}
