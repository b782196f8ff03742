//! Structured analysis handed to the narrative/insight service.
//!
//! The crate only assembles the payload; generating and interpreting the
//! free-text insights is the remote service's job.

use serde::Serialize;

use crate::estimator::{PasswordMetrics, GUESS_RATE_ASSUMPTION};
use crate::result::BreachResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordAnalysis {
    pub metrics: PasswordMetrics,
    pub breach: BreachResult,
    pub guess_rate_assumption: &'static str,
}

impl PasswordAnalysis {
    pub fn new(metrics: PasswordMetrics, breach: BreachResult) -> Self {
        Self {
            metrics,
            breach,
            guess_rate_assumption: GUESS_RATE_ASSUMPTION,
        }
    }
}

/// Runs the estimator and the breach checker for one password.
#[cfg(feature = "async")]
pub async fn analyze(
    checker: &crate::checker::BreachChecker,
    password: &secrecy::SecretString,
) -> PasswordAnalysis {
    let metrics = crate::estimator::estimate(password);
    let breach = checker.check(password).await;
    PasswordAnalysis::new(metrics, breach)
}
