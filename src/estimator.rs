//! Entropy and crack-time estimator.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::sections::{crack_time_display, detect_charset};

/// Offline attack speed assumed by the crack-time estimate.
pub const GUESSES_PER_SECOND: f64 = 1e9;

/// How the guess rate is described to the user.
pub const GUESS_RATE_ASSUMPTION: &str = "modern GPU, average case";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrackTime {
    /// Average-case attack duration; `f64::INFINITY` past the `f64` range.
    pub seconds: f64,
    pub human_readable: String,
}

/// Strength figures derived from a password. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordMetrics {
    pub entropy_bits: f64,
    pub crack_time: CrackTime,
}

/// Estimates entropy and average crack time for a password.
///
/// `entropy_bits = length * log2(charset_size)` over the detected classes.
/// The attacker is assumed to find the password halfway through the
/// keyspace, at [`GUESSES_PER_SECOND`].
pub fn estimate(password: &SecretString) -> PasswordMetrics {
    let profile = detect_charset(password);
    let charset_size = profile.size();

    let entropy_bits = if charset_size == 0 {
        0.0
    } else {
        profile.length as f64 * f64::from(charset_size).log2()
    };

    let seconds = crack_seconds(entropy_bits);

    PasswordMetrics {
        entropy_bits,
        crack_time: CrackTime {
            seconds,
            human_readable: crack_time_display(seconds),
        },
    }
}

/// `2^entropy / 2 / rate`, evaluated in the log domain.
///
/// `exp2` saturates to infinity instead of overflowing for very long
/// passwords.
fn crack_seconds(entropy_bits: f64) -> f64 {
    let log2_seconds = entropy_bits - 1.0 - GUESSES_PER_SECOND.log2();
    log2_seconds.exp2()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(pwd: &str) -> SecretString {
        SecretString::new(pwd.to_string().into())
    }

    #[test]
    fn test_estimate_empty_password() {
        let metrics = estimate(&secret(""));
        assert_eq!(metrics.entropy_bits, 0.0);
        assert_eq!(metrics.crack_time.human_readable, "Instantly");
    }

    #[test]
    fn test_estimate_lowercase_entropy() {
        for len in [1usize, 5, 8, 16, 40] {
            let pwd = "q".repeat(len);
            let metrics = estimate(&secret(&pwd));
            let expected = len as f64 * 26f64.log2();
            assert!(
                (metrics.entropy_bits - expected).abs() < 1e-9,
                "len {}: got {}, expected {}",
                len,
                metrics.entropy_bits,
                expected
            );
        }
    }

    #[test]
    fn test_estimate_mixed_classes() {
        let metrics = estimate(&secret("Tr0ub4dor&3"));
        let expected = 11.0 * 94f64.log2();
        assert!((metrics.entropy_bits - expected).abs() < 1e-9);
        assert!(metrics.entropy_bits > 0.0);
    }

    #[test]
    fn test_estimate_seconds_follow_average_case() {
        // 8 digits: 10^8 combinations, half searched at 1e9/s = 0.05s
        let metrics = estimate(&secret("12345678"));
        assert!((metrics.crack_time.seconds - 0.05).abs() < 1e-9);
        assert_eq!(metrics.crack_time.human_readable, "Instantly");
    }

    #[test]
    fn test_estimate_reaches_years() {
        // 12 lowercase: 26^12 / 2 / 1e9 ~ 4.77e7 s ~ 1.5 years
        let metrics = estimate(&secret("correcthorse"));
        assert_eq!(metrics.crack_time.human_readable, "2 years");

        // 14 lowercase: ~ 1,023 years
        let metrics = estimate(&secret("correcthorseba"));
        assert_eq!(metrics.crack_time.human_readable, "1 thousand years");
    }

    #[test]
    fn test_estimate_very_long_password_does_not_overflow() {
        let pwd = "Aa1!".repeat(5_000);
        let metrics = estimate(&secret(&pwd));
        assert!(metrics.entropy_bits.is_finite());
        assert!(metrics.entropy_bits > 1024.0);
        assert_eq!(metrics.crack_time.seconds, f64::INFINITY);
        assert_eq!(metrics.crack_time.human_readable, "1000000000 billion years");
    }

    #[test]
    fn test_metrics_serialize_camel_case() {
        let json = serde_json::to_value(estimate(&secret("abc"))).unwrap();
        assert!(json.get("entropyBits").is_some());
        assert!(json["crackTime"].get("humanReadable").is_some());
    }
}
