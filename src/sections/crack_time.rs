//! Crack-time section - maps an attack duration to a display bucket.

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3_600.0;
const DAY: f64 = 86_400.0;
const YEAR: f64 = 31_536_000.0;
const THOUSAND_YEARS: f64 = YEAR * 1e3;
const MILLION_YEARS: f64 = YEAR * 1e6;
const BILLION_YEARS: f64 = YEAR * 1e9;

/// Largest billion-year count ever printed; longer durations clamp to it.
const BILLION_YEARS_DISPLAY_CAP: f64 = 1e9;

/// Formats an attack duration in seconds.
///
/// Bucket lower bounds are inclusive: exactly 60 seconds reads as
/// "1 minute", never "60 seconds". Counts round to the nearest integer.
pub fn crack_time_display(seconds: f64) -> String {
    if seconds.is_nan() || seconds < 1.0 {
        return "Instantly".to_string();
    }
    if seconds < MINUTE {
        return unit(seconds, "second");
    }
    if seconds < HOUR {
        return unit(seconds / MINUTE, "minute");
    }
    if seconds < DAY {
        return unit(seconds / HOUR, "hour");
    }
    if seconds < YEAR {
        return unit(seconds / DAY, "day");
    }
    if seconds < THOUSAND_YEARS {
        return unit(seconds / YEAR, "year");
    }
    if seconds < MILLION_YEARS {
        return format!("{:.0} thousand years", (seconds / THOUSAND_YEARS).round());
    }
    if seconds < BILLION_YEARS {
        return format!("{:.0} million years", (seconds / MILLION_YEARS).round());
    }

    let billions = (seconds / BILLION_YEARS).round();
    let billions = if billions.is_finite() {
        billions.min(BILLION_YEARS_DISPLAY_CAP)
    } else {
        BILLION_YEARS_DISPLAY_CAP
    };
    format!("{billions:.0} billion years")
}

fn unit(value: f64, name: &str) -> String {
    let n = value.round();
    if n == 1.0 {
        format!("1 {name}")
    } else {
        format!("{n:.0} {name}s")
    }
}
