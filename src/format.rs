//! Human-readable labels for track statistics.

use crate::options::{DurationStyle, SpeedUnit};
use crate::stats::parse_timestamp;

/// `"12.35 km"` at or above one kilometer, `"850 m"` below.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round())
    }
}

pub fn format_duration(total_seconds: f64, style: DurationStyle) -> String {
    let secs = if total_seconds.is_finite() && total_seconds >= 0.0 {
        total_seconds as u64
    } else {
        0
    };
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;

    match style {
        DurationStyle::Clock => format!("{hours:02}:{minutes:02}"),
        DurationStyle::Verbose => format!("{hours}h {minutes}m"),
    }
}

/// Average speed with unit suffix, or `"0"` when there is no elapsed time.
pub fn format_speed(meters: f64, seconds: f64, unit: SpeedUnit) -> String {
    if seconds.is_nan() || seconds <= 0.0 {
        return "0".to_string();
    }
    let mps = meters / seconds;
    match unit {
        SpeedUnit::Ms => format!("{mps:.2} m/s"),
        SpeedUnit::Kmh => format!("{:.2} km/h", mps * 3.6),
    }
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, or an empty string for unparseable input.
///
/// Always UTC, never the host's local zone, so output is the same in every runtime.
pub fn format_start_time(iso: &str) -> String {
    parse_timestamp(iso)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
