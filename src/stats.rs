use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;
use serde::Serialize;

use crate::geo::haversine_distance;
use crate::gpx_types::{TrackPoint, TrackSummary};

/// Scalar summary of a track. Raw `f64` values, no rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackStatistics {
    pub distance_meters: f64,
    pub elevation_gain_meters: f64,
    pub duration_seconds: f64,
    pub average_speed_meters_per_second: f64,
}

impl TrackStatistics {
    fn new(distance_meters: f64, elevation_gain_meters: f64, duration_seconds: f64) -> Self {
        Self {
            distance_meters,
            elevation_gain_meters,
            duration_seconds,
            average_speed_meters_per_second: average_speed(distance_meters, duration_seconds),
        }
    }

    /// Replace fields with the producer's embedded totals where present.
    pub fn with_summary(self, summary: &TrackSummary) -> Self {
        Self::new(
            summary.total_distance_m.unwrap_or(self.distance_meters),
            summary.cumulative_climb_m.unwrap_or(self.elevation_gain_meters),
            summary.total_time_secs.unwrap_or(self.duration_seconds),
        )
    }
}

/// Aggregate distance, climb, duration and speed over consecutive points.
///
/// Returns `None` for fewer than two points.
pub fn compute_statistics(points: &[TrackPoint]) -> Option<TrackStatistics> {
    if points.len() < 2 {
        return None;
    }

    let distance: f64 = points
        .windows(2)
        .map(|w| haversine_distance((w[0].lat, w[0].lon), (w[1].lat, w[1].lon)))
        .sum();

    let mut gain = 0.0;
    let mut prev_ele: Option<f64> = None;
    for ele in points.iter().filter_map(|p| p.ele) {
        if let Some(prev) = prev_ele {
            let delta = ele - prev;
            if delta > 0.0 {
                gain += delta;
            }
        }
        prev_ele = Some(ele);
    }

    let mut unparsed = 0usize;
    let times: Vec<DateTime<Utc>> = points
        .iter()
        .filter_map(|p| p.time.as_deref())
        .filter_map(|t| {
            let parsed = parse_timestamp(t);
            if parsed.is_none() {
                unparsed += 1;
            }
            parsed
        })
        .collect();
    if unparsed > 0 {
        warn!("ignored {unparsed} unparseable track point timestamps");
    }

    let duration = match (times.first(), times.last()) {
        (Some(first), Some(last)) if times.len() >= 2 => {
            (*last - *first).num_milliseconds() as f64 / 1000.0
        }
        _ => 0.0,
    };

    Some(TrackStatistics::new(distance, gain, duration))
}

fn average_speed(distance: f64, duration: f64) -> f64 {
    if duration > 0.0 { distance / duration } else { 0.0 }
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
