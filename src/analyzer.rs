//! The parse → aggregate → project pipeline.
//!
//! Text comes in through a [`TrackSource`] and results leave through a
//! [`ResultSink`]; nothing here touches storage or the DOM.

use log::debug;
use serde::Serialize;

use crate::error::TrackError;
use crate::format::{format_distance, format_duration, format_speed, format_start_time};
use crate::geo::GeoBounds;
use crate::gpx_types::ParsedTrack;
use crate::options::AnalyzeOptions;
use crate::parser::parse_gpx;
use crate::projection::{ProjectedPoint, extent, project};
use crate::stats::{TrackStatistics, compute_statistics};

type Result<T> = std::result::Result<T, TrackError>;

/// Result handed to the rendering layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackAnalysis {
    pub name: Option<String>,
    /// `None` when the track has fewer than two points.
    pub statistics: Option<TrackStatistics>,
    pub labels: Option<TrackLabels>,
    pub points: Vec<ProjectedPoint>,
    pub width: f64,
    pub height: f64,
    pub bounds: Option<GeoBounds>,
    pub skipped_points: usize,
}

/// Display strings for the statistics panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackLabels {
    pub distance: String,
    pub elevation_gain: String,
    pub duration: String,
    pub average_speed: String,
    pub start_time: String,
}

/// Supplies raw GPX text.
pub trait TrackSource {
    fn load_track_text(&self) -> Result<String>;
}

/// Receives the outcome of a successful analysis.
pub trait ResultSink {
    fn save_result(
        &mut self,
        statistics: Option<&TrackStatistics>,
        points: &[ProjectedPoint],
    ) -> Result<()>;
}

impl TrackSource for String {
    fn load_track_text(&self) -> Result<String> {
        Ok(self.clone())
    }
}

impl TrackSource for &str {
    fn load_track_text(&self) -> Result<String> {
        Ok((*self).to_string())
    }
}

/// One saved analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub statistics: Option<TrackStatistics>,
    pub points: Vec<ProjectedPoint>,
}

/// In-memory record of past analyses, newest last.
#[derive(Debug, Default)]
pub struct TrackHistory {
    entries: Vec<HistoryEntry>,
}

impl TrackHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }
}

impl ResultSink for TrackHistory {
    fn save_result(
        &mut self,
        statistics: Option<&TrackStatistics>,
        points: &[ProjectedPoint],
    ) -> Result<()> {
        self.entries.push(HistoryEntry {
            statistics: statistics.copied(),
            points: points.to_vec(),
        });
        Ok(())
    }
}

/// Parse GPX text and analyze it.
pub fn analyze(xml: &str, opts: &AnalyzeOptions) -> Result<TrackAnalysis> {
    let track = parse_gpx(xml, opts.coordinate_policy)?;
    analyze_track(&track, opts)
}

/// Aggregate and project an already parsed track.
pub fn analyze_track(track: &ParsedTrack, opts: &AnalyzeOptions) -> Result<TrackAnalysis> {
    if track.points.is_empty() {
        return Err(TrackError::NoTrackPoints);
    }

    // Embedded totals replace computed fields but never create statistics
    // for a track that has fewer than two points.
    let statistics = compute_statistics(&track.points).map(|s| {
        if opts.use_embedded_summary {
            s.with_summary(&track.summary)
        } else {
            s
        }
    });

    if opts.use_embedded_summary && track.summary.is_empty() {
        debug!("no embedded totals found, using computed statistics");
    }

    let points = project(&track.points, opts.effective_target_span());
    let (width, height) = extent(&points);
    let labels = statistics.map(|s| build_labels(&s, track.start_time.as_deref(), opts));

    debug!(
        "analyzed {} points, statistics {}",
        points.len(),
        if statistics.is_some() { "available" } else { "unavailable" }
    );

    Ok(TrackAnalysis {
        name: track.name.clone(),
        statistics,
        labels,
        points,
        width,
        height,
        bounds: GeoBounds::from_points(&track.points),
        skipped_points: track.skipped_points,
    })
}

/// Load from `source`, analyze, and hand the result to `sink`.
///
/// Nothing is saved when loading or analysis fails.
pub fn run<S, K>(source: &S, sink: &mut K, opts: &AnalyzeOptions) -> Result<TrackAnalysis>
where
    S: TrackSource + ?Sized,
    K: ResultSink + ?Sized,
{
    let text = source.load_track_text()?;
    let analysis = analyze(&text, opts)?;
    sink.save_result(analysis.statistics.as_ref(), &analysis.points)?;
    Ok(analysis)
}

fn build_labels(
    stats: &TrackStatistics,
    start_time: Option<&str>,
    opts: &AnalyzeOptions,
) -> TrackLabels {
    TrackLabels {
        distance: format_distance(stats.distance_meters),
        elevation_gain: format_distance(stats.elevation_gain_meters),
        duration: format_duration(stats.duration_seconds, opts.duration_style),
        average_speed: format_speed(stats.distance_meters, stats.duration_seconds, opts.speed_unit),
        start_time: start_time.map(format_start_time).unwrap_or_default(),
    }
}
