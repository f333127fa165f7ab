use serde::Deserialize;

pub const DEFAULT_TARGET_SPAN: f64 = 100.0;

/// Options for analyzing a GPX track.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOptions {
    /// Canvas span of the longer geographic axis (default: 100)
    #[serde(default = "default_target_span")]
    pub target_span: f64,

    /// What to do with a point whose lat/lon is missing or malformed (default: skip)
    #[serde(default)]
    pub coordinate_policy: CoordinatePolicy,

    /// Prefer totalTime/totalDistance/cumulativeClimb embedded in the file (default: false)
    #[serde(default)]
    pub use_embedded_summary: bool,

    /// Unit for the average speed label (default: km/h)
    #[serde(default)]
    pub speed_unit: SpeedUnit,

    /// Style for the duration label (default: clock)
    #[serde(default)]
    pub duration_style: DurationStyle,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            target_span: DEFAULT_TARGET_SPAN,
            coordinate_policy: CoordinatePolicy::default(),
            use_embedded_summary: false,
            speed_unit: SpeedUnit::default(),
            duration_style: DurationStyle::default(),
        }
    }
}

impl AnalyzeOptions {
    /// Target span, falling back to the default for non-positive or non-finite input.
    pub fn effective_target_span(&self) -> f64 {
        if self.target_span.is_finite() && self.target_span > 0.0 {
            self.target_span
        } else {
            DEFAULT_TARGET_SPAN
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoordinatePolicy {
    /// Drop the point and count it.
    #[default]
    Skip,
    /// Fail the whole document.
    Reject,
    /// Substitute 0.0 for the bad axis.
    ZeroFill,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    Ms,
    #[default]
    Kmh,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationStyle {
    #[default]
    Clock,
    Verbose,
}

fn default_target_span() -> f64 {
    DEFAULT_TARGET_SPAN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let opts: AnalyzeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.target_span, DEFAULT_TARGET_SPAN);
        assert_eq!(opts.coordinate_policy, CoordinatePolicy::Skip);
        assert!(!opts.use_embedded_summary);
        assert_eq!(opts.speed_unit, SpeedUnit::Kmh);
        assert_eq!(opts.duration_style, DurationStyle::Clock);
    }

    #[test]
    fn test_camel_case_fields() {
        let opts: AnalyzeOptions = serde_json::from_str(
            r#"{"targetSpan": 500, "coordinatePolicy": "zeroFill",
                "useEmbeddedSummary": true, "speedUnit": "ms", "durationStyle": "verbose"}"#,
        )
        .unwrap();
        assert_eq!(opts.target_span, 500.0);
        assert_eq!(opts.coordinate_policy, CoordinatePolicy::ZeroFill);
        assert!(opts.use_embedded_summary);
        assert_eq!(opts.speed_unit, SpeedUnit::Ms);
        assert_eq!(opts.duration_style, DurationStyle::Verbose);
    }

    #[test]
    fn test_effective_target_span() {
        let mut opts = AnalyzeOptions::default();
        opts.target_span = 0.0;
        assert_eq!(opts.effective_target_span(), DEFAULT_TARGET_SPAN);
        opts.target_span = f64::NAN;
        assert_eq!(opts.effective_target_span(), DEFAULT_TARGET_SPAN);
        opts.target_span = 250.0;
        assert_eq!(opts.effective_target_span(), 250.0);
    }
}
