/// One recorded GPS sample (<trkpt>).
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
    /// ISO-8601 timestamp as written in the file.
    pub time: Option<String>,
}

impl TrackPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            time: None,
        }
    }

    pub fn with_ele(mut self, ele: f64) -> Self {
        self.ele = Some(ele);
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }
}

/// Pre-computed totals some producers embed next to the track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSummary {
    pub total_time_secs: Option<f64>,
    pub total_distance_m: Option<f64>,
    pub cumulative_climb_m: Option<f64>,
}

impl TrackSummary {
    pub fn is_empty(&self) -> bool {
        self.total_time_secs.is_none()
            && self.total_distance_m.is_none()
            && self.cumulative_climb_m.is_none()
    }
}

/// Everything the parser extracts from one GPX document.
#[derive(Debug, Default)]
pub struct ParsedTrack {
    pub name: Option<String>,
    pub points: Vec<TrackPoint>,
    pub summary: TrackSummary,
    /// First <time> element in document order.
    pub start_time: Option<String>,
    /// Points dropped for malformed coordinates.
    pub skipped_points: usize,
}
