//! Spherical geometry helpers.

use serde::Serialize;

use crate::gpx_types::TrackPoint;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two `(lat, lon)` pairs in degrees,
/// using the haversine formula.
pub fn haversine_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = a;
    let (lat2, lon2) = b;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let sin_d_lat = (d_lat / 2.0).sin();
    let sin_d_lon = (d_lon / 2.0).sin();

    let h = sin_d_lat * sin_d_lat
        + lat1.to_radians().cos() * lat2.to_radians().cos() * sin_d_lon * sin_d_lon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Bounds of all points, or `None` for an empty slice.
    pub fn from_points(points: &[TrackPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        Some(points[1..].iter().fold(init, |b, p| Self {
            min_lat: b.min_lat.min(p.lat),
            max_lat: b.max_lat.max(p.lat),
            min_lon: b.min_lon.min(p.lon),
            max_lon: b.max_lon.max(p.lon),
        }))
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// GeoJSON bbox order: `[west, south, east, north]`.
    pub fn to_bbox(&self) -> Vec<f64> {
        vec![self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}
