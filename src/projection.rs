use serde::Serialize;

use crate::geo::GeoBounds;
use crate::gpx_types::TrackPoint;

/// Lower bound for the longer geographic span, in degrees.
///
/// Keeps the scale finite when every point shares one position.
pub const MIN_SPAN_DEG: f64 = 1e-9;

/// A track point mapped into canvas units; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

/// Map points into canvas space with one uniform scale.
///
/// The longer of the latitude/longitude spans is stretched to `target_span`
/// units, latitude is flipped, and the result is translated so the first
/// point sits at `(0, 0)`. This is an affine mapping, not a cartographic
/// projection.
pub fn project(points: &[TrackPoint], target_span: f64) -> Vec<ProjectedPoint> {
    let Some(bounds) = GeoBounds::from_points(points) else {
        return Vec::new();
    };

    let longest = bounds.lat_span().max(bounds.lon_span()).max(MIN_SPAN_DEG);
    let scale = target_span / longest;

    let to_canvas = |p: &TrackPoint| ProjectedPoint {
        x: (p.lon - bounds.min_lon) * scale,
        y: -(p.lat - bounds.min_lat) * scale,
    };

    let origin = to_canvas(&points[0]);
    points
        .iter()
        .map(|p| {
            let q = to_canvas(p);
            ProjectedPoint {
                x: q.x - origin.x,
                y: q.y - origin.y,
            }
        })
        .collect()
}

/// Width and height of the projected track's bounding box.
pub fn extent(points: &[ProjectedPoint]) -> (f64, f64) {
    let Some(first) = points.first() else {
        return (0.0, 0.0);
    };
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    (max_x - min_x, max_y - min_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty() {
        assert!(project(&[], 100.0).is_empty());
        assert_eq!(extent(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_first_point_anchored_at_origin() {
        let points = vec![
            TrackPoint::new(35.5, 139.5),
            TrackPoint::new(35.0, 139.0),
            TrackPoint::new(36.0, 140.0),
        ];
        let projected = project(&points, 100.0);
        assert_eq!(projected[0], ProjectedPoint { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_count_and_order_preserved() {
        let points: Vec<TrackPoint> = (0..25)
            .map(|i| TrackPoint::new(10.0 + i as f64 * 0.001, 20.0 - i as f64 * 0.002))
            .collect();
        let projected = project(&points, 100.0);
        assert_eq!(projected.len(), points.len());
        // Longitude decreases monotonically, so x must too.
        assert!(projected.windows(2).all(|w| w[1].x < w[0].x));
    }

    #[test]
    fn test_uniform_scale_and_inverted_latitude() {
        let points = vec![
            TrackPoint::new(0.0, 0.0),
            TrackPoint::new(0.0, 2.0),
            TrackPoint::new(1.0, 2.0),
        ];
        let projected = project(&points, 100.0);
        // lon span 2 drives the scale: 50 units per degree on both axes.
        assert!(approx(projected[1].x, 100.0));
        assert!(approx(projected[1].y, 0.0));
        assert!(approx(projected[2].x, 100.0));
        assert!(approx(projected[2].y, -50.0));
        let (w, h) = extent(&projected);
        assert!(approx(w, 100.0));
        assert!(approx(h, 50.0));
    }

    #[test]
    fn test_relative_to_first_point() {
        let points = vec![TrackPoint::new(1.0, 1.0), TrackPoint::new(0.0, 0.0)];
        let projected = project(&points, 10.0);
        assert!(approx(projected[1].x, -10.0));
        assert!(approx(projected[1].y, 10.0));
    }

    #[test]
    fn test_degenerate_spans_stay_finite() {
        let meridian = vec![TrackPoint::new(0.0, 5.0), TrackPoint::new(2.0, 5.0)];
        let projected = project(&meridian, 100.0);
        assert!(approx(projected[1].x, 0.0));
        assert!(approx(projected[1].y, -100.0));

        let stationary = vec![TrackPoint::new(3.0, 3.0); 4];
        let projected = project(&stationary, 100.0);
        assert_eq!(projected.len(), 4);
        assert!(projected.iter().all(|p| p.x == 0.0 && p.y == 0.0));
    }
}
