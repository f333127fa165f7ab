use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue, json};

use crate::geo::GeoBounds;
use crate::gpx_types::*;
use crate::stats::TrackStatistics;

/// Convert a parsed track to a GeoJSON FeatureCollection for the map view.
///
/// A track with two or more points becomes one LineString Feature; a single
/// point becomes a Point Feature; an empty track yields no features.
pub fn to_feature_collection(
    track: &ParsedTrack,
    statistics: Option<&TrackStatistics>,
) -> FeatureCollection {
    let bounds = GeoBounds::from_points(&track.points);

    let geometry = match track.points.as_slice() {
        [] => None,
        [pt] => Some(Geometry::new(Value::Point(point_coords(pt)))),
        points => Some(Geometry::new(Value::LineString(
            points.iter().map(point_coords).collect(),
        ))),
    };

    let features = match geometry {
        Some(geometry) => vec![Feature {
            bbox: bounds.map(|b| b.to_bbox()),
            geometry: Some(geometry),
            id: None,
            properties: Some(build_props(track, statistics)),
            foreign_members: None,
        }],
        None => Vec::new(),
    };

    FeatureCollection {
        bbox: bounds.map(|b| b.to_bbox()),
        features,
        foreign_members: None,
    }
}

fn build_props(
    track: &ParsedTrack,
    statistics: Option<&TrackStatistics>,
) -> Map<String, JsonValue> {
    let mut props = Map::new();
    props.insert(
        "gpxType".to_string(),
        JsonValue::String("track".to_string()),
    );

    if let Some(ref name) = track.name {
        props.insert("name".to_string(), JsonValue::String(name.clone()));
    }

    if let Some(stats) = statistics {
        insert_number(&mut props, "distanceMeters", stats.distance_meters);
        insert_number(&mut props, "elevationGainMeters", stats.elevation_gain_meters);
        insert_number(&mut props, "durationSeconds", stats.duration_seconds);
        insert_number(
            &mut props,
            "averageSpeedMetersPerSecond",
            stats.average_speed_meters_per_second,
        );
    }

    insert_coordinate_times(&mut props, &track.points);
    props
}

/// Build [lon, lat] or [lon, lat, ele] coordinate array.
fn point_coords(pt: &TrackPoint) -> Vec<f64> {
    match pt.ele {
        Some(ele) => vec![pt.lon, pt.lat, ele],
        None => vec![pt.lon, pt.lat],
    }
}

fn insert_number(props: &mut Map<String, JsonValue>, key: &str, value: f64) {
    if let Some(n) = serde_json::Number::from_f64(value) {
        props.insert(key.to_string(), JsonValue::Number(n));
    }
}

/// `coordinateProperties.times`, parallel to the coordinates; omitted when
/// no point carries a timestamp.
fn insert_coordinate_times(props: &mut Map<String, JsonValue>, points: &[TrackPoint]) {
    if points.iter().all(|pt| pt.time.is_none()) {
        return;
    }
    let times: Vec<Option<&str>> = points.iter().map(|pt| pt.time.as_deref()).collect();
    props.insert(
        "coordinateProperties".to_string(),
        json!({ "times": times }),
    );
}
