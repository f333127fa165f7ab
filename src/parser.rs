use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::error::TrackError;
use crate::gpx_types::*;
use crate::options::CoordinatePolicy;

type Result<T> = std::result::Result<T, TrackError>;

/// Parse a GPX XML string into a flat, file-ordered list of track points.
///
/// Every `<trkpt>` in the document is collected regardless of which
/// `<trk>`/`<trkseg>` holds it. Route points and waypoints are ignored.
/// An empty result is not an error here; see [`crate::analyzer::analyze`].
pub fn parse_gpx(xml: &str, policy: CoordinatePolicy) -> Result<ParsedTrack> {
    let mut reader = Reader::from_str(xml);
    let mut track = ParsedTrack::default();
    let mut track_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trk" => track_depth += 1,
                b"trkpt" => {
                    let coords = parse_coordinates(&e, policy)?;
                    let fields = read_point_fields(&e, &mut reader)?;
                    push_point(&mut track, coords, fields);
                }
                b"name" if track_depth > 0 && track.name.is_none() => {
                    let name = element_text(&mut reader, &e)?;
                    let name = name.trim();
                    if !name.is_empty() {
                        track.name = Some(name.to_string());
                    }
                }
                b"time" => {
                    let time = element_text(&mut reader, &e)?;
                    if track.start_time.is_none() {
                        track.start_time = non_empty(time);
                    }
                }
                // The first occurrence of each total wins.
                b"totalTime" if track.summary.total_time_secs.is_none() => {
                    let text = element_text(&mut reader, &e)?;
                    track.summary.total_time_secs = parse_number(&text);
                }
                b"totalDistance" if track.summary.total_distance_m.is_none() => {
                    let text = element_text(&mut reader, &e)?;
                    track.summary.total_distance_m = parse_number(&text);
                }
                b"cumulativeClimb" if track.summary.cumulative_climb_m.is_none() => {
                    let text = element_text(&mut reader, &e)?;
                    track.summary.cumulative_climb_m = parse_number(&text);
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"trkpt" {
                    let coords = parse_coordinates(&e, policy)?;
                    push_point(&mut track, coords, PointFields::default());
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"trk" {
                    track_depth = track_depth.saturating_sub(1);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TrackError::XmlParse(e)),
            _ => {}
        }
    }

    if track.skipped_points > 0 {
        warn!(
            "skipped {} track points with missing or malformed coordinates",
            track.skipped_points
        );
    }
    debug!("parsed {} track points", track.points.len());

    Ok(track)
}

/// Optional children of a `<trkpt>`.
#[derive(Debug, Default)]
struct PointFields {
    ele: Option<f64>,
    time: Option<String>,
}

/// A skipped point's `<time>` still counts toward the start time.
fn push_point(track: &mut ParsedTrack, coords: Option<(f64, f64)>, fields: PointFields) {
    if track.start_time.is_none() {
        track.start_time = fields.time.clone();
    }
    match coords {
        Some((lat, lon)) => track.points.push(TrackPoint {
            lat,
            lon,
            ele: fields.ele,
            time: fields.time,
        }),
        None => track.skipped_points += 1,
    }
}

/// Read lat/lon from a `<trkpt>` start tag, applying `policy` to bad values.
///
/// Returns `Ok(None)` when the point should be skipped.
fn parse_coordinates(e: &BytesStart<'_>, policy: CoordinatePolicy) -> Result<Option<(f64, f64)>> {
    let mut lat: Option<String> = None;
    let mut lon: Option<String> = None;

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| TrackError::XmlParse(e.into()))?;
        let val = std::str::from_utf8(&attr.value).unwrap_or_default();
        match attr.key.local_name().as_ref() {
            b"lat" => lat = Some(val.to_string()),
            b"lon" => lon = Some(val.to_string()),
            _ => {}
        }
    }

    let lat = resolve_axis("lat", lat, 90.0, policy)?;
    let lon = resolve_axis("lon", lon, 180.0, policy)?;

    Ok(lat.zip(lon))
}

fn resolve_axis(
    attribute: &'static str,
    raw: Option<String>,
    limit: f64,
    policy: CoordinatePolicy,
) -> Result<Option<f64>> {
    let Some(raw) = raw else {
        return match policy {
            CoordinatePolicy::Skip => Ok(None),
            CoordinatePolicy::Reject => Err(TrackError::MissingCoordinate { attribute }),
            CoordinatePolicy::ZeroFill => Ok(Some(0.0)),
        };
    };

    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= limit => Ok(Some(v)),
        _ => match policy {
            CoordinatePolicy::Skip => Ok(None),
            CoordinatePolicy::Reject => Err(TrackError::InvalidCoordinate {
                attribute,
                value: raw,
            }),
            CoordinatePolicy::ZeroFill => Ok(Some(0.0)),
        },
    }
}

/// Read the children of a `<trkpt>` up to its end tag.
/// Called after receiving Event::Start for the point element.
fn read_point_fields<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<PointFields> {
    let mut fields = PointFields::default();
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => fields.ele = parse_number(&element_text(reader, &e)?),
                b"time" => fields.time = non_empty(element_text(reader, &e)?),
                _ => {
                    // extensions, hr, cadence, ...
                    reader
                        .read_to_end(e.name())
                        .map_err(TrackError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(TrackError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(fields)
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Concatenated text of a leaf element, with CDATA kept verbatim and
/// character and predefined entity references resolved.
fn element_text<'a>(reader: &mut Reader<&'a [u8]>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        let event = reader.read_event().map_err(TrackError::XmlParse)?;
        match event {
            Event::Text(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(e) => match e.resolve_char_ref() {
                Ok(Some(ch)) => text.push(ch),
                _ => {
                    let name = String::from_utf8_lossy(&e);
                    if let Some(resolved) = resolve_predefined_entity(&name) {
                        text.push_str(resolved);
                    }
                }
            },
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
