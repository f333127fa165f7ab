pub mod analyzer;
pub mod converter;
pub mod error;
pub mod format;
pub mod geo;
pub mod gpx_types;
pub mod options;
pub mod parser;
pub mod projection;
pub mod stats;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::analyzer::{TrackAnalysis, analyze, analyze_track};
use crate::error::TrackError;
use crate::options::AnalyzeOptions;

/// Analyze GPX text, returning statistics and canvas points as a JS object.
#[wasm_bindgen(js_name = analyzeGpx)]
pub fn analyze_gpx(gpx_string: &str, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let analysis = analyze(gpx_string, &opts)?;
    to_js(&analysis)
}

/// Analyze GPX text, returning the result as a JSON string.
#[wasm_bindgen(js_name = analyzeGpxString)]
pub fn analyze_gpx_string(gpx_string: &str, options: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let analysis = analyze(gpx_string, &opts)?;
    serde_json::to_string(&analysis).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Analyze raw file bytes, e.g. from `File.arrayBuffer()`.
#[wasm_bindgen(js_name = analyzeGpxBytes)]
pub fn analyze_gpx_bytes(bytes: &js_sys::Uint8Array, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let buf = bytes.to_vec();
    let text = std::str::from_utf8(&buf).map_err(|_| TrackError::InvalidEncoding)?;
    let analysis = analyze(text, &opts)?;
    to_js(&analysis)
}

/// Convert a GPX track to GeoJSON with statistics in its properties.
#[wasm_bindgen(js_name = gpxToGeoJson)]
pub fn gpx_to_geojson(gpx_string: &str, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let track = parser::parse_gpx(gpx_string, opts.coordinate_policy)?;
    let analysis = analyze_track(&track, &opts)?;
    let fc = converter::to_feature_collection(&track, analysis.statistics.as_ref());
    serde_wasm_bindgen::to_value(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js(analysis: &TrackAnalysis) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    analysis
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_options(options: JsValue) -> Result<AnalyzeOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(AnalyzeOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
