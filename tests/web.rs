#![cfg(target_arch = "wasm32")]

use gpx_sketch_wasm::{analyze_gpx, analyze_gpx_bytes, analyze_gpx_string, gpx_to_geojson};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

const RIDE: &str = r#"<gpx><trk><name>Ride</name><trkseg>
  <trkpt lat="0" lon="0"><time>2025-01-01T00:00:00Z</time></trkpt>
  <trkpt lat="0" lon="1"><time>2025-01-01T00:01:00Z</time></trkpt>
</trkseg></trk></gpx>"#;

#[wasm_bindgen_test]
fn analyze_returns_object() {
    let value = analyze_gpx(RIDE, JsValue::UNDEFINED).unwrap();
    assert!(value.is_object());
}

#[wasm_bindgen_test]
fn analyze_string_is_json() {
    let json = analyze_gpx_string(RIDE, JsValue::NULL).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["name"], "Ride");
    assert_eq!(parsed["statistics"]["durationSeconds"], 60.0);
}

#[wasm_bindgen_test]
fn analyze_bytes_rejects_invalid_utf8() {
    let bytes = js_sys::Uint8Array::from(&[0xff, 0xfe, 0x00][..]);
    let err = analyze_gpx_bytes(&bytes, JsValue::UNDEFINED).unwrap_err();
    assert_eq!(err.as_string().as_deref(), Some("track data is not valid UTF-8"));
}

#[wasm_bindgen_test]
fn empty_track_is_reported() {
    let err = gpx_to_geojson("<gpx/>", JsValue::UNDEFINED).unwrap_err();
    assert_eq!(err.as_string().as_deref(), Some("no track points found"));
}
