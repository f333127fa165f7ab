use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Missing attribute '{attribute}' on <trkpt>")]
    MissingCoordinate { attribute: &'static str },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <trkpt>")]
    InvalidCoordinate {
        attribute: &'static str,
        value: String,
    },

    #[error("no track points found")]
    NoTrackPoints,

    #[error("track data is not valid UTF-8")]
    InvalidEncoding,

    #[error("failed to load track: {0}")]
    Source(String),

    #[error("failed to save result: {0}")]
    Sink(String),
}

impl TrackError {
    /// True for conditions caused by the uploaded file rather than the host.
    pub fn is_user_input(&self) -> bool {
        !matches!(self, Self::Source(_) | Self::Sink(_))
    }
}

impl From<TrackError> for JsValue {
    fn from(e: TrackError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
