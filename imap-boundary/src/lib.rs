use serde::{Deserialize, Serialize};

#[cfg(feature = "entity-conversions")]
mod conv;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Copy, PartialEq))]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// A report as shown in the proximity feed.
#[rustfmt::skip]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(PartialEq))]
pub struct FeedItem {
    pub id            : String,
    pub distance_km   : Option<f64>,
    pub category      : String,
    pub severity      : Option<u8>,
    pub caption       : Option<String>,
    pub taken_at      : Option<String>,
    pub reported_at   : String,
    pub lat           : f64,
    pub lng           : f64,
    pub thumbnail_ref : String,
}

/// The payload of a single map marker.
#[rustfmt::skip]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(PartialEq))]
pub struct MarkerPayload {
    pub id             : String,
    pub category       : String,
    pub severity       : Option<u8>,
    pub caption        : Option<String>,
    pub lat            : f64,
    pub lng            : f64,
    pub taken_at       : Option<String>,
    pub reported_at    : String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub img_large      : Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub img_thumb      : Option<String>,
    pub category_color : String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(PartialEq))]
pub struct NearbyReport {
    #[serde(flatten)]
    pub marker: MarkerPayload,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Copy, PartialEq))]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(PartialEq))]
pub struct GradientStop {
    pub stop: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(PartialEq))]
pub struct HeatLayer {
    pub points: Vec<HeatPoint>,
    pub gradient: Vec<GradientStop>,
    pub min_opacity: f64,
    pub radius: u32,
    pub blur: u32,
    pub max_zoom: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(PartialEq))]
pub struct MapPayload {
    pub markers: Vec<MarkerPayload>,
    pub heat: HeatLayer,
    pub show_markers: bool,
    pub show_heat: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(PartialEq, Eq))]
pub struct Comment {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub author: Option<String>,
    pub text: String,
    /// Unix timestamp in milliseconds
    pub created_at: i64,
    pub likes: u32,
    pub liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(PartialEq))]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LocationSource {
    /// Decimal degrees as entered by the user.
    Manual { lat: String, lng: String },
    /// The device location, if available.
    Current {
        lat: Option<f64>,
        lng: Option<f64>,
    },
}

#[rustfmt::skip]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub image_full    : Option<String>,
    pub image_thumb   : Option<String>,
    pub caption       : Option<String>,
    pub category      : Option<String>,
    pub severity      : i64,
    /// RFC 3339, current time if missing or blank.
    pub taken_at      : Option<String>,
    /// Extracted from the image metadata, e.g. `2025:10:08 08:30:00`.
    pub exif_taken_at : Option<String>,
    pub location      : LocationSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(PartialEq, Eq))]
pub struct ReportCreated {
    pub id: String,
    pub reported_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(PartialEq, Eq))]
pub struct CategoryInfo {
    pub name: String,
    pub marker_color: String,
    pub hex_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(thiserror::Error))]
#[cfg_attr(feature = "extra-derive", error("{message}"))]
pub struct Error {
    pub http_status: u16,
    pub message: String,
}
