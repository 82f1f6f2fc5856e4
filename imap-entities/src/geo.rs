use itertools::Itertools;
use thiserror::Error;

/// Mean radius of the earth as recommended by the IUGG.
pub const MEAN_EARTH_RADIUS_KM: f64 = 6_371.008_8;

const LAT_DEG_MAX: f64 = 90.0;
const LAT_DEG_MIN: f64 = -90.0;
const LNG_DEG_MAX: f64 = 180.0;
const LNG_DEG_MIN: f64 = -180.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapPointParseError {
    #[error("Invalid latitude '{0}'")]
    Latitude(String),
    #[error("Invalid longitude '{0}'")]
    Longitude(String),
    #[error("Failed to parse map point: {0}")]
    Format(String),
}

/// A geographical location in decimal degrees (WGS 84).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapPoint {
    lat: f64,
    lng: f64,
}

impl MapPoint {
    pub fn from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(lat: LAT, lng: LNG) -> Self {
        let (lat, lng) = (lat.into(), lng.into());
        debug_assert!(is_valid_lat(lat));
        debug_assert!(is_valid_lng(lng));
        Self { lat, lng }
    }

    pub fn try_from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(
        lat: LAT,
        lng: LNG,
    ) -> Option<Self> {
        let (lat, lng) = (lat.into(), lng.into());
        if is_valid_lat(lat) && is_valid_lng(lng) {
            Some(Self { lat, lng })
        } else {
            None
        }
    }

    pub const fn lat(self) -> f64 {
        self.lat
    }

    pub const fn lng(self) -> f64 {
        self.lng
    }

    pub fn is_valid(self) -> bool {
        is_valid_lat(self.lat) && is_valid_lng(self.lng)
    }

    pub const fn to_lat_lng_deg(self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    /// Parse a pair of decimal degree strings, e.g. from a form input.
    pub fn parse_lat_lng_deg(lat_deg_str: &str, lng_deg_str: &str) -> Result<Self, MapPointParseError> {
        let lat = lat_deg_str
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|lat| is_valid_lat(*lat))
            .ok_or_else(|| MapPointParseError::Latitude(lat_deg_str.to_owned()))?;
        let lng = lng_deg_str
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|lng| is_valid_lng(*lng))
            .ok_or_else(|| MapPointParseError::Longitude(lng_deg_str.to_owned()))?;
        Ok(Self { lat, lng })
    }

    /// Great-circle distance between two points (haversine formula).
    pub fn distance(p1: MapPoint, p2: MapPoint) -> Distance {
        Distance::from_km(distance_km(p1.lat, p1.lng, p2.lat, p2.lng))
    }
}

fn is_valid_lat(lat: f64) -> bool {
    lat.is_finite() && (LAT_DEG_MIN..=LAT_DEG_MAX).contains(&lat)
}

fn is_valid_lng(lng: f64) -> bool {
    lng.is_finite() && (LNG_DEG_MIN..=LNG_DEG_MAX).contains(&lng)
}

impl std::fmt::Display for MapPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl std::str::FromStr for MapPoint {
    type Err = MapPointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((lat_deg_str, lng_deg_str)) = s.split(',').collect_tuple() {
            MapPoint::parse_lat_lng_deg(lat_deg_str, lng_deg_str)
        } else {
            Err(MapPointParseError::Format(s.to_owned()))
        }
    }
}

/// Distance on the surface of the earth in kilometers.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
    pub const fn infinite() -> Self {
        Self(f64::INFINITY)
    }

    pub const fn from_km(km: f64) -> Self {
        Self(km)
    }

    pub const fn to_km(self) -> f64 {
        self.0
    }

    pub fn to_meters(self) -> f64 {
        self.0 * 1_000.0
    }

    pub fn is_valid(self) -> bool {
        self.0 >= 0.0
    }
}

/// Calculate the great-circle distance in kilometers between two
/// coordinates given in decimal degrees.
///
/// The result is symmetric in its arguments and exactly zero for
/// identical coordinates. Callers must pass finite values.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lng2 - lng1).to_radians();
    let dphi_sin = (dphi / 2.0).sin();
    let dlambda_sin = (dlambda / 2.0).sin();
    let a = dphi_sin * dphi_sin + phi1.cos() * phi2.cos() * dlambda_sin * dlambda_sin;
    MEAN_EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}
