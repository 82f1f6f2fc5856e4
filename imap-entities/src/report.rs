use strum::{EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};
use thiserror::Error;

use crate::{geo::*, id::*, time::*};

/// The fixed set of incident categories.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Category {
    Landslide,
    Flooding,
    RoadBlocked,
    BuildingDamage,
    #[default]
    Other,
}

impl Category {
    /// Unknown or missing names fall back to [`Category::Other`].
    pub fn parse_or_other(name: Option<&str>) -> Self {
        name.map(str::trim)
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Color name understood by common marker icon sets.
    pub const fn marker_color(self) -> &'static str {
        match self {
            Self::Landslide => "red",
            Self::Flooding => "blue",
            Self::RoadBlocked => "orange",
            Self::BuildingDamage => "purple",
            Self::Other => "gray",
        }
    }

    /// Hex color for badges and borders.
    pub const fn hex_color(self) -> &'static str {
        match self {
            Self::Landslide => "#ef4444",
            Self::Flooding => "#3b82f6",
            Self::RoadBlocked => "#f59e0b",
            Self::BuildingDamage => "#8b5cf6",
            Self::Other => "#6b7280",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.write_str(self.as_str())
    }
}

pub type SeverityValue = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Severity(SeverityValue);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Severity {0} is out of range")]
pub struct SeverityOutOfRange(pub i64);

impl Severity {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(5);

    pub const fn value(self) -> SeverityValue {
        self.0
    }
}

impl TryFrom<i64> for Severity {
    type Error = SeverityOutOfRange;

    fn try_from(from: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN.0)..=i64::from(Self::MAX.0)).contains(&from) {
            Ok(Self(from as SeverityValue))
        } else {
            Err(SeverityOutOfRange(from))
        }
    }
}

impl From<Severity> for i64 {
    fn from(from: Severity) -> Self {
        i64::from(from.0)
    }
}

/// Opaque reference to an image owned by the image storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ImageRef {
    fn from(from: String) -> Self {
        Self(from)
    }
}

impl From<&str> for ImageRef {
    fn from(from: &str) -> Self {
        Self(from.to_owned())
    }
}

impl From<ImageRef> for String {
    fn from(from: ImageRef) -> Self {
        from.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRefs {
    pub full: ImageRef,
    pub thumb: ImageRef,
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id          : Id,
    pub caption     : Option<String>,
    pub category    : Category,
    // None if the stored value is missing or out of range.
    pub severity    : Option<Severity>,
    pub pos         : Option<MapPoint>,
    pub taken_at    : Option<Timestamp>,
    pub reported_at : Timestamp,
    pub images      : ImageRefs,
}

impl Report {
    /// The position if it denotes a valid location on the map.
    pub fn valid_pos(&self) -> Option<MapPoint> {
        self.pos.filter(|pos| pos.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parse_category_names() {
        assert_eq!(Category::parse_or_other(Some("flooding")), Category::Flooding);
        assert_eq!(
            Category::parse_or_other(Some(" Road-Blocked ")),
            Category::RoadBlocked
        );
        assert_eq!(Category::parse_or_other(Some("volcano")), Category::Other);
        assert_eq!(Category::parse_or_other(None), Category::Other);
    }

    #[test]
    fn category_names_round_trip() {
        for c in Category::iter() {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
        assert_eq!(Category::BuildingDamage.to_string(), "building-damage");
        assert_eq!(Category::all().count(), 5);
    }

    #[test]
    fn severity_range() {
        assert!(Severity::try_from(0).is_err());
        assert_eq!(Severity::try_from(1), Ok(Severity::MIN));
        assert_eq!(Severity::try_from(5), Ok(Severity::MAX));
        assert_eq!(Severity::try_from(6), Err(SeverityOutOfRange(6)));
        assert_eq!(Severity::try_from(-3), Err(SeverityOutOfRange(-3)));
    }
}
