use std::fmt;

use thiserror::Error;
use ::time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

/// A point in time with millisecond precision, always in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(OffsetDateTime);

#[derive(Debug, Error)]
#[error("Invalid timestamp: {0}")]
pub struct TimestampParseError(#[from] ::time::error::Parse);

impl Timestamp {
    pub fn now() -> Self {
        Self::truncated(OffsetDateTime::now_utc())
    }

    pub fn from_millis(millis: i64) -> Option<Self> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
            .ok()
            .map(Self)
    }

    pub fn as_millis(self) -> i64 {
        (self.0.unix_timestamp_nanos() / 1_000_000) as i64
    }

    pub fn as_secs(self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Parse an ISO 8601 / RFC 3339 date time, e.g. `2025-10-08T08:30:00Z`.
    ///
    /// The offset is normalized to UTC and sub-millisecond digits are dropped.
    pub fn parse_rfc3339(s: &str) -> Result<Self, TimestampParseError> {
        let parsed = OffsetDateTime::parse(s.trim(), &Rfc3339)?;
        Ok(Self::truncated(parsed.to_offset(UtcOffset::UTC)))
    }

    /// Parse an EXIF date time like `2025:10:08 08:30:00` as UTC.
    pub fn parse_exif(s: &str) -> Option<Self> {
        let s = s.trim().replace('-', ":");
        let format = format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");
        PrimitiveDateTime::parse(&s, format)
            .ok()
            .map(|dt| Self::truncated(dt.assume_utc()))
    }

    pub fn to_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.as_secs().to_string())
    }

    fn truncated(dt: OffsetDateTime) -> Self {
        let millis = dt.nanosecond() / 1_000_000;
        Self(dt.replace_nanosecond(millis * 1_000_000).unwrap_or(dt))
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(from: OffsetDateTime) -> Self {
        Self::truncated(from.to_offset(UtcOffset::UTC))
    }
}

impl From<Timestamp> for OffsetDateTime {
    fn from(from: Timestamp) -> Self {
        from.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(&self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_from_into_millis() {
        let t1 = Timestamp::now();
        let t2 = Timestamp::from_millis(t1.as_millis()).unwrap();
        assert_eq!(t1, t2);
    }

    #[test]
    fn parse_with_offset_normalizes_to_utc() {
        let a = Timestamp::parse_rfc3339("2025-10-08T08:30:00Z").unwrap();
        let b = Timestamp::parse_rfc3339("2025-10-08T16:30:00+08:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_rfc3339(), "2025-10-08T08:30:00Z");
    }

    #[test]
    fn reject_malformed_input() {
        assert!(Timestamp::parse_rfc3339("yesterday").is_err());
        assert!(Timestamp::parse_rfc3339("2025-10-08").is_err());
    }

    #[test]
    fn parse_exif_date_time() {
        let expected = Timestamp::parse_rfc3339("2025-10-08T08:30:00Z").unwrap();
        assert_eq!(Timestamp::parse_exif("2025:10:08 08:30:00"), Some(expected));
        assert_eq!(Timestamp::parse_exif(" 2025-10-08 08:30:00 "), Some(expected));
        assert_eq!(Timestamp::parse_exif("08.10.2025"), None);
    }

    #[test]
    fn chronological_order() {
        let older = Timestamp::parse_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let newer = Timestamp::parse_rfc3339("2024-01-01T00:00:01Z").unwrap();
        assert!(older < newer);
    }
}
