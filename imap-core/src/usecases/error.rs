use crate::{
    entities::{MapPointParseError, SeverityOutOfRange, TimestampParseError},
    repositories,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("An image is required")]
    MissingImage,
    #[error("Severity out of range")]
    Severity,
    #[error("Invalid position")]
    InvalidPosition,
    #[error("Invalid radius '{0}'")]
    InvalidRadius(String),
    #[error("The current location is not available, please enter it manually")]
    MissingCurrentLocation,
    #[error("Invalid timestamp")]
    InvalidTimestamp,
    #[error("Empty comment")]
    EmptyComment,
    #[error("Unknown sort order '{0}'")]
    SortOrder(String),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

impl From<SeverityOutOfRange> for Error {
    fn from(_: SeverityOutOfRange) -> Self {
        Self::Severity
    }
}

impl From<MapPointParseError> for Error {
    fn from(_: MapPointParseError) -> Self {
        Self::InvalidPosition
    }
}

impl From<TimestampParseError> for Error {
    fn from(_: TimestampParseError) -> Self {
        Self::InvalidTimestamp
    }
}
