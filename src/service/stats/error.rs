use snafu::{IntoError as _, Location, Snafu};

use crate::database::{DatabaseError, HitStoreError};
use crate::model::{InvalidHit, ParseTimestamp, Timestamp};
use crate::Located;

pub type Result<T, E = StatsError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StatsError {
    /// a required ingestion field was absent
    #[snafu(display("invalid hit: field `{field}` is required"))]
    InvalidInput {
        field: &'static str,
        #[snafu(implicit)]
        location: Location,
    },

    /// a date-time was not in the `yyyy-MM-dd HH:mm:ss` layout
    #[snafu(display("invalid time: {source}"))]
    InvalidTimeFormat {
        source: ParseTimestamp,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("invalid range: start {start} is after end {end}"))]
    InvalidRange {
        start: Timestamp,
        end: Timestamp,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("storage unavailable: {source}"))]
    StorageUnavailable {
        source: DatabaseError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl Located for StatsError {
    fn location(&self) -> Location {
        match self {
            StatsError::InvalidInput { location, .. }
            | StatsError::InvalidTimeFormat { location, .. }
            | StatsError::InvalidRange { location, .. }
            | StatsError::StorageUnavailable { location, .. } => *location,
        }
    }
}

impl From<InvalidHit> for StatsError {
    #[track_caller]
    fn from(err: InvalidHit) -> Self {
        match err {
            InvalidHit::MissingField { field } => InvalidInputSnafu { field }.build(),
            InvalidHit::MalformedTimestamp { source } => InvalidTimeFormatSnafu.into_error(source),
        }
    }
}

impl From<HitStoreError> for StatsError {
    fn from(err: HitStoreError) -> Self {
        match err {
            HitStoreError::InvalidRange {
                start,
                end,
                location,
            } => StatsError::InvalidRange {
                start,
                end,
                location,
            },
            HitStoreError::StorageUnavailable { source, location } => {
                StatsError::StorageUnavailable { source, location }
            }
        }
    }
}
