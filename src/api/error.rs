use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::QueryRejection;
use serde::{Deserialize, Serialize};
use snafu::{Location, Snafu};

use crate::model::{now, Timestamp};
use crate::service::stats::StatsError;
use crate::Located;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum ApiError {
    #[snafu(transparent)]
    Stats { source: StatsError },

    /// the request body is not a JSON hit
    #[snafu(display("malformed request body: {source}"))]
    MalformedBody {
        source: JsonRejection,
        #[snafu(implicit)]
        location: Location,
    },

    /// the query string does not fit the expected parameters
    #[snafu(display("malformed query string: {source}"))]
    MalformedQuery {
        source: QueryRejection,
        #[snafu(implicit)]
        location: Location,
    },
}

impl Located for ApiError {
    fn location(&self) -> Location {
        match self {
            ApiError::Stats { source } => match source {
                StatsError::StorageUnavailable { source, .. } => source.location(),
                other => other.location(),
            },
            ApiError::MalformedBody { location, .. }
            | ApiError::MalformedQuery { location, .. } => *location,
        }
    }
}

/// JSON body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// upper snake case status name, e.g. `BAD_REQUEST`
    pub status: String,
    pub reason: String,
    pub message: String,
    pub timestamp: Timestamp,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Stats { source } => match source {
                StatsError::InvalidInput { .. }
                | StatsError::InvalidTimeFormat { .. }
                | StatsError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
                StatsError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::MalformedBody { .. } | ApiError::MalformedQuery { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            ApiError::Stats { source } => match source {
                StatsError::InvalidInput { .. } => "Incorrectly made request.",
                StatsError::InvalidTimeFormat { .. } => "Incorrectly formatted date-time.",
                StatsError::InvalidRange { .. } => "Start of the range is after its end.",
                StatsError::StorageUnavailable { .. } => "Statistics storage is unavailable.",
            },
            ApiError::MalformedBody { .. } | ApiError::MalformedQuery { .. } => {
                "Incorrectly made request."
            }
        }
    }
}

/// `400 Bad Request` becomes `BAD_REQUEST`.
fn status_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(|reason| reason.to_uppercase().replace([' ', '-'], "_"))
        .unwrap_or_else(|| status.as_str().to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, location = %self.location(), "request failed");
        } else {
            tracing::warn!(error = %self, "rejected request");
        }

        let body = ErrorBody {
            status: status_name(status),
            reason: self.reason().to_string(),
            message: self.to_string(),
            timestamp: now(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_are_upper_snake_case() {
        assert_eq!(status_name(StatusCode::BAD_REQUEST), "BAD_REQUEST");
        assert_eq!(
            status_name(StatusCode::SERVICE_UNAVAILABLE),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            status_name(StatusCode::NON_AUTHORITATIVE_INFORMATION),
            "NON_AUTHORITATIVE_INFORMATION"
        );
    }
}
