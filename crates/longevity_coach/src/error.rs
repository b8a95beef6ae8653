//! Custom error types for the coach service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Coach service errors.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("API error: {0}")]
    Api(#[from] fitbit_client::FitbitError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<String> for CoachError {
    fn from(err: String) -> Self {
        CoachError::Internal(err)
    }
}

impl CoachError {
    fn status(&self) -> StatusCode {
        match self {
            CoachError::Validation(_) => StatusCode::BAD_REQUEST,
            CoachError::NotFound(_) => StatusCode::NOT_FOUND,
            CoachError::Api(fitbit_client::FitbitError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            CoachError::Api(_) => StatusCode::BAD_GATEWAY,
            CoachError::Serialization(_) | CoachError::Storage(_) | CoachError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for CoachError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}

/// Result type alias for coach operations.
pub type CoachResult<T> = Result<T, CoachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = CoachError::Validation("missing name".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_failures_map_to_bad_gateway() {
        let err = CoachError::Api(fitbit_client::FitbitError::Api {
            status: 503,
            body: "down".into(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn upstream_invalid_input_stays_client_side() {
        let err = CoachError::Api(fitbit_client::FitbitError::InvalidInput("date".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
