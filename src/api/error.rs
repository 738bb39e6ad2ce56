//! HTTP error responses for the API routes

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::WeatherError;

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl WeatherError {
    /// HTTP status returned to the caller for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            WeatherError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            WeatherError::NotFound { .. } => StatusCode::NOT_FOUND,
            WeatherError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            WeatherError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Forecast request failed: {}", self);
        } else {
            tracing::info!("Forecast request rejected: {}", self);
        }

        (status, Json(ErrorBody::new(self.user_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WeatherError::invalid_input("empty"), StatusCode::BAD_REQUEST)]
    #[case(WeatherError::not_found("Atlantis"), StatusCode::NOT_FOUND)]
    #[case(WeatherError::geocoding("timeout"), StatusCode::BAD_GATEWAY)]
    #[case(WeatherError::forecast("bad json"), StatusCode::BAD_GATEWAY)]
    #[case(WeatherError::config("bad url"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] err: WeatherError, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
        assert_eq!(err.into_response().status(), expected);
    }
}
