//! HTTP mapping of engine errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use colloquy_core::ColloquyError;
use serde_json::json;

/// Engine error rendered as `{ok: false, error}`
#[derive(Debug)]
pub struct ApiError(pub ColloquyError);

impl ApiError {
    /// Status code for the wrapped error
    pub fn status(&self) -> StatusCode {
        if self.0.is_input_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<ColloquyError> for ApiError {
    fn from(err: ColloquyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        (status, Json(json!({ "ok": false, "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(ColloquyError::unknown_agent("zed")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(ColloquyError::storage(
                "append",
                io::Error::new(io::ErrorKind::Other, "disk full")
            ))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
