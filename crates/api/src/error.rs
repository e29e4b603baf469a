//! Error-to-response mapping for the HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mokai_domain::MokaiError;
use serde_json::json;
use tracing::warn;

/// Domain error carried to the HTTP layer.
///
/// Caller errors become 400, missing resources 404, store failures 503;
/// everything else is a generic 500. The body is always
/// `{"error": "<message>"}`.
pub struct ApiError(MokaiError);

impl ApiError {
    /// Shortcut for boundary-level validation failures.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self(MokaiError::InvalidInput(message.into()))
    }

    fn status(&self) -> StatusCode {
        match self.0 {
            MokaiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            MokaiError::NotFound(_) => StatusCode::NOT_FOUND,
            MokaiError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            MokaiError::Config(_) | MokaiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<MokaiError> for ApiError {
    fn from(err: MokaiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = %status, error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
