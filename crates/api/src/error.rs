//! Rendering of application errors as JSON responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::error;

use swiftreg_core::registry::RegistryError;
use swiftreg_shared::AppError;

/// Error returned by handlers.
///
/// Body shape: `{"error": <code>, "message": <text>}`, plus `fields` for
/// validation failures. Server errors are logged and never leak details.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// A 404 with the given message.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::BadRequest(format!(
            "Invalid JSON body: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if status.is_server_error() {
            error!(error = %self.0, "Request failed");
            "An error occurred".to_string()
        } else {
            self.0.to_string()
        };

        let mut body = json!({
            "error": self.0.error_code(),
            "message": message,
        });
        let fields = self.0.fields();
        if !fields.is_empty() {
            body["fields"] = Value::from(fields.to_vec());
        }

        (status, Json(body)).into_response()
    }
}
