use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inputbot_automation::AutomationError;
use std::fmt::Display;

/// A failed request, rendered as
/// `{"success": false, "message": ..., "error": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    error: String,
}

impl ApiError {
    /// The request could not be parsed or failed validation.
    pub fn bad_request(message: impl Into<String>, error: impl Display) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            error: error.to_string(),
        }
    }

    /// The automation sequence failed.
    pub fn automation(message: impl Into<String>, error: AutomationError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            error: error.to_string(),
        }
    }

    pub fn from_rejection(message: impl Into<String>, rejection: JsonRejection) -> Self {
        Self::bad_request(message, rejection.body_text())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.error, "{}", self.message);
        } else {
            tracing::warn!(status = %self.status, error = %self.error, "{}", self.message);
        }
        (
            self.status,
            Json(serde_json::json!({
                "success": false,
                "message": self.message,
                "error": self.error,
            })),
        )
            .into_response()
    }
}
