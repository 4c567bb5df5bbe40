use axum::Json;
use axum::http::StatusCode;
use serde_json::json;

/// Error returned by HTTP handlers for requests the stores never see, such
/// as payloads that fail validation. Store-level failures are reported
/// through the notification feed instead and never become HTTP errors.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
