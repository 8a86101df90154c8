use axum::http::StatusCode;
use tracing::error;

/// What the user sees when a save does not reach storage.
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save entries";

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

    /// Logs the underlying cause and keeps the response generic.
    pub fn save_failed(err: impl std::fmt::Display) -> Self {
        error!("failed to save entries: {err}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: SAVE_FAILED_MESSAGE.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
