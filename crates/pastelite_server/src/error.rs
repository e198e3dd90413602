//! HTTP error mapping for API handlers.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pastelite_core::AppError;
use serde_json::json;

/// Error returned by handlers, rendered as `{ "error": ... }`.
#[derive(Debug)]
pub enum HttpError {
    /// Domain or storage failure.
    App(AppError),
    /// Request body could not be read or parsed.
    Rejected { status: StatusCode, message: String },
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl From<JsonRejection> for HttpError {
    fn from(value: JsonRejection) -> Self {
        // Oversized bodies keep their 413; every other parse failure is a 400.
        let status = match value.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::Rejected {
            status,
            message: value.body_text(),
        }
    }
}

impl HttpError {
    /// Status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::App(AppError::NotFound) => StatusCode::NOT_FOUND,
            Self::App(AppError::BadRequest(_)) => StatusCode::BAD_REQUEST,
            Self::App(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            // Missing, expired, and exhausted pastes are indistinguishable.
            Self::App(AppError::NotFound) => "Paste not found".to_string(),
            Self::App(AppError::BadRequest(msg)) => msg,
            Self::App(err) => {
                tracing::error!("Internal error: {}", err);
                "Internal server error".to_string()
            }
            Self::Rejected { message, .. } => message,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
