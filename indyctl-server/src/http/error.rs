//! API error type with IntoResponse
//!
//! Errors render as `{"error": "..."}` with the matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (400)
    BadRequest { message: String },

    /// Store or schedule not found (404)
    NotFound { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn no_such_store() -> Self {
        Self::NotFound {
            message: "No such store!".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            Self::NotFound { message } => {
                tracing::debug!("not found: {}", message);
                (StatusCode::NOT_FOUND, message)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
