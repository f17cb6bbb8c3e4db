use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum MockError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            MockError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            MockError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            MockError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            MockError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        debug!("mock backend answering {}: {}", status, message);

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
