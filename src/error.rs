use reqwest::StatusCode;
use thiserror::Error;

use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected response payload: {0}")]
    UnexpectedPayload(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Coarse failure classes, mirroring how callers react to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Client,
    Server,
    Decode,
    Local,
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(e) if e.is_decode() => ErrorKind::Decode,
            ApiError::Transport(_) => ErrorKind::Network,
            ApiError::Status { status, .. } if status.is_server_error() => ErrorKind::Server,
            ApiError::Status { .. } => ErrorKind::Client,
            ApiError::Decode(_) | ApiError::UnexpectedPayload(_) => ErrorKind::Decode,
            ApiError::Session(_) | ApiError::Io(_) | ApiError::Config(_) => ErrorKind::Local,
        }
    }
}
