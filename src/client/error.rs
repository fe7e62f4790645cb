//! Data client error types

use thiserror::Error;

use crate::model::ValidationError;

/// Errors that can occur when talking to the weather-station backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Backend answered with a non-2xx status
    #[error("{message}: {status} {status_text}")]
    Request {
        status: u16,
        status_text: String,
        message: &'static str,
    },

    /// Connection, timeout or body transfer failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered 2xx with an explicit `error` field
    #[error("Backend error: {0}")]
    Backend(String),

    /// Body is not the expected shape
    #[error("Invalid data received from backend: {0}")]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// Whether the failure happened at the HTTP/transport level
    pub fn is_request_level(&self) -> bool {
        matches!(self, ClientError::Request { .. } | ClientError::Transport(_))
    }

    /// HTTP status for `Request` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for data client operations
pub type ClientResult<T> = Result<T, ClientError>;
