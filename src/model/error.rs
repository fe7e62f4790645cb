//! Reading validation errors

use thiserror::Error;

/// Why a backend payload could not be accepted as a [`Reading`](super::Reading)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Payload is not a JSON object
    #[error("Reading is not a JSON object")]
    NotAnObject,

    /// A required field is absent, null or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A required field has the wrong JSON type
    #[error("Field {field} must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    /// Timestamp does not parse to an instant
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Any other shape problem (bad optional field, undecodable body)
    #[error("Malformed reading: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::Malformed(err.to_string())
    }
}
