//! Error types for the humor interpreter.

use thiserror::Error;

/// Failure of the remote generation call. Always carries the underlying message so it can be
/// shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed ({status}): {body}")]
    Auth { status: u16, body: String },

    #[error("generation API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Malformed(err.to_string())
        } else {
            ServiceError::Network(err.to_string())
        }
    }
}

/// Errors surfaced by one form submission. None of them is fatal; re-submitting recovers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    #[error("no API credential available")]
    MissingCredential,

    #[error("word must not be empty")]
    EmptyWord,

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Result type alias for interpreter operations
pub type InterpretResult<T> = Result<T, InterpretError>;
