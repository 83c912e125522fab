//! Backend client error types.

use thiserror::Error;

/// Errors from backend session calls.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Transport failure (DNS, TLS, connection reset, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a status we do not treat as success
    #[error("Backend returned {status} ({body_summary})")]
    Status { status: u16, body_summary: String },

    /// The response body was malformed or incomplete
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The configured base URL is unusable
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;
