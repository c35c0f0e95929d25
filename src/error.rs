//! Client Errors
//!
//! Failures of a round-trip against the board server.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a response (fetch rejected, offline, CORS).
    #[error("network error: {0}")]
    Transport(String),

    #[error("server responded with HTTP {status}")]
    Status { status: u16 },

    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The server answered `success: false`.
    #[error("{}", .0.as_deref().unwrap_or("request rejected"))]
    Rejected(Option<String>),

    /// Input rejected before any request was sent.
    #[error("{0}")]
    Invalid(String),
}

impl ApiError {
    /// Server-provided text, if the failure carried any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(msg) => msg.as_deref(),
            ApiError::Invalid(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
