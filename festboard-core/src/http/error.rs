//! API error type

use reqwest::StatusCode;
use serde::Deserialize;

/// Error body shape returned by the API
///
/// ```json
/// { "message": "Human readable detail" }
/// ```
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Failure of a call through [`crate::http::ApiClient`]
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The API rejected the session (401). The session has already been cleared.
    #[error("unauthorized: {}", .message.as_deref().unwrap_or("session rejected"))]
    Unauthorized { message: Option<String> },

    /// Any other non-success status
    #[error("request failed with status {status}: {}", detail(.status, .message))]
    Status { status: StatusCode, message: Option<String> },

    /// Connection failure, timeout, or other transport problem
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message } | ApiError::Status { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_timeout())
    }
}

fn detail<'a>(status: &StatusCode, message: &'a Option<String>) -> &'a str {
    match message {
        Some(message) => message,
        None => status.canonical_reason().unwrap_or("unknown"),
    }
}

/// Pull the `message` field out of an error body
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}
