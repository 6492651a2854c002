//! Error types for calls against the remote API.

use thiserror::Error;

/// Outcome of a request that did not produce a usable payload.
///
/// Expected HTTP failures are values of this type, never panics. It is
/// `Clone` because a failed query keeps its error inside the cache entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status_code}: {message}")]
    Http { status_code: u16, message: String },

    /// The request never completed (DNS, connect, timeout, reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// A 2xx response whose body is not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request could not be built (e.g. a malformed content type).
    #[error("request could not be encoded: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// `true` for 4xx responses, whose message is meant for the user.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status_code(), Some(400..=499))
    }

    /// Message suitable for a notification. `action` completes the sentence
    /// "An error occurred while ...", e.g. `"adding the supplier"`.
    pub fn user_message(&self, action: &str) -> String {
        match self {
            Self::Http { message, .. } if self.is_client_error() => message.clone(),
            Self::Http { .. } => format!("An error occurred while {action}."),
            Self::Transport(_) | Self::Decode(_) | Self::Encode(_) => {
                "Unexpected error occurred. Please try again.".to_string()
            }
        }
    }
}
