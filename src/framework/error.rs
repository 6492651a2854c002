//! # Framework Errors
//!
//! Failures of the cache actor plumbing itself, as opposed to failures of the
//! requests it runs (those are [`ApiError`](crate::http::ApiError) values
//! stored in the cache entry).

use crate::http::ApiError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Cache actor closed")]
    ActorClosed,
    #[error("Cache actor dropped response channel")]
    ActorDropped,
    #[error("No cache entry for key: {0}")]
    UnknownKey(String),
    #[error("Invalid request key: {0}")]
    InvalidKey(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<serde_json::Error> for FrameworkError {
    fn from(e: serde_json::Error) -> Self {
        FrameworkError::InvalidKey(e.to_string())
    }
}
