//! HTTP Client Adapter: the only way requests leave the process.
//!
//! - [`Transport`] - The seam the cache and endpoints call through
//! - [`HttpClient`] - `reqwest`-backed implementation with bearer auth
//! - [`ApiRequest`] / [`RequestBody`] - What to send (JSON or multipart)
//! - [`ApiError`] - Http / Transport / Decode failures, as values
//!
//! Tests swap in [`MockTransport`](crate::framework::mock::MockTransport).

pub mod client;
pub mod error;
pub mod request;

pub use client::HttpClient;
pub use error::ApiError;
pub use request::{ApiRequest, FilePart, Method, MultipartForm, RequestBody};

use async_trait::async_trait;
use serde_json::Value;

/// Sends one request and yields its JSON payload.
///
/// Non-2xx statuses resolve to [`ApiError::Http`]; failures to complete the
/// call at all resolve to [`ApiError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;
}
