//! Cached state for one [`RequestKey`](super::RequestKey).

use crate::http::ApiError;
use serde_json::Value;
use std::time::SystemTime;

/// Lifecycle status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// State machine instance for one request key.
///
/// Only the [`QueryCache`](super::QueryCache) actor mutates entries. `data` is
/// replaced solely by a successful fetch of the same key, so it survives a
/// re-fetch (`Loading`) and a failed fetch (`Error`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheEntry {
    pub status: QueryStatus,
    pub data: Option<Value>,
    pub error: Option<ApiError>,
    pub last_fetched_at: Option<SystemTime>,
}

impl CacheEntry {
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// `true` once a fetch has landed, whatever its outcome.
    pub fn is_settled(&self) -> bool {
        matches!(self.status, QueryStatus::Success | QueryStatus::Error)
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.status = QueryStatus::Loading;
    }

    pub(crate) fn complete(&mut self, result: Result<Value, ApiError>) {
        match result {
            Ok(data) => {
                self.status = QueryStatus::Success;
                self.data = Some(data);
                self.error = None;
                self.last_fetched_at = Some(SystemTime::now());
            }
            Err(error) => {
                self.status = QueryStatus::Error;
                self.error = Some(error);
            }
        }
    }
}
