//! # Mock Framework
//!
//! Utilities for testing endpoints, forms and the cache without a server.
//!
//! [`MockTransport`] answers requests from a queue of expectations, records
//! every request it receives, and can hold a response back behind a [`Gate`]
//! so a test can observe the cache while a fetch is still in flight.
//!
//! # Example
//! ```ignore
//! let mock = Arc::new(MockTransport::new());
//! mock.expect_get("/v1/supplier/all_supplier").return_ok(json!({ "data": [] }));
//!
//! let system = InventorySystem::new(mock.clone(), 16);
//! // Use the system in tests...
//! mock.verify(); // Ensures all expectations were met
//! ```

use crate::http::{ApiError, ApiRequest, Method, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// One queued response, matched against the next request in order.
struct Expectation {
    method: Method,
    path: String,
    response: Result<Value, ApiError>,
    gate: Option<Gate>,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    requests: Vec<ApiRequest>,
    mismatches: Vec<String>,
}

/// Holds a mocked response until the test calls [`Gate::release`].
#[derive(Clone)]
pub struct Gate {
    permits: Arc<Semaphore>,
}

impl Gate {
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(0)),
        }
    }

    /// Lets one held response through.
    pub fn release(&self) {
        self.permits.add_permits(1);
    }

    async fn wait(&self) {
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`Transport`] that replays scripted responses.
///
/// Unexpected or mismatched requests are answered with
/// [`ApiError::Transport`] and reported by [`verify`](Self::verify), so a bad
/// request inside a spawned fetch never hangs the test.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `GET` of `path`.
    pub fn expect_get(&self, path: &str) -> ExpectationBuilder {
        self.expect(Method::Get, path)
    }

    /// Expects a `POST` to `path`.
    pub fn expect_post(&self, path: &str) -> ExpectationBuilder {
        self.expect(Method::Post, path)
    }

    fn expect(&self, method: Method, path: &str) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.to_string(),
            gate: None,
            state: self.state.clone(),
        }
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of requests received for `method` + `path`.
    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.mismatches.is_empty() {
            panic!("Unexpected requests: {:?}", state.mismatches);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let expectation = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request.clone());
            match state.expectations.pop_front() {
                Some(exp) if exp.method == request.method && exp.path == request.path => Some(exp),
                Some(exp) => {
                    let msg = format!(
                        "expected {:?} {}, got {:?} {}",
                        exp.method, exp.path, request.method, request.path
                    );
                    state.mismatches.push(msg);
                    None
                }
                None => {
                    let msg = format!("no expectation for {:?} {}", request.method, request.path);
                    state.mismatches.push(msg);
                    None
                }
            }
        }; // Release lock before awaiting the gate

        let Some(exp) = expectation else {
            return Err(ApiError::Transport("unexpected request".to_string()));
        };
        if let Some(gate) = &exp.gate {
            gate.wait().await;
        }
        exp.response
    }
}

/// Builder returned by [`MockTransport::expect_get`] / [`MockTransport::expect_post`].
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    gate: Option<Gate>,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    /// Holds the response until `gate` is released.
    pub fn held(mut self, gate: &Gate) -> Self {
        self.gate = Some(gate.clone());
        self
    }

    /// Sets the expectation to return a successful payload.
    pub fn return_ok(self, value: Value) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Value, ApiError>) {
        let mut state = self.state.lock().unwrap();
        state.expectations.push_back(Expectation {
            method: self.method,
            path: self.path,
            response,
            gate: self.gate,
        });
    }
}
