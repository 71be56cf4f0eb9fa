//! # Mock Transport & Testing Guide
//!
//! `MockTransport` implements [`Transport`] entirely in memory. It answers
//! requests from a queue of expectations, so store clients, loaders and forms
//! can be tested without a backend.
//!
//! ## When to use the mock vs. a real backend
//!
//! | Feature | MockTransport | HttpTransport |
//! |---------|---------------|---------------|
//! | **Speed** | Instant (in-memory) | Network bound |
//! | **Determinism** | Scripted responses | Depends on server data |
//! | **Error injection** | Easy (`return_status`, `return_err`) | Hard |
//! | **Use case** | Unit and integration tests | The running site |
//!
//! ## Example
//!
//! ```rust
//! use resource_store::mock::MockTransport;
//! use resource_store::{Query, StoreActor};
//! use serde_json::json;
//!
//! resource_store::resource_model! {
//!     pub struct Modem: "modems" {
//!         attributes { name: String => "name" }
//!         has_one {}
//!         has_many {}
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockTransport::new();
//!     mock.expect_get("modems").return_json(200, json!({
//!         "data": [{ "type": "modems", "id": "5", "attributes": { "name": "X55" } }]
//!     }));
//!
//!     let (actor, store) = StoreActor::new(16, mock.transport());
//!     tokio::spawn(actor.run());
//!
//!     let modems = store.find::<Modem>(&Query::new(), None).await.unwrap();
//!     assert_eq!(modems[0].name().await.unwrap().as_deref(), Some("X55"));
//!
//!     mock.verify();
//! }
//! ```
//!
//! ## Asserting that nothing was sent
//!
//! Every request is recorded. [`MockTransport::requests`] returns the log,
//! which is how tests prove a validation failure never reached the network.

use crate::error::TransportError;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the scripted answer.
struct Expectation {
    method: Method,
    path: String,
    delay: Option<Duration>,
    response: Result<ApiResponse, String>,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    requests: Vec<ApiRequest>,
}

/// A transport with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. A request that does not match the
/// next expectation panics, as does a request when none are left.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mock as a shareable transport for [`StoreActor::new`](crate::StoreActor::new).
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Expects a `GET` on `path`.
    pub fn expect_get(&mut self, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method: Method::Get,
            path: path.into(),
            delay: None,
            state: self.state.clone(),
        }
    }

    /// Expects a `POST` on `path`.
    pub fn expect_post(&mut self, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method: Method::Post,
            path: path.into(),
            delay: None,
            state: self.state.clone(),
        }
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
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
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let expectation = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request.clone());
            state.expectations.pop_front()
        };

        let Some(expectation) = expectation else {
            panic!("Unexpected request: {:?} {}", request.method, request.path);
        };
        if expectation.method != request.method || expectation.path != request.path {
            panic!(
                "Expectation mismatch: expected {:?} {}, got {:?} {}",
                expectation.method, expectation.path, request.method, request.path
            );
        }

        if let Some(delay) = expectation.delay {
            tokio::time::sleep(delay).await;
        }
        expectation.response.map_err(TransportError::Request)
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    delay: Option<Duration>,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    /// Holds the response back for `delay`, leaving the request in flight.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answers with `status` and a JSON body.
    pub fn return_json(self, status: u16, body: Value) {
        self.push(Ok(ApiResponse {
            status,
            body: Some(body),
        }));
    }

    /// Answers with `status` and an empty body.
    pub fn return_status(self, status: u16) {
        self.push(Ok(ApiResponse { status, body: None }));
    }

    /// Fails at the transport level, as if the request never completed.
    pub fn return_err(self, message: impl Into<String>) {
        self.push(Err(message.into()));
    }

    fn push(self, response: Result<ApiResponse, String>) {
        self.state
            .lock()
            .unwrap()
            .expectations
            .push_back(Expectation {
                method: self.method,
                path: self.path,
                delay: self.delay,
                response,
            });
    }
}
