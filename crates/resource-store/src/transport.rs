//! # Transport
//!
//! The seam between the store and the network. The store only ever speaks
//! [`ApiRequest`] / [`ApiResponse`]; [`HttpTransport`] turns those into real
//! HTTP calls and [`MockTransport`](crate::mock::MockTransport) answers them
//! from a script in tests.

use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Media type of plain JSON:API documents.
pub const JSON_API: &str = "application/vnd.api+json";

/// Media type of the atomic operations extension.
pub const JSON_API_ATOMIC: &str = r#"application/vnd.api+json;ext="https://jsonapi.org/ext/atomic""#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A backend request, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            headers: vec![("Accept".into(), JSON_API.into())],
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A backend response. `body` is `None` for empty bodies (e.g. 204).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can carry an [`ApiRequest`] to the backend.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = format!("{}/{}", self.base_url, request.path.trim_start_matches('/'));
        debug!(method = ?request.method, %url, "Sending request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        // Non-2xx bodies may be plain text or HTML; only the status matters then.
        let body = if bytes.is_empty() {
            None
        } else if (200..300).contains(&status) {
            Some(
                serde_json::from_slice(&bytes)
                    .map_err(|e| TransportError::Body(e.to_string()))?,
            )
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(body) => Some(body),
                Err(e) => {
                    debug!(status, error = %e, "Dropping non-JSON error body");
                    None
                }
            }
        };

        debug!(status, "Received response");
        Ok(ApiResponse { status, body })
    }
}
