//! # Store Errors
//!
//! This module defines the error types shared by the store actor, the store
//! client and the transport layer. Keeping them in one place means every
//! caller pattern-matches on the same taxonomy.

/// Errors raised while talking to the backend over HTTP.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Invalid response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Request(e.to_string())
    }
}

/// Errors that can occur within the store itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
    /// The request was cancelled in favour of a newer one.
    #[error("Request aborted")]
    Aborted,
    #[error("Server responded with status {0}")]
    Status(u16),
    #[error("Server responded without a document")]
    EmptyResponse,
    #[error("Invalid document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Attribute `{name}` has an unexpected type: {source}")]
    Attribute {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl StoreError {
    /// True when the error only means "superseded"; such errors are never shown to users.
    pub fn is_aborted(&self) -> bool {
        matches!(self, StoreError::Aborted)
    }
}
