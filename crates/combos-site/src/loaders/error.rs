//! Error types for page loaders.

use thiserror::Error;

/// Why a page could not reach the loaded state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadError {
    /// The backend answered, but nothing matched the uuid.
    #[error("Not found")]
    NotFound,

    /// The record arrived without part of the declared relationship closure.
    #[error("Incomplete response: related data is missing")]
    Incomplete,

    /// The request failed or the server rejected it.
    #[error("Request failed: {0}")]
    Failed(String),
}
