//! # Store Messages
//!
//! This module defines the message types exchanged between the
//! [`StoreClient`](crate::StoreClient) and the [`StoreActor`](crate::StoreActor).

use crate::document::{Document, ResourceKey};
use crate::error::StoreError;
use crate::record::ResourceRecord;
use serde_json::Value;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// A reference from one record to another, with whether the target is cached.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedRef {
    pub key: ResourceKey,
    pub loaded: bool,
}

/// Resolved relationship linkage.
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    One(Option<RelatedRef>),
    Many(Vec<RelatedRef>),
}

/// Requests processed by the store actor.
///
/// Reads never perform I/O. `Push` is the only mutation, and one `Push`
/// merges one whole document, so readers never observe half a merge.
#[derive(Debug)]
pub enum StoreRequest {
    Get {
        key: ResourceKey,
        respond_to: Response<Option<ResourceRecord>>,
    },
    Attribute {
        key: ResourceKey,
        name: &'static str,
        respond_to: Response<Option<Value>>,
    },
    Related {
        key: ResourceKey,
        name: &'static str,
        respond_to: Response<Option<Related>>,
    },
    FirstBy {
        kind: &'static str,
        attribute: String,
        value: Value,
        respond_to: Response<Option<ResourceKey>>,
    },
    Push {
        document: Document,
        respond_to: Response<Vec<ResourceKey>>,
    },
    IsLoaded {
        key: ResourceKey,
        paths: Vec<String>,
        respond_to: Response<bool>,
    },
    Len {
        kind: Option<String>,
        respond_to: Response<usize>,
    },
}
