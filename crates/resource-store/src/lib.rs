//! # Resource Store
//!
//! A client-side cache for JSON:API resources. It keeps one record per
//! `(type, id)` for the lifetime of a session, merges every compound
//! document it sees, and exposes typed, lazily resolved views over the
//! cached data.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Runtime Layer** ([`StoreActor`]) - owns the records and processes
//!    requests sequentially, so a merge is atomic with respect to readers
//! 2. **Interface Layer** ([`StoreClient`]) - cache reads, `find`, payload
//!    merges and atomic writes over a [`Transport`]
//! 3. **Model Layer** ([`Resource`], [`Attribute`], [`HasOne`], [`HasMany`]) -
//!    typed views declared with [`resource_model!`]
//!
//! ## Data Flow
//!
//! ```text
//! find::<M>(query, cancel) ──► Transport (GET /type?filter[..]&include=..)
//!                                  │
//!                     compound document (data + included)
//!                                  │
//!                 StoreActor::Push (one message, one merge)
//!                                  │
//!            Vec<M> views ◄── keys of the primary resources
//! ```
//!
//! Writes go the other way: an [`AtomicRequest`] is posted to `/operations`
//! and the `atomic:results` are merged back with a single push.
//!
//! ## Cancellation
//!
//! [`StoreClient::find`] takes an optional `CancellationToken`. A cancelled
//! find returns [`StoreError::Aborted`] and never touches the cache, even if
//! the response arrives afterwards.
//!
//! ## Testing
//!
//! See the [`mock`] module for [`MockTransport`](mock::MockTransport), a
//! scripted transport with expectation tracking.

pub mod actor;
pub mod atomic;
pub mod client;
pub mod document;
pub mod error;
pub mod message;
pub mod mock;
pub mod model;
pub mod query;
pub mod record;
pub mod tracing;
pub mod transport;

#[doc(hidden)]
pub use paste;

// Re-export core types for convenience
pub use actor::StoreActor;
pub use atomic::{AtomicRequest, AtomicResponse, AtomicResult, OpKind, Operation, OperationData};
pub use client::{StoreClient, AUTH_HEADER};
pub use document::{Document, Linkage, PrimaryData, Relationship, ResourceKey, ResourceObject};
pub use error::{StoreError, TransportError};
pub use message::{Related, RelatedRef, StoreRequest};
pub use model::{Attribute, HasMany, HasOne, ModelView, Resource};
pub use query::Query;
pub use record::ResourceRecord;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
