//! # Store Client
//!
//! The cloneable handle through which everything else talks to the store:
//! cache reads, payload merges, remote `find` and atomic writes.

use crate::atomic::{AtomicRequest, AtomicResponse};
use crate::document::{Document, ResourceKey};
use crate::error::StoreError;
use crate::message::{Related, StoreRequest};
use crate::model::{ModelView, Resource};
use crate::query::Query;
use crate::record::ResourceRecord;
use crate::transport::{ApiRequest, Transport, JSON_API_ATOMIC};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Header carrying the admin token on writes.
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// A type-safe client for interacting with the [`StoreActor`](crate::StoreActor).
///
/// * **Cloneable** – holds a sender and a shared transport, so cloning is cheap.
/// * **Cache reads never hit the network** – only [`find`](Self::find) and
///   [`submit_atomic`](Self::submit_atomic) use the transport.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient").finish_non_exhaustive()
    }
}

impl StoreClient {
    pub(crate) fn new(sender: mpsc::Sender<StoreRequest>, transport: Arc<dyn Transport>) -> Self {
        Self { sender, transport }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, StoreError>>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    pub async fn get(&self, key: ResourceKey) -> Result<Option<ResourceRecord>, StoreError> {
        self.request(|respond_to| StoreRequest::Get { key, respond_to })
            .await
    }

    /// Typed view of a cached record, or `None` if it was never loaded.
    pub async fn peek<M: Resource>(&self, id: impl Into<String>) -> Result<Option<M>, StoreError> {
        let key = ResourceKey::new(M::TYPE, id);
        let found = self.get(key.clone()).await?.is_some();
        Ok(found.then(|| self.model(key)))
    }

    pub(crate) async fn attribute(
        &self,
        key: ResourceKey,
        name: &'static str,
    ) -> Result<Option<Value>, StoreError> {
        self.request(|respond_to| StoreRequest::Attribute {
            key,
            name,
            respond_to,
        })
        .await
    }

    pub(crate) async fn related(
        &self,
        key: ResourceKey,
        name: &'static str,
    ) -> Result<Option<Related>, StoreError> {
        self.request(|respond_to| StoreRequest::Related {
            key,
            name,
            respond_to,
        })
        .await
    }

    pub(crate) fn model<M: Resource>(&self, key: ResourceKey) -> M {
        M::from_view(ModelView::new(self.clone(), key))
    }

    /// First cached record of `M::TYPE` whose `attribute` equals `value`.
    ///
    /// Pure cache read: never triggers a fetch.
    pub async fn get_first_by<M: Resource>(
        &self,
        attribute: &str,
        value: impl Into<Value>,
    ) -> Result<Option<M>, StoreError> {
        let attribute = attribute.to_string();
        let value = value.into();
        let key = self
            .request(|respond_to| StoreRequest::FirstBy {
                kind: M::TYPE,
                attribute,
                value,
                respond_to,
            })
            .await?;
        Ok(key.map(|key| self.model(key)))
    }

    /// Merges a document into the cache without a network round trip.
    ///
    /// Returns the keys of the document's primary resources.
    pub async fn push_payload(&self, document: Document) -> Result<Vec<ResourceKey>, StoreError> {
        self.request(|respond_to| StoreRequest::Push {
            document,
            respond_to,
        })
        .await
    }

    /// True when `key` is cached and every dotted relationship path resolves
    /// to cached records at every level.
    pub async fn is_loaded(
        &self,
        key: ResourceKey,
        paths: &[String],
    ) -> Result<bool, StoreError> {
        let paths = paths.to_vec();
        self.request(|respond_to| StoreRequest::IsLoaded {
            key,
            paths,
            respond_to,
        })
        .await
    }

    /// Number of cached records.
    pub async fn len(&self) -> Result<usize, StoreError> {
        self.request(|respond_to| StoreRequest::Len {
            kind: None,
            respond_to,
        })
        .await
    }

    /// Number of cached records of one type.
    pub async fn len_of(&self, kind: &str) -> Result<usize, StoreError> {
        let kind = Some(kind.to_string());
        self.request(|respond_to| StoreRequest::Len { kind, respond_to })
            .await
    }

    /// Remote read of `M::TYPE`. The whole compound document is merged and
    /// the primary resources are returned in document order.
    ///
    /// # Cancellation
    /// If `cancel` fires before the response arrives, or before it is merged,
    /// the call returns [`StoreError::Aborted`] and the cache is untouched.
    #[instrument(skip(self, query, cancel), fields(kind = M::TYPE))]
    pub async fn find<M: Resource>(
        &self,
        query: &Query,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<M>, StoreError> {
        debug!(?query, "find called");
        let request = ApiRequest::get(M::TYPE).with_query(query.to_pairs());

        let response = match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => {
                    debug!("Aborted in flight");
                    return Err(StoreError::Aborted);
                }
                response = self.transport.send(request) => response?,
            },
            None => self.transport.send(request).await?,
        };

        if !response.is_success() {
            warn!(status = response.status, "find failed");
            return Err(StoreError::Status(response.status));
        }
        let body = response.body.ok_or(StoreError::EmptyResponse)?;
        let document: Document = serde_json::from_value(body)?;

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            debug!("Aborted before merge");
            return Err(StoreError::Aborted);
        }

        let keys = self.push_payload(document).await?;
        info!(found = keys.len(), "find ok");
        Ok(keys.into_iter().map(|key| self.model(key)).collect())
    }

    /// Sends an atomic operations request and folds the results into the cache.
    ///
    /// Nothing is merged unless the server answers 2xx. A 204 (or any empty
    /// body) merges nothing. Returns the keys that were merged.
    #[instrument(skip(self, request, auth_token), fields(operations = request.operations.len()))]
    pub async fn submit_atomic(
        &self,
        request: &AtomicRequest,
        auth_token: &str,
    ) -> Result<Vec<ResourceKey>, StoreError> {
        debug!(?request, "submit_atomic called");
        let api_request = ApiRequest::post("operations", serde_json::to_value(request)?)
            .with_header("Content-Type", JSON_API_ATOMIC)
            .with_header("Accept", JSON_API_ATOMIC)
            .with_header(AUTH_HEADER, auth_token);

        let response = self.transport.send(api_request).await?;
        if !response.is_success() {
            warn!(status = response.status, "submit_atomic rejected");
            return Err(StoreError::Status(response.status));
        }

        let body = match response.body {
            Some(body) if response.status != 204 => body,
            _ => {
                info!("Saved without results");
                return Ok(Vec::new());
            }
        };

        let results: AtomicResponse = serde_json::from_value(body)?;
        let keys = self.push_payload(results.into_document()).await?;
        info!(merged = keys.len(), "Saved");
        Ok(keys)
    }
}
