//! # Page Loaders
//!
//! A page needs one record (picked by uuid) plus a closure of related
//! records. [`PageLoader`] owns that contract for one page instance:
//!
//! ```text
//! Idle ──ensure/load──► Loading ──► Loaded
//!                          │   └──► Failed (NotFound | Incomplete | Failed)
//!                          └──────► (superseded: no visible transition)
//! ```
//!
//! - At most one request is live per loader. Starting a new one cancels the
//!   previous token first, and a generation counter stops a stale request
//!   from publishing even if it slips past the token.
//! - A record counts as loaded only when every include path resolves at
//!   every level (see [`StoreClient::is_loaded`]).
//! - After a failure, [`PageLoader::ensure`] does not refetch the same uuid;
//!   the user retries explicitly through [`PageLoader::load`].
//!
//! State changes are published on a `tokio::sync::watch` channel so a view
//! can re-render on every transition.

pub mod error;

pub use error::*;

use resource_store::{Query, Resource, ResourceKey, StoreClient};
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Attribute used to address records from URLs.
pub const UUID_ATTRIBUTE: &str = "uuid";

/// What a page currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { uuid: String },
    Loaded { uuid: String, key: ResourceKey },
    Failed { uuid: String, error: LoadError },
}

/// Result of one `ensure` / `load` call.
#[derive(Debug, Clone)]
pub enum LoadOutcome<M> {
    Loaded(M),
    Failed(LoadError),
    /// A newer request for the same loader replaced this one.
    Superseded,
}

impl<M> LoadOutcome<M> {
    pub fn loaded(self) -> Option<M> {
        match self {
            LoadOutcome::Loaded(model) => Some(model),
            _ => None,
        }
    }
}

#[derive(Default)]
struct InFlight {
    generation: u64,
    token: Option<CancellationToken>,
}

/// Loads one `M` by uuid together with its relationship closure.
pub struct PageLoader<M: Resource> {
    name: &'static str,
    store: StoreClient,
    includes: Vec<String>,
    state: watch::Sender<LoadState>,
    inflight: Mutex<InFlight>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Resource> PageLoader<M> {
    /// `includes` is sent as the `include` parameter and doubles as the
    /// completeness closure.
    pub fn new<I, S>(name: &'static str, store: StoreClient, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            name,
            store,
            includes: includes.into_iter().map(Into::into).collect(),
            state,
            inflight: Mutex::new(InFlight::default()),
            _marker: PhantomData,
        }
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    /// The loaded model, if the current state is `Loaded`.
    pub async fn current(&self) -> Option<M> {
        let LoadState::Loaded { key, .. } = self.state() else {
            return None;
        };
        self.store.peek::<M>(key.id).await.ok().flatten()
    }

    /// Shows `uuid`, fetching only when the cache cannot satisfy the page.
    ///
    /// A uuid whose last load failed is not fetched again.
    #[instrument(skip(self), fields(loader = self.name))]
    pub async fn ensure(&self, uuid: &str) -> LoadOutcome<M> {
        if let LoadState::Failed { uuid: failed, error } = self.state() {
            if failed == uuid {
                debug!(%error, "Not retrying failed uuid");
                return LoadOutcome::Failed(error);
            }
        }

        match self.cached(uuid).await {
            Some(model) => {
                let (generation, _) = self.begin();
                debug!("Satisfied from cache");
                self.finish(generation, uuid, Ok(model))
            }
            None => self.load(uuid).await,
        }
    }

    /// Fetches `uuid` unconditionally, superseding any request in flight.
    #[instrument(skip(self), fields(loader = self.name))]
    pub async fn load(&self, uuid: &str) -> LoadOutcome<M> {
        let (generation, token) = self.begin();
        self.publish(
            generation,
            LoadState::Loading {
                uuid: uuid.to_string(),
            },
        );
        info!("Loading");

        let query = Query::new()
            .filter(UUID_ATTRIBUTE, uuid)
            .limit(1)
            .include(self.includes.iter().cloned());
        let result = self.store.find::<M>(&query, Some(&token)).await;

        if token.is_cancelled() {
            debug!("Superseded");
            return LoadOutcome::Superseded;
        }

        let outcome = match result {
            Err(e) if e.is_aborted() => return LoadOutcome::Superseded,
            Err(e) => Err(LoadError::Failed(e.to_string())),
            Ok(found) => match found.into_iter().next() {
                None => Err(LoadError::NotFound),
                Some(model) => match self.store.is_loaded(model.key().clone(), &self.includes).await
                {
                    Ok(true) => Ok(model),
                    Ok(false) => Err(LoadError::Incomplete),
                    Err(e) => Err(LoadError::Failed(e.to_string())),
                },
            },
        };

        self.finish(generation, uuid, outcome)
    }

    /// Cancels whatever is in flight and returns to `Idle`.
    pub fn reset(&self) {
        let (generation, _) = self.begin();
        let mut inflight = self.lock();
        if inflight.generation == generation {
            inflight.token = None;
            self.state.send_replace(LoadState::Idle);
        }
    }

    async fn cached(&self, uuid: &str) -> Option<M> {
        let model = self
            .store
            .get_first_by::<M>(UUID_ATTRIBUTE, uuid)
            .await
            .ok()
            .flatten()?;
        let complete = self
            .store
            .is_loaded(model.key().clone(), &self.includes)
            .await
            .unwrap_or(false);
        complete.then_some(model)
    }

    fn lock(&self) -> MutexGuard<'_, InFlight> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancels the previous request and opens a new generation.
    fn begin(&self) -> (u64, CancellationToken) {
        let mut inflight = self.lock();
        if let Some(previous) = inflight.token.take() {
            debug!(generation = inflight.generation, "Cancelling previous request");
            previous.cancel();
        }
        inflight.generation += 1;
        let token = CancellationToken::new();
        inflight.token = Some(token.clone());
        (inflight.generation, token)
    }

    fn publish(&self, generation: u64, state: LoadState) -> bool {
        let inflight = self.lock();
        if inflight.generation != generation {
            return false;
        }
        self.state.send_replace(state);
        true
    }

    fn finish(&self, generation: u64, uuid: &str, outcome: Result<M, LoadError>) -> LoadOutcome<M> {
        let state = match &outcome {
            Ok(model) => LoadState::Loaded {
                uuid: uuid.to_string(),
                key: model.key().clone(),
            },
            Err(error) => LoadState::Failed {
                uuid: uuid.to_string(),
                error: error.clone(),
            },
        };

        {
            let mut inflight = self.lock();
            if inflight.generation != generation {
                return LoadOutcome::Superseded;
            }
            inflight.token = None;
            self.state.send_replace(state);
        }

        match outcome {
            Ok(model) => {
                info!(id = model.id(), "Loaded");
                LoadOutcome::Loaded(model)
            }
            Err(error) => {
                warn!(%error, "Load failed");
                LoadOutcome::Failed(error)
            }
        }
    }
}

impl<M: Resource> Drop for PageLoader<M> {
    fn drop(&mut self) {
        if let Some(token) = self.lock().token.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Modem;
    use resource_store::mock::MockTransport;
    use resource_store::StoreActor;
    use serde_json::json;

    fn modem_document(id: &str, uuid: &str, name: &str) -> serde_json::Value {
        json!({
            "data": [{ "type": "modems", "id": id, "attributes": { "uuid": uuid, "name": name } }]
        })
    }

    fn start(mock: &MockTransport) -> StoreClient {
        let (actor, store) = StoreActor::new(32, mock.transport());
        tokio::spawn(actor.run());
        store
    }

    #[tokio::test]
    async fn load_publishes_loading_then_loaded() {
        let mut mock = MockTransport::new();
        mock.expect_get("modems")
            .return_json(200, modem_document("5", "m-5", "X55"));
        let loader = PageLoader::<Modem>::new("modem", start(&mock), Vec::<String>::new());
        let mut states = loader.subscribe();

        let outcome = loader.load("m-5").await;

        let modem = outcome.loaded().expect("modem should load");
        assert_eq!(modem.name().await.unwrap().as_deref(), Some("X55"));
        assert!(states.has_changed().unwrap());
        assert!(matches!(&*states.borrow_and_update(), LoadState::Loaded { uuid, .. } if uuid == "m-5"));
        assert_eq!(loader.current().await.unwrap().id(), "5");
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let mut mock = MockTransport::new();
        mock.expect_get("modems").return_json(200, json!({ "data": [] }));
        let loader = PageLoader::<Modem>::new("modem", start(&mock), Vec::<String>::new());

        let outcome = loader.load("missing").await;

        assert!(matches!(outcome, LoadOutcome::Failed(LoadError::NotFound)));
        assert_eq!(
            loader.state(),
            LoadState::Failed {
                uuid: "missing".into(),
                error: LoadError::NotFound
            }
        );
    }

    #[tokio::test]
    async fn ensure_does_not_refetch_after_failure() {
        let mut mock = MockTransport::new();
        mock.expect_get("modems").return_status(500);
        let loader = PageLoader::<Modem>::new("modem", start(&mock), Vec::<String>::new());

        let first = loader.ensure("m-5").await;
        let second = loader.ensure("m-5").await;

        assert!(matches!(first, LoadOutcome::Failed(LoadError::Failed(_))));
        assert!(matches!(second, LoadOutcome::Failed(LoadError::Failed(_))));
        assert_eq!(mock.requests().len(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn ensure_uses_cache_when_complete() {
        let mock = MockTransport::new();
        let store = start(&mock);
        store
            .push_payload(serde_json::from_value(modem_document("5", "m-5", "X55")).unwrap())
            .await
            .unwrap();
        let loader = PageLoader::<Modem>::new("modem", store, Vec::<String>::new());

        let outcome = loader.ensure("m-5").await;

        assert!(outcome.loaded().is_some());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn reset_returns_to_idle() {
        let mock = MockTransport::new();
        let loader = PageLoader::<Modem>::new("modem", start(&mock), Vec::<String>::new());

        loader.reset();

        assert_eq!(loader.state(), LoadState::Idle);
        assert!(loader.current().await.is_none());
    }
}
