//! # Store Actor
//!
//! This module defines the `StoreActor`, the task that owns every cached
//! resource record for a session. It implements the "Server" side of the
//! Actor Model: requests are processed one at a time, so the cache needs no
//! locks and a merge is never observed half-applied.

use crate::client::StoreClient;
use crate::document::{Document, Linkage, PrimaryData, ResourceKey};
use crate::message::{Related, RelatedRef, StoreRequest};
use crate::record::ResourceRecord;
use crate::transport::Transport;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The actor that owns the session cache.
///
/// # Architecture Note
/// This struct is the "Server" half of the store. It owns the records and
/// the receiver end of the channel. Clients only ever see clones of the data
/// they ask for.
///
/// Records are keyed by `(type, id)`; a second record with the same identity
/// is merged into the first, never stored beside it. A per-type index keeps
/// insertion order so "first by attribute" lookups are deterministic.
///
/// ```rust
/// use resource_store::mock::MockTransport;
/// use resource_store::{Document, ResourceObject, StoreActor};
///
/// #[tokio::main]
/// async fn main() {
///     let mock = MockTransport::new();
///     let (actor, store) = StoreActor::new(32, mock.transport());
///     tokio::spawn(actor.run());
///
///     let doc = Document::one(ResourceObject::new("modems", "5").with_attribute("name", "X55"));
///     store.push_payload(doc).await.unwrap();
///     assert_eq!(store.len().await.unwrap(), 1);
/// }
/// ```
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    records: HashMap<ResourceKey, ResourceRecord>,
    order: HashMap<String, Vec<String>>,
}

impl StoreActor {
    /// Creates a new `StoreActor` and the `StoreClient` that talks to it.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel.
    /// * `transport` - Used by the client for remote reads and writes.
    pub fn new(buffer_size: usize, transport: Arc<dyn Transport>) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: HashMap::new(),
            order: HashMap::new(),
        };
        (actor, StoreClient::new(sender, transport))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        info!("Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Get { key, respond_to } => {
                    let record = self.records.get(&key).cloned();
                    debug!(%key, found = record.is_some(), "Get");
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::Attribute {
                    key,
                    name,
                    respond_to,
                } => {
                    let value = self
                        .records
                        .get(&key)
                        .and_then(|r| r.attribute(name))
                        .cloned();
                    let _ = respond_to.send(Ok(value));
                }
                StoreRequest::Related {
                    key,
                    name,
                    respond_to,
                } => {
                    let _ = respond_to.send(Ok(self.related(&key, name)));
                }
                StoreRequest::FirstBy {
                    kind,
                    attribute,
                    value,
                    respond_to,
                } => {
                    let found = self.first_by(kind, &attribute, &value);
                    debug!(kind, %attribute, found = found.is_some(), "FirstBy");
                    let _ = respond_to.send(Ok(found));
                }
                StoreRequest::Push {
                    document,
                    respond_to,
                } => {
                    let primary = self.push(document);
                    info!(merged = primary.len(), size = self.records.len(), "Pushed");
                    let _ = respond_to.send(Ok(primary));
                }
                StoreRequest::IsLoaded {
                    key,
                    paths,
                    respond_to,
                } => {
                    let loaded = self.is_loaded(&key, &paths);
                    debug!(%key, loaded, "IsLoaded");
                    let _ = respond_to.send(Ok(loaded));
                }
                StoreRequest::Len { kind, respond_to } => {
                    let len = match kind {
                        Some(kind) => self.order.get(&kind).map_or(0, Vec::len),
                        None => self.records.len(),
                    };
                    let _ = respond_to.send(Ok(len));
                }
            }
        }

        info!(size = self.records.len(), "Shutdown");
    }

    fn push(&mut self, document: Document) -> Vec<ResourceKey> {
        let primary: Vec<ResourceKey> = document.primary().iter().map(|o| o.key()).collect();

        let objects = match document.data {
            Some(PrimaryData::Many(objects)) => objects,
            Some(PrimaryData::One(object)) => vec![object],
            None => Vec::new(),
        };

        for object in objects.into_iter().chain(document.included) {
            let key = object.key();
            match self.records.get_mut(&key) {
                Some(record) => record.merge(object),
                None => {
                    self.order
                        .entry(key.kind.clone())
                        .or_default()
                        .push(key.id.clone());
                    self.records
                        .insert(key, ResourceRecord::from_object(object));
                }
            }
        }

        primary
    }

    fn first_by(&self, kind: &str, attribute: &str, value: &Value) -> Option<ResourceKey> {
        self.order.get(kind)?.iter().find_map(|id| {
            let key = ResourceKey::new(kind, id.as_str());
            let record = self.records.get(&key)?;
            (record.attribute(attribute) == Some(value)).then_some(key)
        })
    }

    fn related(&self, key: &ResourceKey, name: &str) -> Option<Related> {
        let linkage = self.records.get(key)?.relationship(name)?;
        let resolve = |k: &ResourceKey| RelatedRef {
            key: k.clone(),
            loaded: self.records.contains_key(k),
        };

        Some(match linkage {
            Linkage::One(target) => Related::One(target.as_ref().map(resolve)),
            Linkage::Many(targets) => {
                Related::Many(targets.iter().map(resolve).collect())
            }
        })
    }

    /// Every dotted path must resolve to linkage on every record at every
    /// level, and every referenced record must be cached.
    fn is_loaded(&self, root: &ResourceKey, paths: &[String]) -> bool {
        if !self.records.contains_key(root) {
            return false;
        }

        paths.iter().all(|path| {
            let mut frontier = vec![root.clone()];
            for segment in path.split('.') {
                let mut next = Vec::new();
                for key in &frontier {
                    let Some(linkage) = self
                        .records
                        .get(key)
                        .and_then(|r| r.relationship(segment))
                    else {
                        return false;
                    };
                    for target in linkage.keys() {
                        if !self.records.contains_key(target) {
                            return false;
                        }
                        next.push(target.clone());
                    }
                }
                frontier = next;
            }
            true
        })
    }
}
