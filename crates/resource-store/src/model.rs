//! # Resource Models
//!
//! Typed views over cached records. A model is nothing but a
//! [`ModelView`]: a store handle plus a `(type, id)` key. Every accessor
//! reads through the store at call time, so a model always reflects the
//! latest merge and is never an independent copy.
//!
//! Fields are declared as descriptor constants ([`Attribute`], [`HasOne`],
//! [`HasMany`]), usually through [`resource_model!`](crate::resource_model).
//!
//! # Absent vs. loaded-but-empty
//!
//! | Accessor | `None` means | `Some(..)` means |
//! |----------|--------------|------------------|
//! | `Attribute<T>::get` | unset, `null`, or record not cached | the value |
//! | `HasOne<M>::get` | not loaded, `null`, or target not cached | the target |
//! | `HasMany<M>::get` | relationship linkage not loaded | one entry per reference; `None` entries are referenced-but-unloaded |

use crate::client::StoreClient;
use crate::document::ResourceKey;
use crate::error::StoreError;
use crate::message::Related;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use tracing::warn;

/// A store-owned `(type, id)` handle.
///
/// Only the store creates views, which keeps one record per identity.
#[derive(Debug, Clone)]
pub struct ModelView {
    store: StoreClient,
    key: ResourceKey,
}

impl ModelView {
    pub(crate) fn new(store: StoreClient, key: ResourceKey) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }
}

/// A JSON:API resource type with a fixed `type` discriminator.
pub trait Resource: Clone + Send + Sync + 'static {
    /// The backend's resource type name, e.g. `"lte-components"`.
    const TYPE: &'static str;

    fn from_view(view: ModelView) -> Self;

    fn view(&self) -> &ModelView;

    fn id(&self) -> &str {
        &self.view().key().id
    }

    fn key(&self) -> &ResourceKey {
        self.view().key()
    }
}

/// Descriptor of a scalar attribute.
#[derive(Debug)]
pub struct Attribute<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Attribute<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn get(&self, view: &ModelView) -> Result<Option<T>, StoreError> {
        match view.store.attribute(view.key.clone(), self.name).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Attribute {
                    name: self.name,
                    source,
                }),
        }
    }
}

/// Descriptor of a to-one relationship.
#[derive(Debug)]
pub struct HasOne<M> {
    name: &'static str,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Resource> HasOne<M> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn get(&self, view: &ModelView) -> Result<Option<M>, StoreError> {
        let target = match view.store.related(view.key.clone(), self.name).await? {
            Some(Related::One(target)) => target,
            Some(Related::Many(_)) => {
                warn!(key = %view.key, relationship = self.name, "Expected to-one linkage");
                None
            }
            None => None,
        };

        Ok(target
            .filter(|r| r.loaded && r.key.kind == M::TYPE)
            .map(|r| view.store.model(r.key)))
    }
}

/// Descriptor of a to-many relationship.
#[derive(Debug)]
pub struct HasMany<M> {
    name: &'static str,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Resource> HasMany<M> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn get(&self, view: &ModelView) -> Result<Option<Vec<Option<M>>>, StoreError> {
        let targets = match view.store.related(view.key.clone(), self.name).await? {
            Some(Related::Many(targets)) => targets,
            Some(Related::One(_)) => {
                warn!(key = %view.key, relationship = self.name, "Expected to-many linkage");
                return Ok(None);
            }
            None => return Ok(None),
        };

        Ok(Some(
            targets
                .into_iter()
                .map(|r| {
                    (r.loaded && r.key.kind == M::TYPE).then(|| view.store.model(r.key))
                })
                .collect(),
        ))
    }
}

/// Declares a model struct, its field descriptors and async accessors.
///
/// ```rust
/// use resource_store::resource_model;
///
/// resource_model! {
///     /// A MIMO layer count.
///     pub struct Mimo: "mimos" {
///         attributes {
///             mimo: i64 => "mimo",
///         }
///         has_one {}
///         has_many {}
///     }
/// }
///
/// assert_eq!(<Mimo as resource_store::Resource>::TYPE, "mimos");
/// assert_eq!(Mimo::MIMO.name(), "mimo");
/// ```
#[macro_export]
macro_rules! resource_model {
    (
        $(#[$meta:meta])*
        pub struct $name:ident : $kind:literal {
            attributes { $( $attr:ident : $attr_ty:ty => $attr_name:literal ),* $(,)? }
            has_one { $( $one:ident : $one_ty:ty => $one_name:literal ),* $(,)? }
            has_many { $( $many:ident : $many_ty:ty => $many_name:literal ),* $(,)? }
        }
    ) => {
        $crate::paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone)]
            pub struct $name {
                view: $crate::ModelView,
            }

            impl $crate::Resource for $name {
                const TYPE: &'static str = $kind;

                fn from_view(view: $crate::ModelView) -> Self {
                    Self { view }
                }

                fn view(&self) -> &$crate::ModelView {
                    &self.view
                }
            }

            #[allow(dead_code)]
            impl $name {
                $(
                    pub const [<$attr:upper>]: $crate::Attribute<$attr_ty> =
                        $crate::Attribute::new($attr_name);
                )*
                $(
                    pub const [<$one:upper>]: $crate::HasOne<$one_ty> =
                        $crate::HasOne::new($one_name);
                )*
                $(
                    pub const [<$many:upper>]: $crate::HasMany<$many_ty> =
                        $crate::HasMany::new($many_name);
                )*

                $(
                    pub async fn $attr(&self) -> Result<Option<$attr_ty>, $crate::StoreError> {
                        Self::[<$attr:upper>].get(&self.view).await
                    }
                )*
                $(
                    pub async fn $one(&self) -> Result<Option<$one_ty>, $crate::StoreError> {
                        Self::[<$one:upper>].get(&self.view).await
                    }
                )*
                $(
                    pub async fn $many(
                        &self,
                    ) -> Result<Option<Vec<Option<$many_ty>>>, $crate::StoreError> {
                        Self::[<$many:upper>].get(&self.view).await
                    }
                )*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::document::{Document, Linkage, ResourceKey, ResourceObject};
    use crate::mock::MockTransport;
    use crate::{Resource, StoreActor, StoreClient};

    crate::resource_model! {
        pub struct Modulation: "modulations" {
            attributes {
                modulation: String => "modulation",
            }
            has_one {}
            has_many {}
        }
    }

    crate::resource_model! {
        pub struct Component: "lte-components" {
            attributes {
                band: i64 => "band",
                dl_class: String => "dlClass",
            }
            has_one {
                primary: Modulation => "primary",
            }
            has_many {
                dl_modulations: Modulation => "dlModulations",
            }
        }
    }

    fn start() -> StoreClient {
        let mock = MockTransport::new();
        let (actor, store) = StoreActor::new(16, mock.transport());
        tokio::spawn(actor.run());
        store
    }

    #[tokio::test]
    async fn attributes_read_through_the_store() {
        let store = start();
        store
            .push_payload(Document::one(
                ResourceObject::new("lte-components", "1")
                    .with_attribute("band", 3)
                    .with_attribute("dlClass", serde_json::Value::Null),
            ))
            .await
            .unwrap();

        let component: Component = store.peek("1").await.unwrap().unwrap();
        assert_eq!(component.band().await.unwrap(), Some(3));
        assert_eq!(component.dl_class().await.unwrap(), None);

        // Later merges are visible through the same view.
        store
            .push_payload(Document::one(
                ResourceObject::new("lte-components", "1").with_attribute("band", 7),
            ))
            .await
            .unwrap();
        assert_eq!(component.band().await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn has_many_reports_unloaded_targets() {
        let store = start();
        store
            .push_payload(
                Document::one(ResourceObject::new("lte-components", "1").with_relationship(
                    "dlModulations",
                    Linkage::Many(vec![
                        ResourceKey::new("modulations", "a"),
                        ResourceKey::new("modulations", "b"),
                    ]),
                ))
                .with_included(vec![
                    ResourceObject::new("modulations", "a").with_attribute("modulation", "qam256")
                ]),
            )
            .await
            .unwrap();

        let component: Component = store.peek("1").await.unwrap().unwrap();
        let modulations = component.dl_modulations().await.unwrap().unwrap();
        assert_eq!(modulations.len(), 2);
        assert_eq!(
            modulations[0].as_ref().unwrap().modulation().await.unwrap(),
            Some("qam256".to_string())
        );
        assert!(modulations[1].is_none());

        // Never-loaded relationship is absent, not empty.
        assert!(component.primary().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn type_mismatch_is_an_attribute_error() {
        let store = start();
        store
            .push_payload(Document::one(
                ResourceObject::new("lte-components", "1").with_attribute("band", "three"),
            ))
            .await
            .unwrap();

        let component: Component = store.peek("1").await.unwrap().unwrap();
        assert!(component.band().await.is_err());
        assert_eq!(component.key(), &ResourceKey::new("lte-components", "1"));
    }
}
