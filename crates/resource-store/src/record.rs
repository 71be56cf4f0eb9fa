//! # Resource Records
//!
//! The cached form of a resource. Records are owned by the store actor and
//! only ever change through [`ResourceRecord::merge`].

use crate::document::{Linkage, ResourceKey, ResourceObject};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One cached resource: immutable identity, mergeable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    key: ResourceKey,
    attributes: Map<String, Value>,
    relationships: BTreeMap<String, Linkage>,
}

impl ResourceRecord {
    pub(crate) fn from_object(object: ResourceObject) -> Self {
        let key = object.key();
        let mut record = Self {
            key,
            attributes: Map::new(),
            relationships: BTreeMap::new(),
        };
        record.merge(object);
        record
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Linkage for `name`, or `None` if the relationship was never loaded.
    pub fn relationship(&self, name: &str) -> Option<&Linkage> {
        self.relationships.get(name)
    }

    /// Field-level overwrite. Relationship members without linkage leave the
    /// cached linkage alone.
    pub(crate) fn merge(&mut self, object: ResourceObject) {
        debug_assert_eq!(self.key, object.key());
        for (name, value) in object.attributes {
            self.attributes.insert(name, value);
        }
        for (name, relationship) in object.relationships {
            if let Some(linkage) = relationship.data {
                self.relationships.insert(name, linkage);
            }
        }
    }
}
