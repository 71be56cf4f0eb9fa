//! # Atomic Operations
//!
//! Request and response bodies for the JSON:API atomic operations extension
//! (<https://jsonapi.org/ext/atomic/>): several `add` / `update` operations
//! sent in one request that succeed or fail together.

use crate::document::{Document, Linkage, Relationship, ResourceObject};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Add,
    Update,
}

/// The resource half of an operation. `id` is absent for `add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationData {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub op: OpKind,
    pub data: OperationData,
}

impl Operation {
    pub fn add(kind: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            op: OpKind::Add,
            data: OperationData {
                kind: kind.into(),
                id: None,
                attributes,
                relationships: BTreeMap::new(),
            },
        }
    }

    pub fn update(
        kind: impl Into<String>,
        id: impl Into<String>,
        attributes: Map<String, Value>,
    ) -> Self {
        Self {
            op: OpKind::Update,
            data: OperationData {
                kind: kind.into(),
                id: Some(id.into()),
                attributes,
                relationships: BTreeMap::new(),
            },
        }
    }

    pub fn with_relationship(mut self, name: impl Into<String>, linkage: Linkage) -> Self {
        self.data.relationships.insert(
            name.into(),
            Relationship {
                data: Some(linkage),
            },
        );
        self
    }
}

/// Body of `POST /operations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtomicRequest {
    #[serde(rename = "atomic:operations")]
    pub operations: Vec<Operation>,
}

impl AtomicRequest {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// One entry of `atomic:results`.
///
/// Servers answer with result objects (`{"data": ...}`); some send the bare
/// resource object instead. Both are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AtomicResult {
    Resource(ResourceObject),
    Document(Document),
}

/// Body of a non-204 atomic response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AtomicResponse {
    #[serde(rename = "atomic:results", default)]
    pub results: Vec<Option<AtomicResult>>,
}

impl AtomicResponse {
    /// Folds every non-null result into one document so it can be merged in
    /// a single store update.
    pub fn into_document(self) -> Document {
        let mut primary = Vec::new();
        let mut included = Vec::new();

        for result in self.results.into_iter().flatten() {
            match result {
                AtomicResult::Resource(object) => primary.push(object),
                AtomicResult::Document(doc) => {
                    primary.extend(doc.primary().into_iter().cloned());
                    included.extend(doc.included);
                }
            }
        }

        Document::many(primary).with_included(included)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_operation_serializes_with_atomic_member() {
        let mut attributes = Map::new();
        attributes.insert("name".into(), json!("X65"));
        let request = AtomicRequest::new(vec![Operation::update("modems", "5", attributes)]);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "atomic:operations": [{
                    "op": "update",
                    "data": { "type": "modems", "id": "5", "attributes": { "name": "X65" } }
                }]
            })
        );
    }

    #[test]
    fn add_operation_omits_id() {
        let value = serde_json::to_value(Operation::add("modems", Map::new())).unwrap();
        assert_eq!(value["op"], json!("add"));
        assert!(value["data"].get("id").is_none());
    }

    #[test]
    fn results_skip_null_and_accept_both_shapes() {
        let response: AtomicResponse = serde_json::from_value(json!({
            "atomic:results": [
                null,
                { "type": "modems", "id": "5", "attributes": { "name": "X" } },
                { "data": { "type": "modems", "id": "6", "attributes": { "name": "Y" } } }
            ]
        }))
        .unwrap();

        let doc = response.into_document();
        let keys: Vec<String> = doc.primary().iter().map(|o| o.key().to_string()).collect();
        assert_eq!(keys, vec!["modems/5", "modems/6"]);
    }
}
