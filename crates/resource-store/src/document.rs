//! # JSON:API Documents
//!
//! Wire types for the subset of JSON:API the store consumes: resource
//! objects, relationship linkage and compound documents (`data` plus
//! `included`).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// The identity of a resource: its `type` and `id`.
///
/// Doubles as the JSON:API resource identifier object, so it (de)serializes
/// as `{"type": ..., "id": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl ResourceKey {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Resource linkage of a relationship member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    Many(Vec<ResourceKey>),
    /// `null` deserializes here as `One(None)`.
    One(Option<ResourceKey>),
}

impl Linkage {
    /// All referenced keys, regardless of arity.
    pub fn keys(&self) -> Vec<&ResourceKey> {
        match self {
            Linkage::Many(keys) => keys.iter().collect(),
            Linkage::One(key) => key.iter().collect(),
        }
    }
}

/// A relationship member of a resource object.
///
/// `data` is `None` when the member carried no linkage at all (for example
/// links only), which is different from `Some(Linkage::One(None))`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Linkage>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Linkage>, D::Error>
where
    D: Deserializer<'de>,
{
    Linkage::deserialize(deserializer).map(Some)
}

/// A JSON:API resource object as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
}

impl ResourceObject {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            attributes: Map::new(),
            relationships: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.kind.clone(), self.id.clone())
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_relationship(mut self, name: impl Into<String>, linkage: Linkage) -> Self {
        self.relationships.insert(
            name.into(),
            Relationship {
                data: Some(linkage),
            },
        );
        self
    }
}

/// Primary data of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Many(Vec<ResourceObject>),
    One(ResourceObject),
}

/// A (possibly compound) JSON:API document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
}

impl Document {
    pub fn many(data: Vec<ResourceObject>) -> Self {
        Self {
            data: Some(PrimaryData::Many(data)),
            included: Vec::new(),
        }
    }

    pub fn one(data: ResourceObject) -> Self {
        Self {
            data: Some(PrimaryData::One(data)),
            included: Vec::new(),
        }
    }

    pub fn with_included(mut self, included: Vec<ResourceObject>) -> Self {
        self.included = included;
        self
    }

    /// Primary resources in document order.
    pub fn primary(&self) -> Vec<&ResourceObject> {
        match &self.data {
            Some(PrimaryData::Many(objects)) => objects.iter().collect(),
            Some(PrimaryData::One(object)) => vec![object],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn relationship_distinguishes_missing_null_and_empty() {
        let object: ResourceObject = serde_json::from_value(json!({
            "type": "combos",
            "id": "1",
            "relationships": {
                "lteComponents": { "links": { "related": "/combos/1/lteComponents" } },
                "capabilitySet": { "data": null },
                "nrComponents": { "data": [] }
            }
        }))
        .unwrap();

        assert_eq!(object.relationships["lteComponents"].data, None);
        assert_eq!(
            object.relationships["capabilitySet"].data,
            Some(Linkage::One(None))
        );
        assert_eq!(
            object.relationships["nrComponents"].data,
            Some(Linkage::Many(vec![]))
        );
    }

    #[test]
    fn compound_document_lists_primary_data() {
        let doc: Document = serde_json::from_value(json!({
            "data": { "type": "modems", "id": "5", "attributes": { "name": "X55" } },
            "included": [{ "type": "devices", "id": "9" }]
        }))
        .unwrap();

        let primary = doc.primary();
        assert_eq!(primary.len(), 1);
        assert_eq!(primary[0].key(), ResourceKey::new("modems", "5"));
        assert_eq!(doc.included[0].key().to_string(), "devices/9");
    }

    #[test]
    fn null_data_has_no_primary_resources() {
        let doc: Document = serde_json::from_value(json!({ "data": null })).unwrap();
        assert!(doc.primary().is_empty());
    }
}
