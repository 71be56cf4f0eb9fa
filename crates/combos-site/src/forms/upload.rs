//! # Combo Upload Forms
//!
//! The upload page offers several input formats for the same job: attach
//! combos to one capability set. Each format is an [`UploadFormKind`] and
//! the [`UploadFormRegistry`] maps it to the handler that validates the
//! input and builds the atomic request.
//!
//! Input arrives per RAT. A blank RAT field means "skip this RAT"; at least
//! one must be filled in.

use crate::forms::FormError;
use crate::model::{CapabilitySet, Combo};
use resource_store::{AtomicRequest, Linkage, Operation, Resource, ResourceKey};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Resource type the backend parses raw modem logs into combos from.
pub const COMBO_IMPORT_TYPE: &str = "combo-imports";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UploadFormKind {
    #[default]
    Nsg,
    QualcommHexdump,
    ImportOnly,
}

impl UploadFormKind {
    pub const ALL: [UploadFormKind; 3] = [
        UploadFormKind::Nsg,
        UploadFormKind::QualcommHexdump,
        UploadFormKind::ImportOnly,
    ];

    /// Label shown in the form picker; also the persisted value.
    pub fn label(self) -> &'static str {
        match self {
            UploadFormKind::Nsg => "NSG",
            UploadFormKind::QualcommHexdump => "Qualcomm 0xB0CD/0xB826 hexdump",
            UploadFormKind::ImportOnly => "Import pre-parsed JSON",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for UploadFormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw text entered per radio access technology.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadInput {
    pub lte: String,
    pub nr: String,
}

impl UploadInput {
    /// Non-blank fields as `(rat, text)`, in a fixed order.
    pub fn filled(&self) -> Vec<(&'static str, &str)> {
        [("lte", self.lte.as_str()), ("nr", self.nr.as_str())]
            .into_iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .collect()
    }
}

pub trait UploadForm: Send + Sync {
    fn kind(&self) -> UploadFormKind;

    /// Validates `input` and builds the request targeting `capability_set`.
    fn build(
        &self,
        capability_set: &ResourceKey,
        input: &UploadInput,
    ) -> Result<AtomicRequest, FormError>;
}

fn capability_set_linkage(capability_set: &ResourceKey) -> Linkage {
    Linkage::One(Some(capability_set.clone()))
}

fn require_input(input: &UploadInput) -> Result<Vec<(&'static str, &str)>, FormError> {
    let filled = input.filled();
    if filled.is_empty() {
        return Err(FormError::validation(
            "Enter data for at least one RAT before submitting",
        ));
    }
    Ok(filled)
}

/// Raw modem logs, parsed server-side.
struct RawLogUpload {
    kind: UploadFormKind,
    format: &'static str,
}

impl UploadForm for RawLogUpload {
    fn kind(&self) -> UploadFormKind {
        self.kind
    }

    fn build(
        &self,
        capability_set: &ResourceKey,
        input: &UploadInput,
    ) -> Result<AtomicRequest, FormError> {
        let filled = require_input(input)?;

        let mut attributes = Map::new();
        attributes.insert("format".into(), Value::from(self.format));
        for (rat, text) in filled {
            attributes.insert(rat.into(), Value::from(text.trim()));
        }

        let operation = Operation::add(COMBO_IMPORT_TYPE, attributes)
            .with_relationship("capabilitySet", capability_set_linkage(capability_set));
        Ok(AtomicRequest::new(vec![operation]))
    }
}

/// Combos already parsed into JSON objects, one `add` per combo.
struct ImportOnlyUpload;

impl UploadForm for ImportOnlyUpload {
    fn kind(&self) -> UploadFormKind {
        UploadFormKind::ImportOnly
    }

    fn build(
        &self,
        capability_set: &ResourceKey,
        input: &UploadInput,
    ) -> Result<AtomicRequest, FormError> {
        let mut operations = Vec::new();

        for (rat, text) in require_input(input)? {
            let invalid = || FormError::validation(format!("The {rat} field must be a JSON array of combos"));
            let combos: Vec<Value> = serde_json::from_str(text).map_err(|_| invalid())?;

            for combo in combos {
                let Value::Object(attributes) = combo else {
                    return Err(invalid());
                };
                operations.push(
                    Operation::add(Combo::TYPE, attributes)
                        .with_relationship("capabilitySet", capability_set_linkage(capability_set)),
                );
            }
        }

        if operations.is_empty() {
            return Err(FormError::validation("No combos found in the submitted data"));
        }
        Ok(AtomicRequest::new(operations))
    }
}

/// Maps every [`UploadFormKind`] to its handler.
pub struct UploadFormRegistry {
    forms: HashMap<UploadFormKind, Box<dyn UploadForm>>,
}

impl UploadFormRegistry {
    pub fn new() -> Self {
        let forms: Vec<Box<dyn UploadForm>> = vec![
            Box::new(RawLogUpload {
                kind: UploadFormKind::Nsg,
                format: "nsg",
            }),
            Box::new(RawLogUpload {
                kind: UploadFormKind::QualcommHexdump,
                format: "qualcomm-hexdump",
            }),
            Box::new(ImportOnlyUpload),
        ];
        Self {
            forms: forms.into_iter().map(|form| (form.kind(), form)).collect(),
        }
    }

    pub fn get(&self, kind: UploadFormKind) -> Option<&dyn UploadForm> {
        self.forms.get(&kind).map(|form| form.as_ref())
    }

    /// Allow-list for persisted selections.
    pub fn labels(&self) -> Vec<&'static str> {
        UploadFormKind::ALL
            .into_iter()
            .filter(|kind| self.forms.contains_key(kind))
            .map(UploadFormKind::label)
            .collect()
    }

    /// Builds the request for `kind` against a loaded capability set.
    pub fn build(
        &self,
        kind: UploadFormKind,
        capability_set: &CapabilitySet,
        input: &UploadInput,
    ) -> Result<AtomicRequest, FormError> {
        let form = self
            .get(kind)
            .ok_or_else(|| FormError::validation(format!("Unknown upload form: {kind}")))?;
        form.build(capability_set.key(), input)
    }
}

impl Default for UploadFormRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capability_set() -> ResourceKey {
        ResourceKey::new("capability-sets", "7")
    }

    #[test]
    fn labels_round_trip() {
        for kind in UploadFormKind::ALL {
            assert_eq!(UploadFormKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(UploadFormKind::from_label("Excel"), None);
        assert_eq!(UploadFormKind::default().label(), "NSG");
    }

    #[test]
    fn blank_rats_are_skipped() {
        let registry = UploadFormRegistry::new();
        let input = UploadInput {
            lte: "  ".into(),
            nr: "n78A-n28A".into(),
        };

        let request = registry
            .get(UploadFormKind::Nsg)
            .unwrap()
            .build(&capability_set(), &input)
            .unwrap();

        let data = &request.operations[0].data;
        assert_eq!(data.kind, COMBO_IMPORT_TYPE);
        assert_eq!(data.attributes["format"], "nsg");
        assert_eq!(data.attributes["nr"], "n78A-n28A");
        assert!(!data.attributes.contains_key("lte"));
        assert!(data.relationships.contains_key("capabilitySet"));
    }

    #[test]
    fn all_blank_is_a_validation_error() {
        let registry = UploadFormRegistry::new();

        let error = registry
            .get(UploadFormKind::QualcommHexdump)
            .unwrap()
            .build(&capability_set(), &UploadInput::default())
            .unwrap_err();

        assert!(error.is_validation());
    }

    #[test]
    fn import_only_adds_one_combo_per_entry() {
        let registry = UploadFormRegistry::new();
        let input = UploadInput {
            lte: r#"[{"comboString": "1A-3A"}, {"comboString": "3C"}]"#.into(),
            nr: String::new(),
        };

        let request = registry
            .get(UploadFormKind::ImportOnly)
            .unwrap()
            .build(&capability_set(), &input)
            .unwrap();

        assert_eq!(request.operations.len(), 2);
        assert_eq!(request.operations[1].data.kind, "combos");
        assert_eq!(request.operations[1].data.attributes["comboString"], "3C");
    }

    #[test]
    fn import_only_rejects_malformed_json() {
        let registry = UploadFormRegistry::new();
        let input = UploadInput {
            lte: "not json".into(),
            nr: String::new(),
        };

        let error = registry
            .get(UploadFormKind::ImportOnly)
            .unwrap()
            .build(&capability_set(), &input)
            .unwrap_err();

        assert_eq!(
            error.user_message(),
            "The lte field must be a JSON array of combos"
        );
    }
}
