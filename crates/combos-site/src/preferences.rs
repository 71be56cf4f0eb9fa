//! # Preferences
//!
//! Small UI selections that survive restarts, such as the last-used upload
//! form. Values are strings keyed by a path-like name and are validated
//! against an allow-list when read; anything invalid or missing falls back
//! to the caller's default.

use crate::forms::UploadFormKind;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

pub const UPLOAD_FORM_TYPE_KEY: &str = "admin/combos-upload/form-type";

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("Failed to write preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key-value store, backed by a JSON file or kept in memory.
#[derive(Debug)]
pub struct Preferences {
    path: Option<PathBuf>,
    values: Mutex<BTreeMap<String, String>>,
}

impl Preferences {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: Mutex::new(BTreeMap::new()),
        }
    }

    /// Opens the file at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = Self::read(&path).unwrap_or_default();
        debug!(path = %path.display(), entries = values.len(), "Preferences loaded");
        Self {
            path: Some(path),
            values: Mutex::new(values),
        }
    }

    fn read(path: &Path) -> Option<BTreeMap<String, String>> {
        let text = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&text) {
            Ok(values) => Some(values),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt preferences file");
                None
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// The stored value if `is_valid` accepts it, otherwise `default`.
    pub fn get_validated(
        &self,
        key: &str,
        default: &str,
        is_valid: impl Fn(&str) -> bool,
    ) -> String {
        match self.get(key) {
            Some(value) if is_valid(&value) => value,
            Some(value) => {
                debug!(key, %value, "Discarding invalid preference");
                default.to_string()
            }
            None => default.to_string(),
        }
    }

    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<(), PreferencesError> {
        let mut values = self.lock();
        values.insert(key.to_string(), value.into());

        if let Some(path) = &self.path {
            std::fs::write(path, serde_json::to_string_pretty(&*values)?)?;
        }
        Ok(())
    }

    pub fn upload_form_kind(&self) -> UploadFormKind {
        let label = self.get_validated(UPLOAD_FORM_TYPE_KEY, UploadFormKind::default().label(), |v| {
            UploadFormKind::from_label(v).is_some()
        });
        UploadFormKind::from_label(&label).unwrap_or_default()
    }

    pub fn set_upload_form_kind(&self, kind: UploadFormKind) -> Result<(), PreferencesError> {
        self.set(UPLOAD_FORM_TYPE_KEY, kind.label())
    }
}
