//! Combos table of a device page.

use crate::loaders::{LoadError, LoadOutcome, LoadState, PageLoader};
use crate::model::CapabilitySet;
use resource_store::{StoreClient, StoreError};

/// Everything the combos table reads, down to MIMO and modulation entries.
pub const CAPABILITY_SET_INCLUDES: [&str; 11] = [
    "combos",
    "combos.lteComponents",
    "combos.nrComponents",
    "combos.lteComponents.dlMimos",
    "combos.lteComponents.ulMimos",
    "combos.lteComponents.dlModulations",
    "combos.lteComponents.ulModulations",
    "combos.nrComponents.dlMimos",
    "combos.nrComponents.ulMimos",
    "combos.nrComponents.dlModulations",
    "combos.nrComponents.ulModulations",
];

pub const CHOOSE_PROMPT: &str = "Please choose a firmware and capability set from the list above.";
pub const LOADING_MESSAGE: &str = "Loading combos...";
pub const COMBOS_FETCH_ERROR: &str =
    "Something went wrong when fetching data for this device. Please try again later.";
pub const COMBOS_INCOMPLETE: &str =
    "Some combo details for this capability set are still missing. Please reload to try again.";

#[derive(Debug, Clone)]
pub enum CapabilitySetView {
    /// No capability set selected.
    Prompt,
    Loading,
    Combos(CapabilitySet),
    /// The response lacked part of the include closure.
    Incomplete,
    Error { detail: String },
}

impl CapabilitySetView {
    /// Text shown in place of the table, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            CapabilitySetView::Prompt => Some(CHOOSE_PROMPT),
            CapabilitySetView::Loading => Some(LOADING_MESSAGE),
            CapabilitySetView::Combos(_) => None,
            CapabilitySetView::Incomplete => Some(COMBOS_INCOMPLETE),
            CapabilitySetView::Error { .. } => Some(COMBOS_FETCH_ERROR),
        }
    }
}

/// One row of the combos table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboRow {
    pub combo_string: String,
    pub lte_bands: Vec<i64>,
    pub nr_bands: Vec<i64>,
}

pub struct CapabilitySetPage {
    loader: PageLoader<CapabilitySet>,
}

impl CapabilitySetPage {
    pub fn new(store: StoreClient) -> Self {
        Self {
            loader: PageLoader::new("capability-set", store, CAPABILITY_SET_INCLUDES),
        }
    }

    pub fn loader(&self) -> &PageLoader<CapabilitySet> {
        &self.loader
    }

    /// Called whenever the selected capability set changes.
    ///
    /// The device page passes `"null"` while nothing is selected.
    pub async fn select(&self, uuid: Option<&str>) -> CapabilitySetView {
        match uuid {
            Some(uuid) if !uuid.is_empty() && uuid != "null" => {
                if let LoadOutcome::Superseded = self.loader.ensure(uuid).await {
                    return CapabilitySetView::Loading;
                }
            }
            _ => self.loader.reset(),
        }
        self.view().await
    }

    pub async fn view(&self) -> CapabilitySetView {
        match self.loader.state() {
            LoadState::Idle => CapabilitySetView::Prompt,
            LoadState::Loading { .. } => CapabilitySetView::Loading,
            LoadState::Loaded { .. } => match self.loader.current().await {
                Some(capability_set) => CapabilitySetView::Combos(capability_set),
                None => CapabilitySetView::Loading,
            },
            LoadState::Failed {
                error: LoadError::Incomplete,
                ..
            } => CapabilitySetView::Incomplete,
            LoadState::Failed { error, .. } => CapabilitySetView::Error {
                detail: error.to_string(),
            },
        }
    }
}

/// Rows for a fully loaded capability set, skipping unloaded entries.
pub async fn combo_rows(capability_set: &CapabilitySet) -> Result<Vec<ComboRow>, StoreError> {
    let mut rows = Vec::new();

    for combo in capability_set.combos().await?.unwrap_or_default().into_iter().flatten() {
        let mut lte_bands = Vec::new();
        for component in combo.lte_components().await?.unwrap_or_default().into_iter().flatten() {
            lte_bands.extend(component.band().await?);
        }

        let mut nr_bands = Vec::new();
        for component in combo.nr_components().await?.unwrap_or_default().into_iter().flatten() {
            nr_bands.extend(component.band().await?);
        }

        rows.push(ComboRow {
            combo_string: combo.combo_string().await?.unwrap_or_default(),
            lte_bands,
            nr_bands,
        });
    }
    Ok(rows)
}
