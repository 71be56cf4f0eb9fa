//! # Site Lifecycle
//!
//! [`ComboSite`] wires one session together: it spawns the store actor over
//! a transport, builds the submitter and notifier, and hands out pages that
//! share that one store.
//!
//! ```text
//! SiteConfig ──► HttpTransport ──► StoreActor (spawned)
//!                                      │
//!                                 StoreClient ──► pages, forms
//! ```
//!
//! ## Graceful Shutdown
//!
//! The store actor stops once every [`StoreClient`] is gone. `shutdown`
//! drops the site's own handles and awaits the actor task, so pages must be
//! dropped first or the call waits for them.

use crate::config::SiteConfig;
use crate::forms::AtomicSubmitter;
use crate::notify::{Notice, Notifier};
use crate::pages::{CapabilitySetPage, ModemEditorPage, UploadPage};
use crate::preferences::Preferences;
use resource_store::{HttpTransport, StoreActor, StoreClient, Transport};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

const STORE_BUFFER: usize = 64;

pub struct ComboSite {
    pub store: StoreClient,
    pub notifier: Notifier,
    submitter: AtomicSubmitter,
    preferences: Arc<Preferences>,
    notices: Option<mpsc::UnboundedReceiver<Notice>>,
    store_handle: JoinHandle<()>,
}

impl ComboSite {
    /// Starts a session against the backend in `config`.
    pub fn new(config: SiteConfig) -> Self {
        let transport = Arc::new(HttpTransport::new(config.api_base_url.clone()));
        Self::with_transport(config, transport)
    }

    /// Starts a session over any transport.
    pub fn with_transport(config: SiteConfig, transport: Arc<dyn Transport>) -> Self {
        let (actor, store) = StoreActor::new(STORE_BUFFER, transport);
        let store_handle = tokio::spawn(actor.run());

        let preferences = match &config.preferences_path {
            Some(path) => Preferences::open(path),
            None => Preferences::in_memory(),
        };
        let (notifier, notices) = Notifier::channel();

        info!(base_url = %config.api_base_url, "Combo site started");
        Self {
            submitter: AtomicSubmitter::new(store.clone(), config.api_token),
            store,
            notifier,
            preferences: Arc::new(preferences),
            notices: Some(notices),
            store_handle,
        }
    }

    /// The notice receiver. Only the first caller gets it.
    pub fn take_notices(&mut self) -> Option<mpsc::UnboundedReceiver<Notice>> {
        self.notices.take()
    }

    pub fn preferences(&self) -> &Arc<Preferences> {
        &self.preferences
    }

    pub fn capability_set_page(&self) -> CapabilitySetPage {
        CapabilitySetPage::new(self.store.clone())
    }

    pub fn modem_editor_page(&self) -> ModemEditorPage {
        ModemEditorPage::new(
            self.store.clone(),
            self.submitter.clone(),
            self.notifier.clone(),
        )
    }

    pub fn upload_page(&self) -> UploadPage {
        UploadPage::new(
            self.store.clone(),
            self.submitter.clone(),
            self.notifier.clone(),
            self.preferences.clone(),
        )
    }

    /// Drops the site's store handles and waits for the actor to stop.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down combo site");
        let Self {
            store,
            submitter,
            store_handle,
            ..
        } = self;
        drop(store);
        drop(submitter);

        if let Err(e) = store_handle.await {
            error!(error = %e, "Store actor panicked");
            return Err(format!("Store actor failed: {e}"));
        }
        info!("Combo site stopped");
        Ok(())
    }
}
