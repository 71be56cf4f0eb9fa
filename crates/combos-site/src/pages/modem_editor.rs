//! Admin page for renaming a modem.

use crate::forms::{AtomicSubmitter, FormError, FormMode, ModemForm};
use crate::loaders::{LoadError, LoadOutcome, LoadState, PageLoader};
use crate::model::Modem;
use crate::notify::Notifier;
use crate::pages::SAVED_MESSAGE;
use resource_store::StoreClient;
use tracing::info;

pub const MODEM_FETCH_ERROR: &str =
    "Something went wrong when fetching data for this modem. Please try again later.";

pub struct ModemEditorPage {
    loader: PageLoader<Modem>,
    submitter: AtomicSubmitter,
    notifier: Notifier,
}

impl ModemEditorPage {
    pub fn new(store: StoreClient, submitter: AtomicSubmitter, notifier: Notifier) -> Self {
        Self {
            loader: PageLoader::new("modem-editor", store, Vec::<String>::new()),
            submitter,
            notifier,
        }
    }

    pub fn loader(&self) -> &PageLoader<Modem> {
        &self.loader
    }

    pub async fn open(&self, uuid: &str) -> LoadOutcome<Modem> {
        self.loader.ensure(uuid).await
    }

    pub async fn title(&self) -> String {
        match self.loader.state() {
            LoadState::Idle | LoadState::Loading { .. } => "Loading...".to_string(),
            LoadState::Failed { .. } => "Not found".to_string(),
            LoadState::Loaded { .. } => {
                let name = match self.loader.current().await {
                    Some(modem) => modem.name().await.ok().flatten(),
                    None => None,
                };
                match name {
                    Some(name) => format!("Editing {name}"),
                    None => "Not found".to_string(),
                }
            }
        }
    }

    /// Inline message for a failed load.
    pub fn error_message(&self) -> Option<String> {
        match self.loader.state() {
            LoadState::Failed {
                uuid,
                error: LoadError::NotFound,
            } => Some(format!(
                "We couldn't find the modem you were looking for ({uuid})."
            )),
            LoadState::Failed { .. } => Some(MODEM_FETCH_ERROR.to_string()),
            _ => None,
        }
    }

    /// Form pre-filled from the loaded modem.
    pub async fn form(&self) -> Option<ModemForm> {
        let modem = self.loader.current().await?;
        ModemForm::from_modem(&modem).await.ok()
    }

    /// Saves `form` and reloads the modem.
    ///
    /// Validation errors are returned for inline display; server and network
    /// failures are also posted as notices.
    pub async fn save(&self, form: &ModemForm) -> Result<(), FormError> {
        let modem = self.loader.current().await;
        let request = form.assemble(FormMode::Update, modem.as_ref())?;

        if let Err(error) = self.submitter.submit(&request, "modem").await {
            self.notifier.error(error.user_message());
            return Err(error);
        }
        self.notifier.success(SAVED_MESSAGE);

        if let LoadState::Loaded { uuid, .. } = self.loader.state() {
            info!(%uuid, "Reloading after save");
            self.loader.load(&uuid).await;
        }
        Ok(())
    }
}
