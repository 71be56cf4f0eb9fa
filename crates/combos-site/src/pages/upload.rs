//! Admin page for uploading combos to a capability set.
//!
//! The route carries three uuids: device, firmware and capability set. The
//! page loads the device with its firmwares and their capability sets, then
//! checks that the firmware belongs to the device and the capability set to
//! the firmware. Anything that does not line up redirects one level up.

use crate::forms::{AtomicSubmitter, FormError, UploadFormKind, UploadFormRegistry, UploadInput};
use crate::loaders::{LoadOutcome, PageLoader, UUID_ATTRIBUTE};
use crate::model::{CapabilitySet, Device, DeviceFirmware};
use crate::notify::Notifier;
use crate::pages::SAVED_MESSAGE;
use crate::preferences::{Preferences, PreferencesError};
use resource_store::{Resource, ResourceKey, StoreClient, StoreError};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEVICE_INCLUDES: [&str; 3] = ["modem", "deviceFirmwares", "deviceFirmwares.capabilitySets"];
pub const DEVICE_LOAD_ERROR: &str = "Error loading device data from server";

const UPLOAD_ROOT: &str = "/admin/upload";

#[derive(Debug, Clone)]
pub enum UploadRoute {
    Loading,
    Redirect(String),
    Ready {
        device: Device,
        firmware: DeviceFirmware,
        capability_set: CapabilitySet,
    },
}

pub struct UploadPage {
    store: StoreClient,
    loader: PageLoader<Device>,
    registry: UploadFormRegistry,
    preferences: Arc<Preferences>,
    submitter: AtomicSubmitter,
    notifier: Notifier,
}

impl UploadPage {
    pub fn new(
        store: StoreClient,
        submitter: AtomicSubmitter,
        notifier: Notifier,
        preferences: Arc<Preferences>,
    ) -> Self {
        Self {
            loader: PageLoader::new("upload-device", store.clone(), DEVICE_INCLUDES),
            store,
            registry: UploadFormRegistry::new(),
            preferences,
            submitter,
            notifier,
        }
    }

    pub fn loader(&self) -> &PageLoader<Device> {
        &self.loader
    }

    pub fn registry(&self) -> &UploadFormRegistry {
        &self.registry
    }

    /// Last-used form type, or NSG.
    pub fn form_kind(&self) -> UploadFormKind {
        self.preferences.upload_form_kind()
    }

    pub fn select_form_kind(&self, kind: UploadFormKind) -> Result<(), PreferencesError> {
        self.preferences.set_upload_form_kind(kind)
    }

    /// Decides what the page shows for the uuids in the route.
    pub async fn resolve(
        &self,
        device_uuid: Option<&str>,
        firmware_uuid: Option<&str>,
        capability_set_uuid: Option<&str>,
    ) -> UploadRoute {
        let (device_uuid, firmware_uuid) = match (device_uuid, firmware_uuid) {
            (Some(device), Some(firmware)) => (device, firmware),
            (Some(device), None) => return UploadRoute::Redirect(format!("{UPLOAD_ROOT}/{device}")),
            (None, _) => return UploadRoute::Redirect(UPLOAD_ROOT.to_string()),
        };

        let device = match self.loader.ensure(device_uuid).await {
            LoadOutcome::Loaded(device) => device,
            LoadOutcome::Superseded => return UploadRoute::Loading,
            LoadOutcome::Failed(error) => {
                warn!(%error, device_uuid, "Device failed to load");
                self.notifier.error(DEVICE_LOAD_ERROR);
                return UploadRoute::Redirect(UPLOAD_ROOT.to_string());
            }
        };

        match self
            .check(device, device_uuid, firmware_uuid, capability_set_uuid.unwrap_or_default())
            .await
        {
            Ok(route) => route,
            Err(e) => {
                warn!(error = %e, "Could not read cached device data");
                self.notifier.error(DEVICE_LOAD_ERROR);
                UploadRoute::Redirect(UPLOAD_ROOT.to_string())
            }
        }
    }

    async fn check(
        &self,
        device: Device,
        device_uuid: &str,
        firmware_uuid: &str,
        capability_set_uuid: &str,
    ) -> Result<UploadRoute, StoreError> {
        let firmware = self
            .store
            .get_first_by::<DeviceFirmware>(UUID_ATTRIBUTE, firmware_uuid)
            .await?;
        let Some(firmware) = firmware else {
            debug!(firmware_uuid, "Unknown firmware");
            return Ok(UploadRoute::Redirect(format!("{UPLOAD_ROOT}/{device_uuid}")));
        };
        if !contains(device.device_firmwares().await?, firmware.key()) {
            debug!(firmware_uuid, "Firmware does not belong to device");
            return Ok(UploadRoute::Redirect(format!("{UPLOAD_ROOT}/{device_uuid}")));
        }

        let firmware_route = format!("{UPLOAD_ROOT}/{device_uuid}/{firmware_uuid}");
        let capability_set = self
            .store
            .get_first_by::<CapabilitySet>(UUID_ATTRIBUTE, capability_set_uuid)
            .await?;
        let Some(capability_set) = capability_set else {
            debug!(capability_set_uuid, "Unknown capability set");
            return Ok(UploadRoute::Redirect(firmware_route));
        };
        if !contains(firmware.capability_sets().await?, capability_set.key()) {
            debug!(capability_set_uuid, "Capability set does not belong to firmware");
            return Ok(UploadRoute::Redirect(firmware_route));
        }

        Ok(UploadRoute::Ready {
            device,
            firmware,
            capability_set,
        })
    }

    /// Builds and submits the selected form for a resolved capability set.
    pub async fn submit(
        &self,
        capability_set: &CapabilitySet,
        input: &UploadInput,
    ) -> Result<Vec<ResourceKey>, FormError> {
        let request = self.registry.build(self.form_kind(), capability_set, input)?;

        match self.submitter.submit(&request, "capability set").await {
            Ok(keys) => {
                self.notifier.success(SAVED_MESSAGE);
                Ok(keys)
            }
            Err(error) => {
                self.notifier.error(error.user_message());
                Err(error)
            }
        }
    }
}

fn contains<M: Resource>(related: Option<Vec<Option<M>>>, key: &ResourceKey) -> bool {
    related
        .unwrap_or_default()
        .iter()
        .flatten()
        .any(|model| model.key() == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_store::mock::MockTransport;
    use resource_store::StoreActor;

    fn page(mock: &MockTransport) -> UploadPage {
        let (actor, store) = StoreActor::new(32, mock.transport());
        tokio::spawn(actor.run());
        let (notifier, _) = Notifier::channel();
        UploadPage::new(
            store.clone(),
            AtomicSubmitter::new(store, Some("token".into())),
            notifier,
            Arc::new(Preferences::in_memory()),
        )
    }

    #[tokio::test]
    async fn missing_uuids_redirect_without_loading() {
        let mock = MockTransport::new();
        let page = page(&mock);

        assert!(matches!(
            page.resolve(None, None, None).await,
            UploadRoute::Redirect(path) if path == "/admin/upload"
        ));
        assert!(matches!(
            page.resolve(Some("d-1"), None, None).await,
            UploadRoute::Redirect(path) if path == "/admin/upload/d-1"
        ));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn form_kind_is_persisted() {
        let mock = MockTransport::new();
        let page = page(&mock);

        assert_eq!(page.form_kind(), UploadFormKind::Nsg);
        page.select_form_kind(UploadFormKind::ImportOnly).unwrap();
        assert_eq!(page.form_kind(), UploadFormKind::ImportOnly);
    }
}
