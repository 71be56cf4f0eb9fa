use crate::model::{DeviceFirmware, Modem};
use resource_store::resource_model;

resource_model! {
    /// A phone, router or other handset listed on the site.
    ///
    /// Pages address devices by `uuid`; the JSON:API `id` never appears in URLs.
    pub struct Device: "devices" {
        attributes {
            uuid: String => "uuid",
            device_name: String => "deviceName",
            model_name: String => "modelName",
            manufacturer: String => "manufacturer",
            release_date: String => "releaseDate",
        }
        has_one {
            modem: Modem => "modem",
        }
        has_many {
            device_firmwares: DeviceFirmware => "deviceFirmwares",
        }
    }
}

impl Device {
    /// "Manufacturer Name (Model)", skipping whatever is not loaded.
    pub async fn display_name(&self) -> Result<String, resource_store::StoreError> {
        let manufacturer = self.manufacturer().await?;
        let name = self.device_name().await?;
        let model = self.model_name().await?;

        let mut parts: Vec<String> = manufacturer.into_iter().chain(name).collect();
        if let Some(model) = model {
            parts.push(format!("({model})"));
        }
        Ok(parts.join(" "))
    }
}
