use crate::model::Device;
use resource_store::resource_model;

resource_model! {
    /// A modem (baseband) shared by many devices.
    pub struct Modem: "modems" {
        attributes {
            uuid: String => "uuid",
            name: String => "name",
        }
        has_one {}
        has_many {
            devices: Device => "devices",
        }
    }
}
