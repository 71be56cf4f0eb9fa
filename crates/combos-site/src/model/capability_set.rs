use crate::model::{Combo, DeviceFirmware};
use resource_store::resource_model;

resource_model! {
    /// The combos a firmware reports for one network configuration.
    pub struct CapabilitySet: "capability-sets" {
        attributes {
            uuid: String => "uuid",
            description: String => "description",
            plmn: String => "plmn",
        }
        has_one {
            device_firmware: DeviceFirmware => "deviceFirmware",
        }
        has_many {
            combos: Combo => "combos",
        }
    }
}
