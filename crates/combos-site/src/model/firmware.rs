use crate::model::{CapabilitySet, Device};
use resource_store::resource_model;

resource_model! {
    /// A firmware build of a device. Capability sets hang off firmwares.
    pub struct DeviceFirmware: "device-firmwares" {
        attributes {
            uuid: String => "uuid",
            name: String => "name",
        }
        has_one {
            device: Device => "device",
        }
        has_many {
            capability_sets: CapabilitySet => "capabilitySets",
        }
    }
}
