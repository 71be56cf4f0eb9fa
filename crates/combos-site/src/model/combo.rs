use crate::model::{CapabilitySet, LteComponent, NrComponent};
use resource_store::resource_model;

resource_model! {
    /// A set of carrier components usable at the same time.
    pub struct Combo: "combos" {
        attributes {
            combo_string: String => "comboString",
        }
        has_one {
            capability_set: CapabilitySet => "capabilitySet",
        }
        has_many {
            lte_components: LteComponent => "lteComponents",
            nr_components: NrComponent => "nrComponents",
        }
    }
}
