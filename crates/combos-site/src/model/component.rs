//! Carrier components and the MIMO / modulation settings they reference.

use resource_store::resource_model;

resource_model! {
    /// One LTE carrier of a combo.
    pub struct LteComponent: "lte-components" {
        attributes {
            band: i64 => "band",
            dl_class: String => "dlClass",
            ul_class: String => "ulClass",
            component_index: i64 => "componentIndex",
        }
        has_one {}
        has_many {
            dl_mimos: Mimo => "dlMimos",
            ul_mimos: Mimo => "ulMimos",
            dl_modulations: Modulation => "dlModulations",
            ul_modulations: Modulation => "ulModulations",
        }
    }
}

resource_model! {
    /// One NR carrier of a combo.
    pub struct NrComponent: "nr-components" {
        attributes {
            band: i64 => "band",
            dl_class: String => "dlClass",
            ul_class: String => "ulClass",
            bandwidth: i64 => "bandwidth",
            subcarrier_spacing: i64 => "subcarrierSpacing",
            component_index: i64 => "componentIndex",
        }
        has_one {}
        has_many {
            dl_mimos: Mimo => "dlMimos",
            ul_mimos: Mimo => "ulMimos",
            dl_modulations: Modulation => "dlModulations",
            ul_modulations: Modulation => "ulModulations",
        }
    }
}

resource_model! {
    /// A MIMO layer count.
    pub struct Mimo: "mimos" {
        attributes {
            mimo: i64 => "mimo",
        }
        has_one {}
        has_many {}
    }
}

resource_model! {
    /// A modulation scheme, e.g. `qam256`.
    pub struct Modulation: "modulations" {
        attributes {
            modulation: String => "modulation",
        }
        has_one {}
        has_many {}
    }
}
