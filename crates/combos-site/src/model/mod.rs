//! Resource models for the combos catalogue.
//!
//! Each model is a typed view over a cached record, declared with
//! [`resource_model!`](resource_store::resource_model). Instances come from
//! the store (`find`, `get_first_by`, relationship accessors), never from
//! application code.

pub mod capability_set;
pub mod combo;
pub mod component;
pub mod device;
pub mod firmware;
pub mod modem;

pub use capability_set::*;
pub use combo::*;
pub use component::*;
pub use device::*;
pub use firmware::*;
pub use modem::*;
