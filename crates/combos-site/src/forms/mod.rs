//! # Admin Forms
//!
//! Every admin form follows the same path: validate locally, assemble an
//! atomic-operations request, hand it to the [`AtomicSubmitter`]. A form
//! that fails validation never reaches the network.

pub mod error;
pub mod modem_form;
pub mod submit;
pub mod upload;

pub use error::*;
pub use modem_form::*;
pub use submit::*;
pub use upload::*;
