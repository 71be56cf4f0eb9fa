//! # Pages
//!
//! Data-bearing pages of the site. Each page owns its [`PageLoader`]s and
//! turns their state into what a view renders: a title, an inline message,
//! a redirect or the loaded models.
//!
//! [`PageLoader`]: crate::loaders::PageLoader

pub mod capability_set;
pub mod modem_editor;
pub mod upload;

pub use capability_set::*;
pub use modem_editor::*;
pub use upload::*;

/// Notice posted after any successful admin save.
pub const SAVED_MESSAGE: &str = "Changes saved successfully!";
