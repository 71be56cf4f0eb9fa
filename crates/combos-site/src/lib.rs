//! # Combos Site
//!
//! Data layer of the combos catalogue: device pages that show carrier
//! aggregation combos, and admin pages that edit modems and upload combos.
//!
//! ## Core Components
//!
//! - **[model]**: typed views over cached JSON:API records (devices,
//!   firmwares, capability sets, combos, components).
//! - **[loaders]**: [`PageLoader`](loaders::PageLoader), which fetches one
//!   record plus its relationship closure with cancellation.
//! - **[forms]**: validation and atomic-operations submission.
//! - **[pages]**: the pages built on top of loaders and forms.
//! - **[lifecycle]**: [`ComboSite`](lifecycle::ComboSite), which wires a
//!   session together.
//!
//! ## Testing
//!
//! Everything runs against [`MockTransport`](resource_store::mock::MockTransport)
//! in tests; see `tests/` for end-to-end flows.

pub mod config;
pub mod forms;
pub mod lifecycle;
pub mod loaders;
pub mod model;
pub mod notify;
pub mod pages;
pub mod preferences;
