//! # Observability & Tracing
//!
//! Structured logging for the store and everything built on it.
//!
//! ## What Gets Traced
//!
//! - **Store lifecycle**: startup and shutdown with the final cache size
//! - **Cache operations**: lookups, merges (`Pushed merged=.. size=..`), closure checks
//! - **Remote calls**: `find` and `submit_atomic` spans with the resource type
//!   or operation count, plus failures with their status code
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run      # lifecycle, merges, state transitions
//! RUST_LOG=debug cargo run     # full queries and payloads
//! RUST_LOG=resource_store=debug cargo run
//! ```

/// Initializes the tracing subscriber.
///
/// Filtering comes from `RUST_LOG`. The compact format hides module paths;
/// events carry `kind`, `key` and `uuid` fields instead.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
