//! # Tracing Setup
//!
//! Initializes structured logging for applications embedding the pipeline.
//! The sorter warns when a pass makes no progress and the runner logs each
//! batch, so wiring a subscriber up front makes dependency problems visible
//! before they become deadlock failures.

/// Install a compact fmt subscriber filtered by `RUST_LOG`.
///
/// Call once at startup. Applications with their own subscriber setup can
/// skip this entirely.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
