//! # Tracing Setup
//!
//! Every reconciler operation runs in a span carrying the remote type and,
//! once known, the record identifier:
//!
//! ```text
//! INFO create{remote_type="Account"}: Created id=001000000000001AAA
//! WARN read{remote_type="Account" id="001000000000001AAA"}: Not found, removing from state
//! INFO update{remote_type="Account" id="001000000000001AAA"}: Updated changed=1
//! ```
//!
//! Verbosity follows `RUST_LOG`:
//! - `RUST_LOG=info` shows transitions (`Created`, `Updated`, `Deleted`) and warnings.
//! - `RUST_LOG=debug` adds the representations sent to and read from the store.
//! - `RUST_LOG=sobject_framework=debug` limits debug output to the engine.

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Call once at program start; a second call panics.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
