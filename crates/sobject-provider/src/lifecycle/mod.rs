//! # Provider Lifecycle
//!
//! Starts the record store, wires one reconciler per resource type to it, and
//! shuts everything down again.
//!
//! ## The ProviderSystem Pattern
//!
//! ```rust,ignore
//! impl ProviderSystem {
//!     pub fn new(credentials: &Credentials, buffer_size: usize) -> Self {
//!         // 1. Create the store and seed reference data before it runs
//!         let (store, client) = RecordStore::new(buffer_size);
//!         let mut store = store.refuse_delete(User::TYPE_NAME);
//!         seed_reference_data(&mut store);
//!
//!         // 2. Start the store
//!         let store_handle = tokio::spawn(store.run());
//!
//!         // 3. Every reconciler gets a clone of the same client
//!         Self {
//!             accounts: Reconciler::new(Account::new(), client.clone()),
//!             // ...
//!             handles: vec![store_handle],
//!         }
//!     }
//! }
//! ```
//!
//! ## Reference Data
//!
//! An organisation never starts empty. Before the store accepts requests it
//! holds:
//!
//! | Record type | Records |
//! |-------------|---------|
//! | `UserLicense` | [`SEEDED_LICENSES`] |
//! | `Profile` | [`SEEDED_PROFILES`], on the `SFDC` license |
//!
//! The store refuses to delete `User` records, so users are deactivated
//! through their delete strategy.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - every reconciler and the shared client
//! 2. **Store detects closure** - `receiver.recv()` returns `None`
//! 3. **Await completion** - the store logs its final record count and exits
//!
//! Any reconciler cloned out of the system keeps the store alive, so drop
//! those before calling [`ProviderSystem::shutdown`].
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the compact subscriber used by the binary:
//!
//! ```bash
//! RUST_LOG=info cargo run      # Operation outcomes
//! RUST_LOG=debug cargo run     # Store requests and plans
//! ```

mod provider_system;

pub use provider_system::*;
pub use sobject_framework::tracing::setup_tracing;
