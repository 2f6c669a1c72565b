//! # SObject Framework
//!
//! A reconciliation engine for records held in a remote business-object
//! store. Callers declare the configuration they want for a record; the
//! engine compares it with the state it last observed, decides per
//! attribute what the plan is, and issues the create, read, update or
//! delete call that brings the remote record in line.
//!
//! ## Architecture Overview
//!
//! Four components, leaves first:
//!
//! 1. **Identifiers** ([`id`]) - canonical 18-character identifiers and
//!    short/long equivalence.
//! 2. **Validation** ([`validator`]) - pre-flight checks on configured values.
//! 3. **Resolution** ([`resolver`]) - the ordered rule table turning
//!    `(prior, config, default)` into a plan value.
//! 4. **Reconciliation** ([`Reconciler`]) - validate, resolve, build the
//!    sparse [`Representation`], call the [`RemoteStore`], commit.
//!
//! ```text
//! config + prior state ──► Validator ──► ValueResolver ──► Plan ──► Reconciler ──► RemoteStore
//!        ▲                                                              │
//!        └───────────────────────── committed state ◄───────────────────┘
//! ```
//!
//! ## Resource Types
//!
//! A resource type is a [`ResourceSchema`] plus two small traits:
//!
//! - [`RemoteType`] - the remote record type name and external id field.
//! - [`ManagedResource`] - the schema and the [`DeleteStrategy`].
//!
//! Each attribute has an [`AttributeKind`] (`Plain`, `Identifier`,
//! `Computed`, `Boolean`) that selects its resolution rules.
//!
//! ## Remote Stores
//!
//! The engine only talks to the [`RemoteStore`] trait. This crate ships two
//! implementations built on the same request/response messages:
//!
//! - [`RecordStore`] - an in-memory store actor running in its own Tokio
//!   task, reached through the cloneable [`RecordStoreClient`].
//! - [`mock::MockStore`] - scripted replies for tests.
//!
//! ## Concurrency Model
//!
//! - A [`Reconciler`] holds no per-instance state and can be shared.
//! - Each [`ResourceInstance`] is borrowed mutably for the length of one
//!   operation, so an instance never has two remote calls in flight.
//! - Every remote call takes a [`Cancellation`]; state is merged only after a
//!   confirmed response.

pub mod actor;
pub mod cancel;
pub mod client;
pub mod error;
pub mod id;
pub mod instance;
pub mod lookup;
pub mod message;
pub mod mock;
pub mod plan;
pub mod reconciler;
pub mod representation;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod tracing;
pub mod validator;
pub mod value;

// Re-export core types for convenience
pub use actor::RecordStore;
pub use cancel::{CancelHandle, Cancellation};
pub use client::RecordStoreClient;
pub use error::{ReconcileError, StoreError};
pub use id::{ids_equivalent, normalize_id};
pub use instance::{Phase, ResourceInstance};
pub use lookup::{Lookup, LookupResult};
pub use plan::{AttributePlan, Plan};
pub use reconciler::{ReadOutcome, Reconciler, UpdateOutcome};
pub use representation::Representation;
pub use schema::{
    Attribute, AttributeKind, DeleteStrategy, ManagedResource, RemoteType, ResourceSchema,
};
pub use store::{Record, RemoteStore};
pub use validator::{ValidationRule, Violation, Violations};
pub use value::{AttributeValues, PlanValue, Value};
