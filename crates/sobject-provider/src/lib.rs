//! # Salesforce Provider
//!
//! Concrete resource types and data sources built on `sobject_framework`.
//!
//! - **[resources]**: [`Account`](resources::Account), [`User`](resources::User),
//!   [`UserRole`](resources::UserRole) and [`Profile`](resources::Profile) schemas.
//! - **[data_sources]**: lookups of existing records by one field.
//! - **[config]**: connection settings resolved from declarations and the environment.
//! - **[lifecycle]**: [`ProviderSystem`](lifecycle::ProviderSystem), which starts the
//!   record store and hands out reconcilers.

pub mod config;
pub mod data_sources;
pub mod lifecycle;
pub mod resources;
