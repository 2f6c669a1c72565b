//! # Remote Store Boundary
//!
//! The interface the reconciler consumes to reach the remote record store.
//! Transport, authentication and retries live behind it; the engine issues
//! exactly one call at a time per resource instance and never retries.
//!
//! Implementations in this crate:
//! - [`RecordStoreClient`](crate::client::RecordStoreClient): a handle to the
//!   in-memory store actor.
//! - [`MockStore`](crate::mock::MockStore): scripted responses for tests.
//!
//! A store handle is set up once and then shared read-only by every
//! reconciler; implementations must be cheap to clone and safe to call
//! concurrently.

use crate::error::StoreError;
use crate::representation::Representation;
use async_trait::async_trait;

/// One record returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub fields: Representation,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Inserts a record and returns its new identifier.
    async fn insert(&self, type_name: &str, fields: Representation) -> Result<String, StoreError>;

    /// Fetches a record. `fields` limits the returned fields; `None` returns
    /// all of them. Fails with [`StoreError::NotFound`] when the record is gone.
    async fn get(
        &self,
        type_name: &str,
        id: &str,
        fields: Option<&[&str]>,
    ) -> Result<Representation, StoreError>;

    /// Applies a sparse update. Fields absent from `fields` are untouched.
    async fn update(&self, type_name: &str, id: &str, fields: Representation)
        -> Result<(), StoreError>;

    async fn delete(&self, type_name: &str, id: &str) -> Result<(), StoreError>;

    /// Returns the records of `type_name` whose `field` equals `value`.
    async fn query(&self, type_name: &str, field: &str, value: &str)
        -> Result<Vec<Record>, StoreError>;
}
