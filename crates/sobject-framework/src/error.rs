//! # Errors
//!
//! Two layers of errors:
//! - [`StoreError`] is what a [`RemoteStore`](crate::store::RemoteStore) reports.
//! - [`ReconcileError`] is what the reconciler reports to the host.
//!
//! A remote not-found is not an error for the reconciler: it drives the
//! `Removed` transition on read and counts as success on delete. Every other
//! store failure is surfaced verbatim and leaves tracked state untouched.

use crate::validator::Violations;

/// Errors raised at the remote store boundary.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store closed")]
    Closed,
    #[error("Store dropped response channel")]
    Dropped,
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Remote(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Errors surfaced by the reconciler.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Invalid configuration: {0}")]
    Validation(Violations),

    /// Remote failure, e.g. `Error Inserting Account: <message>`.
    #[error("Error {operation} {remote_type}: {message}")]
    Remote {
        operation: &'static str,
        remote_type: &'static str,
        message: String,
    },

    #[error("Operation cancelled")]
    Cancelled,

    /// A write-required attribute is still unknown after resolution. This
    /// is a schema or host bug; nothing is sent.
    #[error("Attribute {attribute} must be known before it can be written")]
    ResolutionInconsistency { attribute: String },

    #[error("Resource has no identifier; it has not been created")]
    MissingIdentifier,

    #[error("Resource already exists with identifier {0}")]
    IdentifierAlreadySet(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The attribute cannot be changed in place; the host has to destroy
    /// the record and create a new one. Nothing is sent or committed.
    #[error("Attribute {attribute} cannot be changed without replacing the resource")]
    RequiresReplacement { attribute: String },

    #[error("{actual} instance passed to the {expected} reconciler")]
    WrongRemoteType {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Error Getting {remote_type}: No {remote_type} where {filter}")]
    LookupEmpty {
        remote_type: &'static str,
        filter: String,
    },
}

impl ReconcileError {
    pub(crate) fn remote(operation: &'static str, remote_type: &'static str, err: StoreError) -> Self {
        ReconcileError::Remote {
            operation,
            remote_type,
            message: err.to_string(),
        }
    }
}
