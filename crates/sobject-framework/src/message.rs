//! # Store Messages
//!
//! The requests a [`RecordStoreClient`](crate::client::RecordStoreClient)
//! sends to the [`RecordStore`](crate::actor::RecordStore) actor. Each request
//! carries a one-shot channel for its reply.

use crate::error::StoreError;
use crate::representation::Representation;
use crate::store::Record;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum StoreRequest {
    Insert {
        type_name: String,
        fields: Representation,
        respond_to: Response<String>,
    },
    Get {
        type_name: String,
        id: String,
        fields: Option<Vec<String>>,
        respond_to: Response<Representation>,
    },
    Update {
        type_name: String,
        id: String,
        fields: Representation,
        respond_to: Response<()>,
    },
    Delete {
        type_name: String,
        id: String,
        respond_to: Response<()>,
    },
    Query {
        type_name: String,
        field: String,
        value: String,
        respond_to: Response<Vec<Record>>,
    },
}
