//! # Record Store Client
//!
//! The handle through which reconcilers reach the in-memory
//! [`RecordStore`](crate::actor::RecordStore). It holds only a channel sender,
//! so cloning is cheap and clones can be shared across tasks freely.

use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::representation::Representation;
use crate::store::{Record, RemoteStore};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

#[derive(Clone)]
pub struct RecordStoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl RecordStoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn send<T>(
        &self,
        request: impl FnOnce(oneshot::Sender<Result<T, StoreError>>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }
}

#[async_trait]
impl RemoteStore for RecordStoreClient {
    async fn insert(&self, type_name: &str, fields: Representation) -> Result<String, StoreError> {
        self.send(|respond_to| StoreRequest::Insert {
            type_name: type_name.to_string(),
            fields,
            respond_to,
        })
        .await
    }

    async fn get(
        &self,
        type_name: &str,
        id: &str,
        fields: Option<&[&str]>,
    ) -> Result<Representation, StoreError> {
        let fields = fields.map(|f| f.iter().map(|s| s.to_string()).collect());
        self.send(|respond_to| StoreRequest::Get {
            type_name: type_name.to_string(),
            id: id.to_string(),
            fields,
            respond_to,
        })
        .await
    }

    async fn update(
        &self,
        type_name: &str,
        id: &str,
        fields: Representation,
    ) -> Result<(), StoreError> {
        self.send(|respond_to| StoreRequest::Update {
            type_name: type_name.to_string(),
            id: id.to_string(),
            fields,
            respond_to,
        })
        .await
    }

    async fn delete(&self, type_name: &str, id: &str) -> Result<(), StoreError> {
        self.send(|respond_to| StoreRequest::Delete {
            type_name: type_name.to_string(),
            id: id.to_string(),
            respond_to,
        })
        .await
    }

    async fn query(
        &self,
        type_name: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Record>, StoreError> {
        self.send(|respond_to| StoreRequest::Query {
            type_name: type_name.to_string(),
            field: field.to_string(),
            value: value.to_string(),
            respond_to,
        })
        .await
    }
}
