//! # In-Memory Record Store
//!
//! `RecordStore` is an actor that plays the remote record store for demos and
//! end-to-end tests. It owns the records and processes requests sequentially
//! in its own Tokio task, so the record map needs no locking. Reconcilers
//! talk to it through the cloneable [`RecordStoreClient`].
//!
//! Behaviour mirrors the real store where the engine depends on it:
//! - Identifiers are 15 characters (a 3-character type prefix and a counter)
//!   returned in their 18-character canonical form; lookups accept either.
//! - `get` with a field selector returns only those fields.
//! - `update` merges the sparse fields into the stored record.
//! - `insert` stamps a `CreatedDate` field.
//! - Types registered with [`RecordStore::refuse_delete`] reject deletes.
//!
//! ```rust
//! use sobject_framework::{RecordStore, RemoteStore, Representation};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (store, client) = RecordStore::new(10);
//!     tokio::spawn(store.run());
//!
//!     let id = client
//!         .insert("Account", Representation::new().with("Name", "Acme"))
//!         .await
//!         .unwrap();
//!     assert_eq!(id.len(), 18);
//!
//!     let fields = client.get("Account", &id, Some(&["Name"])).await.unwrap();
//!     assert_eq!(fields, Representation::new().with("Name", "Acme"));
//! }
//! ```

use crate::client::RecordStoreClient;
use crate::error::StoreError;
use crate::id::normalize_id;
use crate::message::StoreRequest;
use crate::representation::Representation;
use crate::store::Record;
use chrono::{SecondsFormat, Utc};
use std::collections::{BTreeMap, HashSet};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const CREATED_DATE_FIELD: &str = "CreatedDate";

#[derive(Debug, Clone)]
struct StoredRecord {
    type_name: String,
    fields: Representation,
}

pub struct RecordStore {
    receiver: mpsc::Receiver<StoreRequest>,
    records: BTreeMap<String, StoredRecord>,
    refuse_delete: HashSet<String>,
    next_id: u64,
}

/// The 3-character key prefix used for identifiers of `type_name`.
fn key_prefix(type_name: &str) -> &'static str {
    match type_name {
        "Account" => "001",
        "User" => "005",
        "UserRole" => "00E",
        "Profile" => "00e",
        "UserLicense" => "100",
        _ => "a00",
    }
}

impl RecordStore {
    /// Creates the store actor and its client.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait for
    /// space when it is full.
    pub fn new(buffer_size: usize) -> (Self, RecordStoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            records: BTreeMap::new(),
            refuse_delete: HashSet::new(),
            next_id: 1,
        };
        (store, RecordStoreClient::new(sender))
    }

    /// Rejects remote deletes for records of `type_name`.
    pub fn refuse_delete(mut self, type_name: &str) -> Self {
        self.refuse_delete.insert(type_name.to_string());
        self
    }

    /// Adds a record before the actor starts, e.g. reference data such as
    /// user licenses. Returns its canonical identifier.
    pub fn seed(&mut self, type_name: &str, fields: Representation) -> String {
        self.store(type_name, fields)
    }

    fn store(&mut self, type_name: &str, mut fields: Representation) -> String {
        let short = format!("{}{:012}", key_prefix(type_name), self.next_id);
        self.next_id += 1;
        let id = normalize_id(&short);
        fields.insert(
            CREATED_DATE_FIELD,
            Utc::now()
                .to_rfc3339_opts(SecondsFormat::Millis, true)
                .into(),
        );
        self.records.insert(
            id.clone(),
            StoredRecord {
                type_name: type_name.to_string(),
                fields,
            },
        );
        id
    }

    fn lookup(&self, type_name: &str, id: &str) -> Result<&StoredRecord, StoreError> {
        self.records
            .get(&normalize_id(id))
            .filter(|r| r.type_name == type_name)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Runs the request loop until every client has been dropped.
    pub async fn run(mut self) {
        info!(records = self.records.len(), "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Insert {
                    type_name,
                    fields,
                    respond_to,
                } => {
                    debug!(%type_name, ?fields, "Insert");
                    if fields.is_empty() {
                        warn!(%type_name, "Insert rejected");
                        let _ = respond_to.send(Err(StoreError::Remote(
                            "REQUIRED_FIELD_MISSING: no fields supplied".to_string(),
                        )));
                        continue;
                    }
                    let id = self.store(&type_name, fields);
                    info!(%type_name, %id, size = self.records.len(), "Inserted");
                    let _ = respond_to.send(Ok(id));
                }
                StoreRequest::Get {
                    type_name,
                    id,
                    fields,
                    respond_to,
                } => {
                    let result = self.lookup(&type_name, &id).map(|record| match &fields {
                        Some(selected) => {
                            let selected: Vec<&str> = selected.iter().map(String::as_str).collect();
                            record.fields.select(&selected)
                        }
                        None => record.fields.clone(),
                    });
                    debug!(%type_name, %id, found = result.is_ok(), "Get");
                    let _ = respond_to.send(result);
                }
                StoreRequest::Update {
                    type_name,
                    id,
                    fields,
                    respond_to,
                } => {
                    debug!(%type_name, %id, ?fields, "Update");
                    let key = normalize_id(&id);
                    match self.records.get_mut(&key).filter(|r| r.type_name == type_name) {
                        Some(record) => {
                            record.fields.merge(fields);
                            info!(%type_name, %id, "Updated");
                            let _ = respond_to.send(Ok(()));
                        }
                        None => {
                            warn!(%type_name, %id, "Not found");
                            let _ = respond_to.send(Err(StoreError::NotFound(id)));
                        }
                    }
                }
                StoreRequest::Delete {
                    type_name,
                    id,
                    respond_to,
                } => {
                    debug!(%type_name, %id, "Delete");
                    if self.refuse_delete.contains(&type_name) {
                        warn!(%type_name, %id, "Delete refused");
                        let _ = respond_to.send(Err(StoreError::Remote(format!(
                            "DELETE_FAILED: {} records cannot be deleted",
                            type_name
                        ))));
                        continue;
                    }
                    if self.lookup(&type_name, &id).is_err() {
                        warn!(%type_name, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id)));
                        continue;
                    }
                    self.records.remove(&normalize_id(&id));
                    info!(%type_name, %id, size = self.records.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                StoreRequest::Query {
                    type_name,
                    field,
                    value,
                    respond_to,
                } => {
                    let matches: Vec<Record> = self
                        .records
                        .iter()
                        .filter(|(_, r)| r.type_name == type_name)
                        .filter(|(_, r)| r.fields.get(&field).and_then(|v| v.as_str()) == Some(value.as_str()))
                        .map(|(id, r)| Record {
                            id: id.clone(),
                            fields: r.fields.clone(),
                        })
                        .collect();
                    debug!(%type_name, %field, count = matches.len(), "Query");
                    let _ = respond_to.send(Ok(matches));
                }
            }
        }

        info!(records = self.records.len(), "Shutdown");
    }
}
