//! # Scripted Mock Store
//!
//! `MockStore` answers store requests from a FIFO queue of expectations
//! instead of keeping records. It hands out an ordinary
//! [`RecordStoreClient`], so code under test cannot tell it apart from the
//! in-memory store actor.
//!
//! | Feature | MockStore | RecordStore actor |
//! |---------|-----------|-------------------|
//! | **State** | None (scripted replies) | Real records |
//! | **Error injection** | `return_err` on any call | Only what the store itself refuses |
//! | **Cancellation tests** | `hang` keeps a call pending forever | Not possible |
//! | **Use case** | Reconciler decisions and payloads | End-to-end flows |
//!
//! ```rust
//! use sobject_framework::mock::{Call, MockStore};
//! use sobject_framework::{RemoteStore, Representation, StoreError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockStore::new();
//!     mock.expect_insert("Account").return_ok("001000000000001AAA".to_string());
//!     mock.expect_get("Account", "001000000000001AAA")
//!         .return_err(StoreError::NotFound("001000000000001AAA".into()));
//!
//!     let client = mock.client();
//!     let id = client
//!         .insert("Account", Representation::new().with("Name", "Acme"))
//!         .await
//!         .unwrap();
//!     assert!(client.get("Account", &id, None).await.unwrap_err().is_not_found());
//!
//!     assert!(matches!(mock.calls()[0], Call::Insert { .. }));
//!     mock.verify();
//! }
//! ```
//!
//! A request that does not match the next expectation (wrong operation, type
//! or identifier) is answered with [`StoreError::Remote`] and reported by
//! [`MockStore::verify`].

use crate::client::RecordStoreClient;
use crate::error::StoreError;
use crate::id::ids_equivalent;
use crate::message::StoreRequest;
use crate::representation::Representation;
use crate::store::Record;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

/// A request as the mock received it.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Insert {
        type_name: String,
        fields: Representation,
    },
    Get {
        type_name: String,
        id: String,
        fields: Option<Vec<String>>,
    },
    Update {
        type_name: String,
        id: String,
        fields: Representation,
    },
    Delete {
        type_name: String,
        id: String,
    },
    Query {
        type_name: String,
        field: String,
        value: String,
    },
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::Insert { type_name, .. } => write!(f, "insert {}", type_name),
            Call::Get { type_name, id, .. } => write!(f, "get {} {}", type_name, id),
            Call::Update { type_name, id, .. } => write!(f, "update {} {}", type_name, id),
            Call::Delete { type_name, id } => write!(f, "delete {} {}", type_name, id),
            Call::Query {
                type_name,
                field,
                value,
            } => write!(f, "query {} {} = {}", type_name, field, value),
        }
    }
}

enum Reply<T> {
    Respond(Result<T, StoreError>),
    Hang,
}

enum Expectation {
    Insert {
        type_name: String,
        reply: Reply<String>,
    },
    Get {
        type_name: String,
        id: String,
        reply: Reply<Representation>,
    },
    Update {
        type_name: String,
        id: String,
        reply: Reply<()>,
    },
    Delete {
        type_name: String,
        id: String,
        reply: Reply<()>,
    },
    Query {
        type_name: String,
        reply: Reply<Vec<Record>>,
    },
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<Call>,
    failures: Vec<String>,
    // Requests whose expectation was `hang`; kept so their callers stay pending.
    hung: Vec<StoreRequest>,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct MockStore {
    client: RecordStoreClient,
    state: Arc<Mutex<MockState>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Creates a mock with no expectations. Must be called inside a Tokio
    /// runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest>(100);
        let state = Arc::new(Mutex::new(MockState::default()));
        let task_state = state.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let mut state = lock(&task_state);
                let call = record(&request);
                state.calls.push(call.clone());
                let expectation = state.expectations.pop_front();
                if let Some(request) = answer(request, expectation, &call, &mut state.failures) {
                    state.hung.push(request);
                }
            }
        });

        Self {
            client: RecordStoreClient::new(sender),
            state,
            _handle: handle,
        }
    }

    pub fn client(&self) -> RecordStoreClient {
        self.client.clone()
    }

    pub fn expect_insert(&self, type_name: &str) -> ExpectationBuilder<String> {
        let type_name = type_name.to_string();
        self.builder(move |reply| Expectation::Insert { type_name, reply })
    }

    pub fn expect_get(&self, type_name: &str, id: &str) -> ExpectationBuilder<Representation> {
        let (type_name, id) = (type_name.to_string(), id.to_string());
        self.builder(move |reply| Expectation::Get {
            type_name,
            id,
            reply,
        })
    }

    pub fn expect_update(&self, type_name: &str, id: &str) -> ExpectationBuilder<()> {
        let (type_name, id) = (type_name.to_string(), id.to_string());
        self.builder(move |reply| Expectation::Update {
            type_name,
            id,
            reply,
        })
    }

    pub fn expect_delete(&self, type_name: &str, id: &str) -> ExpectationBuilder<()> {
        let (type_name, id) = (type_name.to_string(), id.to_string());
        self.builder(move |reply| Expectation::Delete {
            type_name,
            id,
            reply,
        })
    }

    pub fn expect_query(&self, type_name: &str) -> ExpectationBuilder<Vec<Record>> {
        let type_name = type_name.to_string();
        self.builder(move |reply| Expectation::Query { type_name, reply })
    }

    fn builder<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> Expectation + Send + 'static,
    ) -> ExpectationBuilder<T> {
        ExpectationBuilder {
            state: self.state.clone(),
            make: Box::new(make),
        }
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.state).calls.clone()
    }

    /// Panics if an expectation is still queued or a request did not match.
    pub fn verify(&self) {
        let state = lock(&self.state);
        if !state.failures.is_empty() {
            panic!("Unexpected requests: {}", state.failures.join("; "));
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

/// Completes one queued expectation.
pub struct ExpectationBuilder<T> {
    state: Arc<Mutex<MockState>>,
    make: Box<dyn FnOnce(Reply<T>) -> Expectation + Send>,
}

impl<T> ExpectationBuilder<T> {
    pub fn return_ok(self, value: T) {
        self.push(Reply::Respond(Ok(value)));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Reply::Respond(Err(error)));
    }

    /// Never answers; the caller stays pending until it gives up.
    pub fn hang(self) {
        self.push(Reply::Hang);
    }

    fn push(self, reply: Reply<T>) {
        let expectation = (self.make)(reply);
        lock(&self.state).expectations.push_back(expectation);
    }
}

fn record(request: &StoreRequest) -> Call {
    match request {
        StoreRequest::Insert {
            type_name, fields, ..
        } => Call::Insert {
            type_name: type_name.clone(),
            fields: fields.clone(),
        },
        StoreRequest::Get {
            type_name,
            id,
            fields,
            ..
        } => Call::Get {
            type_name: type_name.clone(),
            id: id.clone(),
            fields: fields.clone(),
        },
        StoreRequest::Update {
            type_name,
            id,
            fields,
            ..
        } => Call::Update {
            type_name: type_name.clone(),
            id: id.clone(),
            fields: fields.clone(),
        },
        StoreRequest::Delete { type_name, id, .. } => Call::Delete {
            type_name: type_name.clone(),
            id: id.clone(),
        },
        StoreRequest::Query {
            type_name,
            field,
            value,
            ..
        } => Call::Query {
            type_name: type_name.clone(),
            field: field.clone(),
            value: value.clone(),
        },
    }
}

/// Sends the scripted reply. Returns the request back when it must hang.
fn answer(
    request: StoreRequest,
    expectation: Option<Expectation>,
    call: &Call,
    failures: &mut Vec<String>,
) -> Option<StoreRequest> {
    macro_rules! reply {
        ($reply:expr, $respond_to:expr, $request:expr) => {
            match $reply {
                Reply::Respond(response) => {
                    let _ = $respond_to.send(response);
                    None
                }
                Reply::Hang => Some($request),
            }
        };
    }

    match (request, expectation) {
        (
            StoreRequest::Insert {
                type_name,
                fields,
                respond_to,
            },
            Some(Expectation::Insert {
                type_name: expected,
                reply,
            }),
        ) if type_name == expected => reply!(
            reply,
            respond_to,
            StoreRequest::Insert {
                type_name,
                fields,
                respond_to
            }
        ),
        (
            StoreRequest::Get {
                type_name,
                id,
                fields,
                respond_to,
            },
            Some(Expectation::Get {
                type_name: expected,
                id: expected_id,
                reply,
            }),
        ) if type_name == expected && ids_equivalent(&id, &expected_id) => reply!(
            reply,
            respond_to,
            StoreRequest::Get {
                type_name,
                id,
                fields,
                respond_to
            }
        ),
        (
            StoreRequest::Update {
                type_name,
                id,
                fields,
                respond_to,
            },
            Some(Expectation::Update {
                type_name: expected,
                id: expected_id,
                reply,
            }),
        ) if type_name == expected && ids_equivalent(&id, &expected_id) => reply!(
            reply,
            respond_to,
            StoreRequest::Update {
                type_name,
                id,
                fields,
                respond_to
            }
        ),
        (
            StoreRequest::Delete {
                type_name,
                id,
                respond_to,
            },
            Some(Expectation::Delete {
                type_name: expected,
                id: expected_id,
                reply,
            }),
        ) if type_name == expected && ids_equivalent(&id, &expected_id) => reply!(
            reply,
            respond_to,
            StoreRequest::Delete {
                type_name,
                id,
                respond_to
            }
        ),
        (
            StoreRequest::Query {
                type_name,
                field,
                value,
                respond_to,
            },
            Some(Expectation::Query {
                type_name: expected,
                reply,
            }),
        ) if type_name == expected => reply!(
            reply,
            respond_to,
            StoreRequest::Query {
                type_name,
                field,
                value,
                respond_to
            }
        ),
        (request, _) => {
            let message = format!("unexpected request: {}", call);
            failures.push(message.clone());
            reject(request, StoreError::Remote(message));
            None
        }
    }
}

fn reject(request: StoreRequest, error: StoreError) {
    match request {
        StoreRequest::Insert { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
        StoreRequest::Get { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
        StoreRequest::Update { respond_to, .. } | StoreRequest::Delete { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
        StoreRequest::Query { respond_to, .. } => {
            let _ = respond_to.send(Err(error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RemoteStore;
    use std::time::Duration;

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let mock = MockStore::new();
        mock.expect_insert("Account").return_ok("001000000000001AAA".into());
        mock.expect_update("Account", "001000000000001").return_ok(());
        mock.expect_delete("Account", "001000000000001AAA")
            .return_err(StoreError::Remote("DELETE_FAILED".into()));

        let client = mock.client();
        let id = client
            .insert("Account", Representation::new().with("Name", "Acme"))
            .await
            .unwrap();
        client
            .update("Account", &id, Representation::new().with("Phone", "1"))
            .await
            .unwrap();
        assert_eq!(
            client.delete("Account", &id).await,
            Err(StoreError::Remote("DELETE_FAILED".into()))
        );

        assert_eq!(
            mock.calls()[1],
            Call::Update {
                type_name: "Account".into(),
                id: id.clone(),
                fields: Representation::new().with("Phone", "1"),
            }
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_query_expectation() {
        let mock = MockStore::new();
        let record = Record {
            id: "00e000000000001AAA".into(),
            fields: Representation::new().with("Name", "Standard User"),
        };
        mock.expect_query("Profile").return_ok(vec![record.clone()]);

        let records = mock
            .client()
            .query("Profile", "Name", "Standard User")
            .await
            .unwrap();
        assert_eq!(records, vec![record]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_hang_keeps_call_pending() {
        let mock = MockStore::new();
        mock.expect_get("Account", "001000000000001AAA").hang();

        let client = mock.client();
        let pending = tokio::time::timeout(
            Duration::from_millis(20),
            client.get("Account", "001000000000001AAA", None),
        )
        .await;
        assert!(pending.is_err());
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected requests")]
    async fn test_mismatch_is_reported() {
        let mock = MockStore::new();
        mock.expect_get("Account", "001000000000001AAA").return_ok(Representation::new());

        let result = mock.client().delete("Account", "001000000000001AAA").await;
        assert!(matches!(result, Err(StoreError::Remote(_))));
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_unmet_expectation_is_reported() {
        let mock = MockStore::new();
        mock.expect_delete("Account", "001000000000001AAA").return_ok(());
        mock.verify();
    }
}
