//! # Resource Reconciler
//!
//! Drives one [`ResourceInstance`] towards its configuration:
//!
//! ```text
//! config ──► validate ──► resolve ──► Plan ──► remote call ──► commit
//!              │                                  │
//!              └─ Violations                      └─ ReconcileError (state untouched)
//! ```
//!
//! A `Reconciler` pairs one [`ManagedResource`] type with a shared
//! [`RemoteStore`] handle. It holds no per-instance state, so one reconciler
//! can serve many instances concurrently; each instance is passed in by
//! `&mut`, which also guarantees at most one outstanding remote call per
//! instance.
//!
//! ## Guarantees
//! - State is committed only after the remote store confirmed the call. A
//!   failed or cancelled call leaves identifier, state and phase as they
//!   were.
//! - A remote not-found on read is a `Removed` transition, on delete it is
//!   success. Everything else is surfaced as [`ReconcileError::Remote`].
//! - Nothing is retried.
//!
//! ## Example
//! ```rust
//! use sobject_framework::{
//!     Attribute, AttributeValues, Cancellation, ManagedResource, RecordStore, Reconciler,
//!     RemoteType, ResourceInstance, ResourceSchema,
//! };
//!
//! struct Account {
//!     schema: ResourceSchema,
//! }
//!
//! impl RemoteType for Account {
//!     fn type_name(&self) -> &'static str {
//!         "Account"
//!     }
//! }
//!
//! impl ManagedResource for Account {
//!     fn schema(&self) -> &ResourceSchema {
//!         &self.schema
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (store, client) = RecordStore::new(10);
//!     tokio::spawn(store.run());
//!
//!     let account = Account {
//!         schema: ResourceSchema::new("An account").with(Attribute::plain("name", "Name").required()),
//!     };
//!     let reconciler = Reconciler::new(account, client);
//!
//!     let mut instance = ResourceInstance::new("Account");
//!     let config = AttributeValues::new().with("name", "Acme");
//!     reconciler.create(&mut instance, &config, &Cancellation::none()).await.unwrap();
//!     assert!(instance.identifier().is_some());
//! }
//! ```

use crate::cancel::Cancellation;
use crate::error::{ReconcileError, StoreError};
use crate::id::normalize_id;
use crate::instance::{Phase, ResourceInstance};
use crate::plan::{AttributePlan, Plan};
use crate::representation::Representation;
use crate::resolver::{canonicalize, observe, resolve};
use crate::schema::{DeleteStrategy, ManagedResource, ResourceSchema};
use crate::store::RemoteStore;
use crate::validator::{validate, Violation, Violations};
use crate::value::{AttributeValues, PlanValue};
use tracing::{debug, info, instrument, warn};

/// Result of [`Reconciler::read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Refreshed,
    /// The record no longer exists remotely and was dropped from tracking.
    Removed,
}

/// Result of [`Reconciler::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// Nothing differed from prior state; no remote call was made.
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct Reconciler<R, S> {
    resource: R,
    store: S,
}

impl<R, S> Reconciler<R, S>
where
    R: ManagedResource,
{
    pub fn new(resource: R, store: S) -> Self {
        Self { resource, store }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    fn schema(&self) -> &ResourceSchema {
        self.resource.schema()
    }

    fn type_name(&self) -> &'static str {
        self.resource.type_name()
    }

    /// Checks a configuration against the schema and its validation rules.
    pub fn validate(&self, config: &AttributeValues) -> Result<(), ReconcileError> {
        let schema = self.schema();
        if let Some(name) = config.names().find(|name| schema.attribute(name).is_none()) {
            return Err(ReconcileError::UnknownAttribute(name.to_string()));
        }

        let mut violations = Vec::new();
        for attr in schema.attributes() {
            let value = config.get(attr.name);
            if attr.required && value.is_null() {
                violations.push(Violation::new(
                    attr.name,
                    "Missing required attribute",
                    format!("The attribute \"{}\" is required.", attr.name),
                ));
                continue;
            }
            if attr.is_computed() && !value.is_null() {
                violations.push(Violation::new(
                    attr.name,
                    "Computed attribute",
                    "Value is assigned by the remote store.",
                ));
                continue;
            }
            violations.extend(validate(attr.name, value, &attr.validators));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ReconcileError::Validation(Violations(violations)))
        }
    }

    /// Validates `config` and resolves every attribute against the
    /// instance's prior state. Records `Validated` and `Resolved` on the
    /// instance.
    pub fn plan(
        &self,
        instance: &mut ResourceInstance,
        config: &AttributeValues,
    ) -> Result<Plan, ReconcileError> {
        self.validate(config)?;
        instance.set_phase(Phase::Validated);

        let prior = instance.state();
        let attributes = self
            .schema()
            .attributes()
            .iter()
            .map(|attr| {
                let prior = prior.get(attr.name).clone();
                let config = config.get(attr.name).clone();
                let resolved = resolve(attr, &prior, &config);
                AttributePlan {
                    name: attr.name,
                    prior,
                    config,
                    default: attr.default.clone(),
                    resolved,
                }
            })
            .collect();

        instance.set_phase(Phase::Resolved);
        Ok(Plan::new(attributes))
    }

    /// The state to store after a confirmed write: identifiers in canonical
    /// form, and on create, computed attributes not yet observed marked
    /// unknown until the next read.
    fn committed(&self, resolved: &AttributeValues, created: bool) -> AttributeValues {
        self.schema()
            .attributes()
            .iter()
            .map(|attr| {
                let value = resolved.get(attr.name).clone();
                let value = if created && attr.is_computed() && value.is_null() {
                    PlanValue::Unknown
                } else {
                    canonicalize(attr, value)
                };
                (attr.name.to_string(), value)
            })
            .collect()
    }

    fn check_type(&self, instance: &ResourceInstance) -> Result<(), ReconcileError> {
        if instance.remote_type() == self.type_name() {
            Ok(())
        } else {
            Err(ReconcileError::WrongRemoteType {
                expected: self.type_name(),
                actual: instance.remote_type(),
            })
        }
    }

    fn remote_error(&self, operation: &'static str, err: StoreError) -> ReconcileError {
        warn!(operation, error = %err, "Remote call failed");
        ReconcileError::remote(operation, self.type_name(), err)
    }
}

impl<R, S> Reconciler<R, S>
where
    R: ManagedResource,
    S: RemoteStore,
{
    /// Inserts a new remote record for `config`.
    #[instrument(skip_all, fields(remote_type = self.type_name()))]
    pub async fn create(
        &self,
        instance: &mut ResourceInstance,
        config: &AttributeValues,
        cancel: &Cancellation,
    ) -> Result<(), ReconcileError> {
        self.check_type(instance)?;
        if let Some(id) = instance.identifier() {
            return Err(ReconcileError::IdentifierAlreadySet(id.to_string()));
        }
        let entry_phase = instance.phase();
        let plan = self.plan(instance, config)?;
        if let Some(attr) = plan.unresolved_required(self.schema()).next() {
            instance.set_phase(entry_phase);
            return Err(ReconcileError::ResolutionInconsistency {
                attribute: attr.name.to_string(),
            });
        }

        let schema = self.schema();
        let resolved = plan.resolved();
        let representation = Representation::from_values(schema, &resolved, |name| {
            schema.attribute(name).is_some_and(|a| !a.is_computed())
        });
        debug!(?representation, "Inserting");

        let result = cancel
            .guard(self.store.insert(self.type_name(), representation))
            .await
            .and_then(|r| r.map_err(|e| self.remote_error("Inserting", e)));
        let id = match result {
            Ok(id) => normalize_id(&id),
            Err(e) => {
                instance.set_phase(entry_phase);
                return Err(e);
            }
        };

        instance.assign_identifier(id.clone());
        instance.commit(self.committed(&resolved, true), Phase::Created);
        info!(%id, "Created");
        Ok(())
    }

    /// Refreshes the instance from the remote store.
    #[instrument(skip_all, fields(remote_type = self.type_name(), id = instance.identifier()))]
    pub async fn read(
        &self,
        instance: &mut ResourceInstance,
        cancel: &Cancellation,
    ) -> Result<ReadOutcome, ReconcileError> {
        self.check_type(instance)?;
        let id = instance
            .identifier()
            .ok_or(ReconcileError::MissingIdentifier)?
            .to_string();
        let fields = self.schema().remote_fields();

        let response = cancel
            .guard(self.store.get(self.type_name(), &id, Some(&fields)))
            .await?;
        let representation = match response {
            Ok(representation) => representation,
            Err(StoreError::NotFound(_)) => {
                warn!("Not found, removing from state");
                instance.forget(Phase::Removed);
                return Ok(ReadOutcome::Removed);
            }
            Err(e) => return Err(self.remote_error("Reading", e)),
        };
        debug!(?representation, "Read");

        let observed = representation.to_values(self.schema());
        let prior = instance.state();
        let state = self
            .schema()
            .attributes()
            .iter()
            .map(|attr| {
                let returned = observed.contains(attr.name).then(|| observed.get(attr.name));
                (attr.name.to_string(), observe(attr, prior.get(attr.name), returned))
            })
            .collect();
        instance.commit(state, Phase::Read);
        Ok(ReadOutcome::Refreshed)
    }

    /// Adopts an existing remote record as a new instance.
    #[instrument(skip(self, cancel), fields(remote_type = self.type_name()))]
    pub async fn import(
        &self,
        identifier: &str,
        cancel: &Cancellation,
    ) -> Result<ResourceInstance, ReconcileError> {
        let mut instance = ResourceInstance::existing(
            self.type_name(),
            normalize_id(identifier),
            AttributeValues::new(),
        );
        match self.read(&mut instance, cancel).await? {
            ReadOutcome::Refreshed => {
                info!(id = instance.identifier(), "Imported");
                Ok(instance)
            }
            ReadOutcome::Removed => Err(self.remote_error(
                "Importing",
                StoreError::NotFound(identifier.to_string()),
            )),
        }
    }

    /// Sends the changed attributes of `config` to the remote store.
    #[instrument(skip_all, fields(remote_type = self.type_name(), id = instance.identifier()))]
    pub async fn update(
        &self,
        instance: &mut ResourceInstance,
        config: &AttributeValues,
        cancel: &Cancellation,
    ) -> Result<UpdateOutcome, ReconcileError> {
        self.check_type(instance)?;
        let id = instance
            .identifier()
            .ok_or(ReconcileError::MissingIdentifier)?
            .to_string();
        let entry_phase = instance.phase();
        let plan = self.plan(instance, config)?;
        if !plan.has_changes() {
            debug!("No changes");
            instance.set_phase(entry_phase);
            return Ok(UpdateOutcome::Unchanged);
        }

        let schema = self.schema();
        let changed: Vec<&str> = plan.changes().map(|a| a.name).collect();
        if let Some(attr) = plan
            .unresolved_required(schema)
            .find(|a| changed.contains(&a.name))
        {
            instance.set_phase(entry_phase);
            return Err(ReconcileError::ResolutionInconsistency {
                attribute: attr.name.to_string(),
            });
        }
        if let Some(name) = changed.iter().find(|name| {
            schema
                .attribute(name)
                .is_some_and(|a| a.immutable && !a.is_computed())
        }) {
            warn!(attribute = %name, "Immutable attribute changed");
            instance.set_phase(entry_phase);
            return Err(ReconcileError::RequiresReplacement {
                attribute: name.to_string(),
            });
        }

        let external_id = self.resource.external_id_field_name();
        let resolved = plan.resolved();
        let representation = Representation::from_values(schema, &resolved, |name| {
            changed.contains(&name)
                && schema.attribute(name).is_some_and(|a| {
                    !a.is_computed() && !a.local && a.remote_name != external_id
                })
        });

        if representation.is_empty() {
            debug!(?changed, "Nothing to send");
        } else {
            debug!(?representation, "Updating");
            let result = cancel
                .guard(self.store.update(self.type_name(), &id, representation))
                .await
                .and_then(|r| r.map_err(|e| self.remote_error("Updating", e)));
            if let Err(e) = result {
                instance.set_phase(entry_phase);
                return Err(e);
            }
        }

        instance.commit(self.committed(&resolved, false), Phase::Updated);
        info!(changed = changed.len(), "Updated");
        Ok(UpdateOutcome::Updated)
    }

    /// Removes the remote record and stops tracking the instance.
    #[instrument(skip_all, fields(remote_type = self.type_name(), id = instance.identifier()))]
    pub async fn delete(
        &self,
        instance: &mut ResourceInstance,
        cancel: &Cancellation,
    ) -> Result<(), ReconcileError> {
        self.check_type(instance)?;
        let id = instance
            .identifier()
            .ok_or(ReconcileError::MissingIdentifier)?
            .to_string();

        let response = match self.resource.delete_strategy() {
            DeleteStrategy::Delete => cancel.guard(self.store.delete(self.type_name(), &id)).await?,
            DeleteStrategy::Deactivate { field } => {
                warn!(
                    %field,
                    "{} records cannot be deleted; deactivating instead",
                    self.type_name()
                );
                let fields = Representation::new().with(field, false);
                cancel
                    .guard(self.store.update(self.type_name(), &id, fields))
                    .await?
            }
        };

        match response {
            Ok(()) => info!("Deleted"),
            Err(StoreError::NotFound(_)) => warn!("Already deleted"),
            Err(e) => return Err(self.remote_error("Deleting", e)),
        }
        instance.forget(Phase::Deleted);
        Ok(())
    }
}
