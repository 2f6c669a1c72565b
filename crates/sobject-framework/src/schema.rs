//! # Resource Schemas
//!
//! A [`ResourceSchema`] is the typed description of one remote record type:
//! which attributes it has, what kind each one is, how it maps onto a remote
//! field, and which defaults and validation rules apply.
//!
//! The attribute [`AttributeKind`] selects the resolution rules applied to it
//! (see [`crate::resolver`]); nothing in the engine inspects values at run
//! time to decide how to treat them.
//!
//! Resource types are plugged into the engine through two traits:
//! - [`RemoteType`] names the remote record type and its external id field.
//! - [`ManagedResource`] adds the schema and lifecycle policy.

use crate::validator::ValidationRule;
use crate::value::Value;

/// Which family of resolution rules an attribute follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// A plain string: configuration wins, prior state fills in when unset.
    Plain,
    /// A remote record identifier; short and canonical encodings compare equal.
    Identifier,
    /// Assigned by the remote store. Sticky once observed.
    Computed,
    /// A boolean where absence means `false`.
    Boolean,
}

/// One attribute of a resource type.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: &'static str,
    pub remote_name: &'static str,
    pub kind: AttributeKind,
    /// Configuration must supply a value.
    pub required: bool,
    /// The remote store rejects a write without this field.
    pub write_required: bool,
    /// Changing it requires replacing the record.
    pub immutable: bool,
    /// Kept in tracked state only; never sent to or read from the remote store.
    pub local: bool,
    pub default: Option<Value>,
    pub validators: Vec<ValidationRule>,
}

impl Attribute {
    fn new(name: &'static str, remote_name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            remote_name,
            kind,
            required: false,
            write_required: false,
            immutable: false,
            local: false,
            default: None,
            validators: Vec::new(),
        }
    }

    pub fn plain(name: &'static str, remote_name: &'static str) -> Self {
        Self::new(name, remote_name, AttributeKind::Plain)
    }

    pub fn identifier(name: &'static str, remote_name: &'static str) -> Self {
        Self::new(name, remote_name, AttributeKind::Identifier)
    }

    pub fn computed(name: &'static str, remote_name: &'static str) -> Self {
        Self::new(name, remote_name, AttributeKind::Computed).immutable()
    }

    pub fn boolean(name: &'static str, remote_name: &'static str) -> Self {
        Self::new(name, remote_name, AttributeKind::Boolean)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.write_required = true;
        self
    }

    pub fn write_required(mut self) -> Self {
        self.write_required = true;
        self
    }

    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn validate(mut self, rule: ValidationRule) -> Self {
        self.validators.push(rule);
        self
    }

    pub fn is_computed(&self) -> bool {
        self.kind == AttributeKind::Computed
    }
}

/// The full attribute list of one resource type, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ResourceSchema {
    pub description: &'static str,
    attributes: Vec<Attribute>,
}

impl ResourceSchema {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            attributes: Vec::new(),
        }
    }

    pub fn with(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Remote field names of every attribute stored remotely, for
    /// field-selective reads.
    pub fn remote_fields(&self) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| !a.local)
            .map(|a| a.remote_name)
            .collect()
    }
}

/// Names a record type in the remote store.
///
/// Every resource type implements this explicitly; the reconciler never
/// guesses a type from the shape of a value.
pub trait RemoteType: Send + Sync + 'static {
    /// The remote record type, e.g. `Account`.
    fn type_name(&self) -> &'static str;

    /// The remote field holding an external id, or `""` when the type has
    /// none. A declared external id field is never sent on update.
    fn external_id_field_name(&self) -> &'static str {
        ""
    }
}

/// What happens remotely when a resource is removed from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStrategy {
    /// Issue a remote delete.
    Delete,
    /// The remote store refuses deletes for this type; clear `field` instead.
    Deactivate { field: &'static str },
}

/// A resource type the reconciler can manage.
pub trait ManagedResource: RemoteType {
    fn schema(&self) -> &ResourceSchema;

    fn delete_strategy(&self) -> DeleteStrategy {
        DeleteStrategy::Delete
    }
}
