//! # Attribute Values
//!
//! Every attribute value moving through the engine is a [`PlanValue`]: a
//! concrete [`Value`], an explicit null, or `Unknown` (the configuration
//! refers to something that is only known once another resource has been
//! applied). Null and unknown are different states and are never collapsed
//! into each other.
//!
//! [`AttributeValues`] is the ordered name → value map used both for
//! user configuration and for tracked state. A name that is absent from the
//! map reads as null.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A concrete attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    String(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::String(_) => None,
        }
    }

    /// Empty strings are treated like null when building write payloads.
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Value::String(s) if s.is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// The resolution state of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlanValue {
    /// Explicitly absent.
    #[default]
    Null,
    /// Not yet knowable; depends on something that has not been applied.
    Unknown,
    Known(Value),
}

impl PlanValue {
    pub fn known(value: impl Into<Value>) -> Self {
        PlanValue::Known(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PlanValue::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, PlanValue::Unknown)
    }

    pub fn as_known(&self) -> Option<&Value> {
        match self {
            PlanValue::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_known().and_then(Value::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_known().and_then(Value::as_bool)
    }
}

impl fmt::Display for PlanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanValue::Null => write!(f, "null"),
            PlanValue::Unknown => write!(f, "(known after apply)"),
            PlanValue::Known(v) => v.fmt(f),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for PlanValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => PlanValue::Known(v.into()),
            None => PlanValue::Null,
        }
    }
}

/// Ordered attribute name → value map.
///
/// # Example
/// ```
/// use sobject_framework::{AttributeValues, PlanValue};
///
/// let config = AttributeValues::new()
///     .with("name", "Acme")
///     .with_null("type")
///     .with_unknown("parent_role_id");
///
/// assert_eq!(config.get("name").as_str(), Some("Acme"));
/// assert!(config.get("type").is_null());
/// assert!(config.get("industry").is_null());
/// assert_eq!(config.get("parent_role_id"), &PlanValue::Unknown);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeValues {
    values: BTreeMap<String, PlanValue>,
}

static NULL: PlanValue = PlanValue::Null;

impl AttributeValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, PlanValue::Known(value.into()));
        self
    }

    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.set(name, PlanValue::Null);
        self
    }

    pub fn with_unknown(mut self, name: impl Into<String>) -> Self {
        self.set(name, PlanValue::Unknown);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: PlanValue) {
        self.values.insert(name.into(), value);
    }

    /// Returns the value for `name`, or null when it was never set.
    pub fn get(&self, name: &str) -> &PlanValue {
        self.values.get(name).unwrap_or(&NULL)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlanValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, PlanValue)> for AttributeValues {
    fn from_iter<I: IntoIterator<Item = (String, PlanValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
