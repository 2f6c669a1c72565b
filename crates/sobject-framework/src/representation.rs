//! # Sparse Representations
//!
//! The field map exchanged with the remote store. An absent key means "leave
//! untouched" on write and "not returned" on read. Empty strings and nulls
//! are not told apart: both are left out of every write, so a field cannot
//! be cleared to empty through an update.

use crate::schema::ResourceSchema;
use crate::value::{AttributeValues, PlanValue, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sparse remote-field → JSON value map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Representation(BTreeMap<String, serde_json::Value>);

impl Representation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: serde_json::Value) {
        self.0.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies `other` over `self`, field by field.
    pub fn merge(&mut self, other: Representation) {
        self.0.extend(other.0);
    }

    /// Keeps only the listed fields.
    pub fn select(&self, fields: &[&str]) -> Representation {
        Representation(
            self.0
                .iter()
                .filter(|(k, _)| fields.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Builds the write payload for `values`, keyed by remote field name.
    ///
    /// Only remote attributes accepted by `include` are considered. Null,
    /// unknown and empty-string values are left out.
    pub fn from_values(
        schema: &ResourceSchema,
        values: &AttributeValues,
        include: impl Fn(&str) -> bool,
    ) -> Representation {
        let mut rep = Representation::new();
        for attr in schema.attributes() {
            if attr.local || !include(attr.name) {
                continue;
            }
            if let Some(value) = writable(values.get(attr.name)) {
                rep.insert(attr.remote_name, to_json(value));
            }
        }
        rep
    }

    /// Reads the returned fields back into attribute values. Attributes whose
    /// remote field was not returned are absent from the result.
    pub fn to_values(&self, schema: &ResourceSchema) -> AttributeValues {
        schema
            .attributes()
            .iter()
            .filter(|attr| !attr.local)
            .filter_map(|attr| {
                self.get(attr.remote_name)
                    .map(|json| (attr.name.to_string(), from_json(json)))
            })
            .collect()
    }
}

fn writable(value: &PlanValue) -> Option<&Value> {
    match value {
        PlanValue::Known(v) if !v.is_empty_string() => Some(v),
        _ => None,
    }
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::String(s) => serde_json::Value::String(s.clone()),
    }
}

fn from_json(json: &serde_json::Value) -> PlanValue {
    match json {
        serde_json::Value::Null => PlanValue::Null,
        serde_json::Value::Bool(b) => PlanValue::known(*b),
        serde_json::Value::String(s) => PlanValue::known(s.as_str()),
        other => PlanValue::known(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Attribute;
    use serde_json::json;

    fn schema() -> ResourceSchema {
        ResourceSchema::new("test")
            .with(Attribute::plain("name", "Name"))
            .with(Attribute::plain("type", "Type"))
            .with(Attribute::plain("phone", "Phone"))
            .with(Attribute::boolean("active", "IsActive"))
    }

    #[test]
    fn test_null_and_empty_are_omitted() {
        let values = AttributeValues::new()
            .with("name", "Acme")
            .with_null("type")
            .with("phone", "")
            .with("active", false);
        let rep = Representation::from_values(&schema(), &values, |_| true);
        assert_eq!(rep, Representation::new().with("Name", "Acme").with("IsActive", false));
    }

    #[test]
    fn test_unknown_is_omitted() {
        let values = AttributeValues::new().with_unknown("name");
        assert!(Representation::from_values(&schema(), &values, |_| true).is_empty());
    }

    #[test]
    fn test_include_filter() {
        let values = AttributeValues::new().with("name", "Acme").with("phone", "555");
        let rep = Representation::from_values(&schema(), &values, |name| name == "phone");
        assert_eq!(rep, Representation::new().with("Phone", "555"));
    }

    #[test]
    fn test_to_values_distinguishes_missing_from_null() {
        let rep: Representation =
            serde_json::from_value(json!({"Name": "Acme", "Type": null, "Extra": 1})).unwrap();
        let values = rep.to_values(&schema());
        assert_eq!(values.get("name"), &PlanValue::known("Acme"));
        assert!(values.contains("type"));
        assert!(values.get("type").is_null());
        assert!(!values.contains("phone"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_local_attributes_stay_out_of_payloads() {
        let schema = schema().with(Attribute::boolean("reset_password", "ResetPassword").local());
        let values = AttributeValues::new()
            .with("name", "Acme")
            .with("reset_password", true);
        let rep = Representation::from_values(&schema, &values, |_| true);
        assert_eq!(rep, Representation::new().with("Name", "Acme"));

        let returned = Representation::new().with("ResetPassword", true);
        assert!(!returned.to_values(&schema).contains("reset_password"));
    }

    #[test]
    fn test_select_and_merge() {
        let mut rep = Representation::new().with("Name", "Acme").with("Phone", "1");
        rep.merge(Representation::new().with("Phone", "2"));
        assert_eq!(rep.get("Phone"), Some(&json!("2")));
        assert_eq!(rep.select(&["Name"]), Representation::new().with("Name", "Acme"));
    }
}
