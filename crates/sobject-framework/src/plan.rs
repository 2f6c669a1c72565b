//! # Plans
//!
//! A [`Plan`] holds one [`AttributePlan`] per schema attribute: the prior
//! value, the configured value, the declared default and the value
//! resolution settled on. Reconciler writes are driven entirely by the plan.

use crate::schema::ResourceSchema;
use crate::value::{AttributeValues, PlanValue, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct AttributePlan {
    pub name: &'static str,
    pub prior: PlanValue,
    pub config: PlanValue,
    pub default: Option<Value>,
    pub resolved: PlanValue,
}

impl AttributePlan {
    pub fn is_change(&self) -> bool {
        self.resolved != self.prior
    }
}

impl fmt::Display for AttributePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.name, self.prior, self.resolved)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    attributes: Vec<AttributePlan>,
}

impl Plan {
    pub(crate) fn new(attributes: Vec<AttributePlan>) -> Self {
        Self { attributes }
    }

    /// Attribute plans in schema order.
    pub fn attributes(&self) -> &[AttributePlan] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributePlan> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attributes whose resolved value differs from the prior value.
    pub fn changes(&self) -> impl Iterator<Item = &AttributePlan> {
        self.attributes.iter().filter(|a| a.is_change())
    }

    pub fn has_changes(&self) -> bool {
        self.changes().next().is_some()
    }

    /// The resolved value of every attribute.
    pub fn resolved(&self) -> AttributeValues {
        self.attributes
            .iter()
            .map(|a| (a.name.to_string(), a.resolved.clone()))
            .collect()
    }

    /// Attributes that must be known before a write but are still unknown.
    pub(crate) fn unresolved_required<'a>(
        &'a self,
        schema: &'a ResourceSchema,
    ) -> impl Iterator<Item = &'a AttributePlan> {
        self.attributes.iter().filter(move |a| {
            a.resolved.is_unknown() && schema.attribute(a.name).is_some_and(|attr| attr.write_required)
        })
    }
}
