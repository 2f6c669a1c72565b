//! # Plan Resolution
//!
//! Turns `(prior, config, default)` for one attribute into the single value
//! treated as the plan before any remote call is made.
//!
//! Resolution is a fixed, ordered rule table. Each rule either claims the
//! attribute and returns the resolved value, or passes. The first rule that
//! claims wins; if none does, the identity rule applies:
//!
//! | # | Rule                   | Applies to         | Claims when                         | Resolves to |
//! |---|------------------------|--------------------|-------------------------------------|-------------|
//! | 1 | identifier equivalence | `Identifier`       | always                              | prior if equivalent to config, else config |
//! | 2 | sticky computed        | `Computed`         | prior is set                        | prior |
//! | 3 | default injection      | declared default   | config and prior are both null      | the default |
//! | 4 | null-to-unknown        | all                | config is unknown and prior is null | unknown |
//! | 5 | boolean absence        | `Boolean`          | config is null                      | `false` |
//! | 6 | identity               | all                | (fallback)                          | config, or prior when config is null |
//!
//! Resolution is pure and never fails; invalid values are rejected by the
//! validator beforehand.

use crate::id::{ids_equivalent, normalize_id};
use crate::schema::{Attribute, AttributeKind};
use crate::value::{PlanValue, Value};

/// The inputs of one attribute resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub attribute: &'a Attribute,
    pub prior: &'a PlanValue,
    pub config: &'a PlanValue,
}

pub type Rule = fn(&ResolveInput<'_>) -> Option<PlanValue>;

/// The rule table, in evaluation order.
pub const RULES: [(&str, Rule); 5] = [
    ("identifier_equivalence", identifier_equivalence),
    ("sticky_computed", sticky_computed),
    ("default_injection", default_injection),
    ("null_to_unknown", null_to_unknown),
    ("boolean_absence", boolean_absence),
];

/// Resolves one attribute.
pub fn resolve(attribute: &Attribute, prior: &PlanValue, config: &PlanValue) -> PlanValue {
    let input = ResolveInput {
        attribute,
        prior,
        config,
    };
    RULES
        .iter()
        .find_map(|(_, rule)| rule(&input))
        .unwrap_or_else(|| identity(&input))
}

fn identifier_equivalence(input: &ResolveInput<'_>) -> Option<PlanValue> {
    if input.attribute.kind != AttributeKind::Identifier {
        return None;
    }
    match (input.prior.as_str(), input.config.as_str()) {
        (Some(prior), Some(config)) if ids_equivalent(config, prior) => Some(input.prior.clone()),
        _ => Some(input.config.clone()),
    }
}

fn sticky_computed(input: &ResolveInput<'_>) -> Option<PlanValue> {
    if input.attribute.kind != AttributeKind::Computed || input.prior.is_null() {
        return None;
    }
    Some(input.prior.clone())
}

fn default_injection(input: &ResolveInput<'_>) -> Option<PlanValue> {
    let default = input.attribute.default.as_ref()?;
    if input.config.is_null() && input.prior.is_null() {
        Some(PlanValue::Known(default.clone()))
    } else {
        None
    }
}

fn null_to_unknown(input: &ResolveInput<'_>) -> Option<PlanValue> {
    if input.config.is_unknown() && input.prior.is_null() {
        Some(PlanValue::Unknown)
    } else {
        None
    }
}

fn boolean_absence(input: &ResolveInput<'_>) -> Option<PlanValue> {
    if input.attribute.kind == AttributeKind::Boolean && input.config.is_null() {
        Some(PlanValue::Known(Value::Bool(false)))
    } else {
        None
    }
}

fn identity(input: &ResolveInput<'_>) -> PlanValue {
    if input.config.is_null() {
        input.prior.clone()
    } else {
        input.config.clone()
    }
}

/// Merges a value observed on a remote read into prior state.
///
/// `observed` is `None` when the remote store did not return the field; the
/// prior value is kept. Otherwise computed attributes keep a known prior,
/// identifiers keep an equivalent prior, and everything else takes the
/// observed value, null included.
pub fn observe(attribute: &Attribute, prior: &PlanValue, observed: Option<&PlanValue>) -> PlanValue {
    let Some(observed) = observed else {
        return prior.clone();
    };
    match attribute.kind {
        AttributeKind::Computed if prior.as_known().is_some() => prior.clone(),
        AttributeKind::Identifier => match (prior.as_str(), observed.as_str()) {
            (Some(p), Some(o)) if ids_equivalent(p, o) => prior.clone(),
            (_, Some(o)) => PlanValue::known(normalize_id(o)),
            _ => observed.clone(),
        },
        _ => observed.clone(),
    }
}

/// Brings a resolved value into the form it is stored in: identifiers are
/// kept in their 18-character canonical encoding.
pub fn canonicalize(attribute: &Attribute, value: PlanValue) -> PlanValue {
    match (attribute.kind, value.as_str()) {
        (AttributeKind::Identifier, Some(id)) => PlanValue::known(normalize_id(id)),
        _ => value,
    }
}
