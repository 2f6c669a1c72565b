//! # Configuration Validation
//!
//! Pre-flight checks on user-supplied values. Validation runs before any
//! resolution happens; a single violation aborts planning for that resource
//! instance and the violations are reported verbatim.
//!
//! Unknown values are never checked: they are validated on the cycle where
//! they become known.

use crate::value::{PlanValue, Value};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const EMAIL_MIN_LEN: usize = 3;
const EMAIL_MAX_LEN: usize = 254;

/// A reusable, stateless check over one configured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
    /// The value, when present, must not be the empty string.
    NonEmpty,
    /// The value, when present, must be a well-formed `user@domain` address.
    Email,
    /// The value must be one of `allowed`. With `optional`, null is accepted too.
    OneOf {
        allowed: Vec<String>,
        optional: bool,
    },
}

impl ValidationRule {
    pub fn one_of(allowed: &[&str]) -> Self {
        ValidationRule::OneOf {
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
            optional: false,
        }
    }

    pub fn optional_one_of(allowed: &[&str]) -> Self {
        ValidationRule::OneOf {
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
            optional: true,
        }
    }

    pub fn description(&self) -> String {
        match self {
            ValidationRule::NonEmpty => "Ensures the string is not empty.".to_string(),
            ValidationRule::Email => "Ensures the string is a valid email address.".to_string(),
            ValidationRule::OneOf { allowed, .. } => {
                format!("Ensures the string is one of: [{}]", allowed.join(", "))
            }
        }
    }

    /// Checks `value` for the attribute `attribute`.
    pub fn check(&self, attribute: &str, value: &PlanValue) -> Option<Violation> {
        if value.is_unknown() {
            return None;
        }
        let text = value.as_known().map(value_text);

        match self {
            ValidationRule::NonEmpty => match text {
                Some(s) if s.is_empty() => Some(Violation::new(
                    attribute,
                    "Empty String",
                    "Value must not be empty.",
                )),
                _ => None,
            },
            ValidationRule::Email => match text {
                Some(s) if !is_email_valid(&s) => Some(Violation::new(
                    attribute,
                    "Invalid email address",
                    "Value must be a valid email address.",
                )),
                _ => None,
            },
            ValidationRule::OneOf { allowed, optional } => {
                if *optional && value.is_null() {
                    return None;
                }
                match text {
                    Some(s) if allowed.iter().any(|a| *a == s) => None,
                    _ => Some(Violation::new(
                        attribute,
                        "Invalid string",
                        format!("String must be one of: [{}]", allowed.join(", ")),
                    )),
                }
            }
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[-a-zA-Z0-9.!#$%&'*+/=?^_`{|}~]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email pattern is a valid regex")
    })
}

/// Length must be within `[3, 254]` bytes and the address must match a strict
/// `local@domain` grammar with no empty or hyphen-edged domain labels.
pub fn is_email_valid(email: &str) -> bool {
    if email.len() < EMAIL_MIN_LEN || email.len() > EMAIL_MAX_LEN {
        return false;
    }
    email_pattern().is_match(email)
}

/// One failed check, tied to the attribute it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub attribute: String,
    pub summary: String,
    pub detail: String,
}

impl Violation {
    pub fn new(
        attribute: impl Into<String>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.attribute, self.summary, self.detail)
    }
}

/// The violations collected for one resource instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Runs every rule against one value and collects all violations.
pub fn validate(attribute: &str, value: &PlanValue, rules: &[ValidationRule]) -> Vec<Violation> {
    rules
        .iter()
        .filter_map(|rule| rule.check(attribute, value))
        .collect()
}
