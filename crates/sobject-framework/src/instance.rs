//! Tracked state of one managed remote record.

use crate::value::AttributeValues;

/// Where a [`ResourceInstance`] is in its reconcile cycle.
///
/// `Unplanned → Validated → Resolved → {Created | Read | Updated | Deleted | Removed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Unplanned,
    Validated,
    Resolved,
    Created,
    Read,
    Updated,
    /// Removed from configuration and deleted (or deactivated) remotely.
    Deleted,
    /// The remote record disappeared; the instance is no longer tracked.
    Removed,
}

/// One record under management.
///
/// The identifier is absent until the first successful create and is only
/// ever set by the reconciler, always in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInstance {
    remote_type: &'static str,
    identifier: Option<String>,
    state: AttributeValues,
    phase: Phase,
}

impl ResourceInstance {
    /// A record declared in configuration that does not exist remotely yet.
    pub fn new(remote_type: &'static str) -> Self {
        Self {
            remote_type,
            identifier: None,
            state: AttributeValues::new(),
            phase: Phase::Unplanned,
        }
    }

    /// A record restored from previously saved state.
    pub fn existing(remote_type: &'static str, identifier: String, state: AttributeValues) -> Self {
        Self {
            remote_type,
            identifier: Some(identifier),
            state,
            phase: Phase::Unplanned,
        }
    }

    pub fn remote_type(&self) -> &'static str {
        self.remote_type
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// The last committed attribute values, used as prior state when planning.
    pub fn state(&self) -> &AttributeValues {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// False once the instance was deleted or found missing remotely.
    pub fn is_tracked(&self) -> bool {
        !matches!(self.phase, Phase::Deleted | Phase::Removed)
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn commit(&mut self, state: AttributeValues, phase: Phase) {
        self.state = state;
        self.phase = phase;
    }

    pub(crate) fn assign_identifier(&mut self, identifier: String) {
        self.identifier = Some(identifier);
    }

    /// Drops the identifier and all state.
    pub(crate) fn forget(&mut self, phase: Phase) {
        self.identifier = None;
        self.state = AttributeValues::new();
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_instance_has_no_identifier() {
        let instance = ResourceInstance::new("Account");
        assert_eq!(instance.remote_type(), "Account");
        assert_eq!(instance.identifier(), None);
        assert_eq!(instance.phase(), Phase::Unplanned);
        assert!(instance.is_tracked());
    }

    #[test]
    fn test_forget_clears_everything() {
        let mut instance = ResourceInstance::existing(
            "Account",
            "001000000000001AAA".into(),
            AttributeValues::new().with("name", "Acme"),
        );
        instance.forget(Phase::Removed);
        assert_eq!(instance.identifier(), None);
        assert!(instance.state().is_empty());
        assert!(!instance.is_tracked());
    }
}
