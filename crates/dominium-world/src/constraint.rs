//! Constraint records: institution-issued allow/deny rules over process
//! kinds (spec §3.3, §4.3 validation stage).

/// Whether a constraint permits or forbids its matched process kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintMode {
    /// Matched process kinds are explicitly permitted.
    Allow,
    /// Matched process kinds are forbidden; validation refuses with
    /// `CONSTRAINT_VIOLATION`.
    Deny,
}

/// A rule scoped to an agent or institution (`0` in `scope_ref` means
/// global) that allows or denies a bitmask of process kinds.
///
/// `Deny` constraints take precedence over capability/authority
/// satisfaction: a step whose process kind matches an active `Deny`
/// constraint in scope refuses regardless of what the pursuing agent holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    /// Agent or institution this constraint applies to; `0` for global.
    pub scope_ref: u64,
    /// Bitmask of process kinds this constraint matches.
    pub process_kind_mask: u32,
    /// Whether matched process kinds are allowed or denied.
    pub mode: ConstraintMode,
    /// Tick after which this constraint is no longer active, or `0` for no
    /// expiry.
    pub expiry: u64,
}

impl Constraint {
    /// Whether this constraint is active at `now` and in scope for
    /// `subject_scope` (an agent or institution reference, or `0` for a
    /// global check).
    #[must_use]
    pub fn applies(&self, subject_scope: u64, now: u64) -> bool {
        let not_expired = self.expiry == 0 || self.expiry > now;
        let in_scope = self.scope_ref == 0 || self.scope_ref == subject_scope;
        not_expired && in_scope
    }

    /// Whether this constraint, if applicable, forbids `process_kind_bit`.
    #[must_use]
    pub fn denies(&self, process_kind_bit: u32) -> bool {
        self.mode == ConstraintMode::Deny && (self.process_kind_mask & process_kind_bit) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_deny_constraint_matches_any_scope() {
        let constraint = Constraint {
            scope_ref: 0,
            process_kind_mask: 0b1,
            mode: ConstraintMode::Deny,
            expiry: 0,
        };
        assert!(constraint.applies(42, 0));
        assert!(constraint.denies(0b1));
        assert!(!constraint.denies(0b10));
    }

    #[test]
    fn scoped_constraint_does_not_apply_elsewhere() {
        let constraint = Constraint {
            scope_ref: 7,
            process_kind_mask: 0b1,
            mode: ConstraintMode::Deny,
            expiry: 0,
        };
        assert!(constraint.applies(7, 0));
        assert!(!constraint.applies(8, 0));
    }

    #[test]
    fn expired_constraint_does_not_apply() {
        let constraint = Constraint {
            scope_ref: 0,
            process_kind_mask: 0b1,
            mode: ConstraintMode::Deny,
            expiry: 10,
        };
        assert!(constraint.applies(0, 9));
        assert!(!constraint.applies(0, 10));
    }
}
