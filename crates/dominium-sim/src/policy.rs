//! Ambient policy grants and placed interaction objects.
//!
//! Neither spec.md nor `SPEC_FULL.md` name an `[MODULE]` for this (the
//! distilled contract's end-to-end scenario 5 exercises a `place` verb and
//! a `policy.interaction.place` grant it never otherwise defines); see
//! `DESIGN.md`'s Open Question resolution. Grounded in `client_shell.h`'s
//! `dom_shell_policy_set`/`DOM_SHELL_AUTH_POLICY`-style named string
//! grants, generalized from a fixed auth-policy set to an open string set
//! since this crate owns that content layer.

use dominium_registry::Registry;

/// The one content-level policy grant spec.md's scenario 5 names; additional
/// `policy.*` ids can be granted the same way without a code change.
pub const POLICY_INTERACTION_PLACE: &str = "policy.interaction.place";

/// A kind of object `place` can add to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionObjectKind {
    /// An inert marker with no further behavior.
    Marker,
}

/// An object placed into the world via the `place` verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionObject {
    /// What kind of object this is.
    pub kind: InteractionObjectKind,
    /// The cell it occupies.
    pub cell: (i32, i32, i32),
    /// The agent that placed it, or `0` for an unattributed operator
    /// placement.
    pub placed_by: u64,
}

/// A set of ambient, string-keyed policy grants a world was created with.
///
/// Kept as an open string set rather than a fixed bitmask: spec.md does not
/// bound how many content-defined policies a world may carry, and the set
/// is small and checked rarely (once per gated verb call), so a hash set
/// is the simplest faithful representation.
#[derive(Debug, Clone, Default)]
pub struct PolicySet {
    granted: std::collections::HashSet<String>,
}

impl PolicySet {
    /// An empty policy set (nothing granted).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `policy_id`, a no-op if already granted.
    pub fn grant(&mut self, policy_id: &str) {
        self.granted.insert(policy_id.to_string());
    }

    /// Revokes `policy_id`, a no-op if not granted.
    pub fn revoke(&mut self, policy_id: &str) {
        self.granted.remove(policy_id);
    }

    /// Whether `policy_id` is currently granted.
    #[must_use]
    pub fn contains(&self, policy_id: &str) -> bool {
        self.granted.contains(policy_id)
    }
}

/// Registers `object` if `place`'s gating policy is granted.
///
/// # Errors
/// Returns [`dominium_world::Refusal::Schema`] (rendered `WD-REFUSAL-SCHEMA`
/// per spec §6) if `policies` does not grant [`POLICY_INTERACTION_PLACE`].
pub fn place(
    policies: &PolicySet,
    objects: &mut Registry<InteractionObject>,
    object: InteractionObject,
) -> Result<u64, dominium_world::Refusal> {
    if !policies.contains(POLICY_INTERACTION_PLACE) {
        return Err(dominium_world::Refusal::Schema);
    }
    objects
        .register(None, object)
        .map_err(|_| dominium_world::Refusal::Capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_without_grant_is_refused_schema() {
        let policies = PolicySet::new();
        let mut objects: Registry<InteractionObject> = Registry::new(0);
        let result = place(
            &policies,
            &mut objects,
            InteractionObject {
                kind: InteractionObjectKind::Marker,
                cell: (0, 0, 0),
                placed_by: 0,
            },
        );
        assert_eq!(result, Err(dominium_world::Refusal::Schema));
        assert_eq!(objects.len(), 0);
    }

    #[test]
    fn place_with_grant_succeeds() {
        let mut policies = PolicySet::new();
        policies.grant(POLICY_INTERACTION_PLACE);
        let mut objects: Registry<InteractionObject> = Registry::new(0);
        let result = place(
            &policies,
            &mut objects,
            InteractionObject {
                kind: InteractionObjectKind::Marker,
                cell: (1, 2, 3),
                placed_by: 0,
            },
        );
        assert!(result.is_ok());
        assert_eq!(objects.len(), 1);
    }
}
