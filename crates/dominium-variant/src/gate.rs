//! The variant/policy gate, `dominium-variant::Gate` (spec §4.9).

use indexmap::{IndexMap, IndexSet};

use dominium_world::Refusal;

use crate::types::{GatedVerb, VariantMode, VariantScope, MISSING_VARIANT_DETAIL};

/// Owns every system's known variants, the world- and run-scope
/// selections, the registry default per system, and the gate's current
/// mode.
#[derive(Debug, Clone)]
pub struct Gate {
    mode: VariantMode,
    known_variants: IndexMap<u64, IndexSet<u64>>,
    defaults: IndexMap<u64, u64>,
    world_selections: IndexMap<u64, u64>,
    run_selections: IndexMap<u64, u64>,
}

/// Outcome of a [`Gate::set`] call: the mode after applying it, and the
/// detail string if that mode is [`VariantMode::Degraded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOutcome {
    /// The gate's mode immediately after this call.
    pub mode: VariantMode,
    /// `Some("missing_variant")` iff `mode` is [`VariantMode::Degraded`].
    pub detail: Option<&'static str>,
}

impl Gate {
    /// Creates a gate in `authoritative` mode with no known variants or
    /// selections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: VariantMode::Authoritative,
            known_variants: IndexMap::new(),
            defaults: IndexMap::new(),
            world_selections: IndexMap::new(),
            run_selections: IndexMap::new(),
        }
    }

    /// The gate's current mode.
    #[must_use]
    pub const fn mode(&self) -> VariantMode {
        self.mode
    }

    /// Registers `variant_id` as a known variant of `system_id`. Template
    /// bootstrap calls this once per declared variant before any selection
    /// is made.
    pub fn declare_variant(&mut self, system_id: u64, variant_id: u64) {
        self.known_variants
            .entry(system_id)
            .or_default()
            .insert(variant_id);
    }

    /// Sets `system_id`'s registry default to `variant_id`.
    pub fn set_default(&mut self, system_id: u64, variant_id: u64) {
        self.defaults.insert(system_id, variant_id);
    }

    /// Resolves `system_id` to its currently selected variant: run-scope,
    /// then world-scope, then the registry default. Returns `None` if no
    /// tier names a selection for this system.
    #[must_use]
    pub fn resolve(&self, system_id: u64) -> Option<u64> {
        self.run_selections
            .get(&system_id)
            .or_else(|| self.world_selections.get(&system_id))
            .or_else(|| self.defaults.get(&system_id))
            .copied()
    }

    /// Appends or replaces `scope`'s selection for `system_id`. Allowed even
    /// when `variant_id` is not a known variant of `system_id`; such a
    /// reference instead forces the mode to `degraded` (unless already
    /// `frozen`/`transform_only`, which only an explicit operator command
    /// changes).
    #[tracing::instrument(skip(self))]
    pub fn set(&mut self, system_id: u64, variant_id: u64, scope: VariantScope) -> SetOutcome {
        match scope {
            VariantScope::World => {
                self.world_selections.insert(system_id, variant_id);
            }
            VariantScope::Run => {
                self.run_selections.insert(system_id, variant_id);
            }
        }
        self.recompute_mode();
        SetOutcome {
            mode: self.mode,
            detail: (self.mode == VariantMode::Degraded).then_some(MISSING_VARIANT_DETAIL),
        }
    }

    /// Forces the mode to `frozen`, `transform_only`, or back to
    /// `authoritative`/`degraded` by explicit operator command. Bypasses
    /// the automatic `degraded`/`authoritative` recomputation `set` drives.
    pub fn force_mode(&mut self, mode: VariantMode) {
        self.mode = mode;
    }

    /// Whether `verb` is currently blocked by this gate's mode, per spec
    /// §4.9: `frozen`/`transform_only` refuse every `SIMULATE`/`PROCESS`
    /// verb with [`Refusal::Variant`].
    ///
    /// # Errors
    /// Returns [`Refusal::Variant`] if the current mode blocks `verb`.
    pub fn guard(&self, verb: GatedVerb) -> Result<(), Refusal> {
        let _ = verb;
        if self.mode.blocks_verbs() {
            Err(Refusal::Variant)
        } else {
            Ok(())
        }
    }

    fn is_known(&self, system_id: u64, variant_id: u64) -> bool {
        self.known_variants
            .get(&system_id)
            .is_some_and(|variants| variants.contains(&variant_id))
    }

    fn all_selections_resolve(&self) -> bool {
        self.world_selections
            .iter()
            .chain(self.run_selections.iter())
            .all(|(&system_id, &variant_id)| self.is_known(system_id, variant_id))
    }

    fn recompute_mode(&mut self) {
        match self.mode {
            VariantMode::Frozen | VariantMode::TransformOnly => {}
            VariantMode::Authoritative | VariantMode::Degraded => {
                self.mode = if self.all_selections_resolve() {
                    VariantMode::Authoritative
                } else {
                    VariantMode::Degraded
                };
            }
        }
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Gate;
    use crate::types::{GatedVerb, VariantMode, VariantScope};

    #[test]
    fn resolve_prefers_run_over_world_over_default() {
        let mut gate = Gate::new();
        gate.declare_variant(1, 10);
        gate.declare_variant(1, 11);
        gate.declare_variant(1, 12);
        gate.set_default(1, 10);
        assert_eq!(gate.resolve(1), Some(10));

        gate.set(1, 11, VariantScope::World);
        assert_eq!(gate.resolve(1), Some(11));

        gate.set(1, 12, VariantScope::Run);
        assert_eq!(gate.resolve(1), Some(12));
    }

    #[test]
    fn resolve_with_no_selection_is_none() {
        let gate = Gate::new();
        assert_eq!(gate.resolve(99), None);
    }

    #[test]
    fn unknown_variant_forces_degraded_with_detail() {
        let mut gate = Gate::new();
        let outcome = gate.set(1, 999, VariantScope::World);
        assert_eq!(outcome.mode, VariantMode::Degraded);
        assert_eq!(outcome.detail, Some("missing_variant"));
        assert_eq!(gate.mode(), VariantMode::Degraded);
    }

    #[test]
    fn degraded_restores_authoritative_once_all_resolve() {
        let mut gate = Gate::new();
        gate.declare_variant(1, 1);
        gate.set(1, 999, VariantScope::World);
        assert_eq!(gate.mode(), VariantMode::Degraded);

        let outcome = gate.set(1, 1, VariantScope::World);
        assert_eq!(outcome.mode, VariantMode::Authoritative);
        assert_eq!(outcome.detail, None);
    }

    #[test]
    fn force_mode_is_not_undone_by_recompute() {
        let mut gate = Gate::new();
        gate.declare_variant(1, 1);
        gate.set(1, 1, VariantScope::World);
        gate.force_mode(VariantMode::Frozen);
        assert_eq!(gate.mode(), VariantMode::Frozen);

        gate.set(1, 1, VariantScope::Run);
        assert_eq!(gate.mode(), VariantMode::Frozen);
    }

    #[test]
    fn frozen_and_transform_only_block_simulate_and_process() {
        let mut gate = Gate::new();
        gate.force_mode(VariantMode::Frozen);
        assert!(gate.guard(GatedVerb::Simulate).is_err());
        assert!(gate.guard(GatedVerb::Process).is_err());

        gate.force_mode(VariantMode::TransformOnly);
        assert!(gate.guard(GatedVerb::Simulate).is_err());
    }

    #[test]
    fn authoritative_allows_every_verb() {
        let gate = Gate::new();
        assert!(gate.guard(GatedVerb::Simulate).is_ok());
        assert!(gate.guard(GatedVerb::Process).is_ok());
    }
}
