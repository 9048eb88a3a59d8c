//! Variant scope, mode, and selection records (spec §3 "Variant selection").

/// Which precedence tier a selection was made at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantScope {
    /// Applies to the whole world; overridden by a `Run`-scoped selection
    /// for the same system.
    World,
    /// Applies only to the current run; takes precedence over `World`.
    Run,
}

/// The gate's overall mode state machine (spec §3 "Variant selection").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantMode {
    /// Every current selection resolves to a registered variant.
    Authoritative,
    /// At least one current selection references an unregistered variant.
    /// Entered and left automatically as selections change.
    Degraded,
    /// Blocks `SIMULATE`/`PROCESS` verbs. Entered and left only by an
    /// explicit operator command.
    Frozen,
    /// Blocks `SIMULATE`/`PROCESS` verbs, distinct from `Frozen` only in the
    /// operator's stated intent (policy authoring vs. a hard stop). Entered
    /// and left only by an explicit operator command.
    TransformOnly,
}

impl VariantMode {
    /// Whether this mode blocks `SIMULATE`/`PROCESS` verbs (spec §4.9).
    #[must_use]
    pub const fn blocks_verbs(self) -> bool {
        matches!(self, Self::Frozen | Self::TransformOnly)
    }
}

/// The fixed detail string reported alongside a `degraded` transition.
pub const MISSING_VARIANT_DETAIL: &str = "missing_variant";

/// A verb kind the gate can block while `frozen`/`transform_only` (spec
/// §4.9). Named independently of whatever verb-token type the outer
/// dispatcher uses, since this crate only needs to know which of the
/// dispatcher's verbs count as `SIMULATE`/`PROCESS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatedVerb {
    /// A `SIMULATE` verb (advances the tick orchestrator).
    Simulate,
    /// A `PROCESS` verb (invokes the physical-process interpreter).
    Process,
}
