//! The shared refusal taxonomy every verb handler, pipeline stage, and
//! process interpreter reports through (spec §4.4–§4.9, §6 "Refusal
//! codes").

use thiserror::Error;

/// A structured reason a handler did not complete.
///
/// `Display` renders the stable string spec.md names where one is given
/// (`WD-REFUSAL-*`, `PROC-REFUSAL*`, `PLAYTEST-REFUSAL`, `VARIANT-REFUSAL`);
/// the pipeline- and network-local codes that spec.md names only in prose
/// (`GOAL_NOT_FEASIBLE`, `CONSTRAINT_VIOLATION`, ...) render as their own
/// upper-snake-case name.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Refusal {
    /// No eligible goal qualified this tick (§4.4 step 1).
    #[error("GOAL_NOT_ELIGIBLE")]
    GoalNotEligible,
    /// A required plan step has no resolvable target in belief (§4.4 step 2).
    #[error("GOAL_NOT_FEASIBLE")]
    GoalNotFeasible,
    /// The plan's accumulated risk would exceed the goal's tolerance.
    #[error("RISK_EXCEEDS_TOLERANCE")]
    RiskExceedsTolerance,
    /// A step's process kind matches an active `deny` constraint (§4.4
    /// step 3, §4.6 precondition 3).
    #[error("CONSTRAINT_VIOLATION")]
    ConstraintViolation,
    /// Requested capability bit absent (§4.6 precondition 1).
    #[error("NO_CAPABILITY")]
    NoCapability,
    /// Requested authority bit absent (§4.6 precondition 2).
    #[error("NO_AUTHORITY")]
    NoAuthority,
    /// Required field unknown and `ALLOW_UNKNOWN` not set (§4.6
    /// precondition 4).
    #[error("PROC-REFUSAL-EPISTEMIC")]
    Epistemic,
    /// Configuration exceeds surface gradient / support bounds (§4.6
    /// precondition 5), or the process/command kind has no handler.
    #[error("PROC-REFUSAL")]
    Unsupported,
    /// A network resource required by the process is empty.
    #[error("RESOURCE_EMPTY")]
    ResourceEmpty,
    /// A network node or edge could not accept the requested amount.
    #[error("CAPACITY")]
    Capacity,
    /// A referenced node, edge, or network does not exist.
    #[error("MISSING")]
    Missing,
    /// A source node does not hold enough to satisfy a transfer.
    #[error("INSUFFICIENT_STORAGE")]
    InsufficientStorage,
    /// The variant/policy gate is `frozen` or `transform_only` and blocks
    /// this verb (§4.9).
    #[error("VARIANT-REFUSAL")]
    Variant,
    /// A budgeted fold ran out of budget before completing (§4.8).
    #[error("BUDGET")]
    Budget,
    /// Playtest is paused and the verb was not forced (§4.10 step 1).
    #[error("PLAYTEST-REFUSAL")]
    PlaytestPaused,
    /// Operation preconditions missing (e.g. no active world).
    #[error("WD-REFUSAL-INVALID")]
    Invalid,
    /// Policy forbids the operation outright.
    #[error("WD-REFUSAL-SCHEMA")]
    Schema,
    /// World template construction failed.
    #[error("WD-REFUSAL-TEMPLATE")]
    Template,
}
