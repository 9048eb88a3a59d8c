//! Stable refusal-code strings and the `RefusalKind`/exit-status mapping
//! (spec §6 "Refusal codes", §7 error taxonomy).
//!
//! [`dominium_world::Refusal`]'s own `#[error("...")]` strings already
//! render most of spec §6's stable codes verbatim (`thiserror` derives
//! `Display` from them). This module exists only where that is not enough:
//! distinguishing a command-execution-time failure (`PROC-FAIL`) from a
//! process/agent-evaluation-time refusal that happens to share the same
//! [`Refusal`] variant (`PROC-REFUSAL`), and converging every component's
//! refusal onto [`dominium_kernel::RefusalKind`] (the taxonomy
//! `dominium-kernel`'s own doc comment names this crate as the renderer
//! for) so the verb dispatcher can pick an exit status.

use dominium_kernel::RefusalKind;
use dominium_world::Refusal;

use crate::verb::VerbStatus;

/// The stable code for a refusal surfaced during agent evaluation,
/// planning, validation, or the physical-process interpreter's
/// precondition gate. [`Refusal`]'s `Display` already renders the correct
/// string for every variant in this context.
#[must_use]
pub fn process_refusal_code(refusal: Refusal) -> String {
    refusal.to_string()
}

/// The stable code for a refusal surfaced by
/// `dominium_command::execute_command`. Identical to
/// [`process_refusal_code`] except `Refusal::Unsupported` renders
/// `PROC-FAIL` here rather than its native `PROC-REFUSAL`: spec §6 reserves
/// `PROC-REFUSAL` for a refusal raised before a command ran at all, and
/// `PROC-FAIL` for one raised while running it, a distinction `Refusal`'s
/// own variants do not carry since both originate from the same
/// `Unsupported` case in `dominium-command`'s executor.
#[must_use]
pub fn command_failure_code(refusal: Refusal) -> String {
    match refusal {
        Refusal::Unsupported => "PROC-FAIL".to_string(),
        other => other.to_string(),
    }
}

/// Maps a [`Refusal`] onto the shared [`RefusalKind`] taxonomy.
#[must_use]
pub const fn refusal_kind(refusal: Refusal) -> RefusalKind {
    match refusal {
        Refusal::GoalNotEligible
        | Refusal::GoalNotFeasible
        | Refusal::NoCapability
        | Refusal::NoAuthority
        | Refusal::RiskExceedsTolerance
        | Refusal::PlaytestPaused => RefusalKind::Precondition,
        Refusal::ConstraintViolation
        | Refusal::Variant
        | Refusal::Invalid
        | Refusal::Schema
        | Refusal::Template => RefusalKind::Policy,
        Refusal::ResourceEmpty
        | Refusal::Capacity
        | Refusal::Missing
        | Refusal::InsufficientStorage
        | Refusal::Budget => RefusalKind::Capacity,
        Refusal::Epistemic | Refusal::Unsupported => RefusalKind::PhysicalProcess,
    }
}

/// Maps a [`RefusalKind`] onto the verb dispatcher's exit status (spec §6
/// exit codes): preconditions and policy refusals are `unavailable`
/// (the operation cannot run right now, not that it was tried and failed);
/// capacity and physical-process refusals are `failure`. `usage` is never
/// produced here — it is reserved for malformed verb syntax, diagnosed
/// before any [`Refusal`] exists.
#[must_use]
pub const fn verb_status_for(kind: RefusalKind) -> VerbStatus {
    match kind {
        RefusalKind::Precondition | RefusalKind::Policy => VerbStatus::Unavailable,
        RefusalKind::Capacity | RefusalKind::PhysicalProcess | RefusalKind::Io => {
            VerbStatus::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_renders_proc_refusal_in_process_context() {
        assert_eq!(process_refusal_code(Refusal::Unsupported), "PROC-REFUSAL");
    }

    #[test]
    fn unsupported_renders_proc_fail_in_command_context() {
        assert_eq!(command_failure_code(Refusal::Unsupported), "PROC-FAIL");
    }

    #[test]
    fn epistemic_is_unchanged_in_either_context() {
        assert_eq!(process_refusal_code(Refusal::Epistemic), "PROC-REFUSAL-EPISTEMIC");
        assert_eq!(command_failure_code(Refusal::Epistemic), "PROC-REFUSAL-EPISTEMIC");
    }

    #[test]
    fn schema_refusal_is_unavailable() {
        assert_eq!(verb_status_for(refusal_kind(Refusal::Schema)), VerbStatus::Unavailable);
    }

    #[test]
    fn capacity_refusal_is_failure() {
        assert_eq!(verb_status_for(refusal_kind(Refusal::Capacity)), VerbStatus::Failure);
    }
}
