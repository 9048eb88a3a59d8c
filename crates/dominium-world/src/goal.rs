//! Goal records (spec §3.2, §4.3).

use crate::mask::{AuthorityMask, CapabilityMask};
use crate::process_kind::GoalType;
use dominium_kernel::Q16;

/// A goal's lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GoalStatus {
    /// Generated but not yet selected for planning.
    Pending,
    /// Selected; its plan is being executed.
    Active,
    /// Completed successfully.
    Satisfied,
    /// Withdrawn without completing (conflict, expiry, or oscillation).
    Abandoned,
    /// Exceeded `abandon_after_failures` without ever being satisfied.
    Failed,
}

/// Static prerequisites a goal's plan must validate against before any step
/// is emitted as a command (spec §4.3 validation stage).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Preconditions {
    /// Capability bits the pursuing agent must hold (directly or via
    /// delegation) for any step of this goal to validate.
    pub required_capabilities: CapabilityMask,
    /// Authority bits the pursuing agent must hold (directly or via
    /// delegation or grant) for any step of this goal to validate.
    pub required_authority: AuthorityMask,
    /// Field layers the agent must already know, or the goal refuses with
    /// `GOAL_NOT_FEASIBLE` rather than attempting to plan blind.
    pub required_knowledge: u32,
}

/// A goal: a prioritized, budgeted pursuit an agent plans and executes
/// against, expanding into an ordered list of [`crate::StepKind`] steps via
/// [`crate::step_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Goal {
    /// The agent pursuing this goal.
    pub agent_id: u64,
    /// Opaque satisfaction-condition ids, bounded to `N` by the template
    /// that constructed this goal. No operation in §4.4/§4.5 reads this
    /// list directly; it is carried for save/replay fidelity and future
    /// goal-satisfaction extensions.
    pub conditions: Vec<u32>,
    /// What kind of outcome this goal pursues.
    pub goal_type: GoalType,
    /// Current lifecycle status.
    pub status: GoalStatus,
    /// Priority assigned at generation time, before urgency decay/boost.
    pub base_priority: Q16,
    /// Current urgency, recomputed each tick the goal remains pending.
    pub urgency: Q16,
    /// Maximum acceptable risk exposure, Q16.16; goals whose plan would
    /// exceed this refuse with `RISK_EXCEEDS_TOLERANCE`.
    pub acceptable_risk: Q16,
    /// Number of ticks ahead this goal is willing to plan before expiring.
    pub horizon: u64,
    /// Confidence in the belief state this goal was generated from, Q16.16.
    pub epistemic_confidence: Q16,
    /// Static validation prerequisites.
    pub preconditions: Preconditions,
    /// Mutual-exclusion tag: at most one `Active` goal per `conflict_group`
    /// per agent is allowed at a time.
    pub conflict_group: u32,
    /// Consecutive step failures since the last success.
    pub failure_count: u32,
    /// Consecutive Active→Pending→Active transitions without progress.
    pub oscillation_count: u32,
    /// `failure_count` at or beyond this value transitions the goal to
    /// `Failed` instead of retrying.
    pub abandon_after_failures: u32,
    /// Flag bits read by `evaluate_goals_slice`; bit 0 is `ALLOW_UNKNOWN`,
    /// which lets a goal become eligible without satisfying
    /// `required_knowledge`.
    pub flags: u32,
    /// Eligibility is denied until `now >= defer_until_act` (back-off after
    /// a command failure sets this).
    pub defer_until_act: u64,
    /// Eligibility is denied once `now >= abandon_after_act`, when nonzero.
    pub abandon_after_act: u64,
    /// Bits set by the command executor as plan steps complete; carried for
    /// save/replay fidelity. No stage in §4.4 reads this directly — goal
    /// completion is driven by the step cursor in `Agent::schedule`, not by
    /// this field.
    pub satisfaction_flags: u32,
    /// The tick number after which this goal is abandoned if still pending.
    pub expiry: u64,
    /// The tick this goal's record was last mutated by the pipeline or
    /// executor.
    pub last_update_act: u64,
}

/// The eligibility flag bit letting a goal proceed without its
/// `required_knowledge` being satisfied (spec §4.4 step 1).
pub const GOAL_FLAG_ALLOW_UNKNOWN: u32 = 1 << 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preconditions_default_to_no_requirements() {
        let preconditions = Preconditions::default();
        assert_eq!(preconditions.required_capabilities, CapabilityMask::empty());
        assert_eq!(preconditions.required_authority, AuthorityMask::empty());
        assert_eq!(preconditions.required_knowledge, 0);
    }
}
