//! Command records emitted by the agent pipeline and consumed by the
//! command executor (spec §4.4 step 4, §4.5).

use crate::mask::AuthorityMask;
use crate::process_kind::StepKind;

/// A command's lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandStatus {
    /// Emitted, not yet run by the executor.
    Pending,
    /// Ran and completed its effect.
    Executed,
    /// Ran but its effect could not complete (e.g. insufficient storage).
    Failed,
    /// Did not run at all (validation or executor-side refusal).
    Refused,
}

/// One command: the materialization of the first unrefused, executable
/// step of an agent's active plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    /// Deterministic command id, derived from `world_seed` and an emission
    /// counter (spec §4.4 step 4).
    pub command_id: u64,
    /// The agent this command acts on behalf of.
    pub agent_id: u64,
    /// The goal this command's plan belongs to.
    pub goal_id: u64,
    /// Deterministic plan id, derived from `world_seed` and an emission
    /// counter (spec §4.4 step 4).
    pub plan_id: u64,
    /// Index of this step within the goal's expanded step list.
    pub step_index: u32,
    /// Which process this command executes.
    pub process_kind: StepKind,
    /// The node, network, or resource this command targets; `0` if the
    /// step kind needs no target (not currently used by any step kind).
    pub target_id: u64,
    /// Authority bits the executor re-checks are still held at run time.
    pub required_authority_mask: AuthorityMask,
    /// Current lifecycle status.
    pub status: CommandStatus,
}
