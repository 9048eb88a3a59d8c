//! Agent records: identity, belief state, and scheduling (spec §3.1).

use crate::mask::{AuthorityMask, CapabilityMask};
use dominium_kernel::Q16;

/// An agent's execution status within the tick orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentStatus {
    /// Eligible to be scheduled this tick.
    Idle,
    /// Mid-execution of a command; resumable at `resume_step`.
    Busy,
    /// Permanently removed from scheduling (scenario or policy action).
    Retired,
}

/// What an agent currently believes about the world, populated only by
/// survey or scenario injection (spec §4.2's subjective/objective split).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Belief {
    /// Bitset of observed field layers.
    pub knowledge_mask: u32,
    /// Perceived hunger/need level driving goal generation, Q16.16.
    pub hunger_level: Q16,
    /// Perceived threat level, Q16.16.
    pub threat_level: Q16,
    /// How much risk the agent is willing to accept, Q16.16.
    pub risk_tolerance: Q16,
    /// Confidence the agent places in its own belief state, Q16.16.
    pub epistemic_confidence: Q16,
    /// Believed resource network/node reference, or `0` if unknown.
    pub known_resource_ref: u64,
    /// Believed destination node reference, or `0` if unknown.
    pub known_destination_ref: u64,
    /// Believed threat source reference, or `0` if unknown.
    pub known_threat_ref: u64,
}

/// Scheduling state the tick orchestrator consults to decide whether an
/// agent runs this tick, and where its pipeline resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    /// The tick at which this agent next becomes eligible.
    pub next_due_tick: u64,
    /// Remaining compute budget for the current tick (spec §4.1 budget gate).
    pub compute_budget: u32,
    /// Current execution status.
    pub status: AgentStatus,
    /// The goal currently being pursued, or `0` if none.
    pub active_goal_id: u64,
    /// The plan id of the currently active goal's expanded step list, or
    /// `0` if none. Assigned once per goal activation by
    /// `plan_actions_slice`.
    pub active_plan_id: u64,
    /// The plan slice index to resume at on the next scheduled tick.
    pub resume_step: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            next_due_tick: 0,
            compute_budget: 0,
            status: AgentStatus::Idle,
            active_goal_id: 0,
            active_plan_id: 0,
            resume_step: 0,
        }
    }
}

/// An agent: the unit of goal pursuit and command execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    /// Capabilities this agent directly holds (not counting delegations).
    pub capability_mask: CapabilityMask,
    /// Authority bits this agent directly holds (not counting delegations).
    pub authority_mask: AuthorityMask,
    /// Current belief state.
    pub belief: Belief,
    /// Current scheduling state.
    pub schedule: Schedule,
}
