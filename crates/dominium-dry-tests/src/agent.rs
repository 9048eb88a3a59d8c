//! Ergonomic [`Agent`] construction for tests.
//!
//! `Agent::default()` leaves `schedule.compute_budget` at `0`, which
//! `dominium-agent`'s own eligibility gate treats as "no selection possible
//! this tick" — a correct production default (a world's tick orchestrator
//! refills it every tick) but a trap for a test that drives the pipeline
//! directly without going through `dominium-sim`. [`AgentBuilder::new`]
//! starts from a budget of `1` so a builder-constructed agent is pipeline-
//! ready out of the box.

use dominium_kernel::Q16;
use dominium_world::{Agent, AgentStatus, AuthorityMask, CapabilityMask};

/// Builder for [`Agent`] fixtures.
#[derive(Debug, Clone)]
pub struct AgentBuilder {
    agent: Agent,
}

impl AgentBuilder {
    /// Starts from [`Agent::default`], with `schedule.compute_budget` set to
    /// `1` so the agent is immediately eligible for goal selection.
    #[must_use]
    pub fn new() -> Self {
        let mut agent = Agent::default();
        agent.schedule.compute_budget = 1;
        Self { agent }
    }

    /// Sets the agent's capability mask.
    #[must_use]
    pub fn capabilities(mut self, mask: u32) -> Self {
        self.agent.capability_mask = CapabilityMask(mask);
        self
    }

    /// Sets the agent's authority mask.
    #[must_use]
    pub fn authority(mut self, mask: u32) -> Self {
        self.agent.authority_mask = AuthorityMask(mask);
        self
    }

    /// Sets the agent's known knowledge mask.
    #[must_use]
    pub fn knowledge(mut self, mask: u32) -> Self {
        self.agent.belief.knowledge_mask = mask;
        self
    }

    /// Sets the agent's epistemic confidence.
    #[must_use]
    pub fn epistemic_confidence(mut self, confidence: Q16) -> Self {
        self.agent.belief.epistemic_confidence = confidence;
        self
    }

    /// Sets the agent's per-tick compute budget, overriding the `1` default.
    #[must_use]
    pub fn compute_budget(mut self, budget: u32) -> Self {
        self.agent.schedule.compute_budget = budget;
        self
    }

    /// Sets the agent's schedule status.
    #[must_use]
    pub fn status(mut self, status: AgentStatus) -> Self {
        self.agent.schedule.status = status;
        self
    }

    /// Consumes the builder, producing the finished [`Agent`].
    #[must_use]
    pub fn build(self) -> Agent {
        self.agent
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
