//! Ergonomic [`Goal`] construction for tests.
//!
//! `Goal` carries no `Default` impl (unlike `Agent`/`Belief`/`Schedule`)
//! since a goal's 17 fields have no single sensible all-zero reading —
//! `expiry: 0`, for instance, would make every goal immediately stale. This
//! builder picks the same "runs indefinitely, succeeds trivially" defaults
//! `dominium-sim`'s `goal-add` verb handler uses, so a fixture goal behaves
//! the way an operator-created one would.

use dominium_kernel::Q16;
use dominium_world::{Goal, GoalStatus, GoalType, Preconditions};

/// Builder for [`Goal`] fixtures.
#[derive(Debug, Clone)]
pub struct GoalBuilder {
    goal: Goal,
}

impl GoalBuilder {
    /// Starts a goal of `goal_type` for `agent_id`, pending, unexpiring,
    /// with neutral priority/urgency/risk tolerance and no preconditions.
    #[must_use]
    pub fn new(agent_id: u64, goal_type: GoalType) -> Self {
        Self {
            goal: Goal {
                agent_id,
                conditions: Vec::new(),
                goal_type,
                status: GoalStatus::Pending,
                base_priority: Q16::from_int(1),
                urgency: Q16::zero(),
                acceptable_risk: Q16::from_int(1),
                horizon: 1_000,
                epistemic_confidence: Q16::zero(),
                preconditions: Preconditions::default(),
                conflict_group: 0,
                failure_count: 0,
                oscillation_count: 0,
                abandon_after_failures: 3,
                flags: 0,
                defer_until_act: 0,
                abandon_after_act: 0,
                satisfaction_flags: 0,
                expiry: u64::MAX,
                last_update_act: 0,
            },
        }
    }

    /// Overrides the goal's static validation prerequisites.
    #[must_use]
    pub fn preconditions(mut self, preconditions: Preconditions) -> Self {
        self.goal.preconditions = preconditions;
        self
    }

    /// Overrides the goal's tick-count expiry (defaults to never).
    #[must_use]
    pub fn expiry(mut self, expiry: u64) -> Self {
        self.goal.expiry = expiry;
        self
    }

    /// Overrides the goal's lifecycle status (defaults to `Pending`).
    #[must_use]
    pub fn status(mut self, status: GoalStatus) -> Self {
        self.goal.status = status;
        self
    }

    /// Consumes the builder, producing the finished [`Goal`].
    #[must_use]
    pub fn build(self) -> Goal {
        self.goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_goal_is_pending_and_unexpiring() {
        let goal = GoalBuilder::new(1, GoalType::Survey).build();
        assert_eq!(goal.status, GoalStatus::Pending);
        assert_eq!(goal.expiry, u64::MAX);
        assert_eq!(goal.agent_id, 1);
    }
}
