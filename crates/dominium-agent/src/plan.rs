//! Stage 2: `plan_actions_slice` (spec §4.4 step 2).

use crate::evaluate::Eligibility;
use dominium_registry::Registry;
use dominium_world::{step_table, Agent, Goal, Refusal, StepKind};

/// One goal's expanded, ordered step list, or the refusal that prevented
/// planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedGoal {
    /// The agent this plan belongs to.
    pub agent_id: u64,
    /// The goal this plan expands, or `0` when no goal was eligible for
    /// selection (`refusal` then carries the top ineligible goal's reason
    /// and there is no specific goal to name).
    pub goal_id: u64,
    /// Deterministic plan id, allocated only when planning succeeds.
    pub plan_id: u64,
    /// The expanded step list, empty when `refusal.is_some()`.
    pub steps: Vec<StepKind>,
    /// Set when a required step has no resolvable target in belief, or
    /// carried over from evaluation when no goal qualified for selection.
    pub refusal: Option<Refusal>,
}

fn has_resolvable_target(agent: &Agent, step: StepKind) -> bool {
    match step {
        StepKind::Move | StepKind::Maintain => agent.belief.known_destination_ref != 0,
        StepKind::Transfer => {
            agent.belief.known_resource_ref != 0 && agent.belief.known_destination_ref != 0
        }
        StepKind::Observe => true,
    }
}

/// Expands each evaluated goal's type into an ordered step list, refusing
/// with [`Refusal::GoalNotFeasible`] when a step's target cannot be
/// resolved from the agent's current belief.
///
/// `plan_id_counter` is a monotonic counter seeded by `world_seed`,
/// incremented once per successfully planned goal (spec §4.4 step 4 names
/// the same counter discipline for `command_id`/`plan_id`).
#[must_use]
pub fn plan_actions_slice(
    evaluations: &[Eligibility],
    agents: &Registry<Agent>,
    goals: &Registry<Goal>,
    plan_id_counter: &mut u64,
) -> Vec<PlannedGoal> {
    let mut out = Vec::with_capacity(evaluations.len());
    for evaluation in evaluations {
        let Some(goal_id) = evaluation.selected_goal_id else {
            if let Some(refusal) = evaluation.refusal {
                out.push(PlannedGoal {
                    agent_id: evaluation.agent_id,
                    goal_id: 0,
                    plan_id: 0,
                    steps: Vec::new(),
                    refusal: Some(refusal),
                });
            }
            continue;
        };
        let (Some(agent), Some(goal)) = (
            agents.find(evaluation.agent_id),
            goals.find(goal_id),
        ) else {
            continue;
        };
        let steps = step_table(goal.goal_type);
        let infeasible = steps.iter().any(|&step| !has_resolvable_target(agent, step));
        if infeasible {
            out.push(PlannedGoal {
                agent_id: evaluation.agent_id,
                goal_id,
                plan_id: 0,
                steps: Vec::new(),
                refusal: Some(Refusal::GoalNotFeasible),
            });
            continue;
        }
        *plan_id_counter += 1;
        out.push(PlannedGoal {
            agent_id: evaluation.agent_id,
            goal_id,
            plan_id: *plan_id_counter,
            steps: steps.to_vec(),
            refusal: None,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dominium_kernel::Q16;
    use dominium_world::{GoalStatus, GoalType, Preconditions};

    fn goal(agent_id: u64, goal_type: GoalType) -> Goal {
        Goal {
            agent_id,
            conditions: vec![],
            goal_type,
            status: GoalStatus::Pending,
            base_priority: Q16::zero(),
            urgency: Q16::zero(),
            acceptable_risk: Q16::from_int(1),
            horizon: 10,
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
            expiry: 100,
            last_update_act: 0,
        }
    }

    #[test]
    fn survey_always_plans_since_observe_needs_no_target() {
        let mut agents: Registry<Agent> = Registry::new(0);
        let a = agents.register(None, Agent::default()).unwrap();
        let mut goals: Registry<Goal> = Registry::new(0);
        let g = goals.register(None, goal(a, GoalType::Survey)).unwrap();
        let mut counter = 0;
        let result = plan_actions_slice(
            &[Eligibility {
                agent_id: a,
                selected_goal_id: Some(g),
                refusal: None,
            }],
            &agents,
            &goals,
            &mut counter,
        );
        assert_eq!(result[0].refusal, None);
        assert_eq!(result[0].steps, vec![StepKind::Observe]);
        assert_eq!(result[0].plan_id, 1);
    }

    #[test]
    fn maintain_without_known_destination_is_infeasible() {
        let mut agents: Registry<Agent> = Registry::new(0);
        let a = agents.register(None, Agent::default()).unwrap();
        let mut goals: Registry<Goal> = Registry::new(0);
        let g = goals.register(None, goal(a, GoalType::Maintain)).unwrap();
        let mut counter = 0;
        let result = plan_actions_slice(
            &[Eligibility {
                agent_id: a,
                selected_goal_id: Some(g),
                refusal: None,
            }],
            &agents,
            &goals,
            &mut counter,
        );
        assert_eq!(result[0].refusal, Some(Refusal::GoalNotFeasible));
        assert!(result[0].steps.is_empty());
    }

    #[test]
    fn maintain_with_known_destination_plans_move_then_maintain() {
        let mut agents: Registry<Agent> = Registry::new(0);
        let mut maintain_agent = Agent::default();
        maintain_agent.belief.known_destination_ref = 7;
        let a = agents.register(None, maintain_agent).unwrap();
        let mut goals: Registry<Goal> = Registry::new(0);
        let g = goals.register(None, goal(a, GoalType::Maintain)).unwrap();
        let mut counter = 0;
        let result = plan_actions_slice(
            &[Eligibility {
                agent_id: a,
                selected_goal_id: Some(g),
                refusal: None,
            }],
            &agents,
            &goals,
            &mut counter,
        );
        assert_eq!(result[0].steps, vec![StepKind::Move, StepKind::Maintain]);
    }

    #[test]
    fn no_eligible_goal_carries_the_evaluation_refusal_forward() {
        let agents: Registry<Agent> = Registry::new(0);
        let goals: Registry<Goal> = Registry::new(0);
        let mut counter = 0;
        let result = plan_actions_slice(
            &[Eligibility {
                agent_id: 1,
                selected_goal_id: None,
                refusal: Some(Refusal::GoalNotEligible),
            }],
            &agents,
            &goals,
            &mut counter,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].agent_id, 1);
        assert_eq!(result[0].refusal, Some(Refusal::GoalNotEligible));
        assert!(result[0].steps.is_empty());
        assert_eq!(counter, 0);
    }

    #[test]
    fn no_eligible_goal_and_no_refusal_produces_no_planned_goal() {
        let agents: Registry<Agent> = Registry::new(0);
        let goals: Registry<Goal> = Registry::new(0);
        let mut counter = 0;
        let result = plan_actions_slice(
            &[Eligibility {
                agent_id: 1,
                selected_goal_id: None,
                refusal: None,
            }],
            &agents,
            &goals,
            &mut counter,
        );
        assert!(result.is_empty());
    }
}
