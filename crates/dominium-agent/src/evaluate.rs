//! Stage 1: `evaluate_goals_slice` (spec §4.4 step 1).

use dominium_registry::Registry;
use dominium_world::{Agent, AuthorityGrant, Delegation, Goal, GoalStatus, Refusal, GOAL_FLAG_ALLOW_UNKNOWN};

/// The outcome of evaluating one agent's pending goals for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// The agent this evaluation covers.
    pub agent_id: u64,
    /// The top-scoring eligible goal, if any qualified.
    pub selected_goal_id: Option<u64>,
    /// Set to the refusal reason for the top-scoring *ineligible* goal when
    /// no goal qualified and at least one candidate existed.
    pub refusal: Option<Refusal>,
}

fn effective_authority(
    agent: &Agent,
    agent_id: u64,
    delegations: &Registry<Delegation>,
    grants: &Registry<AuthorityGrant>,
    now: u64,
) -> u32 {
    let base = agent.authority_mask.0;
    let base = delegations.effective_mask(agent_id, base, now);
    grants.effective_mask(agent_id, base, now)
}

fn is_eligible(agent: &Agent, effective_authority_mask: u32, goal: &Goal, now: u64) -> bool {
    if goal.status != GoalStatus::Pending {
        return false;
    }
    let caps_ok = agent
        .capability_mask
        .superset_contains(goal.preconditions.required_capabilities);
    let auth_ok = (effective_authority_mask & goal.preconditions.required_authority.0)
        == goal.preconditions.required_authority.0;
    let knowledge_ok = (agent.belief.knowledge_mask & goal.preconditions.required_knowledge)
        == goal.preconditions.required_knowledge
        || (goal.flags & GOAL_FLAG_ALLOW_UNKNOWN) != 0;
    let timing_ok = now >= goal.defer_until_act
        && (goal.abandon_after_act == 0 || now < goal.abandon_after_act);
    caps_ok && auth_ok && knowledge_ok && timing_ok
}

/// Scores and selects the top eligible goal per agent.
///
/// `agent_ids` and, for each agent, the goals considered, are walked in the
/// order given by the caller; callers must pass registry iteration order
/// (insertion order) to preserve determinism.
#[must_use]
pub fn evaluate_goals_slice(
    agent_ids: &[u64],
    agents: &Registry<Agent>,
    goals: &Registry<Goal>,
    delegations: &Registry<Delegation>,
    grants: &Registry<AuthorityGrant>,
    now: u64,
) -> Vec<Eligibility> {
    let mut out = Vec::with_capacity(agent_ids.len());
    for &agent_id in agent_ids {
        let Some(agent) = agents.find(agent_id) else {
            continue;
        };
        if agent.schedule.next_due_tick > now || agent.schedule.compute_budget == 0 {
            out.push(Eligibility {
                agent_id,
                selected_goal_id: None,
                refusal: None,
            });
            continue;
        }
        let authority = effective_authority(agent, agent_id, delegations, grants, now);

        let mut best: Option<(u64, dominium_kernel::Q16)> = None;
        let mut best_ineligible: Option<u64> = None;
        for (goal_id, goal) in goals.iter() {
            if goal.agent_id != agent_id {
                continue;
            }
            if is_eligible(agent, authority, goal, now) {
                let score = goal.base_priority.add(goal.urgency);
                best = match best {
                    None => Some((goal_id, score)),
                    Some((best_id, best_score)) => {
                        if score.raw() > best_score.raw()
                            || (score.raw() == best_score.raw() && goal_id < best_id)
                        {
                            Some((goal_id, score))
                        } else {
                            Some((best_id, best_score))
                        }
                    }
                };
            } else if best_ineligible.is_none() {
                best_ineligible = Some(goal_id);
            }
        }

        out.push(Eligibility {
            agent_id,
            selected_goal_id: best.map(|(id, _)| id),
            refusal: if best.is_none() && best_ineligible.is_some() {
                Some(Refusal::GoalNotEligible)
            } else {
                None
            },
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dominium_kernel::Q16;
    use dominium_world::{AuthorityMask, CapabilityMask, GoalType, Preconditions, Schedule};

    fn agent(budget: u32) -> Agent {
        Agent {
            capability_mask: CapabilityMask(0b1),
            authority_mask: AuthorityMask(0b1),
            schedule: Schedule {
                compute_budget: budget,
                ..Schedule::default()
            },
            ..Agent::default()
        }
    }

    fn goal(agent_id: u64, priority: i32) -> Goal {
        Goal {
            agent_id,
            conditions: vec![],
            goal_type: GoalType::Survey,
            status: GoalStatus::Pending,
            base_priority: Q16::from_int(priority),
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
    fn selects_highest_priority_eligible_goal() {
        let mut agents: Registry<Agent> = Registry::new(0);
        let a = agents.register(None, agent(5)).unwrap();
        let mut goals: Registry<Goal> = Registry::new(0);
        goals.register(None, goal(a, 1)).unwrap();
        let high = goals.register(None, goal(a, 9)).unwrap();

        let result = evaluate_goals_slice(
            &[a],
            &agents,
            &goals,
            &Registry::new(0),
            &Registry::new(0),
            0,
        );
        assert_eq!(result[0].selected_goal_id, Some(high));
    }

    #[test]
    fn ties_break_on_ascending_goal_id() {
        let mut agents: Registry<Agent> = Registry::new(0);
        let a = agents.register(None, agent(5)).unwrap();
        let mut goals: Registry<Goal> = Registry::new(0);
        let first = goals.register(None, goal(a, 5)).unwrap();
        goals.register(None, goal(a, 5)).unwrap();

        let result = evaluate_goals_slice(
            &[a],
            &agents,
            &goals,
            &Registry::new(0),
            &Registry::new(0),
            0,
        );
        assert_eq!(result[0].selected_goal_id, Some(first));
    }

    #[test]
    fn zero_compute_budget_yields_no_selection() {
        let mut agents: Registry<Agent> = Registry::new(0);
        let a = agents.register(None, agent(0)).unwrap();
        let mut goals: Registry<Goal> = Registry::new(0);
        goals.register(None, goal(a, 9)).unwrap();

        let result = evaluate_goals_slice(
            &[a],
            &agents,
            &goals,
            &Registry::new(0),
            &Registry::new(0),
            0,
        );
        assert_eq!(result[0].selected_goal_id, None);
        assert_eq!(result[0].refusal, None);
    }

    #[test]
    fn missing_capability_is_ineligible_and_reports_refusal() {
        let mut agents: Registry<Agent> = Registry::new(0);
        let a = agents.register(None, agent(5)).unwrap();
        let mut goals: Registry<Goal> = Registry::new(0);
        let mut g = goal(a, 9);
        g.preconditions.required_capabilities = CapabilityMask(0b10);
        goals.register(None, g).unwrap();

        let result = evaluate_goals_slice(
            &[a],
            &agents,
            &goals,
            &Registry::new(0),
            &Registry::new(0),
            0,
        );
        assert_eq!(result[0].selected_goal_id, None);
        assert_eq!(result[0].refusal, Some(Refusal::GoalNotEligible));
    }
}
