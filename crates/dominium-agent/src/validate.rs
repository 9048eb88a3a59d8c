//! Stage 3: `validate_plan_slice` (spec §4.4 step 3).

use crate::plan::PlannedGoal;
use dominium_registry::Registry;
use dominium_world::{Agent, AuthorityGrant, Constraint, Delegation, Goal, Refusal, StepKind};

/// A plan with each step's re-validated outcome attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedGoal {
    /// The agent this plan belongs to.
    pub agent_id: u64,
    /// The goal this plan expands.
    pub goal_id: u64,
    /// The plan id carried over from planning.
    pub plan_id: u64,
    /// Each step alongside the refusal that would prevent emitting it as a
    /// command, or `None` if it validated.
    pub steps: Vec<(StepKind, Option<Refusal>)>,
    /// Carried over from planning when the goal never reached validation
    /// (e.g. `GOAL_NOT_FEASIBLE`).
    pub refusal: Option<Refusal>,
}

fn step_process_bit(step: StepKind) -> u32 {
    match step {
        StepKind::Move => 0,
        StepKind::Observe => 1 << 0,
        StepKind::Maintain => 1 << 1,
        StepKind::Transfer => 1 << 2,
    }
}

fn validate_step(
    agent: &Agent,
    agent_id: u64,
    goal: &Goal,
    step: StepKind,
    delegations: &Registry<Delegation>,
    grants: &Registry<AuthorityGrant>,
    constraints: &Registry<Constraint>,
    now: u64,
) -> Option<Refusal> {
    if !step.is_executable() {
        return None;
    }
    if !agent
        .capability_mask
        .superset_contains(goal.preconditions.required_capabilities)
    {
        return Some(Refusal::NoCapability);
    }
    let base = agent.authority_mask.0;
    let base = delegations.effective_mask(agent_id, base, now);
    let authority = grants.effective_mask(agent_id, base, now);
    if (authority & goal.preconditions.required_authority.0) != goal.preconditions.required_authority.0 {
        return Some(Refusal::NoAuthority);
    }
    let bit = step_process_bit(step);
    let denied = constraints.values().any(|constraint| {
        constraint.applies(agent_id, now) && constraint.denies(bit)
    });
    if denied {
        return Some(Refusal::ConstraintViolation);
    }
    None
}

/// Re-validates each step of each planned goal against capability,
/// effective authority (including delegations and grants), and active
/// `deny` constraints. A goal whose planning already refused passes
/// through unchanged.
#[must_use]
pub fn validate_plan_slice(
    planned: &[PlannedGoal],
    agents: &Registry<Agent>,
    goals: &Registry<Goal>,
    delegations: &Registry<Delegation>,
    grants: &Registry<AuthorityGrant>,
    constraints: &Registry<Constraint>,
    now: u64,
) -> Vec<ValidatedGoal> {
    let mut out = Vec::with_capacity(planned.len());
    for plan in planned {
        if let Some(refusal) = plan.refusal {
            out.push(ValidatedGoal {
                agent_id: plan.agent_id,
                goal_id: plan.goal_id,
                plan_id: plan.plan_id,
                steps: Vec::new(),
                refusal: Some(refusal),
            });
            continue;
        }
        let (Some(agent), Some(goal)) = (agents.find(plan.agent_id), goals.find(plan.goal_id))
        else {
            continue;
        };
        let steps = plan
            .steps
            .iter()
            .map(|&step| {
                (
                    step,
                    validate_step(
                        agent,
                        plan.agent_id,
                        goal,
                        step,
                        delegations,
                        grants,
                        constraints,
                        now,
                    ),
                )
            })
            .collect();
        out.push(ValidatedGoal {
            agent_id: plan.agent_id,
            goal_id: plan.goal_id,
            plan_id: plan.plan_id,
            steps,
            refusal: None,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dominium_kernel::Q16;
    use dominium_world::{AuthorityMask, ConstraintMode, GoalStatus, GoalType, Preconditions};

    fn goal(agent_id: u64) -> Goal {
        Goal {
            agent_id,
            conditions: vec![],
            goal_type: GoalType::Survey,
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
    fn deny_constraint_refuses_matching_step() {
        let mut agents: Registry<Agent> = Registry::new(0);
        let a = agents.register(None, Agent::default()).unwrap();
        let mut goals: Registry<Goal> = Registry::new(0);
        let g = goals.register(None, goal(a)).unwrap();
        let mut constraints: Registry<Constraint> = Registry::new(0);
        constraints
            .register(
                None,
                Constraint {
                    scope_ref: 0,
                    process_kind_mask: step_process_bit(StepKind::Observe),
                    mode: ConstraintMode::Deny,
                    expiry: 0,
                },
            )
            .unwrap();

        let planned = vec![PlannedGoal {
            agent_id: a,
            goal_id: g,
            plan_id: 1,
            steps: vec![StepKind::Observe],
            refusal: None,
        }];
        let result = validate_plan_slice(
            &planned,
            &agents,
            &goals,
            &Registry::new(0),
            &Registry::new(0),
            &constraints,
            0,
        );
        assert_eq!(
            result[0].steps[0],
            (StepKind::Observe, Some(Refusal::ConstraintViolation))
        );
    }

    #[test]
    fn missing_authority_refuses_step() {
        let mut agents: Registry<Agent> = Registry::new(0);
        let a = agents.register(None, Agent::default()).unwrap();
        let mut goals: Registry<Goal> = Registry::new(0);
        let mut needs_auth = goal(a);
        needs_auth.preconditions.required_authority = AuthorityMask(0b1);
        let g = goals.register(None, needs_auth).unwrap();

        let planned = vec![PlannedGoal {
            agent_id: a,
            goal_id: g,
            plan_id: 1,
            steps: vec![StepKind::Observe],
            refusal: None,
        }];
        let result = validate_plan_slice(
            &planned,
            &agents,
            &goals,
            &Registry::new(0),
            &Registry::new(0),
            &Registry::new(0),
            0,
        );
        assert_eq!(
            result[0].steps[0],
            (StepKind::Observe, Some(Refusal::NoAuthority))
        );
    }

    #[test]
    fn move_step_always_validates() {
        let mut agents: Registry<Agent> = Registry::new(0);
        let a = agents.register(None, Agent::default()).unwrap();
        let mut goals: Registry<Goal> = Registry::new(0);
        let g = goals.register(None, goal(a)).unwrap();
        let planned = vec![PlannedGoal {
            agent_id: a,
            goal_id: g,
            plan_id: 1,
            steps: vec![StepKind::Move],
            refusal: None,
        }];
        let result = validate_plan_slice(
            &planned,
            &agents,
            &goals,
            &Registry::new(0),
            &Registry::new(0),
            &Registry::new(0),
            0,
        );
        assert_eq!(result[0].steps[0], (StepKind::Move, None));
    }

    #[test]
    fn goal_not_feasible_passes_through_unchanged() {
        let planned = vec![PlannedGoal {
            agent_id: 1,
            goal_id: 1,
            plan_id: 0,
            steps: vec![],
            refusal: Some(Refusal::GoalNotFeasible),
        }];
        let result = validate_plan_slice(
            &planned,
            &Registry::new(0),
            &Registry::new(0),
            &Registry::new(0),
            &Registry::new(0),
            &Registry::new(0),
            0,
        );
        assert_eq!(result[0].refusal, Some(Refusal::GoalNotFeasible));
    }
}
