// SPDX-License-Identifier: Apache-2.0
//! `dominium-agent`: the agent pipeline (spec component C4).
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod emit;
mod evaluate;
mod plan;
mod validate;

pub use emit::{emit_commands_slice, EmitOutcome};
pub use evaluate::{evaluate_goals_slice, Eligibility};
pub use plan::{plan_actions_slice, PlannedGoal};
pub use validate::{validate_plan_slice, ValidatedGoal};

use dominium_registry::Registry;
use dominium_world::{Agent, AuthorityGrant, Constraint, Delegation, Goal};

/// Runs all four pipeline stages in order over `agent_ids`, mutating each
/// emitting agent's schedule to point at its new command.
///
/// This is a thin convenience wrapper; callers needing to inspect an
/// intermediate stage's output (e.g. for tracing or tests) can call the
/// four stage functions directly instead.
#[must_use]
pub fn run_pipeline(
    agent_ids: &[u64],
    agents: &mut Registry<Agent>,
    goals: &mut Registry<Goal>,
    delegations: &Registry<Delegation>,
    grants: &Registry<AuthorityGrant>,
    constraints: &Registry<Constraint>,
    plan_id_counter: &mut u64,
    command_id_counter: &mut u64,
    now: u64,
) -> Vec<EmitOutcome> {
    let evaluations = evaluate_goals_slice(agent_ids, agents, goals, delegations, grants, now);
    let planned = plan_actions_slice(&evaluations, agents, goals, plan_id_counter);
    let validated = validate_plan_slice(
        &planned,
        agents,
        goals,
        delegations,
        grants,
        constraints,
        now,
    );
    let outcomes = emit_commands_slice(&validated, agents, goals, command_id_counter, now);
    let emitted = outcomes
        .iter()
        .filter(|o| matches!(o, EmitOutcome::Emitted(_)))
        .count();
    tracing::debug!(
        tick = now,
        agents = agent_ids.len(),
        emitted,
        refused = outcomes.len() - emitted,
        "agent pipeline ran"
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use dominium_kernel::Q16;
    use dominium_world::{GoalStatus, GoalType, Preconditions, Schedule};

    #[test]
    fn full_pipeline_emits_observe_command_for_survey_goal() {
        let mut agents: Registry<Agent> = Registry::new(0);
        let agent = Agent {
            schedule: Schedule {
                compute_budget: 1,
                ..Schedule::default()
            },
            ..Agent::default()
        };
        let a = agents.register(None, agent).unwrap();
        let mut goals: Registry<Goal> = Registry::new(0);
        goals
            .register(
                None,
                Goal {
                    agent_id: a,
                    conditions: vec![],
                    goal_type: GoalType::Survey,
                    status: GoalStatus::Pending,
                    base_priority: Q16::from_int(1),
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
                },
            )
            .unwrap();

        let mut plan_counter = 0;
        let mut command_counter = 0;
        let outcomes = run_pipeline(
            &[a],
            &mut agents,
            &mut goals,
            &Registry::new(0),
            &Registry::new(0),
            &Registry::new(0),
            &mut plan_counter,
            &mut command_counter,
            0,
        );
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], EmitOutcome::Emitted(_)));
    }
}
