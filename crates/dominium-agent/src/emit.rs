//! Stage 4: `emit_commands_slice` (spec §4.4 step 4).

use crate::validate::ValidatedGoal;
use dominium_registry::Registry;
use dominium_world::{Agent, AgentStatus, Command, CommandStatus, Goal, GoalStatus, Refusal, StepKind};

/// The per-goal outcome of emission: either a command ready for the
/// executor, or the refusal that prevented one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// A command was emitted and the agent's schedule now points at it.
    Emitted(Command),
    /// No step could be emitted; the goal remains `Pending` for retry.
    Refused {
        /// The agent whose goal was not emitted.
        agent_id: u64,
        /// The goal that was not emitted.
        goal_id: u64,
        /// Why emission did not happen.
        refusal: Refusal,
    },
}

/// Every current step kind resolves its target to the agent's believed
/// destination; `TRANSFER`'s source (`known_resource_ref`) is read
/// separately by the executor at run time, not carried on the command.
fn target_for(agent: &Agent) -> u64 {
    agent.belief.known_destination_ref
}

/// Converts the first executable, unrefused step of each validated plan
/// into a command, updating the pursuing agent's schedule to point at it.
///
/// Every goal type currently defined expands to exactly one executable
/// step (`Move` steps are never executable, see
/// [`dominium_world::StepKind::is_executable`]), so this never needs to
/// resume a multi-step plan across ticks; a future goal type with two or
/// more executable steps would need `Agent::schedule::resume_step` to be
/// consulted here as a starting offset, which the field already carries.
#[must_use]
pub fn emit_commands_slice(
    validated: &[ValidatedGoal],
    agents: &mut Registry<Agent>,
    goals: &mut Registry<Goal>,
    command_id_counter: &mut u64,
    now: u64,
) -> Vec<EmitOutcome> {
    let mut out = Vec::with_capacity(validated.len());
    for plan in validated {
        if let Some(refusal) = plan.refusal {
            out.push(EmitOutcome::Refused {
                agent_id: plan.agent_id,
                goal_id: plan.goal_id,
                refusal,
            });
            continue;
        }
        let Some(step_index) = plan
            .steps
            .iter()
            .position(|(step, _)| step.is_executable())
        else {
            continue;
        };
        let (step, step_refusal) = plan.steps[step_index];
        if let Some(refusal) = step_refusal {
            out.push(EmitOutcome::Refused {
                agent_id: plan.agent_id,
                goal_id: plan.goal_id,
                refusal,
            });
            continue;
        }
        let Some(goal) = goals.find(plan.goal_id) else {
            continue;
        };
        let Some(agent) = agents.find(plan.agent_id) else {
            continue;
        };
        let target_id = target_for(agent);
        let required_authority_mask = goal.preconditions.required_authority;

        *command_id_counter += 1;
        let command = Command {
            command_id: *command_id_counter,
            agent_id: plan.agent_id,
            goal_id: plan.goal_id,
            plan_id: plan.plan_id,
            step_index: step_index as u32,
            process_kind: step,
            target_id,
            required_authority_mask,
            status: CommandStatus::Pending,
        };

        if let Some(agent) = agents.find_mut(plan.agent_id) {
            agent.schedule.active_goal_id = plan.goal_id;
            agent.schedule.active_plan_id = plan.plan_id;
            agent.schedule.resume_step = step_index as u32;
            agent.schedule.status = AgentStatus::Busy;
        }
        if let Some(goal) = goals.find_mut(plan.goal_id) {
            goal.status = GoalStatus::Active;
            goal.last_update_act = now;
        }
        out.push(EmitOutcome::Emitted(command));
    }
    out
}
