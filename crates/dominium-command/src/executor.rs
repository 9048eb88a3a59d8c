//! The command executor state machine (spec §4.5).

use crate::constants::{maintain_amount, transfer_amount, BACKOFF_TICKS, KNOW_INFRA};
use dominium_kernel::Q16;
use dominium_network::{Network, NetworkError};
use dominium_registry::Registry;
use dominium_world::{Agent, AgentStatus, Command, CommandStatus, Goal, GoalStatus, Refusal, StepKind};

/// What happened when a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command's effect completed.
    Executed,
    /// The command ran but its effect could not complete.
    Failed(Refusal),
}

fn map_network_error(err: NetworkError) -> Refusal {
    match err {
        NetworkError::NoSuchNode(_) | NetworkError::NoSuchConnection(..) | NetworkError::NoSuchEdge(_) => {
            Refusal::Missing
        }
        NetworkError::Capacity => Refusal::Capacity,
        NetworkError::InsufficientStorage => Refusal::InsufficientStorage,
    }
}

fn survey(agent: &mut Agent, networks: &Registry<Network>) -> CommandOutcome {
    if networks.is_empty() {
        return CommandOutcome::Failed(Refusal::Unsupported);
    }
    agent.belief.knowledge_mask |= KNOW_INFRA;
    agent.belief.epistemic_confidence = Q16::from_raw(i32::MAX);
    CommandOutcome::Executed
}

fn maintain(target_id: u64, networks: &mut Registry<Network>, now: u64) -> CommandOutcome {
    let Some((_, network)) = networks
        .iter_mut()
        .find(|(_, net)| net.nodes.contains(target_id))
    else {
        return CommandOutcome::Failed(Refusal::Missing);
    };
    match network.store(target_id, maintain_amount(), now) {
        Ok(()) => CommandOutcome::Executed,
        Err(err) => CommandOutcome::Failed(map_network_error(err)),
    }
}

fn transfer(source: u64, target_id: u64, networks: &mut Registry<Network>, now: u64) -> CommandOutcome {
    let Some((_, network)) = networks
        .iter_mut()
        .find(|(_, net)| net.nodes.contains(source) && net.nodes.contains(target_id))
    else {
        return CommandOutcome::Failed(Refusal::Missing);
    };
    match network.transfer(source, target_id, transfer_amount(), now) {
        Ok(()) => CommandOutcome::Executed,
        Err(err) => CommandOutcome::Failed(map_network_error(err)),
    }
}

/// Runs one command against the world's agents, goals, and networks,
/// applying the effect named in spec §4.5 and advancing the pursuing
/// goal/agent accordingly.
///
/// Since every currently defined goal type expands to exactly one
/// executable step, success always satisfies the goal outright; a future
/// multi-executable-step goal type would instead need to compare
/// `command.step_index` against the goal's full step count before
/// declaring it satisfied.
pub fn execute_command(
    command: &Command,
    agents: &mut Registry<Agent>,
    goals: &mut Registry<Goal>,
    networks: &mut Registry<Network>,
    now: u64,
) -> CommandOutcome {
    let outcome = {
        let Some(agent) = agents.find_mut(command.agent_id) else {
            return CommandOutcome::Failed(Refusal::Missing);
        };
        match command.process_kind {
            StepKind::Observe => survey(agent, networks),
            StepKind::Maintain => maintain(command.target_id, networks, now),
            StepKind::Transfer => {
                let source = agent.belief.known_resource_ref;
                transfer(source, command.target_id, networks, now)
            }
            StepKind::Move => CommandOutcome::Failed(Refusal::Unsupported),
        }
    };

    match outcome {
        CommandOutcome::Executed => {
            if let Some(goal) = goals.find_mut(command.goal_id) {
                goal.status = GoalStatus::Satisfied;
                goal.last_update_act = now;
            }
            if let Some(agent) = agents.find_mut(command.agent_id) {
                agent.schedule.status = AgentStatus::Idle;
                agent.schedule.active_goal_id = 0;
                agent.schedule.active_plan_id = 0;
                agent.schedule.resume_step = 0;
            }
        }
        CommandOutcome::Failed(_) => {
            let abandon = goals.find_mut(command.goal_id).is_some_and(|goal| {
                goal.failure_count += 1;
                goal.last_update_act = now;
                goal.failure_count >= goal.abandon_after_failures
            });
            if let Some(goal) = goals.find_mut(command.goal_id) {
                goal.status = if abandon {
                    GoalStatus::Failed
                } else {
                    GoalStatus::Pending
                };
            }
            if let Some(agent) = agents.find_mut(command.agent_id) {
                agent.schedule.status = AgentStatus::Idle;
                agent.schedule.active_goal_id = 0;
                agent.schedule.active_plan_id = 0;
                agent.schedule.resume_step = 0;
                if !abandon {
                    agent.schedule.defer_until_act = now + BACKOFF_TICKS;
                }
            }
        }
    }

    let status = match outcome {
        CommandOutcome::Executed => CommandStatus::Executed,
        CommandOutcome::Failed(_) => CommandStatus::Failed,
    };
    tracing::debug!(
        command_id = command.command_id,
        agent_id = command.agent_id,
        goal_id = command.goal_id,
        ?status,
        "command executed"
    );
    outcome
}
