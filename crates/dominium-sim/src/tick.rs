//! The `simulate` tick orchestrator, ported from `client_shell.c`'s
//! `dom_shell_simulate` six-step loop.

use dominium_agent::{run_pipeline, EmitOutcome};
use dominium_command::{execute_command, CommandOutcome};
use dominium_variant::GatedVerb;
use dominium_world::{Refusal, StepKind};

use crate::refusal_code::{command_failure_code, process_refusal_code};
use crate::world::World;

/// What one `simulate` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulateOutcome {
    /// Ticks actually advanced by this call.
    pub ticks_run: u32,
    /// How many of those ticks were idle (neither a command nor a process
    /// attempt occurred).
    pub idle_ticks_this_call: u64,
}

fn check_preconditions(world: &World, force: bool) -> Result<(), Refusal> {
    if !world.active {
        return Err(Refusal::Invalid);
    }
    world.gate.guard(GatedVerb::Simulate)?;
    if world.playtest.paused && !force {
        return Err(Refusal::PlaytestPaused);
    }
    Ok(())
}

fn step_name(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Move => "move",
        StepKind::Observe => "observe",
        StepKind::Maintain => "maintain",
        StepKind::Transfer => "transfer",
    }
}

/// Drains and applies every queued scenario injection in FIFO order,
/// against an existing layer only (spec §4.10 step 2 never auto-creates a
/// layer a template did not declare).
fn apply_pending_injections(world: &mut World) {
    while let Some(injection) = world.playtest.pending_injections.pop_front() {
        if !world.fields.has_layer(injection.field_id) {
            continue;
        }
        let (x, y, z) = injection.cell;
        if world.fields.set(injection.field_id, x, y, z, injection.value).is_err() {
            continue;
        }
        world.metrics.scenario_injections += 1;
        if injection.mark_known && injection.field_id < 32 {
            let bit = 1u32 << injection.field_id;
            for agent in world.agents.values_mut() {
                agent.belief.knowledge_mask |= bit;
            }
        }
    }
}

/// Refills every non-retired agent's per-tick compute budget. `Schedule`
/// models `compute_budget` as the allowance for "the current tick", so the
/// orchestrator re-grants it here rather than the pipeline ever replenishing
/// it itself.
fn refill_compute_budgets(world: &mut World) {
    let budget = world.config.agent_compute_budget_per_tick;
    for agent in world.agents.values_mut() {
        if agent.schedule.status != dominium_world::AgentStatus::Retired {
            agent.schedule.compute_budget = budget;
        }
    }
}

/// Runs the agent pipeline once over every registered agent, then executes
/// each emitted command in turn (spec §4.10 step 4).
fn run_agents_and_commands(world: &mut World) {
    refill_compute_budgets(world);
    let agent_ids: Vec<u64> = world.agents.iter().map(|(id, _)| id).collect();
    let tick = world.tick;
    let outcomes = run_pipeline(
        &agent_ids,
        &mut world.agents,
        &mut world.goals,
        &world.delegations,
        &world.authority_grants,
        &world.constraints,
        &mut world.next_plan_id,
        &mut world.next_command_id,
        tick,
    );

    for outcome in outcomes {
        match outcome {
            EmitOutcome::Emitted(command) => {
                world.metrics.record_command_attempt();
                let process = step_name(command.process_kind).to_string();
                match execute_command(&command, &mut world.agents, &mut world.goals, &mut world.networks, tick) {
                    CommandOutcome::Executed => {
                        world.events.emit(
                            "client.agent.command",
                            &[("process", process), ("result", "ok".to_string())],
                        );
                        world.clear_refusal();
                    }
                    CommandOutcome::Failed(refusal) => {
                        world.metrics.record_command_failure();
                        let code = command_failure_code(refusal);
                        world.events.emit(
                            "client.agent.command",
                            &[
                                ("process", process),
                                ("result", "fail".to_string()),
                                ("code", code.clone()),
                            ],
                        );
                        world.set_refusal(code, "command execution failed");
                    }
                }
            }
            EmitOutcome::Refused {
                agent_id,
                goal_id,
                refusal,
            } => {
                let code = process_refusal_code(refusal);
                world.events.emit(
                    "client.agent.refused",
                    &[
                        ("agent", agent_id.to_string()),
                        ("goal", goal_id.to_string()),
                        ("code", code.clone()),
                    ],
                );
                world.set_refusal(code, "agent pipeline refused");
            }
        }
    }
}

/// Advances every network's node/edge failure bookkeeping by one tick, in
/// insertion order, counting newly-failed nodes into this tick's metrics
/// (spec §4.10 step 5).
fn tick_networks(world: &mut World) {
    let tick = world.tick;
    for (_, network) in world.networks.iter_mut() {
        let before_failed = network
            .nodes
            .values()
            .filter(|node| node.status == dominium_network::NodeStatus::Failed)
            .count();
        network.tick(tick);
        let after_failed = network
            .nodes
            .values()
            .filter(|node| node.status == dominium_network::NodeStatus::Failed)
            .count();
        for _ in 0..after_failed.saturating_sub(before_failed) {
            world.metrics.record_network_failure();
        }
    }
}

/// Runs `world` forward by `ticks`, per spec §4.10's six-step loop: refuse
/// preconditions once; then, per tick, apply queued scenario injections,
/// reset per-tick metrics and advance the tick counter, run the agent
/// pipeline and execute its commands, tick every network, and close the
/// metrics window.
///
/// # Errors
/// Returns the precondition [`Refusal`] if the world is inactive, the
/// variant gate blocks `SIMULATE`, or the world is paused without `force`.
/// Once the call begins advancing ticks it cannot itself refuse further.
pub fn simulate(world: &mut World, ticks: u32, force: bool) -> Result<SimulateOutcome, Refusal> {
    check_preconditions(world, force)?;

    let idle_before = world.metrics.idle_ticks;
    for _ in 0..ticks {
        apply_pending_injections(world);
        world.metrics.reset_tick();
        world.tick += 1;
        run_agents_and_commands(world);
        tick_networks(world);
        world.metrics.close_tick(world.tick);
    }

    Ok(SimulateOutcome {
        ticks_run: ticks,
        idle_ticks_this_call: world.metrics.idle_ticks - idle_before,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    #[test]
    fn empty_world_tick_is_idle_with_zero_metrics() {
        let mut world = World::new("builtin.empty_universe", 1, WorldConfig::default());
        let outcome = simulate(&mut world, 1, false).unwrap();
        assert_eq!(outcome.ticks_run, 1);
        assert_eq!(outcome.idle_ticks_this_call, 1);
        assert_eq!(world.tick, 1);
        assert_eq!(world.metrics.command_attempts, 0);
    }

    #[test]
    fn paused_world_refuses_without_force() {
        let mut world = World::new("builtin.empty_universe", 1, WorldConfig::default());
        world.playtest.paused = true;
        assert_eq!(simulate(&mut world, 1, false), Err(Refusal::PlaytestPaused));
        assert_eq!(simulate(&mut world, 1, true).unwrap().ticks_run, 1);
    }

    #[test]
    fn inactive_world_refuses() {
        let mut world = World::new("builtin.empty_universe", 1, WorldConfig::default());
        world.active = false;
        assert_eq!(simulate(&mut world, 1, false), Err(Refusal::Invalid));
    }

    #[test]
    fn frozen_gate_refuses_with_variant() {
        let mut world = World::new("builtin.empty_universe", 1, WorldConfig::default());
        world.gate.force_mode(dominium_variant::VariantMode::Frozen);
        assert_eq!(simulate(&mut world, 1, false), Err(Refusal::Variant));
    }

    #[test]
    fn survey_command_marks_tick_non_idle_and_grants_knowledge() {
        use dominium_network::NetworkKind;
        use dominium_world::{Agent, Goal, GoalStatus, GoalType, Preconditions};
        use dominium_kernel::Q16;

        let mut world = World::new("builtin.empty_universe", 1, WorldConfig::default());
        world
            .networks
            .register(None, dominium_network::Network::new(NetworkKind::Electrical))
            .unwrap();
        let agent_id = world.agents.register(None, Agent::default()).unwrap();
        world
            .goals
            .register(
                None,
                Goal {
                    agent_id,
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

        let outcome = simulate(&mut world, 1, false).unwrap();
        assert_eq!(outcome.idle_ticks_this_call, 0);
        assert_eq!(world.metrics.command_attempts, 1);
        assert!(world.agents.find(agent_id).unwrap().belief.knowledge_mask != 0);
    }
}
