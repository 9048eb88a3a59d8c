//! The text verb dispatcher: tokenizes one `verb key=value...` line and
//! runs it against a [`crate::World`], ported from `client_shell.c`'s
//! `dom_shell_dispatch` switch.
//!
//! `new-world` is deliberately not a verb handled here: constructing a
//! [`crate::World`] happens before a dispatcher has one to mutate, so the
//! CLI's REPL loop calls [`crate::bootstrap_template`]/[`crate::World::new`]
//! directly instead of routing through [`dispatch`].

use dominium_command::execute_command;
use dominium_kernel::{Q16, RefusalKind};
use dominium_network::{Network, NetworkError};
use dominium_process::{LocalProcessDesc, ProcessEffect};
use dominium_registry::Registry;
use dominium_variant::{GatedVerb, VariantScope};
use dominium_world::{
    Agent, AuthorityMask, CapabilityMask, Command, CommandStatus, Goal, GoalStatus, Preconditions,
    Refusal, StepKind,
};

use crate::content::{
    parse_authority_mask, parse_capability_mask, parse_goal_type, parse_network_kind,
    parse_process_kind,
};
use crate::playtest::ScenarioInjection;
use crate::policy::{InteractionObject, InteractionObjectKind, POLICY_INTERACTION_PLACE};
use crate::refusal_code::{process_refusal_code, refusal_kind, verb_status_for};
use crate::world::World;

/// The outcome class of one dispatched verb line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbStatus {
    /// The verb ran and succeeded.
    Ok,
    /// The line could not be parsed (unknown verb, missing/malformed key).
    Usage,
    /// The verb is syntactically valid but cannot run right now
    /// (precondition or policy refusal).
    Unavailable,
    /// The verb ran but its effect failed (capacity or physical-process
    /// refusal).
    Failure,
}

/// A dispatched verb's status plus human-readable output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbResult {
    /// The outcome class.
    pub status: VerbStatus,
    /// Free-form text describing the outcome (an id, a refusal code, ...).
    pub output: String,
}

impl VerbResult {
    fn ok(output: impl Into<String>) -> Self {
        Self {
            status: VerbStatus::Ok,
            output: output.into(),
        }
    }

    fn usage(output: impl Into<String>) -> Self {
        Self {
            status: VerbStatus::Usage,
            output: output.into(),
        }
    }

    fn refusal(refusal: Refusal) -> Self {
        let kind = refusal_kind(refusal);
        Self {
            status: verb_status_for(kind),
            output: process_refusal_code(refusal),
        }
    }
}

fn tokenize(line: &str) -> Option<(&str, Vec<(&str, &str)>)> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?;
    let mut args = Vec::new();
    for token in parts {
        let (key, value) = token.split_once('=')?;
        args.push((key, value));
    }
    Some((verb, args))
}

fn arg<'a>(args: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    args.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn arg_u64(args: &[(&str, &str)], key: &str) -> Option<u64> {
    arg(args, key).and_then(|v| v.parse().ok())
}

fn arg_u32(args: &[(&str, &str)], key: &str) -> Option<u32> {
    arg(args, key).and_then(|v| v.parse().ok())
}

fn arg_i32(args: &[(&str, &str)], key: &str) -> Option<i32> {
    arg(args, key).and_then(|v| v.parse().ok())
}

fn arg_bool(args: &[(&str, &str)], key: &str) -> bool {
    arg(args, key) == Some("true")
}

/// Parses a `Q16` literal: a plain integer (`"5"`) or the spec's explicit
/// raw-shift notation (`"5<<16"`), both yielding `Q16::from_int(5)`.
fn parse_q16(token: &str) -> Option<Q16> {
    if let Some(base) = token.strip_suffix("<<16") {
        base.trim().parse::<i32>().ok().map(Q16::from_int)
    } else {
        token.parse::<i32>().ok().map(Q16::from_int)
    }
}

fn arg_q16(args: &[(&str, &str)], key: &str) -> Option<Q16> {
    arg(args, key).and_then(parse_q16)
}

/// Tokenizes and runs `line` against `world`.
pub fn dispatch(world: &mut World, line: &str) -> VerbResult {
    let Some((verb, args)) = tokenize(line) else {
        return VerbResult::usage("malformed verb line");
    };
    match verb {
        "simulate" => verb_simulate(world, &args),
        "network-create" => verb_network_create(world, &args),
        "node-create" => verb_node_create(world, &args),
        "edge-create" => verb_edge_create(world, &args),
        "agent-add" => verb_agent_add(world, &args),
        "goal-add" => verb_goal_add(world, &args),
        "transfer" => verb_transfer(world, &args),
        "maintain" => verb_maintain(world, &args),
        "survey" => verb_survey(world, &args),
        "process" => verb_process(world, &args),
        "place" => verb_place(world, &args),
        "policy-grant" => verb_policy_grant(world, &args),
        "policy-revoke" => verb_policy_revoke(world, &args),
        "variant-declare" => verb_variant_declare(world, &args),
        "variant-set" => verb_variant_set(world, &args),
        "resolve" => verb_resolve(world, &args),
        "collapse" => verb_collapse(world, &args),
        "expand" => verb_expand(world, &args),
        "pause" => {
            world.playtest.paused = true;
            VerbResult::ok("paused")
        }
        "resume" => {
            world.playtest.paused = false;
            VerbResult::ok("resumed")
        }
        "scenario-inject" => verb_scenario_inject(world, &args),
        _ => VerbResult::usage(format!("unknown verb: {verb}")),
    }
}

fn verb_simulate(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let Some(ticks) = arg_u32(args, "ticks") else {
        return VerbResult::usage("simulate requires ticks=");
    };
    let force = arg_bool(args, "force");
    match crate::tick::simulate(world, ticks, force) {
        Ok(outcome) => VerbResult::ok(format!(
            "tick={} idle_ticks={}",
            world.tick, outcome.idle_ticks_this_call
        )),
        Err(refusal) => VerbResult::refusal(refusal),
    }
}

fn verb_network_create(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let Some(kind) = arg(args, "type").and_then(parse_network_kind) else {
        return VerbResult::usage("network-create requires a known type=");
    };
    match world.networks.register(None, Network::new(kind)) {
        Ok(id) => VerbResult::ok(format!("network={id}")),
        Err(_) => VerbResult::refusal(Refusal::Capacity),
    }
}

fn verb_node_create(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let (Some(network_id), Some(capacity), Some(loss), Some(min_required)) = (
        arg_u64(args, "network"),
        arg_q16(args, "capacity"),
        arg_q16(args, "loss"),
        arg_q16(args, "min_required"),
    ) else {
        return VerbResult::usage("node-create requires network=, capacity=, loss=, min_required=");
    };
    let Some(network) = world.networks.find_mut(network_id) else {
        return VerbResult::refusal(Refusal::Missing);
    };
    match network
        .nodes
        .register(None, dominium_network::Node::new(capacity, loss, min_required))
    {
        Ok(id) => VerbResult::ok(format!("node={id}")),
        Err(_) => VerbResult::refusal(Refusal::Capacity),
    }
}

fn verb_edge_create(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let (Some(network_id), Some(a), Some(b), Some(capacity), Some(loss)) = (
        arg_u64(args, "network"),
        arg_u64(args, "a"),
        arg_u64(args, "b"),
        arg_q16(args, "capacity"),
        arg_q16(args, "loss"),
    ) else {
        return VerbResult::usage("edge-create requires network=, a=, b=, capacity=, loss=");
    };
    let Some(network) = world.networks.find_mut(network_id) else {
        return VerbResult::refusal(Refusal::Missing);
    };
    if !network.nodes.contains(a) || !network.nodes.contains(b) {
        return VerbResult::refusal(Refusal::Missing);
    }
    match network
        .edges
        .register(None, dominium_network::Edge::new(a, b, capacity, loss))
    {
        Ok(id) => VerbResult::ok(format!("edge={id}")),
        Err(_) => VerbResult::refusal(Refusal::Capacity),
    }
}

fn verb_agent_add(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let mut agent = Agent::default();
    if let Some(caps) = arg(args, "caps") {
        agent.capability_mask = parse_capability_mask(caps);
    }
    if let Some(auth) = arg(args, "auth") {
        agent.authority_mask = parse_authority_mask(auth);
    }
    if let Some(dest) = arg_u64(args, "dest") {
        agent.belief.known_destination_ref = dest;
    }
    if let Some(resource) = arg_u64(args, "resource") {
        agent.belief.known_resource_ref = resource;
    }
    match world.agents.register(None, agent) {
        Ok(id) => VerbResult::ok(format!("agent={id}")),
        Err(_) => VerbResult::refusal(Refusal::Capacity),
    }
}

fn verb_goal_add(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let (Some(agent_id), Some(goal_type)) = (
        arg_u64(args, "agent"),
        arg(args, "type").and_then(parse_goal_type),
    ) else {
        return VerbResult::usage("goal-add requires agent= and a known type=");
    };
    if !world.agents.contains(agent_id) {
        return VerbResult::refusal(Refusal::Missing);
    }
    let goal = Goal {
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
    };
    match world.goals.register(None, goal) {
        Ok(id) => VerbResult::ok(format!("goal={id}")),
        Err(_) => VerbResult::refusal(Refusal::Capacity),
    }
}

/// Finds the first network (in insertion order) whose node set contains
/// both `a` and `b`.
fn find_network_mut(networks: &mut Registry<Network>, a: u64, b: u64) -> Option<&mut Network> {
    networks
        .iter_mut()
        .find(|(_, net)| net.nodes.contains(a) && net.nodes.contains(b))
        .map(|(_, net)| net)
}

fn map_network_error(err: NetworkError) -> Refusal {
    match err {
        NetworkError::NoSuchNode(_)
        | NetworkError::NoSuchConnection(..)
        | NetworkError::NoSuchEdge(_) => Refusal::Missing,
        NetworkError::Capacity => Refusal::Capacity,
        NetworkError::InsufficientStorage => Refusal::InsufficientStorage,
    }
}

fn verb_transfer(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let (Some(from), Some(to), Some(amount)) = (
        arg_u64(args, "from"),
        arg_u64(args, "to"),
        arg_q16(args, "amount").or_else(|| Some(dominium_command::transfer_amount())),
    ) else {
        return VerbResult::usage("transfer requires from= and to=");
    };
    let tick = world.tick;
    let Some(network) = find_network_mut(&mut world.networks, from, to) else {
        return VerbResult::refusal(Refusal::Missing);
    };
    match network.transfer(from, to, amount, tick) {
        Ok(()) => VerbResult::ok("transferred"),
        Err(err) => {
            if matches!(err, NetworkError::Capacity) {
                world.events.emit(
                    "client.network.fail",
                    &[("from", from.to_string()), ("to", to.to_string())],
                );
            }
            VerbResult::refusal(map_network_error(err))
        }
    }
}

fn verb_maintain(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let Some(node) = arg_u64(args, "node") else {
        return VerbResult::usage("maintain requires node=");
    };
    let amount = arg_q16(args, "amount").unwrap_or_else(dominium_command::maintain_amount);
    let tick = world.tick;
    let Some((_, network)) = world
        .networks
        .iter_mut()
        .find(|(_, net)| net.nodes.contains(node))
    else {
        return VerbResult::refusal(Refusal::Missing);
    };
    match network.store(node, amount, tick) {
        Ok(()) => VerbResult::ok("maintained"),
        Err(err) => VerbResult::refusal(map_network_error(err)),
    }
}

fn verb_survey(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let Some(agent_id) = arg_u64(args, "agent") else {
        return VerbResult::usage("survey requires agent=");
    };
    if !world.agents.contains(agent_id) {
        return VerbResult::refusal(Refusal::Missing);
    }
    world.next_command_id += 1;
    let command = Command {
        command_id: world.next_command_id,
        agent_id,
        goal_id: 0,
        plan_id: 0,
        step_index: 0,
        process_kind: StepKind::Observe,
        target_id: 0,
        required_authority_mask: AuthorityMask::empty(),
        status: CommandStatus::Pending,
    };
    let tick = world.tick;
    match execute_command(&command, &mut world.agents, &mut world.goals, &mut world.networks, tick) {
        dominium_command::CommandOutcome::Executed => VerbResult::ok("surveyed"),
        dominium_command::CommandOutcome::Failed(refusal) => VerbResult::refusal(refusal),
    }
}

/// Builds a [`LocalProcessDesc`] from a `process` verb line's tokens.
/// Fields with no corresponding token default to the interpreter's most
/// permissive reading (empty masks, zero cell/amount, no optional gate).
fn parse_process_desc(kind: dominium_process::ProcessKind, args: &[(&str, &str)]) -> LocalProcessDesc {
    LocalProcessDesc {
        kind,
        actor_capabilities: arg(args, "caps")
            .map(parse_capability_mask)
            .unwrap_or_else(CapabilityMask::empty),
        actor_authority: arg(args, "auth")
            .map(parse_authority_mask)
            .unwrap_or_else(AuthorityMask::empty),
        scope_ref: arg_u64(args, "scope").unwrap_or(0),
        required_field_mask: arg_u32(args, "required_field").unwrap_or(0),
        knowledge_mask: arg_u32(args, "knowledge").unwrap_or(0),
        allow_unknown: arg_bool(args, "allow_unknown"),
        field_id: arg_u32(args, "field").unwrap_or(0),
        cell: (
            arg_i32(args, "x").unwrap_or(0),
            arg_i32(args, "y").unwrap_or(0),
            arg_i32(args, "z").unwrap_or(0),
        ),
        resource_amount: arg_q16(args, "resource_amount"),
        energy_load: arg_q16(args, "energy_load"),
        min_support: arg_q16(args, "min_support"),
        support: arg_q16(args, "support").unwrap_or_else(Q16::zero),
        max_surface_gradient: arg_q16(args, "max_gradient"),
        surface_gradient: arg_q16(args, "surface_gradient").unwrap_or_else(Q16::zero),
        assembly_id: arg_u64(args, "assembly"),
        node_id: arg_u64(args, "node"),
        edge_endpoints: arg_u64(args, "edge_a").zip(arg_u64(args, "edge_b")),
    }
}

fn describe_process_effect(effect: ProcessEffect) -> String {
    match effect {
        ProcessEffect::Surveyed {
            surveyed_field_mask,
            confidence,
            uncertainty,
        } => format!(
            "surveyed mask={surveyed_field_mask} confidence={} uncertainty={}",
            confidence.raw(),
            uncertainty.raw()
        ),
        ProcessEffect::AssemblyAdvanced {
            assembly_id,
            new_progress,
        } => format!("assembly={assembly_id} progress={}", new_progress.raw()),
        ProcessEffect::Connected { endpoints: (a, b) } => format!("connected={a},{b}"),
        ProcessEffect::Repaired { node_id } => format!("repaired node={node_id}"),
    }
}

fn verb_process(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let Some(kind) = arg(args, "kind").and_then(parse_process_kind) else {
        return VerbResult::usage("process requires a known kind=");
    };
    if let Err(refusal) = world.gate.guard(GatedVerb::Process) {
        world.metrics.record_process_refusal();
        return VerbResult::refusal(refusal);
    }

    let desc = parse_process_desc(kind, args);
    let tick = world.tick;
    let world_seed = world.playtest.perturb_seed_for_tick(tick).unwrap_or(world.seed);
    world.metrics.record_process_attempt();
    let result = dominium_process::evaluate(
        &desc,
        world_seed,
        &mut world.fields,
        &world.constraints,
        &mut world.assemblies,
        &mut world.networks,
        tick,
    );
    match result {
        Ok(effect) => {
            world.clear_refusal();
            VerbResult::ok(describe_process_effect(effect))
        }
        Err(refusal) => {
            match refusal_kind(refusal) {
                RefusalKind::Precondition | RefusalKind::Policy => {
                    world.metrics.record_process_refusal();
                }
                RefusalKind::Capacity | RefusalKind::PhysicalProcess | RefusalKind::Io => {
                    world.metrics.record_process_failure();
                }
            }
            let code = process_refusal_code(refusal);
            world.events.emit(
                "client.process",
                &[("kind", format!("{kind:?}")), ("code", code.clone())],
            );
            world.set_refusal(code, "process evaluation failed");
            VerbResult::refusal(refusal)
        }
    }
}

fn verb_place(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let kind = match arg(args, "type") {
        Some("marker") => InteractionObjectKind::Marker,
        _ => return VerbResult::usage("place requires type=marker"),
    };
    let (Some(x), Some(y), Some(z)) = (arg_i32(args, "x"), arg_i32(args, "y"), arg_i32(args, "z"))
    else {
        return VerbResult::usage("place requires x=, y=, z=");
    };
    let placed_by = arg_u64(args, "agent").unwrap_or(0);
    let object = InteractionObject {
        kind,
        cell: (x, y, z),
        placed_by,
    };
    match crate::policy::place(&world.policies, &mut world.interaction_objects, object) {
        Ok(id) => VerbResult::ok(format!("object={id}")),
        Err(refusal) => VerbResult::refusal(refusal),
    }
}

fn verb_policy_grant(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let Some(id) = arg(args, "id") else {
        return VerbResult::usage("policy-grant requires id=");
    };
    world.policies.grant(id);
    VerbResult::ok(format!("granted={id}"))
}

fn verb_policy_revoke(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let Some(id) = arg(args, "id") else {
        return VerbResult::usage("policy-revoke requires id=");
    };
    world.policies.revoke(id);
    VerbResult::ok(format!("revoked={id}"))
}

fn verb_variant_declare(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let (Some(system), Some(id)) = (arg_u64(args, "system"), arg_u64(args, "id")) else {
        return VerbResult::usage("variant-declare requires system= and id=");
    };
    world.gate.declare_variant(system, id);
    if arg_bool(args, "default") {
        world.gate.set_default(system, id);
    }
    VerbResult::ok("declared")
}

fn verb_variant_set(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let (Some(system), Some(id)) = (arg_u64(args, "system"), arg_u64(args, "id")) else {
        return VerbResult::usage("variant-set requires system= and id=");
    };
    let scope = match arg(args, "scope") {
        Some("run") => VariantScope::Run,
        _ => VariantScope::World,
    };
    let outcome = world.gate.set(system, id, scope);
    let detail = outcome.detail.unwrap_or("");
    VerbResult::ok(format!("mode={:?} detail={detail}", outcome.mode))
}

fn verb_resolve(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let (Some(region), Some(now), Some(delta)) = (
        arg_u32(args, "region"),
        arg_u64(args, "now"),
        arg_u64(args, "delta"),
    ) else {
        return VerbResult::usage("resolve requires region=, now=, delta=");
    };
    let budget_units = arg_u32(args, "budget").unwrap_or(world.config.default_resolve_budget);
    let mut budget = dominium_risk::Budget::new(budget_units);
    let result = dominium_risk::resolve(&mut world.risk, region, now, delta, &mut budget);
    if result.ok {
        let flag = if result.flags.partial { "PARTIAL" } else { "FULL" };
        VerbResult::ok(format!(
            "{flag} fields={} exposures={} profiles={} claims={}",
            result.field_count, result.exposure_count, result.profile_count, result.claim_count
        ))
    } else {
        let refusal = match result.refusal_reason {
            dominium_risk::RefusalReason::DomainInactive => Refusal::GoalNotEligible,
            dominium_risk::RefusalReason::Budget | dominium_risk::RefusalReason::None => {
                Refusal::Budget
            }
        };
        VerbResult::refusal(refusal)
    }
}

fn verb_collapse(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let Some(region) = arg_u32(args, "region") else {
        return VerbResult::usage("collapse requires region=");
    };
    if world.risk.collapse_region(region) {
        VerbResult::ok("collapsed")
    } else {
        VerbResult::refusal(Refusal::Invalid)
    }
}

fn verb_expand(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let Some(region) = arg_u32(args, "region") else {
        return VerbResult::usage("expand requires region=");
    };
    if world.risk.expand_region(region) {
        VerbResult::ok("expanded")
    } else {
        VerbResult::refusal(Refusal::Invalid)
    }
}

fn verb_scenario_inject(world: &mut World, args: &[(&str, &str)]) -> VerbResult {
    let (Some(field_id), Some(x), Some(y), Some(z), Some(value)) = (
        arg_u32(args, "field"),
        arg_i32(args, "x"),
        arg_i32(args, "y"),
        arg_i32(args, "z"),
        arg_q16(args, "value"),
    ) else {
        return VerbResult::usage("scenario-inject requires field=, x=, y=, z=, value=");
    };
    let mark_known = arg_bool(args, "known");
    world.playtest.queue_injection(ScenarioInjection {
        field_id,
        cell: (x, y, z),
        value,
        mark_known,
    });
    VerbResult::ok("queued")
}
