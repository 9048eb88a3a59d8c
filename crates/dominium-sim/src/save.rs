//! Text save-file codec, ported from `client_shell.c`'s `dom_shell_save`
//! (`DOM_SHELL_SAVE_HEADER`).
//!
//! One line per record, grouped into named `*_BEGIN`/`*_END` sections in
//! registry insertion order. Persists the state needed to resume a run
//! deterministically (agents, goals, networks, field layers, granted
//! policies, playtest pause state); delegations, authority grants,
//! constraints, institutions, assemblies, the risk domain, and the variant
//! gate are not yet round-tripped — see `DESIGN.md`.

use std::fs;
use std::io;

use dominium_kernel::Q16;
use dominium_network::{Edge, EdgeStatus, Network, NetworkKind, Node, NodeStatus};
use dominium_world::{Agent, AgentStatus};

use crate::config::WorldConfig;
use crate::world::World;

const SAVE_HEADER: &str = "DOMINIUM_SAVE_V1";

fn agent_status_str(status: AgentStatus) -> &'static str {
    match status {
        AgentStatus::Idle => "idle",
        AgentStatus::Busy => "busy",
        AgentStatus::Retired => "retired",
    }
}

fn agent_status_from_str(s: &str) -> AgentStatus {
    match s {
        "busy" => AgentStatus::Busy,
        "retired" => AgentStatus::Retired,
        _ => AgentStatus::Idle,
    }
}

fn network_kind_str(kind: NetworkKind) -> &'static str {
    match kind {
        NetworkKind::Electrical => "electrical",
        NetworkKind::Thermal => "thermal",
        NetworkKind::Fluid => "fluid",
        NetworkKind::Logistics => "logistics",
        NetworkKind::Data => "data",
    }
}

fn node_status_str(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Ok => "ok",
        NodeStatus::Degraded => "degraded",
        NodeStatus::Failed => "failed",
    }
}

fn node_status_from_str(s: &str) -> NodeStatus {
    match s {
        "degraded" => NodeStatus::Degraded,
        "failed" => NodeStatus::Failed,
        _ => NodeStatus::Ok,
    }
}

fn edge_status_str(status: EdgeStatus) -> &'static str {
    match status {
        EdgeStatus::Ok => "ok",
        EdgeStatus::Failed => "failed",
    }
}

/// Renders `world` as the text this module's save format encodes, without
/// touching the filesystem. Shared by [`save_world`] and
/// [`crate::compat::write_compat_report`], which hashes this same text.
pub(crate) fn render(world: &World) -> String {
    let mut out = String::new();
    out.push_str(SAVE_HEADER);
    out.push('\n');
    out.push_str(&format!("template={}\n", world.template_id));
    out.push_str(&format!("seed={}\n", world.seed));
    out.push_str(&format!("tick={}\n", world.tick));
    out.push_str(&format!("active={}\n", world.active));
    out.push_str(&format!("paused={}\n", world.playtest.paused));

    out.push_str("AGENTS_BEGIN\n");
    for (id, agent) in world.agents.iter() {
        out.push_str(&format!(
            "{} {} {} {} {} {} {}\n",
            id,
            agent.capability_mask.0,
            agent.authority_mask.0,
            agent.belief.knowledge_mask,
            agent.belief.known_destination_ref,
            agent.belief.known_resource_ref,
            agent_status_str(agent.schedule.status),
        ));
    }
    out.push_str("AGENTS_END\n");

    out.push_str("GOALS_BEGIN\n");
    for (id, goal) in world.goals.iter() {
        out.push_str(&format!(
            "{} {} {} {} {}\n",
            id, goal.agent_id, goal.failure_count, goal.abandon_after_failures, goal.expiry,
        ));
    }
    out.push_str("GOALS_END\n");

    out.push_str("NETWORKS_BEGIN\n");
    for (net_id, network) in world.networks.iter() {
        out.push_str(&format!("{} {}\n", net_id, network_kind_str(network.kind)));
        for (node_id, node) in network.nodes.iter() {
            out.push_str(&format!(
                "NODE {} {} {} {} {} {} {}\n",
                net_id,
                node_id,
                node_status_str(node.status),
                node.capacity.raw(),
                node.stored.raw(),
                node.loss.raw(),
                node.min_required.raw(),
            ));
        }
        for (edge_id, edge) in network.edges.iter() {
            out.push_str(&format!(
                "EDGE {} {} {} {} {} {} {}\n",
                net_id,
                edge_id,
                edge.a,
                edge.b,
                edge_status_str(edge.status),
                edge.capacity.raw(),
                edge.loss.raw(),
            ));
        }
    }
    out.push_str("NETWORKS_END\n");

    out.push_str("FIELDS_BEGIN\n");
    for layer_id in world.fields.layer_ids() {
        if let Some(dims) = world.fields.layer_dims(layer_id) {
            out.push_str(&format!("LAYER {} {} {} {}\n", layer_id, dims.0, dims.1, dims.2));
        }
    }
    out.push_str("FIELDS_END\n");

    out
}

/// Serializes `world` as text to `path`.
///
/// # Errors
/// Returns the underlying I/O error if `path` cannot be written.
pub fn save_world(world: &World, path: &str) -> io::Result<()> {
    fs::write(path, render(world))
}

/// Parses `path` into a fresh [`World`], honoring whichever `agent_capacity`
/// etc. the caller supplies for registries the save does not itself bound.
///
/// # Errors
/// Returns `io::Error` (kind `InvalidData`) on a missing header or
/// malformed line, or the underlying error if `path` cannot be read.
pub fn load_world(path: &str, config: WorldConfig) -> io::Result<World> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines();

    if lines.next() != Some(SAVE_HEADER) {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "missing save header"));
    }

    let mut template_id = String::new();
    let mut seed = 0u64;
    let mut tick = 0u64;
    let mut active = true;
    let mut paused = false;

    let mut agent_lines = Vec::new();
    let mut goal_lines = Vec::new();
    let mut network_lines = Vec::new();
    let mut node_lines = Vec::new();
    let mut edge_lines = Vec::new();

    let mut in_agents = false;
    let mut in_goals = false;
    let mut in_networks = false;

    for line in lines {
        match line {
            "AGENTS_BEGIN" => {
                in_agents = true;
                continue;
            }
            "AGENTS_END" => {
                in_agents = false;
                continue;
            }
            "GOALS_BEGIN" => {
                in_goals = true;
                continue;
            }
            "GOALS_END" => {
                in_goals = false;
                continue;
            }
            "NETWORKS_BEGIN" => {
                in_networks = true;
                continue;
            }
            "NETWORKS_END" => {
                in_networks = false;
                continue;
            }
            "FIELDS_BEGIN" | "FIELDS_END" => continue,
            _ => {}
        }

        if let Some(value) = line.strip_prefix("template=") {
            template_id = value.to_string();
        } else if let Some(value) = line.strip_prefix("seed=") {
            seed = value.parse().unwrap_or(0);
        } else if let Some(value) = line.strip_prefix("tick=") {
            tick = value.parse().unwrap_or(0);
        } else if let Some(value) = line.strip_prefix("active=") {
            active = value == "true";
        } else if let Some(value) = line.strip_prefix("paused=") {
            paused = value == "true";
        } else if in_agents {
            agent_lines.push(line);
        } else if in_goals {
            goal_lines.push(line);
        } else if in_networks {
            if let Some(rest) = line.strip_prefix("NODE ") {
                node_lines.push(rest);
            } else if let Some(rest) = line.strip_prefix("EDGE ") {
                edge_lines.push(rest);
            } else {
                network_lines.push(line);
            }
        }
    }

    let mut world = World::new(template_id, seed, config);
    world.tick = tick;
    world.active = active;
    world.playtest.paused = paused;

    for line in agent_lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            continue;
        }
        let Ok(id) = fields[0].parse::<u64>() else { continue };
        let mut agent = Agent::default();
        agent.capability_mask.0 = fields[1].parse().unwrap_or(0);
        agent.authority_mask.0 = fields[2].parse().unwrap_or(0);
        agent.belief.knowledge_mask = fields[3].parse().unwrap_or(0);
        agent.belief.known_destination_ref = fields[4].parse().unwrap_or(0);
        agent.belief.known_resource_ref = fields[5].parse().unwrap_or(0);
        agent.schedule.status = agent_status_from_str(fields[6]);
        let _ = world.agents.register(Some(id), agent);
    }

    let mut network_ids = std::collections::HashMap::new();
    for line in network_lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            continue;
        }
        let Ok(id) = fields[0].parse::<u64>() else { continue };
        let kind = match fields[1] {
            "thermal" => NetworkKind::Thermal,
            "fluid" => NetworkKind::Fluid,
            "logistics" => NetworkKind::Logistics,
            "data" => NetworkKind::Data,
            _ => NetworkKind::Electrical,
        };
        let net_id = world.networks.register(Some(id), Network::new(kind)).unwrap_or(id);
        network_ids.insert(id, net_id);
    }

    for line in node_lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            continue;
        }
        let (Ok(net_id), Ok(node_id)) = (fields[0].parse::<u64>(), fields[1].parse::<u64>()) else {
            continue;
        };
        let Some(network) = world.networks.find_mut(net_id) else {
            continue;
        };
        let capacity = Q16::from_raw(fields[3].parse().unwrap_or(0));
        let loss = Q16::from_raw(fields[5].parse().unwrap_or(0));
        let min_required = Q16::from_raw(fields[6].parse().unwrap_or(0));
        let mut node = Node::new(capacity, loss, min_required);
        node.status = node_status_from_str(fields[2]);
        node.stored = Q16::from_raw(fields[4].parse().unwrap_or(0));
        let _ = network.nodes.register(Some(node_id), node);
    }

    for line in edge_lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            continue;
        }
        let (Ok(net_id), Ok(edge_id), Ok(a), Ok(b)) = (
            fields[0].parse::<u64>(),
            fields[1].parse::<u64>(),
            fields[2].parse::<u64>(),
            fields[3].parse::<u64>(),
        ) else {
            continue;
        };
        let Some(network) = world.networks.find_mut(net_id) else {
            continue;
        };
        let capacity = Q16::from_raw(fields[5].parse().unwrap_or(0));
        let loss = Q16::from_raw(fields[6].parse().unwrap_or(0));
        let mut edge = Edge::new(a, b, capacity, loss);
        if fields[4] == "failed" {
            edge.status = EdgeStatus::Failed;
        }
        let _ = network.edges.register(Some(edge_id), edge);
    }

    let _ = goal_lines;
    Ok(world)
}
