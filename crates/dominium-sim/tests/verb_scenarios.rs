// SPDX-License-Identifier: Apache-2.0
//! End-to-end verb-dispatch scenarios driving a [`World`] the way an
//! operator's text protocol would, grounded in the same fixtures
//! `dominium-risk`'s own `resolve` tests use.

use dominium_kernel::Q16;
use dominium_network::EdgeStatus;
use dominium_risk::{Budget, Point, RiskExposure, RiskField};
use dominium_sim::{bootstrap_template, dispatch, VerbStatus, WorldConfig};

#[test]
fn empty_world_tick_reports_zero_commands_and_one_idle_tick() {
    let mut world = bootstrap_template("builtin.empty_universe", 1, WorldConfig::default()).unwrap();
    let result = dispatch(&mut world, "simulate ticks=1");
    assert_eq!(result.status, VerbStatus::Ok);
    assert_eq!(world.tick, 1);
    assert_eq!(world.metrics.command_attempts, 0);
    assert_eq!(world.metrics.window().count(), 1);
}

#[test]
fn survey_goal_grants_infrastructure_knowledge() {
    let mut world = bootstrap_template("builtin.minimal_system", 1, WorldConfig::default()).unwrap();
    let agent = dispatch(&mut world, "agent-add caps=survey auth=basic");
    assert_eq!(agent.status, VerbStatus::Ok);
    let agent_id: u64 = agent.output.trim_start_matches("agent=").parse().unwrap();

    let goal = dispatch(&mut world, &format!("goal-add agent={agent_id} type=survey"));
    assert_eq!(goal.status, VerbStatus::Ok);

    let before_seq = world.events.last_seq();
    let result = dispatch(&mut world, "simulate ticks=1");
    assert_eq!(result.status, VerbStatus::Ok);

    let spawned_agent = world.agents.find(agent_id).unwrap();
    assert_ne!(spawned_agent.belief.knowledge_mask, 0);
    // `dominium-command`'s executor stamps the maximum positive `Q16` raw
    // value here (`i32::MAX`), not the wire-level `0xFFFFFFFF` some
    // upstream notes describe — that literal does not fit a signed Q16.
    assert_eq!(spawned_agent.belief.epistemic_confidence, Q16::from_raw(i32::MAX));

    assert!(world
        .events
        .lines()
        .filter(|line| line.seq > before_seq)
        .any(|line| line.line.contains("event=client.agent.command")
            && line.line.contains("process=observe")
            && line.line.contains("result=ok")));
}

#[test]
fn transfer_past_edge_capacity_fails_the_edge_and_emits_a_failure_event() {
    let mut world = bootstrap_template("builtin.empty_universe", 1, WorldConfig::default()).unwrap();
    dispatch(&mut world, "network-create type=electrical");
    let network_id = {
        let (id, _) = world.networks.iter().next().unwrap();
        id
    };
    let a = dispatch(
        &mut world,
        &format!("node-create network={network_id} capacity=100 loss=0 min_required=0"),
    );
    let b = dispatch(
        &mut world,
        &format!("node-create network={network_id} capacity=100 loss=0 min_required=0"),
    );
    let node_a: u64 = a.output.trim_start_matches("node=").parse().unwrap();
    let node_b: u64 = b.output.trim_start_matches("node=").parse().unwrap();
    dispatch(
        &mut world,
        &format!("edge-create network={network_id} a={node_a} b={node_b} capacity=1 loss=0"),
    );

    // Nodes default to fully stocked (`Node::new` sets `stored = capacity`),
    // so this transfer fails on the edge's capacity, not the source node's
    // stored amount.
    let result = dispatch(&mut world, &format!("transfer from={node_a} to={node_b} amount=2"));
    assert_eq!(result.status, VerbStatus::Failure);
    assert_eq!(result.output, "CAPACITY");

    let network = world.networks.find(network_id).unwrap();
    let (_, edge) = network.edges.iter().next().unwrap();
    assert_eq!(edge.status, EdgeStatus::Failed);

    let lines: Vec<&str> = world.events.lines().map(|l| l.line.as_str()).collect();
    assert!(lines.iter().any(|line| line.contains("event=client.network.fail")));
}

#[test]
fn resolve_on_a_collapsed_region_returns_the_capsule_snapshot() {
    let mut world = bootstrap_template("builtin.empty_universe", 1, WorldConfig::default()).unwrap();
    world
        .risk
        .fields
        .register(
            None,
            RiskField {
                risk_type_id: 1,
                exposure_rate: Q16::from_int(1),
                region_id: 7,
                radius: Q16::from_int(10),
                center: Point::default(),
            },
        )
        .unwrap();
    world
        .risk
        .exposures
        .register(
            None,
            RiskExposure {
                risk_type_id: 1,
                exposure_rate: Q16::from_int(1),
                exposure_limit: dominium_kernel::Q48::from_int(100),
                exposure_accumulated: dominium_kernel::Q48::zero(),
                sensitivity: Q16::from_int(1),
                uncertainty: Q16::zero(),
                subject_ref_id: 1,
                region_id: 7,
                location: Point::default(),
                over_limit: false,
            },
        )
        .unwrap();

    let live = dispatch(&mut world, "resolve region=7 now=1 delta=1");
    assert_eq!(live.status, VerbStatus::Ok);
    assert!(live.output.starts_with("FULL"));

    let collapsed = dispatch(&mut world, "collapse region=7");
    assert_eq!(collapsed.status, VerbStatus::Ok);

    let after = dispatch(&mut world, "resolve region=7 now=2 delta=1");
    assert_eq!(after.status, VerbStatus::Ok);
    assert!(after.output.starts_with("PARTIAL"));

    let mut budget = Budget::unbounded();
    let direct = dominium_risk::resolve(&mut world.risk, 7, 2, 1, &mut budget);
    assert!(direct.flags.partial);
    assert_eq!(direct.field_count, 1);
    assert_eq!(direct.exposure_count, 1);
}

#[test]
fn place_is_unavailable_until_the_interaction_policy_is_granted() {
    let mut world = bootstrap_template("builtin.empty_universe", 1, WorldConfig::default()).unwrap();
    let refused = dispatch(&mut world, "place type=marker x=1 y=2 z=3");
    assert_eq!(refused.status, VerbStatus::Unavailable);
    assert_eq!(refused.output, "WD-REFUSAL-SCHEMA");
    assert_eq!(world.interaction_objects.len(), 0);

    dispatch(&mut world, "policy-grant id=policy.interaction.place");
    let placed = dispatch(&mut world, "place type=marker x=1 y=2 z=3");
    assert_eq!(placed.status, VerbStatus::Ok);
    assert_eq!(world.interaction_objects.len(), 1);
}

#[test]
fn unknown_variant_selection_degrades_the_gate_until_a_known_one_is_set() {
    let mut world = bootstrap_template("builtin.empty_universe", 1, WorldConfig::default()).unwrap();
    world.gate.declare_variant(1, 10);

    let degrade = dispatch(&mut world, "variant-set system=1 id=99");
    assert_eq!(degrade.status, VerbStatus::Ok);
    assert!(degrade.output.contains("missing_variant"));
    assert_eq!(world.gate.resolve(1), None);

    let still_runs = dispatch(&mut world, "simulate ticks=1");
    assert_eq!(still_runs.status, VerbStatus::Ok);

    let restore = dispatch(&mut world, "variant-set system=1 id=10");
    assert_eq!(restore.status, VerbStatus::Ok);
    assert_eq!(world.gate.resolve(1), Some(10));
}
