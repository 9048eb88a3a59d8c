//! `evaluate`: the six-precondition physical-process interpreter (spec
//! §4.6).

use crate::desc::LocalProcessDesc;
use crate::kind::ProcessKind;
use crate::outcome::ProcessEffect;
use dominium_field::FieldStorage;
use dominium_kernel::{seed_for, Q16, SplitMix64};
use dominium_network::Network;
use dominium_registry::Registry;
use dominium_world::{Assembly, CapabilityMask, Constraint, Refusal};

/// Materializes a deterministic latent value for `field_id` at `cell`, if
/// the field is currently `UNKNOWN`, seeded by `(world_seed, field_id)`
/// (spec §4.6 precondition 4). A no-op if the cell already holds a value.
fn refine_if_unknown(fields: &mut FieldStorage, world_seed: u64, field_id: u32, cell: (i32, i32, i32)) {
    if fields.get(field_id, cell.0, cell.1, cell.2).is_some() {
        return;
    }
    let seed = seed_for(world_seed, u64::from(field_id));
    let mut stream = SplitMix64::new(seed);
    let raw = i32::try_from(stream.next_u64() & 0xFFFF_FFFF).unwrap_or(i32::MAX);
    let _ = fields.set(field_id, cell.0, cell.1, cell.2, Q16::from_raw(raw));
}

/// Evaluates one physical process against world state, in the precondition
/// order spec §4.6 names: capability, authority, constraint, epistemic,
/// unsupported, resource.
///
/// # Errors
/// Returns the [`Refusal`] named by whichever precondition first fails.
#[allow(clippy::too_many_arguments)]
pub fn evaluate(
    desc: &LocalProcessDesc,
    world_seed: u64,
    fields: &mut FieldStorage,
    constraints: &Registry<Constraint>,
    assemblies: &mut Registry<Assembly>,
    networks: &mut Registry<Network>,
    now: u64,
) -> Result<ProcessEffect, Refusal> {
    if !desc
        .actor_capabilities
        .superset_contains(CapabilityMask(desc.kind.required_capability_bit()))
    {
        return Err(Refusal::NoCapability);
    }
    if !desc
        .actor_authority
        .superset_contains(dominium_world::AuthorityMask(desc.kind.required_authority_bit()))
    {
        return Err(Refusal::NoAuthority);
    }
    if constraints
        .values()
        .any(|c| c.applies(desc.scope_ref, now) && c.denies(desc.kind.process_kind_bit()))
    {
        return Err(Refusal::ConstraintViolation);
    }

    refine_if_unknown(fields, world_seed, desc.field_id, desc.cell);

    let known = (desc.required_field_mask & desc.knowledge_mask) == desc.required_field_mask;
    if !known && !desc.allow_unknown {
        return Err(Refusal::Epistemic);
    }

    if let Some(max_gradient) = desc.max_surface_gradient {
        if desc.surface_gradient.raw() > max_gradient.raw() {
            return Err(Refusal::Unsupported);
        }
    }
    if let Some(min_support) = desc.min_support {
        if desc.support.raw() < min_support.raw() {
            return Err(Refusal::Unsupported);
        }
    }

    let result = if desc.kind.touches_network() {
        apply_network_effect(desc, networks)
    } else {
        apply_local_effect(desc, assemblies)
    };
    tracing::debug!(kind = ?desc.kind, ok = result.is_ok(), "process evaluated");
    result
}

fn apply_local_effect(desc: &LocalProcessDesc, assemblies: &mut Registry<Assembly>) -> Result<ProcessEffect, Refusal> {
    match desc.kind {
        ProcessKind::Survey => {
            let prior = desc.knowledge_mask;
            let confidence = Q16::from_raw(i32::MAX);
            let uncertainty = Q16::zero();
            let surveyed_field_mask = prior | desc.required_field_mask;
            Ok(ProcessEffect::Surveyed {
                surveyed_field_mask,
                confidence,
                uncertainty,
            })
        }
        ProcessKind::Assemble => {
            let assembly_id = desc.assembly_id.ok_or(Refusal::Missing)?;
            let amount = desc.resource_amount.ok_or(Refusal::ResourceEmpty)?;
            let assembly = assemblies.find_mut(assembly_id).ok_or(Refusal::Missing)?;
            assembly.add_progress(amount);
            Ok(ProcessEffect::AssemblyAdvanced {
                assembly_id,
                new_progress: assembly.progress,
            })
        }
        ProcessKind::Collect | ProcessKind::Connect | ProcessKind::Repair => {
            unreachable!("network-touching kinds are dispatched to apply_network_effect")
        }
    }
}

fn apply_network_effect(desc: &LocalProcessDesc, networks: &mut Registry<Network>) -> Result<ProcessEffect, Refusal> {
    match desc.kind {
        ProcessKind::Collect => {
            let assembly_id = desc.assembly_id.ok_or(Refusal::Missing)?;
            let node_id = desc.node_id.ok_or(Refusal::Missing)?;
            let amount = desc.resource_amount.ok_or(Refusal::ResourceEmpty)?;
            let network = networks
                .values_mut()
                .find(|net| net.nodes.contains(node_id))
                .ok_or(Refusal::Missing)?;
            let node = network.nodes.find_mut(node_id).ok_or(Refusal::Missing)?;
            if node.stored.raw() < amount.raw() {
                return Err(Refusal::ResourceEmpty);
            }
            node.stored = Q16::from_raw(node.stored.raw() - amount.raw());
            Ok(ProcessEffect::AssemblyAdvanced {
                assembly_id,
                new_progress: amount,
            })
        }
        ProcessKind::Connect => {
            let (a, b) = desc.edge_endpoints.ok_or(Refusal::Missing)?;
            let network = networks
                .values_mut()
                .find(|net| net.nodes.contains(a) && net.nodes.contains(b))
                .ok_or(Refusal::Missing)?;
            let edge_id = network
                .edges
                .iter()
                .find(|(_, e)| (e.a == a && e.b == b) || (e.a == b && e.b == a))
                .map(|(id, _)| id)
                .ok_or(Refusal::Missing)?;
            let edge = network.edges.find_mut(edge_id).ok_or(Refusal::Missing)?;
            edge.status = dominium_network::EdgeStatus::Ok;
            Ok(ProcessEffect::Connected { endpoints: (a, b) })
        }
        ProcessKind::Repair => {
            let node_id = desc.node_id.ok_or(Refusal::Missing)?;
            let network = networks
                .values_mut()
                .find(|net| net.nodes.contains(node_id))
                .ok_or(Refusal::Missing)?;
            let node = network.nodes.find_mut(node_id).ok_or(Refusal::Missing)?;
            node.status = dominium_network::NodeStatus::Ok;
            node.degraded_since = None;
            Ok(ProcessEffect::Repaired { node_id })
        }
        ProcessKind::Survey | ProcessKind::Assemble => {
            unreachable!("local kinds are dispatched to apply_local_effect")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dominium_network::NetworkKind;
    use dominium_world::{AuthorityMask, ConstraintMode};

    fn base_desc(kind: ProcessKind) -> LocalProcessDesc {
        LocalProcessDesc {
            kind,
            actor_capabilities: CapabilityMask(kind.required_capability_bit()),
            actor_authority: AuthorityMask(kind.required_authority_bit()),
            scope_ref: 0,
            required_field_mask: 0,
            knowledge_mask: 0,
            allow_unknown: true,
            field_id: 1,
            cell: (0, 0, 0),
            resource_amount: None,
            energy_load: None,
            min_support: None,
            support: Q16::zero(),
            max_surface_gradient: None,
            surface_gradient: Q16::zero(),
            assembly_id: None,
            node_id: None,
            edge_endpoints: None,
        }
    }

    #[test]
    fn missing_capability_refuses_first() {
        let mut desc = base_desc(ProcessKind::Survey);
        desc.actor_capabilities = CapabilityMask::empty();
        let mut fields = FieldStorage::new();
        let constraints: Registry<Constraint> = Registry::new(0);
        let mut assemblies: Registry<Assembly> = Registry::new(0);
        let mut networks: Registry<Network> = Registry::new(0);
        let result = evaluate(&desc, 1, &mut fields, &constraints, &mut assemblies, &mut networks, 0);
        assert_eq!(result, Err(Refusal::NoCapability));
    }

    #[test]
    fn deny_constraint_refuses_before_epistemic_check() {
        let desc = base_desc(ProcessKind::Survey);
        let mut fields = FieldStorage::new();
        let mut constraints: Registry<Constraint> = Registry::new(0);
        constraints
            .register(
                None,
                Constraint {
                    scope_ref: 0,
                    process_kind_mask: ProcessKind::Survey.process_kind_bit(),
                    mode: ConstraintMode::Deny,
                    expiry: 0,
                },
            )
            .unwrap();
        let mut assemblies: Registry<Assembly> = Registry::new(0);
        let mut networks: Registry<Network> = Registry::new(0);
        let result = evaluate(&desc, 1, &mut fields, &constraints, &mut assemblies, &mut networks, 0);
        assert_eq!(result, Err(Refusal::ConstraintViolation));
    }

    #[test]
    fn epistemic_refusal_still_refines_the_field() {
        let mut desc = base_desc(ProcessKind::Survey);
        desc.required_field_mask = 1;
        desc.knowledge_mask = 0;
        desc.allow_unknown = false;
        let mut fields = FieldStorage::new();
        let constraints: Registry<Constraint> = Registry::new(0);
        let mut assemblies: Registry<Assembly> = Registry::new(0);
        let mut networks: Registry<Network> = Registry::new(0);

        assert_eq!(fields.get(1, 0, 0, 0), None);
        let result = evaluate(&desc, 7, &mut fields, &constraints, &mut assemblies, &mut networks, 0);
        assert_eq!(result, Err(Refusal::Epistemic));
        assert!(fields.get(1, 0, 0, 0).is_some());
    }

    #[test]
    fn survey_succeeds_when_knowledge_already_satisfied() {
        let mut desc = base_desc(ProcessKind::Survey);
        desc.required_field_mask = 1;
        desc.knowledge_mask = 1;
        desc.allow_unknown = false;
        let mut fields = FieldStorage::new();
        let constraints: Registry<Constraint> = Registry::new(0);
        let mut assemblies: Registry<Assembly> = Registry::new(0);
        let mut networks: Registry<Network> = Registry::new(0);
        let result = evaluate(&desc, 1, &mut fields, &constraints, &mut assemblies, &mut networks, 0);
        assert!(matches!(result, Ok(ProcessEffect::Surveyed { .. })));
    }

    #[test]
    fn exceeding_surface_gradient_is_unsupported() {
        let mut desc = base_desc(ProcessKind::Assemble);
        desc.max_surface_gradient = Some(Q16::from_int(1));
        desc.surface_gradient = Q16::from_int(2);
        let mut fields = FieldStorage::new();
        let constraints: Registry<Constraint> = Registry::new(0);
        let mut assemblies: Registry<Assembly> = Registry::new(0);
        let mut networks: Registry<Network> = Registry::new(0);
        let result = evaluate(&desc, 1, &mut fields, &constraints, &mut assemblies, &mut networks, 0);
        assert_eq!(result, Err(Refusal::Unsupported));
    }

    #[test]
    fn assemble_advances_progress() {
        let mut desc = base_desc(ProcessKind::Assemble);
        desc.resource_amount = Some(Q16::from_int(3));
        let mut fields = FieldStorage::new();
        let constraints: Registry<Constraint> = Registry::new(0);
        let mut assemblies: Registry<Assembly> = Registry::new(0);
        let assembly_id = assemblies.register(None, Assembly::new(Q16::from_int(10))).unwrap();
        desc.assembly_id = Some(assembly_id);
        let mut networks: Registry<Network> = Registry::new(0);
        let result = evaluate(&desc, 1, &mut fields, &constraints, &mut assemblies, &mut networks, 0);
        assert_eq!(
            result,
            Ok(ProcessEffect::AssemblyAdvanced {
                assembly_id,
                new_progress: Q16::from_int(3)
            })
        );
    }

    #[test]
    fn repair_restores_failed_node() {
        let mut desc = base_desc(ProcessKind::Repair);
        let mut fields = FieldStorage::new();
        let constraints: Registry<Constraint> = Registry::new(0);
        let mut assemblies: Registry<Assembly> = Registry::new(0);
        let mut networks: Registry<Network> = Registry::new(0);
        let mut network = Network::new(NetworkKind::Electrical);
        let node_id = network
            .nodes
            .register(
                None,
                dominium_network::Node::new(Q16::from_int(10), Q16::zero(), Q16::from_int(1)),
            )
            .unwrap();
        network.nodes.find_mut(node_id).unwrap().status = dominium_network::NodeStatus::Failed;
        networks.register(None, network).unwrap();
        desc.node_id = Some(node_id);

        let result = evaluate(&desc, 1, &mut fields, &constraints, &mut assemblies, &mut networks, 0);
        assert_eq!(result, Ok(ProcessEffect::Repaired { node_id }));
    }

    #[test]
    fn collect_fails_resource_empty_when_node_has_nothing() {
        let mut desc = base_desc(ProcessKind::Collect);
        desc.resource_amount = Some(Q16::from_int(5));
        desc.assembly_id = Some(1);
        let mut fields = FieldStorage::new();
        let constraints: Registry<Constraint> = Registry::new(0);
        let mut assemblies: Registry<Assembly> = Registry::new(0);
        let mut networks: Registry<Network> = Registry::new(0);
        let mut network = Network::new(NetworkKind::Logistics);
        let node_id = network
            .nodes
            .register(
                None,
                dominium_network::Node::new(Q16::from_int(10), Q16::zero(), Q16::zero()),
            )
            .unwrap();
        network.nodes.find_mut(node_id).unwrap().stored = Q16::zero();
        networks.register(None, network).unwrap();
        desc.node_id = Some(node_id);

        let result = evaluate(&desc, 1, &mut fields, &constraints, &mut assemblies, &mut networks, 0);
        assert_eq!(result, Err(Refusal::ResourceEmpty));
    }
}
