//! The network graph proper: `store`, `transfer`, `tick` (spec §4.7).

use crate::edge::{Edge, EdgeStatus};
use crate::node::{Node, NodeStatus};
use dominium_kernel::Q16;
use dominium_registry::Registry;
use thiserror::Error;

/// A node demoted to `Degraded` is demoted again to `Failed` if it remains
/// degraded for this many ticks without repair. Not specified numerically
/// by the distilled contract; chosen to match the other fixed cooldown
/// constants carried from `original_source` risk/network tuning.
pub const DEGRADE_COOLDOWN_TICKS: u64 = 8;

/// What a network physically carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetworkKind {
    /// Electrical distribution.
    Electrical,
    /// Thermal distribution.
    Thermal,
    /// Fluid distribution.
    Fluid,
    /// Logistics (physical goods).
    Logistics,
    /// Data distribution.
    Data,
}

/// Errors returned by [`Network`] operations. These correspond to the
/// distilled contract's negative reason codes (`-4 capacity`, ...); we
/// surface them as a typed enum rather than raw integers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// Referenced node id is not registered on this network.
    #[error("no such node: {0}")]
    NoSuchNode(u64),
    /// Referenced edge id is not registered on this network.
    #[error("no such edge: {0}")]
    NoSuchEdge(u64),
    /// No edge connects the two given nodes.
    #[error("no edge between {0} and {1}")]
    NoSuchConnection(u64, u64),
    /// The call would push `stored` above `capacity` or below `0`.
    #[error("capacity exceeded")]
    Capacity,
    /// The source node does not hold enough to satisfy the transfer.
    #[error("insufficient storage")]
    InsufficientStorage,
}

/// A network: a bounded, insertion-ordered collection of nodes and edges.
#[derive(Debug, Clone)]
pub struct Network {
    /// What this network physically carries.
    pub kind: NetworkKind,
    /// Storage points, keyed by node id.
    pub nodes: Registry<Node>,
    /// Connections between nodes, keyed by edge id.
    pub edges: Registry<Edge>,
}

impl Network {
    /// Constructs an empty network of the given kind.
    #[must_use]
    pub fn new(kind: NetworkKind) -> Self {
        Self {
            kind,
            nodes: Registry::new(0),
            edges: Registry::new(0),
        }
    }

    /// Adds `amount` to `node`'s store, clamped to `capacity` and reduced by
    /// the node's own loss fraction. Refuses (rather than saturates) an
    /// overdraw that would take `stored` below `0`.
    ///
    /// # Errors
    /// [`NetworkError::NoSuchNode`] if `node` is not registered;
    /// [`NetworkError::Capacity`] if the net delta would breach `[0, capacity]`.
    pub fn store(&mut self, node: u64, amount: Q16, _now: u64) -> Result<(), NetworkError> {
        let entry = self
            .nodes
            .find_mut(node)
            .ok_or(NetworkError::NoSuchNode(node))?;
        let retained = amount.sub(amount.mul(entry.loss));
        let next = entry.stored.add(retained);
        if next.raw() < 0 || next.raw() > entry.capacity.raw() {
            return Err(NetworkError::Capacity);
        }
        entry.stored = next;
        if entry.status == NodeStatus::Failed && entry.stored.raw() >= entry.min_required.raw() {
            entry.status = NodeStatus::Ok;
            entry.degraded_since = None;
        }
        Ok(())
    }

    /// Moves `amount` from `from` to `to` across the edge connecting them,
    /// reduced by the edge's loss fraction and debited against the edge's
    /// remaining capacity. On overdraw (of the edge, or of the destination
    /// node's capacity) the edge fails and the call is refused rather than
    /// partially applied or saturated.
    ///
    /// # Errors
    /// [`NetworkError::NoSuchNode`] if either endpoint is unregistered;
    /// [`NetworkError::NoSuchConnection`] if no edge joins them;
    /// [`NetworkError::InsufficientStorage`] if `from` cannot cover `amount`;
    /// [`NetworkError::Capacity`] if the edge cannot carry `amount`, or if
    /// delivering it would push `to`'s `stored` above its `capacity` (the
    /// edge is transitioned to [`EdgeStatus::Failed`] as part of this error).
    pub fn transfer(
        &mut self,
        from: u64,
        to: u64,
        amount: Q16,
        _now: u64,
    ) -> Result<(), NetworkError> {
        if !self.nodes.contains(from) {
            return Err(NetworkError::NoSuchNode(from));
        }
        if !self.nodes.contains(to) {
            return Err(NetworkError::NoSuchNode(to));
        }
        let edge_id = self
            .edges
            .iter()
            .find(|(_, e)| (e.a == from && e.b == to) || (e.a == to && e.b == from))
            .map(|(id, _)| id)
            .ok_or(NetworkError::NoSuchConnection(from, to))?;

        let from_stored = self
            .nodes
            .find(from)
            .map(|n| n.stored)
            .unwrap_or(Q16::zero());
        if from_stored.raw() < amount.raw() {
            return Err(NetworkError::InsufficientStorage);
        }

        let edge = self
            .edges
            .find(edge_id)
            .ok_or(NetworkError::NoSuchEdge(edge_id))?;
        let (edge_capacity, edge_loss) = (edge.capacity, edge.loss);
        if edge.status == EdgeStatus::Failed || amount.raw() > edge_capacity.raw() {
            self.edges.find_mut(edge_id).unwrap().status = EdgeStatus::Failed;
            return Err(NetworkError::Capacity);
        }
        let delivered = amount.sub(amount.mul(edge_loss));

        let to_node = self.nodes.find(to).ok_or(NetworkError::NoSuchNode(to))?;
        let next = to_node.stored.add(delivered);
        if next.raw() > to_node.capacity.raw() {
            self.edges.find_mut(edge_id).unwrap().status = EdgeStatus::Failed;
            return Err(NetworkError::Capacity);
        }

        self.edges.find_mut(edge_id).unwrap().capacity = edge_capacity.sub(amount);
        if let Some(from_node) = self.nodes.find_mut(from) {
            from_node.stored = from_node.stored.sub(amount);
        }
        if let Some(to_node) = self.nodes.find_mut(to) {
            to_node.stored = next;
            if to_node.status == NodeStatus::Failed
                && to_node.stored.raw() >= to_node.min_required.raw()
            {
                to_node.status = NodeStatus::Ok;
                to_node.degraded_since = None;
            }
        }
        Ok(())
    }

    /// Promotes under-stocked nodes to `Failed` and demotes `Degraded`
    /// nodes that have outlasted [`DEGRADE_COOLDOWN_TICKS`] to `Failed`.
    /// Iterates nodes in insertion order; edges carry no independent tick
    /// behavior (their capacity and status change only on `transfer` and
    /// `MAINTAIN`), but the world's tick orchestrator still visits this
    /// network's nodes and edges in that fixed order for determinism.
    pub fn tick(&mut self, now: u64) {
        for (_, node) in self.nodes.iter_mut() {
            if node.stored.raw() < node.min_required.raw() {
                node.status = NodeStatus::Failed;
                node.degraded_since = None;
                continue;
            }
            if node.status == NodeStatus::Degraded {
                if let Some(since) = node.degraded_since {
                    if now.saturating_sub(since) >= DEGRADE_COOLDOWN_TICKS {
                        node.status = NodeStatus::Failed;
                        node.degraded_since = None;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network_with_edge() -> (Network, u64, u64) {
        let mut net = Network::new(NetworkKind::Electrical);
        let a = net
            .nodes
            .register(None, Node::new(Q16::from_int(10), Q16::zero(), Q16::from_int(2)))
            .unwrap();
        let b = net
            .nodes
            .register(None, Node::new(Q16::from_int(10), Q16::zero(), Q16::from_int(2)))
            .unwrap();
        net.edges
            .register(None, Edge::new(a, b, Q16::from_int(5), Q16::zero()))
            .unwrap();
        (net, a, b)
    }

    #[test]
    fn store_clamps_to_capacity() {
        let (mut net, a, _) = network_with_edge();
        net.nodes.find_mut(a).unwrap().stored = Q16::from_int(9);
        assert_eq!(
            net.store(a, Q16::from_int(5), 0),
            Err(NetworkError::Capacity)
        );
    }

    #[test]
    fn transfer_moves_amount_and_debits_edge_capacity() {
        let (mut net, a, b) = network_with_edge();
        net.transfer(a, b, Q16::from_int(3), 0).unwrap();
        assert_eq!(net.nodes.find(a).unwrap().stored, Q16::from_int(7));
        assert_eq!(net.nodes.find(b).unwrap().stored, Q16::from_int(13));
        assert_eq!(
            net.edges.values().next().unwrap().capacity,
            Q16::from_int(2)
        );
    }

    #[test]
    fn transfer_overdraw_fails_edge() {
        let (mut net, a, b) = network_with_edge();
        assert_eq!(
            net.transfer(a, b, Q16::from_int(6), 0),
            Err(NetworkError::Capacity)
        );
        assert_eq!(
            net.edges.values().next().unwrap().status,
            EdgeStatus::Failed
        );
    }

    #[test]
    fn transfer_destination_overflow_is_refused_not_saturated() {
        let (mut net, a, b) = network_with_edge();
        net.nodes.find_mut(b).unwrap().stored = Q16::from_int(9);
        assert_eq!(
            net.transfer(a, b, Q16::from_int(3), 0),
            Err(NetworkError::Capacity)
        );
        assert_eq!(net.nodes.find(b).unwrap().stored, Q16::from_int(9));
        assert_eq!(net.nodes.find(a).unwrap().stored, Q16::from_int(10));
        assert_eq!(
            net.edges.values().next().unwrap().status,
            EdgeStatus::Failed
        );
    }

    #[test]
    fn transfer_insufficient_storage_is_refused() {
        let (mut net, a, b) = network_with_edge();
        net.nodes.find_mut(a).unwrap().stored = Q16::zero();
        assert_eq!(
            net.transfer(a, b, Q16::from_int(1), 0),
            Err(NetworkError::InsufficientStorage)
        );
    }

    #[test]
    fn tick_promotes_understocked_node_to_failed() {
        let (mut net, a, _) = network_with_edge();
        net.nodes.find_mut(a).unwrap().stored = Q16::from_int(1);
        net.tick(0);
        assert_eq!(net.nodes.find(a).unwrap().status, NodeStatus::Failed);
    }

    #[test]
    fn tick_demotes_degraded_after_cooldown() {
        let (mut net, a, _) = network_with_edge();
        net.nodes.find_mut(a).unwrap().degrade(0);
        net.tick(DEGRADE_COOLDOWN_TICKS);
        assert_eq!(net.nodes.find(a).unwrap().status, NodeStatus::Failed);
    }

    #[test]
    fn tick_keeps_degraded_before_cooldown_elapses() {
        let (mut net, a, _) = network_with_edge();
        net.nodes.find_mut(a).unwrap().degrade(0);
        net.tick(DEGRADE_COOLDOWN_TICKS - 1);
        assert_eq!(net.nodes.find(a).unwrap().status, NodeStatus::Degraded);
    }

    #[test]
    fn store_recovers_failed_node_once_min_required_met() {
        let (mut net, a, _) = network_with_edge();
        let node = net.nodes.find_mut(a).unwrap();
        node.status = NodeStatus::Failed;
        node.stored = Q16::zero();
        net.store(a, Q16::from_int(5), 0).unwrap();
        assert_eq!(net.nodes.find(a).unwrap().status, NodeStatus::Ok);
    }
}
