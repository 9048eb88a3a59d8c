//! Ergonomic two-node, one-edge [`Network`] construction for tests.
//!
//! Most `dominium-network` call sites need exactly this shape — a source
//! and a sink joined by one edge — so building it by hand (two
//! `Registry::register` calls plus an `Edge::new`) repeats across every
//! crate that exercises `transfer`/`maintain`. [`NetworkBuilder`] collapses
//! that to one call.

use dominium_kernel::Q16;
use dominium_network::{Edge, Network, NetworkKind, Node};

/// The two node ids and one edge id a [`NetworkBuilder::build`] call
/// produces, alongside the network itself.
#[derive(Debug, Clone, Copy)]
pub struct TwoNodeNetwork {
    /// The constructed network.
    pub network: Network,
    /// The source node's id.
    pub source: u64,
    /// The sink node's id.
    pub sink: u64,
    /// The edge id joining `source` and `sink`.
    pub edge: u64,
}

/// Builder for a two-node, one-edge [`Network`] fixture.
#[derive(Debug, Clone, Copy)]
pub struct NetworkBuilder {
    kind: NetworkKind,
    node_capacity: Q16,
    node_loss: Q16,
    node_min_required: Q16,
    edge_capacity: Q16,
    edge_loss: Q16,
}

impl NetworkBuilder {
    /// Starts a builder for an `Electrical` network with generous, lossless
    /// capacities: nodes hold `100` (fully stocked), edges carry `20`.
    #[must_use]
    pub fn new(kind: NetworkKind) -> Self {
        Self {
            kind,
            node_capacity: Q16::from_int(100),
            node_loss: Q16::zero(),
            node_min_required: Q16::zero(),
            edge_capacity: Q16::from_int(20),
            edge_loss: Q16::zero(),
        }
    }

    /// Overrides every node's capacity (nodes are always built fully
    /// stocked, `stored == capacity`).
    #[must_use]
    pub fn node_capacity(mut self, capacity: Q16) -> Self {
        self.node_capacity = capacity;
        self
    }

    /// Overrides every node's minimum required stored amount.
    #[must_use]
    pub fn node_min_required(mut self, min_required: Q16) -> Self {
        self.node_min_required = min_required;
        self
    }

    /// Overrides the joining edge's capacity.
    #[must_use]
    pub fn edge_capacity(mut self, capacity: Q16) -> Self {
        self.edge_capacity = capacity;
        self
    }

    /// Builds the network: two nodes and one edge joining them.
    #[must_use]
    pub fn build(self) -> TwoNodeNetwork {
        let mut network = Network::new(self.kind);
        let source = network
            .nodes
            .register(
                None,
                Node::new(self.node_capacity, self.node_loss, self.node_min_required),
            )
            .unwrap_or(0);
        let sink = network
            .nodes
            .register(
                None,
                Node::new(self.node_capacity, self.node_loss, self.node_min_required),
            )
            .unwrap_or(0);
        let edge = network
            .edges
            .register(None, Edge::new(source, sink, self.edge_capacity, self.edge_loss))
            .unwrap_or(0);

        TwoNodeNetwork {
            network,
            source,
            sink,
            edge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_produces_a_joined_pair() {
        let fixture = NetworkBuilder::new(NetworkKind::Electrical).build();
        assert!(fixture.network.nodes.contains(fixture.source));
        assert!(fixture.network.nodes.contains(fixture.sink));
        assert!(fixture.network.edges.contains(fixture.edge));
    }

    #[test]
    fn edge_capacity_override_is_applied() {
        let fixture = NetworkBuilder::new(NetworkKind::Electrical)
            .edge_capacity(Q16::from_int(1))
            .build();
        let edge = fixture.network.edges.find(fixture.edge).unwrap();
        assert_eq!(edge.capacity, Q16::from_int(1));
    }
}
