//! `Network` implementations for external graph types

use petgraph::graph::{Graph, IndexType, NodeIndex, UnGraph};

use crate::graph::{Network, NodeId};

impl<N, E, Ix: IndexType> Network for UnGraph<N, E, Ix> {
    fn node_count(&self) -> usize {
        Graph::node_count(self)
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.node_indices().map(|idx| idx.index() as NodeId).collect()
    }

    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        if !Network::contains_node(self, node) {
            return Vec::new();
        }

        // petgraph lists parallel edges (and loops) more than once
        let mut neighbors: Vec<NodeId> = Graph::neighbors(self, NodeIndex::new(node as usize))
            .map(|idx| idx.index() as NodeId)
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }
}
