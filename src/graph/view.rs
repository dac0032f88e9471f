//! Induced subgraph views over a network

use std::collections::HashMap;

use crate::graph::{Network, NodeId};

/// Read-only view of a network restricted to a subset of its nodes.
///
/// The view owns a compact adjacency over local rows and never touches the
/// network it was built from. Members are kept sorted, so two views over the
/// same node set compare equal regardless of how they were derived.
#[derive(Debug, Clone, PartialEq)]
pub struct InducedSubgraph {
    /// Member node ids, sorted
    nodes: Vec<NodeId>,

    /// Original node id -> local row
    index: HashMap<NodeId, usize>,

    /// Sorted local neighbor rows; a self-loop appears once
    adjacency: Vec<Vec<usize>>,

    edge_count: usize,
    self_loops: usize,
}

impl InducedSubgraph {
    /// Build the subgraph of `graph` induced by `nodes`.
    ///
    /// Ids unknown to `graph` and duplicate ids are ignored.
    pub fn new<G: Network + ?Sized>(graph: &G, nodes: &[NodeId]) -> Self {
        let members = normalize(nodes, |node| graph.contains_node(node));
        let index = index_of(&members);

        let adjacency = members
            .iter()
            .map(|&node| {
                graph
                    .neighbors(node)
                    .into_iter()
                    .filter_map(|neighbor| index.get(&neighbor).copied())
                    .collect::<Vec<_>>()
            })
            .collect();

        Self::from_parts(members, index, adjacency)
    }

    /// Derive a narrower view over `subset`; ids outside this view are ignored
    pub fn restrict(&self, subset: &[NodeId]) -> Self {
        let members = normalize(subset, |node| self.index.contains_key(&node));
        let index = index_of(&members);

        let adjacency = members
            .iter()
            .map(|node| {
                let row = self.index[node];
                self.adjacency[row]
                    .iter()
                    .filter_map(|&neighbor_row| index.get(&self.nodes[neighbor_row]).copied())
                    .collect::<Vec<_>>()
            })
            .collect();

        Self::from_parts(members, index, adjacency)
    }

    fn from_parts(nodes: Vec<NodeId>, index: HashMap<NodeId, usize>, mut adjacency: Vec<Vec<usize>>) -> Self {
        let mut self_loops = 0;
        let mut entries = 0;
        for (row, neighbors) in adjacency.iter_mut().enumerate() {
            neighbors.sort_unstable();
            neighbors.dedup();
            if neighbors.binary_search(&row).is_ok() {
                self_loops += 1;
            }
            entries += neighbors.len();
        }

        // Non-loop edges are listed under both endpoints
        let edge_count = (entries - self_loops) / 2 + self_loops;

        Self {
            nodes,
            index,
            adjacency,
            edge_count,
            self_loops,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, each self-loop counted once
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn self_loop_count(&self) -> usize {
        self.self_loops
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    /// Member node ids in ascending order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Neighbors of a member within the view
    pub fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        match self.index.get(&node) {
            Some(&row) => self.adjacency[row].iter().map(|&r| self.nodes[r]).collect(),
            None => Vec::new(),
        }
    }

    /// Degree within the view, a self-loop contributing two
    pub fn degree(&self, node: NodeId) -> Option<usize> {
        let row = *self.index.get(&node)?;
        let looped = self.adjacency[row].binary_search(&row).is_ok();
        Some(self.adjacency[row].len() + usize::from(looped))
    }

    /// Degree within the view, a self-loop contributing one
    pub fn distinct_degree(&self, node: NodeId) -> Option<usize> {
        self.index.get(&node).map(|&row| self.adjacency[row].len())
    }

    pub fn is_neighbor(&self, a: NodeId, b: NodeId) -> bool {
        match (self.index.get(&a), self.index.get(&b)) {
            (Some(&ra), Some(&rb)) => self.adjacency[ra].binary_search(&rb).is_ok(),
            _ => false,
        }
    }

    /// Drop a member and its edges; returns false if it was not a member
    pub fn remove_node(&mut self, node: NodeId) -> bool {
        if !self.contains(node) {
            return false;
        }
        let survivors: Vec<NodeId> = self.node_ids().filter(|&n| n != node).collect();
        *self = self.restrict(&survivors);
        true
    }

    /// Drop every member
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.adjacency.clear();
        self.edge_count = 0;
        self.self_loops = 0;
    }
}

fn normalize(nodes: &[NodeId], keep: impl Fn(NodeId) -> bool) -> Vec<NodeId> {
    let mut members: Vec<NodeId> = nodes.iter().copied().filter(|&n| keep(n)).collect();
    members.sort_unstable();
    members.dedup();
    members
}

fn index_of(nodes: &[NodeId]) -> HashMap<NodeId, usize> {
    nodes.iter().enumerate().map(|(row, &node)| (node, row)).collect()
}
