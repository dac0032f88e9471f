//! Memory-efficient undirected graph representation

use std::mem;

use serde::{Deserialize, Serialize};

use crate::graph::{Network, NodeId};

/// Compressed sparse representation of an undirected graph.
///
/// Every edge `u-v` is stored in the adjacency list of both endpoints; a
/// self-loop `u-u` is stored once in the list of `u`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Number of undirected edges (self-loops included)
    pub edge_count: usize,

    /// Offset array: index where each node's neighbors begin
    /// offsets[i] to offsets[i+1] defines the neighbor range for node i
    pub offsets: Vec<u32>,

    /// Concatenated, sorted neighbor lists
    pub adjacency: Vec<NodeId>,

    /// Optional mapping from internal node IDs to original labels
    pub node_labels: Option<Vec<String>>,
}

impl CompressedGraph {
    /// Build a graph directly from an undirected edge list over `0..node_count`.
    ///
    /// Parallel edges collapse into one; `u-v` and `v-u` are the same edge.
    /// Edges with an endpoint outside `0..node_count` are skipped.
    pub fn from_edges(node_count: usize, edges: &[(NodeId, NodeId)]) -> Self {
        let mut lists: Vec<Vec<NodeId>> = vec![Vec::new(); node_count];
        for &(u, v) in edges {
            if u as usize >= node_count || v as usize >= node_count {
                log::warn!("Skipping edge {}-{}: graph has {} nodes", u, v, node_count);
                continue;
            }
            lists[u as usize].push(v);
            if u != v {
                lists[v as usize].push(u);
            }
        }
        Self::from_adjacency_lists(lists)
    }

    /// Flatten per-node neighbor lists; lists are sorted and deduplicated here
    pub(crate) fn from_adjacency_lists(mut lists: Vec<Vec<NodeId>>) -> Self {
        let node_count = lists.len();

        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);

        let mut adjacency = Vec::new();
        let mut loops = 0;
        for (node, list) in lists.iter_mut().enumerate() {
            // Sort for binary search efficiency
            list.sort_unstable();
            list.dedup();
            if list.binary_search(&(node as NodeId)).is_ok() {
                loops += 1;
            }
            adjacency.extend_from_slice(list);
            offsets.push(adjacency.len() as u32);
        }

        // Non-loop edges appear twice in the adjacency array
        let edge_count = (adjacency.len() - loops) / 2 + loops;

        Self {
            node_count,
            edge_count,
            offsets,
            adjacency,
            node_labels: None,
        }
    }

    /// Get the neighbors of a node
    pub fn neighbor_slice(&self, node: usize) -> &[NodeId] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.adjacency[start..end]
    }

    /// Label of a node, falling back to its numeric id
    pub fn label(&self, node: NodeId) -> String {
        self.node_labels
            .as_ref()
            .and_then(|labels| labels.get(node as usize))
            .cloned()
            .unwrap_or_else(|| node.to_string())
    }

    /// Look up a node id by its label
    pub fn node_by_label(&self, label: &str) -> Option<NodeId> {
        self.node_labels
            .as_ref()?
            .iter()
            .position(|l| l == label)
            .map(|idx| idx as NodeId)
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let adjacency = self.adjacency.capacity() * mem::size_of::<NodeId>();

        let labels = self
            .node_labels
            .as_ref()
            .map(|labels| labels.iter().map(|s| s.capacity()).sum::<usize>())
            .unwrap_or(0);

        base + offsets + adjacency + labels
    }
}

impl Network for CompressedGraph {
    fn node_count(&self) -> usize {
        self.node_count
    }

    fn node_ids(&self) -> Vec<NodeId> {
        (0..self.node_count as NodeId).collect()
    }

    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        if !self.contains_node(node) {
            return Vec::new();
        }
        self.neighbor_slice(node as usize).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_symmetric_and_deduplicated() {
        let graph = CompressedGraph::from_edges(3, &[(0, 1), (1, 0), (1, 2), (2, 2)]);

        assert_eq!(graph.edge_count, 3);
        assert_eq!(graph.neighbors(0), vec![1]);
        assert_eq!(graph.neighbors(1), vec![0, 2]);
        assert_eq!(graph.neighbors(2), vec![1, 2]);
        assert_eq!(graph.offsets, vec![0, 1, 3, 5]);
    }

    #[test]
    fn out_of_range_edges_are_skipped() {
        let graph = CompressedGraph::from_edges(3, &[(0, 1), (1, 5), (9, 2)]);

        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.edge_count, 1);
        assert_eq!(graph.neighbors(1), vec![0]);
        assert!(graph.neighbors(2).is_empty());
    }

    #[test]
    fn empty_graph_is_consistent() {
        let graph = CompressedGraph::from_edges(0, &[]);

        assert_eq!(graph.offsets, vec![0]);
        assert!(graph.node_ids().is_empty());
        assert!(graph.neighbors(0).is_empty());
    }

    #[test]
    fn unknown_node_has_no_neighbors() {
        let graph = CompressedGraph::from_edges(2, &[(0, 1)]);
        assert!(graph.neighbors(7).is_empty());
        assert!(!graph.contains_node(7));
    }

    #[test]
    fn labels_fall_back_to_ids() {
        let mut graph = CompressedGraph::from_edges(2, &[(0, 1)]);
        assert_eq!(graph.label(1), "1");

        graph.node_labels = Some(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(graph.label(1), "b");
        assert_eq!(graph.node_by_label("a"), Some(0));
        assert_eq!(graph.node_by_label("z"), None);
    }
}
