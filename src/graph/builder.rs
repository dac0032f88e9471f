//! Graph construction module

use std::collections::HashMap;

use crate::graph::{CompressedGraph, NodeId};

/// Builder for incrementally constructing an undirected CompressedGraph
pub struct GraphBuilder {
    /// Mapping from labels to node indices
    label_to_index: HashMap<String, NodeId>,

    /// Node labels
    node_labels: Vec<String>,

    /// Adjacency lists for each node
    adjacency_lists: Vec<Vec<NodeId>>,
}

impl GraphBuilder {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            label_to_index: HashMap::with_capacity(capacity),
            node_labels: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
        }
    }

    /// Number of nodes created so far
    pub fn node_count(&self) -> usize {
        self.node_labels.len()
    }

    /// Get or create a node ID for the given label
    pub fn get_or_create_node(&mut self, label: &str) -> NodeId {
        if let Some(&idx) = self.label_to_index.get(label) {
            return idx;
        }

        // Create a new node
        let idx = self.node_labels.len() as NodeId;
        self.label_to_index.insert(label.to_string(), idx);
        self.node_labels.push(label.to_string());
        self.adjacency_lists.push(Vec::new());

        idx
    }

    /// Add an undirected edge between two nodes
    pub fn add_edge(&mut self, a: &str, b: &str) {
        let a_idx = self.get_or_create_node(a);
        let b_idx = self.get_or_create_node(b);

        self.adjacency_lists[a_idx as usize].push(b_idx);
        if a_idx != b_idx {
            self.adjacency_lists[b_idx as usize].push(a_idx);
        }
    }

    /// Build the compressed graph
    pub fn build(self) -> CompressedGraph {
        let mut graph = CompressedGraph::from_adjacency_lists(self.adjacency_lists);
        graph.node_labels = Some(self.node_labels);
        graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
