//! Node scoring: neighborhood density weighted by the highest k-core

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cluster::kcore::highest_k_core;
use crate::config::ParameterSet;
use crate::graph::{InducedSubgraph, Network, NodeId};

/// Per-node information gathered during a scoring pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Edge density of the closed neighborhood
    pub density: f64,

    /// Size of the closed neighborhood
    pub neighbor_count: usize,

    /// Closed neighborhood (the node itself included)
    pub neighbors: Vec<NodeId>,

    /// Highest k with a non-empty k-core in the neighborhood
    pub core_level: u32,

    /// Density of that highest k-core
    pub core_density: f64,

    pub score: f64,
}

/// Ratio of actual to possible edges, with `n * n` possible edges.
///
/// Self-loops are subtracted from the actual edges unless `include_loops`
/// is set. An empty view divides zero by zero and yields NaN.
pub fn calc_density(view: &InducedSubgraph, include_loops: bool) -> f64 {
    let n = view.node_count() as f64;
    let possible_edges = n * n;

    let actual_edges = if include_loops {
        view.edge_count()
    } else {
        view.edge_count() - view.self_loop_count()
    };

    actual_edges as f64 / possible_edges
}

/// Compute density and core information for the neighborhood of `node`.
///
/// The returned info has a zero score; see [`score_node`].
pub fn calc_node_info<G: Network + ?Sized>(graph: &G, node: NodeId, include_loops: bool) -> NodeInfo {
    let mut neighbors = graph.neighbors(node);

    // With fewer than two neighbors there is no neighborhood to speak of
    if neighbors.len() < 2 {
        let mut info = NodeInfo::default();
        if neighbors.len() == 1 {
            info.core_level = 1;
            info.core_density = 1.0;
            info.density = 1.0;
        }
        return info;
    }

    // Close the neighborhood over the node itself
    if let Err(pos) = neighbors.binary_search(&node) {
        neighbors.insert(pos, node);
    }

    let neighborhood = InducedSubgraph::new(graph, &neighbors);
    let (core_level, core) = highest_k_core(&neighborhood);

    NodeInfo {
        density: calc_density(&neighborhood, include_loops),
        neighbor_count: neighbors.len(),
        neighbors,
        core_level,
        core_density: core
            .map(|core| calc_density(&core, include_loops))
            .unwrap_or(0.0),
        score: 0.0,
    }
}

/// Weighted core score, suppressed for nodes with too small a neighborhood
pub fn node_score(info: &NodeInfo, degree_cutoff: u32) -> f64 {
    if info.neighbor_count > degree_cutoff as usize {
        info.core_density * info.core_level as f64
    } else {
        0.0
    }
}

/// Compute the full node info, score included, for `node`
pub fn score_node<G: Network + ?Sized>(graph: &G, node: NodeId, params: &ParameterSet) -> NodeInfo {
    let mut info = calc_node_info(graph, node, params.include_loops);
    info.score = node_score(&info, params.degree_cutoff);
    info
}

/// Cluster score: density of the members, loops always included, times
/// their number
pub fn score_cluster<G: Network + ?Sized>(graph: &G, members: &[NodeId]) -> f64 {
    let view = InducedSubgraph::new(graph, members);
    calc_density(&view, true) * view.node_count() as f64
}

/// Total order over scores so they can key a BTreeMap
#[derive(Debug, Clone, Copy)]
struct ScoreKey(f64);

impl PartialEq for ScoreKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoreKey {}

impl PartialOrd for ScoreKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoreKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Node ids grouped by score, walked from the highest score down.
///
/// Within a bucket nodes keep the order they were inserted in.
#[derive(Debug, Clone, Default)]
pub struct ScoreIndex {
    buckets: BTreeMap<ScoreKey, Vec<NodeId>>,
    node_count: usize,
}

impl ScoreIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, score: f64, node: NodeId) {
        self.buckets.entry(ScoreKey(score)).or_default().push(node);
        self.node_count += 1;
    }

    /// Buckets in descending score order
    pub fn iter_descending(&self) -> impl Iterator<Item = (f64, &[NodeId])> + '_ {
        self.buckets
            .iter()
            .rev()
            .map(|(score, nodes)| (score.0, nodes.as_slice()))
    }

    pub fn max_score(&self) -> Option<f64> {
        self.buckets.keys().next_back().map(|score| score.0)
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
