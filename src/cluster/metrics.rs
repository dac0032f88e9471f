//! Cluster statistics and metrics

use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::graph::{InducedSubgraph, Network, NodeId};

/// Number of central nodes reported per cluster
const TOP_CENTRAL_NODES: usize = 5;

/// Descriptive statistics for one cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub rank: u32,
    pub seed: NodeId,
    pub size: usize,
    pub score: f64,

    /// Edges with both endpoints in the cluster, self-loops excluded
    pub internal_edges: usize,

    /// Density: actual edges / potential edges, with n * (n - 1) / 2 potential edges
    pub density: f64,

    /// Members with the highest degree inside the cluster
    pub central_nodes: Vec<NodeId>,
}

/// Calculate the metrics of a single cluster
pub fn summarize_cluster<G: Network + ?Sized>(graph: &G, cluster: &Cluster) -> ClusterSummary {
    let view = InducedSubgraph::new(graph, &cluster.members);
    let internal_edges = view.edge_count() - view.self_loop_count();

    ClusterSummary {
        rank: cluster.rank,
        seed: cluster.seed,
        size: cluster.size(),
        score: cluster.score,
        internal_edges,
        density: calculate_density(view.node_count(), internal_edges),
        central_nodes: central_nodes(&view, TOP_CENTRAL_NODES),
    }
}

/// Calculate metrics for all clusters in parallel
pub fn summarize_clusters<G: Network + Sync + ?Sized>(graph: &G, clusters: &[Cluster]) -> Vec<ClusterSummary> {
    log::info!("Summarizing {} clusters", clusters.len());

    clusters
        .par_iter()
        .map(|cluster| summarize_cluster(graph, cluster))
        .collect()
}

/// Conventional undirected density; singletons have density 1 by convention
pub fn calculate_density(node_count: usize, edges: usize) -> f64 {
    if node_count <= 1 {
        return 1.0;
    }
    let potential_edges = node_count * (node_count - 1) / 2;
    edges as f64 / potential_edges as f64
}

/// Members sorted by degree (highest first), ties broken by id
fn central_nodes(view: &InducedSubgraph, top_n: usize) -> Vec<NodeId> {
    view.node_ids()
        .map(|node| {
            let loops = usize::from(view.is_neighbor(node, node));
            (node, view.distinct_degree(node).unwrap_or(0) - loops)
        })
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .take(top_n)
        .map(|(node, _)| node)
        .collect()
}
