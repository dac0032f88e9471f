//! Cluster refinement: k-core filtering, haircut and fluff

use std::collections::{HashMap, HashSet};

use crate::cluster::kcore::k_core;
use crate::cluster::scoring::NodeInfo;
use crate::error::ClusteringError;
use crate::graph::{InducedSubgraph, NodeId};

/// Returns true when the cluster should be dropped because it has no
/// `min_k`-core
pub fn filter(cluster: &InducedSubgraph, min_k: u32) -> bool {
    k_core(cluster, min_k).is_none()
}

/// Trim a cluster to its 2-core. Without a 2-core the members are left alone.
pub fn haircut(cluster: &InducedSubgraph, members: &mut Vec<NodeId>) {
    if let Some(core) = k_core(cluster, 2) {
        members.clear();
        members.extend(core.node_ids());
    }
}

/// Grow the boundary of a cluster by one step.
///
/// Unclaimed neighbors of current members whose neighborhood density exceeds
/// `density_cutoff` are appended. Nodes added here are not marked in
/// `global_seen`, so the same node may be fluffed into several clusters.
pub fn fluff(
    members: &mut Vec<NodeId>,
    global_seen: &HashSet<NodeId>,
    node_infos: &HashMap<NodeId, NodeInfo>,
    density_cutoff: f64,
) -> Result<(), ClusteringError> {
    let mut fluffed = HashSet::new();
    let mut to_add = Vec::new();

    for member in members.iter() {
        let info = node_infos
            .get(member)
            .ok_or_else(|| ClusteringError::missing_node_info(*member))?;

        for &neighbor in &info.neighbors {
            if global_seen.contains(&neighbor) || fluffed.contains(&neighbor) {
                continue;
            }
            let density = node_infos
                .get(&neighbor)
                .ok_or_else(|| ClusteringError::missing_node_info(neighbor))?
                .density;
            if density > density_cutoff {
                fluffed.insert(neighbor);
                to_add.push(neighbor);
            }
        }
    }

    members.extend(to_add);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CompressedGraph;

    fn info(density: f64, neighbors: &[NodeId]) -> NodeInfo {
        NodeInfo {
            density,
            neighbor_count: neighbors.len(),
            neighbors: neighbors.to_vec(),
            ..NodeInfo::default()
        }
    }

    #[test]
    fn filter_rejects_clusters_without_core() {
        let graph = CompressedGraph::from_edges(3, &[(0, 1), (1, 2)]);
        let path = InducedSubgraph::new(&graph, &[0, 1, 2]);
        assert!(filter(&path, 2));
        assert!(!filter(&path, 1));
    }

    #[test]
    fn haircut_drops_pendants() {
        let graph = CompressedGraph::from_edges(4, &[(0, 1), (1, 2), (2, 0), (2, 3)]);
        let view = InducedSubgraph::new(&graph, &[0, 1, 2, 3]);
        let mut members = vec![3, 2, 1, 0];

        haircut(&view, &mut members);
        assert_eq!(members, vec![0, 1, 2]);
    }

    #[test]
    fn haircut_without_two_core_keeps_members() {
        let graph = CompressedGraph::from_edges(3, &[(0, 1), (1, 2)]);
        let view = InducedSubgraph::new(&graph, &[0, 1, 2]);
        let mut members = vec![1, 0, 2];

        haircut(&view, &mut members);
        assert_eq!(members, vec![1, 0, 2]);
    }

    #[test]
    fn fluff_adds_dense_unclaimed_neighbors_once() {
        // Cluster {0, 1}; 2 and 3 border both members, 4 borders 1 only
        let infos = HashMap::from([
            (0, info(0.5, &[0, 1, 2, 3])),
            (1, info(0.5, &[0, 1, 2, 3, 4])),
            (2, info(0.4, &[0, 1, 2])),
            (3, info(0.05, &[0, 1, 3])),
            (4, info(0.9, &[1, 4])),
        ]);
        let seen = HashSet::from([0, 1, 4]);
        let mut members = vec![0, 1];

        fluff(&mut members, &seen, &infos, 0.1).unwrap();
        assert_eq!(members, vec![0, 1, 2]);
    }

    #[test]
    fn fluff_does_not_claim_nodes() {
        let infos = HashMap::from([
            (0, info(0.5, &[0, 2])),
            (1, info(0.5, &[1, 2])),
            (2, info(0.5, &[0, 1, 2])),
        ]);
        let seen = HashSet::from([0, 1]);

        let mut first = vec![0];
        let mut second = vec![1];
        fluff(&mut first, &seen, &infos, 0.1).unwrap();
        fluff(&mut second, &seen, &infos, 0.1).unwrap();

        assert_eq!(first, vec![0, 2]);
        assert_eq!(second, vec![1, 2]);
        assert!(!seen.contains(&2));
    }
}
