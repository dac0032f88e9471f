//! Cluster core expansion from a seed node

use std::collections::{HashMap, HashSet};

use crate::cluster::scoring::NodeInfo;
use crate::error::ClusteringError;
use crate::graph::NodeId;

/// One level of the depth-first walk: a node and how far through its
/// neighbor list we are
struct Frame {
    node: NodeId,
    depth: u32,
    cursor: usize,
}

fn info_of(node_infos: &HashMap<NodeId, NodeInfo>, node: NodeId) -> Result<&NodeInfo, ClusteringError> {
    node_infos
        .get(&node)
        .ok_or_else(|| ClusteringError::missing_node_info(node))
}

/// Grow a cluster core outward from `seed`.
///
/// A neighbor joins when it is unclaimed and scores at least
/// `seed_score - seed_score * score_cutoff`, where `seed_score` is the score
/// of `seed` for the whole walk. Every node entered is marked in
/// `global_seen`, which stays marked across calls so later seeds cannot
/// claim it. Nodes deeper than `max_depth` are marked but not expanded.
///
/// The seed itself is not part of the returned list.
pub fn expand_core(
    seed: NodeId,
    global_seen: &mut HashSet<NodeId>,
    score_cutoff: f64,
    max_depth: u32,
    node_infos: &HashMap<NodeId, NodeInfo>,
) -> Result<Vec<NodeId>, ClusteringError> {
    let seed_score = info_of(node_infos, seed)?.score;
    let threshold = seed_score - seed_score * score_cutoff;

    let mut members = Vec::new();
    let mut in_cluster = HashSet::new();

    if !global_seen.insert(seed) || max_depth < 1 {
        return Ok(members);
    }

    // Explicit stack in place of recursion, visiting nodes in the same order
    let mut stack = vec![Frame {
        node: seed,
        depth: 1,
        cursor: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let neighbors = &info_of(node_infos, frame.node)?.neighbors;
        let Some(&neighbor) = neighbors.get(frame.cursor) else {
            stack.pop();
            continue;
        };
        frame.cursor += 1;
        let depth = frame.depth + 1;

        if global_seen.contains(&neighbor) {
            continue;
        }
        if info_of(node_infos, neighbor)?.score < threshold {
            continue;
        }

        if in_cluster.insert(neighbor) {
            members.push(neighbor);
        }

        global_seen.insert(neighbor);
        if depth <= max_depth {
            stack.push(Frame {
                node: neighbor,
                depth,
                cursor: 0,
            });
        }
    }

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(score: f64, neighbors: &[NodeId]) -> NodeInfo {
        NodeInfo {
            score,
            neighbor_count: neighbors.len(),
            neighbors: neighbors.to_vec(),
            ..NodeInfo::default()
        }
    }

    // Path 0-1-2-3 with scores falling off along it
    fn path_infos() -> HashMap<NodeId, NodeInfo> {
        HashMap::from([
            (0, info(1.0, &[0, 1])),
            (1, info(0.9, &[0, 1, 2])),
            (2, info(0.85, &[1, 2, 3])),
            (3, info(0.75, &[2, 3])),
        ])
    }

    #[test]
    fn threshold_is_fixed_to_seed_score() {
        let infos = path_infos();
        let mut seen = HashSet::new();

        // Node 3 clears a cutoff taken from node 2 (0.68) but not the seed's (0.8)
        let members = expand_core(0, &mut seen, 0.2, 100, &infos).unwrap();
        assert_eq!(members, vec![1, 2]);
        assert!(seen.contains(&0));
        assert!(!seen.contains(&3));
    }

    #[test]
    fn already_seen_seed_yields_nothing() {
        let infos = path_infos();
        let mut seen = HashSet::from([0]);
        assert!(expand_core(0, &mut seen, 0.2, 100, &infos).unwrap().is_empty());
    }

    #[test]
    fn claimed_nodes_are_never_added() {
        let infos = path_infos();
        let mut seen = HashSet::from([2]);
        let members = expand_core(0, &mut seen, 1.0, 100, &infos).unwrap();
        assert_eq!(members, vec![1]);
    }

    #[test]
    fn depth_limit_marks_but_does_not_expand() {
        let infos = path_infos();
        let mut seen = HashSet::new();

        let members = expand_core(0, &mut seen, 1.0, 1, &infos).unwrap();
        assert_eq!(members, vec![1]);
        assert!(seen.contains(&1));
        assert!(!seen.contains(&2));

        let mut seen = HashSet::new();
        let members = expand_core(0, &mut seen, 1.0, 2, &infos).unwrap();
        assert_eq!(members, vec![1, 2]);
    }

    #[test]
    fn zero_depth_claims_only_the_seed() {
        let infos = path_infos();
        let mut seen = HashSet::new();
        assert!(expand_core(0, &mut seen, 1.0, 0, &infos).unwrap().is_empty());
        assert_eq!(seen, HashSet::from([0]));
    }

    #[test]
    fn consecutive_seeds_do_not_share_members() {
        // Two triangles joined by the edge 2-3
        let infos = HashMap::from([
            (0, info(1.0, &[0, 1, 2])),
            (1, info(1.0, &[0, 1, 2])),
            (2, info(1.0, &[0, 1, 2, 3])),
            (3, info(1.0, &[2, 3, 4, 5])),
            (4, info(1.0, &[3, 4, 5])),
            (5, info(1.0, &[3, 4, 5])),
        ]);
        let mut seen = HashSet::new();

        let first = expand_core(0, &mut seen, 0.0, 100, &infos).unwrap();
        let second = expand_core(4, &mut seen, 0.0, 100, &infos).unwrap();
        assert_eq!(first, vec![1, 2, 3, 4, 5]);
        assert!(second.is_empty());
    }

    #[test]
    fn missing_info_is_an_error() {
        let infos = HashMap::from([(0, info(1.0, &[0, 9]))]);
        let mut seen = HashSet::new();
        assert!(matches!(
            expand_core(0, &mut seen, 0.2, 100, &infos),
            Err(ClusteringError::InconsistentState(_))
        ));
    }
}
