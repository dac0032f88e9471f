//! K-core peeling over induced subgraphs.
//!
//! A k-core is the maximal subgraph in which every node has degree >= k.
//! Degrees are distinct degrees: a self-loop adds one, not two.

use crate::graph::{InducedSubgraph, NodeId};

/// Find the k-core of `view`, or `None` if it is empty.
///
/// Nodes below degree `k` are peeled off and the view rebuilt from the
/// survivors until a pass removes nothing. The first pass always rebuilds,
/// so the result is a fresh view even when `view` already is a k-core.
pub fn k_core(view: &InducedSubgraph, k: u32) -> Option<InducedSubgraph> {
    let k = k as usize;
    let mut core: Option<InducedSubgraph> = None;

    loop {
        let current = core.as_ref().unwrap_or(view);

        let survivors: Vec<NodeId> = current
            .node_ids()
            .filter(|&node| current.distinct_degree(node).unwrap_or(0) >= k)
            .collect();
        let removed = current.node_count() - survivors.len();

        if removed == 0 && core.is_some() {
            return core;
        }

        let next = current.restrict(&survivors);
        if next.is_empty() {
            return None;
        }
        core = Some(next);
    }
}

/// Find the highest k for which `view` has a non-empty k-core.
///
/// Each core found is fed back in when looking for the next one. Returns the
/// last k that succeeded together with its core; a view without edges yields
/// `(0, None)`.
pub fn highest_k_core(view: &InducedSubgraph) -> (u32, Option<InducedSubgraph>) {
    let mut k = 0;
    let mut best: Option<InducedSubgraph> = None;

    loop {
        let input = best.as_ref().unwrap_or(view);
        match k_core(input, k + 1) {
            Some(core) => {
                k += 1;
                best = Some(core);
            }
            None => return (k, best),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CompressedGraph;
    use test_case::test_case;

    fn view_of(node_count: usize, edges: &[(NodeId, NodeId)]) -> InducedSubgraph {
        let graph = CompressedGraph::from_edges(node_count, edges);
        let nodes: Vec<NodeId> = (0..node_count as NodeId).collect();
        InducedSubgraph::new(&graph, &nodes)
    }

    // 4-clique 0..3 with pendant 4 hanging off 0
    fn clique_with_pendant() -> InducedSubgraph {
        view_of(
            5,
            &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3), (0, 4)],
        )
    }

    #[test]
    fn zero_core_is_the_whole_view() {
        let view = clique_with_pendant();
        assert_eq!(k_core(&view, 0), Some(view.clone()));
    }

    #[test]
    fn zero_core_of_empty_view_is_none() {
        let view = view_of(0, &[]);
        assert_eq!(k_core(&view, 0), None);
    }

    #[test_case(1, &[0, 1, 2, 3, 4] ; "one core keeps pendant")]
    #[test_case(2, &[0, 1, 2, 3] ; "two core drops pendant")]
    #[test_case(3, &[0, 1, 2, 3] ; "three core is the clique")]
    fn peels_to_expected_members(k: u32, expected: &[NodeId]) {
        let core = k_core(&clique_with_pendant(), k).unwrap();
        assert_eq!(core.nodes(), expected);
    }

    #[test]
    fn too_high_k_is_none() {
        assert_eq!(k_core(&clique_with_pendant(), 4), None);
    }

    #[test]
    fn peeling_cascades() {
        // Triangle with a two-node tail: 0-1-2 triangle, 2-3, 3-4
        let view = view_of(5, &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4)]);
        let core = k_core(&view, 2).unwrap();
        assert_eq!(core.nodes(), &[0, 1, 2]);
    }

    #[test]
    fn k_core_is_a_fixed_point() {
        let view = view_of(
            7,
            &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3), (5, 6)],
        );
        for k in 0..4 {
            let once = k_core(&view, k);
            let twice = once.as_ref().and_then(|core| k_core(core, k));
            assert_eq!(once, twice, "k = {}", k);
        }
    }

    #[test]
    fn self_loop_counts_once() {
        // A lone node with a self-loop has distinct degree 1
        let view = view_of(1, &[(0, 0)]);
        assert!(k_core(&view, 1).is_some());
        assert_eq!(k_core(&view, 2), None);
        assert_eq!(highest_k_core(&view).0, 1);
    }

    #[test]
    fn isolated_node_has_no_core() {
        let view = view_of(1, &[]);
        assert_eq!(highest_k_core(&view), (0, None));
    }

    #[test]
    fn triangle_is_a_two_core() {
        let view = view_of(3, &[(0, 1), (1, 2), (2, 0)]);
        let (k, core) = highest_k_core(&view);
        assert_eq!(k, 2);
        assert_eq!(core.unwrap().nodes(), &[0, 1, 2]);
    }

    #[test]
    fn clique_with_pendant_reaches_three() {
        let (k, core) = highest_k_core(&clique_with_pendant());
        assert_eq!(k, 3);
        assert_eq!(core.unwrap().node_count(), 4);
    }
}
