//! MCODE clustering engine: scoring passes, cluster finding and per-result caches

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cluster::expansion::expand_core;
use crate::cluster::postprocess::{filter, fluff, haircut};
use crate::cluster::scoring::{score_cluster, score_node, NodeInfo, ScoreIndex};
use crate::cluster::Cluster;
use crate::config::{ParameterSet, Scope};
use crate::error::ClusteringError;
use crate::graph::{InducedSubgraph, Network, NodeId};

/// Shared cancellation flag.
///
/// Clones observe the same flag, so a token handed to another thread can stop
/// a run while the engine itself is mutably borrowed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// How a scoring pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOutcome {
    Completed,
    /// Stopped early; nothing was stored
    Cancelled,
}

/// Clusters of a finding pass and how it ended
#[derive(Debug, Clone)]
pub enum FindOutcome {
    Completed(Vec<Cluster>),
    /// Stopped early; holds the clusters assembled before the stop
    Cancelled(Vec<Cluster>),
}

impl FindOutcome {
    pub fn clusters(&self) -> &[Cluster] {
        match self {
            FindOutcome::Completed(clusters) | FindOutcome::Cancelled(clusters) => clusters,
        }
    }

    pub fn into_clusters(self) -> Vec<Cluster> {
        match self {
            FindOutcome::Completed(clusters) | FindOutcome::Cancelled(clusters) => clusters,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FindOutcome::Cancelled(_))
    }
}

/// Scores of one pass over a network
#[derive(Debug, Default)]
struct ScoredNetwork {
    index: ScoreIndex,
    node_infos: HashMap<NodeId, NodeInfo>,
}

/// Finds densely connected regions of a network with the MCODE algorithm.
///
/// Scoring and cluster finding run under a result title. Each title keeps the
/// scores it was found with, so finding clusters again for a title reproduces
/// its results even after other titles were scored in between.
#[derive(Debug, Default)]
pub struct ClusteringEngine {
    params: ParameterSet,
    cancel: CancelToken,

    /// Most recent completed scoring pass, whatever its title
    current: Option<Arc<ScoredNetwork>>,

    results: HashMap<String, Arc<ScoredNetwork>>,

    /// Parameters of the last cluster finding pass per title
    found_with: HashMap<String, ParameterSet>,

    last_score_time: Duration,
    last_find_time: Duration,
}

impl ClusteringEngine {
    pub fn new(params: ParameterSet) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Replace the parameters used by subsequent runs
    pub fn set_params(&mut self, params: ParameterSet) {
        self.params = params;
    }

    /// Ask the running pass to stop at its next checkpoint.
    ///
    /// The flag stays set until [`reset_cancel`](Self::reset_cancel).
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn reset_cancel(&self) {
        self.cancel.reset();
    }

    /// Handle for cancelling from another thread
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Wall time of the last completed scoring pass
    pub fn last_score_time(&self) -> Duration {
        self.last_score_time
    }

    /// Wall time of the last cluster finding pass
    pub fn last_find_time(&self) -> Duration {
        self.last_find_time
    }

    pub fn has_result(&self, title: &str) -> bool {
        self.results.contains_key(title)
    }

    /// Forget the scores kept for `title`
    pub fn clear_result(&mut self, title: &str) -> bool {
        self.found_with.remove(title);
        self.results.remove(title).is_some()
    }

    /// Node information recorded for `title`
    pub fn node_infos(&self, title: &str) -> Option<&HashMap<NodeId, NodeInfo>> {
        self.results.get(title).map(|scored| &scored.node_infos)
    }

    /// Score every node of `graph` and store the scores under `title`.
    ///
    /// Cancellation is checked before each node. A cancelled pass stores
    /// nothing, leaving earlier results for `title` in place.
    pub fn score<G: Network + ?Sized>(&mut self, graph: &G, title: &str) -> Result<ScoreOutcome, ClusteringError> {
        if self.is_cancelled() {
            log::warn!("Scoring of '{}' cancelled before it started", title);
            return Ok(ScoreOutcome::Cancelled);
        }
        self.params.validate()?;

        let start = Instant::now();
        let nodes = graph.node_ids();
        let total = nodes.len();
        let step = (total / 10).max(1);

        log::info!("Scoring {} nodes for '{}'", total, title);

        let mut scored = ScoredNetwork {
            index: ScoreIndex::new(),
            node_infos: HashMap::with_capacity(total),
        };

        for (i, node) in nodes.into_iter().enumerate() {
            if self.is_cancelled() {
                log::warn!("Scoring of '{}' cancelled after {} of {} nodes", title, i, total);
                return Ok(ScoreOutcome::Cancelled);
            }

            let info = score_node(graph, node, &self.params);
            scored.index.insert(info.score, node);
            scored.node_infos.insert(node, info);

            if (i + 1) % step == 0 {
                log::debug!("Scored {}/{} nodes ({}%)", i + 1, total, (i + 1) * 100 / total);
            }
        }

        let scored = Arc::new(scored);
        self.results.insert(title.to_string(), Arc::clone(&scored));
        self.current = Some(scored);
        self.last_score_time = start.elapsed();

        log::info!(
            "Scored '{}' in {} ms ({} distinct scores)",
            title,
            self.last_score_time.as_millis(),
            self.current.as_ref().map_or(0, |s| s.index.bucket_count())
        );

        Ok(ScoreOutcome::Completed)
    }

    /// Scores for `title`, adopting the most recent pass if it has none
    fn scored_for(&mut self, title: &str) -> Result<Arc<ScoredNetwork>, ClusteringError> {
        if let Some(scored) = self.results.get(title) {
            return Ok(Arc::clone(scored));
        }

        let current = self
            .current
            .clone()
            .ok_or_else(|| ClusteringError::NotScored(title.to_string()))?;

        log::info!("'{}' has not been scored, using the most recent scores", title);
        self.results.insert(title.to_string(), Arc::clone(&current));
        Ok(current)
    }

    /// Find clusters in `graph` using the scores stored for `title`.
    ///
    /// Seeds are taken in descending score order. Cancellation is checked
    /// before each seed; a cancelled run returns the clusters found so far as
    /// [`FindOutcome::Cancelled`]. Clusters come back sorted by descending
    /// score with ranks assigned.
    pub fn find_clusters<G: Network + ?Sized>(&mut self, graph: &G, title: &str) -> Result<FindOutcome, ClusteringError> {
        let start = Instant::now();
        self.params.validate()?;
        let scored = self.scored_for(title)?;

        log::info!("Finding clusters for '{}'", title);

        let total = scored.index.len();
        let step = (total / 10).max(1);

        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut clusters = Vec::new();
        let mut visited = 0;
        let mut cancelled = false;

        'seeds: for (_, nodes) in scored.index.iter_descending() {
            for &seed in nodes {
                if self.is_cancelled() {
                    log::warn!(
                        "Cluster finding for '{}' cancelled with {} clusters found",
                        title,
                        clusters.len()
                    );
                    cancelled = true;
                    break 'seeds;
                }

                visited += 1;
                if visited % step == 0 {
                    log::debug!("Visited {}/{} seeds ({}%)", visited, total, visited * 100 / total);
                }

                if seen.contains(&seed) {
                    continue;
                }

                let snapshot = seen.clone();
                let members = expand_core(
                    seed,
                    &mut seen,
                    self.params.node_score_cutoff,
                    self.params.max_depth_from_start,
                    &scored.node_infos,
                )?;

                let Some(members) = self.refine(graph, seed, members, &seen, &scored.node_infos)? else {
                    continue;
                };

                clusters.push(Cluster {
                    seed,
                    score: score_cluster(graph, &members),
                    members,
                    rank: 0,
                    result_title: title.to_string(),
                    seen_snapshot: snapshot,
                });
            }
        }

        if self.params.scope == Scope::Selection {
            let selected: HashSet<NodeId> = self.params.selected_nodes.iter().copied().collect();
            clusters.retain(|cluster| cluster.members.iter().any(|node| selected.contains(node)));
        }

        // Stable, so equal scores keep discovery order
        clusters.sort_by(|a, b| b.score.total_cmp(&a.score));
        for (rank, cluster) in clusters.iter_mut().enumerate() {
            cluster.rank = rank as u32;
        }

        self.found_with.insert(title.to_string(), self.params.clone());
        self.last_find_time = start.elapsed();
        log::info!(
            "Found {} clusters for '{}' in {} ms",
            clusters.len(),
            title,
            self.last_find_time.as_millis()
        );

        Ok(if cancelled {
            FindOutcome::Cancelled(clusters)
        } else {
            FindOutcome::Completed(clusters)
        })
    }

    /// Add the seed, apply the k-core filter and optional haircut / fluff.
    ///
    /// Returns `None` when the cluster is filtered out.
    fn refine<G: Network + ?Sized>(
        &self,
        graph: &G,
        seed: NodeId,
        mut members: Vec<NodeId>,
        seen: &HashSet<NodeId>,
        node_infos: &HashMap<NodeId, NodeInfo>,
    ) -> Result<Option<Vec<NodeId>>, ClusteringError> {
        if !members.contains(&seed) {
            members.push(seed);
        }

        let view = InducedSubgraph::new(graph, &members);
        if filter(&view, self.params.k_core) {
            log::debug!("Dropping cluster seeded at {}: no {}-core", seed, self.params.k_core);
            return Ok(None);
        }

        if self.params.haircut {
            haircut(&view, &mut members);
        }
        if self.params.fluff {
            fluff(&mut members, seen, node_infos, self.params.fluff_density_cutoff)?;
        }

        Ok(Some(members))
    }

    /// Regrow `cluster` from its seed with a different node score cutoff.
    ///
    /// The parameters `title` was found with apply, not the current ones. A
    /// cutoff at or below the run's cutoff starts from the cluster's seen
    /// snapshot, so the result cannot take nodes claimed by clusters found
    /// before it. A larger cutoff lowers the join threshold and may reach
    /// claimed nodes, so it starts from nothing. The k-core filter is not
    /// applied; rank and snapshot are carried over.
    pub fn explore_cluster<G: Network + ?Sized>(
        &self,
        graph: &G,
        cluster: &Cluster,
        node_score_cutoff: f64,
        title: &str,
    ) -> Result<Cluster, ClusteringError> {
        let scored = self
            .results
            .get(title)
            .ok_or_else(|| ClusteringError::NotScored(title.to_string()))?;
        let params = self.found_with.get(title).unwrap_or(&self.params);

        let mut seen = if node_score_cutoff <= params.node_score_cutoff {
            cluster.seen_snapshot.clone()
        } else {
            HashSet::new()
        };

        let mut members = expand_core(
            cluster.seed,
            &mut seen,
            node_score_cutoff,
            params.max_depth_from_start,
            &scored.node_infos,
        )?;
        if !members.contains(&cluster.seed) {
            members.push(cluster.seed);
        }

        if params.haircut {
            let view = InducedSubgraph::new(graph, &members);
            haircut(&view, &mut members);
        }
        if params.fluff {
            fluff(&mut members, &seen, &scored.node_infos, params.fluff_density_cutoff)?;
        }

        Ok(Cluster {
            seed: cluster.seed,
            score: score_cluster(graph, &members),
            members,
            rank: cluster.rank,
            result_title: title.to_string(),
            seen_snapshot: cluster.seen_snapshot.clone(),
        })
    }

    /// Score of `node` in the result stored under `title`
    pub fn get_node_score(&self, node: NodeId, title: &str) -> Result<f64, ClusteringError> {
        let scored = self
            .results
            .get(title)
            .ok_or_else(|| ClusteringError::NotScored(title.to_string()))?;

        scored
            .node_infos
            .get(&node)
            .map(|info| info.score)
            .ok_or_else(|| ClusteringError::UnknownNode {
                node,
                title: title.to_string(),
            })
    }

    /// Highest node score stored under `title`; 0.0 for an empty network
    pub fn get_max_score(&self, title: &str) -> Result<f64, ClusteringError> {
        self.results
            .get(title)
            .map(|scored| scored.index.max_score().unwrap_or(0.0))
            .ok_or_else(|| ClusteringError::NotScored(title.to_string()))
    }
}
