//! MCODE cluster detection module

pub mod engine;
pub mod expansion;
pub mod kcore;
pub mod metrics;
pub mod postprocess;
pub mod scoring;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// Represents a densely connected region (complex) found in the network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Node the cluster was grown from
    pub seed: NodeId,

    /// Members of this cluster (node ids, no duplicates)
    pub members: Vec<NodeId>,

    /// Density of the members (loops included) times their number
    pub score: f64,

    /// Position after sorting all clusters of a result by descending score
    pub rank: u32,

    /// Result the cluster was found under
    pub result_title: String,

    /// Nodes already claimed by other clusters when this one started growing
    #[serde(skip)]
    pub seen_snapshot: HashSet<NodeId>,
}

impl Cluster {
    /// Number of members
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// Human readable name, numbered from one
    pub fn name(&self) -> String {
        format!("Cluster {}", self.rank + 1)
    }
}
