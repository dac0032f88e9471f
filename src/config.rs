//! Parameter management for the clustering engine

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::ClusteringError;
use crate::graph::NodeId;

/// Which part of the network clusters are reported for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Every cluster found in the network
    #[default]
    Network,

    /// Only clusters touching one of the selected nodes
    Selection,
}

/// Parameters for one scoring / cluster finding run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    /// Fraction below the seed score a neighbor may fall and still join the cluster
    pub node_score_cutoff: f64,

    /// Minimum k-core a cluster must contain to be kept
    pub k_core: u32,

    /// Maximum traversal depth from the seed node
    pub max_depth_from_start: u32,

    /// Minimum closed neighborhood size for a node to receive a non-zero score
    pub degree_cutoff: u32,

    /// Trim clusters down to their 2-core
    pub haircut: bool,

    /// Grow cluster boundaries with dense neighbors
    pub fluff: bool,

    /// Minimum neighborhood density for a node to be fluffed in
    pub fluff_density_cutoff: f64,

    /// Count self-loops when computing node densities
    pub include_loops: bool,

    pub scope: Scope,

    /// Nodes of interest when `scope` is `Selection`
    pub selected_nodes: Vec<NodeId>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            node_score_cutoff: 0.2,
            k_core: 2,
            max_depth_from_start: 100,
            degree_cutoff: 2,
            haircut: true,
            fluff: false,
            fluff_density_cutoff: 0.1,
            include_loops: false,
            scope: Scope::Network,
            selected_nodes: Vec::new(),
        }
    }
}

impl ParameterSet {
    /// Load a parameter set from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let params: ParameterSet = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    /// Restrict reported clusters to those touching `nodes`
    pub fn with_selection(mut self, nodes: Vec<NodeId>) -> Self {
        self.scope = Scope::Selection;
        self.selected_nodes = nodes;
        self
    }

    /// Check that all cutoffs are within their meaningful ranges
    pub fn validate(&self) -> Result<(), ClusteringError> {
        if !(0.0..=1.0).contains(&self.node_score_cutoff) {
            return Err(ClusteringError::InvalidParameter(format!(
                "node_score_cutoff must be within [0, 1], got {}",
                self.node_score_cutoff
            )));
        }

        if !(0.0..=1.0).contains(&self.fluff_density_cutoff) {
            return Err(ClusteringError::InvalidParameter(format!(
                "fluff_density_cutoff must be within [0, 1], got {}",
                self.fluff_density_cutoff
            )));
        }

        if self.scope == Scope::Selection && self.selected_nodes.is_empty() {
            return Err(ClusteringError::InvalidParameter(
                "selection scope requires at least one selected node".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = ParameterSet::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.k_core, 2);
        assert_eq!(params.degree_cutoff, 2);
        assert_eq!(params.max_depth_from_start, 100);
        assert!(params.haircut);
        assert!(!params.fluff);
    }

    #[test]
    fn out_of_range_cutoff_is_rejected() {
        let params = ParameterSet {
            node_score_cutoff: 1.5,
            ..ParameterSet::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ClusteringError::InvalidParameter(_))
        ));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let params = ParameterSet::default().with_selection(vec![]);
        assert!(params.validate().is_err());

        let params = ParameterSet::default().with_selection(vec![3]);
        assert!(params.validate().is_ok());
        assert_eq!(params.scope, Scope::Selection);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let params: ParameterSet =
            serde_json::from_str(r#"{ "k_core": 3, "scope": "selection", "selected_nodes": [1] }"#)
                .unwrap();
        assert_eq!(params.k_core, 3);
        assert_eq!(params.scope, Scope::Selection);
        assert_eq!(params.degree_cutoff, 2);
        assert!(params.haircut);
    }
}
