//! Error types for the clustering core

use thiserror::Error;

use crate::graph::NodeId;

#[derive(Debug, Error)]
pub enum ClusteringError {
    /// The graph handed to the engine has no backing storage.
    #[error("input graph is missing")]
    NullGraph,

    #[error("inconsistent clustering state: {0}")]
    InconsistentState(String),

    /// Neither the requested title nor the current cache holds scores.
    #[error("no node scores available for result '{0}'")]
    NotScored(String),

    #[error("node {node} has no score in result '{title}'")]
    UnknownNode { node: NodeId, title: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ClusteringError {
    pub(crate) fn missing_node_info(node: NodeId) -> Self {
        Self::InconsistentState(format!("no node info recorded for node {}", node))
    }
}
