//! Core library for MCODE complex detection in interaction networks

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod storage;

pub use anyhow::{Result, anyhow};

pub use cluster::engine::{CancelToken, ClusteringEngine, FindOutcome, ScoreOutcome};
pub use cluster::Cluster;
pub use config::{ParameterSet, Scope};
pub use error::ClusteringError;
pub use graph::{CompressedGraph, InducedSubgraph, Network, NodeId};
