//! Results persistence module

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty};
use statrs::statistics::{Data, Median, Statistics};

use crate::cluster::metrics::ClusterSummary;
use crate::cluster::scoring::NodeInfo;
use crate::cluster::Cluster;
use crate::config::ParameterSet;
use crate::graph::{CompressedGraph, NodeId};

/// Everything a clustering run produced
pub struct RunResults<'a> {
    pub title: &'a str,
    pub graph: &'a CompressedGraph,
    pub params: &'a ParameterSet,
    pub node_infos: &'a HashMap<NodeId, NodeInfo>,
    pub clusters: &'a [Cluster],
    pub summaries: &'a [ClusterSummary],
}

/// Save analysis results to the specified directory
pub fn save_results(results: &RunResults<'_>, output_dir: &str) -> Result<()> {
    log::info!("Saving {} clusters to {}", results.clusters.len(), output_dir);

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(results, output_dir)?;
    save_clusters(results, output_dir)?;
    save_node_scores(results, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Mean, spread, median and maximum of the node scores
fn score_statistics(node_infos: &HashMap<NodeId, NodeInfo>) -> serde_json::Value {
    let scores: Vec<f64> = node_infos.values().map(|info| info.score).collect();
    if scores.is_empty() {
        return json!(null);
    }

    let max = scores.iter().copied().fold(f64::MIN, f64::max);
    let scored = scores.iter().filter(|&&score| score > 0.0).count();
    let mean = scores.iter().mean();
    let std_dev = scores.iter().std_dev();
    let median = Data::new(scores).median();

    json!({
        "mean": mean,
        "std_dev": std_dev,
        "median": median,
        "max": max,
        "nonzero_count": scored,
    })
}

/// Save summary information
fn save_summary(results: &RunResults<'_>, output_dir: &str) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let graph = results.graph;
    let clusters = results.clusters;
    let cluster_count = clusters.len();

    let summary = json!({
        "result_title": results.title,
        "parameters": results.params,
        "graph_stats": {
            "node_count": graph.node_count,
            "edge_count": graph.edge_count,
            "avg_degree": if graph.node_count == 0 {
                0.0
            } else {
                graph.adjacency.len() as f64 / graph.node_count as f64
            },
        },
        "node_score_stats": score_statistics(results.node_infos),
        "cluster_stats": {
            "cluster_count": cluster_count,
            "total_clustered_nodes": clusters.iter().map(|c| c.size()).sum::<usize>(),
            "largest_cluster_size": clusters.iter().map(|c| c.size()).max().unwrap_or(0),
            "best_cluster_score": clusters.first().map_or(0.0, |c| c.score),
            "avg_cluster_size": clusters.iter().map(|c| c.size()).sum::<usize>() as f64 /
                                if clusters.is_empty() { 1.0 } else { cluster_count as f64 },
            "avg_density": results.summaries.iter().map(|s| s.density).sum::<f64>() /
                           if results.summaries.is_empty() { 1.0 } else { results.summaries.len() as f64 },
        }
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save individual cluster information
fn save_clusters(results: &RunResults<'_>, output_dir: &str) -> Result<()> {
    log::info!("Saving individual cluster information");

    // Create clusters directory
    let clusters_dir = Path::new(output_dir).join("clusters");
    fs::create_dir_all(&clusters_dir)?;

    let graph = results.graph;
    let summaries: HashMap<u32, &ClusterSummary> =
        results.summaries.iter().map(|s| (s.rank, s)).collect();

    // Create a JSON file for each cluster
    for cluster in results.clusters {
        let path = clusters_dir.join(format!("cluster_{}.json", cluster.rank));
        let mut file = File::create(path)?;

        let members: Vec<String> = cluster.members.iter().map(|&id| graph.label(id)).collect();
        let summary = summaries.get(&cluster.rank);

        let cluster_json = json!({
            "name": cluster.name(),
            "rank": cluster.rank,
            "seed": graph.label(cluster.seed),
            "score": cluster.score,
            "size": cluster.size(),
            "internal_edges": summary.map(|s| s.internal_edges),
            "density": summary.map(|s| s.density),
            "central_nodes": summary.map(|s| {
                s.central_nodes.iter().map(|&id| graph.label(id)).collect::<Vec<_>>()
            }),
            "members": members,
        });

        file.write_all(to_string_pretty(&cluster_json)?.as_bytes())?;
    }

    // Create a JSON file with all clusters
    let all_clusters_path = Path::new(output_dir).join("all_clusters.json");
    let mut all_clusters_file = File::create(all_clusters_path)?;

    let clusters_json = json!({
        "result_title": results.title,
        "clusters": results.clusters,
    });

    all_clusters_file.write_all(to_string_pretty(&clusters_json)?.as_bytes())?;

    Ok(())
}

/// Save per-node scores as CSV, highest score first
fn save_node_scores(results: &RunResults<'_>, output_dir: &str) -> Result<()> {
    log::info!("Saving node scores");

    let path = Path::new(output_dir).join("node_scores.csv");
    let mut file = File::create(path)?;

    writeln!(file, "id,label,score,density,core_level,core_density,neighbor_count")?;

    let mut rows: Vec<(&NodeId, &NodeInfo)> = results.node_infos.iter().collect();
    rows.sort_by(|a, b| b.1.score.total_cmp(&a.1.score).then(a.0.cmp(b.0)));

    for (&node, info) in rows {
        writeln!(
            file,
            "{},{},{:.6},{:.6},{},{:.6},{}",
            node,
            results.graph.label(node),
            info.score,
            info.density,
            info.core_level,
            info.core_density,
            info.neighbor_count
        )?;
    }

    Ok(())
}
