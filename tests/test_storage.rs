use std::fs;

use mcode_cluster::cluster::metrics::summarize_clusters;
use mcode_cluster::graph::GraphBuilder;
use mcode_cluster::storage::{save_results, RunResults};
use mcode_cluster::ClusteringEngine;

#[test]
fn saves_summary_clusters_and_scores() {
    let mut builder = GraphBuilder::default();
    for (a, b) in [("p1", "p2"), ("p1", "p3"), ("p2", "p3"), ("p3", "p4"), ("p2", "p4"), ("p4", "p5")] {
        builder.add_edge(a, b);
    }
    let graph = builder.build();

    let mut engine = ClusteringEngine::default();
    engine.score(&graph, "export").unwrap();
    let clusters = engine.find_clusters(&graph, "export").unwrap().into_clusters();
    assert!(!clusters.is_empty());
    let summaries = summarize_clusters(&graph, &clusters);

    let dir = std::env::temp_dir().join(format!("mcode-storage-{}", std::process::id()));
    let output_dir = dir.to_str().unwrap();

    save_results(
        &RunResults {
            title: "export",
            graph: &graph,
            params: engine.params(),
            node_infos: engine.node_infos("export").unwrap(),
            clusters: &clusters,
            summaries: &summaries,
        },
        output_dir,
    )
    .unwrap();

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["result_title"], "export");
    assert_eq!(summary["graph_stats"]["node_count"], 5);
    assert_eq!(summary["cluster_stats"]["cluster_count"], clusters.len());
    assert_eq!(summary["parameters"]["k_core"], 2);

    let first: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("clusters").join("cluster_0.json")).unwrap()).unwrap();
    assert_eq!(first["name"], "Cluster 1");
    assert!(first["members"].as_array().unwrap().contains(&serde_json::json!("p2")));

    let scores = fs::read_to_string(dir.join("node_scores.csv")).unwrap();
    assert_eq!(scores.lines().count(), 6);
    assert!(scores.starts_with("id,label,score"));

    fs::remove_dir_all(&dir).unwrap();
}
