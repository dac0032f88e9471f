//! Edge list loading for interaction networks

use std::path::Path;

use anyhow::{anyhow, Result};
use polars::prelude::*;

use crate::graph::{CompressedGraph, GraphBuilder};

/// Load an undirected network from a Parquet, CSV or TSV edge list.
///
/// Each row names the two interacting nodes in `source_col` and
/// `target_col`. Values are read as strings, so numeric ids work too. A row
/// with only one endpoint adds that node without an edge.
pub fn load_edge_list(path: &str, source_col: &str, target_col: &str) -> Result<CompressedGraph> {
    log::info!("Reading edge list: {}", path);

    // Check if the file exists
    if !Path::new(path).exists() {
        return Err(anyhow!("File not found: {}", path));
    }

    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let frame = match extension.as_str() {
        "parquet" => LazyFrame::scan_parquet(path, Default::default())?,
        "csv" => LazyCsvReader::new(path).with_has_header(true).finish()?,
        "tsv" | "txt" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_separator(b'\t')
            .finish()?,
        other => return Err(anyhow!("Unsupported edge list format '{}': {}", other, path)),
    };

    let df = frame
        .select([
            col(source_col).cast(DataType::String).alias("source"),
            col(target_col).cast(DataType::String).alias("target"),
        ])
        .collect()?;

    let row_count = df.height();
    log::info!("Loaded {} interactions", row_count);

    let sources = df.column("source")?.str()?;
    let targets = df.column("target")?.str()?;

    let mut builder = GraphBuilder::with_capacity(row_count);
    let mut skipped = 0;

    for i in 0..row_count {
        match (sources.get(i), targets.get(i)) {
            (Some(a), Some(b)) => builder.add_edge(a, b),
            (Some(a), None) | (None, Some(a)) => {
                builder.get_or_create_node(a);
            }
            (None, None) => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} rows without any endpoint", skipped);
    }

    let graph = builder.build();
    log::info!(
        "Built network with {} nodes and {} edges",
        graph.node_count,
        graph.edge_count
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Network;
    use std::fs;

    #[test]
    fn loads_tab_separated_edges() {
        let dir = std::env::temp_dir().join(format!("mcode-loader-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("edges.tsv");
        fs::write(&path, "a\tb\nA\tB\nB\tC\nC\tA\nC\tD\n").unwrap();

        let graph = load_edge_list(path.to_str().unwrap(), "a", "b").unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count, 4);

        let c = graph.node_by_label("C").unwrap();
        assert_eq!(graph.neighbors(c).len(), 3);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_edge_list("/nonexistent/edges.csv", "a", "b").is_err());
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let dir = std::env::temp_dir().join(format!("mcode-loader-ext-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("edges.graphml");
        fs::write(&path, "<graphml/>").unwrap();

        assert!(load_edge_list(path.to_str().unwrap(), "a", "b").is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
