use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;

use mcode_cluster::cluster::metrics::summarize_clusters;
use mcode_cluster::data::load_edge_list;
use mcode_cluster::storage::{save_results, RunResults};
use mcode_cluster::{ClusteringEngine, CompressedGraph, NodeId, ParameterSet, ScoreOutcome};

#[derive(Parser, Debug)]
#[clap(
    name = "mcode-cluster",
    about = "Find molecular complexes in interaction networks with MCODE"
)]
struct Cli {
    /// Path to input edge list (Parquet, CSV or TSV)
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "mcode_results")]
    output_dir: String,

    /// Column holding the first interactor
    #[clap(long, default_value = "source")]
    source_col: String,

    /// Column holding the second interactor
    #[clap(long, default_value = "target")]
    target_col: String,

    /// Title the results are stored under
    #[clap(long, default_value = "MCODE")]
    title: String,

    /// JSON parameter file (replaces the parameter flags below)
    #[clap(long)]
    params: Option<String>,

    /// Minimum neighborhood size for a node to be scored
    #[clap(long, default_value = "2")]
    degree_cutoff: u32,

    /// Fraction below the seed score a node may fall and still join
    #[clap(long, default_value = "0.2")]
    node_score_cutoff: f64,

    /// Minimum k-core a cluster must contain
    #[clap(long, default_value = "2")]
    k_core: u32,

    /// Maximum depth from the seed node
    #[clap(long, default_value = "100")]
    max_depth: u32,

    /// Keep pendant nodes instead of trimming clusters to their 2-core
    #[clap(long)]
    no_haircut: bool,

    /// Grow cluster boundaries with dense neighbors
    #[clap(long)]
    fluff: bool,

    /// Minimum neighborhood density for fluffing
    #[clap(long, default_value = "0.1")]
    fluff_density_cutoff: f64,

    /// Count self-loops when scoring nodes
    #[clap(long)]
    include_loops: bool,

    /// Only report clusters containing one of these node labels (comma separated)
    #[clap(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Cancel the run after this many seconds (0 = no limit)
    #[clap(long, default_value = "0")]
    timeout_secs: u64,

    /// Number of worker threads for cluster summaries (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn parameter_set(&self) -> Result<ParameterSet> {
        if let Some(ref path) = self.params {
            log::info!("Reading parameters from {}", path);
            return ParameterSet::from_json_file(path);
        }

        Ok(ParameterSet {
            node_score_cutoff: self.node_score_cutoff,
            k_core: self.k_core,
            max_depth_from_start: self.max_depth,
            degree_cutoff: self.degree_cutoff,
            haircut: !self.no_haircut,
            fluff: self.fluff,
            fluff_density_cutoff: self.fluff_density_cutoff,
            include_loops: self.include_loops,
            ..ParameterSet::default()
        })
    }
}

/// Map selected labels to node ids, warning about unknown labels
fn resolve_selection(graph: &CompressedGraph, labels: &[String]) -> Vec<NodeId> {
    labels
        .iter()
        .filter_map(|label| {
            let node = graph.node_by_label(label);
            if node.is_none() {
                log::warn!("Selected node '{}' is not in the network", label);
            }
            node
        })
        .collect()
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting MCODE cluster analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // 1. Load data
    let graph = load_edge_list(&args.input, &args.source_col, &args.target_col)?;
    log::info!("Network uses about {} bytes", graph.memory_usage());

    let mut params = args.parameter_set()?;
    if !args.select.is_empty() {
        let selected = resolve_selection(&graph, &args.select);
        if selected.is_empty() {
            return Err(anyhow!("None of the selected nodes are in the network"));
        }
        params = params.with_selection(selected);
    }
    params.validate()?;

    let mut engine = ClusteringEngine::new(params);

    if args.timeout_secs > 0 {
        let token = engine.cancel_token();
        let timeout = Duration::from_secs(args.timeout_secs);
        thread::spawn(move || {
            thread::sleep(timeout);
            log::warn!("Timeout of {} s reached, cancelling", timeout.as_secs());
            token.cancel();
        });
    }

    // 2. Score nodes
    if engine.score(&graph, &args.title)? == ScoreOutcome::Cancelled {
        return Err(anyhow!("Scoring was cancelled before it completed"));
    }

    // 3. Find clusters
    let outcome = engine.find_clusters(&graph, &args.title)?;
    if outcome.is_cancelled() {
        log::warn!(
            "Cluster finding was cancelled, saving {} clusters found so far",
            outcome.clusters().len()
        );
    }
    let clusters = outcome.into_clusters();

    // 4. Summarize and save results
    let summaries = summarize_clusters(&graph, &clusters);
    let node_infos = engine
        .node_infos(&args.title)
        .ok_or_else(|| anyhow!("No scores stored for '{}'", args.title))?;

    save_results(
        &RunResults {
            title: &args.title,
            graph: &graph,
            params: engine.params(),
            node_infos,
            clusters: &clusters,
            summaries: &summaries,
        },
        &args.output_dir,
    )?;

    log::info!(
        "Analysis complete in {} ms. Results saved to {}",
        (engine.last_score_time() + engine.last_find_time()).as_millis(),
        args.output_dir
    );

    Ok(())
}
