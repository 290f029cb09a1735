use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use qt_communities::cluster::detection::find_communities;
use qt_communities::data::edgelist::{load_edge_list, EdgeColumns};
use qt_communities::{storage, viz, Config, QtmConfig, QuasiThresholdMover};

#[derive(Parser, Debug)]
#[clap(
    name = "qt-communities",
    about = "Community detection by quasi-threshold graph editing"
)]
struct Cli {
    /// Path to input edge list (Parquet or CSV)
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "qt_results")]
    output_dir: String,

    /// Column holding the first endpoint of each edge
    #[clap(long, default_value = "source")]
    source_column: String,

    /// Column holding the second endpoint of each edge
    #[clap(long, default_value = "target")]
    target_column: String,

    /// Maximum number of refinement rounds
    #[clap(long, default_value = "5")]
    iterations: usize,

    /// Number of rounds with random sub-optimal moves
    #[clap(long, default_value = "0")]
    annealing_iterations: usize,

    /// Probability of a random move in the first annealing round
    #[clap(long, default_value = "0.1")]
    sub_optimal_probability: f64,

    /// Seed for the random number generator (random when omitted)
    #[clap(long)]
    seed: Option<u64>,

    /// Emit the forest skeleton instead of the edited graph
    #[clap(long)]
    skeleton: bool,

    /// Minimum community size
    #[clap(long, default_value = "3")]
    min_cluster_size: usize,

    /// Log the edit count after every refinement round
    #[clap(long)]
    track_edits: bool,

    /// Skip visualizations
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            qtm: QtmConfig::new(
                self.iterations,
                self.annealing_iterations,
                self.sub_optimal_probability,
            )
            .with_track_edits(self.track_edits),
            min_cluster_size: self.min_cluster_size,
            show_transitive_closures: !self.skeleton,
            seed: self.seed,
        }
    }
}

/// Pick an id for the universal root that names no vertex of the graph
fn root_id(graph: &qt_communities::CompressedGraph<String>) -> String {
    let mut root = String::from("__root__");
    while graph.index_of(&root).is_some() {
        root.push('_');
    }
    root
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let config = args.config();
    config.qtm.validate()?;

    log::info!("Starting quasi-threshold community analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    std::fs::create_dir_all(&args.output_dir)?;

    // 1. Load data
    let columns = EdgeColumns {
        source: args.source_column.clone(),
        target: args.target_column.clone(),
    };
    let graph = load_edge_list(&args.input, &columns)?;

    log::info!(
        "Loaded graph with {} nodes and {} edges",
        graph.node_count,
        graph.edge_count()
    );

    // 2. Edit into a quasi-threshold graph
    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("Random seed: {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let root = root_id(&graph);
    let mut mover = QuasiThresholdMover::new(graph, root)?.with_config(config.qtm.clone());
    let result = mover.run(config.show_transitive_closures, &mut rng)?;

    let forest = mover
        .forest()
        .ok_or_else(|| anyhow::anyhow!("mover finished without a forest"))?;
    let edits = mover
        .edit_count()
        .ok_or_else(|| anyhow::anyhow!("mover finished without a forest"))?;

    // 3. Extract communities
    let clusters = find_communities(mover.graph(), forest, config.min_cluster_size);

    log::info!("Found {} communities", clusters.len());

    // 4. Save results
    storage::save_results(
        &clusters,
        mover.graph(),
        forest,
        &result,
        edits,
        &args.output_dir,
    )?;

    // 5. Generate visualizations if requested
    if !args.skip_viz {
        viz::generate_visualizations(&clusters, mover.graph(), forest, &result, &args.output_dir)?;
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
