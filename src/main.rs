use anyhow::{bail, Context};
use careermatch::input;
use careermatch::{
    CatalogHandle, ClusterFilter, DimensionSchema, MatchEngine, MatchReport, MatchRequest, Ranker, RankerConfig,
};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Rank careers for a psychometric profile
#[derive(Parser, Debug)]
#[command(name = "careermatch")]
#[command(about = "Psychometric career matching", long_about = None)]
struct Args {
    /// Career records (JSON array)
    #[arg(long)]
    catalog: PathBuf,

    /// Precomputed normalization stats; computed from the catalog when omitted
    #[arg(long)]
    stats: Option<PathBuf>,

    /// The person's raw scores (JSON object)
    #[arg(long)]
    person: PathBuf,

    /// Restrict ranking to one cluster label
    #[arg(long, conflicts_with = "infer_cluster")]
    cluster: Option<String>,

    /// Restrict ranking to the cluster nearest the person
    #[arg(long)]
    infer_cluster: bool,

    /// Number of results (default from config)
    #[arg(long)]
    top_k: Option<usize>,

    /// Ranker config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the report
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting careermatch v{}", env!("CARGO_PKG_VERSION"));

    if args.top_k == Some(0) {
        bail!("--top-k must be at least 1");
    }

    let config = match &args.config {
        Some(path) => input::load_config(path)?,
        None => RankerConfig::default(),
    };
    let thresholds = config.thresholds;
    let ranker = Ranker::new(config).context("Invalid ranker config")?;

    let schema = DimensionSchema::standard();
    let catalog = input::load_catalog(&args.catalog, args.stats.as_deref(), &schema)?;
    info!("Catalog generation {} with {} careers", catalog.generation(), catalog.len());

    let person = input::load_person(&args.person, &schema)?;

    let cluster = match (args.cluster, args.infer_cluster) {
        (Some(label), _) => ClusterFilter::Label(label),
        (None, true) => ClusterFilter::Infer,
        (None, false) => ClusterFilter::All,
    };
    let request = MatchRequest {
        cluster,
        top_k: args.top_k,
    };

    let engine = MatchEngine::new(CatalogHandle::new(catalog), ranker);
    let outcome = engine.match_person(&person, &request)?;
    info!(
        "Matched against {} candidates, returning {}",
        outcome.candidates_count,
        outcome.results.len()
    );

    let report = MatchReport::from_outcome(&outcome, &thresholds);
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout)?;
    Ok(())
}
