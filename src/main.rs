mod collab;
mod error;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::collab::{
    AnchoredAverageBlender, CommandBlender, LinearModel, ProfileBlender, UngappedColumnScorer,
    predict_pairs,
};
use crate::error::{Result, TransferError};
use crate::input::{load_collection, load_features, load_predictions};
use crate::model::thresholds::TransferConfig;
use crate::pipeline::TransferPipeline;
use crate::report::json::SummaryInput;
use crate::report::record::render_record;
use crate::report::write_reports;

#[derive(Debug, Parser)]
#[command(name = "kira-tfbp", version)]
#[command(about = "Transfer DNA-binding profiles from the closest characterized transcription factors.")]
struct Cli {
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank predictions for one query, filter outliers and build the consensus profile.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Reference collection (ID/MA/// blocks, optionally .gz).
    #[arg(long, value_name = "FILE")]
    collection: PathBuf,

    /// Predicted `reference score` pairs for the query.
    #[arg(long, value_name = "FILE", required_unless_present = "features", conflicts_with = "features")]
    predictions: Option<PathBuf>,

    /// Pairwise feature rows, scored with --model.
    #[arg(long, value_name = "FILE", requires = "model")]
    features: Option<PathBuf>,

    /// Linear model JSON (`{"weights": [...], "bias": x}`).
    #[arg(long, value_name = "FILE", requires = "features")]
    model: Option<PathBuf>,

    #[arg(long, value_name = "NAME")]
    query: Option<String>,

    /// Output directory; the record goes to stdout when omitted.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// JSON configuration; flags below override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "N")]
    max_matches: Option<usize>,

    #[arg(long, value_name = "X", allow_hyphen_values = true)]
    threshold: Option<f64>,

    #[arg(long)]
    dynamic_threshold: bool,

    #[arg(long, value_name = "X", allow_hyphen_values = true)]
    tier_high: Option<f64>,

    #[arg(long, value_name = "X", allow_hyphen_values = true)]
    tier_medium: Option<f64>,

    #[arg(long, value_name = "X", allow_hyphen_values = true)]
    tier_low: Option<f64>,

    #[arg(long, value_name = "X", allow_hyphen_values = true)]
    outlier_tolerance: Option<f64>,

    #[arg(long, value_name = "N")]
    merge_cap: Option<usize>,

    /// Compare profiles on the forward strand only.
    #[arg(long)]
    single_strand: bool,

    /// External blending program; profiles on stdin, one MA profile on stdout.
    #[arg(long, value_name = "CMD")]
    blend_command: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let result = match &cli.command {
        Commands::Run(args) => run(args),
    };
    if let Err(err) = result {
        if err.is_fatal_for_query() {
            tracing::error!("transfer failed for this query: {err}");
        } else {
            tracing::error!("{err}");
        }
        std::process::exit(1);
    }
}

fn run(args: &RunArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let collection = load_collection(&args.collection)?;

    let pairs = match (&args.predictions, &args.features, &args.model) {
        (Some(path), _, _) => load_predictions(path)?,
        (None, Some(features), Some(model)) => {
            let rows = load_features(features)?;
            let model = LinearModel::load(model)?;
            predict_pairs(&rows, &model)?
        }
        _ => {
            return Err(TransferError::Configuration(
                "either --predictions or --features with --model is required".to_string(),
            ));
        }
    };
    tracing::info!("scoring {} predictions", pairs.len());

    let scorer = UngappedColumnScorer {
        both_strands: !args.single_strand,
    };
    let blender: Box<dyn ProfileBlender> = match &args.blend_command {
        Some(line) => Box::new(CommandBlender::from_command_line(line)?),
        None => Box::new(AnchoredAverageBlender { scorer }),
    };

    let pipeline = TransferPipeline::new(config, &collection, &scorer, blender.as_ref())?;
    let outcome = pipeline.run(&pairs)?;

    let summary_input = SummaryInput {
        query: args.query.as_deref(),
        n_predictions: pairs.len(),
        n_references: collection.len(),
        config: pipeline.config(),
    };
    match &args.out {
        Some(dir) => write_reports(&summary_input, &outcome, dir)?,
        None => {
            let record = render_record(
                &outcome,
                args.query.as_deref(),
                pipeline.config().score_decimals,
            );
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(record.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn resolve_config(args: &RunArgs) -> Result<TransferConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => TransferConfig::default_v1(),
    };
    if let Some(v) = args.max_matches {
        config.max_matches = v;
    }
    if let Some(v) = args.threshold {
        config.similarity_threshold = v;
    }
    if args.dynamic_threshold {
        config.use_dynamic_threshold = true;
    }
    if let Some(v) = args.tier_high {
        config.tiers.high = v;
    }
    if let Some(v) = args.tier_medium {
        config.tiers.medium = v;
    }
    if let Some(v) = args.tier_low {
        config.tiers.low = v;
    }
    if let Some(v) = args.outlier_tolerance {
        config.outlier_tolerance = v;
    }
    if let Some(v) = args.merge_cap {
        config.merge_cap = v;
    }
    Ok(config)
}

fn load_config(path: &Path) -> Result<TransferConfig> {
    let reader = BufReader::new(File::open(path)?);
    let config: TransferConfig = serde_json::from_reader(reader)?;
    tracing::debug!("loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
