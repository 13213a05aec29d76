use clap::{Parser, Subcommand};
use keycraft::config::{TargetLoads, Weights};
use keycraft::corpus::Corpus;
use keycraft::error::KcResult;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Plain-text corpus, or a `.cache.json` snapshot written by an earlier run.
    #[arg(global = true, short, long, default_value = "data/corpus.txt")]
    corpus: PathBuf,

    /// Percentage of word occurrences to keep, most frequent words first.
    #[arg(global = true, long, default_value_t = 100.0)]
    coverage: f64,

    /// Ignore any cached statistics and re-read the corpus.
    #[arg(global = true, long, default_value_t = false)]
    force_reload: bool,

    /// JSON object of metric weights, e.g. {"SFB": -1.0}.
    #[arg(global = true, long)]
    weights: Option<PathBuf>,

    /// Weight overrides applied last, e.g. "SFB=-2,2RL-IN=0.5".
    #[arg(global = true, short = 'W', long)]
    weight: Option<String>,

    /// JSON file of target loads.
    #[arg(global = true, long)]
    targets: Option<PathBuf>,

    /// Ten comma-separated finger load targets, left pinky first.
    #[arg(global = true, long)]
    finger_targets: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Analyse(cmd::analyse::AnalyseArgs),
    Rank(cmd::rank::RankArgs),
    Optimise(cmd::optimise::OptimiseArgs),
}

/// Inputs shared by every subcommand.
pub struct Session {
    pub corpus: Arc<Corpus>,
    pub weights: Weights,
    pub targets: TargetLoads,
}

fn load_session(cli: &Cli) -> KcResult<Session> {
    let corpus = if cli.corpus.to_string_lossy().ends_with(".cache.json") {
        info!("📂 Loading corpus snapshot: {:?}", cli.corpus);
        Corpus::from_cache(&cli.corpus)?
    } else {
        let name = cli
            .corpus
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "corpus".to_string());
        info!("📂 Loading corpus: {:?}", cli.corpus);
        Corpus::new(&name, &cli.corpus, cli.force_reload, cli.coverage)?
    };
    info!(
        "Corpus '{}': {} words kept of {} ({} distinct)",
        corpus.name,
        corpus.total_words,
        corpus.source_word_count,
        corpus.words.len()
    );

    let mut weights = match &cli.weights {
        Some(path) => {
            info!("⚖️  Loading weights from: {:?}", path);
            Weights::load_from_file(path)?
        }
        None => {
            warn!("No weights file given. Using built-in defaults.");
            Weights::default()
        }
    };
    if let Some(overrides) = &cli.weight {
        weights.merge_overrides(overrides)?;
    }

    let mut targets = match &cli.targets {
        Some(path) => TargetLoads::load_from_file(path)?,
        None => TargetLoads::default(),
    };
    if let Some(fingers) = &cli.finger_targets {
        targets.set_finger_targets(fingers)?;
    }
    targets.validate()?;

    Ok(Session {
        corpus: Arc::new(corpus),
        weights,
        targets,
    })
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let session = load_session(&cli).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });

    let result = match &cli.command {
        Commands::Analyse(args) => cmd::analyse::run(args, &session),
        Commands::Rank(args) => cmd::rank::run(args, &session),
        Commands::Optimise(args) => cmd::optimise::run(args, &session),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
