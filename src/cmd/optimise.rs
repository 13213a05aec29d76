use super::resolve_layout;
use crate::reports;
use crate::Session;
use clap::Args;
use keycraft::config::SearchParams;
use keycraft::error::KcResult;
use keycraft::optimizer::{GenerationSink, JsonlSink, OptimizationOptions, Optimizer};
use keycraft::pins::PinMask;
use keycraft::scorer::Scorer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OptimiseArgs {
    /// Starting layout: JSON file or built-in name.
    pub layout: String,

    #[command(flatten)]
    pub search: SearchParams,

    /// Slot indices (0-41) that must not move, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub pin_slots: Vec<usize>,

    /// Smallest breakout, in random swaps.
    #[arg(long, default_value_t = 2)]
    pub min_jumps: usize,

    /// Largest breakout, in random swaps.
    #[arg(long, default_value_t = 12)]
    pub max_jumps: usize,

    /// Append one JSON record per generation to this file.
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Save the best layout as JSON.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &OptimiseArgs, session: &Session) -> KcResult<()> {
    let layout = resolve_layout(&args.layout)?;
    let pins = PinMask::resolve(&layout, &args.pin_slots, &args.search.pin, &args.search.free)?;
    info!(
        "📌 {} slots pinned, {} free",
        pins.pinned_count(),
        pins.free_slots().len()
    );

    let scorer = Arc::new(Scorer::new(
        session.corpus.clone(),
        session.weights.clone(),
        session.targets.clone(),
    ));
    let options = OptimizationOptions::builder()
        .generations(args.search.generations)
        .time_minutes(args.search.time_minutes)
        .seed(args.search.seed)
        .neighbourhood_size(args.search.neighbourhood)
        .min_jumps(args.min_jumps)
        .max_jumps(args.max_jumps)
        .build();
    let optimizer = Optimizer::new(scorer.clone(), options);

    let mut log = match &args.log {
        Some(path) => Some(JsonlSink::append(path)?),
        None => None,
    };
    let sink = log.as_mut().map(|s| s as &mut dyn GenerationSink);
    let mut result = optimizer.run(&layout, &pins, sink)?;
    result.best.name = format!("{}-optimised", layout.name);

    reports::print_layout_grid(&result.original);
    reports::print_layout_grid(&result.best);
    reports::print_telemetry(&result.telemetry);

    let before = scorer.analyse(&result.original);
    let after = scorer.analyse(&result.best);
    reports::print_metrics(&[
        (result.original.name.as_str(), &before.metrics),
        (result.best.name.as_str(), &after.metrics),
    ]);

    if let Some(path) = &args.output {
        result.best.save_to_file(path)?;
        info!("💾 Best layout saved to {:?}", path);
    }
    Ok(())
}
