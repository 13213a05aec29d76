pub mod mutation;
pub mod runner;
pub mod telemetry;

pub use self::runner::{OptimizationOptions, Optimizer};
pub use self::telemetry::{
    GenerationRecord, GenerationSink, JsonlSink, OptimiseResult, StopReason, Telemetry,
};

use crate::config::{TargetLoads, Weights};
use crate::corpus::Corpus;
use crate::error::KcResult;
use crate::layout::SplitLayout;
use crate::pins::PinMask;
use crate::scorer::Scorer;
use std::sync::Arc;

/// One-call entry point with default breakout and neighbourhood settings.
#[allow(clippy::too_many_arguments)]
pub fn optimise(
    layout: &SplitLayout,
    corpus: Arc<Corpus>,
    weights: &Weights,
    targets: &TargetLoads,
    pins: &PinMask,
    generations: usize,
    time_minutes: f64,
    seed: u64,
    sink: Option<&mut dyn GenerationSink>,
) -> KcResult<OptimiseResult> {
    let scorer = Arc::new(Scorer::new(corpus, weights.clone(), targets.clone()));
    let options = OptimizationOptions::builder()
        .generations(generations)
        .time_minutes(time_minutes)
        .seed(seed)
        .build();
    Optimizer::new(scorer, options).run(layout, pins, sink)
}
