use super::mutation::{all_pairs, pair_count, perturb, sample_pairs};
use super::telemetry::{GenerationRecord, GenerationSink, OptimiseResult, StopReason, Telemetry};
use crate::error::{KcResult, KeycraftError};
use crate::layout::SplitLayout;
use crate::pins::PinMask;
use crate::scorer::Scorer;
use fastrand::Rng;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use typed_builder::TypedBuilder;

/// A swap has to beat the current score by more than this to be taken.
pub const IMPROVEMENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, TypedBuilder)]
pub struct OptimizationOptions {
    pub generations: usize,
    pub time_minutes: f64,
    /// 0 derives a seed from the clock.
    #[builder(default = 0)]
    pub seed: u64,
    #[builder(default = 1000)]
    pub neighbourhood_size: usize,
    #[builder(default = 2)]
    pub min_jumps: usize,
    #[builder(default = 12)]
    pub max_jumps: usize,
}

impl OptimizationOptions {
    pub fn validate(&self) -> KcResult<()> {
        if self.generations == 0 {
            return Err(KeycraftError::Validation(
                "generations must be greater than 0".to_string(),
            ));
        }
        if !self.time_minutes.is_finite() || self.time_minutes <= 0.0 {
            return Err(KeycraftError::Validation(format!(
                "time budget must be a positive number of minutes, got {}",
                self.time_minutes
            )));
        }
        if self.neighbourhood_size == 0 {
            return Err(KeycraftError::Validation(
                "neighbourhood size must be at least 1".to_string(),
            ));
        }
        if self.min_jumps == 0 || self.max_jumps < self.min_jumps {
            return Err(KeycraftError::Validation(format!(
                "breakout jumps must satisfy 1 <= min ({}) <= max ({})",
                self.min_jumps, self.max_jumps
            )));
        }
        Ok(())
    }
}

enum Phase {
    Search,
    Breakout,
}

/// Breakout Local Search over swaps of free slots. Scores are maximised.
pub struct Optimizer {
    scorer: Arc<Scorer>,
    options: OptimizationOptions,
}

impl Optimizer {
    pub fn new(scorer: Arc<Scorer>, options: OptimizationOptions) -> Self {
        Self { scorer, options }
    }

    pub fn run(
        &self,
        layout: &SplitLayout,
        pins: &PinMask,
        mut sink: Option<&mut dyn GenerationSink>,
    ) -> KcResult<OptimiseResult> {
        let opts = &self.options;
        opts.validate()?;

        let free = pins.free_slots();
        if free.len() < 2 {
            return Err(KeycraftError::Optimiser(format!(
                "Layout '{}' has {} free slot(s); at least 2 are needed to swap",
                layout.name,
                free.len()
            )));
        }

        // Initialize
        let seed = resolve_seed(opts.seed);
        let mut rng = Rng::with_seed(seed);
        let full_neighbourhood = if pair_count(free.len()) <= opts.neighbourhood_size {
            Some(all_pairs(&free))
        } else {
            None
        };
        // Budgets too large for a Duration never expire.
        let time_limit =
            Duration::try_from_secs_f64(opts.time_minutes * 60.0).unwrap_or(Duration::MAX);
        let start = Instant::now();

        let mut current = layout.clone();
        let mut current_score = self.scorer.score_layout(&current);
        let mut best = current.clone();
        let mut best_score = current_score;

        let mut tel = Telemetry {
            seed,
            generations: 0,
            evaluations: 1,
            breakouts: 0,
            improvements: 0,
            initial_score: current_score,
            best_score,
            best_generation: 0,
            elapsed_seconds: 0.0,
            stop_reason: StopReason::GenerationLimit,
        };

        info!(
            "Optimising '{}': {} free slots, seed {}, initial score {:.4}",
            layout.name,
            free.len(),
            seed,
            current_score
        );

        let mut phase = Phase::Search;
        let mut stall = 0usize;

        loop {
            if tel.generations >= opts.generations {
                tel.stop_reason = StopReason::GenerationLimit;
                break;
            }
            if start.elapsed() >= time_limit {
                tel.stop_reason = StopReason::TimeLimit;
                break;
            }
            tel.generations += 1;

            match phase {
                Phase::Search => {
                    let pairs = match &full_neighbourhood {
                        Some(all) => Cow::Borrowed(all),
                        None => Cow::Owned(sample_pairs(&mut rng, &free, opts.neighbourhood_size)),
                    };

                    let mut best_move: Option<(usize, usize, f64)> = None;
                    let mut best_gain = IMPROVEMENT_EPSILON;
                    for &(i, j) in pairs.iter() {
                        current.swap(i, j);
                        let s = self.scorer.score_layout(&current);
                        current.swap(i, j);
                        tel.evaluations += 1;

                        let gain = s - current_score;
                        if gain > best_gain {
                            best_gain = gain;
                            best_move = Some((i, j, s));
                        }
                    }

                    match best_move {
                        Some((i, j, s)) => {
                            current.swap(i, j);
                            current_score = s;
                        }
                        None => phase = Phase::Breakout,
                    }
                }
                Phase::Breakout => {
                    let strength = (opts.min_jumps + stall).min(opts.max_jumps);
                    perturb(&mut current, &mut rng, &free, strength);
                    current_score = self.scorer.score_layout(&current);
                    tel.evaluations += 1;
                    tel.breakouts += 1;
                    stall += 1;
                    debug!(
                        "Generation {}: breakout of {} swaps, score {:.4}",
                        tel.generations, strength, current_score
                    );
                    phase = Phase::Search;
                }
            }

            debug_assert!(
                (0..layout.runes.len())
                    .filter(|&i| pins.is_pinned(i))
                    .all(|i| current.rune(i) == layout.rune(i)),
                "pinned slot moved"
            );

            if current_score > best_score {
                best_score = current_score;
                best = current.clone();
                stall = 0;
                tel.improvements += 1;
                tel.best_generation = tel.generations;
            }

            if let Some(s) = sink.as_deref_mut() {
                s.record(&GenerationRecord {
                    generation: tel.generations,
                    score: current_score,
                    best_score,
                    elapsed_seconds: start.elapsed().as_secs_f64(),
                })?;
            }
        }

        if let Some(s) = sink.as_deref_mut() {
            s.finish()?;
        }

        debug_assert!(best.is_permutation_of(layout));

        tel.best_score = best_score;
        tel.elapsed_seconds = start.elapsed().as_secs_f64();
        info!(
            "Optimisation stopped ({}) after {} generations: best {:.4} (initial {:.4})",
            tel.stop_reason, tel.generations, tel.best_score, tel.initial_score
        );

        Ok(OptimiseResult {
            original: layout.clone(),
            best,
            telemetry: tel,
        })
    }
}

fn resolve_seed(seed: u64) -> u64 {
    if seed != 0 {
        return seed;
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
        .max(1)
}
