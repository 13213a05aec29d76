use crate::analyser::Analyser;
use crate::config::{TargetLoads, Weights};
use crate::corpus::Corpus;
use crate::layout::SplitLayout;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Weighted sum of metrics. Metrics without a weight, and weights without a
/// metric, contribute nothing.
pub fn score(metrics: &BTreeMap<String, f64>, weights: &Weights) -> f64 {
    weights
        .iter()
        .map(|(name, w)| w * metrics.get(name).copied().unwrap_or(0.0))
        .sum()
}

/// One weighted term of a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTerm {
    pub metric: String,
    pub value: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Terms in weight-name order. Their contributions sum to [`score`].
pub fn breakdown(metrics: &BTreeMap<String, f64>, weights: &Weights) -> Vec<ScoreTerm> {
    weights
        .iter()
        .map(|(name, weight)| {
            let value = metrics.get(name).copied().unwrap_or(0.0);
            ScoreTerm {
                metric: name.to_string(),
                value,
                weight,
                contribution: weight * value,
            }
        })
        .collect()
}

/// Everything needed to score layouts repeatedly against one corpus.
#[derive(Debug, Clone)]
pub struct Scorer {
    pub corpus: Arc<Corpus>,
    pub weights: Weights,
    pub targets: TargetLoads,
}

impl Scorer {
    pub fn new(corpus: Arc<Corpus>, weights: Weights, targets: TargetLoads) -> Self {
        Self {
            corpus,
            weights,
            targets,
        }
    }

    pub fn analyse<'a>(&'a self, layout: &'a SplitLayout) -> Analyser<'a> {
        Analyser::new(layout, &self.corpus, &self.targets)
    }

    pub fn score_layout(&self, layout: &SplitLayout) -> f64 {
        score(&self.analyse(layout).metrics, &self.weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_score_is_weighted_sum() {
        let m = metrics(&[("SFB", 2.0), ("2RL-IN", 10.0), ("FBL", 3.0)]);
        let w = Weights::from_pairs(&[("SFB", -1.5), ("2RL-IN", 0.5)]);
        assert!((score(&m, &w) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_metric_contributes_zero() {
        let m = metrics(&[("SFB", 2.0)]);
        let w = Weights::from_pairs(&[("SFB", -1.0), ("NOT-THERE", 100.0)]);
        assert_eq!(score(&m, &w), -2.0);
    }

    #[test]
    fn test_empty_weights_score_zero() {
        let m = metrics(&[("SFB", 2.0)]);
        assert_eq!(score(&m, &Weights::empty()), 0.0);
    }

    #[test]
    fn test_breakdown_sums_to_score() {
        let m = metrics(&[("SFB", 2.0), ("LSB", 4.0)]);
        let w = Weights::from_pairs(&[("SFB", -1.0), ("LSB", -0.25)]);
        let terms = breakdown(&m, &w);
        assert_eq!(terms.len(), 2);
        let total: f64 = terms.iter().map(|t| t.contribution).sum();
        assert_eq!(total, score(&m, &w));
    }
}
