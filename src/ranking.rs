use crate::analyser::Analyser;
use crate::config::{TargetLoads, Weights};
use crate::corpus::Corpus;
use crate::error::{KcResult, KeycraftError};
use crate::layout::SplitLayout;
use crate::scorer::score;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Debug, Clone, Serialize)]
pub struct RankedLayout {
    pub rank: usize,
    pub name: String,
    pub score: f64,
    /// Score minus the baseline's score.
    pub delta: f64,
    pub metrics: BTreeMap<String, f64>,
    /// Per metric, this layout's value minus the baseline's.
    pub metric_deltas: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    pub baseline: String,
    pub entries: Vec<RankedLayout>,
    pub medians: BTreeMap<String, f64>,
}

/// Scores every layout against the same corpus, best first.
///
/// `baseline` names the layout deltas are taken against; `None` uses the
/// top-ranked one.
pub fn rank(
    layouts: &[SplitLayout],
    corpus: &Corpus,
    weights: &Weights,
    targets: &TargetLoads,
    baseline: Option<&str>,
) -> KcResult<Ranking> {
    if layouts.is_empty() {
        return Err(KeycraftError::Validation(
            "Nothing to rank: no layouts given".to_string(),
        ));
    }

    let mut scored: Vec<(String, f64, BTreeMap<String, f64>)> = layouts
        .par_iter()
        .map(|layout| {
            let metrics = Analyser::new(layout, corpus, targets).metrics;
            (layout.name.clone(), score(&metrics, weights), metrics)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let base_idx = match baseline {
        Some(name) => scored.iter().position(|(n, _, _)| n == name).ok_or_else(|| {
            KeycraftError::Validation(format!("Baseline layout '{}' is not being ranked", name))
        })?,
        None => 0,
    };
    let (base_name, base_score, base_metrics) = scored[base_idx].clone();

    let medians = medians(scored.iter().map(|(_, _, m)| m));

    let entries = scored
        .into_iter()
        .enumerate()
        .map(|(i, (name, s, metrics))| {
            let metric_deltas = metrics
                .iter()
                .map(|(k, v)| {
                    let base = base_metrics.get(k).copied().unwrap_or(0.0);
                    (k.clone(), v - base)
                })
                .collect();
            RankedLayout {
                rank: i + 1,
                name,
                score: s,
                delta: s - base_score,
                metrics,
                metric_deltas,
            }
        })
        .collect();

    Ok(Ranking {
        baseline: base_name,
        entries,
        medians,
    })
}

fn medians<'a>(all: impl Iterator<Item = &'a BTreeMap<String, f64>>) -> BTreeMap<String, f64> {
    let mut columns: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for metrics in all {
        for (k, v) in metrics {
            columns.entry(k.as_str()).or_default().push(*v);
        }
    }
    columns
        .into_iter()
        .map(|(k, mut values)| {
            values.sort_by(f64::total_cmp);
            let n = values.len();
            let mid = if n % 2 == 1 {
                values[n / 2]
            } else {
                (values[n / 2 - 1] + values[n / 2]) / 2.0
            };
            (k.to_string(), mid)
        })
        .collect()
}

impl Ranking {
    pub fn metric_names(&self) -> Vec<&str> {
        self.medians.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RankedLayout> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// `rank,name,score,delta,<metric>...` with one row per layout.
    pub fn write_csv<W: Write>(&self, writer: W) -> KcResult<()> {
        let names = self.metric_names();
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec!["rank", "name", "score", "delta"];
        header.extend(names.iter().copied());
        wtr.write_record(&header)?;

        for e in &self.entries {
            let mut row = vec![
                e.rank.to_string(),
                e.name.clone(),
                format!("{:.6}", e.score),
                format!("{:.6}", e.delta),
            ];
            row.extend(
                names
                    .iter()
                    .map(|n| format!("{:.6}", e.metrics.get(*n).copied().unwrap_or(0.0))),
            );
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medians_odd_and_even() {
        let a: BTreeMap<String, f64> = [("X".to_string(), 1.0)].into();
        let b: BTreeMap<String, f64> = [("X".to_string(), 5.0)].into();
        let c: BTreeMap<String, f64> = [("X".to_string(), 3.0)].into();
        assert_eq!(medians([&a, &b, &c].into_iter())["X"], 3.0);
        assert_eq!(medians([&a, &b].into_iter())["X"], 3.0);
    }

    #[test]
    fn test_empty_input_rejected() {
        let corpus = Corpus::from_text("t", "abc", 100.0).unwrap();
        let res = rank(&[], &corpus, &Weights::default(), &TargetLoads::default(), None);
        assert!(matches!(res, Err(KeycraftError::Validation(_))));
    }
}
