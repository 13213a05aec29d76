pub mod classify;
pub mod loads;

use self::classify::{classify_bigram, classify_trigram, BigramKind, TrigramClass, TRIGRAM_FAMILIES};
use self::loads::Loads;
use crate::config::TargetLoads;
use crate::corpus::Corpus;
use crate::error::{KcResult, KeycraftError};
use crate::geometry::{COLUMNS, FINGER_COUNT, ROW_COUNT, SLOT_COUNT, THUMB_START};
use crate::layout::SplitLayout;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Bigram metrics. SFB includes same-key repeats; SFR counts only those.
pub const BIGRAM_METRICS: [&str; 5] = ["SFB", "SFR", "LSB", "FSB", "HSB"];
pub const SKIPGRAM_METRICS: [&str; 4] = ["SFS", "LSS", "FSS", "HSS"];
pub const DEVIATION_METRICS: [&str; 4] = ["HDEV", "FDEV", "RDEV", "PDEV"];
pub const DERIVED_METRICS: [&str; 5] = ["IN:OUT", "FLW", "RBL", "FBL", "POH"];

/// One n-gram contributing to a metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NgramDetail {
    pub ngram: String,
    pub count: u64,
    pub percentage: f64,
    pub class: String,
}

// Raw counters gathered in one pass over each n-gram table.
#[derive(Debug)]
struct Tally {
    sfb: u64,
    sfr: u64,
    lsb: u64,
    fsb: u64,
    hsb: u64,

    sfs: u64,
    lss: u64,
    fss: u64,
    hss: u64,

    trigrams: [u64; TrigramClass::COUNT],
    slots: [u64; SLOT_COUNT],
}

impl Default for Tally {
    fn default() -> Self {
        Self {
            sfb: 0,
            sfr: 0,
            lsb: 0,
            fsb: 0,
            hsb: 0,
            sfs: 0,
            lss: 0,
            fss: 0,
            hss: 0,
            trigrams: [0; TrigramClass::COUNT],
            slots: [0; SLOT_COUNT],
        }
    }
}

/// Ergonomic metrics of one layout over one corpus.
///
/// All metrics are computed eagerly in [`Analyser::new`]; values are
/// percentages of the matching corpus total unless the name says otherwise.
pub struct Analyser<'a> {
    pub layout: &'a SplitLayout,
    pub corpus: &'a Corpus,
    pub metrics: BTreeMap<String, f64>,
    index: HashMap<char, usize>,
}

impl<'a> Analyser<'a> {
    pub fn new(layout: &'a SplitLayout, corpus: &'a Corpus, targets: &TargetLoads) -> Self {
        let index = layout.rune_index();
        let lt = layout.layout_type;
        let mut t = Tally::default();

        for (gram, &count) in &corpus.unigrams {
            if let Some(c) = gram.chars().next() {
                if let Some(&slot) = index.get(&c) {
                    t.slots[slot] += count;
                }
            }
        }

        for (gram, &count) in &corpus.bigrams {
            if let Some((i, j)) = slots2(&index, gram) {
                let k = classify_bigram(lt, i, j);
                t.sfb += count * k.same_finger as u64;
                t.sfr += count * k.repeat as u64;
                t.lsb += count * k.lateral_stretch as u64;
                t.fsb += count * k.full_scissor as u64;
                t.hsb += count * k.half_scissor as u64;
            }
        }

        for (gram, &count) in &corpus.skipgrams {
            if let Some((i, j)) = slots2(&index, gram) {
                let k = classify_bigram(lt, i, j);
                t.sfs += count * k.same_finger as u64;
                t.lss += count * k.lateral_stretch as u64;
                t.fss += count * k.full_scissor as u64;
                t.hss += count * k.half_scissor as u64;
            }
        }

        for (gram, &count) in &corpus.trigrams {
            if let Some((i, j, k)) = slots3(&index, gram) {
                t.trigrams[classify_trigram(lt, i, j, k).index()] += count;
            }
        }

        let metrics = build_metrics(layout, corpus, targets, &t);

        Self {
            layout,
            corpus,
            metrics,
            index,
        }
    }

    /// Metric value, 0.0 if unknown.
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }

    /// The n-grams behind a count-based metric, most frequent first.
    pub fn detail(&self, metric: &str) -> KcResult<Vec<NgramDetail>> {
        let lt = self.layout.layout_type;
        let mut out = Vec::new();

        if BIGRAM_METRICS.contains(&metric) || SKIPGRAM_METRICS.contains(&metric) {
            let skip = SKIPGRAM_METRICS.contains(&metric);
            let (table, total) = if skip {
                (&self.corpus.skipgrams, self.corpus.total_skipgrams)
            } else {
                (&self.corpus.bigrams, self.corpus.total_bigrams)
            };
            for (gram, &count) in table {
                if let Some((i, j)) = slots2(&self.index, gram) {
                    let k = classify_bigram(lt, i, j);
                    if bigram_flag(metric, &k) {
                        out.push(NgramDetail {
                            ngram: gram.clone(),
                            count,
                            percentage: pct(count, total),
                            class: k.label(),
                        });
                    }
                }
            }
        } else if let Some(filter) = trigram_filter(metric) {
            let total = self.corpus.total_trigrams;
            for (gram, &count) in &self.corpus.trigrams {
                if let Some((i, j, k)) = slots3(&self.index, gram) {
                    let class = classify_trigram(lt, i, j, k);
                    if filter(class) {
                        out.push(NgramDetail {
                            ngram: gram.clone(),
                            count,
                            percentage: pct(count, total),
                            class: class.to_string(),
                        });
                    }
                }
            }
        } else if let Some((group, n)) = load_group(metric) {
            let total = self.corpus.total_unigrams;
            for (gram, &count) in &self.corpus.unigrams {
                let Some(&slot) = gram.chars().next().and_then(|c| self.index.get(&c)) else {
                    continue;
                };
                let info = lt.slot(slot);
                let hit = match group {
                    'C' => slot < THUMB_START && info.col as usize == n,
                    'F' => info.finger as usize == n,
                    'H' => info.hand as usize == n,
                    _ => info.row as usize == n,
                };
                if hit {
                    out.push(NgramDetail {
                        ngram: gram.clone(),
                        count,
                        percentage: pct(count, total),
                        class: format!("slot {}", slot),
                    });
                }
            }
        } else {
            return Err(KeycraftError::Validation(format!(
                "Metric '{}' has no n-gram breakdown",
                metric
            )));
        }

        out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.ngram.cmp(&b.ngram)));
        Ok(out)
    }
}

fn build_metrics(
    layout: &SplitLayout,
    corpus: &Corpus,
    targets: &TargetLoads,
    t: &Tally,
) -> BTreeMap<String, f64> {
    let mut m = BTreeMap::new();
    let mut put = |name: &str, v: f64| {
        m.insert(name.to_string(), v);
    };

    let bi = corpus.total_bigrams;
    put("SFB", pct(t.sfb, bi));
    put("SFR", pct(t.sfr, bi));
    put("LSB", pct(t.lsb, bi));
    put("FSB", pct(t.fsb, bi));
    put("HSB", pct(t.hsb, bi));

    let sk = corpus.total_skipgrams;
    put("SFS", pct(t.sfs, sk));
    put("LSS", pct(t.lss, sk));
    put("FSS", pct(t.fss, sk));
    put("HSS", pct(t.hss, sk));

    let tri = corpus.total_trigrams;
    let mut families: BTreeMap<&str, u64> = TRIGRAM_FAMILIES.iter().map(|f| (*f, 0)).collect();
    for class in TrigramClass::iter() {
        let count = t.trigrams[class.index()];
        put(class.as_ref(), pct(count, tri));
        *families.entry(class.family()).or_default() += count;
    }
    for (family, count) in families {
        put(family, pct(count, tri));
    }

    let loads = Loads::from_slot_counts(layout.layout_type, &t.slots, corpus.total_unigrams);
    for c in 0..COLUMNS {
        put(&format!("C{}", c), loads.columns[c]);
    }
    for f in 0..FINGER_COUNT {
        put(&format!("F{}", f), loads.fingers[f]);
    }
    put("H0", loads.hands[0]);
    put("H1", loads.hands[1]);
    for r in 0..ROW_COUNT {
        put(&format!("R{}", r), loads.rows[r]);
    }

    put("HDEV", loads.hand_deviation(targets));
    put("FDEV", loads.finger_deviation(targets));
    put("RDEV", loads.row_deviation(targets));
    put("PDEV", loads.pinky_deviation(targets));

    let share = |c: TrigramClass| pct(t.trigrams[c.index()], tri);
    let inward = share(TrigramClass::Roll2In) + share(TrigramClass::Roll3In);
    let outward = share(TrigramClass::Roll2Out) + share(TrigramClass::Roll3Out);
    let in_out = if outward > 0.0 { inward / outward } else { inward };
    put("IN:OUT", in_out);
    put("FLW", share(TrigramClass::AltNormal) + inward + outward);
    put("RBL", loads.hands[1] - loads.hands[0]);
    put("FBL", loads.finger_balance());
    put("POH", loads.pinky_off_home);

    m
}

#[inline]
fn pct(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

fn slots2(index: &HashMap<char, usize>, gram: &str) -> Option<(usize, usize)> {
    let mut it = gram.chars();
    let a = *index.get(&it.next()?)?;
    let b = *index.get(&it.next()?)?;
    Some((a, b))
}

fn slots3(index: &HashMap<char, usize>, gram: &str) -> Option<(usize, usize, usize)> {
    let mut it = gram.chars();
    let a = *index.get(&it.next()?)?;
    let b = *index.get(&it.next()?)?;
    let c = *index.get(&it.next()?)?;
    Some((a, b, c))
}

fn bigram_flag(metric: &str, k: &BigramKind) -> bool {
    match metric {
        "SFB" | "SFS" => k.same_finger,
        "SFR" => k.repeat,
        "LSB" | "LSS" => k.lateral_stretch,
        "FSB" | "FSS" => k.full_scissor,
        "HSB" | "HSS" => k.half_scissor,
        _ => false,
    }
}

fn trigram_filter(metric: &str) -> Option<Box<dyn Fn(TrigramClass) -> bool>> {
    if let Ok(class) = TrigramClass::from_str(metric) {
        return Some(Box::new(move |c: TrigramClass| c == class));
    }
    let family: &'static str = *TRIGRAM_FAMILIES.iter().find(|f| **f == metric)?;
    Some(Box::new(move |c: TrigramClass| c.family() == family))
}

/// Parses load metric names like `C3`, `F9`, `H1`, `R2`.
fn load_group(metric: &str) -> Option<(char, usize)> {
    let mut chars = metric.chars();
    let group = chars.next()?;
    let n: usize = chars.as_str().parse().ok()?;
    let limit = match group {
        'C' => COLUMNS,
        'F' => FINGER_COUNT,
        'H' => 2,
        'R' => ROW_COUNT,
        _ => return None,
    };
    (n < limit).then_some((group, n))
}
