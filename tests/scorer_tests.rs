mod common;

use keycraft::config::{TargetLoads, Weights};
use keycraft::layouts::KnownLayout;
use keycraft::scorer::{score, Scorer};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

const NAMES: [&str; 6] = ["SFB", "LSB", "2RL-IN", "RED", "HDEV", "FBL"];

prop_compose! {
    fn arb_metrics()(values in proptest::collection::vec(0.0..100.0f64, NAMES.len())) -> BTreeMap<String, f64> {
        NAMES.iter().zip(values).map(|(n, v)| (n.to_string(), v)).collect()
    }
}

prop_compose! {
    fn arb_weights()(values in proptest::collection::vec(-5.0..5.0f64, NAMES.len())) -> Weights {
        let pairs: Vec<(&str, f64)> = NAMES.iter().copied().zip(values).collect();
        Weights::from_pairs(&pairs)
    }
}

proptest! {
    #[test]
    fn prop_scaling_weights_scales_score(
        m in arb_metrics(),
        w in arb_weights(),
        k in -10.0..10.0f64,
    ) {
        let base = score(&m, &w);
        let scaled = score(&m, &w.scaled(k));
        prop_assert!((scaled - k * base).abs() <= 1e-9 * (1.0 + base.abs() * k.abs()));
    }

    #[test]
    fn prop_score_is_additive_in_weights(
        m in arb_metrics(),
        a in arb_weights(),
        b in arb_weights(),
    ) {
        let mut sum = Weights::empty();
        for n in NAMES {
            sum.set(n, a.get(n) + b.get(n));
        }
        let lhs = score(&m, &sum);
        let rhs = score(&m, &a) + score(&m, &b);
        prop_assert!((lhs - rhs).abs() < 1e-8);
    }
}

#[test]
fn test_scorer_matches_free_function() {
    let corpus = Arc::new(common::corpus(common::SAMPLE_TEXT));
    let scorer = Scorer::new(corpus.clone(), Weights::default(), TargetLoads::default());
    let layout = KnownLayout::Qwerty.to_layout().unwrap();

    let metrics = scorer.analyse(&layout).metrics;
    assert_eq!(scorer.score_layout(&layout), score(&metrics, &Weights::default()));
}

#[test]
fn test_colemak_beats_qwerty_on_sfb_weight() {
    let corpus = Arc::new(common::corpus(common::SAMPLE_TEXT));
    let scorer = Scorer::new(
        corpus,
        Weights::from_pairs(&[("SFB", -1.0)]),
        TargetLoads::default(),
    );
    let qwerty = KnownLayout::Qwerty.to_layout().unwrap();
    let colemak = KnownLayout::Colemak.to_layout().unwrap();
    assert!(scorer.score_layout(&colemak) > scorer.score_layout(&qwerty));
}

#[test]
fn test_weights_file_and_overrides() {
    let ctx = common::TestContext::new("");
    let path = ctx.path("weights.json");
    std::fs::write(&path, r#"{"SFB": -2.0, "LSB": -1.0}"#).unwrap();

    let mut w = Weights::load_from_file(&path).unwrap();
    w.merge_overrides("LSB=0,FLW=0.5").unwrap();
    assert_eq!(w.get("SFB"), -2.0);
    assert_eq!(w.iter().count(), 2);
    assert_eq!(w.get("FLW"), 0.5);
}
