mod common;

use common::TestContext;
use keycraft::corpus::{apply_coverage, cache, count_words, Corpus};
use keycraft::error::KeycraftError;
use proptest::prelude::*;
use std::fs;

#[test]
fn test_the_counted_per_occurrence() {
    let c = Corpus::from_text("t", "the quick brown fox jumps over the lazy dog", 100.0).unwrap();
    assert_eq!(c.word_count("the"), 2);

    let full = "the quick brown fox jumps over the lazy dog the five boxing wizards jump quickly";
    let c = Corpus::from_text("t", full, 100.0).unwrap();
    assert_eq!(c.word_count("the"), 3);
    assert_eq!(c.word_count("jump"), 1);
    assert_eq!(c.word_count("jumps"), 1);
}

#[test]
fn test_reload_from_cache_is_identical() {
    let ctx = TestContext::new(common::SAMPLE_TEXT);
    let fresh = Corpus::new("sample", &ctx.corpus_path, false, 90.0).unwrap();

    let cache_file = cache::cache_path(&ctx.corpus_path, 90.0);
    assert!(cache_file.is_file());

    let reloaded = Corpus::new("sample", &ctx.corpus_path, false, 90.0).unwrap();
    assert_eq!(fresh, reloaded);

    let explicit = Corpus::from_cache(&cache_file).unwrap();
    assert_eq!(explicit.bigrams, fresh.bigrams);
    assert_eq!(explicit.total_trigrams, fresh.total_trigrams);
}

#[test]
fn test_cached_matches_fresh_build_of_text() {
    let ctx = TestContext::new(common::SAMPLE_TEXT);
    let _ = Corpus::new("sample", &ctx.corpus_path, false, 100.0).unwrap();
    let cached = Corpus::new("sample", &ctx.corpus_path, false, 100.0).unwrap();
    let in_memory = Corpus::from_text("sample", common::SAMPLE_TEXT, 100.0).unwrap();

    assert_eq!(cached.words, in_memory.words);
    assert_eq!(cached.unigrams, in_memory.unigrams);
    assert_eq!(cached.skipgrams, in_memory.skipgrams);
    assert_eq!(cached.total_bigrams, in_memory.total_bigrams);
}

#[test]
fn test_stale_cache_is_rebuilt() {
    let ctx = TestContext::new("alpha beta");
    let first = Corpus::new("c", &ctx.corpus_path, false, 100.0).unwrap();
    assert_eq!(first.word_count("gamma"), 0);

    fs::write(&ctx.corpus_path, "alpha beta gamma").unwrap();
    let second = Corpus::new("c", &ctx.corpus_path, false, 100.0).unwrap();
    assert_eq!(second.word_count("gamma"), 1);
    assert_ne!(first.fingerprint, second.fingerprint);
}

#[test]
fn test_corrupt_cache_falls_back_to_source() {
    let ctx = TestContext::new("alpha beta");
    let cache_file = cache::cache_path(&ctx.corpus_path, 100.0);
    fs::write(&cache_file, "garbage").unwrap();

    let c = Corpus::new("c", &ctx.corpus_path, false, 100.0).unwrap();
    assert_eq!(c.word_count("alpha"), 1);
    // The rebuild replaced the corrupt file.
    assert!(Corpus::from_cache(&cache_file).is_ok());
}

#[test]
fn test_force_reload_ignores_cache() {
    let ctx = TestContext::new("alpha beta");
    let _ = Corpus::new("c", &ctx.corpus_path, false, 100.0).unwrap();

    let cache_file = cache::cache_path(&ctx.corpus_path, 100.0);
    fs::write(&cache_file, "garbage").unwrap();

    let c = Corpus::new("c", &ctx.corpus_path, true, 100.0).unwrap();
    assert_eq!(c.total_words, 2);
}

#[test]
fn test_input_errors() {
    let ctx = TestContext::new("alpha");
    assert!(matches!(
        Corpus::new("", &ctx.corpus_path, false, 100.0),
        Err(KeycraftError::Validation(_))
    ));
    assert!(matches!(
        Corpus::new("c", "", false, 100.0),
        Err(KeycraftError::Validation(_))
    ));
    assert!(matches!(
        Corpus::new("c", ctx.path("missing.txt"), false, 100.0),
        Err(KeycraftError::NotFound(_))
    ));
    assert!(matches!(
        Corpus::new("c", &ctx.corpus_path, false, 0.0),
        Err(KeycraftError::Validation(_))
    ));
    assert!(matches!(
        Corpus::from_cache(ctx.path("missing.cache.json")),
        Err(KeycraftError::NotFound(_))
    ));
}

#[test]
fn test_explicit_corrupt_cache_is_an_error() {
    let ctx = TestContext::new("alpha");
    let path = ctx.path("named.cache.json");
    fs::write(&path, "{").unwrap();
    assert!(matches!(Corpus::from_cache(&path), Err(KeycraftError::Json(_))));
}

proptest! {
    #[test]
    fn prop_coverage_sets_are_nested(
        words in proptest::collection::vec("[a-e]{1,3}", 1..60),
        c1 in 1.0..100.0f64,
        c2 in 1.0..100.0f64,
    ) {
        let text = words.join(" ");
        let counts = count_words(&text);
        let (lo, hi) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
        let small = apply_coverage(&counts, lo);
        let large = apply_coverage(&counts, hi);
        for w in small.keys() {
            prop_assert!(large.contains_key(w));
        }
    }

    #[test]
    fn prop_ngram_totals_match_word_lengths(
        words in proptest::collection::vec("[a-z]{1,6}", 1..30),
    ) {
        let c = Corpus::from_text("p", &words.join(" "), 100.0).unwrap();
        let expected: u64 = c.words.iter().map(|(w, n)| w.chars().count() as u64 * n).sum();
        prop_assert_eq!(c.total_unigrams, expected);
        let bigrams: u64 = c
            .words
            .iter()
            .map(|(w, n)| (w.chars().count() as u64).saturating_sub(1) * n)
            .sum();
        prop_assert_eq!(c.total_bigrams, bigrams);
    }
}
