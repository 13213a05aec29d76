pub mod cache;

use crate::error::{KcResult, KeycraftError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Word and n-gram frequencies for one text source at one coverage level.
///
/// Only words that survive the coverage filter feed the n-gram tables, and
/// n-grams never span word boundaries. Tables are keyed by the n-gram text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub name: String,
    pub source: PathBuf,
    pub coverage: f64,
    /// SHA-256 of the source file; empty for in-memory corpora.
    pub fingerprint: String,

    pub words: BTreeMap<String, u64>,
    pub unigrams: BTreeMap<String, u64>,
    pub bigrams: BTreeMap<String, u64>,
    pub trigrams: BTreeMap<String, u64>,
    pub skipgrams: BTreeMap<String, u64>,

    pub total_words: u64,
    pub total_unigrams: u64,
    pub total_bigrams: u64,
    pub total_trigrams: u64,
    pub total_skipgrams: u64,

    /// Word occurrences and distinct words before the coverage filter.
    pub source_word_count: u64,
    pub source_vocabulary: usize,
}

impl Corpus {
    /// Loads `source_path`, reusing the side-car cache for this coverage
    /// unless `force_reload` is set or the cache is stale/corrupt.
    pub fn new<P: AsRef<Path>>(
        name: &str,
        source_path: P,
        force_reload: bool,
        coverage: f64,
    ) -> KcResult<Self> {
        let source = source_path.as_ref();
        if name.trim().is_empty() {
            return Err(KeycraftError::Validation(
                "Corpus name must not be empty".to_string(),
            ));
        }
        if source.as_os_str().is_empty() {
            return Err(KeycraftError::Validation(
                "Corpus source path must not be empty".to_string(),
            ));
        }
        validate_coverage(coverage)?;
        if !source.is_file() {
            return Err(KeycraftError::NotFound(source.to_path_buf()));
        }

        let fingerprint = cache::file_fingerprint(source)?;
        let cache_path = cache::cache_path(source, coverage);

        if !force_reload {
            if let Some(mut cached) = cache::load(&cache_path, coverage, &fingerprint) {
                info!(
                    "Corpus '{}': loaded {} words from cache {:?}",
                    name,
                    cached.words.len(),
                    cache_path
                );
                cached.name = name.to_string();
                cached.source = source.to_path_buf();
                return Ok(cached);
            }
        }

        info!(
            "Corpus '{}': building from {:?} at {}% coverage",
            name, source, coverage
        );
        let bytes = fs::read(source)?;
        let text = String::from_utf8_lossy(&bytes);
        let mut corpus = Self::build(name, &text, coverage);
        corpus.source = source.to_path_buf();
        corpus.fingerprint = fingerprint;

        if let Err(e) = cache::store(&cache_path, &corpus) {
            warn!("Corpus '{}': could not write cache {:?}: {}", name, cache_path, e);
        }
        Ok(corpus)
    }

    /// Loads an explicitly named cache file. Unlike the implicit side-car
    /// lookup, a missing or corrupt file is an error.
    pub fn from_cache<P: AsRef<Path>>(path: P) -> KcResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(KeycraftError::NotFound(path.to_path_buf()));
        }
        cache::read_snapshot(path)
    }

    /// Builds an in-memory corpus; nothing is cached.
    pub fn from_text(name: &str, text: &str, coverage: f64) -> KcResult<Self> {
        validate_coverage(coverage)?;
        Ok(Self::build(name, text, coverage))
    }

    fn build(name: &str, text: &str, coverage: f64) -> Self {
        let all_words = count_words(text);
        let source_word_count = all_words.values().sum();
        let source_vocabulary = all_words.len();
        let words = apply_coverage(&all_words, coverage);

        debug!(
            "Coverage {}% kept {}/{} distinct words",
            coverage,
            words.len(),
            source_vocabulary
        );

        let mut corpus = Corpus {
            name: name.to_string(),
            source: PathBuf::new(),
            coverage,
            fingerprint: String::new(),
            words: BTreeMap::new(),
            unigrams: BTreeMap::new(),
            bigrams: BTreeMap::new(),
            trigrams: BTreeMap::new(),
            skipgrams: BTreeMap::new(),
            total_words: 0,
            total_unigrams: 0,
            total_bigrams: 0,
            total_trigrams: 0,
            total_skipgrams: 0,
            source_word_count,
            source_vocabulary,
        };
        corpus.count_ngrams(words);
        corpus
    }

    fn count_ngrams(&mut self, words: BTreeMap<String, u64>) {
        for (word, &count) in &words {
            let chars: Vec<char> = word.chars().collect();
            for c in &chars {
                *self.unigrams.entry(c.to_string()).or_default() += count;
            }
            for w in chars.windows(2) {
                *self.bigrams.entry(w.iter().collect()).or_default() += count;
            }
            for w in chars.windows(3) {
                *self.trigrams.entry(w.iter().collect()).or_default() += count;
                let skip: String = [w[0], w[2]].iter().collect();
                *self.skipgrams.entry(skip).or_default() += count;
            }
        }

        self.total_words = words.values().sum();
        self.total_unigrams = self.unigrams.values().sum();
        self.total_bigrams = self.bigrams.values().sum();
        self.total_trigrams = self.trigrams.values().sum();
        self.total_skipgrams = self.skipgrams.values().sum();
        self.words = words;
    }

    pub fn word_count(&self, word: &str) -> u64 {
        self.words.get(word).copied().unwrap_or(0)
    }

    pub fn unigram_count(&self, gram: &str) -> u64 {
        self.unigrams.get(gram).copied().unwrap_or(0)
    }

    pub fn bigram_count(&self, gram: &str) -> u64 {
        self.bigrams.get(gram).copied().unwrap_or(0)
    }

    pub fn trigram_count(&self, gram: &str) -> u64 {
        self.trigrams.get(gram).copied().unwrap_or(0)
    }

    pub fn skipgram_count(&self, gram: &str) -> u64 {
        self.skipgrams.get(gram).copied().unwrap_or(0)
    }
}

fn validate_coverage(coverage: f64) -> KcResult<()> {
    if !coverage.is_finite() || coverage <= 0.0 || coverage > 100.0 {
        return Err(KeycraftError::Validation(format!(
            "Coverage must be in (0, 100], got {}",
            coverage
        )));
    }
    Ok(())
}

/// Splits on anything that is not alphanumeric or an apostrophe and
/// lower-cases the result. Apostrophes only survive inside words.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

pub fn count_words(text: &str) -> BTreeMap<String, u64> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for word in tokenize(text) {
        *counts.entry(word).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Keeps the most frequent words until their cumulative share reaches
/// `coverage` percent. Ties are broken alphabetically so a lower coverage
/// always keeps a prefix of what a higher one keeps.
pub fn apply_coverage(counts: &BTreeMap<String, u64>, coverage: f64) -> BTreeMap<String, u64> {
    let total: u64 = counts.values().sum();
    let mut kept = BTreeMap::new();
    if total == 0 {
        return kept;
    }

    let mut ranked: Vec<(&String, &u64)> = counts.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let threshold = coverage / 100.0;
    let mut cumulative = 0u64;
    for (word, &count) in ranked {
        kept.insert(word.clone(), count);
        cumulative += count;
        if cumulative as f64 / total as f64 >= threshold {
            break;
        }
    }
    kept
}
