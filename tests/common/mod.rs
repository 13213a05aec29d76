#![allow(dead_code)]

use keycraft::corpus::Corpus;
use keycraft::geometry::LayoutType;
use keycraft::layout::SplitLayout;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const QWERTY: &str = "~qwertyuiop~ ~asdfghjkl;' ~zxcvbnm,./~ ~~~~~~";

pub const SAMPLE_TEXT: &str = "the quick brown fox jumps over the lazy dog \
    the five boxing wizards jump quickly. \
    Sphinx of black quartz, judge my vow! \
    How vexingly quick daft zebras jump; the dog sleeps while the fox runs.";

pub fn layout(lt: LayoutType, runes: &str) -> SplitLayout {
    SplitLayout::from_str_runes("test", lt, runes).expect("valid test layout")
}

pub fn qwerty() -> SplitLayout {
    SplitLayout::from_str_runes("qwerty", LayoutType::Ortho, QWERTY).expect("valid qwerty")
}

pub fn corpus(text: &str) -> Corpus {
    Corpus::from_text("test", text, 100.0).expect("valid corpus")
}

/// A temporary directory holding a corpus file.
pub struct TestContext {
    _dir: TempDir,
    pub root: PathBuf,
    pub corpus_path: PathBuf,
}

impl TestContext {
    pub fn new(text: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = dir.path().to_path_buf();
        let corpus_path = root.join("corpus.txt");
        fs::write(&corpus_path, text).expect("Failed to write corpus");
        Self {
            _dir: dir,
            root,
            corpus_path,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}
