//! Side-car snapshot of a corpus' frequency tables.
//!
//! One file per (source, coverage): `<source file name>.cov<coverage>.cache.json`
//! in the source's directory. The snapshot records the source's SHA-256 so an
//! edited source is rebuilt rather than served stale.

use super::Corpus;
use crate::error::{KcResult, KeycraftError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    corpus: Corpus,
}

pub fn file_fingerprint<P: AsRef<Path>>(path: P) -> Result<String, std::io::Error> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

pub fn cache_path(source: &Path, coverage: f64) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string());
    source.with_file_name(format!("{}.cov{}.cache.json", file_name, coverage))
}

/// Returns the cached corpus if it exists, parses, and matches both the
/// coverage and the source fingerprint. Anything else is a miss.
pub fn load(path: &Path, coverage: f64, fingerprint: &str) -> Option<Corpus> {
    if !path.is_file() {
        debug!("No corpus cache at {:?}", path);
        return None;
    }

    let corpus = match read_snapshot(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Ignoring unreadable corpus cache {:?}: {}", path, e);
            return None;
        }
    };

    if corpus.coverage != coverage {
        debug!(
            "Cache {:?} has coverage {}, wanted {}",
            path, corpus.coverage, coverage
        );
        return None;
    }
    if corpus.fingerprint != fingerprint {
        debug!("Cache {:?} is stale (source changed)", path);
        return None;
    }
    Some(corpus)
}

pub fn read_snapshot(path: &Path) -> KcResult<Corpus> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: Snapshot = serde_json::from_reader(reader)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(KeycraftError::Validation(format!(
            "Cache version {} is not supported (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }
    Ok(snapshot.corpus)
}

/// Writes to `<path>.tmp` and renames it into place.
pub fn store(path: &Path, corpus: &Corpus) -> KcResult<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            corpus,
        };
        serde_json::to_writer(&mut writer, &snapshot)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    debug!("Wrote corpus cache {:?}", path);
    Ok(())
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    corpus: &'a Corpus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_path_encodes_coverage() {
        let p = cache_path(Path::new("/data/books.txt"), 97.5);
        assert_eq!(p, PathBuf::from("/data/books.txt.cov97.5.cache.json"));
        let p = cache_path(Path::new("books.txt"), 100.0);
        assert_eq!(p, PathBuf::from("books.txt.cov100.cache.json"));
    }

    #[test]
    fn test_corrupt_cache_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.cache.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load(&path, 100.0, "abc").is_none());
    }

    #[test]
    fn test_fingerprint_mismatch_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.cache.json");
        let mut corpus = Corpus::from_text("t", "hello world", 100.0).unwrap();
        corpus.fingerprint = "aaa".to_string();
        store(&path, &corpus).unwrap();

        assert!(load(&path, 100.0, "aaa").is_some());
        assert!(load(&path, 100.0, "bbb").is_none());
        assert!(load(&path, 90.0, "aaa").is_none());
    }
}
