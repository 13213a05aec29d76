use crate::error::KcResult;
use crate::layout::SplitLayout;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use strum_macros::Display;

/// One line of the generation log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub score: f64,
    pub best_score: f64,
    pub elapsed_seconds: f64,
}

/// Receives a record after every generation.
pub trait GenerationSink {
    fn record(&mut self, record: &GenerationRecord) -> KcResult<()>;

    fn finish(&mut self) -> KcResult<()> {
        Ok(())
    }
}

/// Collects records in memory.
impl GenerationSink for Vec<GenerationRecord> {
    fn record(&mut self, record: &GenerationRecord) -> KcResult<()> {
        self.push(*record);
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonlSink<W: Write> {
    writer: W,
}

impl JsonlSink<BufWriter<File>> {
    /// Opens `path` for appending, creating it if missing.
    pub fn append<P: AsRef<Path>>(path: P) -> KcResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> GenerationSink for JsonlSink<W> {
    fn record(&mut self, record: &GenerationRecord) -> KcResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> KcResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum StopReason {
    #[strum(serialize = "generation limit")]
    GenerationLimit,
    #[strum(serialize = "time limit")]
    TimeLimit,
}

#[derive(Debug, Clone, Serialize)]
pub struct Telemetry {
    pub seed: u64,
    pub generations: usize,
    pub evaluations: u64,
    pub breakouts: usize,
    pub improvements: usize,
    pub initial_score: f64,
    pub best_score: f64,
    pub best_generation: usize,
    pub elapsed_seconds: f64,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone)]
pub struct OptimiseResult {
    pub original: SplitLayout,
    pub best: SplitLayout,
    pub telemetry: Telemetry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsonl_sink_writes_one_object_per_line() {
        let mut sink = JsonlSink::new(Vec::new());
        for g in 1..=3 {
            sink.record(&GenerationRecord {
                generation: g,
                score: -1.0,
                best_score: -0.5,
                elapsed_seconds: 0.01,
            })
            .unwrap();
        }
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        let rec: GenerationRecord = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(rec.generation, 3);
        assert_eq!(rec.best_score, -0.5);
    }
}
