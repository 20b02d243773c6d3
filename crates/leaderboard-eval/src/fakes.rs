//! In-process fakes and fixtures (testing only)
//!
//! Provides `FixedScorer` and `FailingScorer`, which satisfy the `Scorer`
//! contract without spawning a process, and helpers that write run files in
//! any supported compression.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::run_file::{Compression, RunFileError};
use crate::scorer::{Scorer, ScoringToolError};

// ---------------------------------------------------------------------------
// Scorers
// ---------------------------------------------------------------------------

/// Scorer returning a fixed MRR@10 per judgments file, recording every call.
#[derive(Debug, Default)]
pub struct FixedScorer {
    scores: HashMap<PathBuf, f64>,
    default: f64,
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl FixedScorer {
    /// Every run scores `value`.
    pub fn new(value: f64) -> Self {
        Self {
            default: value,
            ..Self::default()
        }
    }

    /// Runs scored against `judgments` return `value`.
    pub fn with_score(mut self, judgments: impl Into<PathBuf>, value: f64) -> Self {
        self.scores.insert(judgments.into(), value);
        self
    }

    /// `(run, judgments)` pairs in call order.
    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Scorer for FixedScorer {
    async fn score(&self, run: &Path, judgments: &Path) -> Result<f64, ScoringToolError> {
        self.calls
            .lock()
            .unwrap()
            .push((run.to_path_buf(), judgments.to_path_buf()));
        Ok(self.scores.get(judgments).copied().unwrap_or(self.default))
    }
}

/// Scorer whose tool always prints something without the metric line.
#[derive(Debug, Default)]
pub struct FailingScorer;

#[async_trait]
impl Scorer for FailingScorer {
    async fn score(&self, _run: &Path, _judgments: &Path) -> Result<f64, ScoringToolError> {
        Err(ScoringToolError::MetricNotFound {
            excerpt: "Traceback (most recent call last):".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Run file fixtures
// ---------------------------------------------------------------------------

/// Write a run with `queries` query ids (`q0`, `q1`, ...) and
/// `hits_per_query` ranked passages each, compressed by extension.
pub fn write_run_file(path: &Path, queries: usize, hits_per_query: usize) -> io::Result<()> {
    let mut lines = Vec::with_capacity(queries * hits_per_query);
    for q in 0..queries {
        for rank in 1..=hits_per_query {
            lines.push(format!("q{q}\tp{}\t{rank}", q * hits_per_query + rank));
        }
    }
    write_run_lines(path, &lines)
}

/// Write raw lines, compressed by the extension of `path`.
pub fn write_run_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut body = lines.join("\n");
    if !lines.is_empty() {
        body.push('\n');
    }

    let compression = Compression::from_path(path).map_err(|e| match e {
        RunFileError::UnsupportedFormat { .. } => io::Error::new(io::ErrorKind::InvalidInput, e),
        RunFileError::Open { source, .. } | RunFileError::Read { source, .. } => source,
    })?;

    let file = File::create(path)?;
    match compression {
        Compression::None => {
            let mut file = file;
            file.write_all(body.as_bytes())?;
        }
        Compression::Gzip => {
            let mut enc = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            enc.write_all(body.as_bytes())?;
            enc.finish()?;
        }
        Compression::Bzip2 => {
            let mut enc = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
            enc.write_all(body.as_bytes())?;
            enc.finish()?;
        }
        Compression::Zstd => {
            let mut enc = zstd::stream::write::Encoder::new(file, 0)?;
            enc.write_all(body.as_bytes())?;
            enc.finish()?;
        }
    }
    Ok(())
}
