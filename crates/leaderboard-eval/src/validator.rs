//! Structural sanity check of run files.
//!
//! A complete run ranks exactly [`HITS_PER_QUERY`] passages for every query.
//! Violations are reported as a [`FormatWarning`] and never reject the run,
//! so near-miss submissions can still be scored and inspected.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use leaderboard_core::obs;

use crate::run_file::{RunFileError, RunFileReader};

/// Ranked passages expected per query.
pub const HITS_PER_QUERY: usize = 1000;

/// Line count does not match `queries * HITS_PER_QUERY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatWarning {
    pub expected: usize,
    pub actual: usize,
}

impl FormatWarning {
    /// Signed difference `actual - expected`.
    pub fn discrepancy(&self) -> i64 {
        self.actual as i64 - self.expected as i64
    }
}

impl fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Warning, {} lines expected ({HITS_PER_QUERY} hits per query), instead {} lines found!",
            self.expected, self.actual
        )
    }
}

/// Result of sanity checking one run file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub path: PathBuf,
    pub line_count: usize,
    pub query_count: usize,
    pub warning: Option<FormatWarning>,
}

impl ValidationReport {
    pub fn expected_lines(&self) -> usize {
        self.query_count * HITS_PER_QUERY
    }

    pub fn is_consistent(&self) -> bool {
        self.warning.is_none()
    }

    /// Human-readable report lines.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Run has {} lines, {} unique queries.",
            self.line_count, self.query_count
        )];
        if let Some(warning) = &self.warning {
            lines.push(warning.to_string());
        }
        lines
    }
}

/// Line/query-count consistency checker.
pub struct FormatValidator;

impl FormatValidator {
    /// Decompress and check the run file at `path`.
    ///
    /// Only I/O and decompression problems are errors; count mismatches are
    /// carried in the returned report.
    pub fn sanity_check(path: &Path) -> Result<ValidationReport, RunFileError> {
        tracing::info!(run = %path.display(), "Sanity checking run");
        let lines = RunFileReader::open(path)?;
        let report = Self::validate_lines(path, lines).map_err(|source| RunFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        for line in report.summary() {
            tracing::info!("{line}");
        }
        if let Some(warning) = &report.warning {
            obs::emit_format_warning(
                &path.display().to_string(),
                warning.expected,
                warning.actual,
            );
        }
        Ok(report)
    }

    /// Count lines and distinct query ids (text before the first tab).
    pub fn validate_lines<I>(path: &Path, lines: I) -> io::Result<ValidationReport>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let mut query_ids = HashSet::new();
        let mut line_count = 0usize;

        for line in lines {
            let line = line?;
            let qid = line.split('\t').next().unwrap_or_default();
            if !query_ids.contains(qid) {
                query_ids.insert(qid.to_string());
            }
            line_count += 1;
        }

        let query_count = query_ids.len();
        let expected = query_count * HITS_PER_QUERY;
        let warning = (line_count != expected).then_some(FormatWarning {
            expected,
            actual: line_count,
        });

        Ok(ValidationReport {
            path: path.to_path_buf(),
            line_count,
            query_count,
            warning,
        })
    }
}
