//! Submission identity and artifact layout.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::domain::error::RecordError;

fn date_prefix() -> &'static Regex {
    static DATE_PREFIX: OnceLock<Regex> = OnceLock::new();
    DATE_PREFIX.get_or_init(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})-").expect("static regex"))
}

/// Submission identifier, conventionally `YYYYMMDD-<slug>`.
///
/// Any string is accepted; the date prefix is only required when a
/// leaderboard record is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Submission date encoded in the identifier prefix.
    pub fn date(&self) -> Result<NaiveDate, RecordError> {
        let caps = date_prefix()
            .captures(&self.0)
            .ok_or_else(|| RecordError::MalformedIdentifier { id: self.0.clone() })?;

        // The regex guarantees ASCII digits, so these parses cannot overflow.
        let year: i32 = caps[1].parse().unwrap_or_default();
        let month: u32 = caps[2].parse().unwrap_or_default();
        let day: u32 = caps[3].parse().unwrap_or_default();

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| RecordError::InvalidDate {
            id: self.0.clone(),
            raw: format!("{}{}{}", &caps[1], &caps[2], &caps[3]),
        })
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubmissionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Expected on-disk artifacts of one submission.
///
/// Construction only computes paths; presence is checked by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,

    /// `<submissions>/<id>`
    pub base_dir: PathBuf,

    /// `<submissions>/<id>/dev.<ext>`
    pub dev_run: PathBuf,

    /// `<submissions>/<id>/eval.<ext>`
    pub test_run: PathBuf,

    /// `<submissions>/<id>-metadata.json`
    pub metadata: PathBuf,
}

impl Submission {
    /// Compute the artifact layout for `id` under `submissions_dir`.
    pub fn layout(submissions_dir: &Path, id: SubmissionId, run_extension: &str) -> Self {
        let base_dir = submissions_dir.join(id.as_str());
        let dev_run = base_dir.join(format!("dev.{run_extension}"));
        let test_run = base_dir.join(format!("eval.{run_extension}"));
        let metadata = submissions_dir.join(format!("{}-metadata.json", id.as_str()));

        Self {
            id,
            base_dir,
            dev_run,
            test_run,
            metadata,
        }
    }

    /// Artifacts in the order they are checked: dev run, test run, metadata.
    pub fn artifacts(&self) -> [&Path; 3] {
        [&self.dev_run, &self.test_run, &self.metadata]
    }
}
