//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use leaderboard_core::{Split, SubmissionId};

use crate::runner::ToolCommand;
use crate::scorer::{DEFAULT_SCORER_COMMAND, DEFAULT_SCORER_TIMEOUT_SECS};
use crate::unpack::DEFAULT_UNPACK_COMMAND;

pub const DEFAULT_SUBMISSIONS_DIR: &str = "submissions";
pub const DEFAULT_RUN_EXTENSION: &str = "txt.bz2";
pub const DEFAULT_DEV_QRELS: &str = "eval/msmarco-passage-dev-qrels.tsv";
pub const DEFAULT_TEST_QRELS: &str = "eval/msmarco-passage-eval-qrels.tsv";
pub const DEFAULT_PRIVATE_KEY: &str = "msmarco_passage_private_key.pem";
pub const DEFAULT_UNPACK_TIMEOUT_SECS: u64 = 600;

/// Everything one pipeline run needs.
///
/// Relative paths are resolved against `root`; the external tools run with
/// `root` as their working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub submission_id: SubmissionId,

    /// Leaderboard repository root.
    pub root: PathBuf,

    pub submissions_dir: PathBuf,

    /// Extension of the run files, e.g. `txt.bz2`.
    pub run_extension: String,

    pub dev_qrels: PathBuf,

    /// Held-out judgments; usually absent.
    pub test_qrels: PathBuf,

    pub scorer: ToolCommand,

    /// Presence triggers the unpack tool.
    pub private_key: PathBuf,

    pub unpack: ToolCommand,

    /// Build the leaderboard record after scoring.
    pub generate_record: bool,
}

impl PipelineConfig {
    /// Configuration with the standard leaderboard layout under `.`.
    pub fn new(submission_id: SubmissionId) -> Self {
        Self {
            submission_id,
            root: PathBuf::from("."),
            submissions_dir: PathBuf::from(DEFAULT_SUBMISSIONS_DIR),
            run_extension: DEFAULT_RUN_EXTENSION.to_string(),
            dev_qrels: PathBuf::from(DEFAULT_DEV_QRELS),
            test_qrels: PathBuf::from(DEFAULT_TEST_QRELS),
            scorer: ToolCommand::parse(DEFAULT_SCORER_COMMAND, DEFAULT_SCORER_TIMEOUT_SECS),
            private_key: PathBuf::from(DEFAULT_PRIVATE_KEY),
            unpack: ToolCommand::parse(DEFAULT_UNPACK_COMMAND, DEFAULT_UNPACK_TIMEOUT_SECS),
            generate_record: false,
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_record(mut self, generate_record: bool) -> Self {
        self.generate_record = generate_record;
        self
    }

    pub fn with_scorer(mut self, scorer: ToolCommand) -> Self {
        self.scorer = scorer;
        self
    }

    /// Resolve `path` against the root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    pub fn qrels_for(&self, split: Split) -> PathBuf {
        match split {
            Split::Dev => self.resolve(&self.dev_qrels),
            Split::Test => self.resolve(&self.test_qrels),
        }
    }

    /// Scorer command running from the root.
    pub fn scorer_command(&self) -> ToolCommand {
        self.scorer.clone().in_dir(&self.root)
    }

    /// Unpack command running from the root.
    pub fn unpack_command(&self) -> ToolCommand {
        self.unpack.clone().in_dir(&self.root)
    }
}
