//! Scoring of run files against reference judgments.
//!
//! [`Scorer`] is the seam between the pipeline and whatever computes MRR@10.
//! [`CommandScorer`] drives the official evaluation script as a subprocess;
//! its textual output protocol is parsed here and nowhere else.

use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::runner::{CommandError, ToolCommand, ToolRunner};

/// Default scoring command, run from the leaderboard root.
pub const DEFAULT_SCORER_COMMAND: &str = "python eval/ms_marco_eval.py";

/// Default scoring timeout in seconds.
pub const DEFAULT_SCORER_TIMEOUT_SECS: u64 = 3600;

const EXCERPT_CHARS: usize = 200;

/// Scoring failures. Never papered over with a guessed value.
#[derive(Debug, thiserror::Error)]
pub enum ScoringToolError {
    #[error("scoring command is empty")]
    EmptyCommand,

    #[error("failed to start scoring tool {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("scoring tool exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("scoring tool output has no \"MRR @10: <value>\" line: {excerpt:?}")]
    MetricNotFound { excerpt: String },

    #[error("scoring tool reported an unparseable MRR@10 value {raw:?}")]
    InvalidMetric { raw: String },

    #[error("scoring tool timed out after {secs} seconds")]
    Timeout { secs: u64 },
}

impl From<CommandError> for ScoringToolError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Empty => ScoringToolError::EmptyCommand,
            CommandError::Spawn { program, source } | CommandError::Wait { program, source } => {
                ScoringToolError::Spawn { program, source }
            }
            CommandError::Timeout { secs, .. } => ScoringToolError::Timeout { secs },
        }
    }
}

/// Computes MRR@10 of a run against a judgments (qrels) file.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, run: &Path, judgments: &Path) -> Result<f64, ScoringToolError>;
}

/// Scorer backed by an external evaluation executable.
///
/// Invoked as `<command...> <judgments> <run>`; expected to print
/// `MRR @10: <decimal>` and exit 0.
#[derive(Debug, Clone)]
pub struct CommandScorer {
    tool: ToolCommand,
}

impl CommandScorer {
    pub fn new(tool: ToolCommand) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> &ToolCommand {
        &self.tool
    }
}

#[async_trait]
impl Scorer for CommandScorer {
    async fn score(&self, run: &Path, judgments: &Path) -> Result<f64, ScoringToolError> {
        let output = ToolRunner::execute(&self.tool, &[judgments, run]).await?;

        if !output.passed() {
            return Err(ScoringToolError::NonZeroExit {
                code: output.exit_code,
                stderr: excerpt(&output.stderr),
            });
        }

        tracing::debug!(
            program = %output.program,
            duration_ms = output.duration_ms,
            "Scoring tool finished"
        );
        parse_mrr_at_10(&output.stdout)
    }
}

fn mrr_pattern() -> &'static Regex {
    static MRR: OnceLock<Regex> = OnceLock::new();
    MRR.get_or_init(|| Regex::new(r"MRR @10: ([0-9.eE+-]+)").expect("static regex"))
}

/// Extract the MRR@10 value from the evaluation script's output.
pub fn parse_mrr_at_10(output: &str) -> Result<f64, ScoringToolError> {
    let caps = mrr_pattern()
        .captures(output)
        .ok_or_else(|| ScoringToolError::MetricNotFound {
            excerpt: excerpt(output),
        })?;

    let raw = &caps[1];
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ScoringToolError::InvalidMetric {
            raw: raw.to_string(),
        }),
    }
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(EXCERPT_CHARS) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
