//! Submission evaluation pipeline.
//!
//! Stages run strictly in order and the first fatal error stops the run:
//!
//! 1. unpack (only when the private key is present)
//! 2. resolve artifacts
//! 3. sanity check dev and test runs
//! 4. score dev, then test (each skipped when its judgments are absent)
//! 5. load metadata and, if requested, build the leaderboard record

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, Instrument};

use leaderboard_core::obs;
use leaderboard_core::{
    EvaluationResult, LeaderboardRecord, Metadata, MetadataError, PhaseOutcome, RecordBuilder,
    RecordError, Split, SubmissionId,
};

use crate::config::PipelineConfig;
use crate::resolver::{ResolveError, SubmissionResolver};
use crate::run_file::RunFileError;
use crate::scorer::{Scorer, ScoringToolError};
use crate::unpack::{UnpackError, Unpacker};
use crate::validator::{FormatValidator, ValidationReport};

/// Fatal pipeline failures. Each names the offending path or input.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Unpack(#[from] UnpackError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    RunFile(#[from] RunFileError),

    #[error("{split} evaluation failed: {source}")]
    Scoring {
        split: Split,
        #[source]
        source: ScoringToolError,
    },

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("run file check for {path} did not complete: {source}")]
    Validation {
        path: PathBuf,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl PipelineError {
    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Resolve(_) => 2,
            PipelineError::RunFile(RunFileError::UnsupportedFormat { .. }) => 3,
            PipelineError::RunFile(_) => 1,
            PipelineError::Scoring { .. } => 4,
            PipelineError::Metadata(_) | PipelineError::Record(_) => 5,
            PipelineError::Unpack(_) | PipelineError::Validation { .. } => 1,
        }
    }
}

/// Result of a complete pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub submission_id: SubmissionId,

    /// Whether the unpack tool ran.
    pub unpacked: bool,

    pub dev_validation: ValidationReport,
    pub test_validation: ValidationReport,
    pub evaluation: EvaluationResult,

    /// Present only when record generation was requested.
    pub record: Option<LeaderboardRecord>,

    pub duration_ms: u64,
}

impl PipelineReport {
    /// Number of run files that failed the sanity check.
    pub fn warning_count(&self) -> usize {
        [&self.dev_validation, &self.test_validation]
            .iter()
            .filter(|r| !r.is_consistent())
            .count()
    }
}

/// Submission evaluation orchestrator.
pub struct Pipeline;

impl Pipeline {
    /// Evaluate one submission end to end.
    pub async fn run(
        scorer: Arc<dyn Scorer>,
        config: &PipelineConfig,
    ) -> Result<PipelineReport, PipelineError> {
        let span = obs::submission_span(config.submission_id.as_str());
        Self::run_stages(scorer, config).instrument(span).await
    }

    async fn run_stages(
        scorer: Arc<dyn Scorer>,
        config: &PipelineConfig,
    ) -> Result<PipelineReport, PipelineError> {
        let start = Instant::now();
        let id = &config.submission_id;

        info!(submission_id = %id, "Processing submission");

        let root = std::fs::canonicalize(&config.root)
            .map_err(|_| ResolveError::MissingRoot(config.root.clone()))?;
        let config = config.clone().with_root(root);

        let unpacked = Unpacker::new(config.unpack_command())
            .unpack_if_keyed(&config.resolve(&config.private_key), id)
            .await?;

        let resolver = SubmissionResolver::new(
            config.resolve(&config.submissions_dir),
            config.run_extension.clone(),
        );
        let submission = resolver.resolve(id)?;

        let dev_validation = sanity_check_blocking(&submission.dev_run).await?;
        let test_validation = sanity_check_blocking(&submission.test_run).await?;

        info!("Proceeding to evaluate");
        let dev = score_split(
            scorer.as_ref(),
            Split::Dev,
            &submission.dev_run,
            config.qrels_for(Split::Dev),
        )
        .await?;
        let test = score_split(
            scorer.as_ref(),
            Split::Test,
            &submission.test_run,
            config.qrels_for(Split::Test),
        )
        .await?;

        let metadata = Metadata::from_path(&submission.metadata)?;

        let record = if config.generate_record {
            Some(RecordBuilder::build(id, &metadata, &dev, &test)?)
        } else {
            None
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        obs::emit_pipeline_finished(id.as_str(), duration_ms, record.is_some());

        Ok(PipelineReport {
            submission_id: id.clone(),
            unpacked,
            dev_validation,
            test_validation,
            evaluation: EvaluationResult { dev, test },
            record,
            duration_ms,
        })
    }
}

/// Decompress and count a run on the blocking pool, inside the caller's span.
async fn sanity_check_blocking(run: &Path) -> Result<ValidationReport, PipelineError> {
    let span = tracing::Span::current();
    let path = run.to_path_buf();
    let report = tokio::task::spawn_blocking(move || {
        span.in_scope(|| FormatValidator::sanity_check(&path))
    })
    .await
    .map_err(|source| PipelineError::Validation {
        path: run.to_path_buf(),
        source,
    })??;
    Ok(report)
}

/// Score one split, or skip it when its judgments are not on disk.
async fn score_split(
    scorer: &dyn Scorer,
    split: Split,
    run: &Path,
    qrels: PathBuf,
) -> Result<PhaseOutcome, PipelineError> {
    if !qrels.is_file() {
        let reason = format!("judgments {} not available", qrels.display());
        info!("{} qrels not available, skipping evaluation", split);
        obs::emit_phase_skipped(split, &reason);
        return Ok(PhaseOutcome::Skipped { reason });
    }

    obs::emit_phase_started(
        split,
        &run.display().to_string(),
        &qrels.display().to_string(),
    );
    let start = Instant::now();
    let mrr_at_10 = scorer
        .score(run, &qrels)
        .await
        .map_err(|source| PipelineError::Scoring { split, source })?;

    info!("{} run MRR@10: {}", split, mrr_at_10);
    obs::emit_phase_scored(split, mrr_at_10, start.elapsed().as_millis() as u64);
    Ok(PhaseOutcome::Scored { mrr_at_10 })
}
