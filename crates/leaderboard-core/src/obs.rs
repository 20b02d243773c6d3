//! Structured observability hooks for the evaluation pipeline.
//!
//! This module provides:
//! - A submission-scoped tracing span via [`submission_span`]
//! - Emission functions for pipeline lifecycle events: phase start, score,
//!   skip, format warning and finish
//!
//! Events are emitted at `info!` level, format warnings at `warn!`.

use tracing::{info, warn, Span};

use crate::domain::Split;

/// Span tagging every event of one submission's evaluation.
///
/// ```ignore
/// pipeline_future.instrument(submission_span("20210615-baseline")).await
/// ```
pub fn submission_span(submission_id: &str) -> Span {
    tracing::info_span!("leaderboard.submission", submission_id = %submission_id)
}

/// Emit event: scoring of a split started.
pub fn emit_phase_started(split: Split, run: &str, qrels: &str) {
    info!(event = "phase.started", split = %split, run = %run, qrels = %qrels);
}

/// Emit event: a split was scored.
pub fn emit_phase_scored(split: Split, mrr_at_10: f64, duration_ms: u64) {
    info!(
        event = "phase.scored",
        split = %split,
        mrr_at_10 = mrr_at_10,
        duration_ms = duration_ms,
    );
}

/// Emit event: a split was skipped because its judgments are unavailable.
pub fn emit_phase_skipped(split: Split, reason: &str) {
    info!(event = "phase.skipped", split = %split, reason = %reason);
}

/// Emit event: a run file failed the line/query-count sanity check.
pub fn emit_format_warning(run: &str, expected: usize, actual: usize) {
    warn!(
        event = "run.format_warning",
        run = %run,
        expected = expected,
        actual = actual,
    );
}

/// Emit event: pipeline finished.
pub fn emit_pipeline_finished(submission_id: &str, duration_ms: u64, record_emitted: bool) {
    info!(
        event = "pipeline.finished",
        submission_id = %submission_id,
        duration_ms = duration_ms,
        record_emitted = record_emitted,
    );
}
