//! Leaderboard Core Library
//!
//! Domain types shared by the evaluation pipeline and the CLI:
//! - `SubmissionId` / `Submission`: identity and artifact layout of a submission
//! - `Metadata`: the team-provided `<id>-metadata.json`
//! - `PhaseOutcome` / `EvaluationResult`: per-split scores
//! - `LeaderboardRecord` / `RecordBuilder`: the 11-field leaderboard CSV row

pub mod domain;
pub mod obs;
pub mod telemetry;

pub use domain::{
    format_score, EvaluationResult, LeaderboardRecord, Metadata, MetadataError, PhaseOutcome,
    RecordBuilder, RecordError, Split, Submission, SubmissionId, ANONYMOUS, RECORD_FIELD_COUNT,
};
pub use telemetry::init_tracing;
