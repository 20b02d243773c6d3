//! Domain models for leaderboard submissions.
//!
//! Canonical definitions for the core entities:
//! - `SubmissionId` / `Submission`: identity and on-disk artifacts
//! - `Metadata`: team-provided description of the submission
//! - `EvaluationResult`: dev/test MRR@10 outcomes
//! - `LeaderboardRecord`: the immutable leaderboard row

pub mod error;
pub mod metadata;
pub mod record;
pub mod score;
pub mod submission;

pub use error::{MetadataError, RecordError};
pub use metadata::Metadata;
pub use record::{LeaderboardRecord, RecordBuilder, ANONYMOUS, RECORD_FIELD_COUNT};
pub use score::{format_score, EvaluationResult, PhaseOutcome, Split};
pub use submission::{Submission, SubmissionId};
