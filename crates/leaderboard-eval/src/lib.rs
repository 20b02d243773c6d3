//! Leaderboard Eval - submission validation and scoring
//!
//! Provides the evaluation pipeline that:
//! - Unpacks encrypted submissions when the private key is present
//! - Resolves and sanity checks the dev and test run files
//! - Scores each run with the external MRR@10 evaluation tool
//! - Builds the leaderboard record from the scores and metadata

pub mod config;
pub mod fakes;
pub mod pipeline;
pub mod resolver;
pub mod run_file;
pub mod runner;
pub mod scorer;
pub mod unpack;
pub mod validator;

// Re-export key types
pub use config::PipelineConfig;
pub use pipeline::{Pipeline, PipelineError, PipelineReport};
pub use resolver::{ResolveError, SubmissionResolver};
pub use run_file::{Compression, RunFileError, RunFileReader};
pub use runner::{CommandError, CommandOutput, ToolCommand, ToolRunner};
pub use scorer::{parse_mrr_at_10, CommandScorer, Scorer, ScoringToolError};
pub use unpack::{UnpackError, Unpacker};
pub use validator::{FormatValidator, FormatWarning, ValidationReport, HITS_PER_QUERY};
