//! Submission artifact resolution.

use std::path::{Path, PathBuf};

use leaderboard_core::{Submission, SubmissionId};

/// A submission is incomplete. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("leaderboard root {0} does not exist")]
    MissingRoot(PathBuf),

    #[error("submission directory {0} does not exist")]
    MissingSubmission(PathBuf),

    #[error("expected submission file {0} does not exist")]
    MissingArtifact(PathBuf),
}

/// Maps submission identifiers to their artifacts on disk.
#[derive(Debug, Clone)]
pub struct SubmissionResolver {
    submissions_dir: PathBuf,
    run_extension: String,
}

impl SubmissionResolver {
    pub fn new(submissions_dir: impl Into<PathBuf>, run_extension: impl Into<String>) -> Self {
        Self {
            submissions_dir: submissions_dir.into(),
            run_extension: run_extension.into(),
        }
    }

    pub fn submissions_dir(&self) -> &Path {
        &self.submissions_dir
    }

    /// Compute the artifact paths for `id` and verify all of them exist.
    pub fn resolve(&self, id: &SubmissionId) -> Result<Submission, ResolveError> {
        let submission = Submission::layout(&self.submissions_dir, id.clone(), &self.run_extension);

        tracing::info!(dir = %submission.base_dir.display(), "Submission directory");
        if !submission.base_dir.is_dir() {
            return Err(ResolveError::MissingSubmission(submission.base_dir));
        }
        tracing::info!("Verified: submission directory exists");

        if let Some(missing) = submission.artifacts().into_iter().find(|p| !p.is_file()) {
            return Err(ResolveError::MissingArtifact(missing.to_path_buf()));
        }
        tracing::info!("Verified: expected files appear in the submission directory");

        Ok(submission)
    }
}
