//! Unpacking of encrypted submissions.
//!
//! Decryption is done by an external tool. When the private key is present
//! the tool is run with the submission id before any artifact is resolved.

use std::path::Path;

use leaderboard_core::SubmissionId;

use crate::runner::{CommandError, ToolCommand, ToolRunner};

/// Default unpack command, run from the leaderboard root.
pub const DEFAULT_UNPACK_COMMAND: &str = "eval/unpack.sh";

#[derive(Debug, thiserror::Error)]
pub enum UnpackError {
    #[error("unpack tool failed to run: {0}")]
    Command(#[from] CommandError),

    #[error("unpack tool exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

/// Runs the external unpack tool when a private key is available.
#[derive(Debug, Clone)]
pub struct Unpacker {
    tool: ToolCommand,
}

impl Unpacker {
    pub fn new(tool: ToolCommand) -> Self {
        Self { tool }
    }

    /// Unpack `id` if `private_key` exists. Returns whether the tool ran.
    pub async fn unpack_if_keyed(
        &self,
        private_key: &Path,
        id: &SubmissionId,
    ) -> Result<bool, UnpackError> {
        if !private_key.is_file() {
            tracing::info!(
                key = %private_key.display(),
                "Private key not found, assuming unencrypted files exist"
            );
            return Ok(false);
        }

        tracing::info!(key = %private_key.display(), "Private key found, unpacking submission");
        let output = ToolRunner::execute(&self.tool, &[Path::new(id.as_str())]).await?;
        if !output.passed() {
            return Err(UnpackError::NonZeroExit {
                code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        for line in output.stdout.lines().filter(|l| !l.trim().is_empty()) {
            tracing::info!(tool = %output.program, "{line}");
        }
        Ok(true)
    }
}
