//! External tool execution with captured output and a timeout.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Errors raised before a command produced an exit status.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("command is empty")]
    Empty,

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {secs} seconds")]
    Timeout { program: String, secs: u64 },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// An external command: executable, leading arguments, timeout and working
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    /// Executable followed by its leading arguments.
    pub command: Vec<String>,

    /// Timeout in seconds; 0 waits forever.
    pub timeout_secs: u64,

    /// Directory the command runs in (inherits the caller's when unset).
    pub working_dir: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(command: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            command,
            timeout_secs,
            working_dir: None,
        }
    }

    /// Parse a whitespace-separated command line such as
    /// `python eval/ms_marco_eval.py`.
    ///
    /// There is no shell quoting: every whitespace run separates arguments,
    /// so an executable or script whose path contains spaces cannot be
    /// expressed here. Build the command with [`ToolCommand::new`] instead.
    pub fn parse(command_line: &str, timeout_secs: u64) -> Self {
        Self::new(
            command_line.split_whitespace().map(str::to_string).collect(),
            timeout_secs,
        )
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    /// Program to spawn. Relative paths such as `eval/unpack.sh` are taken
    /// relative to the working directory and made absolute, since the child
    /// resolves its program after changing into that directory. Bare names
    /// go through `PATH`.
    pub fn resolve_program(&self) -> PathBuf {
        let program = Path::new(self.program());
        match &self.working_dir {
            Some(dir) if program.is_relative() && program.components().count() > 1 => {
                let joined = dir.join(program);
                match std::env::current_dir() {
                    Ok(cwd) => cwd.join(joined),
                    Err(_) => joined,
                }
            }
            _ => program.to_path_buf(),
        }
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub program: String,

    /// Exit code, -1 when terminated by a signal.
    pub exit_code: i32,

    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
    pub success: bool,
}

impl CommandOutput {
    /// Whether the command exited with status 0.
    pub fn passed(&self) -> bool {
        self.success && self.exit_code == 0
    }
}

/// Runs tool commands as child processes.
pub struct ToolRunner;

impl ToolRunner {
    /// Run `tool` with `args` appended and wait for it to finish.
    ///
    /// The child is killed if the timeout elapses.
    pub async fn execute(tool: &ToolCommand, args: &[&Path]) -> Result<CommandOutput, CommandError> {
        let start = Instant::now();

        let (exe, leading) = tool.command.split_first().ok_or(CommandError::Empty)?;

        let mut cmd = Command::new(tool.resolve_program());
        cmd.args(leading)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &tool.working_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(program = %exe, args = ?args, "Spawning tool");
        let child = cmd.spawn().map_err(|source| CommandError::Spawn {
            program: exe.clone(),
            source,
        })?;

        let waited = if tool.timeout_secs > 0 {
            tokio::time::timeout(
                Duration::from_secs(tool.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| CommandError::Timeout {
                program: exe.clone(),
                secs: tool.timeout_secs,
            })?
        } else {
            child.wait_with_output().await
        };
        let output = waited.map_err(|source| CommandError::Wait {
            program: exe.clone(),
            source,
        })?;

        Ok(CommandOutput {
            program: exe.clone(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
            success: output.status.success(),
        })
    }
}
