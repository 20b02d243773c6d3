//! Leaderboard submission evaluator CLI
//!
//! The `lbeval` command checks a submission's run files, scores them with the
//! external MRR@10 evaluation tool and optionally prints the leaderboard line.
//!
//! ```text
//! lbeval --id 20210615-baseline --generate-csv
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, Level};

use leaderboard_core::SubmissionId;
use leaderboard_eval::scorer::{DEFAULT_SCORER_COMMAND, DEFAULT_SCORER_TIMEOUT_SECS};
use leaderboard_eval::{
    CommandScorer, Pipeline, PipelineConfig, PipelineError, PipelineReport, Scorer, ToolCommand,
};

const BANNER: &str = "############";

#[derive(Parser, Debug)]
#[command(name = "lbeval")]
#[command(author = "Leaderboard Maintainers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Evaluate a passage ranking leaderboard submission", long_about = None)]
struct Cli {
    /// Submission id, e.g. 20210615-baseline
    #[arg(long)]
    id: String,

    /// Print the leaderboard CSV line after scoring
    #[arg(long)]
    generate_csv: bool,

    /// Leaderboard repository root
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Scoring tool command; receives the qrels and run paths as arguments.
    /// Split on whitespace without shell quoting, so paths containing spaces
    /// are not supported
    #[arg(long, env = "LBEVAL_SCORER", default_value = DEFAULT_SCORER_COMMAND)]
    scorer: String,

    /// Scoring tool timeout in seconds (0 waits forever)
    #[arg(long, env = "LBEVAL_TIMEOUT_SECS", default_value_t = DEFAULT_SCORER_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Print the full evaluation report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(SubmissionId::new(self.id.as_str()))
            .with_root(&self.root)
            .with_record(self.generate_csv)
            .with_scorer(ToolCommand::parse(&self.scorer, self.timeout_secs))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    leaderboard_core::init_tracing(cli.log_json, level);

    let config = cli.pipeline_config();

    let outcome = evaluate(command_scorer(&config), &config).await.and_then(|report| {
        for line in render(&cli, &report)? {
            println!("{line}");
        }
        Ok(())
    });

    if let Err(err) = outcome {
        error!("{err:#}");
        std::process::exit(exit_code(&err));
    }
}

/// Subprocess scorer running from the leaderboard root.
fn command_scorer(config: &PipelineConfig) -> Arc<dyn Scorer> {
    Arc::new(CommandScorer::new(config.scorer_command()))
}

async fn evaluate(scorer: Arc<dyn Scorer>, config: &PipelineConfig) -> Result<PipelineReport> {
    let report = Pipeline::run(scorer, config)
        .await
        .with_context(|| format!("Failed to evaluate submission {}", config.submission_id))?;
    Ok(report)
}

/// Lines written to stdout for a finished run.
fn render(cli: &Cli, report: &PipelineReport) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    if let Some(record) = &report.record {
        lines.push(BANNER.to_string());
        lines.push(record.to_csv_line());
        lines.push(BANNER.to_string());
    }
    if cli.json {
        lines.push(serde_json::to_string_pretty(report).context("Failed to serialize report")?);
    }
    Ok(lines)
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<PipelineError>()
        .map(PipelineError::exit_code)
        .unwrap_or(1)
}
