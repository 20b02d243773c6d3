//! Log setup for `lbeval`.
//!
//! Stdout belongs to the evaluation output: the leaderboard CSV line between
//! its banners and the optional JSON report. Everything the pipeline logs on
//! the way (verification messages, run statistics, format warnings, scores)
//! goes to stderr, so `lbeval --generate-csv > entry.txt` captures the row
//! and nothing else.

use std::io;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr subscriber.
///
/// `RUST_LOG` takes precedence over `level`. With `json` set each event is
/// one JSON object per line. Calls after the first are ignored.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_target(false)
            .with_writer(io::stderr)
    });
    let text_layer = (!json).then(|| fmt::layer().with_target(false).with_writer(io::stderr));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init();
}
