//! Domain-level error taxonomy for leaderboard records.

use std::path::PathBuf;

/// Errors produced while building a leaderboard record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("malformed submission identifier {id:?}: expected a YYYYMMDD- date prefix")]
    MalformedIdentifier { id: String },

    #[error("submission identifier {id:?} carries an invalid date {raw}")]
    InvalidDate { id: String, raw: String },

    #[error("metadata for submission {id:?} is missing required field {field:?}")]
    MissingMetadataField { id: String, field: &'static str },
}

/// Errors produced while loading submission metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("failed to read metadata file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metadata JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
