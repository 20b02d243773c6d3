//! Submission metadata (`<id>-metadata.json`).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::domain::error::MetadataError;

/// Team-provided description of a submission.
///
/// Unknown fields are ignored. Only `type` is mandatory when parsing: the
/// descriptive fields may be omitted by embargoed submissions, and their
/// presence on public submissions is checked when the record is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Submission type, e.g. `full ranking` or `reranking`.
    #[serde(rename = "type")]
    pub submission_type: String,

    /// Present (with any value, `null` included) when the submission is
    /// under embargo.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub embargo_until: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Metadata {
    /// Read and parse a metadata file.
    pub fn from_path(path: &Path) -> Result<Self, MetadataError> {
        let raw = std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| MetadataError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn is_embargoed(&self) -> bool {
        self.embargo_until.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn public_json() -> Value {
        json!({
            "model_description": "BM25 + BERT reranker",
            "team": "IR Lab",
            "paper": "https://arxiv.org/abs/1901.04085",
            "code": "https://github.com/example/bert-rerank",
            "type": "full ranking"
        })
    }

    #[test]
    fn test_parse_public_metadata() {
        let meta: Metadata = serde_json::from_value(public_json()).unwrap();
        assert_eq!(meta.team.as_deref(), Some("IR Lab"));
        assert_eq!(meta.submission_type, "full ranking");
        assert!(!meta.is_embargoed());
    }

    #[test]
    fn test_embargo_marker_with_date() {
        let mut v = public_json();
        v["embargo_until"] = json!("2021-09-01");
        let meta: Metadata = serde_json::from_value(v).unwrap();
        assert!(meta.is_embargoed());
    }

    #[test]
    fn test_embargo_marker_null_still_counts() {
        let mut v = public_json();
        v["embargo_until"] = Value::Null;
        let meta: Metadata = serde_json::from_value(v).unwrap();
        assert!(meta.is_embargoed());
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let err = serde_json::from_value::<Metadata>(json!({"team": "x"})).unwrap_err();
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn test_type_only_metadata_parses_but_is_incomplete() {
        let meta: Metadata = serde_json::from_value(json!({"type": "full ranking"})).unwrap();
        assert!(!meta.is_embargoed());
        assert!(meta.model_description.is_none());
        assert!(meta.code.is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let mut v = public_json();
        v["contact"] = json!("someone@example.com");
        assert!(serde_json::from_value::<Metadata>(v).is_ok());
    }

    #[test]
    fn test_from_path_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad-metadata.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = Metadata::from_path(&path).unwrap_err();
        assert!(matches!(err, MetadataError::Parse { .. }));
        assert!(err.to_string().contains("bad-metadata.json"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Metadata::from_path(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, MetadataError::Io { .. }));
    }
}
