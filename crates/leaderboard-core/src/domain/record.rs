//! Leaderboard record construction.
//!
//! The leaderboard table is appended to by hand from a single line of
//! comma-joined fields, so the field order and quoting rules here are a
//! contract with the table consumer:
//!
//! ```text
//! id,rank,description,team,paper,code,type,YYYY/MM/DD,test,dev,reference
//! ```

use serde::Serialize;
use std::fmt;

use crate::domain::error::RecordError;
use crate::domain::metadata::Metadata;
use crate::domain::score::PhaseOutcome;
use crate::domain::submission::SubmissionId;

/// Placeholder for description and team of embargoed submissions.
pub const ANONYMOUS: &str = "Anonymous";

/// Number of fields in a leaderboard row.
pub const RECORD_FIELD_COUNT: usize = 11;

/// One immutable leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardRecord {
    id: String,
    rank_marker: String,
    description: String,
    team: String,
    paper: String,
    code: String,
    submission_type: String,
    date: String,
    test_score: String,
    dev_score: String,
    reference_id: String,
}

impl LeaderboardRecord {
    /// Fields in leaderboard column order.
    pub fn fields(&self) -> [&str; RECORD_FIELD_COUNT] {
        [
            self.id.as_str(),
            self.rank_marker.as_str(),
            self.description.as_str(),
            self.team.as_str(),
            self.paper.as_str(),
            self.code.as_str(),
            self.submission_type.as_str(),
            self.date.as_str(),
            self.test_score.as_str(),
            self.dev_score.as_str(),
            self.reference_id.as_str(),
        ]
    }

    pub fn to_csv_line(&self) -> String {
        self.fields().join(",")
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Quoted description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Quoted team name.
    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn paper(&self) -> &str {
        &self.paper
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// `YYYY/MM/DD`
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn test_score(&self) -> &str {
        &self.test_score
    }

    pub fn dev_score(&self) -> &str {
        &self.dev_score
    }
}

impl fmt::Display for LeaderboardRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_csv_line())
    }
}

/// Builds leaderboard rows from a submission's identity, metadata and scores.
pub struct RecordBuilder;

impl RecordBuilder {
    /// Assemble the leaderboard row.
    ///
    /// Embargoed metadata is anonymized before any field is rendered, so the
    /// original description, team, paper and code never reach the record.
    pub fn build(
        id: &SubmissionId,
        metadata: &Metadata,
        dev: &PhaseOutcome,
        test: &PhaseOutcome,
    ) -> Result<LeaderboardRecord, RecordError> {
        let date = id.date()?;

        let (description, team, paper, code) = if metadata.is_embargoed() {
            (quote(ANONYMOUS), quote(ANONYMOUS), String::new(), String::new())
        } else {
            let required = |field: &'static str, value: &Option<String>| {
                value
                    .clone()
                    .ok_or_else(|| RecordError::MissingMetadataField {
                        id: id.as_str().to_string(),
                        field,
                    })
            };
            (
                quote(&required("model_description", &metadata.model_description)?),
                quote(&required("team", &metadata.team)?),
                required("paper", &metadata.paper)?,
                required("code", &metadata.code)?,
            )
        };

        Ok(LeaderboardRecord {
            id: id.as_str().to_string(),
            // rank glyphs (e.g. the SOTA trophy) are added by the maintainers
            rank_marker: String::new(),
            description,
            team,
            paper,
            code,
            submission_type: metadata.submission_type.clone(),
            date: date.format("%Y/%m/%d").to_string(),
            test_score: test.render(),
            dev_score: dev.render(),
            reference_id: String::new(),
        })
    }
}

/// Wrap in literal double quotes, escaping embedded quotes as `\"`.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}
