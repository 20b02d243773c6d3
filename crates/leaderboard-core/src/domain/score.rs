//! Per-split evaluation outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query split a run file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    /// Public development queries.
    Dev,

    /// Held-out evaluation queries; judgments are usually withheld.
    Test,
}

impl Split {
    pub fn name(&self) -> &'static str {
        match self {
            Split::Dev => "dev",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of scoring one split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhaseOutcome {
    /// The scorer ran and reported MRR@10.
    Scored { mrr_at_10: f64 },

    /// The scorer was not invoked because the judgments are unavailable.
    Skipped { reason: String },
}

impl PhaseOutcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            PhaseOutcome::Scored { mrr_at_10 } => Some(*mrr_at_10),
            PhaseOutcome::Skipped { .. } => None,
        }
    }

    /// Leaderboard rendering: three fixed decimals, or empty when skipped.
    pub fn render(&self) -> String {
        self.score().map(format_score).unwrap_or_default()
    }
}

/// Dev and test outcomes of a single submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub dev: PhaseOutcome,
    pub test: PhaseOutcome,
}

/// Round to three decimals and render fixed-point, trailing zeros included.
pub fn format_score(value: f64) -> String {
    format!("{value:.3}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score_rounds_to_three_places() {
        assert_eq!(format_score(0.33333), "0.333");
        assert_eq!(format_score(0.3886), "0.389");
        assert_eq!(format_score(0.4), "0.400");
        assert_eq!(format_score(0.0), "0.000");
    }

    #[test]
    fn test_format_score_is_idempotent() {
        for raw in [0.187, 0.358, 0.42, 0.1, 0.999] {
            let once = format_score(raw);
            let twice = format_score(once.parse().unwrap());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_phase_outcome_render() {
        let scored = PhaseOutcome::Scored { mrr_at_10: 0.35891 };
        assert_eq!(scored.render(), "0.359");
        assert_eq!(scored.score(), Some(0.35891));

        let skipped = PhaseOutcome::Skipped {
            reason: "judgments unavailable".to_string(),
        };
        assert_eq!(skipped.render(), "");
        assert_eq!(skipped.score(), None);
    }

    #[test]
    fn test_phase_outcome_json_shape() {
        let v = serde_json::to_value(PhaseOutcome::Scored { mrr_at_10: 0.5 }).unwrap();
        assert_eq!(v["status"], "scored");
        assert_eq!(v["mrr_at_10"], 0.5);
    }

    #[test]
    fn test_split_names() {
        assert_eq!(Split::Dev.to_string(), "dev");
        assert_eq!(Split::Test.to_string(), "test");
    }
}
