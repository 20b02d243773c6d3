//! Contract tests for the leaderboard row consumed by the leaderboard table.

use leaderboard_core::{
    format_score, LeaderboardRecord, Metadata, PhaseOutcome, RecordBuilder, RecordError,
    SubmissionId, RECORD_FIELD_COUNT,
};
use serde_json::json;

fn metadata(embargoed: bool) -> Metadata {
    let mut v = json!({
        "model_description": "DeepCT + \"doc2query\" expansion",
        "team": "Team \"Rocket\"",
        "paper": "https://example.org/paper.pdf",
        "code": "https://example.org/code",
        "type": "full ranking"
    });
    if embargoed {
        v["embargo_until"] = json!("2021-12-31");
    }
    serde_json::from_value(v).expect("metadata")
}

fn build(id: &str, meta: &Metadata, dev: f64, test: Option<f64>) -> LeaderboardRecord {
    let test = match test {
        Some(v) => PhaseOutcome::Scored { mrr_at_10: v },
        None => PhaseOutcome::Skipped {
            reason: "judgments unavailable".to_string(),
        },
    };
    RecordBuilder::build(
        &SubmissionId::new(id),
        meta,
        &PhaseOutcome::Scored { mrr_at_10: dev },
        &test,
    )
    .expect("record")
}

/// The consumer splits on commas, so the field count only holds when the
/// quoted fields themselves contain no commas.
#[test]
fn record_has_eleven_fields_in_order() {
    let record = build("20190101-run", &metadata(false), 0.3, Some(0.29));
    let fields = record.fields();
    assert_eq!(fields.len(), RECORD_FIELD_COUNT);
    assert_eq!(fields[0], "20190101-run");
    assert_eq!(fields[1], "");
    assert_eq!(fields[6], "full ranking");
    assert_eq!(fields[7], "2019/01/01");
    assert_eq!(fields[8], "0.290");
    assert_eq!(fields[9], "0.300");
    assert_eq!(fields[10], "");
    assert_eq!(record.to_csv_line().split(',').count(), RECORD_FIELD_COUNT);
}

#[test]
fn display_matches_csv_line() {
    let record = build("20190101-run", &metadata(false), 0.3, None);
    assert_eq!(record.to_string(), record.to_csv_line());
}

#[test]
fn date_is_recovered_for_every_valid_prefix() {
    let cases = [
        ("20181026-bm25", "2018/10/26"),
        ("20200229-leap", "2020/02/29"),
        ("20211231-end-of-year", "2021/12/31"),
        ("19991009-x", "1999/10/09"),
    ];
    for (id, expected) in cases {
        let record = build(id, &metadata(false), 0.1, None);
        assert_eq!(record.date(), expected, "date for {id}");
    }
}

#[test]
fn identifiers_without_date_prefix_are_rejected() {
    for id in ["bm25", "2018-10-26-bm25", "181026-bm25", "run-20181026-"] {
        let err = RecordBuilder::build(
            &SubmissionId::new(id),
            &metadata(false),
            &PhaseOutcome::Scored { mrr_at_10: 0.1 },
            &PhaseOutcome::Scored { mrr_at_10: 0.1 },
        )
        .unwrap_err();
        assert!(
            matches!(err, RecordError::MalformedIdentifier { ref id } if !id.is_empty()),
            "{id} should be malformed"
        );
    }
}

#[test]
fn embargoed_metadata_never_leaks() {
    let meta = metadata(true);
    let record = build("20210615-hidden", &meta, 0.41, Some(0.4));
    let line = record.to_csv_line();

    for original in [&meta.model_description, &meta.team, &meta.paper, &meta.code] {
        let original = original.as_deref().expect("fixture field");
        assert!(
            !line.contains(original),
            "record leaked {original:?}: {line}"
        );
    }
    assert_eq!(record.description(), "\"Anonymous\"");
    assert_eq!(record.team(), "\"Anonymous\"");
    assert_eq!(record.paper(), "");
    assert_eq!(record.code(), "");
}

#[test]
fn public_metadata_is_quoted_and_escaped() {
    let record = build("20210615-public", &metadata(false), 0.41, Some(0.4));
    assert_eq!(
        record.description(),
        r#""DeepCT + \"doc2query\" expansion""#
    );
    assert_eq!(record.team(), r#""Team \"Rocket\"""#);
    assert_eq!(record.paper(), "https://example.org/paper.pdf");
}

#[test]
fn scores_are_fixed_three_decimals() {
    let record = build("20210615-baseline", &metadata(false), 0.33333, Some(0.5));
    assert_eq!(record.dev_score(), "0.333");
    assert_eq!(record.test_score(), "0.500");
    assert_eq!(format_score(0.333), "0.333");
}

#[test]
fn baseline_scenario_without_test_judgments() {
    let record = build("20210615-baseline", &metadata(false), 0.187, None);
    assert_eq!(record.date(), "2021/06/15");
    assert_eq!(record.dev_score(), "0.187");
    assert_eq!(record.test_score(), "");
}

#[test]
fn public_metadata_with_only_type_is_rejected() {
    let meta: Metadata = serde_json::from_value(json!({"type": "full ranking"})).expect("metadata");
    let err = RecordBuilder::build(
        &SubmissionId::new("20210615-x"),
        &meta,
        &PhaseOutcome::Scored { mrr_at_10: 0.3 },
        &PhaseOutcome::Scored { mrr_at_10: 0.3 },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RecordError::MissingMetadataField { field: "model_description", .. }
    ));
    assert!(err.to_string().contains("20210615-x"));
}
