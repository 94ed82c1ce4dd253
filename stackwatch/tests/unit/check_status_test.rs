//! CheckStatus/総合判定のUnit Test
//!
//! - ステータスの文字列表現とserde表現
//! - overall()の真理値表（FAIL > WARN > OK、排他的・網羅的）

use chrono::Utc;
use stackwatch_common::types::{CheckKind, CheckOutcome, CheckStatus, RunReport};

fn outcome(name: &str, status: CheckStatus) -> CheckOutcome {
    CheckOutcome::new(name, CheckKind::Liveness, status, "detail")
}

fn report(statuses: &[CheckStatus]) -> RunReport {
    let now = Utc::now();
    let outcomes = statuses
        .iter()
        .enumerate()
        .map(|(i, s)| outcome(&format!("check-{i}"), *s))
        .collect();
    RunReport::new(outcomes, now, now)
}

#[test]
fn test_check_status_as_str() {
    assert_eq!(CheckStatus::Ok.as_str(), "ok");
    assert_eq!(CheckStatus::Warn.as_str(), "warn");
    assert_eq!(CheckStatus::Fail.as_str(), "fail");
}

#[test]
fn test_check_status_from_str_roundtrip() {
    for status in [CheckStatus::Ok, CheckStatus::Warn, CheckStatus::Fail] {
        assert_eq!(status.as_str().parse::<CheckStatus>().unwrap(), status);
    }
}

#[test]
fn test_check_status_serialization() {
    let json = serde_json::to_string(&CheckStatus::Fail).unwrap();
    assert_eq!(json, "\"fail\"");

    let deserialized: CheckStatus = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, CheckStatus::Fail);
}

#[test]
fn test_overall_truth_table() {
    use CheckStatus::{Fail, Ok, Warn};

    // FAILは他のすべてに優先する
    assert_eq!(report(&[Ok, Warn, Fail]).overall(), Fail);
    assert_eq!(report(&[Fail, Ok, Ok]).overall(), Fail);
    assert_eq!(report(&[Fail, Fail, Fail]).overall(), Fail);

    // FAILなし + WARNあり → WARN
    assert_eq!(report(&[Ok, Warn]).overall(), Warn);
    assert_eq!(report(&[Warn, Warn]).overall(), Warn);

    // すべてOK → OK
    assert_eq!(report(&[Ok, Ok, Ok]).overall(), Ok);
}

#[test]
fn test_outcome_count_matches_input() {
    let statuses = [CheckStatus::Ok; 7];
    assert_eq!(report(&statuses).outcomes.len(), 7);
}
