use std::str::FromStr;

use chrono::NaiveDate;
use proptest::prelude::*;
use verity_core::models::*;

#[test]
fn enums_roundtrip_through_text() {
    for status in ClaimStatus::ALL {
        assert_eq!(ClaimStatus::from_str(status.as_str()).unwrap(), *status);
    }
    for label in VerdictLabel::ALL {
        assert_eq!(VerdictLabel::from_str(label.as_str()).unwrap(), *label);
    }
    for activity in ActivityType::ALL {
        assert_eq!(ActivityType::from_str(activity.as_str()).unwrap(), *activity);
    }
}

#[test]
fn unknown_enum_text_is_a_validation_error() {
    let err = Category::from_str("astrology").unwrap_err();
    assert_eq!(verity_core::ErrorCode::error_code(&err), "VALIDATION_ERROR");
}

#[test]
fn serde_uses_snake_case() {
    let json = serde_json::to_string(&ClaimStatus::HumanApproved).unwrap();
    assert_eq!(json, "\"human_approved\"");
    let label: VerdictLabel = serde_json::from_str("\"partially_true\"").unwrap();
    assert_eq!(label, VerdictLabel::PartiallyTrue);
}

#[test]
fn approval_status_decides_responsibility() {
    assert_eq!(ApprovalStatus::Approved.responsibility(), Responsibility::Ai);
    assert_eq!(ApprovalStatus::Edited.responsibility(), Responsibility::Org);
    assert_eq!(ApprovalStatus::Independent.responsibility(), Responsibility::Org);
}

#[test]
fn role_gates() {
    assert!(Principal::user("u").require_reviewer().is_err());
    assert!(Principal::fact_checker("f").require_reviewer().is_ok());
    assert!(Principal::fact_checker("f").require_admin().is_err());
    assert!(Principal::admin("a").require_admin().is_ok());
}

fn base_output() -> AiOutput {
    AiOutput {
        verdict: VerdictLabel::Misleading,
        confidence: 0.7,
        explanation: "Context omitted.".into(),
        sources: vec!["https://example.org/src".into()],
    }
}

fn label_strategy() -> impl Strategy<Value = VerdictLabel> {
    prop::sample::select(VerdictLabel::ALL.to_vec())
}

proptest! {
    #[test]
    fn consecutive_days_increment_by_one(start in 0i64..10_000, streak in 0u32..1000) {
        let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let last = base + chrono::Duration::days(start);
        let today = last + chrono::Duration::days(1);
        prop_assert_eq!(
            StreakStep::decide(Some(last), streak, today).new_streak(),
            Some(streak + 1)
        );
    }

    #[test]
    fn gaps_beyond_one_day_reset(start in 0i64..10_000, gap in 2i64..400, streak in 0u32..1000) {
        let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let last = base + chrono::Duration::days(start);
        let today = last + chrono::Duration::days(gap);
        prop_assert_eq!(StreakStep::decide(Some(last), streak, today), StreakStep::Reset);
    }

    #[test]
    fn changed_verdict_is_always_a_change(label in label_strategy()) {
        let current = base_output();
        let edits = SuggestionEdits { verdict: Some(label), ..Default::default() };
        prop_assert_eq!(edits.apply(&current).is_some(), label != current.verdict);
    }

    #[test]
    fn any_added_source_is_a_change(source in "[a-z]{1,20}") {
        let edits = SuggestionEdits { added_sources: vec![source], ..Default::default() };
        prop_assert!(edits.apply(&base_output()).is_some());
    }
}
