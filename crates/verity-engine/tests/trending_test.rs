//! Trending selection, decayed scores, and admin curation.

mod common;

use chrono::Duration;
use verity_core::errors::VerityError;
use verity_core::models::{NewVerdict, Principal, VerdictLabel};
use verity_engine::VerityEngine;

use common::{engine, submit};

fn resolve(engine: &VerityEngine, claim_id: &str) {
    engine
        .submit_verdict(
            &Principal::fact_checker("carol"),
            claim_id,
            &NewVerdict {
                verdict: VerdictLabel::False,
                explanation: "Contradicted by the record.".into(),
                sources: vec![],
                time_spent_secs: 10,
            },
        )
        .unwrap();
}

/// Submit `text` from `times` distinct users.
fn submit_n(engine: &VerityEngine, text: &str, times: usize) -> String {
    let id = submit(engine, "user-0", text);
    for n in 1..times {
        assert_eq!(submit(engine, &format!("user-{n}"), text), id);
    }
    id
}

#[test]
fn falls_back_to_recent_claims() {
    let (engine, clock) = engine();
    let old = submit(&engine, "alice", "Old claim");
    clock.advance(Duration::minutes(1));
    let new = submit(&engine, "alice", "New claim");
    clock.advance(Duration::minutes(1));
    let spam = submit(&engine, "alice", "Spam claim");
    engine.reject_claim(&Principal::admin("root"), &spam, "spam").unwrap();

    let ids: Vec<String> = engine
        .trending_claims(10)
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, [new, old]);
    assert!(engine.trending_claims(0).unwrap().is_empty());
}

#[test]
fn single_submission_resolved_claims_do_not_trend() {
    let (engine, clock) = engine();
    let lone = submit(&engine, "alice", "Lone claim");
    resolve(&engine, &lone);
    clock.advance(Duration::minutes(1));
    let popular = submit_n(&engine, "Popular claim", 2);
    resolve(&engine, &popular);

    let trending = engine.trending_claims(10).unwrap();
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0].id, popular);
}

#[test]
fn refresh_flags_hot_claims_and_flags_stick() {
    let (engine, clock) = engine();
    let hot = submit_n(&engine, "Hot claim", 4);
    resolve(&engine, &hot);
    let unresolved = submit_n(&engine, "Unresolved claim", 6);

    assert_eq!(engine.refresh_trending().unwrap(), 1);
    let claim = engine.get_claim(&hot).unwrap();
    assert!(claim.is_trending);
    assert!((claim.trending_score.unwrap() - 4.0).abs() < 1e-9);
    assert!(!engine.get_claim(&unresolved).unwrap().is_trending);

    clock.advance(Duration::hours(96));
    assert_eq!(engine.refresh_trending().unwrap(), 1);
    let decayed = engine.get_claim(&hot).unwrap();
    assert!(decayed.is_trending, "refresh never clears a flag");
    assert!((decayed.trending_score.unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn below_minimum_submissions_never_flags() {
    let (engine, _) = engine();
    let id = submit_n(&engine, "Twice", 2);
    resolve(&engine, &id);
    assert_eq!(engine.refresh_trending().unwrap(), 0);
    let claim = engine.get_claim(&id).unwrap();
    assert!(!claim.is_trending);
    assert!(claim.trending_score.is_some());
}

#[test]
fn flagged_claim_outranks_busier_one() {
    let (engine, clock) = engine();
    let flagged = submit_n(&engine, "Curated claim", 2);
    resolve(&engine, &flagged);
    clock.advance(Duration::minutes(1));
    let busy = submit_n(&engine, "Busy claim", 5);
    resolve(&engine, &busy);

    engine
        .flag_trending(&Principal::admin("root"), &flagged, true)
        .unwrap();
    let ids: Vec<String> = engine
        .trending_claims(10)
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, [flagged.clone(), busy.clone()]);

    engine
        .flag_trending(&Principal::admin("root"), &flagged, false)
        .unwrap();
    let first = &engine.trending_claims(1).unwrap()[0];
    assert_eq!(first.id, busy);
}

#[test]
fn flag_trending_is_admin_only() {
    let (engine, _) = engine();
    let id = submit(&engine, "alice", "Claim text");
    assert!(matches!(
        engine.flag_trending(&Principal::fact_checker("carol"), &id, true),
        Err(VerityError::Forbidden { .. })
    ));
    assert!(matches!(
        engine.flag_trending(&Principal::admin("root"), "missing", true),
        Err(VerityError::NotFound { .. })
    ));
    assert!(!engine.get_claim(&id).unwrap().is_trending);
}
