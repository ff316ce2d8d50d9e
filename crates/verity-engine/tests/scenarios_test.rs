//! End-to-end flows across lifecycle, points, notifications, and stats.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use verity_core::errors::VerityError;
use verity_core::models::{
    ApprovalStatus, ClaimStatus, NewVerdict, Principal, Responsibility, SuggestionEdits,
    VerdictLabel,
};
use verity_core::VerityConfig;
use verity_engine::VerityEngine;

use common::{ai_output, engine, submit, suggested_claim};

#[test]
fn ai_suggestion_approved_as_is() {
    let (engine, _) = engine();
    let claim_id = submit(&engine, "alice", "The city budget doubled last year.");
    engine
        .record_suggestion(&claim_id, ai_output(VerdictLabel::False, 0.92))
        .unwrap();

    let queue = engine.get_pending_claims(&Default::default()).unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].status, ClaimStatus::AiApproved);
    assert_eq!(queue[0].ai_confidence, Some(0.92));

    let outcome = engine
        .approve_or_edit_ai_suggestion(&Principal::fact_checker("carol"), &claim_id, true, None)
        .unwrap();
    assert_eq!(outcome.responsibility, Responsibility::Ai);

    let claim = engine.get_claim(&claim_id).unwrap();
    assert_eq!(claim.status, ClaimStatus::HumanApproved);
    assert_eq!(claim.final_verdict_id.as_deref(), Some(outcome.verdict_id.as_str()));
    assert!(engine.get_pending_claims(&Default::default()).unwrap().is_empty());

    let unread = engine.get_unread_verdicts("alice").unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].responsibility, Responsibility::Ai);
}

#[test]
fn manual_verdict_without_ai() {
    let (engine, _) = engine();
    let claim_id = submit(&engine, "alice", "Vaccines contain microchips.");
    engine.record_no_suggestion(&claim_id).unwrap();
    assert_eq!(engine.get_claim(&claim_id).unwrap().status, ClaimStatus::HumanReview);

    let verdict_id = engine
        .submit_verdict(
            &Principal::fact_checker("carol"),
            &claim_id,
            &NewVerdict {
                verdict: VerdictLabel::False,
                explanation: "No such component exists in any approved vaccine.".into(),
                sources: vec!["https://health.example.org/ingredients".into()],
                time_spent_secs: 420,
            },
        )
        .unwrap();

    let verdict = engine.get_final_verdict(&claim_id).unwrap().unwrap();
    assert_eq!(verdict.id, verdict_id);
    assert_eq!(verdict.responsibility, Responsibility::Org);
    assert_eq!(verdict.approval_status, ApprovalStatus::Independent);
    assert!(verdict.ai_suggestion_id.is_none());
    assert!(verdict.is_final);
}

#[test]
fn fact_checker_stats() {
    let (engine, _) = engine();
    let carol = Principal::fact_checker("carol");

    // Agrees with the AI label.
    let agreed = suggested_claim(&engine, "alice", "One");
    engine
        .approve_or_edit_ai_suggestion(&carol, &agreed, true, None)
        .unwrap();
    // Overrides the AI label.
    let overridden = suggested_claim(&engine, "alice", "Two");
    let edits = SuggestionEdits {
        verdict: Some(VerdictLabel::True),
        ..Default::default()
    };
    engine
        .approve_or_edit_ai_suggestion(&carol, &overridden, true, Some(&edits))
        .unwrap();
    // Independent verdict; not counted for accuracy.
    let manual = submit(&engine, "alice", "Three");
    engine
        .submit_verdict(
            &carol,
            &manual,
            &NewVerdict {
                verdict: VerdictLabel::True,
                explanation: "Matches the published figures.".into(),
                sources: vec![],
                time_spent_secs: 300,
            },
        )
        .unwrap();
    // Still waiting.
    suggested_claim(&engine, "alice", "Four");

    let stats = engine.get_fact_checker_stats("carol").unwrap();
    assert_eq!(stats.total_verdicts, 3);
    assert_eq!(stats.pending_review, 1);
    assert!((stats.avg_time_spent_secs - 100.0).abs() < 1e-9);
    assert_eq!(stats.accuracy, Some(0.5));
    assert_eq!(stats.verdict_distribution.get(&VerdictLabel::True), Some(&2));
    assert_eq!(stats.verdict_distribution.get(&VerdictLabel::False), Some(&1));

    let idle = engine.get_fact_checker_stats("dave").unwrap();
    assert_eq!(idle.total_verdicts, 0);
    assert_eq!(idle.accuracy, None);
    assert_eq!(idle.pending_review, 1, "unassigned claims count for everyone");
}

#[test]
fn concurrent_approvals_finalize_once() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(
        VerityEngine::open(&dir.path().join("verity.db"), VerityConfig::default()).unwrap(),
    );
    let claim_id = suggested_claim(&engine, "alice", "Contested claim");

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = [VerdictLabel::True, VerdictLabel::Misleading]
        .into_iter()
        .zip(["carol", "dave"])
        .map(|(label, checker)| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            let claim_id = claim_id.clone();
            thread::spawn(move || {
                let edits = SuggestionEdits {
                    verdict: Some(label),
                    ..Default::default()
                };
                barrier.wait();
                engine.approve_or_edit_ai_suggestion(
                    &Principal::fact_checker(checker),
                    &claim_id,
                    true,
                    Some(&edits),
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let wins = results.iter().filter(|r| r.is_ok()).count();
    let finalized = results
        .iter()
        .filter(|r| matches!(r, Err(VerityError::AlreadyFinalized { .. })))
        .count();
    assert_eq!((wins, finalized), (1, 1), "{results:?}");

    let verdict = engine.get_final_verdict(&claim_id).unwrap().unwrap();
    assert_eq!(verdict.responsibility, Responsibility::Org);
    // Exactly one human revision landed on top of the AI output.
    assert_eq!(engine.suggestion_history(&claim_id).unwrap().len(), 2);
}
