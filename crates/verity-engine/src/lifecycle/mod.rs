//! Claim state machine: submission, the AI handoff, and final verdicts.
//!
//! Every mutating operation loads the claim inside its `BEGIN IMMEDIATE`
//! transaction and re-checks the transition there, so a racing caller sees
//! the committed winner and fails cleanly.

pub mod handoff;
pub mod submission;
pub mod verdicts;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use verity_core::errors::{VerityError, VerityResult};
use verity_core::models::{Claim, ClaimStatus, Principal, Role};
use verity_storage::queries::{claims as claims_q, watermarks};
use verity_storage::{from_micros, to_micros};

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn load_claim(conn: &Connection, claim_id: &str) -> VerityResult<Claim> {
    claims_q::get_claim(conn, claim_id)?.ok_or_else(|| VerityError::not_found("claim", claim_id))
}

/// Creation time for a final verdict on `claim`: `now`, pushed to just past
/// the submitter's read watermark when the clock has not moved beyond it.
/// A new verdict therefore always starts unread.
pub(crate) fn verdict_stamp(
    conn: &Connection,
    claim: &Claim,
    now: DateTime<Utc>,
) -> VerityResult<DateTime<Utc>> {
    match watermarks::get_watermark(conn, &claim.submitter_id)? {
        Some(mark) if mark >= to_micros(now) => {
            tracing::debug!(watermark = mark, "verdict stamped past the read watermark");
            Ok(from_micros("verdicts", mark + 1)?)
        }
        _ => Ok(now),
    }
}

/// Check `claim.status -> to` against the transition table.
pub(crate) fn check_transition(claim: &Claim, to: ClaimStatus) -> VerityResult<()> {
    if claim.status.is_terminal() {
        return Err(VerityError::already_finalized(&claim.id));
    }
    if !claim.status.can_transition_to(to) {
        return Err(VerityError::InvalidTransition {
            claim_id: claim.id.clone(),
            from: claim.status,
            to,
        });
    }
    Ok(())
}

/// A claim held by another fact-checker is off limits, except to admins.
pub(crate) fn check_assignment(claim: &Claim, principal: &Principal) -> VerityResult<()> {
    match &claim.assigned_to {
        Some(holder) if *holder != principal.user_id && principal.role != Role::Admin => {
            Err(VerityError::Conflict {
                reason: format!("claim {} is assigned to {holder}", claim.id),
            })
        }
        _ => Ok(()),
    }
}

/// A compare-and-set update that matched no row lost a race inside the
/// transaction, which the status re-check should have ruled out.
pub(crate) fn expect_one(changed: usize, claim: &Claim, what: &str) -> VerityResult<()> {
    if changed == 1 {
        return Ok(());
    }
    tracing::error!(claim_id = %claim.id, what, changed, "claim update matched no row");
    Err(VerityError::Unrecoverable {
        details: format!("{what} on claim {} matched {changed} rows", claim.id),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use verity_core::models::{fingerprint, Category, Priority};

    use super::*;

    fn claim(status: ClaimStatus, assigned_to: Option<&str>) -> Claim {
        Claim {
            id: "c1".into(),
            submitter_id: "u".into(),
            text: "t".into(),
            text_fingerprint: fingerprint("t"),
            category: Category::Other,
            media_ref: None,
            status,
            priority: Priority::Medium,
            submission_count: 1,
            is_trending: false,
            trending_score: None,
            assigned_to: assigned_to.map(str::to_string),
            ai_suggestion_id: None,
            final_verdict_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn terminal_source_is_already_finalized() {
        let err = check_transition(&claim(ClaimStatus::Rejected, None), ClaimStatus::HumanApproved)
            .unwrap_err();
        assert!(matches!(err, VerityError::AlreadyFinalized { .. }));
    }

    #[test]
    fn disallowed_move_is_invalid_transition() {
        let err = check_transition(&claim(ClaimStatus::AiApproved, None), ClaimStatus::HumanReview)
            .unwrap_err();
        assert!(matches!(err, VerityError::InvalidTransition { .. }));
    }

    #[test]
    fn assignment_blocks_other_checkers_only() {
        let held = claim(ClaimStatus::HumanReview, Some("alice"));
        assert!(check_assignment(&held, &Principal::fact_checker("alice")).is_ok());
        assert!(check_assignment(&held, &Principal::admin("root")).is_ok());
        assert!(matches!(
            check_assignment(&held, &Principal::fact_checker("bob")),
            Err(VerityError::Conflict { .. })
        ));
    }
}
