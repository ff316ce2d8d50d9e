//! Independent verdicts, forced rejection, assignment, and priority.

use verity_core::errors::{VerityError, VerityResult};
use verity_core::models::{
    ActivityType, ApprovalStatus, ClaimStatus, NewVerdict, Principal, Priority, Verdict,
};
use verity_storage::queries::{claims as claims_q, verdicts as verdicts_q};
use verity_storage::to_micros;

use super::{check_assignment, check_transition, expect_one, load_claim, new_id, verdict_stamp};
use crate::engine::VerityEngine;
use crate::points::credit;

impl VerityEngine {
    /// Write an independent final verdict. No suggestion is linked, even if
    /// one exists, so responsibility is always `org`.
    pub fn submit_verdict(
        &self,
        principal: &Principal,
        claim_id: &str,
        input: &NewVerdict,
    ) -> VerityResult<String> {
        let _span = crate::lifecycle_span!("submit_verdict", claim_id).entered();
        principal.require_reviewer()?;
        input.validate()?;
        let now = self.now();
        let points_config = &self.config().points;

        self.db().with_transaction(|tx| {
            let claim = load_claim(tx, claim_id)?;
            check_transition(&claim, ClaimStatus::HumanApproved)?;
            check_assignment(&claim, principal)?;

            let approval_status = ApprovalStatus::Independent;
            let verdict = Verdict {
                id: new_id(),
                claim_id: claim_id.to_string(),
                fact_checker_id: principal.user_id.clone(),
                verdict: input.verdict,
                explanation: input.explanation.clone(),
                sources: input.sources.clone(),
                ai_suggestion_id: None,
                responsibility: approval_status.responsibility(),
                is_final: true,
                approval_status,
                time_spent_secs: input.time_spent_secs,
                created_at: verdict_stamp(tx, &claim, now)?,
            };
            verdicts_q::insert_verdict(tx, &verdict)?;
            let changed = claims_q::finalize(
                tx,
                claim_id,
                claim.status,
                &verdict.id,
                &principal.user_id,
                to_micros(now),
            )?;
            expect_one(changed, &claim, "finalize")?;

            credit(
                tx,
                points_config,
                &principal.user_id,
                points_config.verdict_submitted,
                ActivityType::VerdictSubmitted,
                &format!("verdict on claim {claim_id}"),
                now,
            )?;

            tracing::info!(
                verdict_id = %verdict.id,
                label = %verdict.verdict,
                from = %claim.status,
                to = %ClaimStatus::HumanApproved,
                "independent verdict recorded"
            );
            Ok(verdict.id)
        })
    }

    /// Admin-only forced rejection from any non-terminal state. No verdict
    /// is written.
    pub fn reject_claim(&self, principal: &Principal, claim_id: &str, reason: &str) -> VerityResult<()> {
        let _span = crate::lifecycle_span!("reject_claim", claim_id).entered();
        principal.require_admin()?;
        if reason.trim().is_empty() {
            return Err(VerityError::validation("reason", "must not be empty"));
        }
        let now = self.now();

        self.db().with_transaction(|tx| {
            let claim = load_claim(tx, claim_id)?;
            check_transition(&claim, ClaimStatus::Rejected)?;
            let changed = claims_q::transition_status(
                tx,
                claim_id,
                claim.status,
                ClaimStatus::Rejected,
                to_micros(now),
            )?;
            expect_one(changed, &claim, "reject")?;
            tracing::info!(
                admin = %principal.user_id,
                from = %claim.status,
                to = %ClaimStatus::Rejected,
                reason,
                "claim rejected"
            );
            Ok(())
        })
    }

    /// Take a non-terminal claim. Fails with `Conflict` when another
    /// fact-checker already holds it.
    pub fn assign_claim(&self, principal: &Principal, claim_id: &str) -> VerityResult<()> {
        let _span = crate::lifecycle_span!("assign_claim", claim_id).entered();
        principal.require_reviewer()?;
        let now = self.now();

        self.db().with_transaction(|tx| {
            let claim = load_claim(tx, claim_id)?;
            if claim.status.is_terminal() {
                return Err(VerityError::already_finalized(claim_id));
            }
            check_assignment(&claim, principal)?;
            let changed = claims_q::set_assignee(
                tx,
                claim_id,
                Some(principal.user_id.as_str()),
                to_micros(now),
            )?;
            expect_one(changed, &claim, "assign")?;
            tracing::info!(assignee = %principal.user_id, "claim assigned");
            Ok(())
        })
    }

    /// Re-prioritize a non-terminal claim.
    pub fn set_priority(
        &self,
        principal: &Principal,
        claim_id: &str,
        priority: Priority,
    ) -> VerityResult<()> {
        let _span = crate::lifecycle_span!("set_priority", claim_id).entered();
        principal.require_reviewer()?;
        let now = self.now();

        self.db().with_transaction(|tx| {
            let claim = load_claim(tx, claim_id)?;
            if claim.status.is_terminal() {
                return Err(VerityError::already_finalized(claim_id));
            }
            let changed = claims_q::set_priority(tx, claim_id, priority, to_micros(now))?;
            expect_one(changed, &claim, "set priority")?;
            tracing::info!(from = %claim.priority, to = %priority, "priority changed");
            Ok(())
        })
    }

    /// The claim's final verdict, if it has been resolved.
    ///
    /// More than one final verdict is an invariant breach and is reported
    /// as `Unrecoverable`.
    pub fn get_final_verdict(&self, claim_id: &str) -> VerityResult<Option<Verdict>> {
        self.db().with_reader(|conn| {
            load_claim(conn, claim_id)?;
            let mut finals = verdicts_q::final_verdicts_for_claim(conn, claim_id)?;
            if finals.len() > 1 {
                tracing::error!(claim_id, count = finals.len(), "multiple final verdicts");
                return Err(VerityError::Unrecoverable {
                    details: format!("claim {claim_id} has {} final verdicts", finals.len()),
                });
            }
            Ok(finals.pop())
        })
    }
}
