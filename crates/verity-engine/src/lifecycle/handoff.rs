//! AI suggestion handoff and the approve-or-edit protocol.
//!
//! Responsibility is decided by the effective diff: approving a suggestion
//! with zero content changes yields `ai`; any change, including an appended
//! source, edits the suggestion in place and yields `org`.

use verity_core::errors::{VerityError, VerityResult};
use verity_core::models::verdict::{validate_explanation, validate_sources};
use verity_core::models::{
    ActivityType, AiOutput, AiSuggestion, ApprovalOutcome, ApprovalStatus, ClaimStatus, Principal,
    SuggestionAuthor, SuggestionEdits, SuggestionRevision, Verdict,
};
use verity_core::traits::SuggestionSource;
use verity_storage::queries::{claims as claims_q, suggestions as suggestions_q, verdicts as verdicts_q};
use verity_storage::to_micros;

use super::{check_assignment, check_transition, expect_one, load_claim, new_id, verdict_stamp};
use crate::engine::VerityEngine;
use crate::points::credit;

impl VerityEngine {
    /// Move a pending claim to `ai_processing`, ask `source`, and record the
    /// answer. The collaborator runs outside any transaction.
    ///
    /// Returns the claim's status afterwards. A suggestion that arrives after
    /// a human already finalized the claim is dropped.
    pub fn dispatch_to_ai(
        &self,
        claim_id: &str,
        source: &dyn SuggestionSource,
    ) -> VerityResult<ClaimStatus> {
        let _span = crate::lifecycle_span!("dispatch_to_ai", claim_id).entered();
        let now = self.now();
        let claim = self.db().with_transaction(|tx| {
            let mut claim = load_claim(tx, claim_id)?;
            check_transition(&claim, ClaimStatus::AiProcessing)?;
            let changed = claims_q::transition_status(
                tx,
                claim_id,
                claim.status,
                ClaimStatus::AiProcessing,
                to_micros(now),
            )?;
            expect_one(changed, &claim, "dispatch")?;
            claim.status = ClaimStatus::AiProcessing;
            Ok::<_, VerityError>(claim)
        })?;
        tracing::info!(to = %ClaimStatus::AiProcessing, "claim dispatched to AI");

        let answer = match source.suggest(&claim) {
            Some(output) => match output.validate() {
                Ok(()) => Some(output),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding malformed AI suggestion");
                    None
                }
            },
            None => None,
        };

        let recorded = match answer {
            Some(output) => self.record_suggestion(claim_id, output).map(|_| ()),
            None => self.record_no_suggestion(claim_id),
        };
        match recorded {
            Ok(()) => {}
            Err(VerityError::AlreadyFinalized { .. }) => {
                tracing::debug!("claim finalized while the AI was working");
            }
            Err(e) => return Err(e),
        }
        Ok(self.get_claim(claim_id)?.status)
    }

    /// Attach the AI collaborator's suggestion and move the claim to
    /// `ai_approved`. Returns the suggestion id.
    pub fn record_suggestion(&self, claim_id: &str, output: AiOutput) -> VerityResult<String> {
        let _span = crate::lifecycle_span!("record_suggestion", claim_id).entered();
        output.validate()?;
        let now = self.now();

        self.db().with_transaction(|tx| {
            let claim = load_claim(tx, claim_id)?;
            if claim.ai_suggestion_id.is_some() || suggestions_q::get_by_claim(tx, claim_id)?.is_some() {
                tracing::debug!("suggestion already recorded");
                return Err(VerityError::DuplicateSuggestion {
                    claim_id: claim_id.to_string(),
                });
            }
            check_transition(&claim, ClaimStatus::AiApproved)?;

            let suggestion = AiSuggestion {
                id: new_id(),
                claim_id: claim_id.to_string(),
                verdict: output.verdict,
                confidence: output.confidence,
                explanation: output.explanation.clone(),
                sources: output.sources.clone(),
                edited_by_human: false,
                edited_by: None,
                edited_at: None,
                created_at: now,
            };
            suggestions_q::insert_suggestion(tx, &suggestion)?;
            suggestions_q::insert_revision(
                tx,
                &SuggestionRevision {
                    suggestion_id: suggestion.id.clone(),
                    revision: 0,
                    author: SuggestionAuthor::Ai,
                    content: output.clone(),
                    created_at: now,
                },
            )?;
            let changed =
                claims_q::attach_suggestion(tx, claim_id, claim.status, &suggestion.id, to_micros(now))?;
            expect_one(changed, &claim, "attach suggestion")?;

            tracing::info!(
                suggestion_id = %suggestion.id,
                confidence = output.confidence,
                from = %claim.status,
                to = %ClaimStatus::AiApproved,
                "AI suggestion recorded"
            );
            Ok(suggestion.id)
        })
    }

    /// The AI answered with nothing usable: queue the claim for a human.
    pub fn record_no_suggestion(&self, claim_id: &str) -> VerityResult<()> {
        let _span = crate::lifecycle_span!("record_no_suggestion", claim_id).entered();
        let now = self.now();
        self.db().with_transaction(|tx| {
            let claim = load_claim(tx, claim_id)?;
            check_transition(&claim, ClaimStatus::HumanReview)?;
            let changed = claims_q::transition_status(
                tx,
                claim_id,
                claim.status,
                ClaimStatus::HumanReview,
                to_micros(now),
            )?;
            expect_one(changed, &claim, "queue for review")?;
            tracing::info!(from = %claim.status, to = %ClaimStatus::HumanReview, "no AI suggestion");
            Ok(())
        })
    }

    /// Dispose of the claim's AI suggestion and write the final verdict.
    ///
    /// `approved = true` with no effective edits keeps the AI's content and
    /// attributes the verdict to the AI. Any effective edit mutates the
    /// suggestion in place and attributes the verdict to the organization.
    /// Declining (`approved = false`) requires an effective edit.
    pub fn approve_or_edit_ai_suggestion(
        &self,
        principal: &Principal,
        claim_id: &str,
        approved: bool,
        edits: Option<&SuggestionEdits>,
    ) -> VerityResult<ApprovalOutcome> {
        let _span = crate::lifecycle_span!("approve_or_edit", claim_id).entered();
        principal.require_reviewer()?;
        let now = self.now();
        let points_config = &self.config().points;

        self.db().with_transaction(|tx| {
            let claim = load_claim(tx, claim_id)?;
            if claim.status.is_terminal() {
                tracing::debug!(status = %claim.status, "approval on a finalized claim");
                return Err(VerityError::already_finalized(claim_id));
            }
            let suggestion = suggestions_q::get_by_claim(tx, claim_id)?
                .ok_or_else(|| VerityError::not_found("ai_suggestion", claim_id))?;
            check_assignment(&claim, principal)?;
            check_transition(&claim, ClaimStatus::HumanApproved)?;

            let current = suggestion.content();
            let edited = edits.and_then(|e| e.apply(&current));
            if !approved && edited.is_none() {
                return Err(VerityError::validation(
                    "approved",
                    "declining a suggestion requires an edit or an independent verdict",
                ));
            }

            let (content, approval_status) = match edited {
                Some(next) => {
                    validate_explanation(&next.explanation)?;
                    validate_sources(&next.sources)?;
                    let changed = suggestions_q::apply_edit(
                        tx,
                        &suggestion.id,
                        &next,
                        &principal.user_id,
                        to_micros(now),
                    )?;
                    if changed != 1 {
                        return Err(VerityError::Conflict {
                            reason: format!("suggestion {} was already edited", suggestion.id),
                        });
                    }
                    let revision = suggestions_q::next_revision(tx, &suggestion.id)?;
                    suggestions_q::insert_revision(
                        tx,
                        &SuggestionRevision {
                            suggestion_id: suggestion.id.clone(),
                            revision,
                            author: SuggestionAuthor::Human(principal.user_id.clone()),
                            content: next.clone(),
                            created_at: now,
                        },
                    )?;
                    (next, ApprovalStatus::Edited)
                }
                None => (current, ApprovalStatus::Approved),
            };

            let verdict = Verdict {
                id: new_id(),
                claim_id: claim_id.to_string(),
                fact_checker_id: principal.user_id.clone(),
                verdict: content.verdict,
                explanation: content.explanation,
                sources: content.sources,
                ai_suggestion_id: Some(suggestion.id.clone()),
                responsibility: approval_status.responsibility(),
                is_final: true,
                approval_status,
                time_spent_secs: 0,
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
                responsibility = %verdict.responsibility,
                approval = %approval_status,
                from = %claim.status,
                to = %ClaimStatus::HumanApproved,
                "suggestion disposed"
            );
            Ok(ApprovalOutcome {
                verdict_id: verdict.id,
                responsibility: verdict.responsibility,
            })
        })
    }

    /// Every version of the claim's suggestion, oldest first.
    pub fn suggestion_history(&self, claim_id: &str) -> VerityResult<Vec<SuggestionRevision>> {
        self.db().with_reader(|conn| {
            let suggestion = suggestions_q::get_by_claim(conn, claim_id)?
                .ok_or_else(|| VerityError::not_found("ai_suggestion", claim_id))?;
            Ok(suggestions_q::list_revisions(conn, &suggestion.id)?)
        })
    }
}
