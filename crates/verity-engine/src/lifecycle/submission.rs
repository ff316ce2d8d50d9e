//! Claim intake, duplicate folding, and the review queue.

use verity_core::config::ClaimsConfig;
use verity_core::constants::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, MAX_SOURCE_LEN};
use verity_core::errors::{VerityError, VerityResult};
use verity_core::models::{
    fingerprint, ActivityType, Category, Claim, ClaimFilter, ClaimStatus, ClaimSummary, Priority,
};
use verity_storage::queries::claims as claims_q;
use verity_storage::to_micros;

use super::{load_claim, new_id};
use crate::engine::VerityEngine;
use crate::points::credit;

/// Priority after a duplicate brings the count to `count`. Never lowers.
pub fn escalated_priority(current: Priority, count: u32, config: &ClaimsConfig) -> Priority {
    let floor = if count >= config.escalate_urgent_at {
        Priority::Urgent
    } else if count >= config.escalate_high_at {
        Priority::High
    } else {
        Priority::Low
    };
    current.max(floor)
}

fn validate_submission(
    config: &ClaimsConfig,
    submitter_id: &str,
    text: &str,
    media_ref: Option<&str>,
) -> VerityResult<()> {
    if submitter_id.trim().is_empty() {
        return Err(VerityError::validation("submitter_id", "must not be empty"));
    }
    if text.trim().is_empty() {
        return Err(VerityError::validation("text", "must not be empty"));
    }
    if text.len() > config.max_text_len {
        return Err(VerityError::validation(
            "text",
            format!("exceeds {} bytes", config.max_text_len),
        ));
    }
    if let Some(media) = media_ref {
        if media.trim().is_empty() || media.len() > MAX_SOURCE_LEN {
            return Err(VerityError::validation(
                "media_ref",
                format!("must be 1..={MAX_SOURCE_LEN} bytes"),
            ));
        }
    }
    Ok(())
}

impl VerityEngine {
    /// Submit a claim and return its id.
    ///
    /// Text matching an existing claim's fingerprint is folded into that
    /// claim: its submission count grows, its priority may escalate, and
    /// its id is returned. Only new claims earn submission points.
    pub fn submit_claim(
        &self,
        submitter_id: &str,
        category: Category,
        text: &str,
        media_ref: Option<&str>,
    ) -> VerityResult<String> {
        let _span = crate::lifecycle_span!("submit_claim").entered();
        let claims_config = &self.config().claims;
        validate_submission(claims_config, submitter_id, text, media_ref)?;

        let text = text.trim();
        let text_fingerprint = fingerprint(text);
        let now = self.now();
        let points_config = &self.config().points;

        self.db().with_transaction(|tx| {
            if let Some(existing) = claims_q::find_by_fingerprint(tx, &text_fingerprint)? {
                let count = existing.submission_count.saturating_add(1);
                let priority = if existing.status.is_terminal() {
                    existing.priority
                } else {
                    escalated_priority(existing.priority, count, claims_config)
                };
                let count = claims_q::record_duplicate(tx, &existing.id, priority, to_micros(now))?;
                tracing::info!(
                    claim_id = %existing.id,
                    submission_count = count,
                    %priority,
                    "duplicate submission folded"
                );
                return Ok(existing.id);
            }

            let prior_claims = claims_q::count_by_submitter(tx, submitter_id)?;
            let claim = Claim {
                id: new_id(),
                submitter_id: submitter_id.to_string(),
                text: text.to_string(),
                text_fingerprint: text_fingerprint.clone(),
                category,
                media_ref: media_ref.map(str::to_string),
                status: ClaimStatus::Pending,
                priority: Priority::default(),
                submission_count: 1,
                is_trending: false,
                trending_score: None,
                assigned_to: None,
                ai_suggestion_id: None,
                final_verdict_id: None,
                created_at: now,
                updated_at: now,
            };
            claims_q::insert_claim(tx, &claim)?;

            credit(
                tx,
                points_config,
                submitter_id,
                points_config.claim_submitted,
                ActivityType::ClaimSubmitted,
                &format!("claim {}", claim.id),
                now,
            )?;
            if prior_claims == 0 {
                credit(
                    tx,
                    points_config,
                    submitter_id,
                    points_config.first_claim_bonus,
                    ActivityType::FirstClaim,
                    "first claim",
                    now,
                )?;
            }

            tracing::info!(claim_id = %claim.id, %category, "claim submitted");
            Ok::<_, VerityError>(claim.id)
        })
    }

    /// Review queue: urgent > high > medium > low, then oldest first.
    pub fn get_pending_claims(&self, filter: &ClaimFilter) -> VerityResult<Vec<ClaimSummary>> {
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .min(MAX_LIST_LIMIT);
        Ok(self
            .db()
            .with_reader(|conn| claims_q::query_pending(conn, filter, limit))?)
    }

    pub fn get_claim(&self, claim_id: &str) -> VerityResult<Claim> {
        self.db().with_reader(|conn| load_claim(conn, claim_id))
    }
}
