//! Trending order and time-decayed scores.
//!
//! Order: `is_trending` first, then `trending_score` descending with
//! missing scores last, then `submission_count` descending, then newest.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use verity_core::constants::MAX_LIST_LIMIT;
use verity_core::errors::VerityResult;
use verity_core::models::{Claim, Principal};
use verity_storage::queries::claims as claims_q;

use crate::engine::VerityEngine;
use crate::lifecycle::{expect_one, load_claim};

/// Total order used to surface trending claims. `Ordering::Less` sorts first.
pub fn compare_trending(a: &Claim, b: &Claim) -> Ordering {
    b.is_trending
        .cmp(&a.is_trending)
        .then_with(|| match (a.trending_score, b.trending_score) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.submission_count.cmp(&a.submission_count))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// `submission_count * 0.5^(age_hours / half_life_hours)`.
pub fn decayed_score(submission_count: u32, age_hours: f64, half_life_hours: f64) -> f64 {
    let age = age_hours.max(0.0);
    f64::from(submission_count) * 0.5_f64.powf(age / half_life_hours)
}

fn age_hours(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created_at).num_seconds() as f64 / 3600.0
}

/// A resolved claim surfaces when flagged or submitted more than once.
fn qualifies(claim: &Claim) -> bool {
    claim.is_trending || claim.submission_count > 1
}

impl VerityEngine {
    /// Resolved claims in trending order. When none qualify, the most recent
    /// non-rejected claims are returned instead.
    pub fn trending_claims(&self, limit: usize) -> VerityResult<Vec<Claim>> {
        let _span = crate::trending_span!("trending_claims").entered();
        let limit = limit.min(MAX_LIST_LIMIT);
        Ok(self.db().with_reader(|conn| {
            let mut candidates: Vec<Claim> = claims_q::query_resolved(conn)?
                .into_iter()
                .filter(qualifies)
                .collect();
            if candidates.is_empty() {
                tracing::debug!("no trending candidates, falling back to recent claims");
                return claims_q::query_recent(conn, limit);
            }
            candidates.sort_by(compare_trending);
            candidates.truncate(limit);
            Ok(candidates)
        })?)
    }

    /// Recompute decayed scores for every resolved claim and flag those over
    /// the threshold. Flags are only ever set here; clearing is an admin
    /// action. Returns how many claims are flagged afterwards.
    pub fn refresh_trending(&self) -> VerityResult<usize> {
        let _span = crate::trending_span!("refresh_trending").entered();
        let now = self.now();
        let config = &self.config().trending;

        self.db().with_transaction(|tx| {
            let mut flagged = 0;
            for claim in claims_q::query_resolved(tx)? {
                let score = decayed_score(
                    claim.submission_count,
                    age_hours(claim.created_at, now),
                    config.half_life_hours,
                );
                let hot = score >= config.threshold && claim.submission_count >= config.min_submissions;
                let is_trending = claim.is_trending || hot;
                if hot && !claim.is_trending {
                    tracing::info!(claim_id = %claim.id, score, "claim started trending");
                }
                let changed = claims_q::set_trending(tx, &claim.id, is_trending, Some(score))?;
                expect_one(changed, &claim, "refresh trending")?;
                if is_trending {
                    flagged += 1;
                }
            }
            Ok(flagged)
        })
    }

    /// Admin curation of the trending flag.
    pub fn flag_trending(&self, principal: &Principal, claim_id: &str, flag: bool) -> VerityResult<()> {
        let _span = crate::trending_span!("flag_trending").entered();
        principal.require_admin()?;
        self.db().with_transaction(|tx| {
            let claim = load_claim(tx, claim_id)?;
            let changed = claims_q::set_trending_flag(tx, claim_id, flag)?;
            expect_one(changed, &claim, "flag trending")?;
            tracing::info!(claim_id, flag, admin = %principal.user_id, "trending flag set");
            Ok(())
        })
    }
}
