//! Per-fact-checker statistics.

use std::collections::BTreeMap;

use verity_core::errors::VerityResult;
use verity_core::models::FactCheckerStats;
use verity_storage::queries::{claims as claims_q, verdicts as verdicts_q};

use crate::engine::VerityEngine;

impl VerityEngine {
    /// Totals, queue depth, average time, AI agreement, and label spread
    /// for one fact-checker.
    ///
    /// `accuracy` is the share of the checker's suggestion-linked verdicts
    /// whose label matches the raw AI label, `None` without any.
    pub fn get_fact_checker_stats(&self, fact_checker_id: &str) -> VerityResult<FactCheckerStats> {
        let (aggregate, pending) = self.db().with_reader(|conn| {
            let aggregate = verdicts_q::checker_aggregate(conn, fact_checker_id)?;
            let pending = claims_q::count_awaiting_review(conn, fact_checker_id)?;
            Ok::<_, verity_core::errors::StorageError>((aggregate, pending))
        })?;

        let accuracy = (aggregate.ai_linked > 0)
            .then(|| aggregate.ai_agreed as f64 / aggregate.ai_linked as f64);

        Ok(FactCheckerStats {
            total_verdicts: aggregate.total,
            pending_review: u64::try_from(pending).unwrap_or(0),
            avg_time_spent_secs: aggregate.avg_time_spent_secs,
            accuracy,
            verdict_distribution: aggregate.distribution.into_iter().collect::<BTreeMap<_, _>>(),
        })
    }
}
