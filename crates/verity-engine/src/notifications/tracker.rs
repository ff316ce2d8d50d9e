//! The unread set is derived, never stored: final verdicts on the user's
//! own claims created after their watermark. Marking anything read moves
//! the watermark to "now", or to the newest verdict if that is later, which
//! clears everything older at once. New verdicts are stamped past the
//! watermark, so they always start unread.

use verity_core::errors::{VerityError, VerityResult};
use verity_core::models::UnreadVerdict;
use verity_storage::queries::watermarks;
use verity_storage::to_micros;

use crate::engine::VerityEngine;

impl VerityEngine {
    /// Unread final verdicts on `user_id`'s claims, newest first.
    pub fn get_unread_verdicts(&self, user_id: &str) -> VerityResult<Vec<UnreadVerdict>> {
        let _span = crate::notify_span!("get_unread_verdicts", user_id).entered();
        Ok(self
            .db()
            .with_reader(|conn| watermarks::unread_for(conn, user_id, None))?)
    }

    pub fn unread_count(&self, user_id: &str) -> VerityResult<u64> {
        let _span = crate::notify_span!("unread_count", user_id).entered();
        Ok(self
            .db()
            .with_reader(|conn| watermarks::count_unread(conn, user_id))?)
    }

    /// Advance the watermark to now, or to the newest verdict if later.
    ///
    /// A specific `verdict_id` must exist (`NotFound`) and belong to one of
    /// the caller's claims (`Forbidden`); it still clears every older
    /// unread verdict, not just itself.
    pub fn mark_read(&self, user_id: &str, verdict_id: Option<&str>) -> VerityResult<()> {
        let _span = crate::notify_span!("mark_read", user_id).entered();
        let now = self.now();
        self.db().with_transaction(|tx| {
            if let Some(verdict_id) = verdict_id {
                let owner = watermarks::verdict_owner(tx, verdict_id)?
                    .ok_or_else(|| VerityError::not_found("verdict", verdict_id))?;
                if owner != user_id {
                    tracing::warn!(verdict_id, "mark_read on a verdict for someone else's claim");
                    return Err(VerityError::forbidden(format!(
                        "verdict {verdict_id} is not on a claim submitted by {user_id}"
                    )));
                }
            }
            let mark = watermarks::newest_verdict_at(tx, user_id)?
                .map_or(to_micros(now), |newest| newest.max(to_micros(now)));
            watermarks::advance_watermark(tx, user_id, mark)?;
            tracing::debug!(watermark = mark, "watermark advanced");
            Ok(())
        })
    }

    pub fn mark_all_read(&self, user_id: &str) -> VerityResult<()> {
        self.mark_read(user_id, None)
    }
}
