use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Responsibility, VerdictLabel};

/// A final verdict on one of the user's claims, newer than their watermark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadVerdict {
    pub verdict_id: String,
    pub claim_id: String,
    pub claim_text: String,
    pub verdict: VerdictLabel,
    pub responsibility: Responsibility,
    pub created_at: DateTime<Utc>,
}
