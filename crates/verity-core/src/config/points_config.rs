use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Point amounts and the server calendar used for streaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsConfig {
    /// Awarded on a user's first touch. Default: 50.
    pub registration_bonus: i64,
    /// Awarded for the first login of a calendar day. Default: 10.
    pub daily_login: i64,
    /// Added on top of the daily amount every `streak_bonus_interval` days. Default: 50.
    pub streak_bonus: i64,
    /// Default: 7.
    pub streak_bonus_interval: u32,
    /// Default: 10.
    pub claim_submitted: i64,
    /// One-time bonus for a user's first claim. Default: 25.
    pub first_claim_bonus: i64,
    /// Credited to the fact-checker when a claim is resolved. Default: 20.
    pub verdict_submitted: i64,
    /// Fixed server time zone as minutes east of UTC. Default: 0.
    pub server_utc_offset_minutes: i32,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            registration_bonus: 50,
            daily_login: 10,
            streak_bonus: 50,
            streak_bonus_interval: 7,
            claim_submitted: 10,
            first_claim_bonus: 25,
            verdict_submitted: 20,
            server_utc_offset_minutes: 0,
        }
    }
}

impl PointsConfig {
    /// The server time zone. Falls back to UTC for an out-of-range offset;
    /// `VerityConfig::validate` rejects those before they get here.
    pub fn server_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.server_utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    /// Calendar day of `at` in server time.
    pub fn calendar_day(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.server_offset()).date_naive()
    }
}
