//! Points ledger entries, cached summaries, and the calendar-day streak rule.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

closed_enum! {
    ActivityType, "activity_type" {
        Registration => "registration",
        DailyLogin => "daily_login",
        StreakBonus => "streak_bonus",
        ClaimSubmitted => "claim_submitted",
        FirstClaim => "first_claim",
        VerdictSubmitted => "verdict_submitted",
        Manual => "manual",
    }
}

/// One append-only ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsLedgerEntry {
    pub id: String,
    pub user_id: String,
    /// Signed point delta.
    pub points: i64,
    pub activity_type: ActivityType,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Cached rollup of a user's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPointsSummary {
    pub user_id: String,
    pub total_points: i64,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Last calendar day with a qualifying login, in server time.
    pub last_activity_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub total_points: i64,
    pub longest_streak: u32,
}

/// What a daily login does to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakStep {
    /// Already logged in today. Nothing is awarded.
    SameDay,
    /// Consecutive day; carries the new streak length.
    Continued(u32),
    /// First login ever, or a gap of more than one day.
    Reset,
}

impl StreakStep {
    /// Decide the step for a login on `today` given the last qualifying day.
    ///
    /// A last day after `today` (clock skew) is treated as `SameDay`.
    pub fn decide(last: Option<NaiveDate>, current_streak: u32, today: NaiveDate) -> Self {
        match last {
            None => Self::Reset,
            Some(last) if today <= last => Self::SameDay,
            Some(last) if last.succ_opt() == Some(today) => {
                Self::Continued(current_streak.saturating_add(1))
            }
            Some(_) => Self::Reset,
        }
    }

    /// Streak length after the step, or `None` when nothing changes.
    pub fn new_streak(&self) -> Option<u32> {
        match self {
            Self::SameDay => None,
            Self::Continued(n) => Some(*n),
            Self::Reset => Some(1),
        }
    }
}

/// Result of `award_daily_login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLoginOutcome {
    /// Total points awarded by this call, bonus included.
    pub points_awarded: i64,
    pub bonus_awarded: bool,
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn first_login_resets() {
        assert_eq!(StreakStep::decide(None, 0, day(1)), StreakStep::Reset);
    }

    #[test]
    fn next_day_continues() {
        assert_eq!(
            StreakStep::decide(Some(day(1)), 4, day(2)),
            StreakStep::Continued(5)
        );
    }

    #[test]
    fn gap_resets_and_same_day_is_noop() {
        assert_eq!(StreakStep::decide(Some(day(1)), 4, day(4)), StreakStep::Reset);
        assert_eq!(StreakStep::decide(Some(day(4)), 4, day(4)), StreakStep::SameDay);
        assert_eq!(StreakStep::decide(Some(day(5)), 4, day(4)), StreakStep::SameDay);
    }

    #[test]
    fn month_boundary_is_consecutive() {
        let last = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            StreakStep::decide(Some(last), 1, day(1)),
            StreakStep::Continued(2)
        );
    }
}
