//! Append-only point awards, the cached per-user rollup, and daily-login
//! streaks.
//!
//! Every award appends one ledger row and bumps `user_points.total_points`
//! in SQL inside the same transaction. A user's first touch lazily creates
//! their summary and credits the registration bonus.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use verity_core::config::PointsConfig;
use verity_core::constants::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, REGISTRATION_DESCRIPTION};
use verity_core::errors::{StorageError, VerityError, VerityResult};
use verity_core::models::{
    ActivityType, DailyLoginOutcome, LeaderboardEntry, PointsLedgerEntry, StreakStep,
    UserPointsSummary,
};
use verity_storage::queries::points as points_q;
use verity_storage::to_micros;

use crate::engine::VerityEngine;

/// Create the user's summary on first touch and credit the registration
/// bonus exactly once.
fn ensure_user(
    conn: &Connection,
    config: &PointsConfig,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<(), StorageError> {
    if points_q::ensure_summary(conn, user_id, to_micros(now))? {
        append(
            conn,
            user_id,
            config.registration_bonus,
            ActivityType::Registration,
            REGISTRATION_DESCRIPTION,
            now,
        )?;
        tracing::debug!(user_id, "points summary initialized");
    }
    Ok(())
}

fn append(
    conn: &Connection,
    user_id: &str,
    points: i64,
    activity_type: ActivityType,
    description: &str,
    now: DateTime<Utc>,
) -> Result<(), StorageError> {
    points_q::insert_entry(
        conn,
        &PointsLedgerEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            points,
            activity_type,
            description: description.to_string(),
            created_at: now,
        },
    )?;
    points_q::increment_total(conn, user_id, points, to_micros(now))?;
    Ok(())
}

/// Credit `points` inside the caller's transaction.
pub(crate) fn credit(
    conn: &Connection,
    config: &PointsConfig,
    user_id: &str,
    points: i64,
    activity_type: ActivityType,
    description: &str,
    now: DateTime<Utc>,
) -> Result<(), StorageError> {
    ensure_user(conn, config, user_id, now)?;
    append(conn, user_id, points, activity_type, description, now)
}

fn load_summary(conn: &Connection, user_id: &str) -> VerityResult<UserPointsSummary> {
    points_q::get_summary(conn, user_id)?.ok_or_else(|| {
        tracing::error!(user_id, "points summary missing after initialization");
        VerityError::Unrecoverable {
            details: format!("points summary for {user_id} missing after initialization"),
        }
    })
}

fn require_user_id(user_id: &str) -> VerityResult<()> {
    if user_id.trim().is_empty() {
        return Err(VerityError::validation("user_id", "must not be empty"));
    }
    Ok(())
}

impl VerityEngine {
    /// Append an award and bump the cached total. Deduplication of one-time
    /// awards is the caller's call.
    pub fn award_points(
        &self,
        user_id: &str,
        points: i64,
        activity_type: ActivityType,
        description: &str,
    ) -> VerityResult<UserPointsSummary> {
        let _span = crate::points_span!("award_points", user_id).entered();
        require_user_id(user_id)?;
        let now = self.now();
        let config = &self.config().points;

        self.db().with_transaction(|tx| {
            credit(tx, config, user_id, points, activity_type, description, now)?;
            tracing::info!(points, activity = %activity_type, "points awarded");
            load_summary(tx, user_id)
        })
    }

    /// Credit the first login of a calendar day and advance the streak.
    pub fn award_daily_login(&self, user_id: &str) -> VerityResult<DailyLoginOutcome> {
        let _span = crate::points_span!("award_daily_login", user_id).entered();
        require_user_id(user_id)?;
        let now = self.now();
        let config = &self.config().points;
        let today = config.calendar_day(now);

        self.db().with_transaction(|tx| {
            ensure_user(tx, config, user_id, now)?;
            let summary = load_summary(tx, user_id)?;

            let step = StreakStep::decide(summary.last_activity_date, summary.current_streak, today);
            let Some(streak) = step.new_streak() else {
                tracing::debug!(%today, "already credited today");
                return Ok(DailyLoginOutcome {
                    points_awarded: 0,
                    bonus_awarded: false,
                    current_streak: summary.current_streak,
                    longest_streak: summary.longest_streak,
                });
            };

            let longest = summary.longest_streak.max(streak);
            points_q::update_streak(tx, user_id, streak, longest, today, to_micros(now))?;
            append(tx, user_id, config.daily_login, ActivityType::DailyLogin, "daily login", now)?;

            let bonus = config.streak_bonus_interval > 0 && streak % config.streak_bonus_interval == 0;
            if bonus {
                append(
                    tx,
                    user_id,
                    config.streak_bonus,
                    ActivityType::StreakBonus,
                    &format!("{streak}-day streak"),
                    now,
                )?;
            }
            let awarded = config.daily_login + if bonus { config.streak_bonus } else { 0 };
            tracing::info!(streak, awarded, ?step, "daily login credited");

            Ok(DailyLoginOutcome {
                points_awarded: awarded,
                bonus_awarded: bonus,
                current_streak: streak,
                longest_streak: longest,
            })
        })
    }

    /// Current summary. A first touch initializes the user.
    pub fn get_user_points(&self, user_id: &str) -> VerityResult<UserPointsSummary> {
        let _span = crate::points_span!("get_user_points", user_id).entered();
        require_user_id(user_id)?;
        let now = self.now();
        let config = &self.config().points;
        self.db().with_transaction(|tx| {
            ensure_user(tx, config, user_id, now)?;
            load_summary(tx, user_id)
        })
    }

    /// Ranked by total points, then longest streak, then user id.
    pub fn get_leaderboard(&self, limit: usize) -> VerityResult<Vec<LeaderboardEntry>> {
        let limit = limit.min(MAX_LIST_LIMIT);
        let rows = self.db().with_reader(|conn| points_q::leaderboard(conn, limit))?;
        Ok(rows
            .into_iter()
            .zip(1u32..)
            .map(|((user_id, total_points, longest_streak), rank)| LeaderboardEntry {
                rank,
                user_id,
                total_points,
                longest_streak,
            })
            .collect())
    }

    /// Newest ledger rows first.
    pub fn points_history(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> VerityResult<Vec<PointsLedgerEntry>> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
        Ok(self
            .db()
            .with_reader(|conn| points_q::history(conn, user_id, limit))?)
    }
}
