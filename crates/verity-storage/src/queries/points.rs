//! Queries for the append-only points ledger and the user_points rollup.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use verity_core::errors::StorageError;
use verity_core::models::{PointsLedgerEntry, UserPointsSummary};

use crate::{from_micros, parse_date, parse_enum, to_micros, to_storage_err};

const LEDGER: &str = "points_ledger";
const SUMMARY: &str = "user_points";

/// Create a zero-state summary if none exists. Returns true when created.
pub fn ensure_summary(conn: &Connection, user_id: &str, now_us: i64) -> Result<bool, StorageError> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO user_points (user_id, created_at, updated_at)
             VALUES (?1, ?2, ?2)",
            params![user_id, now_us],
        )
        .map_err(to_storage_err)?;
    Ok(inserted == 1)
}

pub fn insert_entry(conn: &Connection, entry: &PointsLedgerEntry) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO points_ledger (id, user_id, points, activity_type, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.id,
            entry.user_id,
            entry.points,
            entry.activity_type.as_str(),
            entry.description,
            to_micros(entry.created_at),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Atomic in-SQL bump of the cached total.
pub fn increment_total(
    conn: &Connection,
    user_id: &str,
    delta: i64,
    now_us: i64,
) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE user_points SET total_points = total_points + ?2, updated_at = ?3
         WHERE user_id = ?1",
        params![user_id, delta, now_us],
    )
    .map_err(to_storage_err)
}

pub fn update_streak(
    conn: &Connection,
    user_id: &str,
    current: u32,
    longest: u32,
    last_activity: NaiveDate,
    now_us: i64,
) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE user_points
         SET current_streak = ?2, longest_streak = ?3, last_activity_date = ?4, updated_at = ?5
         WHERE user_id = ?1",
        params![
            user_id,
            current,
            longest,
            last_activity.format("%Y-%m-%d").to_string(),
            now_us
        ],
    )
    .map_err(to_storage_err)
}

pub fn get_summary(conn: &Connection, user_id: &str) -> Result<Option<UserPointsSummary>, StorageError> {
    let row = conn
        .query_row(
            "SELECT user_id, total_points, current_streak, longest_streak, last_activity_date
             FROM user_points WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            },
        )
        .optional()
        .map_err(to_storage_err)?;

    row.map(|(user_id, total_points, current_streak, longest_streak, last)| {
        Ok(UserPointsSummary {
            user_id,
            total_points,
            current_streak,
            longest_streak,
            last_activity_date: last.map(|d| parse_date(SUMMARY, &d)).transpose()?,
        })
    })
    .transpose()
}

/// Top users: total desc, longest streak desc, user id asc.
pub fn leaderboard(
    conn: &Connection,
    limit: usize,
) -> Result<Vec<(String, i64, u32)>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT user_id, total_points, longest_streak FROM user_points
             ORDER BY total_points DESC, longest_streak DESC, user_id ASC
             LIMIT ?1",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// Newest ledger rows first.
pub fn history(
    conn: &Connection,
    user_id: &str,
    limit: usize,
) -> Result<Vec<PointsLedgerEntry>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, user_id, points, activity_type, description, created_at
             FROM points_ledger WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT ?2",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![user_id, limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })
        .map_err(to_storage_err)?;

    rows.map(|r| {
        let (id, user_id, points, activity, description, at) = r.map_err(to_storage_err)?;
        Ok(PointsLedgerEntry {
            id,
            user_id,
            points,
            activity_type: parse_enum(LEDGER, &activity)?,
            description,
            created_at: from_micros(LEDGER, at)?,
        })
    })
    .collect()
}

/// Sum of the ledger for a user. Used to check the cached total.
pub fn ledger_total(conn: &Connection, user_id: &str) -> Result<i64, StorageError> {
    conn.query_row(
        "SELECT COALESCE(SUM(points), 0) FROM points_ledger WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}
