//! Per-user read watermark. A final verdict on a claim the user submitted
//! is unread when it was created after their watermark.

use rusqlite::{params, Connection, OptionalExtension};

use verity_core::errors::StorageError;
use verity_core::models::UnreadVerdict;

use crate::{from_micros, parse_enum, to_storage_err};

const TABLE: &str = "notification_watermarks";

pub fn get_watermark(conn: &Connection, user_id: &str) -> Result<Option<i64>, StorageError> {
    conn.query_row(
        "SELECT last_read_at FROM notification_watermarks WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(to_storage_err)
}

/// Move the watermark to `at_us`, never backwards.
pub fn advance_watermark(conn: &Connection, user_id: &str, at_us: i64) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO notification_watermarks (user_id, last_read_at) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE
         SET last_read_at = MAX(last_read_at, excluded.last_read_at)",
        params![user_id, at_us],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Final verdicts newer than the user's watermark, newest first.
/// `None` returns the whole unread set.
pub fn unread_for(
    conn: &Connection,
    user_id: &str,
    limit: Option<usize>,
) -> Result<Vec<UnreadVerdict>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT v.id, v.claim_id, c.text, v.verdict, v.responsibility, v.created_at
             FROM verdicts v
             JOIN claims c ON c.id = v.claim_id
             WHERE v.is_final = 1
               AND c.submitter_id = ?1
               AND v.created_at > COALESCE(
                   (SELECT last_read_at FROM notification_watermarks WHERE user_id = ?1), -1)
             ORDER BY v.created_at DESC, v.id DESC
             LIMIT ?2",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![user_id, limit.map_or(-1, |l| l as i64)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })
        .map_err(to_storage_err)?;

    rows.map(|r| {
        let (verdict_id, claim_id, claim_text, verdict, responsibility, at) =
            r.map_err(to_storage_err)?;
        Ok(UnreadVerdict {
            verdict_id,
            claim_id,
            claim_text,
            verdict: parse_enum(TABLE, &verdict)?,
            responsibility: parse_enum(TABLE, &responsibility)?,
            created_at: from_micros(TABLE, at)?,
        })
    })
    .collect()
}

pub fn count_unread(conn: &Connection, user_id: &str) -> Result<u64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM verdicts v
         JOIN claims c ON c.id = v.claim_id
         WHERE v.is_final = 1
           AND c.submitter_id = ?1
           AND v.created_at > COALESCE(
               (SELECT last_read_at FROM notification_watermarks WHERE user_id = ?1), -1)",
        params![user_id],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Creation time of the newest final verdict on the user's claims.
pub fn newest_verdict_at(conn: &Connection, user_id: &str) -> Result<Option<i64>, StorageError> {
    conn.query_row(
        "SELECT MAX(v.created_at) FROM verdicts v
         JOIN claims c ON c.id = v.claim_id
         WHERE v.is_final = 1 AND c.submitter_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Submitter of the claim a verdict belongs to, if the verdict exists.
pub fn verdict_owner(conn: &Connection, verdict_id: &str) -> Result<Option<String>, StorageError> {
    conn.query_row(
        "SELECT c.submitter_id FROM verdicts v JOIN claims c ON c.id = v.claim_id
         WHERE v.id = ?1",
        params![verdict_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(to_storage_err)
}
