//! Queries for the claims table.

use rusqlite::{params, params_from_iter, types::Value, Connection, OptionalExtension, Row};

use verity_core::errors::StorageError;
use verity_core::models::{Claim, ClaimFilter, ClaimStatus, ClaimSummary, Priority};

use crate::{from_micros, parse_enum, to_micros, to_storage_err};

const TABLE: &str = "claims";

const CLAIM_COLUMNS: &str = "id, submitter_id, text, text_fingerprint, category, media_ref, \
     status, priority, submission_count, is_trending, trending_score, assigned_to, \
     ai_suggestion_id, final_verdict_id, created_at, updated_at";

/// Raw claim row before enum/timestamp decoding.
struct ClaimRow {
    id: String,
    submitter_id: String,
    text: String,
    text_fingerprint: String,
    category: String,
    media_ref: Option<String>,
    status: String,
    priority: String,
    submission_count: u32,
    is_trending: bool,
    trending_score: Option<f64>,
    assigned_to: Option<String>,
    ai_suggestion_id: Option<String>,
    final_verdict_id: Option<String>,
    created_at: i64,
    updated_at: i64,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<ClaimRow> {
    Ok(ClaimRow {
        id: row.get(0)?,
        submitter_id: row.get(1)?,
        text: row.get(2)?,
        text_fingerprint: row.get(3)?,
        category: row.get(4)?,
        media_ref: row.get(5)?,
        status: row.get(6)?,
        priority: row.get(7)?,
        submission_count: row.get(8)?,
        is_trending: row.get(9)?,
        trending_score: row.get(10)?,
        assigned_to: row.get(11)?,
        ai_suggestion_id: row.get(12)?,
        final_verdict_id: row.get(13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

impl ClaimRow {
    fn decode(self) -> Result<Claim, StorageError> {
        Ok(Claim {
            category: parse_enum(TABLE, &self.category)?,
            status: parse_enum(TABLE, &self.status)?,
            priority: parse_enum(TABLE, &self.priority)?,
            created_at: from_micros(TABLE, self.created_at)?,
            updated_at: from_micros(TABLE, self.updated_at)?,
            id: self.id,
            submitter_id: self.submitter_id,
            text: self.text,
            text_fingerprint: self.text_fingerprint,
            media_ref: self.media_ref,
            submission_count: self.submission_count,
            is_trending: self.is_trending,
            trending_score: self.trending_score,
            assigned_to: self.assigned_to,
            ai_suggestion_id: self.ai_suggestion_id,
            final_verdict_id: self.final_verdict_id,
        })
    }
}

fn query_claims(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Claim>, StorageError> {
    let mut stmt = conn.prepare_cached(sql).map_err(to_storage_err)?;
    let rows = stmt.query_map(params, read_row).map_err(to_storage_err)?;
    rows.map(|r| r.map_err(to_storage_err).and_then(ClaimRow::decode))
        .collect()
}

/// Insert a new claim.
pub fn insert_claim(conn: &Connection, claim: &Claim) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO claims (id, submitter_id, text, text_fingerprint, category, media_ref,
            status, priority, submission_count, is_trending, trending_score, assigned_to,
            ai_suggestion_id, final_verdict_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            claim.id,
            claim.submitter_id,
            claim.text,
            claim.text_fingerprint,
            claim.category.as_str(),
            claim.media_ref,
            claim.status.as_str(),
            claim.priority.as_str(),
            claim.submission_count,
            claim.is_trending,
            claim.trending_score,
            claim.assigned_to,
            claim.ai_suggestion_id,
            claim.final_verdict_id,
            to_micros(claim.created_at),
            to_micros(claim.updated_at),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn get_claim(conn: &Connection, id: &str) -> Result<Option<Claim>, StorageError> {
    let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql).map_err(to_storage_err)?;
    stmt.query_row(params![id], read_row)
        .optional()
        .map_err(to_storage_err)?
        .map(ClaimRow::decode)
        .transpose()
}

pub fn find_by_fingerprint(
    conn: &Connection,
    fingerprint: &str,
) -> Result<Option<Claim>, StorageError> {
    let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE text_fingerprint = ?1");
    let mut stmt = conn.prepare_cached(&sql).map_err(to_storage_err)?;
    stmt.query_row(params![fingerprint], read_row)
        .optional()
        .map_err(to_storage_err)?
        .map(ClaimRow::decode)
        .transpose()
}

/// Count one more submission of an existing claim and set its priority.
pub fn record_duplicate(
    conn: &Connection,
    id: &str,
    priority: Priority,
    now_us: i64,
) -> Result<u32, StorageError> {
    conn.query_row(
        "UPDATE claims SET submission_count = submission_count + 1, priority = ?2, updated_at = ?3
         WHERE id = ?1
         RETURNING submission_count",
        params![id, priority.as_str(), now_us],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Compare-and-set status change. Returns the number of rows changed:
/// 0 means the claim was no longer in `from`.
pub fn transition_status(
    conn: &Connection,
    id: &str,
    from: ClaimStatus,
    to: ClaimStatus,
    now_us: i64,
) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE claims SET status = ?3, updated_at = ?4 WHERE id = ?1 AND status = ?2",
        params![id, from.as_str(), to.as_str(), now_us],
    )
    .map_err(to_storage_err)
}

/// Attach the suggestion and move to `ai_approved` in one statement.
pub fn attach_suggestion(
    conn: &Connection,
    id: &str,
    from: ClaimStatus,
    suggestion_id: &str,
    now_us: i64,
) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE claims SET ai_suggestion_id = ?3, status = 'ai_approved', updated_at = ?4
         WHERE id = ?1 AND status = ?2 AND ai_suggestion_id IS NULL",
        params![id, from.as_str(), suggestion_id, now_us],
    )
    .map_err(to_storage_err)
}

/// Resolve the claim: final verdict ref, assignment, and `human_approved`.
pub fn finalize(
    conn: &Connection,
    id: &str,
    from: ClaimStatus,
    verdict_id: &str,
    fact_checker_id: &str,
    now_us: i64,
) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE claims
         SET status = 'human_approved', final_verdict_id = ?3, assigned_to = ?4, updated_at = ?5
         WHERE id = ?1 AND status = ?2 AND final_verdict_id IS NULL",
        params![id, from.as_str(), verdict_id, fact_checker_id, now_us],
    )
    .map_err(to_storage_err)
}

pub fn set_assignee(
    conn: &Connection,
    id: &str,
    assignee: Option<&str>,
    now_us: i64,
) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE claims SET assigned_to = ?2, updated_at = ?3 WHERE id = ?1",
        params![id, assignee, now_us],
    )
    .map_err(to_storage_err)
}

pub fn set_priority(
    conn: &Connection,
    id: &str,
    priority: Priority,
    now_us: i64,
) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE claims SET priority = ?2, updated_at = ?3 WHERE id = ?1",
        params![id, priority.as_str(), now_us],
    )
    .map_err(to_storage_err)
}

pub fn set_trending(
    conn: &Connection,
    id: &str,
    is_trending: bool,
    score: Option<f64>,
) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE claims SET is_trending = ?2, trending_score = ?3 WHERE id = ?1",
        params![id, is_trending, score],
    )
    .map_err(to_storage_err)
}

pub fn set_trending_flag(conn: &Connection, id: &str, is_trending: bool) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE claims SET is_trending = ?2 WHERE id = ?1",
        params![id, is_trending],
    )
    .map_err(to_storage_err)
}

/// Review queue: urgent > high > medium > low, then oldest first.
pub fn query_pending(
    conn: &Connection,
    filter: &ClaimFilter,
    limit: usize,
) -> Result<Vec<ClaimSummary>, StorageError> {
    let statuses = if filter.statuses.is_empty() {
        ClaimStatus::open_states()
    } else {
        filter.statuses.clone()
    };

    let mut values: Vec<Value> = statuses
        .iter()
        .map(|s| Value::Text(s.as_str().to_string()))
        .collect();
    let placeholders = (1..=values.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!(
        "SELECT c.id, c.text, c.category, c.priority, c.status, c.submission_count,
                c.assigned_to, s.confidence, c.created_at
         FROM claims c
         LEFT JOIN ai_suggestions s ON s.claim_id = c.id
         WHERE c.status IN ({placeholders})"
    );
    if let Some(category) = filter.category {
        values.push(Value::Text(category.as_str().to_string()));
        sql.push_str(&format!(" AND c.category = ?{}", values.len()));
    }
    if let Some(priority) = filter.priority {
        values.push(Value::Text(priority.as_str().to_string()));
        sql.push_str(&format!(" AND c.priority = ?{}", values.len()));
    }
    if let Some(assignee) = &filter.assigned_to {
        values.push(Value::Text(assignee.clone()));
        sql.push_str(&format!(" AND c.assigned_to = ?{}", values.len()));
    }
    values.push(Value::Integer(limit as i64));
    sql.push_str(&format!(
        " ORDER BY {}, c.created_at ASC, c.id ASC LIMIT ?{}",
        priority_rank_sql("c.priority"),
        values.len()
    ));

    let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, u32>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, Option<f64>>(7)?,
                row.get::<_, i64>(8)?,
            ))
        })
        .map_err(to_storage_err)?;

    rows.map(|r| {
        let (id, text, category, priority, status, submission_count, assigned_to, conf, created) =
            r.map_err(to_storage_err)?;
        Ok(ClaimSummary {
            id,
            text,
            category: parse_enum(TABLE, &category)?,
            priority: parse_enum(TABLE, &priority)?,
            status: parse_enum(TABLE, &status)?,
            submission_count,
            assigned_to,
            ai_confidence: conf,
            created_at: from_micros(TABLE, created)?,
        })
    })
    .collect()
}

/// `CASE` expression ranking `column` by `Priority::queue_rank`.
fn priority_rank_sql(column: &str) -> String {
    let arms: String = Priority::ALL
        .iter()
        .map(|p| format!(" WHEN '{}' THEN {}", p.as_str(), p.queue_rank()))
        .collect();
    format!("CASE {column}{arms} END")
}

/// Claims that reached `human_approved`.
pub fn query_resolved(conn: &Connection) -> Result<Vec<Claim>, StorageError> {
    let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE status = 'human_approved'");
    query_claims(conn, &sql, [])
}

/// Most recent non-rejected claims of any status.
pub fn query_recent(conn: &Connection, limit: usize) -> Result<Vec<Claim>, StorageError> {
    let sql = format!(
        "SELECT {CLAIM_COLUMNS} FROM claims WHERE status != 'rejected'
         ORDER BY created_at DESC, id DESC LIMIT ?1"
    );
    query_claims(conn, &sql, params![limit as i64])
}

pub fn count_by_submitter(conn: &Connection, submitter_id: &str) -> Result<i64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM claims WHERE submitter_id = ?1",
        params![submitter_id],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Claims waiting on a human that are unassigned or held by `fact_checker_id`.
pub fn count_awaiting_review(conn: &Connection, fact_checker_id: &str) -> Result<i64, StorageError> {
    let mut values: Vec<Value> = vec![Value::Text(fact_checker_id.to_string())];
    values.extend(
        ClaimStatus::ALL
            .iter()
            .filter(|s| s.awaits_human())
            .map(|s| Value::Text(s.as_str().to_string())),
    );
    let placeholders = (2..=values.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT COUNT(*) FROM claims
         WHERE status IN ({placeholders})
           AND (assigned_to IS NULL OR assigned_to = ?1)"
    );
    conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))
        .map_err(to_storage_err)
}
