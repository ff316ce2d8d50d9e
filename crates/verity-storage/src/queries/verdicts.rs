//! Queries for the verdict ledger. Rows are insert-only; the schema's
//! triggers reject UPDATE and DELETE.

use rusqlite::{params, Connection, OptionalExtension, Row};

use verity_core::errors::StorageError;
use verity_core::models::{Verdict, VerdictLabel};

use crate::{decode_sources, encode_sources, from_micros, parse_enum, to_micros, to_storage_err};

const TABLE: &str = "verdicts";

const VERDICT_COLUMNS: &str = "id, claim_id, fact_checker_id, verdict, explanation, sources, \
     ai_suggestion_id, responsibility, is_final, approval_status, time_spent_secs, created_at";

struct VerdictRow {
    id: String,
    claim_id: String,
    fact_checker_id: String,
    verdict: String,
    explanation: String,
    sources: String,
    ai_suggestion_id: Option<String>,
    responsibility: String,
    is_final: bool,
    approval_status: String,
    time_spent_secs: u32,
    created_at: i64,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<VerdictRow> {
    Ok(VerdictRow {
        id: row.get(0)?,
        claim_id: row.get(1)?,
        fact_checker_id: row.get(2)?,
        verdict: row.get(3)?,
        explanation: row.get(4)?,
        sources: row.get(5)?,
        ai_suggestion_id: row.get(6)?,
        responsibility: row.get(7)?,
        is_final: row.get(8)?,
        approval_status: row.get(9)?,
        time_spent_secs: row.get(10)?,
        created_at: row.get(11)?,
    })
}

impl VerdictRow {
    fn decode(self) -> Result<Verdict, StorageError> {
        Ok(Verdict {
            verdict: parse_enum(TABLE, &self.verdict)?,
            sources: decode_sources(TABLE, &self.sources)?,
            responsibility: parse_enum(TABLE, &self.responsibility)?,
            approval_status: parse_enum(TABLE, &self.approval_status)?,
            created_at: from_micros(TABLE, self.created_at)?,
            id: self.id,
            claim_id: self.claim_id,
            fact_checker_id: self.fact_checker_id,
            explanation: self.explanation,
            ai_suggestion_id: self.ai_suggestion_id,
            is_final: self.is_final,
            time_spent_secs: self.time_spent_secs,
        })
    }
}

pub fn insert_verdict(conn: &Connection, verdict: &Verdict) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO verdicts (id, claim_id, fact_checker_id, verdict, explanation, sources,
            ai_suggestion_id, responsibility, is_final, approval_status, time_spent_secs, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            verdict.id,
            verdict.claim_id,
            verdict.fact_checker_id,
            verdict.verdict.as_str(),
            verdict.explanation,
            encode_sources(&verdict.sources)?,
            verdict.ai_suggestion_id,
            verdict.responsibility.as_str(),
            verdict.is_final,
            verdict.approval_status.as_str(),
            verdict.time_spent_secs,
            to_micros(verdict.created_at),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn get_verdict(conn: &Connection, id: &str) -> Result<Option<Verdict>, StorageError> {
    let sql = format!("SELECT {VERDICT_COLUMNS} FROM verdicts WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql).map_err(to_storage_err)?;
    stmt.query_row(params![id], read_row)
        .optional()
        .map_err(to_storage_err)?
        .map(VerdictRow::decode)
        .transpose()
}

/// Every final verdict recorded for a claim. More than one is an
/// invariant breach the caller must surface.
pub fn final_verdicts_for_claim(
    conn: &Connection,
    claim_id: &str,
) -> Result<Vec<Verdict>, StorageError> {
    let sql = format!(
        "SELECT {VERDICT_COLUMNS} FROM verdicts WHERE claim_id = ?1 AND is_final = 1
         ORDER BY created_at ASC"
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(to_storage_err)?;
    let rows = stmt.query_map(params![claim_id], read_row).map_err(to_storage_err)?;
    rows.map(|r| r.map_err(to_storage_err).and_then(VerdictRow::decode))
        .collect()
}

/// Aggregate figures for one fact-checker's final verdicts.
#[derive(Debug, Clone, Default)]
pub struct CheckerAggregate {
    pub total: u64,
    pub avg_time_spent_secs: f64,
    pub distribution: Vec<(VerdictLabel, u64)>,
    /// Suggestion-linked verdicts, and how many kept the original AI label.
    pub ai_linked: u64,
    pub ai_agreed: u64,
}

pub fn checker_aggregate(
    conn: &Connection,
    fact_checker_id: &str,
) -> Result<CheckerAggregate, StorageError> {
    let (total, avg): (u64, Option<f64>) = conn
        .query_row(
            "SELECT COUNT(*), AVG(time_spent_secs) FROM verdicts
             WHERE fact_checker_id = ?1 AND is_final = 1",
            params![fact_checker_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(to_storage_err)?;

    let mut stmt = conn
        .prepare_cached(
            "SELECT verdict, COUNT(*) FROM verdicts
             WHERE fact_checker_id = ?1 AND is_final = 1
             GROUP BY verdict ORDER BY verdict",
        )
        .map_err(to_storage_err)?;
    let distribution = stmt
        .query_map(params![fact_checker_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
        })
        .map_err(to_storage_err)?
        .map(|r| {
            let (label, n) = r.map_err(to_storage_err)?;
            Ok((parse_enum(TABLE, &label)?, n))
        })
        .collect::<Result<Vec<_>, StorageError>>()?;

    // Revision 0 holds the untouched AI label even after an in-place edit.
    let (ai_linked, ai_agreed): (u64, u64) = conn
        .query_row(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN r.verdict = v.verdict THEN 1 ELSE 0 END), 0)
             FROM verdicts v
             JOIN ai_suggestion_revisions r
               ON r.suggestion_id = v.ai_suggestion_id AND r.revision = 0
             WHERE v.fact_checker_id = ?1 AND v.is_final = 1",
            params![fact_checker_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(to_storage_err)?;

    Ok(CheckerAggregate {
        total,
        avg_time_spent_secs: avg.unwrap_or(0.0),
        distribution,
        ai_linked,
        ai_agreed,
    })
}
