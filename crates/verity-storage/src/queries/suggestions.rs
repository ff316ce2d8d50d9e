//! Queries for ai_suggestions and the append-only revision log.

use rusqlite::{params, Connection, OptionalExtension, Row};

use verity_core::errors::StorageError;
use verity_core::models::{AiOutput, AiSuggestion, SuggestionAuthor, SuggestionRevision};

use crate::{decode_sources, encode_sources, from_micros, parse_enum, to_micros, to_storage_err};

const TABLE: &str = "ai_suggestions";
const REVISIONS: &str = "ai_suggestion_revisions";

struct SuggestionRow {
    id: String,
    claim_id: String,
    verdict: String,
    confidence: f64,
    explanation: String,
    sources: String,
    edited_by_human: bool,
    edited_by: Option<String>,
    edited_at: Option<i64>,
    created_at: i64,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<SuggestionRow> {
    Ok(SuggestionRow {
        id: row.get(0)?,
        claim_id: row.get(1)?,
        verdict: row.get(2)?,
        confidence: row.get(3)?,
        explanation: row.get(4)?,
        sources: row.get(5)?,
        edited_by_human: row.get(6)?,
        edited_by: row.get(7)?,
        edited_at: row.get(8)?,
        created_at: row.get(9)?,
    })
}

impl SuggestionRow {
    fn decode(self) -> Result<AiSuggestion, StorageError> {
        Ok(AiSuggestion {
            verdict: parse_enum(TABLE, &self.verdict)?,
            sources: decode_sources(TABLE, &self.sources)?,
            edited_at: self
                .edited_at
                .map(|us| from_micros(TABLE, us))
                .transpose()?,
            created_at: from_micros(TABLE, self.created_at)?,
            id: self.id,
            claim_id: self.claim_id,
            confidence: self.confidence,
            explanation: self.explanation,
            edited_by_human: self.edited_by_human,
            edited_by: self.edited_by,
        })
    }
}

pub fn insert_suggestion(conn: &Connection, suggestion: &AiSuggestion) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO ai_suggestions (id, claim_id, verdict, confidence, explanation, sources,
            edited_by_human, edited_by, edited_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            suggestion.id,
            suggestion.claim_id,
            suggestion.verdict.as_str(),
            suggestion.confidence,
            suggestion.explanation,
            encode_sources(&suggestion.sources)?,
            suggestion.edited_by_human,
            suggestion.edited_by,
            suggestion.edited_at.map(to_micros),
            to_micros(suggestion.created_at),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn get_by_claim(conn: &Connection, claim_id: &str) -> Result<Option<AiSuggestion>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, claim_id, verdict, confidence, explanation, sources,
                    edited_by_human, edited_by, edited_at, created_at
             FROM ai_suggestions WHERE claim_id = ?1",
        )
        .map_err(to_storage_err)?;
    stmt.query_row(params![claim_id], read_row)
        .optional()
        .map_err(to_storage_err)?
        .map(SuggestionRow::decode)
        .transpose()
}

/// Overwrite the current content with a human edit.
///
/// Only an unedited suggestion can be edited; returns 0 rows otherwise.
pub fn apply_edit(
    conn: &Connection,
    suggestion_id: &str,
    content: &AiOutput,
    editor_id: &str,
    now_us: i64,
) -> Result<usize, StorageError> {
    conn.execute(
        "UPDATE ai_suggestions
         SET verdict = ?2, explanation = ?3, sources = ?4,
             edited_by_human = 1, edited_by = ?5, edited_at = ?6
         WHERE id = ?1 AND edited_by_human = 0",
        params![
            suggestion_id,
            content.verdict.as_str(),
            content.explanation,
            encode_sources(&content.sources)?,
            editor_id,
            now_us,
        ],
    )
    .map_err(to_storage_err)
}

pub fn insert_revision(conn: &Connection, revision: &SuggestionRevision) -> Result<(), StorageError> {
    let (kind, author_id) = match &revision.author {
        SuggestionAuthor::Ai => ("ai", None),
        SuggestionAuthor::Human(id) => ("human", Some(id.as_str())),
    };
    conn.execute(
        "INSERT INTO ai_suggestion_revisions (suggestion_id, revision, author_kind, author_id,
            verdict, confidence, explanation, sources, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            revision.suggestion_id,
            revision.revision,
            kind,
            author_id,
            revision.content.verdict.as_str(),
            revision.content.confidence,
            revision.content.explanation,
            encode_sources(&revision.content.sources)?,
            to_micros(revision.created_at),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Next free revision number for a suggestion.
pub fn next_revision(conn: &Connection, suggestion_id: &str) -> Result<u32, StorageError> {
    conn.query_row(
        "SELECT COALESCE(MAX(revision) + 1, 0) FROM ai_suggestion_revisions WHERE suggestion_id = ?1",
        params![suggestion_id],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Revisions oldest first.
pub fn list_revisions(
    conn: &Connection,
    suggestion_id: &str,
) -> Result<Vec<SuggestionRevision>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT suggestion_id, revision, author_kind, author_id, verdict, confidence,
                    explanation, sources, created_at
             FROM ai_suggestion_revisions WHERE suggestion_id = ?1
             ORDER BY revision ASC",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![suggestion_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, i64>(8)?,
            ))
        })
        .map_err(to_storage_err)?;

    rows.map(|r| {
        let (suggestion_id, revision, kind, author_id, verdict, confidence, explanation, sources, at) =
            r.map_err(to_storage_err)?;
        let author = match (kind.as_str(), author_id) {
            ("ai", _) => SuggestionAuthor::Ai,
            ("human", Some(id)) => SuggestionAuthor::Human(id),
            (other, _) => {
                return Err(StorageError::CorruptRow {
                    table: REVISIONS.to_string(),
                    details: format!("bad author '{other}' on revision {revision}"),
                })
            }
        };
        Ok(SuggestionRevision {
            suggestion_id,
            revision,
            author,
            content: AiOutput {
                verdict: parse_enum(REVISIONS, &verdict)?,
                confidence,
                explanation,
                sources: decode_sources(REVISIONS, &sources)?,
            },
            created_at: from_micros(REVISIONS, at)?,
        })
    })
    .collect()
}
