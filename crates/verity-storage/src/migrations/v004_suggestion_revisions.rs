//! V004: append-only log of every suggestion version.
//!
//! Revision 0 is the raw AI output; later revisions are human edits. The
//! `ai_suggestions` row remains the current view.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS ai_suggestion_revisions (
    suggestion_id TEXT NOT NULL REFERENCES ai_suggestions(id),
    revision INTEGER NOT NULL,
    author_kind TEXT NOT NULL CHECK (author_kind IN ('ai', 'human')),
    author_id TEXT,
    verdict TEXT NOT NULL CHECK (verdict IN (
        'true', 'false', 'misleading', 'partially_true', 'unverifiable')),
    confidence REAL NOT NULL,
    explanation TEXT NOT NULL,
    sources TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (suggestion_id, revision)
) STRICT;

CREATE TRIGGER IF NOT EXISTS suggestion_revisions_no_update
BEFORE UPDATE ON ai_suggestion_revisions
BEGIN
    SELECT RAISE(ABORT, 'suggestion revisions are append-only');
END;
"#;
