//! V001: claims, AI suggestions, and the verdict ledger.

pub const MIGRATION_SQL: &str = r#"
-- Claims are never hard-deleted. Duplicate submissions fold into the
-- existing row via the unique text fingerprint.
CREATE TABLE IF NOT EXISTS claims (
    id TEXT PRIMARY KEY,
    submitter_id TEXT NOT NULL,
    text TEXT NOT NULL,
    text_fingerprint TEXT NOT NULL,
    category TEXT NOT NULL CHECK (category IN (
        'politics', 'health', 'science', 'economy',
        'technology', 'environment', 'society', 'other')),
    media_ref TEXT,
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN (
        'pending', 'ai_processing', 'ai_approved',
        'human_review', 'human_approved', 'rejected')),
    priority TEXT NOT NULL DEFAULT 'medium' CHECK (priority IN (
        'low', 'medium', 'high', 'urgent')),
    submission_count INTEGER NOT NULL DEFAULT 1 CHECK (submission_count >= 1),
    is_trending INTEGER NOT NULL DEFAULT 0,
    trending_score REAL,
    assigned_to TEXT,
    ai_suggestion_id TEXT,
    final_verdict_id TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
) STRICT;

CREATE UNIQUE INDEX IF NOT EXISTS idx_claims_fingerprint ON claims(text_fingerprint);
CREATE INDEX IF NOT EXISTS idx_claims_status ON claims(status, priority, created_at);
CREATE INDEX IF NOT EXISTS idx_claims_submitter ON claims(submitter_id);

-- At most one suggestion per claim.
CREATE TABLE IF NOT EXISTS ai_suggestions (
    id TEXT PRIMARY KEY,
    claim_id TEXT NOT NULL UNIQUE REFERENCES claims(id),
    verdict TEXT NOT NULL CHECK (verdict IN (
        'true', 'false', 'misleading', 'partially_true', 'unverifiable')),
    confidence REAL NOT NULL CHECK (confidence >= 0.0 AND confidence <= 1.0),
    explanation TEXT NOT NULL,
    sources TEXT NOT NULL DEFAULT '[]',
    edited_by_human INTEGER NOT NULL DEFAULT 0,
    edited_by TEXT,
    edited_at INTEGER,
    created_at INTEGER NOT NULL
) STRICT;

-- Final verdicts. Exactly one final row per claim; rows never change.
CREATE TABLE IF NOT EXISTS verdicts (
    id TEXT PRIMARY KEY,
    claim_id TEXT NOT NULL REFERENCES claims(id),
    fact_checker_id TEXT NOT NULL,
    verdict TEXT NOT NULL CHECK (verdict IN (
        'true', 'false', 'misleading', 'partially_true', 'unverifiable')),
    explanation TEXT NOT NULL,
    sources TEXT NOT NULL DEFAULT '[]',
    ai_suggestion_id TEXT REFERENCES ai_suggestions(id),
    responsibility TEXT NOT NULL CHECK (responsibility IN ('ai', 'org')),
    is_final INTEGER NOT NULL DEFAULT 1,
    approval_status TEXT NOT NULL CHECK (approval_status IN (
        'approved', 'edited', 'independent')),
    time_spent_secs INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    -- ai responsibility requires an untouched, linked suggestion
    CHECK (responsibility = 'org' OR (approval_status = 'approved' AND ai_suggestion_id IS NOT NULL))
) STRICT;

CREATE UNIQUE INDEX IF NOT EXISTS idx_verdicts_one_final
    ON verdicts(claim_id) WHERE is_final = 1;
CREATE INDEX IF NOT EXISTS idx_verdicts_checker ON verdicts(fact_checker_id);
CREATE INDEX IF NOT EXISTS idx_verdicts_created ON verdicts(created_at);

CREATE TRIGGER IF NOT EXISTS verdicts_no_update
BEFORE UPDATE ON verdicts
BEGIN
    SELECT RAISE(ABORT, 'verdicts are immutable');
END;

CREATE TRIGGER IF NOT EXISTS verdicts_no_delete
BEFORE DELETE ON verdicts
BEGIN
    SELECT RAISE(ABORT, 'verdicts are immutable');
END;
"#;
