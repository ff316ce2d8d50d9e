//! V002: append-only points ledger and the cached per-user summary.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS points_ledger (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    points INTEGER NOT NULL,
    activity_type TEXT NOT NULL CHECK (activity_type IN (
        'registration', 'daily_login', 'streak_bonus', 'claim_submitted',
        'first_claim', 'verdict_submitted', 'manual')),
    description TEXT NOT NULL,
    created_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_points_ledger_user ON points_ledger(user_id, created_at DESC);

CREATE TRIGGER IF NOT EXISTS points_ledger_no_update
BEFORE UPDATE ON points_ledger
BEGIN
    SELECT RAISE(ABORT, 'points ledger is append-only');
END;

CREATE TRIGGER IF NOT EXISTS points_ledger_no_delete
BEFORE DELETE ON points_ledger
BEGIN
    SELECT RAISE(ABORT, 'points ledger is append-only');
END;

-- Rollup of points_ledger. total_points is only ever bumped in SQL.
CREATE TABLE IF NOT EXISTS user_points (
    user_id TEXT PRIMARY KEY,
    total_points INTEGER NOT NULL DEFAULT 0,
    current_streak INTEGER NOT NULL DEFAULT 0,
    longest_streak INTEGER NOT NULL DEFAULT 0,
    last_activity_date TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_user_points_total ON user_points(total_points DESC);
"#;
