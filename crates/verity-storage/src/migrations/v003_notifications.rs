//! V003: per-user read watermark. Unread state is derived, never stored.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS notification_watermarks (
    user_id TEXT PRIMARY KEY,
    last_read_at INTEGER NOT NULL
) STRICT;
"#;
