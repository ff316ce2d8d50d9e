//! Versioned schema migrations tracked by `PRAGMA user_version`.

pub mod v001_claims;
pub mod v002_points;
pub mod v003_notifications;
pub mod v004_suggestion_revisions;

use rusqlite::Connection;
use verity_core::errors::StorageError;

use crate::to_storage_err;

/// All migrations in application order.
pub const MIGRATIONS: &[(u32, &str)] = &[
    (1, v001_claims::MIGRATION_SQL),
    (2, v002_points::MIGRATION_SQL),
    (3, v003_notifications::MIGRATION_SQL),
    (4, v004_suggestion_revisions::MIGRATION_SQL),
];

/// Latest schema version.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|(v, _)| *v).unwrap_or(0)
}

/// Current schema version of a database.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(to_storage_err)
}

/// Apply every migration newer than the database's version, each in its
/// own transaction.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current = current_version(conn)?;
    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StorageError::MigrationFailed {
                version: *version,
                reason: format!("begin: {e}"),
            })?;
        tx.execute_batch(sql)
            .map_err(|e| StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })?;
        tx.pragma_update(None, "user_version", version)
            .map_err(|e| StorageError::MigrationFailed {
                version: *version,
                reason: format!("set user_version: {e}"),
            })?;
        tx.commit().map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: format!("commit: {e}"),
        })?;
        tracing::info!(version, "applied migration");
    }
    Ok(())
}
