//! # verity-storage
//!
//! SQLite persistence for the claim-verification lifecycle: a serialized
//! writer plus read pool, `BEGIN IMMEDIATE` transactions, versioned
//! migrations, and one query module per table.

pub mod connection;
pub mod migrations;
pub mod queries;

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::ErrorCode as SqliteCode;

use verity_core::errors::StorageError;

pub use connection::DatabaseManager;

/// Classify a rusqlite error by its SQLite result code.
///
/// Busy, locked, unopenable, and I/O failures are `Busy` (retryable);
/// constraint and trigger aborts are `ConstraintViolation`.
pub fn to_storage_err(e: rusqlite::Error) -> StorageError {
    match e.sqlite_error_code() {
        Some(
            SqliteCode::DatabaseBusy
            | SqliteCode::DatabaseLocked
            | SqliteCode::CannotOpen
            | SqliteCode::SystemIoFailure
            | SqliteCode::DiskFull,
        ) => StorageError::Busy {
            message: e.to_string(),
        },
        Some(SqliteCode::ConstraintViolation) => StorageError::ConstraintViolation {
            message: e.to_string(),
        },
        _ => StorageError::Sqlite {
            message: e.to_string(),
        },
    }
}

/// Timestamps are stored as integer microseconds since the Unix epoch.
pub fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

pub fn from_micros(table: &str, micros: i64) -> Result<DateTime<Utc>, StorageError> {
    let secs = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    DateTime::<Utc>::from_timestamp(secs, nanos).ok_or_else(|| StorageError::CorruptRow {
        table: table.to_string(),
        details: format!("timestamp out of range: {micros}"),
    })
}

/// Calendar dates are stored as `YYYY-MM-DD` text.
pub fn parse_date(table: &str, text: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| StorageError::CorruptRow {
        table: table.to_string(),
        details: format!("bad date '{text}': {e}"),
    })
}

/// Decode a closed enum persisted as text.
pub fn parse_enum<T: FromStr>(table: &str, text: &str) -> Result<T, StorageError> {
    text.parse::<T>().map_err(|_| StorageError::CorruptRow {
        table: table.to_string(),
        details: format!("unknown value '{text}'"),
    })
}

/// Source lists are stored as JSON arrays.
pub fn encode_sources(sources: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(sources).map_err(|e| StorageError::Sqlite {
        message: format!("encode sources: {e}"),
    })
}

pub fn decode_sources(table: &str, json: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(json).map_err(|e| StorageError::CorruptRow {
        table: table.to_string(),
        details: format!("bad sources json: {e}"),
    })
}
