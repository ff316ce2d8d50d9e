//! Storage-layer errors for SQLite operations.

use super::error_code::{self, ErrorCode};

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    /// Store is busy, locked, or unreachable. Retryable by the caller.
    #[error("store unavailable: {message}")]
    Busy { message: String },

    #[error("constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    /// A persisted row could not be decoded into its domain type.
    #[error("corrupt row in {table}: {details}")]
    CorruptRow { table: String, details: String },
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Busy { .. } => error_code::DEPENDENCY_UNAVAILABLE,
            Self::ConstraintViolation { .. } => error_code::CONFLICT,
            Self::CorruptRow { .. } => error_code::UNRECOVERABLE,
            Self::Sqlite { .. } | Self::MigrationFailed { .. } => error_code::STORAGE_ERROR,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}
