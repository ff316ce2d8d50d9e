//! Top-level error for every lifecycle operation.

use super::error_code::{self, ErrorCode};
use super::{ConfigError, StorageError};
use crate::models::ClaimStatus;

pub type VerityResult<T> = Result<T, VerityError>;

/// The caller-facing error taxonomy.
///
/// Every failure is raised before any mutation is committed; a failing
/// transaction is rolled back in full, so no variant implies partial state.
#[derive(Debug, thiserror::Error)]
pub enum VerityError {
    /// Bad input the caller can fix.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The claim already reached a terminal state.
    #[error("claim {claim_id} is already finalized")]
    AlreadyFinalized { claim_id: String },

    #[error("conflict: {reason}")]
    Conflict { reason: String },

    #[error("claim {claim_id} already has an AI suggestion")]
    DuplicateSuggestion { claim_id: String },

    #[error("claim {claim_id} cannot move from {from} to {to}")]
    InvalidTransition {
        claim_id: String,
        from: ClaimStatus,
        to: ClaimStatus,
    },

    /// Ownership or role violation.
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    /// The store is unreachable or busy. Retryable by the caller.
    #[error("dependency unavailable: {reason}")]
    DependencyUnavailable { reason: String },

    /// Invariant breach. Signals a bug.
    #[error("unrecoverable invariant breach: {details}")]
    Unrecoverable { details: String },

    #[error("storage error: {0}")]
    Storage(StorageError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl VerityError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn already_finalized(claim_id: impl Into<String>) -> Self {
        Self::AlreadyFinalized {
            claim_id: claim_id.into(),
        }
    }
}

impl From<StorageError> for VerityError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Busy { message } => Self::DependencyUnavailable { reason: message },
            StorageError::ConstraintViolation { message } => Self::Conflict { reason: message },
            StorageError::CorruptRow { table, details } => {
                tracing::error!(table = %table, %details, "corrupt row");
                Self::Unrecoverable {
                    details: format!("corrupt row in {table}: {details}"),
                }
            }
            other => Self::Storage(other),
        }
    }
}

impl ErrorCode for VerityError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => error_code::VALIDATION_ERROR,
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::AlreadyFinalized { .. } => error_code::ALREADY_FINALIZED,
            Self::Conflict { .. } => error_code::CONFLICT,
            Self::DuplicateSuggestion { .. } => error_code::DUPLICATE_SUGGESTION,
            Self::InvalidTransition { .. } => error_code::INVALID_TRANSITION,
            Self::Forbidden { .. } => error_code::FORBIDDEN,
            Self::DependencyUnavailable { .. } => error_code::DEPENDENCY_UNAVAILABLE,
            Self::Unrecoverable { .. } => error_code::UNRECOVERABLE,
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::DependencyUnavailable { .. } => true,
            Self::Storage(e) => e.is_retryable(),
            _ => false,
        }
    }
}
