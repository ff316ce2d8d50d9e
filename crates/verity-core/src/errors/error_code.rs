//! Stable error codes surfaced to callers.

/// Trait giving every error a stable, machine-readable code.
pub trait ErrorCode {
    /// Returns the stable code for this error.
    fn error_code(&self) -> &'static str;

    /// Whether the caller may retry the same request unchanged.
    fn is_retryable(&self) -> bool {
        false
    }
}

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const ALREADY_FINALIZED: &str = "ALREADY_FINALIZED";
pub const CONFLICT: &str = "CONFLICT";
pub const DUPLICATE_SUGGESTION: &str = "DUPLICATE_SUGGESTION";
pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
pub const FORBIDDEN: &str = "FORBIDDEN";
pub const DEPENDENCY_UNAVAILABLE: &str = "DEPENDENCY_UNAVAILABLE";
pub const UNRECOVERABLE: &str = "UNRECOVERABLE";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
