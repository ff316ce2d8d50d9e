/// Maximum number of sources attached to a suggestion or verdict.
pub const MAX_SOURCES: usize = 20;

/// Maximum length of a single source reference.
pub const MAX_SOURCE_LEN: usize = 2048;

/// Maximum length of a verdict or suggestion explanation.
pub const MAX_EXPLANATION_LEN: usize = 10_000;

/// Default page size for list operations.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Hard cap on any list operation.
pub const MAX_LIST_LIMIT: usize = 500;

/// Description attached to the lazy registration bonus.
pub const REGISTRATION_DESCRIPTION: &str = "welcome bonus";
