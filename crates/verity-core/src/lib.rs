//! # verity-core
//!
//! Foundation crate for the Verity claim-verification system.
//! Defines the closed domain enums, the claim transition table, errors,
//! config, constants, and the collaborator traits. Every other crate in
//! the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::VerityConfig;
pub use errors::{ErrorCode, StorageError, VerityError, VerityResult};
pub use models::{
    Category, Claim, ClaimStatus, Principal, Priority, Responsibility, Role, VerdictLabel,
};
