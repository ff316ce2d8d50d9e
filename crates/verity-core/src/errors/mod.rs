//! Error handling for Verity.
//! One error enum per layer, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod storage_error;
pub mod verity_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use storage_error::StorageError;
pub use verity_error::{VerityError, VerityResult};
