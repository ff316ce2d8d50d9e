//! Configuration system for Verity.
//! TOML-based, 3-layer resolution: env > project > defaults.

pub mod claims_config;
pub mod logging_config;
pub mod points_config;
pub mod storage_config;
pub mod trending_config;
pub mod verity_config;

pub use claims_config::ClaimsConfig;
pub use logging_config::LoggingConfig;
pub use points_config::PointsConfig;
pub use storage_config::StorageConfig;
pub use trending_config::TrendingConfig;
pub use verity_config::VerityConfig;
