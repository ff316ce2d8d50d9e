//! Top-level Verity configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ClaimsConfig, LoggingConfig, PointsConfig, StorageConfig, TrendingConfig};
use crate::errors::ConfigError;

/// Project config file name looked up in the root directory.
pub const CONFIG_FILE_NAME: &str = "verity.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`VERITY_*`)
/// 2. Project config (`verity.toml` in the root directory)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VerityConfig {
    pub claims: ClaimsConfig,
    pub points: PointsConfig,
    pub trending: TrendingConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl VerityConfig {
    /// Load configuration with layered resolution and validate the result.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let project_config_path = root.join(CONFIG_FILE_NAME);
        let mut config = if project_config_path.exists() {
            Self::from_file(&project_config_path)?
        } else {
            Self::default()
        };

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a TOML file. Missing keys take their defaults; unknown keys
    /// are ignored.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &VerityConfig) -> Result<(), ConfigError> {
        fn invalid(field: &str, message: &str) -> ConfigError {
            ConfigError::ValidationFailed {
                field: field.to_string(),
                message: message.to_string(),
            }
        }

        if config.claims.max_text_len == 0 {
            return Err(invalid("claims.max_text_len", "must be greater than 0"));
        }
        if config.claims.escalate_high_at < 2 {
            return Err(invalid("claims.escalate_high_at", "must be at least 2"));
        }
        if config.claims.escalate_urgent_at < config.claims.escalate_high_at {
            return Err(invalid(
                "claims.escalate_urgent_at",
                "must not be below claims.escalate_high_at",
            ));
        }
        if config.points.server_utc_offset_minutes.abs() > 18 * 60 {
            return Err(invalid(
                "points.server_utc_offset_minutes",
                "must be within +/- 1080 minutes",
            ));
        }
        if config.points.streak_bonus_interval == 0 {
            return Err(invalid("points.streak_bonus_interval", "must be greater than 0"));
        }
        if !(config.trending.half_life_hours.is_finite() && config.trending.half_life_hours > 0.0)
        {
            return Err(invalid("trending.half_life_hours", "must be a positive number"));
        }
        if !config.trending.threshold.is_finite() || config.trending.threshold < 0.0 {
            return Err(invalid("trending.threshold", "must be a non-negative number"));
        }
        if !(1..=8).contains(&config.storage.read_pool_size) {
            return Err(invalid("storage.read_pool_size", "must be between 1 and 8"));
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `VERITY_STORAGE_PATH`, `VERITY_POINTS_SERVER_UTC_OFFSET_MINUTES`, etc.
    fn apply_env_overrides(config: &mut VerityConfig) {
        if let Ok(val) = std::env::var("VERITY_STORAGE_PATH") {
            config.storage.path = Some(val);
        }
        if let Ok(val) = std::env::var("VERITY_STORAGE_READ_POOL_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.storage.read_pool_size = v;
            }
        }
        if let Ok(val) = std::env::var("VERITY_POINTS_SERVER_UTC_OFFSET_MINUTES") {
            if let Ok(v) = val.parse::<i32>() {
                config.points.server_utc_offset_minutes = v;
            }
        }
        if let Ok(val) = std::env::var("VERITY_TRENDING_THRESHOLD") {
            if let Ok(v) = val.parse::<f64>() {
                config.trending.threshold = v;
            }
        }
        if let Ok(val) = std::env::var("VERITY_LOG_LEVEL") {
            config.logging.level = val;
        }
        if let Ok(val) = std::env::var("VERITY_LOG_JSON") {
            if let Ok(v) = val.parse::<bool>() {
                config.logging.json = v;
            }
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
