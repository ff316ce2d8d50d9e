//! The engine handle: owns the database, the validated config, and the clock.
//!
//! Operations live in the component modules as further `impl VerityEngine`
//! blocks. The engine is `Send + Sync` and is meant to be shared via `Arc`.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use verity_core::errors::VerityResult;
use verity_core::traits::{Clock, SystemClock};
use verity_core::VerityConfig;
use verity_storage::DatabaseManager;

pub struct VerityEngine {
    db: DatabaseManager,
    config: VerityConfig,
    clock: Arc<dyn Clock>,
}

impl VerityEngine {
    /// Open a file-backed engine. The config is validated first.
    pub fn open(path: &Path, config: VerityConfig) -> VerityResult<Self> {
        VerityConfig::validate(&config)?;
        let db = DatabaseManager::open(path, &config.storage)?;
        tracing::info!(path = %path.display(), "verity engine opened");
        Ok(Self::assemble(db, config))
    }

    /// Open an in-memory engine (for testing).
    pub fn open_in_memory(config: VerityConfig) -> VerityResult<Self> {
        VerityConfig::validate(&config)?;
        let db = DatabaseManager::open_in_memory()?;
        Ok(Self::assemble(db, config))
    }

    /// Open at `config.storage.path`, or in memory when no path is set.
    pub fn from_config(config: VerityConfig) -> VerityResult<Self> {
        match config.storage.path.clone() {
            Some(path) => Self::open(Path::new(&path), config),
            None => Self::open_in_memory(config),
        }
    }

    fn assemble(db: DatabaseManager, config: VerityConfig) -> Self {
        Self {
            db,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &VerityConfig {
        &self.config
    }

    /// Direct access to storage, for maintenance such as checkpoints.
    pub fn db(&self) -> &DatabaseManager {
        &self.db
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn engine_is_shareable() {
        assert_send_sync::<VerityEngine>();
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut config = VerityConfig::default();
        config.trending.half_life_hours = 0.0;
        let err = VerityEngine::open_in_memory(config).err().unwrap();
        assert!(matches!(err, verity_core::VerityError::Config(_)));
    }

    #[test]
    fn from_config_without_path_is_in_memory() {
        let engine = VerityEngine::from_config(VerityConfig::default()).unwrap();
        assert!(engine.db().path().is_none());
    }
}
