use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path. `None` opens an in-memory store.
    pub path: Option<String>,
    /// Read connections in file-backed mode (1–8). Default: 4.
    pub read_pool_size: usize,
    /// SQLite busy timeout in milliseconds. Default: 5000.
    pub busy_timeout_ms: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            read_pool_size: 4,
            busy_timeout_ms: 5000,
        }
    }
}
