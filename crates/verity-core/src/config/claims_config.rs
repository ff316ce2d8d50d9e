use serde::{Deserialize, Serialize};

/// Claim intake configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsConfig {
    /// Maximum claim text length in bytes. Default: 2000.
    pub max_text_len: usize,
    /// Submission count at which a duplicate escalates to `high`. Default: 5.
    pub escalate_high_at: u32,
    /// Submission count at which a duplicate escalates to `urgent`. Default: 10.
    pub escalate_urgent_at: u32,
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            max_text_len: 2000,
            escalate_high_at: 5,
            escalate_urgent_at: 10,
        }
    }
}
