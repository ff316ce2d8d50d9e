use serde::{Deserialize, Serialize};

/// Trending score recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingConfig {
    /// Hours for a claim's score to halve. Default: 48.
    pub half_life_hours: f64,
    /// Score at or above which a claim is flagged trending. Default: 3.0.
    pub threshold: f64,
    /// Minimum submissions before a claim can trend. Default: 3.
    pub min_submissions: u32,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            half_life_hours: 48.0,
            threshold: 3.0,
            min_submissions: 3,
        }
    }
}
