//! History storage configuration.

use serde::Deserialize;

use super::defaults::default_history_max_length;

/// In-memory history configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Messages kept across all channels; the oldest is evicted first (default: 1000).
    #[serde(default = "default_history_max_length")]
    pub max_length: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_length: default_history_max_length(),
        }
    }
}
