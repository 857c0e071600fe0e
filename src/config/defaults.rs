//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_bot_nick() -> String {
    "replacer".to_string()
}

// =============================================================================
// Replacer Defaults
// =============================================================================

/// Wall-clock budget for each regex match and each substitution.
pub fn default_timeout_ms() -> u64 {
    50
}

/// Backtracking steps allowed per regex run before the engine gives up.
pub fn default_backtrack_limit() -> usize {
    1_000_000
}

pub fn default_nick_max_len() -> usize {
    slirc_text::DEFAULT_NICK_MAX_LEN
}

// =============================================================================
// History Defaults
// =============================================================================

pub fn default_history_max_length() -> usize {
    1000
}
