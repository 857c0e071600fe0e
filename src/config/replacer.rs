//! Replacer behaviour and per-channel overrides.

use serde::Deserialize;
use std::time::Duration;

use super::defaults::{
    default_backtrack_limit, default_nick_max_len, default_timeout_ms, default_true,
};

/// Network-wide replacer settings; the `[replacer]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplacerConfig {
    /// Answer directives at all (default: true).
    #[serde(default = "default_true")]
    pub enable: bool,
    /// Echo parse errors, timeouts and misses to the channel (default: true).
    /// When false they are only logged.
    #[serde(default = "default_true")]
    pub display_errors: bool,
    /// Show the replacement text in bold (default: true).
    #[serde(default = "default_true")]
    pub bold_replacement_text: bool,
    /// Never match messages that were themselves directives or
    /// replacer output (default: true).
    #[serde(default = "default_true")]
    pub ignore_regex: bool,
    /// Budget in milliseconds for each match and each substitution (default: 50).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Backtracking steps per regex run (default: 1,000,000).
    /// Also bounds how long an abandoned, timed-out worker keeps running.
    #[serde(default = "default_backtrack_limit")]
    pub backtrack_limit: usize,
    /// Longest nickname accepted as a directive target (default: 30).
    #[serde(default = "default_nick_max_len")]
    pub nick_max_len: usize,
}

impl Default for ReplacerConfig {
    fn default() -> Self {
        Self {
            enable: true,
            display_errors: true,
            bold_replacement_text: true,
            ignore_regex: true,
            timeout_ms: default_timeout_ms(),
            backtrack_limit: default_backtrack_limit(),
            nick_max_len: default_nick_max_len(),
        }
    }
}

impl ReplacerConfig {
    /// The per-operation execution budget.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The network-wide policy before any channel override.
    pub fn base_policy(&self) -> ChannelPolicy {
        ChannelPolicy {
            enable: self.enable,
            display_errors: self.display_errors,
            bold_replacement_text: self.bold_replacement_text,
            ignore_regex: self.ignore_regex,
        }
    }
}

/// A `[channels."#name"]` table. Unset fields inherit from `[replacer]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelOverride {
    pub enable: Option<bool>,
    pub display_errors: Option<bool>,
    pub bold_replacement_text: Option<bool>,
    pub ignore_regex: Option<bool>,
}

impl ChannelOverride {
    /// Layer this override on top of `base`.
    pub fn apply(&self, base: ChannelPolicy) -> ChannelPolicy {
        ChannelPolicy {
            enable: self.enable.unwrap_or(base.enable),
            display_errors: self.display_errors.unwrap_or(base.display_errors),
            bold_replacement_text: self
                .bold_replacement_text
                .unwrap_or(base.bold_replacement_text),
            ignore_regex: self.ignore_regex.unwrap_or(base.ignore_regex),
        }
    }
}

/// The resolved switches for one channel, as the engine consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPolicy {
    pub enable: bool,
    pub display_errors: bool,
    pub bold_replacement_text: bool,
    pub ignore_regex: bool,
}

impl Default for ChannelPolicy {
    fn default() -> Self {
        ReplacerConfig::default().base_policy()
    }
}
