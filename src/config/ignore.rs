//! Ignore list configuration.

use serde::Deserialize;

/// Hostmasks whose messages are never picked up by unaddressed corrections.
///
/// ```toml
/// [ignore]
/// masks = ["*!*@spam.example", "troll!*@*"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IgnoreConfig {
    /// Wildcard `nick!user@host` masks.
    #[serde(default)]
    pub masks: Vec<String>,
}
