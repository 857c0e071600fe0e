//! Core configuration types and loading.

use serde::{Deserialize, Deserializer};
use slirc_text::Casemapping;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use super::defaults::default_bot_nick;
use super::history::HistoryConfig;
use super::ignore::IgnoreConfig;
use super::replacer::{ChannelOverride, ChannelPolicy, ReplacerConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Replacer configuration. Every table is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bot identity.
    #[serde(default)]
    pub bot: BotConfig,
    /// Network-wide replacer behaviour.
    #[serde(default)]
    pub replacer: ReplacerConfig,
    /// History sizing.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Ignored hostmasks.
    #[serde(default)]
    pub ignore: IgnoreConfig,
    /// Per-channel overrides keyed by channel name.
    #[serde(default)]
    pub channels: HashMap<String, ChannelOverride>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the policy for `channel`, matching override keys under the
    /// configured casemapping.
    pub fn policy_for(&self, channel: &str) -> ChannelPolicy {
        let base = self.replacer.base_policy();
        self.channels
            .iter()
            .find(|(name, _)| self.bot.casemapping.eq_ignore_case(name, channel))
            .map_or(base, |(_, over)| over.apply(base))
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Nick used as the source of the bot's own replies (default: "replacer").
    #[serde(default = "default_bot_nick")]
    pub nick: String,
    /// Network `CASEMAPPING` (default: rfc1459).
    #[serde(default, deserialize_with = "deserialize_casemapping")]
    pub casemapping: Casemapping,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            nick: default_bot_nick(),
            casemapping: Casemapping::default(),
        }
    }
}

fn deserialize_casemapping<'de, D>(deserializer: D) -> Result<Casemapping, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.bot.nick, "replacer");
        assert_eq!(config.bot.casemapping, Casemapping::Rfc1459);
        assert_eq!(config.history.max_length, 1000);
        assert_eq!(config.replacer.timeout_ms, 50);
        assert!(config.ignore.masks.is_empty());
        assert_eq!(config.policy_for("#any"), ChannelPolicy::default());
    }

    #[test]
    fn test_channel_override_lookup_is_case_insensitive() {
        let config: Config = toml::from_str(
            r##"
[replacer]
bold_replacement_text = false

[channels."#Quiet[1]"]
display_errors = false
"##,
        )
        .unwrap();

        let quiet = config.policy_for("#quiet{1}");
        assert!(!quiet.display_errors);
        assert!(!quiet.bold_replacement_text);

        let other = config.policy_for("#loud");
        assert!(other.display_errors);
        assert!(!other.bold_replacement_text);
    }

    #[test]
    fn test_bad_casemapping_is_a_parse_error() {
        let result: Result<Config, _> = toml::from_str("[bot]\ncasemapping = \"klingon\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[bot]\nnick = \"fixer\"\n\n[replacer]\ntimeout_ms = 75\n\n[ignore]\nmasks = [\"*!*@spam\"]"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.bot.nick, "fixer");
        assert_eq!(config.replacer.timeout_ms, 75);
        assert_eq!(config.ignore.masks, vec!["*!*@spam".to_string()]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/replacer.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
