//! Ignore list lookups.

use slirc_text::{Casemapping, HostmaskPattern};

use crate::config::IgnoreConfig;

/// Membership test for the bot's ignore list.
pub trait IgnoreCheck: Send + Sync {
    /// Whether messages from `address` (`nick!user@host`) are ignored.
    fn is_ignored(&self, address: &str) -> bool;
}

/// Nobody is ignored.
pub struct NoIgnores;

impl IgnoreCheck for NoIgnores {
    fn is_ignored(&self, _address: &str) -> bool {
        false
    }
}

/// Wildcard hostmask ignore list.
#[derive(Debug, Clone, Default)]
pub struct HostmaskIgnores {
    patterns: Vec<HostmaskPattern>,
}

impl HostmaskIgnores {
    pub fn new<I, S>(masks: I, casemapping: Casemapping) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: masks
                .into_iter()
                .map(|mask| HostmaskPattern::new(mask.as_ref(), casemapping))
                .collect(),
        }
    }

    pub fn from_config(config: &IgnoreConfig, casemapping: Casemapping) -> Self {
        Self::new(&config.masks, casemapping)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl IgnoreCheck for HostmaskIgnores {
    fn is_ignored(&self, address: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(address))
    }
}
