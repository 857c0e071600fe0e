//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: the root [`Config`] and bot identity ([`BotConfig`])
//! - [`replacer`]: replacer defaults, per-channel overrides and the resolved [`ChannelPolicy`]
//! - [`history`]: in-memory history sizing ([`HistoryConfig`])
//! - [`ignore`]: hostmask ignore list ([`IgnoreConfig`])
//! - [`validation`]: startup checks

mod defaults;
mod history;
mod ignore;
mod replacer;
mod types;
pub mod validation;

pub use history::HistoryConfig;
pub use ignore::IgnoreConfig;
pub use replacer::{ChannelOverride, ChannelPolicy, ReplacerConfig};
pub use types::{BotConfig, Config, ConfigError};
pub use validation::{ValidationError, validate};
