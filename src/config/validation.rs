//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use slirc_text::is_strict_nick;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("replacer.timeout_ms must be greater than zero")]
    ZeroTimeout,
    #[error("replacer.backtrack_limit must be greater than zero")]
    ZeroBacktrackLimit,
    #[error("replacer.nick_max_len must be greater than zero")]
    ZeroNickLength,
    #[error("history.max_length must be greater than zero")]
    ZeroHistoryLength,
    #[error("bot.nick is not a valid nickname: '{0}'")]
    InvalidBotNick(String),
    #[error("ignore.masks[{0}] is empty")]
    EmptyIgnoreMask(usize),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let replacer = &config.replacer;

    if replacer.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if replacer.backtrack_limit == 0 {
        errors.push(ValidationError::ZeroBacktrackLimit);
    }
    if replacer.nick_max_len == 0 {
        errors.push(ValidationError::ZeroNickLength);
    }
    if config.history.max_length == 0 {
        errors.push(ValidationError::ZeroHistoryLength);
    }

    // The bot nick is checked against the same rule as directive targets.
    let nick_len = replacer.nick_max_len.max(1);
    if !is_strict_nick(&config.bot.nick, nick_len) {
        errors.push(ValidationError::InvalidBotNick(config.bot.nick.clone()));
    }

    for (index, mask) in config.ignore.masks.iter().enumerate() {
        if mask.trim().is_empty() {
            errors.push(ValidationError::EmptyIgnoreMask(index));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
