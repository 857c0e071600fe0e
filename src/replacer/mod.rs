//! The replacer service.
//!
//! Ties directive parsing and history search together and applies the
//! per-channel policy: enable gate, error display, logging and metrics.
//!
//! - [`directive`]: `s///` grammar and compilation
//! - [`template`]: replacement templates and substitution
//! - [`engine`]: backward history search
//! - [`deadline`]: wall-clock bounds for regex work

pub mod deadline;
pub mod directive;
pub mod engine;
pub mod template;

pub use directive::{CompileOptions, Directive, ParseError};
pub use engine::{Engine, SearchOutcome, Trigger};

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{ChannelPolicy, Config};
use crate::error::ReplacerError;
use crate::history::HistoryLog;
use crate::ignore::{HostmaskIgnores, IgnoreCheck};
use crate::metrics;

/// Text to send back to the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A corrected message.
    Announce(String),
    /// An error or miss report, only produced when errors are displayed.
    Error(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Self::Announce(text) | Self::Error(text) => text,
        }
    }
}

/// Handles directive messages against a shared history.
pub struct Replacer {
    config: Arc<Config>,
    history: Arc<dyn HistoryLog>,
    ignores: Arc<dyn IgnoreCheck>,
    engine: Engine,
    compile: CompileOptions,
}

impl Replacer {
    pub fn new(
        config: Arc<Config>,
        history: Arc<dyn HistoryLog>,
        ignores: Arc<dyn IgnoreCheck>,
    ) -> Self {
        let engine = Engine::from_config(&config.replacer);
        let compile = CompileOptions::from_config(&config.replacer);
        Self {
            config,
            history,
            ignores,
            engine,
            compile,
        }
    }

    /// Build a replacer whose ignore list comes from `config`.
    pub fn from_config(config: Arc<Config>, history: Arc<dyn HistoryLog>) -> Self {
        let ignores = HostmaskIgnores::from_config(&config.ignore, config.bot.casemapping);
        if !ignores.is_empty() {
            debug!(masks = ignores.len(), "Loaded ignore list");
        }
        Self::new(config, history, Arc::new(ignores))
    }

    pub fn history(&self) -> &Arc<dyn HistoryLog> {
        &self.history
    }

    /// Handle one directive message, already recorded in history as
    /// `trigger.id`. Returns the reply to send, if any.
    pub fn handle(&self, trigger: &Trigger<'_>, text: &str) -> Option<Reply> {
        let policy = self.config.policy_for(trigger.channel);
        if !policy.enable {
            return None;
        }
        metrics::record_trigger();
        self.history.mark_replacer_output(trigger.id);

        let directive = match Directive::parse(text, &self.compile) {
            Ok(directive) => directive,
            Err(e) => return self.report(ReplacerError::from(e), trigger, &policy),
        };

        match self.engine.execute(
            &directive,
            trigger,
            self.history.as_ref(),
            &policy,
            self.ignores.as_ref(),
        ) {
            Ok(SearchOutcome::Skipped) => None,
            Ok(SearchOutcome::Replaced {
                announcement,
                matched,
                age_ms,
            }) => {
                info!(
                    channel = %trigger.channel,
                    nick = %trigger.nick,
                    matched = %matched,
                    age_ms,
                    replace_all = directive.replace_all(),
                    case_insensitive = directive.case_insensitive(),
                    "Replacement made"
                );
                metrics::record_replacement();
                Some(Reply::Announce(announcement))
            }
            Ok(SearchOutcome::NotFound { scanned }) => {
                debug!(channel = %trigger.channel, nick = %trigger.nick, scanned, "Search not found");
                metrics::record_not_found();
                policy.display_errors.then(|| {
                    Reply::Error(format!("Search not found in the last {scanned} messages."))
                })
            }
            Err(e) => self.report(e, trigger, &policy),
        }
    }

    fn report(&self, error: ReplacerError, trigger: &Trigger<'_>, policy: &ChannelPolicy) -> Option<Reply> {
        warn!(
            channel = %trigger.channel,
            nick = %trigger.nick,
            error = %error,
            code = error.error_code(),
            "Directive failed"
        );
        metrics::record_error(error.error_code());
        error.to_reply(policy.display_errors).map(Reply::Error)
    }
}
