//! Error handling for the replacer.
//!
//! Every failure a directive can hit ends up as a [`ReplacerError`], which
//! knows its metrics label and the text (if any) to send back to the
//! channel.

use std::time::Duration;
use thiserror::Error;

use crate::replacer::deadline::{DeadlineError, Stage};
use crate::replacer::directive::ParseError;

/// Errors that abort a single directive.
#[derive(Debug, Error)]
pub enum ReplacerError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{stage} timed out after {}ms", .budget.as_millis())]
    Timeout { stage: Stage, budget: Duration },

    #[error("{stage} failed: {detail}")]
    Regex { stage: Stage, detail: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ReplacerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(ParseError::NoMatch) => "no_match",
            Self::Parse(ParseError::Pattern(_)) => "bad_pattern",
            Self::Parse(ParseError::Replacement(_)) => "bad_replacement",
            Self::Timeout { .. } => "timeout",
            Self::Regex { .. } => "regex_runtime",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Map a regex run-time failure. An exceeded backtrack limit counts
    /// as a timeout, since it is the same runaway pattern caught earlier.
    pub fn from_regex(stage: Stage, budget: Duration, error: fancy_regex::Error) -> Self {
        match error {
            fancy_regex::Error::RuntimeError(fancy_regex::RuntimeError::BacktrackLimitExceeded) => {
                Self::Timeout { stage, budget }
            }
            other => Self::Regex {
                stage,
                detail: other.to_string(),
            },
        }
    }

    pub fn from_deadline(stage: Stage, error: DeadlineError) -> Self {
        match error {
            DeadlineError::Elapsed(budget) => Self::Timeout { stage, budget },
            other => Self::Internal(other.to_string()),
        }
    }

    /// Channel text for this error, or `None` when errors are only logged.
    pub fn to_reply(&self, display_errors: bool) -> Option<String> {
        display_errors.then(|| format!("Replacer error: {self}"))
    }
}
