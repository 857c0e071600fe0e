//! Directive parsing.
//!
//! A directive is a channel message of the form
//!
//! ```text
//! [<nick>: ]s/<pattern>/<replacement>/[<flags>]
//! ```
//!
//! where the optional nick separator may be `:` or `,` and must be
//! followed by a space. Recognised flags are `g` (replace every match)
//! and `i` (case-insensitive); other letters are accepted and ignored.
//! `/` is the only delimiter and cannot be escaped inside a field.

use fancy_regex::{Regex as PatternRegex, RegexBuilder};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

use super::template::{Template, TemplateError};
use crate::config::ReplacerConfig;

static GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<nick>.+?)[:,] )?s/(?P<pattern>[^/]*)/(?P<replacement>[^/]*)/(?P<flags>[A-Za-z]*)$",
    )
    .expect("directive grammar is a valid regex")
});

/// Why a message could not be compiled into a directive.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The message does not have directive shape.
    #[error("no match")]
    NoMatch,
    /// The pattern is not a valid regular expression.
    #[error("{0}")]
    Pattern(Box<fancy_regex::Error>),
    /// The replacement references a group the pattern lacks.
    #[error("{0}")]
    Replacement(#[from] TemplateError),
}

/// Limits applied when compiling user patterns.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    pub backtrack_limit: usize,
}

impl CompileOptions {
    pub fn from_config(config: &ReplacerConfig) -> Self {
        Self {
            backtrack_limit: config.backtrack_limit,
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::from_config(&ReplacerConfig::default())
    }
}

/// A parsed, compiled `s///` directive.
#[derive(Debug, Clone)]
pub struct Directive {
    target_nick: Option<String>,
    pattern: Arc<PatternRegex>,
    replacement: Template,
    replace_all: bool,
    case_insensitive: bool,
}

impl Directive {
    /// Cheap shape check, without compiling anything.
    pub fn is_trigger(text: &str) -> bool {
        GRAMMAR.is_match(&regex::escape(text))
    }

    /// Parse and compile `text`.
    ///
    /// Deterministic: the same text and options yield the same directive
    /// or the same error.
    pub fn parse(text: &str, options: &CompileOptions) -> Result<Self, ParseError> {
        let escaped = regex::escape(text);
        let caps = GRAMMAR.captures(&escaped).ok_or(ParseError::NoMatch)?;
        let field = |name: &str| caps.name(name).map(|m| unescape(m.as_str()));

        let target_nick = field("nick");
        let pattern = field("pattern").unwrap_or_default();
        let replacement = field("replacement").unwrap_or_default();
        let flags = field("flags").unwrap_or_default();

        let replace_all = flags.contains('g');
        let case_insensitive = flags.contains('i');

        let source = if case_insensitive {
            format!("(?i){pattern}")
        } else {
            pattern
        };
        let pattern = RegexBuilder::new(&source)
            .backtrack_limit(options.backtrack_limit)
            .build()
            .map_err(|e| ParseError::Pattern(Box::new(e)))?;
        let replacement = Template::parse(&replacement, &pattern)?;

        Ok(Self {
            target_nick,
            pattern: Arc::new(pattern),
            replacement,
            replace_all,
            case_insensitive,
        })
    }

    /// The nick the directive is addressed to, if any. Not yet validated.
    pub fn target_nick(&self) -> Option<&str> {
        self.target_nick.as_deref()
    }

    pub fn pattern(&self) -> &Arc<PatternRegex> {
        &self.pattern
    }

    pub fn replacement(&self) -> &Template {
        &self.replacement
    }

    pub fn replace_all(&self) -> bool {
        self.replace_all
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

/// Inverse of [`regex::escape`].
fn unescape(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(next) = chars.next()
        {
            out.push(next);
            continue;
        }
        out.push(c);
    }
    out
}
