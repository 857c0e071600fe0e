//! # slirc-text
//!
//! Small, dependency-light helpers for working with IRC message text:
//!
//! - strict RFC 2812 nickname validation ([`nick`])
//! - CTCP `ACTION` unwrapping and narration ([`ctcp`])
//! - the bold formatting code ([`format`])
//! - server case mappings ([`casemap`])
//! - wildcard hostmask matching ([`mask`])
//! - a minimal raw line parser ([`line`])
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_text::{ctcp, line::Line, nick};
//!
//! let line = Line::parse(":alice!a@example.org PRIVMSG #rust :\x01ACTION waves\x01").unwrap();
//! let source = line.source().unwrap();
//! assert_eq!(source.nick, "alice");
//! assert!(nick::is_strict_nick(source.nick, nick::DEFAULT_NICK_MAX_LEN));
//! assert_eq!(ctcp::unwrap_action(line.trailing().unwrap()), Some("waves"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod ctcp;
pub mod format;
pub mod line;
pub mod mask;
pub mod nick;

pub use self::casemap::Casemapping;
pub use self::line::{Line, LineError, Source};
pub use self::mask::HostmaskPattern;
pub use self::nick::{is_strict_nick, DEFAULT_NICK_MAX_LEN};
