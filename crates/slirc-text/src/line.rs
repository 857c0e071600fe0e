//! Minimal raw IRC line parsing.
//!
//! Enough of RFC 1459 / IRCv3 framing to pull the source, command and
//! parameters out of a received line. Tags are kept as an opaque slice.

use thiserror::Error;

/// Errors from [`Line::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// Nothing but whitespace.
    #[error("empty line")]
    Empty,
    /// Tags or a prefix with nothing after them.
    #[error("line has tags or a prefix but no command")]
    MissingCommand,
}

/// A borrowed, parsed IRC line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// Raw IRCv3 tag section without the leading `@`.
    pub tags: Option<&'a str>,
    /// Prefix without the leading `:`.
    pub prefix: Option<&'a str>,
    /// Command as sent (use [`Line::is_command`] for comparison).
    pub command: &'a str,
    /// Middle parameters followed by the trailing one, if any.
    pub params: Vec<&'a str>,
    has_trailing: bool,
}

impl<'a> Line<'a> {
    /// Parse one line; a trailing CR/LF is ignored.
    pub fn parse(raw: &'a str) -> Result<Self, LineError> {
        let mut rest = raw.trim_end_matches(['\r', '\n']);
        if rest.trim().is_empty() {
            return Err(LineError::Empty);
        }

        let tags = match rest.strip_prefix('@') {
            Some(tagged) => {
                let (tags, after) = tagged.split_once(' ').ok_or(LineError::MissingCommand)?;
                rest = after.trim_start_matches(' ');
                Some(tags)
            }
            None => None,
        };

        let prefix = match rest.strip_prefix(':') {
            Some(prefixed) => {
                let (prefix, after) = prefixed.split_once(' ').ok_or(LineError::MissingCommand)?;
                rest = after.trim_start_matches(' ');
                Some(prefix)
            }
            None => None,
        };

        let (command, mut rest) = match rest.split_once(' ') {
            Some((command, after)) => (command, after),
            None => (rest, ""),
        };
        if command.is_empty() {
            return Err(LineError::MissingCommand);
        }

        let mut params = Vec::new();
        let mut has_trailing = false;
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing);
                has_trailing = true;
                break;
            }
            match rest.split_once(' ') {
                Some((param, after)) => {
                    params.push(param);
                    rest = after;
                }
                None => {
                    params.push(rest);
                    break;
                }
            }
        }

        Ok(Self {
            tags,
            prefix,
            command,
            params,
            has_trailing,
        })
    }

    /// Case-insensitive command comparison.
    #[inline]
    pub fn is_command(&self, name: &str) -> bool {
        self.command.eq_ignore_ascii_case(name)
    }

    /// First parameter (the target of PRIVMSG/NOTICE).
    pub fn target(&self) -> Option<&'a str> {
        self.params.first().copied()
    }

    /// The final parameter, whether or not it was sent with a leading `:`.
    pub fn trailing(&self) -> Option<&'a str> {
        if self.has_trailing || self.params.len() > 1 {
            self.params.last().copied()
        } else {
            None
        }
    }

    /// The user that sent the line, if the prefix names one.
    pub fn source(&self) -> Option<Source<'a>> {
        self.prefix.and_then(Source::parse)
    }
}

/// A user prefix, `nick!user@host`, borrowed from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source<'a> {
    /// The full prefix text.
    pub mask: &'a str,
    /// Nickname part.
    pub nick: &'a str,
    /// Ident part, empty when absent.
    pub user: &'a str,
    /// Host part, empty when absent.
    pub host: &'a str,
}

impl<'a> Source<'a> {
    /// Split a prefix into its parts. Server names (a dot before any `!`/`@`)
    /// yield `None`.
    pub fn parse(mask: &'a str) -> Option<Self> {
        let (before_host, host) = mask.split_once('@').unwrap_or((mask, ""));
        let (nick, user) = before_host.split_once('!').unwrap_or((before_host, ""));
        if nick.is_empty() || (user.is_empty() && host.is_empty() && nick.contains('.')) {
            return None;
        }
        Some(Self {
            mask,
            nick,
            user,
            host,
        })
    }
}

/// Channel prefixes this crate recognises.
pub const CHANNEL_PREFIXES: &[char] = &['#', '&', '+', '!'];

/// Check if a target names a channel rather than a user.
#[inline]
pub fn is_channel(target: &str) -> bool {
    target.starts_with(CHANNEL_PREFIXES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privmsg_with_prefix() {
        let line = Line::parse(":alice!al@example.org PRIVMSG #rust :hello there\r\n").unwrap();
        assert_eq!(line.prefix, Some("alice!al@example.org"));
        assert!(line.is_command("privmsg"));
        assert_eq!(line.target(), Some("#rust"));
        assert_eq!(line.trailing(), Some("hello there"));
    }

    #[test]
    fn test_tags_are_kept_opaque() {
        let line = Line::parse("@time=2024-01-01T00:00:00Z;msgid=x :a!b@c PRIVMSG #x :hi").unwrap();
        assert_eq!(line.tags, Some("time=2024-01-01T00:00:00Z;msgid=x"));
        assert_eq!(line.params, vec!["#x", "hi"]);
    }

    #[test]
    fn test_trailing_without_colon() {
        let line = Line::parse("PRIVMSG #x word").unwrap();
        assert_eq!(line.trailing(), Some("word"));
        let single = Line::parse("PING token").unwrap();
        assert_eq!(single.trailing(), None);
    }

    #[test]
    fn test_empty_trailing_is_kept() {
        let line = Line::parse(":a!b@c PRIVMSG #x :").unwrap();
        assert_eq!(line.trailing(), Some(""));
    }

    #[test]
    fn test_errors() {
        assert_eq!(Line::parse(""), Err(LineError::Empty));
        assert_eq!(Line::parse("   \r\n"), Err(LineError::Empty));
        assert_eq!(Line::parse(":onlyprefix"), Err(LineError::MissingCommand));
        assert_eq!(Line::parse("@tags"), Err(LineError::MissingCommand));
    }

    #[test]
    fn test_source_parsing() {
        let source = Source::parse("nick!user@host.example").unwrap();
        assert_eq!((source.nick, source.user, source.host), ("nick", "user", "host.example"));
        assert_eq!(Source::parse("bare").map(|s| s.nick), Some("bare"));
        assert!(Source::parse("irc.example.org").is_none());
        assert!(Source::parse("").is_none());
    }

    #[test]
    fn test_is_channel() {
        assert!(is_channel("#rust"));
        assert!(is_channel("&local"));
        assert!(!is_channel("alice"));
    }
}
