//! Type definitions for message history.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Identifier assigned by the history log, increasing in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Command the message arrived as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Privmsg,
    Notice,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Privmsg => "PRIVMSG",
            Self::Notice => "NOTICE",
        }
    }
}

/// A received channel message as the replacer sees it.
///
/// Everything is immutable except the replacer tag, which the log flips
/// through [`super::HistoryLog::mark_replacer_output`].
#[derive(Debug)]
pub struct HistoryEntry {
    pub id: MessageId,
    pub kind: EntryKind,
    /// Target channel as received.
    pub channel: String,
    /// Sender nickname.
    pub nick: String,
    /// Full sender prefix (nick!user@host), used for ignore checks.
    pub address: String,
    /// Message body as received; CTCP ACTIONs keep their `\x01` framing.
    pub text: String,
    pub received_at: DateTime<Utc>,
    replacer_tag: AtomicBool,
}

impl HistoryEntry {
    pub fn new(id: MessageId, message: NewMessage) -> Self {
        Self {
            id,
            kind: message.kind,
            channel: message.channel,
            nick: message.nick,
            address: message.address,
            text: message.text,
            received_at: Utc::now(),
            replacer_tag: AtomicBool::new(message.replacer_output),
        }
    }

    /// Milliseconds between receipt and `now`.
    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        (now - self.received_at).num_milliseconds()
    }

    /// Whether this entry was a directive or replacer output.
    pub fn is_replacer_tagged(&self) -> bool {
        self.replacer_tag.load(Ordering::Acquire)
    }

    pub(super) fn set_replacer_tag(&self) {
        self.replacer_tag.store(true, Ordering::Release);
    }
}

/// Input for [`super::HistoryLog::append`]; the log assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub kind: EntryKind,
    pub channel: String,
    pub nick: String,
    pub address: String,
    pub text: String,
    /// Record the message as replacer output from the start.
    pub replacer_output: bool,
}

impl NewMessage {
    /// A PRIVMSG from `address` (a `nick!user@host` mask) to `channel`.
    pub fn privmsg(channel: &str, address: &str, text: &str) -> Self {
        let nick = address.split_once('!').map_or(address, |(nick, _)| nick);
        Self {
            kind: EntryKind::Privmsg,
            channel: channel.to_string(),
            nick: nick.to_string(),
            address: address.to_string(),
            text: text.to_string(),
            replacer_output: false,
        }
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn as_replacer_output(mut self) -> Self {
        self.replacer_output = true;
        self
    }
}
