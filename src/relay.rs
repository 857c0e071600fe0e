//! Raw IRC line handling.
//!
//! A [`Relay`] records every channel PRIVMSG and NOTICE it sees, hands
//! directives to the [`Replacer`], and records the bot's own replies as
//! replacer output so later directives cannot match them.

use slirc_text::ctcp;
use slirc_text::line::is_channel;
use slirc_text::{Line, LineError};
use std::sync::Arc;
use tracing::trace;

use crate::history::{EntryKind, MessageId, NewMessage};
use crate::replacer::{Directive, Replacer, Trigger};

/// A recorded directive waiting to be answered.
#[derive(Debug, Clone)]
pub struct PendingDirective {
    pub id: MessageId,
    pub channel: String,
    pub nick: String,
    pub text: String,
}

#[derive(Clone)]
pub struct Relay {
    replacer: Arc<Replacer>,
    bot_mask: String,
}

impl Relay {
    pub fn new(replacer: Arc<Replacer>, bot_nick: &str) -> Self {
        Self {
            replacer,
            bot_mask: format!("{bot_nick}!{bot_nick}@replacer"),
        }
    }

    /// Record one raw line. Returns the directive it carried, if any.
    ///
    /// Lines that are not channel PRIVMSG/NOTICE from a user are skipped.
    pub fn record(&self, raw: &str) -> Result<Option<PendingDirective>, LineError> {
        let line = Line::parse(raw)?;
        let kind = if line.is_command("PRIVMSG") {
            EntryKind::Privmsg
        } else if line.is_command("NOTICE") {
            EntryKind::Notice
        } else {
            return Ok(None);
        };

        let (Some(source), Some(channel), Some(text)) = (line.source(), line.target(), line.trailing()) else {
            return Ok(None);
        };
        if !is_channel(channel) {
            trace!(recipient = %channel, "Ignoring private message");
            return Ok(None);
        }

        let id = self
            .replacer
            .history()
            .append(NewMessage::privmsg(channel, source.mask, text).with_kind(kind));
        trace!(
            id = %id,
            kind = kind.as_str(),
            channel = %channel,
            action = ctcp::is_action(text),
            "Recorded message"
        );

        if kind == EntryKind::Privmsg && Directive::is_trigger(text) {
            Ok(Some(PendingDirective {
                id,
                channel: channel.to_string(),
                nick: source.nick.to_string(),
                text: text.to_string(),
            }))
        } else {
            Ok(None)
        }
    }

    /// Answer a directive. Blocking: regex work runs under the replacer's
    /// deadline. Returns the wire line to send, already recorded in history.
    pub fn respond(&self, pending: &PendingDirective) -> Option<String> {
        let trigger = Trigger {
            id: pending.id,
            channel: &pending.channel,
            nick: &pending.nick,
        };
        let reply = self.replacer.handle(&trigger, &pending.text)?;

        self.replacer.history().append(
            NewMessage::privmsg(&pending.channel, &self.bot_mask, reply.text()).as_replacer_output(),
        );
        Some(format!("PRIVMSG {} :{}", pending.channel, reply.text()))
    }
}
