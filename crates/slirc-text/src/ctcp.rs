//! CTCP `ACTION` handling.
//!
//! `/me waves` travels as `PRIVMSG #chan :\x01ACTION waves\x01`. Code that
//! edits the spoken text needs the inner part, and code that displays it
//! back needs the `* nick text` narration.
//!
//! # Reference
//! - CTCP specification: <https://modern.ircdocs.horse/ctcp.html>

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIM: char = '\x01';

const ACTION_PREFIX: &str = "\x01ACTION ";

/// Check if a message body is a CTCP `ACTION`.
#[inline]
pub fn is_action(text: &str) -> bool {
    unwrap_action(text).is_some()
}

/// Return the narrated text of a CTCP `ACTION`, or `None` for anything else.
///
/// Clients are inconsistent about the closing delimiter, so it is optional.
///
/// ```
/// use slirc_text::ctcp::unwrap_action;
///
/// assert_eq!(unwrap_action("\x01ACTION waves\x01"), Some("waves"));
/// assert_eq!(unwrap_action("\x01ACTION waves"), Some("waves"));
/// assert_eq!(unwrap_action("\x01VERSION\x01"), None);
/// assert_eq!(unwrap_action("waves"), None);
/// ```
pub fn unwrap_action(text: &str) -> Option<&str> {
    let body = text.strip_prefix(ACTION_PREFIX)?;
    Some(body.strip_suffix(CTCP_DELIM).unwrap_or(body))
}

/// Render an action the way clients display it: `* nick text`.
pub fn narrate_action(nick: &str, text: &str) -> String {
    format!("* {nick} {text}")
}
