//! Strict nickname syntax.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: `nickname = ( letter / special ) *( letter / digit / special / "-" )`

/// Default maximum nickname length.
///
/// RFC 2812 says 9; every modern network advertises more through `NICKLEN`,
/// and 30 is the most common value.
pub const DEFAULT_NICK_MAX_LEN: usize = 30;

#[inline]
fn is_special(b: u8) -> bool {
    matches!(b, b'[' | b']' | b'\\' | b'`' | b'_' | b'^' | b'{' | b'|' | b'}')
}

#[inline]
fn is_leading(b: u8) -> bool {
    b.is_ascii_alphabetic() || is_special(b)
}

#[inline]
fn is_trailing(b: u8) -> bool {
    b.is_ascii_alphanumeric() || is_special(b) || b == b'-'
}

/// Check `nick` against the strict RFC grammar and a length limit.
///
/// Anything outside printable ASCII (spaces, control codes, UTF-8) fails, as
/// does an empty string or one longer than `max_len` bytes.
///
/// ```
/// use slirc_text::nick::is_strict_nick;
///
/// assert!(is_strict_nick("alice", 30));
/// assert!(is_strict_nick("[away]", 30));
/// assert!(!is_strict_nick("9lives", 30));
/// assert!(!is_strict_nick("two words", 30));
/// assert!(!is_strict_nick("toolong", 3));
/// ```
pub fn is_strict_nick(nick: &str, max_len: usize) -> bool {
    let bytes = nick.as_bytes();
    if bytes.len() > max_len {
        return false;
    }
    match bytes.split_first() {
        Some((&first, rest)) => is_leading(first) && rest.iter().all(|&b| is_trailing(b)),
        None => false,
    }
}
