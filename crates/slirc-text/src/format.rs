//! IRC formatting codes.
//!
//! # Reference
//! - <https://modern.ircdocs.horse/formatting>

/// Bold toggle (`^B`).
pub const BOLD: char = '\x02';

/// Wrap `text` in bold toggles.
///
/// ```
/// assert_eq!(slirc_text::format::bold("hi"), "\x02hi\x02");
/// ```
pub fn bold(text: &str) -> String {
    format!("{BOLD}{text}{BOLD}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold() {
        assert_eq!(bold(""), "\x02\x02");
        assert_eq!(bold("x y"), "\x02x y\x02");
    }
}
