//! Server case mappings.
//!
//! Nicknames, channels and masks compare case-insensitively, but what
//! "case" means depends on the `CASEMAPPING` a network advertises.

use std::fmt;
use std::str::FromStr;

/// A `CASEMAPPING` ISUPPORT value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Casemapping {
    /// Only `A-Z` fold to `a-z`.
    Ascii,
    /// ASCII plus `[]\~` fold to `{}|^`.
    #[default]
    Rfc1459,
    /// ASCII plus `[]\` fold to `{}|` (`~` and `^` stay distinct).
    StrictRfc1459,
}

impl Casemapping {
    /// Fold one character.
    #[inline]
    pub const fn fold_char(self, c: char) -> char {
        match (self, c) {
            (_, 'A'..='Z') => (c as u8 + 32) as char,
            (Self::Ascii, _) => c,
            (_, '[') => '{',
            (_, ']') => '}',
            (_, '\\') => '|',
            (Self::Rfc1459, '~') => '^',
            _ => c,
        }
    }

    /// Case-insensitive equality under this mapping.
    pub fn eq_ignore_case(self, a: &str, b: &str) -> bool {
        a.len() == b.len()
            && a
                .chars()
                .zip(b.chars())
                .all(|(x, y)| self.fold_char(x) == self.fold_char(y))
    }

    /// The ISUPPORT token for this mapping.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Rfc1459 => "rfc1459",
            Self::StrictRfc1459 => "strict-rfc1459",
        }
    }
}

impl fmt::Display for Casemapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised `CASEMAPPING` token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown casemapping: {0}")]
pub struct UnknownCasemapping(pub String);

impl FromStr for Casemapping {
    type Err = UnknownCasemapping;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" => Ok(Self::Ascii),
            "rfc1459" => Ok(Self::Rfc1459),
            "strict-rfc1459" => Ok(Self::StrictRfc1459),
            _ => Err(UnknownCasemapping(s.to_string())),
        }
    }
}
