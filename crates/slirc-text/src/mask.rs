//! Wildcard hostmask matching.
//!
//! Masks use `*` (any run, including empty) and `?` (exactly one character)
//! and compare under a [`Casemapping`].

use crate::casemap::Casemapping;

/// A mask such as `*!*@*.example.org`, folded once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostmaskPattern {
    raw: String,
    folded: Vec<char>,
    casemapping: Casemapping,
}

impl HostmaskPattern {
    /// Fold and store `mask` for repeated matching.
    pub fn new(mask: &str, casemapping: Casemapping) -> Self {
        Self {
            raw: mask.to_string(),
            folded: mask.chars().map(|c| casemapping.fold_char(c)).collect(),
            casemapping,
        }
    }

    /// The mask as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Check a full `nick!user@host` (or any other text) against the mask.
    pub fn matches(&self, hostmask: &str) -> bool {
        let text: Vec<char> = hostmask
            .chars()
            .map(|c| self.casemapping.fold_char(c))
            .collect();
        glob(&self.folded, &text)
    }
}

/// One-shot wildcard match of `text` against `mask`.
///
/// ```
/// use slirc_text::{mask::wildcard_match, Casemapping};
///
/// assert!(wildcard_match("*!*@*.example.org", "bob!b@host.EXAMPLE.org", Casemapping::Rfc1459));
/// assert!(wildcard_match("b?b!*@*", "bob!x@y", Casemapping::Rfc1459));
/// assert!(!wildcard_match("*!admin@*", "bob!b@host", Casemapping::Rfc1459));
/// ```
pub fn wildcard_match(mask: &str, text: &str, casemapping: Casemapping) -> bool {
    HostmaskPattern::new(mask, casemapping).matches(text)
}

/// Greedy glob with single-star backtracking; linear in practice.
fn glob(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut resume: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                resume = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match resume {
                Some((star, consumed)) => {
                    p = star + 1;
                    t = consumed + 1;
                    resume = Some((star, consumed + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
