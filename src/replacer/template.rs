//! Replacement templates.
//!
//! A template is compiled once per directive, against the directive's
//! regex, so that group references are checked before any history is
//! searched.
//!
//! Syntax:
//! - `\1` .. `\99`: numbered group (`\0` is the whole match)
//! - `\g<n>` / `\g<name>`: numbered or named group
//! - `\\`: a literal backslash
//! - `\c` for any other `c`: the character itself

use fancy_regex::{Captures, Regex};
use slirc_text::format::BOLD;
use thiserror::Error;

/// Errors raised while compiling a replacement template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("invalid group reference {0}")]
    UnknownGroup(usize),
    #[error("unknown group name '{0}'")]
    UnknownName(String),
    #[error("missing group name")]
    EmptyGroupName,
    #[error("missing > in group reference")]
    Unterminated,
    #[error("bad escape (end of replacement)")]
    TrailingBackslash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Group(usize),
}

/// A compiled replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Compile `raw` against the groups `regex` defines.
    pub fn parse(raw: &str, regex: &Regex) -> Result<Self, TemplateError> {
        let groups = regex.captures_len();
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '\\' {
                literal.push(c);
                continue;
            }
            let Some(next) = chars.next() else {
                return Err(TemplateError::TrailingBackslash);
            };

            let index = match next {
                d if d.is_ascii_digit() => {
                    let mut index = d as usize - '0' as usize;
                    if let Some(&d2) = chars.peek()
                        && d2.is_ascii_digit()
                    {
                        chars.next();
                        index = index * 10 + (d2 as usize - '0' as usize);
                    }
                    index
                }
                'g' if chars.peek() == Some(&'<') => {
                    chars.next();
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('>') => break,
                            Some(ch) => name.push(ch),
                            None => return Err(TemplateError::Unterminated),
                        }
                    }
                    resolve_group(&name, regex)?
                }
                other => {
                    literal.push(other);
                    continue;
                }
            };

            if index >= groups {
                return Err(TemplateError::UnknownGroup(index));
            }
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Group(index));
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Self { pieces })
    }

    /// The same template with its output wrapped in IRC bold.
    pub fn emboldened(&self) -> Self {
        let mut pieces = Vec::with_capacity(self.pieces.len() + 2);
        pieces.push(Piece::Literal(BOLD.to_string()));
        pieces.extend(self.pieces.iter().cloned());
        pieces.push(Piece::Literal(BOLD.to_string()));
        Self { pieces }
    }

    /// Append the expansion for one match to `out`. Groups that did not
    /// participate expand to nothing.
    pub fn expand(&self, captures: &Captures<'_>, out: &mut String) {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Group(index) => {
                    if let Some(group) = captures.get(*index) {
                        out.push_str(group.as_str());
                    }
                }
            }
        }
    }
}

fn resolve_group(name: &str, regex: &Regex) -> Result<usize, TemplateError> {
    if name.is_empty() {
        return Err(TemplateError::EmptyGroupName);
    }
    if let Ok(index) = name.parse::<usize>() {
        return Ok(index);
    }
    regex
        .capture_names()
        .position(|candidate| candidate == Some(name))
        .ok_or_else(|| TemplateError::UnknownName(name.to_string()))
}

/// Replace the first match of `regex` in `text` (every match when
/// `replace_all`), expanding `template` for each.
///
/// Errors only come from the regex engine at run time, e.g. an exceeded
/// backtrack limit.
pub fn substitute(
    regex: &Regex,
    template: &Template,
    text: &str,
    replace_all: bool,
) -> Result<String, fancy_regex::Error> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for captures in regex.captures_iter(text) {
        let captures = captures?;
        let Some(whole) = captures.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        template.expand(&captures, &mut out);
        last = whole.end();
        if !replace_all {
            break;
        }
    }

    out.push_str(&text[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    fn apply(pattern: &str, replacement: &str, text: &str, all: bool) -> String {
        let regex = re(pattern);
        let template = Template::parse(replacement, &regex).unwrap();
        substitute(&regex, &template, text, all).unwrap()
    }

    #[test]
    fn test_literal_replacement() {
        assert_eq!(apply("b", "c", "abba", false), "acba");
        assert_eq!(apply("b", "c", "abba", true), "acca");
        assert_eq!(apply("z", "c", "abba", true), "abba");
    }

    #[test]
    fn test_numbered_groups() {
        assert_eq!(apply(r"(\w+) (\w+)", r"\2 \1", "hello world", false), "world hello");
        assert_eq!(apply("(a)", r"[\0]", "cat", false), "c[a]t");
        assert_eq!(apply("(a)", r"\g<1>\g<1>", "cat", false), "caat");
    }

    #[test]
    fn test_named_groups() {
        assert_eq!(
            apply(r"(?P<first>\w+) (?P<second>\w+)", r"\g<second>-\g<first>", "ab cd", false),
            "cd-ab"
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(apply("a", r"\\", "cat", false), r"c\t");
        assert_eq!(apply("a", r"\n", "cat", false), "cnt");
    }

    #[test]
    fn test_non_participating_group_is_empty() {
        assert_eq!(apply("(x)?a", r"<\1>", "cat", false), "c<>t");
    }

    #[test]
    fn test_template_errors() {
        let regex = re("(a)");
        assert_eq!(Template::parse(r"\2", &regex), Err(TemplateError::UnknownGroup(2)));
        assert_eq!(Template::parse(r"\g<x>", &regex), Err(TemplateError::UnknownName("x".into())));
        assert_eq!(Template::parse(r"\g<1", &regex), Err(TemplateError::Unterminated));
        assert_eq!(Template::parse(r"\g<>", &regex), Err(TemplateError::EmptyGroupName));
        assert_eq!(Template::parse("a\\", &regex), Err(TemplateError::TrailingBackslash));
    }

    #[test]
    fn test_emboldened_wraps_each_replacement() {
        let regex = re("o");
        let template = Template::parse("0", &regex).unwrap().emboldened();
        assert_eq!(substitute(&regex, &template, "foo", true).unwrap(), "f\x020\x02\x020\x02");
    }

    #[test]
    fn test_empty_matches_advance() {
        assert_eq!(apply("x*", "-", "abc", true), "-a-b-c-");
    }
}
