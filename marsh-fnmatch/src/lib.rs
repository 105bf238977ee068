// This file is part of marsh, a POSIX-compatible shell.
// Copyright (C) 2024 the marsh authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Shell glob pattern matching
//!
//! This crate compiles a shell pattern into a matcher backed by a regular
//! expression. Supported pattern elements:
//!
//! - `?` matching any single character
//! - `*` matching any (possibly empty) character sequence
//! - Bracket expressions (`[abc]`, `[!a-z]`, `[[:alpha:]]`), with `]`
//!   allowed as the first member and `!` or `^` negating
//!
//! A pattern is built from [`PatternChar`]s rather than plain characters:
//! a [`Literal`](PatternChar::Literal) character never acts as a special,
//! which is how quoting inside shell words is communicated. An unmatched
//! `[` silently becomes literal, as shells have always treated it.
//!
//! One pattern type serves every pattern context in the shell: pathname
//! expansion, `case` matching, and the `%`/`#`/`/` substitution operators.
//!
//! ```
//! use marsh_fnmatch::{Pattern, PatternChar};
//!
//! let pattern = Pattern::parse("*.tx?".chars().map(PatternChar::Normal)).unwrap();
//! assert!(pattern.is_match("notes.txt"));
//! assert!(!pattern.is_match("notes.md"));
//! ```

use regex::Regex;
use std::fmt::Write as _;
use thiserror::Error;

/// Character in a pattern
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PatternChar {
    /// Character that can have a special meaning
    Normal(char),
    /// Character that always stands for itself
    ///
    /// Quoted characters in the shell become literals, so `'*'` matches one
    /// asterisk rather than anything.
    Literal(char),
}

impl PatternChar {
    /// Returns the character value, dropping the distinction.
    #[must_use]
    pub const fn char_value(self) -> char {
        match self {
            PatternChar::Normal(c) | PatternChar::Literal(c) => c,
        }
    }
}

/// Error returned when a pattern cannot be compiled
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The underlying regular expression engine rejected the translation.
    #[error(transparent)]
    RegexError(#[from] regex::Error),
}

/// Compiled glob pattern
#[derive(Clone, Debug)]
pub struct Pattern {
    /// Compiled matcher; `None` when the pattern has no special characters
    regex: Option<Regex>,
    /// Literal rendition used when no special characters are present
    literal: String,
    /// Whether any special character survived compilation
    has_specials: bool,
    /// Whether the pattern starts with a literal `.`
    starts_with_period: bool,
}

impl Pattern {
    /// Compiles a pattern from pattern characters.
    pub fn parse<I>(chars: I) -> Result<Pattern, Error>
    where
        I: IntoIterator<Item = PatternChar>,
    {
        let chars: Vec<PatternChar> = chars.into_iter().collect();
        let literal: String = chars.iter().map(|c| c.char_value()).collect();
        let starts_with_period = literal.starts_with('.');

        let mut regex_text = String::from("(?s)^");
        let mut has_specials = false;
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                PatternChar::Normal('?') => {
                    regex_text.push('.');
                    has_specials = true;
                    i += 1;
                }
                PatternChar::Normal('*') => {
                    regex_text.push_str(".*");
                    has_specials = true;
                    i += 1;
                }
                PatternChar::Normal('[') => match translate_bracket(&chars[i..], &mut regex_text) {
                    Some(consumed) => {
                        has_specials = true;
                        i += consumed;
                    }
                    None => {
                        regex_text.push_str("\\[");
                        i += 1;
                    }
                },
                c => {
                    push_literal(&mut regex_text, c.char_value());
                    i += 1;
                }
            }
        }
        regex_text.push('$');

        let regex = if has_specials {
            Some(Regex::new(&regex_text)?)
        } else {
            None
        };
        Ok(Pattern {
            regex,
            literal,
            has_specials,
            starts_with_period,
        })
    }

    /// Tests whether the pattern matches the whole string.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(text),
            None => self.literal == text,
        }
    }

    /// Returns the pattern as a plain string if it has no special
    /// characters.
    ///
    /// Matching such a pattern is string equality, which lets callers skip
    /// directory scans during pathname expansion.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        if self.has_specials {
            None
        } else {
            Some(&self.literal)
        }
    }

    /// Whether the pattern begins with a literal `.`.
    ///
    /// Pathname expansion uses this to decide if the pattern may match
    /// hidden files.
    #[must_use]
    pub fn starts_with_period(&self) -> bool {
        self.starts_with_period
    }
}

/// Appends a regex-escaped character.
fn push_literal(out: &mut String, c: char) {
    if regex_syntax::is_meta_character(c) {
        out.push('\\');
    }
    out.push(c);
}

/// Translates a bracket expression starting at `chars[0] == '['`.
///
/// Returns the number of pattern characters consumed, or `None` if there is
/// no closing `]` and the `[` must be taken literally.
fn translate_bracket(chars: &[PatternChar], out: &mut String) -> Option<usize> {
    let mut i = 1;
    let negated = matches!(
        chars.get(i),
        Some(PatternChar::Normal('!') | PatternChar::Normal('^'))
    );
    if negated {
        i += 1;
    }
    let body_start = i;

    // Find the closing bracket; a `]` in the first position is a member.
    let mut end = None;
    let mut j = i;
    while j < chars.len() {
        match chars[j] {
            PatternChar::Normal(']') if j > body_start => {
                end = Some(j);
                break;
            }
            PatternChar::Normal('[')
                if matches!(chars.get(j + 1), Some(PatternChar::Normal(':'))) =>
            {
                // Skip over a character class so its `]` is not taken as
                // the closing bracket.
                let mut k = j + 2;
                while k + 1 < chars.len() {
                    if chars[k] == PatternChar::Normal(':')
                        && chars[k + 1] == PatternChar::Normal(']')
                    {
                        break;
                    }
                    k += 1;
                }
                j = k + 2;
            }
            _ => j += 1,
        }
    }
    let end = end?;

    let mut body = String::new();
    let mut k = body_start;
    while k < end {
        match chars[k] {
            PatternChar::Normal('[')
                if matches!(chars.get(k + 1), Some(PatternChar::Normal(':'))) =>
            {
                // Character class: copy verbatim, e.g. `[:alpha:]`.
                let mut class = String::from("[");
                let mut m = k + 1;
                while m < end {
                    class.push(chars[m].char_value());
                    if chars[m] == PatternChar::Normal(']') {
                        break;
                    }
                    m += 1;
                }
                body.push_str(&class);
                k = m + 1;
            }
            PatternChar::Normal('-') if k > body_start && k + 1 < end => {
                body.push('-');
                k += 1;
            }
            c => {
                let value = c.char_value();
                if matches!(value, '\\' | ']' | '^' | '[' | '&' | '~') {
                    let _ = write!(body, "\\{value}");
                } else {
                    body.push(value);
                }
                k += 1;
            }
        }
    }

    out.push('[');
    if negated {
        out.push('^');
    }
    out.push_str(&body);
    out.push(']');
    Some(end + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal(pattern: &str) -> Pattern {
        Pattern::parse(pattern.chars().map(PatternChar::Normal)).unwrap()
    }

    #[test]
    fn literal_pattern() {
        let pattern = normal("abc");
        assert_eq!(pattern.as_literal(), Some("abc"));
        assert!(pattern.is_match("abc"));
        assert!(!pattern.is_match("abcd"));
    }

    #[test]
    fn question_mark() {
        let pattern = normal("a?c");
        assert!(pattern.is_match("abc"));
        assert!(pattern.is_match("axc"));
        assert!(!pattern.is_match("ac"));
        assert!(!pattern.is_match("abbc"));
    }

    #[test]
    fn asterisk() {
        let pattern = normal("a*c");
        assert!(pattern.is_match("ac"));
        assert!(pattern.is_match("abbbc"));
        assert!(!pattern.is_match("ab"));
        // `*` crosses anything, including newlines and slashes.
        assert!(pattern.is_match("a\nb/c"));
    }

    #[test]
    fn bracket_expressions() {
        let pattern = normal("[abc]x");
        assert!(pattern.is_match("ax"));
        assert!(!pattern.is_match("dx"));

        let pattern = normal("[!abc]x");
        assert!(pattern.is_match("dx"));
        assert!(!pattern.is_match("ax"));

        let pattern = normal("[a-f]");
        assert!(pattern.is_match("d"));
        assert!(!pattern.is_match("z"));

        let pattern = normal("[]x]");
        assert!(pattern.is_match("]"));
        assert!(pattern.is_match("x"));
    }

    #[test]
    fn character_classes() {
        let pattern = normal("[[:digit:]][[:alpha:]]");
        assert!(pattern.is_match("1a"));
        assert!(!pattern.is_match("aa"));
    }

    #[test]
    fn unmatched_bracket_is_literal() {
        let pattern = normal("a[b");
        assert!(pattern.is_match("a[b"));
        assert!(!pattern.is_match("ab"));
    }

    #[test]
    fn quoted_specials_are_literal() {
        let chars = [
            PatternChar::Literal('*'),
            PatternChar::Normal('*'),
        ];
        let pattern = Pattern::parse(chars).unwrap();
        assert!(pattern.is_match("*"));
        assert!(pattern.is_match("*anything"));
        assert!(!pattern.is_match("x"));
    }

    #[test]
    fn escaped_regex_metacharacters() {
        let pattern = normal("a.b+c");
        assert!(pattern.is_match("a.b+c"));
        assert!(!pattern.is_match("axb+c"));
    }

    #[test]
    fn starts_with_period() {
        assert!(normal(".pro*").starts_with_period());
        assert!(!normal("*.pro").starts_with_period());
    }
}
