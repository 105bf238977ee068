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

//! Part of the lexer that parses dollar single quotes
//!
//! `$'…'` quotes its content like single quotes but decodes C-style escape
//! sequences. Decoding happens at parse time; the raw content is kept for
//! printing.

use super::core::Lexer;
use crate::id::Id;
use crate::parser::error::{Error, Result, SyntaxError};
use crate::syntax::{Token, WordPart};

/// Decodes the escape sequences of a `$'…'` content string.
///
/// Unknown escapes are kept literally, backslash included.
#[must_use]
pub fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            None => out.push('\\'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('e') | Some('E') => out.push('\x1b'),
            Some('f') => out.push('\x0c'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\x0b'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('?') => out.push('?'),
            Some('x') => {
                let mut value = 0u32;
                let mut digits = 0;
                while digits < 2 {
                    match chars.peek().and_then(|c| c.to_digit(16)) {
                        Some(digit) => {
                            value = value * 16 + digit;
                            chars.next();
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if digits == 0 {
                    out.push_str("\\x");
                } else {
                    out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
                }
            }
            Some(first @ '0'..='7') => {
                let mut value = first.to_digit(8).unwrap();
                let mut digits = 1;
                while digits < 3 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                            digits += 1;
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value & 0xFF).unwrap_or('\u{FFFD}'));
            }
            Some('u') => {
                let mut value = 0u32;
                let mut digits = 0;
                while digits < 4 {
                    match chars.peek().and_then(|c| c.to_digit(16)) {
                        Some(digit) => {
                            value = value * 16 + digit;
                            chars.next();
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if digits == 0 {
                    out.push_str("\\u");
                } else {
                    out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

impl Lexer {
    /// Parses a dollar single quotation, starting at `$'`.
    pub fn dollar_single_quoted(&mut self) -> Result<WordPart> {
        let open = self.next_token();
        let opening_location = self.location_of(&open);
        let mut raw = String::new();
        let mut first_span = None;

        'lines: loop {
            let rest = self.raw_rest().to_string();
            if rest.is_empty() {
                return Err(Error {
                    cause: SyntaxError::UnclosedDollarSingleQuote { opening_location }.into(),
                    location: self.current_location(),
                });
            }
            let mut i = 0;
            while i < rest.len() {
                let c = rest[i..].chars().next().unwrap();
                match c {
                    '\'' => {
                        if i > 0 {
                            let token = self.take_raw(i, Id::Literal);
                            first_span = first_span.or(token.span);
                            raw.push_str(&token.value);
                        }
                        self.take_raw(1, Id::SingleQuote);
                        break 'lines;
                    }
                    '\\' => match rest[i + 1..].chars().next() {
                        Some(escaped) => i += 1 + escaped.len_utf8(),
                        None => i += 1,
                    },
                    _ => i += c.len_utf8(),
                }
            }
            let token = self.take_raw(rest.len(), Id::Literal);
            first_span = first_span.or(token.span);
            raw.push_str(&token.value);
        }

        let decoded = decode_escapes(&raw);
        Ok(WordPart::DollarSingleQuoted(
            Token {
                id: Id::Literal,
                value: raw,
                span: first_span,
            },
            decoded,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn decode_common_escapes() {
        assert_eq!(decode_escapes("a\\nb"), "a\nb");
        assert_eq!(decode_escapes("\\t\\\\"), "\t\\");
        assert_eq!(decode_escapes("\\'\\\""), "'\"");
        assert_eq!(decode_escapes("\\x41\\x4a"), "AJ");
        assert_eq!(decode_escapes("\\101"), "A");
        assert_eq!(decode_escapes("\\u00e9"), "\u{e9}");
        assert_eq!(decode_escapes("\\q"), "\\q");
        assert_eq!(decode_escapes("\\x"), "\\x");
    }

    #[test]
    fn parse_dollar_single_quote() {
        let mut lexer = Lexer::from_source("-", "$'a\\tb' rest");
        let word = lexer.word().unwrap();
        assert_matches!(&word.parts()[0], crate::syntax::WordPart::DollarSingleQuoted(token, decoded) => {
            assert_eq!(token.value, "a\\tb");
            assert_eq!(decoded, "a\tb");
        });
        assert_eq!(word.to_string(), "$'a\\tb'");
    }

    #[test]
    fn empty_dollar_single_quote() {
        let mut lexer = Lexer::from_source("-", "$''x");
        let word = lexer.word().unwrap();
        assert_eq!(word.to_string(), "$''x");
    }
}
