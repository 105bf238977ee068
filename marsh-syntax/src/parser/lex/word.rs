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

//! Word parsing
//!
//! A word is assembled part by part until a token the current mode treats as
//! a terminator. Quotations and substitutions switch the lexical mode on
//! entry and restore it on exit, which is what makes `"${x:-'a b'}"` parse
//! the default with literal single quotes while `${x:-'a b'}` parses it as a
//! quotation.

use super::LexMode;
use super::core::Lexer;
use crate::id::Id;
use crate::parser::error::{Error, Result, SyntaxError};
use crate::syntax::{Word, WordPart};

/// Tests if a token of this id can start a word part.
#[must_use]
pub fn can_start_word_part(id: Id) -> bool {
    use Id::*;
    matches!(
        id,
        Literal
            | VarLike
            | Other
            | Pound
            | EscapedChar
            | TildeLike
            | SingleQuote
            | DoubleQuote
            | DollarSingleQuote
            | DollarName
            | DollarSpecial
            | DollarBrace
            | DollarParen
            | DollarDParen
            | Backquote
    )
}

impl Lexer {
    /// Parses a word in the current mode.
    ///
    /// The returned word is empty if the next token cannot start a word
    /// part. The terminating token is not consumed.
    pub fn word(&mut self) -> Result<Word> {
        Ok(Word::Compound(self.word_parts()?))
    }

    /// Parses word parts until a terminator of the current mode.
    pub fn word_parts(&mut self) -> Result<Vec<WordPart>> {
        let mut parts = Vec::new();
        loop {
            // An assignment word may continue with an array value: `a=(…)`.
            if self.mode() == LexMode::Outer
                && self.peek_id() == Id::OpenParen
                && matches!(
                    parts.as_slice(),
                    [WordPart::Literal(token)] if token.id == Id::VarLike
                )
            {
                parts.push(self.array_literal()?);
                break;
            }
            match self.word_part(parts.is_empty())? {
                Some(part) => parts.push(part),
                None => break,
            }
        }
        Ok(parts)
    }

    /// Parses one word part, or returns `None` at a terminator.
    pub fn word_part(&mut self, is_first: bool) -> Result<Option<WordPart>> {
        loop {
            return match self.peek_id() {
                Id::LineContinuation => {
                    self.next_token();
                    continue;
                }
                Id::Literal | Id::VarLike | Id::Other | Id::Pound => {
                    Ok(Some(WordPart::Literal(self.next_token())))
                }
                Id::EscapedChar => Ok(Some(WordPart::EscapedLiteral(self.next_token()))),
                Id::TildeLike => {
                    let token = self.next_token();
                    if is_first && self.tilde_applies() {
                        Ok(Some(WordPart::TildeSub(token)))
                    } else {
                        Ok(Some(WordPart::Literal(token)))
                    }
                }
                Id::SingleQuote => self.single_quoted().map(Some),
                Id::DoubleQuote => {
                    if self.mode() == LexMode::DoubleQuoted {
                        Ok(None)
                    } else {
                        self.double_quoted().map(Some)
                    }
                }
                Id::DollarSingleQuote => self.dollar_single_quoted().map(Some),
                Id::DollarName | Id::DollarSpecial => {
                    Ok(Some(WordPart::SimpleVarSub(self.next_token())))
                }
                Id::DollarBrace => self.braced_param().map(Some),
                Id::DollarParen => self.command_substitution().map(Some),
                Id::DollarDParen => self.arith_substitution().map(Some),
                Id::Backquote => self.backquote().map(Some),
                _ => Ok(None),
            };
        }
    }

    /// Tests if tilde expansion is recognized in the current mode.
    fn tilde_applies(&self) -> bool {
        matches!(
            self.mode(),
            LexMode::Outer | LexMode::VsArgUnquoted | LexMode::VsArgUnquotedSlash
        )
    }

    /// Parses a single quotation, starting at the opening `'`.
    fn single_quoted(&mut self) -> Result<WordPart> {
        let open = self.next_token();
        let opening_location = self.location_of(&open);
        self.push_mode(LexMode::SingleQuoted);
        let mut tokens = Vec::new();
        loop {
            match self.peek_id() {
                Id::Literal => tokens.push(self.next_token()),
                Id::SingleQuote => {
                    self.next_token();
                    self.pop_mode();
                    return Ok(WordPart::SingleQuoted(tokens));
                }
                _ => {
                    let location = self.current_location();
                    return Err(Error {
                        cause: SyntaxError::UnclosedSingleQuote { opening_location }.into(),
                        location,
                    });
                }
            }
        }
    }

    /// Parses a double quotation, starting at the opening `"`.
    fn double_quoted(&mut self) -> Result<WordPart> {
        let open = self.next_token();
        let opening_location = self.location_of(&open);
        self.push_mode(LexMode::DoubleQuoted);
        let parts = self.word_parts()?;
        match self.peek_id() {
            Id::DoubleQuote => {
                self.next_token();
                self.pop_mode();
                Ok(WordPart::DoubleQuoted(parts))
            }
            _ => {
                let location = self.current_location();
                Err(Error {
                    cause: SyntaxError::UnclosedDoubleQuote { opening_location }.into(),
                    location,
                })
            }
        }
    }

    /// Parses an array literal, starting at the opening `(` of `a=(…)`.
    fn array_literal(&mut self) -> Result<WordPart> {
        let open = self.next_token();
        let opening_location = self.location_of(&open);
        let mut words = Vec::new();
        loop {
            match self.peek_id() {
                Id::Blank | Id::Newline | Id::LineContinuation => {
                    self.next_token();
                }
                Id::Pound => self.skip_blanks_and_comment(),
                Id::CloseParen => {
                    self.next_token();
                    return Ok(WordPart::ArrayLiteral(words));
                }
                id if can_start_word_part(id) => words.push(self.word()?),
                _ => {
                    let location = self.current_location();
                    return Err(Error {
                        cause: SyntaxError::UnclosedArrayValue { opening_location }.into(),
                        location,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::parser::error::ErrorCause;

    fn parse_word(code: &str) -> Word {
        let mut lexer = Lexer::from_source("-", code);
        lexer.word().unwrap()
    }

    #[test]
    fn plain_word() {
        let word = parse_word("hello world");
        assert_eq!(word.to_string(), "hello");
        assert_eq!(word.parts().len(), 1);
    }

    #[test]
    fn single_quoted_word() {
        let word = parse_word("'a b'c");
        assert_matches!(&word.parts()[0], WordPart::SingleQuoted(tokens) => {
            assert_eq!(tokens.len(), 1);
            assert_eq!(tokens[0].value, "a b");
        });
        assert_matches!(&word.parts()[1], WordPart::Literal(token) => {
            assert_eq!(token.value, "c");
        });
        assert_eq!(word.to_string(), "'a b'c");
    }

    #[test]
    fn single_quote_spans_lines() {
        let word = parse_word("'a\nb'");
        assert_matches!(&word.parts()[0], WordPart::SingleQuoted(tokens) => {
            assert_eq!(tokens.len(), 2);
            assert_eq!(tokens[0].value, "a\n");
            assert_eq!(tokens[1].value, "b");
        });
    }

    #[test]
    fn unclosed_single_quote() {
        let mut lexer = Lexer::from_source("-", "'oops");
        let e = lexer.word().unwrap_err();
        assert_matches!(
            e.cause,
            ErrorCause::Syntax(SyntaxError::UnclosedSingleQuote { .. })
        );
    }

    #[test]
    fn double_quoted_word_with_substitution() {
        let word = parse_word("\"a $b c\"");
        assert_matches!(&word.parts()[0], WordPart::DoubleQuoted(parts) => {
            assert_eq!(parts.len(), 3);
            assert_matches!(&parts[1], WordPart::SimpleVarSub(token) => {
                assert_eq!(token.value, "$b");
            });
        });
        assert_eq!(word.to_string(), "\"a $b c\"");
    }

    #[test]
    fn escaped_char() {
        let word = parse_word("a\\ b");
        assert_eq!(word.parts().len(), 3);
        assert_matches!(&word.parts()[1], WordPart::EscapedLiteral(token) => {
            assert_eq!(token.value, "\\ ");
        });
        assert_eq!(word.to_string(), "a\\ b");
    }

    #[test]
    fn tilde_only_at_word_start() {
        let word = parse_word("~user/x");
        assert_matches!(&word.parts()[0], WordPart::TildeSub(token) => {
            assert_eq!(token.value, "~user");
        });

        let word = parse_word("a~user");
        assert_matches!(&word.parts()[1], WordPart::Literal(token) => {
            assert_eq!(token.value, "~user");
        });
    }

    #[test]
    fn array_literal_value() {
        let word = parse_word("a=(x 'y z'\nw)");
        assert_matches!(&word.parts()[0], WordPart::Literal(token) => {
            assert_eq!(token.id, Id::VarLike);
        });
        assert_matches!(&word.parts()[1], WordPart::ArrayLiteral(words) => {
            assert_eq!(words.len(), 3);
            assert_eq!(words[0].to_string(), "x");
            assert_eq!(words[1].to_string(), "'y z'");
        });
    }

    #[test]
    fn word_ends_at_operator() {
        let mut lexer = Lexer::from_source("-", "foo|bar");
        let word = lexer.word().unwrap();
        assert_eq!(word.to_string(), "foo");
        assert_eq!(lexer.peek_id(), Id::Bar);
    }
}
