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

//! Command-level tokens
//!
//! The command parser does not consume lexer tokens directly; it works on
//! [`CmdToken`]s, each of which is a whole word, an operator, an IO number,
//! or the end of input. Keyword recognition is tentative: a word that spells
//! a keyword carries it here, but only the parser knows whether the context
//! actually makes it a reserved word.

use super::core::Lexer;
use super::keyword::Keyword;
use super::word::can_start_word_part;
use crate::id::Id;
use crate::parser::error::Result;
use crate::syntax::{Token, Word};
use std::fmt;

/// Classification of a [`CmdToken`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenId {
    /// An ordinary word; the keyword is attached if the word spells one
    Token(Option<Keyword>),
    /// An operator such as `&&` or `<<`
    Operator(Id),
    /// Digits directly before a redirection operator
    IoNumber,
    /// Imaginary token for the end of input
    EndOfInput,
}

/// Result of command-level lexical analysis
#[derive(Clone, Debug)]
pub struct CmdToken {
    /// Content of the token
    pub word: Word,
    /// Classification
    pub id: TokenId,
}

impl CmdToken {
    /// Extracts the underlying token of an operator or IO number.
    ///
    /// # Panics
    ///
    /// If the token is a compound word.
    #[must_use]
    pub fn into_token(self) -> Token {
        match self.word {
            Word::Token(token) => token,
            Word::Compound(_) => panic!("not an operator token"),
        }
    }
}

impl fmt::Display for CmdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.word.fmt(f)
    }
}

impl Lexer {
    /// Reads the next command-level token.
    ///
    /// Blanks, comments, and line continuations before the token are
    /// skipped. The newline is returned as an operator token; consuming it
    /// is the signal to read pending here-document contents.
    pub fn cmd_token(&mut self) -> Result<CmdToken> {
        self.skip_blanks_and_comment();
        match self.peek_id() {
            Id::EndOfInput => Ok(CmdToken {
                word: Word::Compound(Vec::new()),
                id: TokenId::EndOfInput,
            }),
            Id::IoNumber => {
                let token = self.next_token();
                Ok(CmdToken {
                    word: Word::Token(token),
                    id: TokenId::IoNumber,
                })
            }
            id if id.is_command_operator() => {
                let token = self.next_token();
                Ok(CmdToken {
                    word: Word::Token(token),
                    id: TokenId::Operator(id),
                })
            }
            id if can_start_word_part(id) => {
                let word = self.word()?;
                let keyword = word
                    .to_string_if_literal()
                    .and_then(|text| text.parse().ok());
                Ok(CmdToken {
                    word,
                    id: TokenId::Token(keyword),
                })
            }
            _ => {
                // Tokens of other modes cannot appear here; treat the
                // character as a one-character word so the parser reports
                // an appropriate error.
                let token = self.next_token();
                Ok(CmdToken {
                    word: Word::Token(token),
                    id: TokenId::Token(None),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn tokens(code: &str) -> Vec<CmdToken> {
        let mut lexer = Lexer::from_source("-", code);
        let mut result = Vec::new();
        loop {
            let token = lexer.cmd_token().unwrap();
            let end = token.id == TokenId::EndOfInput;
            result.push(token);
            if end {
                break;
            }
        }
        result
    }

    #[test]
    fn words_operators_and_keywords() {
        let ts = tokens("if true; then echo a&&b; fi");
        assert_eq!(ts[0].id, TokenId::Token(Some(Keyword::If)));
        assert_eq!(ts[1].id, TokenId::Token(None));
        assert_eq!(ts[2].id, TokenId::Operator(Id::Semicolon));
        assert_eq!(ts[3].id, TokenId::Token(Some(Keyword::Then)));
        assert_eq!(ts[5].id, TokenId::Token(None));
        assert_eq!(ts[5].word.to_string(), "a");
        assert_eq!(ts[6].id, TokenId::Operator(Id::AndAnd));
        assert_eq!(ts[9].id, TokenId::Token(Some(Keyword::Fi)));
    }

    #[test]
    fn io_number() {
        let ts = tokens("2>file");
        assert_eq!(ts[0].id, TokenId::IoNumber);
        assert_eq!(ts[1].id, TokenId::Operator(Id::Greater));
        assert_eq!(ts[2].word.to_string(), "file");
    }

    #[test]
    fn comments_are_skipped() {
        let ts = tokens("echo # comment text\nnext");
        assert_eq!(ts[0].word.to_string(), "echo");
        assert_eq!(ts[1].id, TokenId::Operator(Id::Newline));
        assert_eq!(ts[2].word.to_string(), "next");
    }

    #[test]
    fn pound_inside_word_is_literal() {
        let ts = tokens("a#b");
        assert_eq!(ts[0].word.to_string(), "a#b");
        assert_matches!(ts[0].id, TokenId::Token(None));
    }
}
