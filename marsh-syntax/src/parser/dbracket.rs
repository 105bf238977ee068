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

//! Parsing of the `[[ ]]` conditional command
//!
//! Recursive descent with `||` above `&&` above `!` and parentheses. Test
//! operators are ordinary words classified by their spelling, except `<` and
//! `>`, which arrive as redirection operator tokens and are re-read as
//! comparisons here. The right-hand side of `=~` is lexed in a dedicated
//! mode where most shell metacharacters are plain regex characters.

use super::core::{Parser, TokenId};
use super::error::{Error, Result, SyntaxError};
use super::lex::{Keyword, LexMode};
use crate::id::Id;
use crate::syntax::{BoolExpr, Command, TestBinaryOp, TestUnaryOp, Word};

impl Parser<'_> {
    /// Parses a `[[ ]]` command, starting at the `[[` keyword.
    pub fn dbracket(&mut self) -> Result<Command> {
        let opening_location = self.peek_location()?;
        self.take_token()?;
        self.skip_newlines()?;

        if self.peek_id()? == TokenId::Token(Some(Keyword::CloseBracketBracket)) {
            return Err(Error {
                cause: SyntaxError::EmptyDBracket.into(),
                location: opening_location,
            });
        }

        let expr = self.bool_or()?;

        if self.peek_id()? != TokenId::Token(Some(Keyword::CloseBracketBracket)) {
            let location = self.peek_location()?;
            return Err(Error {
                cause: SyntaxError::UnclosedDBracket { opening_location }.into(),
                location,
            });
        }
        self.take_token()?;

        let redirs = self.redirections()?;
        Ok(Command::DBracket { expr, redirs })
    }

    fn bool_or(&mut self) -> Result<BoolExpr> {
        let mut lhs = self.bool_and()?;
        while self.peek_id()? == TokenId::Operator(Id::BarBar) {
            self.take_token()?;
            self.skip_newlines()?;
            let rhs = self.bool_and()?;
            lhs = BoolExpr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn bool_and(&mut self) -> Result<BoolExpr> {
        let mut lhs = self.bool_not()?;
        while self.peek_id()? == TokenId::Operator(Id::AndAnd) {
            self.take_token()?;
            self.skip_newlines()?;
            let rhs = self.bool_not()?;
            lhs = BoolExpr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn bool_not(&mut self) -> Result<BoolExpr> {
        match self.peek_id()? {
            TokenId::Token(Some(Keyword::Bang)) => {
                self.take_token()?;
                let inner = self.bool_not()?;
                Ok(BoolExpr::Not(Box::new(inner)))
            }
            TokenId::Operator(Id::OpenParen) => {
                self.take_token()?;
                self.skip_newlines()?;
                let inner = self.bool_or()?;
                if self.peek_id()? != TokenId::Operator(Id::CloseParen) {
                    return Err(self.error_here(SyntaxError::InvalidCommandToken));
                }
                self.take_token()?;
                Ok(BoolExpr::Group(Box::new(inner)))
            }
            _ => self.bool_primary(),
        }
    }

    fn bool_primary(&mut self) -> Result<BoolExpr> {
        let first = self.test_word()?;

        // A unary test operator must be followed by an operand word.
        if let Some(op_text) = first.to_string_if_literal() {
            if op_text.parse::<TestUnaryOp>().is_ok() {
                if let TokenId::Token(_) = self.peek_id()? {
                    let operand = self.take_token()?.word;
                    return Ok(BoolExpr::Unary { op: first, operand });
                }
            }
        }

        let op = match self.peek_id()? {
            TokenId::Operator(Id::Less | Id::Greater) => {
                Word::Token(self.take_token()?.into_token())
            }
            TokenId::Token(None) => {
                let is_op = self
                    .peek_token()?
                    .word
                    .to_string_if_literal()
                    .is_some_and(|text| text.parse::<TestBinaryOp>().is_ok());
                if !is_op {
                    return Ok(BoolExpr::WordTest(first));
                }
                self.take_token()?.word
            }
            _ => return Ok(BoolExpr::WordTest(first)),
        };

        let matches_regex = op.to_string_if_literal().as_deref() == Some("=~");
        let rhs = if matches_regex {
            self.regex_word()?
        } else {
            self.test_word()?
        };
        Ok(BoolExpr::Binary {
            op,
            lhs: first,
            rhs,
        })
    }

    /// Takes one operand word of a test expression.
    fn test_word(&mut self) -> Result<Word> {
        match self.peek_id()? {
            TokenId::Token(_) => Ok(self.take_token()?.word),
            _ => Err(self.error_here(SyntaxError::InvalidCommandToken)),
        }
    }

    /// Takes the right-hand side of `=~`, lexed in regex mode.
    fn regex_word(&mut self) -> Result<Word> {
        debug_assert!(!self.has_buffered_token());
        self.lexer().push_mode(LexMode::BashRegex);
        let word = self.test_word()?;
        // Taking the word leaves the look-ahead empty, so the mode can be
        // restored before anything after the word is lexed.
        self.lexer().pop_mode();
        Ok(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::Lexer;
    use assert_matches::assert_matches;

    fn parse(code: &str) -> BoolExpr {
        let mut lexer = Lexer::from_source("-", code);
        let mut parser = Parser::new(&mut lexer);
        match parser.compound_list().unwrap() {
            Command::DBracket { expr, .. } => expr,
            other => panic!("not a dbracket: {other:?}"),
        }
    }

    #[test]
    fn unary_tests() {
        let expr = parse("[[ -f /etc/passwd ]]");
        assert_matches!(expr, BoolExpr::Unary { op, operand } => {
            assert_eq!(op.to_string(), "-f");
            assert_eq!(operand.to_string(), "/etc/passwd");
        });
    }

    #[test]
    fn binary_tests() {
        let expr = parse("[[ $a = b ]]");
        assert_matches!(expr, BoolExpr::Binary { op, lhs, rhs } => {
            assert_eq!(op.to_string(), "=");
            assert_eq!(lhs.to_string(), "$a");
            assert_eq!(rhs.to_string(), "b");
        });

        let expr = parse("[[ 1 -lt 2 ]]");
        assert_matches!(expr, BoolExpr::Binary { op, .. } => {
            assert_eq!(op.to_string(), "-lt");
        });
    }

    #[test]
    fn string_comparison_operators() {
        let expr = parse("[[ a < b ]]");
        assert_matches!(expr, BoolExpr::Binary { op, .. } => {
            assert_eq!(op.to_string(), "<");
        });
    }

    #[test]
    fn word_test() {
        let expr = parse("[[ $var ]]");
        assert_matches!(expr, BoolExpr::WordTest(word) => {
            assert_eq!(word.to_string(), "$var");
        });
    }

    #[test]
    fn connectives_and_grouping() {
        let expr = parse("[[ -n $a && ( -f $b || ! -d $c ) ]]");
        assert_matches!(expr, BoolExpr::And(lhs, rhs) => {
            assert_matches!(*lhs, BoolExpr::Unary { .. });
            assert_matches!(*rhs, BoolExpr::Group(inner) => {
                assert_matches!(*inner, BoolExpr::Or(_, not) => {
                    assert_matches!(*not, BoolExpr::Not(_));
                });
            });
        });
    }

    #[test]
    fn regex_match() {
        let expr = parse("[[ $x =~ ^a(b|c)+$ ]]");
        assert_matches!(expr, BoolExpr::Binary { op, rhs, .. } => {
            assert_eq!(op.to_string(), "=~");
            assert_eq!(rhs.to_string(), "^a(b|c)+$");
        });
    }

    #[test]
    fn unclosed_dbracket() {
        let mut lexer = Lexer::from_source("-", "[[ -f x");
        let mut parser = Parser::new(&mut lexer);
        let e = parser.compound_list().unwrap_err();
        assert_matches!(
            e.cause,
            crate::parser::error::ErrorCause::Syntax(SyntaxError::UnclosedDBracket { .. })
        );
    }
}
