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

//! Parsing of brace groupings and `do` clauses

use super::core::{Parser, TokenId};
use super::error::{Error, Result, SyntaxError};
use super::lex::Keyword;
use crate::syntax::Command;

impl Parser<'_> {
    /// Parses a brace grouping, starting at `{`.
    pub fn brace_group(&mut self) -> Result<Command> {
        let opening_location = self.peek_location()?;
        self.take_token()?;
        let body = self.compound_list()?;
        match self.peek_id()? {
            TokenId::Token(Some(Keyword::CloseBrace)) => {
                self.take_token()?;
                if matches!(body, Command::NoOp) {
                    return Err(Error {
                        cause: SyntaxError::EmptyGrouping.into(),
                        location: opening_location,
                    });
                }
                let redirs = self.redirections()?;
                Ok(Command::BraceGroup {
                    body: Box::new(body),
                    redirs,
                })
            }
            _ => {
                let location = self.peek_location()?;
                Err(Error {
                    cause: SyntaxError::UnclosedGrouping { opening_location }.into(),
                    location,
                })
            }
        }
    }

    /// Parses a `do … done` clause.
    pub fn do_group(&mut self) -> Result<Command> {
        if self.peek_id()? != TokenId::Token(Some(Keyword::Do)) {
            return Err(self.error_here(SyntaxError::MissingDo));
        }
        let opening_location = self.peek_location()?;
        self.take_token()?;
        let body = self.compound_list()?;
        match self.peek_id()? {
            TokenId::Token(Some(Keyword::Done)) => {
                self.take_token()?;
                if matches!(body, Command::NoOp) {
                    return Err(Error {
                        cause: SyntaxError::EmptyDoClause.into(),
                        location: opening_location,
                    });
                }
                Ok(Command::DoGroup {
                    body: Box::new(body),
                })
            }
            _ => {
                let location = self.peek_location()?;
                Err(Error {
                    cause: SyntaxError::UnclosedDoClause { opening_location }.into(),
                    location,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::Lexer;
    use assert_matches::assert_matches;

    fn parse(code: &str) -> Command {
        let mut lexer = Lexer::from_source("-", code);
        let mut parser = Parser::new(&mut lexer);
        parser.compound_list().unwrap()
    }

    #[test]
    fn brace_group() {
        assert_matches!(parse("{ a; b; }"), Command::BraceGroup { body, .. } => {
            assert_matches!(*body, Command::List(children) => {
                assert_eq!(children.len(), 2);
            });
        });
    }

    #[test]
    fn brace_must_be_a_word() {
        // Without a blank, `{a` is a word, not a grouping.
        assert_matches!(parse("{a; }; :"), Command::List(_));
    }

    #[test]
    fn unclosed_grouping() {
        let mut lexer = Lexer::from_source("-", "{ a;");
        let mut parser = Parser::new(&mut lexer);
        let e = parser.compound_list().unwrap_err();
        assert_matches!(
            e.cause,
            crate::parser::error::ErrorCause::Syntax(SyntaxError::UnclosedGrouping { .. })
        );
    }

    #[test]
    fn empty_grouping() {
        let mut lexer = Lexer::from_source("-", "{ }");
        let mut parser = Parser::new(&mut lexer);
        let e = parser.compound_list().unwrap_err();
        assert_matches!(
            e.cause,
            crate::parser::error::ErrorCause::Syntax(SyntaxError::EmptyGrouping)
        );
    }
}
