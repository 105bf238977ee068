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

//! Parsing of the if command

use super::core::{Parser, TokenId};
use super::error::{Result, SyntaxError};
use super::lex::Keyword;
use crate::syntax::{Command, IfArm};

impl Parser<'_> {
    /// Parses an `if` command, starting at the `if` keyword.
    pub fn if_command(&mut self) -> Result<Command> {
        self.take_token()?;
        let mut arms = Vec::new();
        let mut else_body = None;

        loop {
            let condition = self.compound_list()?;
            if matches!(condition, Command::NoOp) {
                return Err(self.error_here(SyntaxError::EmptyCondition));
            }
            if self.peek_id()? != TokenId::Token(Some(Keyword::Then)) {
                return Err(self.error_here(SyntaxError::MissingThen));
            }
            self.take_token()?;
            let body = self.compound_list()?;
            arms.push(IfArm { condition, body });

            match self.peek_id()? {
                TokenId::Token(Some(Keyword::Elif)) => {
                    self.take_token()?;
                }
                TokenId::Token(Some(Keyword::Else)) => {
                    self.take_token()?;
                    else_body = Some(Box::new(self.compound_list()?));
                    break;
                }
                _ => break,
            }
        }

        if self.peek_id()? != TokenId::Token(Some(Keyword::Fi)) {
            return Err(self.error_here(SyntaxError::MissingFi));
        }
        self.take_token()?;
        let redirs = self.redirections()?;
        Ok(Command::If {
            arms,
            else_body,
            redirs,
        })
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
    fn simple_if() {
        let command = parse("if true; then echo yes; fi");
        assert_matches!(command, Command::If { arms, else_body, .. } => {
            assert_eq!(arms.len(), 1);
            assert!(else_body.is_none());
        });
    }

    #[test]
    fn if_elif_else() {
        let command = parse("if a; then b; elif c; then d; else e; fi");
        assert_matches!(command, Command::If { arms, else_body, .. } => {
            assert_eq!(arms.len(), 2);
            assert!(else_body.is_some());
        });
    }

    #[test]
    fn multi_line_if() {
        let command = parse("if a\nthen\n  b\n  c\nfi");
        assert_matches!(command, Command::If { arms, .. } => {
            assert_matches!(&arms[0].body, Command::List(children) => {
                assert_eq!(children.len(), 2);
            });
        });
    }

    #[test]
    fn missing_then() {
        let mut lexer = Lexer::from_source("-", "if a; fi");
        let mut parser = Parser::new(&mut lexer);
        let e = parser.compound_list().unwrap_err();
        assert_matches!(
            e.cause,
            crate::parser::error::ErrorCause::Syntax(SyntaxError::MissingThen)
        );
    }

    #[test]
    fn missing_fi() {
        let mut lexer = Lexer::from_source("-", "if a; then b;");
        let mut parser = Parser::new(&mut lexer);
        let e = parser.compound_list().unwrap_err();
        assert_matches!(
            e.cause,
            crate::parser::error::ErrorCause::Syntax(SyntaxError::MissingFi)
        );
    }

    #[test]
    fn if_display_round_trip() {
        let command = parse("if a; then b; else c; fi");
        assert_eq!(command.to_string(), "if a; then b; else c; fi");
    }
}
