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

//! Parsing of while and until loops

use super::core::Parser;
use super::error::{Result, SyntaxError};
use crate::syntax::Command;

impl Parser<'_> {
    /// Parses a `while` or `until` loop, starting at its keyword.
    ///
    /// The condition is a full command list, so another compound command,
    /// even another loop, can serve as the condition.
    pub fn while_command(&mut self, until: bool) -> Result<Command> {
        self.take_token()?;
        let condition = self.compound_list()?;
        if matches!(condition, Command::NoOp) {
            return Err(self.error_here(SyntaxError::EmptyCondition));
        }
        let body = self.do_group()?;
        let redirs = self.redirections()?;
        let condition = Box::new(condition);
        let body = Box::new(body);
        Ok(if until {
            Command::Until {
                condition,
                body,
                redirs,
            }
        } else {
            Command::While {
                condition,
                body,
                redirs,
            }
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
    fn while_loop() {
        let command = parse("while test -f lock; do sleep 1; done");
        assert_matches!(command, Command::While { body, .. } => {
            assert_matches!(*body, Command::DoGroup { .. });
        });
    }

    #[test]
    fn until_loop() {
        let command = parse("until false; do echo hi; break; done");
        assert_matches!(command, Command::Until { condition, body, .. } => {
            assert_matches!(*condition, Command::Sentence { .. });
            assert_matches!(*body, Command::DoGroup { body } => {
                assert_matches!(*body, Command::List(children) => {
                    assert_eq!(children.len(), 2);
                });
            });
        });
    }

    #[test]
    fn loop_as_condition() {
        let command = parse("while while a; do b; done do c; done");
        assert_matches!(command, Command::While { condition, .. } => {
            assert_matches!(*condition, Command::While { .. });
        });
    }

    #[test]
    fn missing_do() {
        let mut lexer = Lexer::from_source("-", "while a; done");
        let mut parser = Parser::new(&mut lexer);
        let e = parser.compound_list().unwrap_err();
        assert_matches!(
            e.cause,
            crate::parser::error::ErrorCause::Syntax(SyntaxError::MissingDo)
        );
    }

    #[test]
    fn display_round_trip() {
        let command = parse("until false; do echo hi; break; done");
        assert_eq!(command.to_string(), "until false; do echo hi; break; done");
    }
}
