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

//! Parsing of and-or lists and command lists

use super::core::{Parser, TokenId};
use super::error::{Result, SyntaxError};
use crate::id::Id;
use crate::syntax::Command;

impl Parser<'_> {
    /// Parses pipelines connected with `&&` and `||`.
    ///
    /// A single pipeline is returned unwrapped.
    pub fn and_or(&mut self) -> Result<Command> {
        let mut children = vec![self.pipeline()?];
        let mut ops = Vec::new();
        loop {
            match self.peek_id()? {
                TokenId::Operator(Id::AndAnd | Id::BarBar) => {
                    ops.push(self.take_token()?.into_token());
                    self.skip_newlines()?;
                    children.push(self.pipeline()?);
                }
                _ => break,
            }
        }
        if children.len() == 1 {
            Ok(children.pop().unwrap())
        } else {
            Ok(Command::AndOr { children, ops })
        }
    }

    /// Parses a command list up to a clause delimiter.
    ///
    /// Commands terminated by `;` or `&` are wrapped in
    /// [`Sentence`](Command::Sentence) nodes. Newlines separate commands and
    /// trigger the reading of pending here-document contents. Returns
    /// [`NoOp`](Command::NoOp) for an empty list and the single command
    /// unwrapped for a one-element list.
    pub fn compound_list(&mut self) -> Result<Command> {
        let mut children = Vec::new();
        loop {
            self.skip_newlines()?;
            match self.peek_id()? {
                TokenId::EndOfInput => break,
                TokenId::Operator(
                    Id::CloseParen
                    | Id::SemicolonSemicolon
                    | Id::SemicolonAnd
                    | Id::SemicolonSemicolonAnd,
                ) => break,
                TokenId::Token(Some(keyword)) if keyword.is_clause_delimiter() => break,
                _ => {}
            }

            let command = self.and_or()?;
            match self.peek_id()? {
                TokenId::Operator(Id::Semicolon | Id::And) => {
                    let terminator = self.take_token()?.into_token();
                    children.push(Command::Sentence {
                        inner: Box::new(command),
                        terminator,
                    });
                }
                _ => children.push(command),
            }
        }
        Ok(match children.len() {
            0 => Command::NoOp,
            1 => children.pop().unwrap(),
            _ => Command::List(children),
        })
    }

    /// Parses a whole program.
    ///
    /// The result is always a [`List`](Command::List), possibly empty, so
    /// embedders have a uniform root to work with.
    pub fn program(&mut self) -> Result<Command> {
        let list = self.compound_list()?;
        match self.peek_id()? {
            TokenId::EndOfInput => {
                self.ensure_no_unread_here_doc()?;
                Ok(match list {
                    Command::List(_) => list,
                    Command::NoOp => Command::List(Vec::new()),
                    other => Command::List(vec![other]),
                })
            }
            TokenId::Operator(Id::CloseParen) => {
                Err(self.error_here(SyntaxError::UnopenedSubshell))
            }
            TokenId::Token(Some(super::lex::Keyword::CloseBrace)) => {
                Err(self.error_here(SyntaxError::UnopenedGrouping))
            }
            _ => Err(self.error_here(SyntaxError::InvalidCommandToken)),
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
        parser.program().unwrap()
    }

    #[test]
    fn and_or_chain() {
        let program = parse("a && b || c");
        assert_matches!(&program, Command::List(children) => {
            assert_matches!(&children[0], Command::AndOr { children, ops } => {
                assert_eq!(children.len(), 3);
                assert_eq!(ops[0].id, Id::AndAnd);
                assert_eq!(ops[1].id, Id::BarBar);
            });
        });
    }

    #[test]
    fn separators_make_sentences() {
        let program = parse("a; b& c");
        assert_matches!(&program, Command::List(items) => {
            assert_eq!(items.len(), 3);
            assert_matches!(&items[0], Command::Sentence { terminator, .. } => {
                assert_eq!(terminator.id, Id::Semicolon);
            });
            assert_matches!(&items[1], Command::Sentence { terminator, .. } => {
                assert_eq!(terminator.id, Id::And);
            });
            assert_matches!(&items[2], Command::Simple(_));
        });
    }

    #[test]
    fn newline_separated_commands() {
        let program = parse("a\nb\n");
        assert_matches!(&program, Command::List(items) => {
            assert_eq!(items.len(), 2);
        });
    }

    #[test]
    fn empty_program() {
        assert_matches!(parse(""), Command::List(children) => assert!(children.is_empty()));
        assert_matches!(parse("\n\n# only a comment\n"), Command::List(children) => {
            assert!(children.is_empty());
        });
    }

    #[test]
    fn unopened_subshell_is_an_error() {
        let mut lexer = Lexer::from_source("-", "a )");
        let mut parser = Parser::new(&mut lexer);
        let e = parser.program().unwrap_err();
        assert_matches!(
            e.cause,
            crate::parser::error::ErrorCause::Syntax(SyntaxError::UnopenedSubshell)
        );
    }
}
