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

//! Parsing of pipelines

use super::core::{Parser, TokenId};
use super::error::Result;
use super::lex::Keyword;
use crate::id::Id;
use crate::syntax::Command;

impl Parser<'_> {
    /// Parses a pipeline: one or more commands connected with `|` or `|&`,
    /// optionally negated with `!`.
    ///
    /// A single command without negation is returned unwrapped.
    pub fn pipeline(&mut self) -> Result<Command> {
        let negated = if self.peek_id()? == TokenId::Token(Some(Keyword::Bang)) {
            self.take_token()?;
            true
        } else {
            false
        };

        let mut children = vec![self.command()?];
        let mut stderr_indices = Vec::new();
        loop {
            match self.peek_id()? {
                TokenId::Operator(Id::Bar) => {
                    self.take_token()?;
                }
                TokenId::Operator(Id::BarAnd) => {
                    stderr_indices.push(children.len() - 1);
                    self.take_token()?;
                }
                _ => break,
            }
            // Newlines are allowed after the pipe operator.
            self.skip_newlines()?;
            children.push(self.command()?);
        }

        if children.len() == 1 && !negated {
            Ok(children.pop().unwrap())
        } else {
            Ok(Command::Pipeline {
                children,
                negated,
                stderr_indices,
            })
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
        parser.pipeline().unwrap()
    }

    #[test]
    fn single_command_is_unwrapped() {
        assert_matches!(parse("echo hi"), Command::Simple(_));
    }

    #[test]
    fn two_stage_pipeline() {
        assert_matches!(parse("a | b"), Command::Pipeline { children, negated, stderr_indices } => {
            assert_eq!(children.len(), 2);
            assert!(!negated);
            assert!(stderr_indices.is_empty());
        });
    }

    #[test]
    fn negation() {
        assert_matches!(parse("! a"), Command::Pipeline { children, negated, .. } => {
            assert_eq!(children.len(), 1);
            assert!(negated);
        });
    }

    #[test]
    fn stderr_pipe() {
        assert_matches!(parse("a |& b | c"), Command::Pipeline { children, stderr_indices, .. } => {
            assert_eq!(children.len(), 3);
            assert_eq!(stderr_indices, vec![0]);
        });
    }

    #[test]
    fn newline_after_pipe() {
        assert_matches!(parse("a |\n\nb"), Command::Pipeline { children, .. } => {
            assert_eq!(children.len(), 2);
        });
    }
}
