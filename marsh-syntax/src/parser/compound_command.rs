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

//! Parsing of commands
//!
//! [`Parser::command`] dispatches on the first token of a command: compound
//! commands by their keyword, subshells and arithmetic commands by `(`,
//! everything else as a simple command or function definition.
//!
//! `((` is ambiguous: it may open an arithmetic command or a subshell whose
//! first command is another subshell. The arithmetic reading is tried first
//! and the parser rewinds to the subshell reading when it fails, which is
//! the tie-break expected from shells with `(())`.

use super::core::{Parser, TokenId};
use super::error::{Error, Result, SyntaxError};
use super::lex::{Keyword, LexMode};
use crate::id::Id;
use crate::syntax::{ArithExpr, Command};

impl Parser<'_> {
    /// Parses one command, simple or compound.
    pub fn command(&mut self) -> Result<Command> {
        match self.peek_id()? {
            TokenId::Token(Some(keyword)) => match keyword {
                Keyword::If => self.if_command(),
                Keyword::Case => self.case_command(),
                Keyword::For => self.for_command(),
                Keyword::While => self.while_command(false),
                Keyword::Until => self.while_command(true),
                Keyword::OpenBrace => self.brace_group(),
                Keyword::Function => self.function_keyword_definition(),
                Keyword::OpenBracketBracket => self.dbracket(),
                _ => Err(self.error_here(SyntaxError::InvalidCommandToken)),
            },
            TokenId::Operator(Id::OpenParen) => self.subshell_or_dparen(),
            TokenId::Token(None) => self.simple_or_function(),
            TokenId::IoNumber => self.simple_command(None),
            _ => Err(self.error_here(SyntaxError::InvalidCommandToken)),
        }
    }

    /// Parses a simple command or a POSIX-form function definition.
    fn simple_or_function(&mut self) -> Result<Command> {
        let first = self.take_token()?.word;
        if self.peek_id()? == TokenId::Operator(Id::OpenParen) {
            self.function_definition(first)
        } else {
            self.simple_command(Some(first))
        }
    }

    /// Parses a subshell or an arithmetic command, starting at `(`.
    fn subshell_or_dparen(&mut self) -> Result<Command> {
        let opening_location = self.peek_location()?;
        let checkpoint = self.checkpoint();
        self.take_token()?;

        if !self.has_buffered_token() && self.lexer().peek_raw_char() == Some('(') {
            match self.try_dparen() {
                Ok(expr) => {
                    let redirs = self.redirections()?;
                    return Ok(Command::DParen { expr, redirs });
                }
                Err(_) => {
                    self.rewind(checkpoint);
                    self.take_token()?;
                }
            }
        }

        let body = self.compound_list()?;
        match self.peek_id()? {
            TokenId::Operator(Id::CloseParen) => {
                self.take_token()?;
                if matches!(body, Command::NoOp) {
                    return Err(Error {
                        cause: SyntaxError::EmptySubshell.into(),
                        location: opening_location,
                    });
                }
                let redirs = self.redirections()?;
                Ok(Command::Subshell {
                    body: Box::new(body),
                    redirs,
                })
            }
            _ => {
                let location = self.peek_location()?;
                Err(Error {
                    cause: SyntaxError::UnclosedSubshell { opening_location }.into(),
                    location,
                })
            }
        }
    }

    /// Tries to parse the rest of an arithmetic command after the first `(`.
    fn try_dparen(&mut self) -> Result<ArithExpr> {
        let lexer = self.lexer();
        lexer.take_raw(1, Id::OpenParen);
        lexer.push_mode(LexMode::Arith);
        lexer.arith_tail()
    }
}
