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

//! Part of the lexer that parses command and arithmetic substitutions
//!
//! `$(…)` recursively parses a command list with the same lexer, so the
//! inner tokens keep their provenance. `$((…))` is ambiguous with a command
//! substitution starting with a subshell; the lexer first tries an
//! arithmetic expression and rewinds to re-parse as `$( (…` when that fails.
//! Backquoted substitutions filter their escape characters and re-parse the
//! content, so their inner tokens carry no usable spans.

use super::LexMode;
use super::core::Lexer;
use crate::id::Id;
use crate::parser::arith::arith_expr;
use crate::parser::core::{Parser, TokenId};
use crate::parser::error::{Error, Result, SyntaxError};
use crate::syntax::{ArithExpr, Command, Token, WordPart};
use std::rc::Rc;

impl Lexer {
    /// Parses a command substitution, starting at `$(`.
    pub fn command_substitution(&mut self) -> Result<WordPart> {
        let open = self.next_token();
        self.command_substitution_tail(open)
    }

    fn command_substitution_tail(&mut self, open: Token) -> Result<WordPart> {
        let opening_location = self.location_of(&open);
        self.push_mode(LexMode::Outer);
        let (command, closed) = self.inner_program()?;
        if closed {
            self.pop_mode();
            Ok(WordPart::CommandSub {
                command: Rc::new(command),
                backquoted: false,
            })
        } else {
            Err(Error {
                cause: SyntaxError::UnclosedCommandSubstitution { opening_location }.into(),
                location: self.current_location(),
            })
        }
    }

    /// Parses a command list up to, and including, a closing `)`.
    ///
    /// Returns the command and whether the closing parenthesis was found.
    fn inner_program(&mut self) -> Result<(Command, bool)> {
        let mut parser = Parser::new(self);
        let command = parser.compound_list()?;
        match parser.peek_token()?.id {
            TokenId::Operator(Id::CloseParen) => {
                parser.take_token()?;
                parser.ensure_no_unread_here_doc()?;
                Ok((command, true))
            }
            _ => Ok((command, false)),
        }
    }

    /// Parses an arithmetic substitution, starting at `$((`.
    ///
    /// If the content does not parse as an arithmetic expression closed by
    /// `))`, the input is re-read as a command substitution whose content
    /// starts with a subshell.
    pub fn arith_substitution(&mut self) -> Result<WordPart> {
        let checkpoint = self.checkpoint();
        self.next_token(); // `$((`
        self.push_mode(LexMode::Arith);
        match self.arith_tail() {
            Ok(expr) => Ok(WordPart::ArithSub(expr)),
            Err(_) => {
                self.rewind(checkpoint);
                let open = self.take_raw(2, Id::DollarParen);
                self.command_substitution_tail(open)
            }
        }
    }

    /// Parses an arithmetic expression followed by `))`, popping the
    /// arithmetic mode on success.
    pub(crate) fn arith_tail(&mut self) -> Result<ArithExpr> {
        let expr = arith_expr(self)?;
        for _ in 0..2 {
            if self.peek_id() != Id::CloseParen {
                return Err(Error {
                    cause: SyntaxError::InvalidArithExpr.into(),
                    location: self.current_location(),
                });
            }
            self.next_token();
        }
        self.pop_mode();
        Ok(expr)
    }

    /// Parses a backquoted command substitution, starting at the opening
    /// backquote.
    ///
    /// Within backquotes, a backslash quotes `$`, `` ` ``, and `\`; the
    /// filtered content is parsed as a program of its own.
    pub fn backquote(&mut self) -> Result<WordPart> {
        let open = self.next_token();
        let opening_location = self.location_of(&open);
        let mut content = String::new();

        'lines: loop {
            let rest = self.raw_rest().to_string();
            if rest.is_empty() {
                return Err(Error {
                    cause: SyntaxError::UnclosedBackquote { opening_location }.into(),
                    location: self.current_location(),
                });
            }
            let mut i = 0;
            while i < rest.len() {
                let c = rest[i..].chars().next().unwrap();
                match c {
                    '`' => {
                        if i > 0 {
                            self.take_raw(i, Id::Literal);
                        }
                        self.take_raw(1, Id::Backquote);
                        break 'lines;
                    }
                    '\\' => match rest[i + 1..].chars().next() {
                        Some(escaped @ ('$' | '`' | '\\')) => {
                            content.push(escaped);
                            i += 1 + escaped.len_utf8();
                        }
                        Some('\n') => i += 2,
                        _ => {
                            content.push('\\');
                            i += 1;
                        }
                    },
                    _ => {
                        content.push(c);
                        i += c.len_utf8();
                    }
                }
            }
            self.take_raw(rest.len(), Id::Literal);
        }

        let mut inner = Lexer::from_source("<backquote>", &content);
        let mut parser = Parser::new(&mut inner);
        let command = parser.compound_list()?;
        match parser.peek_token()?.id {
            TokenId::EndOfInput => parser.ensure_no_unread_here_doc()?,
            _ => {
                let location = parser.peek_location()?;
                return Err(Error {
                    cause: SyntaxError::MissingSeparator.into(),
                    location,
                });
            }
        }
        Ok(WordPart::CommandSub {
            command: Rc::new(command),
            backquoted: true,
        })
    }
}
