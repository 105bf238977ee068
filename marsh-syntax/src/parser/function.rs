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

//! Parsing of function definitions
//!
//! Both the POSIX form `name() compound` and the `function name` form are
//! recognized. The name must be a valid identifier; the body must be a
//! compound command.

use super::core::{Parser, TokenId};
use super::error::{Error, Result, SyntaxError};
use super::lex::rules::is_name;
use super::lex::Keyword;
use crate::id::Id;
use crate::syntax::{Command, Word};

impl Parser<'_> {
    /// Parses a POSIX-form function definition whose name has already been
    /// consumed; the current token is the `(`.
    pub fn function_definition(&mut self, name: Word) -> Result<Command> {
        let name_location = self.word_location(&name);
        self.take_token()?;
        if self.peek_id()? != TokenId::Operator(Id::CloseParen) {
            return Err(self.error_here(SyntaxError::InvalidFunctionName));
        }
        self.take_token()?;

        if !name.to_string_if_literal().is_some_and(|n| is_name(&n)) {
            return Err(Error {
                cause: SyntaxError::InvalidFunctionName.into(),
                location: name_location,
            });
        }

        self.function_body(name)
    }

    /// Parses a `function name` definition, starting at the keyword.
    pub fn function_keyword_definition(&mut self) -> Result<Command> {
        self.take_token()?;
        let name = match self.peek_id()? {
            TokenId::Token(_) => {
                let location = self.peek_location()?;
                let word = self.take_token()?.word;
                if !word.to_string_if_literal().is_some_and(|n| is_name(&n)) {
                    return Err(Error {
                        cause: SyntaxError::InvalidFunctionName.into(),
                        location,
                    });
                }
                word
            }
            _ => return Err(self.error_here(SyntaxError::InvalidFunctionName)),
        };

        if self.peek_id()? == TokenId::Operator(Id::OpenParen) {
            self.take_token()?;
            if self.peek_id()? != TokenId::Operator(Id::CloseParen) {
                return Err(self.error_here(SyntaxError::InvalidFunctionName));
            }
            self.take_token()?;
        }

        self.function_body(name)
    }

    /// Parses the compound command forming the function body.
    fn function_body(&mut self, name: Word) -> Result<Command> {
        self.skip_newlines()?;
        let body = match self.peek_id()? {
            TokenId::Token(Some(
                Keyword::If
                | Keyword::Case
                | Keyword::For
                | Keyword::While
                | Keyword::Until
                | Keyword::OpenBrace
                | Keyword::OpenBracketBracket,
            ))
            | TokenId::Operator(Id::OpenParen) => self.command()?,
            _ => return Err(self.error_here(SyntaxError::MissingFunctionBody)),
        };
        Ok(Command::FuncDef {
            name,
            body: Box::new(body),
            redirs: Vec::new(),
        })
    }
}
