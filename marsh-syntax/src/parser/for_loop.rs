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

//! Parsing of for loops
//!
//! Two forms are recognized: the word-iterating `for name [in word…]` and
//! the arithmetic `for ((init; cond; update))`. Omitting `in` entirely makes
//! the loop iterate over the positional parameters; `for name in;` iterates
//! an empty list.

use super::core::{Parser, TokenId};
use super::error::{Error, Result, SyntaxError};
use super::lex::rules::is_name;
use super::lex::{Keyword, LexMode};
use crate::id::Id;
use crate::parser::arith::arith_expr;
use crate::syntax::{ArithExpr, Command, ForEach, ForExpr, Token, Word, WordPart};

impl Parser<'_> {
    /// Parses a `for` loop, starting at the `for` keyword.
    pub fn for_command(&mut self) -> Result<Command> {
        self.take_token()?;

        if self.peek_id()? == TokenId::Operator(Id::OpenParen) {
            return self.for_expr_command();
        }

        let name = self.for_name()?;

        let (words, do_arg_iter) = match self.peek_id()? {
            TokenId::Token(Some(Keyword::In)) => {
                self.take_token()?;
                let mut words = Vec::new();
                while let TokenId::Token(_) = self.peek_id()? {
                    words.push(self.take_token()?.word);
                }
                match self.peek_id()? {
                    TokenId::Operator(Id::Semicolon) => {
                        self.take_token()?;
                    }
                    TokenId::Operator(Id::Newline) => {}
                    _ => return Err(self.error_here(SyntaxError::MissingDo)),
                }
                (words, false)
            }
            TokenId::Operator(Id::Semicolon) => {
                self.take_token()?;
                (Vec::new(), true)
            }
            TokenId::Operator(Id::Newline) | TokenId::Token(Some(Keyword::Do)) => {
                (Vec::new(), true)
            }
            _ => return Err(self.error_here(SyntaxError::MissingDo)),
        };

        self.skip_newlines()?;
        let body = self.do_group()?;
        let redirs = self.redirections()?;
        Ok(Command::ForEach(ForEach {
            name,
            words,
            do_arg_iter,
            body: Box::new(body),
            redirs,
        }))
    }

    /// Parses and validates the loop variable name.
    fn for_name(&mut self) -> Result<Token> {
        match self.peek_id()? {
            TokenId::Token(_) => {}
            _ => return Err(self.error_here(SyntaxError::MissingForName)),
        }
        let location = self.peek_location()?;
        let word = self.take_token()?.word;
        let valid = word
            .to_string_if_literal()
            .is_some_and(|name| is_name(&name));
        if !valid {
            return Err(Error {
                cause: SyntaxError::InvalidForName.into(),
                location,
            });
        }
        match word {
            Word::Compound(parts) => match parts.into_iter().next() {
                Some(WordPart::Literal(token)) => Ok(token),
                _ => unreachable!("a valid name is a single literal"),
            },
            Word::Token(token) => Ok(token),
        }
    }

    /// Parses an arithmetic `for ((…; …; …))` loop after the `for` keyword.
    fn for_expr_command(&mut self) -> Result<Command> {
        let opening_location = self.peek_location()?;
        self.take_token()?;
        if self.lexer().peek_raw_char() != Some('(') {
            return Err(Error {
                cause: SyntaxError::InvalidCommandToken.into(),
                location: opening_location,
            });
        }
        let lexer = self.lexer();
        lexer.take_raw(1, Id::OpenParen);
        lexer.push_mode(LexMode::Arith);

        let init = self.arith_section(Id::Semicolon)?;
        let cond = self.arith_section(Id::Semicolon)?;
        let update = self.arith_section(Id::CloseParen)?;

        let lexer = self.lexer();
        if lexer.peek_id() != Id::CloseParen {
            let location = lexer.current_location();
            return Err(Error {
                cause: SyntaxError::UnclosedArith { opening_location }.into(),
                location,
            });
        }
        lexer.next_token();
        lexer.pop_mode();

        match self.peek_id()? {
            TokenId::Operator(Id::Semicolon) => {
                self.take_token()?;
            }
            _ => {}
        }
        self.skip_newlines()?;
        let body = self.do_group()?;
        let redirs = self.redirections()?;
        Ok(Command::ForExpr(ForExpr {
            init,
            cond,
            update,
            body: Box::new(body),
            redirs,
        }))
    }

    /// Parses one optional expression of the arithmetic for header, ending
    /// at the given terminator, which is consumed.
    fn arith_section(&mut self, terminator: Id) -> Result<Option<ArithExpr>> {
        let lexer = self.lexer();
        let expr = loop {
            match lexer.peek_id() {
                Id::Blank | Id::LineContinuation => {
                    lexer.next_token();
                }
                id if id == terminator => break None,
                _ => break Some(arith_expr(lexer)?),
            }
        };
        if lexer.peek_id() != terminator {
            let location = lexer.current_location();
            return Err(Error {
                cause: SyntaxError::InvalidArithExpr.into(),
                location,
            });
        }
        lexer.next_token();
        Ok(expr)
    }
}
