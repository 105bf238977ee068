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

//! Fundamentals for implementing the parser
//!
//! The [`Parser`] holds a reference to the [lexer](Lexer), one command-level
//! token of look-ahead, and the queue of here-documents whose contents have
//! not been read yet. Consuming a newline token is the moment the queue is
//! drained; see [`Parser::here_doc_contents`].

use super::error::{Error, Result, SyntaxError};
use super::lex::{Lexer, LexerCheckpoint};
use crate::id::Id;
use crate::source::Location;
use crate::syntax::HereDoc;
use std::rc::Rc;

pub use super::lex::{CmdToken, TokenId};

/// Saved parser state, produced by [`Parser::checkpoint`]
#[derive(Debug)]
pub struct ParserCheckpoint {
    lexer: LexerCheckpoint,
    token: Option<CmdToken>,
    here_docs: usize,
}

/// The shell syntax parser
///
/// The parser is a family of recursive-descent functions spread over the
/// sibling modules, one per syntactic construct, all methods on this type.
/// [`compound_list`](Self::compound_list) is the entry point for a whole
/// program or any command list.
#[derive(Debug)]
#[must_use = "Parser must be used to parse syntax"]
pub struct Parser<'l> {
    lexer: &'l mut Lexer,

    /// Token to parse next
    token: Option<CmdToken>,

    /// Here-documents whose contents have not been read yet
    unread_here_docs: Vec<Rc<HereDoc>>,
}

impl<'l> Parser<'l> {
    /// Creates a new parser based on the given lexer.
    pub fn new(lexer: &'l mut Lexer) -> Parser<'l> {
        Parser {
            lexer,
            token: None,
            unread_here_docs: Vec::new(),
        }
    }

    /// Returns a reference to the current token, reading it from the lexer
    /// if not yet read.
    pub fn peek_token(&mut self) -> Result<&CmdToken> {
        if self.token.is_none() {
            self.token = Some(self.lexer.cmd_token()?);
        }
        Ok(self.token.as_ref().unwrap())
    }

    /// Returns the id of the current token.
    pub fn peek_id(&mut self) -> Result<TokenId> {
        Ok(self.peek_token()?.id)
    }

    /// Consumes the current token.
    pub fn take_token(&mut self) -> Result<CmdToken> {
        self.peek_token()?;
        Ok(self.token.take().unwrap())
    }

    /// Returns the location of the current token for diagnostics.
    pub fn peek_location(&mut self) -> Result<Location> {
        self.peek_token()?;
        let token = self.token.as_ref().unwrap();
        Ok(match token.word.first_span() {
            Some(span) => self.lexer.arena().location(span),
            None => self.lexer.current_location(),
        })
    }

    /// Returns the location of a word for diagnostics.
    pub fn word_location(&mut self, word: &crate::syntax::Word) -> Location {
        match word.first_span() {
            Some(span) => self.lexer.arena().location(span),
            None => self.lexer.current_location(),
        }
    }

    /// Constructs an error blaming the current token.
    pub fn error_here(&mut self, cause: SyntaxError) -> Error {
        let location = self
            .peek_location()
            .unwrap_or_else(|error| error.location);
        Error {
            cause: cause.into(),
            location,
        }
    }

    /// Returns a mutable reference to the underlying lexer.
    ///
    /// The token buffer must be empty when the lexer is used directly, or
    /// tokens would be parsed out of order.
    pub fn lexer(&mut self) -> &mut Lexer {
        debug_assert!(self.token.is_none(), "look-ahead token would be bypassed");
        self.lexer
    }

    /// Tests if the token buffer is empty.
    #[must_use]
    pub fn has_buffered_token(&self) -> bool {
        self.token.is_some()
    }

    /// Saves the current state so a tentative parse can be undone.
    pub fn checkpoint(&mut self) -> ParserCheckpoint {
        ParserCheckpoint {
            lexer: self.lexer.checkpoint(),
            token: self.token.clone(),
            here_docs: self.unread_here_docs.len(),
        }
    }

    /// Returns to a previously saved state.
    pub fn rewind(&mut self, checkpoint: ParserCheckpoint) {
        self.lexer.rewind(checkpoint.lexer);
        self.token = checkpoint.token;
        self.unread_here_docs.truncate(checkpoint.here_docs);
    }

    /// Queues a here-document for content reading at the next newline.
    pub fn memorize_unread_here_doc(&mut self, here_doc: Rc<HereDoc>) {
        self.unread_here_docs.push(here_doc);
    }

    /// Reads the contents of all pending here-documents.
    ///
    /// Must be called immediately after consuming a newline token.
    pub fn here_doc_contents(&mut self) -> Result<()> {
        debug_assert!(self.token.is_none(), "here-doc contents read out of order");
        for here_doc in std::mem::take(&mut self.unread_here_docs) {
            self.lexer.here_doc_content(&here_doc)?;
        }
        Ok(())
    }

    /// Fails if any here-document is still waiting for its content.
    pub fn ensure_no_unread_here_doc(&mut self) -> Result<()> {
        match self.unread_here_docs.first() {
            None => Ok(()),
            Some(here_doc) => {
                let location = self.lexer.location_of(&here_doc.op);
                Err(Error {
                    cause: SyntaxError::MissingHereDocContent.into(),
                    location,
                })
            }
        }
    }

    /// Consumes the current newline token and reads pending here-document
    /// contents.
    pub fn newline(&mut self) -> Result<()> {
        debug_assert_eq!(
            self.token.as_ref().map(|token| token.id),
            Some(TokenId::Operator(Id::Newline)),
        );
        self.token = None;
        self.here_doc_contents()
    }

    /// Skips newline tokens, reading pending here-document contents.
    pub fn skip_newlines(&mut self) -> Result<()> {
        while self.peek_id()? == TokenId::Operator(Id::Newline) {
            self.newline()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_and_take() {
        let mut lexer = Lexer::from_source("-", "one two");
        let mut parser = Parser::new(&mut lexer);
        assert_eq!(parser.peek_token().unwrap().word.to_string(), "one");
        assert_eq!(parser.take_token().unwrap().word.to_string(), "one");
        assert_eq!(parser.take_token().unwrap().word.to_string(), "two");
        assert_eq!(parser.peek_id().unwrap(), TokenId::EndOfInput);
    }

    #[test]
    fn checkpoint_restores_buffered_token() {
        let mut lexer = Lexer::from_source("-", "a b c");
        let mut parser = Parser::new(&mut lexer);
        parser.peek_token().unwrap();
        let checkpoint = parser.checkpoint();
        parser.take_token().unwrap();
        parser.take_token().unwrap();
        parser.rewind(checkpoint);
        assert_eq!(parser.take_token().unwrap().word.to_string(), "a");
        assert_eq!(parser.take_token().unwrap().word.to_string(), "b");
    }

    #[test]
    fn skip_newlines_consumes_blank_lines() {
        let mut lexer = Lexer::from_source("-", "\n\n\nword");
        let mut parser = Parser::new(&mut lexer);
        parser.skip_newlines().unwrap();
        assert_eq!(parser.take_token().unwrap().word.to_string(), "word");
    }
}
