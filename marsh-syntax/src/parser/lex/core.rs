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

//! Fundamental building blocks for the lexical analyzer
//!
//! The [`Lexer`] drives the [mode match tables](super::rules): it tracks the
//! current position in the source, keeps the stack of active
//! [modes](LexMode), buffers one token of look-ahead, and records a span in
//! the [arena](Arena) for every consumed token.
//!
//! Parsers use [`checkpoint`](Lexer::checkpoint) and
//! [`rewind`](Lexer::rewind) to try a production and back out of it;
//! rewinding restores the position, the mode stack, and the span record.

use super::LexMode;
use super::rules;
use crate::id::Id;
use crate::source::{Arena, LineSpan, Location};
use crate::syntax::Token;

/// Saved lexer state, produced by [`Lexer::checkpoint`]
#[derive(Clone, Debug)]
pub struct LexerCheckpoint {
    line: usize,
    col: usize,
    modes: Vec<LexMode>,
    spans: usize,
}

/// Lexical analyzer
///
/// A lexer owns the arena holding the source lines and produces tokens on
/// demand. Tokenization is driven by the topmost entry of the mode stack;
/// the word and command parsers push and pop modes as they go.
#[derive(Debug)]
pub struct Lexer {
    arena: Arena,
    line: usize,
    col: usize,
    modes: Vec<LexMode>,
    peeked: Option<(Token, usize)>,
}

impl Lexer {
    /// Creates a lexer for the given source text.
    ///
    /// The path is only used in diagnostics.
    #[must_use]
    pub fn from_source(path: &str, code: &str) -> Lexer {
        Lexer {
            arena: Arena::from_source(path, code),
            line: 0,
            col: 0,
            modes: vec![LexMode::Outer],
            peeked: None,
        }
    }

    /// Returns the arena holding the source lines and recorded spans.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Consumes the lexer, returning the arena.
    #[must_use]
    pub fn into_arena(self) -> Arena {
        self.arena
    }

    /// Returns the current lexical mode, the top of the mode stack.
    #[must_use]
    pub fn mode(&self) -> LexMode {
        *self.modes.last().unwrap()
    }

    /// Pushes a mode, discarding any pending look-ahead.
    pub fn push_mode(&mut self, mode: LexMode) {
        self.peeked = None;
        self.modes.push(mode);
    }

    /// Pops the current mode, discarding any pending look-ahead.
    ///
    /// # Panics
    ///
    /// If this would pop the outermost mode.
    pub fn pop_mode(&mut self) {
        self.peeked = None;
        self.modes.pop();
        assert!(!self.modes.is_empty(), "popped the outermost lexical mode");
    }

    /// Moves the position past lines that have been fully consumed.
    fn skip_exhausted_lines(&mut self) {
        while self.line < self.arena.line_count() {
            let len = self.arena.line(self.arena.line_id(self.line)).text.len();
            if self.col < len {
                break;
            }
            self.line += 1;
            self.col = 0;
        }
    }

    /// Returns the unconsumed suffix of the current line, or `None` at the
    /// end of input. Advances over exhausted lines first.
    fn rest(&mut self) -> Option<(usize, usize, &str)> {
        self.skip_exhausted_lines();
        if self.line < self.arena.line_count() {
            let text = &self.arena.line(self.arena.line_id(self.line)).text;
            Some((self.line, self.col, &text[self.col..]))
        } else {
            None
        }
    }

    /// Returns the index of the line the next token starts on.
    pub(crate) fn line_index(&mut self) -> usize {
        self.skip_exhausted_lines();
        self.line
    }

    /// Peeks the next token in the current mode without consuming it.
    pub fn peek(&mut self) -> &Token {
        if self.peeked.is_none() {
            let mode = self.mode();
            let token = match self.rest() {
                None => (Token::new(Id::EndOfInput, ""), 0),
                Some((_, _, rest)) => {
                    let (id, len) = rules::match_token(mode, rest);
                    (Token::new(id, &rest[..len]), len)
                }
            };
            self.peeked = Some(token);
        }
        &self.peeked.as_ref().unwrap().0
    }

    /// Returns the id of the next token in the current mode.
    pub fn peek_id(&mut self) -> Id {
        self.peek().id
    }

    /// Consumes the next token, recording its span in the arena.
    pub fn next_token(&mut self) -> Token {
        self.peek();
        let (mut token, len) = self.peeked.take().unwrap();
        if len > 0 {
            let span = self.arena.add_span(LineSpan {
                line_id: self.arena.line_id(self.line),
                col: self.col,
                length: len,
            });
            token.span = Some(span);
            self.col += len;
        }
        token
    }

    /// Peeks the next raw character, ignoring the mode tables.
    pub fn peek_raw_char(&mut self) -> Option<char> {
        self.peeked = None;
        self.rest().and_then(|(_, _, rest)| rest.chars().next())
    }

    /// Returns the unconsumed suffix of the current line, ignoring the mode
    /// tables.
    pub fn raw_rest(&mut self) -> &str {
        self.peeked = None;
        self.skip_exhausted_lines();
        if self.line < self.arena.line_count() {
            &self.arena.line(self.arena.line_id(self.line)).text[self.col..]
        } else {
            ""
        }
    }

    /// Consumes `len` bytes of the current line as one token of the given id.
    ///
    /// # Panics
    ///
    /// If fewer than `len` bytes remain on the current line.
    pub fn take_raw(&mut self, len: usize, id: Id) -> Token {
        self.peeked = None;
        let (line, col, rest) = self.rest().expect("no input left for a raw token");
        assert!(len <= rest.len(), "raw token would cross a line boundary");
        let value = rest[..len].to_string();
        let span = self.arena.add_span(LineSpan {
            line_id: self.arena.line_id(line),
            col,
            length: len,
        });
        self.col += len;
        Token {
            id,
            value,
            span: Some(span),
        }
    }

    /// Saves the current position, mode stack, and span watermark.
    pub fn checkpoint(&mut self) -> LexerCheckpoint {
        self.peeked = None;
        LexerCheckpoint {
            line: self.line,
            col: self.col,
            modes: self.modes.clone(),
            spans: self.arena.span_count(),
        }
    }

    /// Returns to a previously saved state.
    ///
    /// Spans recorded after the checkpoint are discarded so that an abandoned
    /// parse leaves no residue in the arena.
    pub fn rewind(&mut self, checkpoint: LexerCheckpoint) {
        self.peeked = None;
        self.line = checkpoint.line;
        self.col = checkpoint.col;
        self.modes = checkpoint.modes;
        self.arena.truncate_spans(checkpoint.spans);
    }

    /// Returns the location of the given token for diagnostics.
    ///
    /// Tokens without a span report the end of input.
    #[must_use]
    pub fn location_of(&self, token: &Token) -> Location {
        match token.span {
            Some(span) => self.arena.location(span),
            None => self.arena.end_location(),
        }
    }

    /// Returns the location of the next unconsumed character.
    pub fn current_location(&mut self) -> Location {
        self.peeked = None;
        self.skip_exhausted_lines();
        if self.line < self.arena.line_count() {
            let line = self.arena.line(self.arena.line_id(self.line)).clone();
            let len = line.text[self.col..].chars().next().map_or(0, char::len_utf8);
            Location {
                range: self.col..self.col + len,
                line,
            }
        } else {
            self.arena.end_location()
        }
    }

    /// Skips blank tokens, line continuations, and comments.
    ///
    /// A `#` starts a comment only at the start of a word, which is exactly
    /// when this function is called.
    pub fn skip_blanks_and_comment(&mut self) {
        loop {
            match self.peek_id() {
                Id::Blank | Id::LineContinuation => {
                    self.next_token();
                }
                Id::Pound => {
                    self.next_token();
                    if let Some(c) = self.peek_raw_char() {
                        if c != '\n' {
                            self.push_mode(LexMode::Comment);
                            self.next_token();
                            self.pop_mode();
                        }
                    }
                }
                _ => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_and_spans_round_trip() {
        let mut lexer = Lexer::from_source("-", "echo  foo\n");
        let t1 = lexer.next_token();
        assert_eq!((t1.id, t1.value.as_str()), (Id::Literal, "echo"));
        let t2 = lexer.next_token();
        assert_eq!((t2.id, t2.value.as_str()), (Id::Blank, "  "));
        let t3 = lexer.next_token();
        assert_eq!((t3.id, t3.value.as_str()), (Id::Literal, "foo"));
        let t4 = lexer.next_token();
        assert_eq!(t4.id, Id::Newline);
        assert_eq!(lexer.next_token().id, Id::EndOfInput);
        assert_eq!(lexer.arena().reconstruct(), "echo  foo\n");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::from_source("-", "a b");
        assert_eq!(lexer.peek_id(), Id::Literal);
        assert_eq!(lexer.peek().value, "a");
        let token = lexer.next_token();
        assert_eq!(token.value, "a");
    }

    #[test]
    fn mode_switch_relexes() {
        let mut lexer = Lexer::from_source("-", "a&&b");
        lexer.next_token();
        assert_eq!(lexer.peek_id(), Id::AndAnd);
        lexer.push_mode(LexMode::SingleQuoted);
        assert_eq!(lexer.peek_id(), Id::Literal);
        assert_eq!(lexer.peek().value, "&&b");
        lexer.pop_mode();
        assert_eq!(lexer.peek_id(), Id::AndAnd);
    }

    #[test]
    fn checkpoint_rewind_restores_everything() {
        let mut lexer = Lexer::from_source("-", "one two\n");
        lexer.next_token();
        let checkpoint = lexer.checkpoint();
        let spans = lexer.arena().span_count();
        lexer.next_token();
        lexer.push_mode(LexMode::Arith);
        lexer.next_token();
        lexer.rewind(checkpoint);
        assert_eq!(lexer.mode(), LexMode::Outer);
        assert_eq!(lexer.arena().span_count(), spans);
        assert_eq!(lexer.next_token().value, " ");
        assert_eq!(lexer.next_token().value, "two");
    }

    #[test]
    fn multi_line_input_advances() {
        let mut lexer = Lexer::from_source("-", "a\nb\n");
        assert_eq!(lexer.next_token().value, "a");
        assert_eq!(lexer.next_token().id, Id::Newline);
        assert_eq!(lexer.next_token().value, "b");
    }

    #[test]
    fn skip_blanks_and_comment_stops_before_newline() {
        let mut lexer = Lexer::from_source("-", "  # note\nx");
        lexer.skip_blanks_and_comment();
        assert_eq!(lexer.peek_id(), Id::Newline);
        lexer.next_token();
        lexer.skip_blanks_and_comment();
        assert_eq!(lexer.peek().value, "x");
        assert_eq!(lexer.arena().reconstruct(), "  # note\nx");
    }
}
