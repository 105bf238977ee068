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

//! Conversions from strings to syntactic objects
//!
//! These implementations make quick work of building AST fragments in tests
//! and embedding code. They parse with an anonymous source, so locations in
//! the result are of limited use; parse through
//! [`parse_program`](super::parse_program) when provenance matters.

use super::core::Parser;
use super::error::Error;
use super::lex::Lexer;
use crate::syntax::{Command, Word};
use std::str::FromStr;

/// Parses a word from a string.
///
/// ```
/// # use marsh_syntax::syntax::Word;
/// let word: Word = "a'b c'$d".parse().unwrap();
/// assert_eq!(word.to_string(), "a'b c'$d");
/// assert_eq!(word.parts().len(), 3);
/// ```
impl FromStr for Word {
    type Err = Error;
    fn from_str(s: &str) -> Result<Word, Error> {
        let mut lexer = Lexer::from_source("<string>", s);
        lexer.word()
    }
}

/// Parses a command list from a string.
///
/// A single command comes back unwrapped, a sequence as a
/// [`List`](Command::List), an empty string as [`NoOp`](Command::NoOp).
///
/// ```
/// # use marsh_syntax::syntax::Command;
/// let command: Command = "a | b && c".parse().unwrap();
/// assert_eq!(command.to_string(), "a | b && c");
/// ```
impl FromStr for Command {
    type Err = Error;
    fn from_str(s: &str) -> Result<Command, Error> {
        let mut lexer = Lexer::from_source("<string>", s);
        let mut parser = Parser::new(&mut lexer);
        let command = parser.compound_list()?;
        parser.ensure_no_unread_here_doc()?;
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn word_from_str() {
        let word: Word = "\"${x:-y}\"".parse().unwrap();
        assert_eq!(word.to_string(), "\"${x:-y}\"");
    }

    #[test]
    fn command_from_str() {
        let command: Command = "while a; do b; done".parse().unwrap();
        assert_matches!(command, Command::While { .. });
    }

    #[test]
    fn empty_command_from_str() {
        let command: Command = "".parse().unwrap();
        assert_matches!(command, Command::NoOp);
    }
}
