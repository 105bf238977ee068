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

//! Here-document content parser
//!
//! Content lines are read after the newline token ending the command line.
//! Each line is compared against the delimiter before anything else; content
//! lines of an expanding here-document are lexed in
//! [`HereDocBody`](super::LexMode::HereDocBody) mode, others are kept as
//! plain literals. The parsed body is backfilled into the here-document
//! node through its write-once cell.

use super::LexMode;
use super::core::Lexer;
use crate::id::Id;
use crate::parser::error::{Error, Result, SyntaxError};
use crate::syntax::{HereDoc, Word, WordPart};

impl Lexer {
    /// Reads the content of one here-document and fills its body.
    ///
    /// The current position must be at the start of a line.
    ///
    /// # Panics
    ///
    /// If the body has already been filled.
    pub fn here_doc_content(&mut self, here_doc: &HereDoc) -> Result<()> {
        let (delimiter, _) = here_doc.delimiter.unquote();
        let mut parts: Vec<WordPart> = Vec::new();

        loop {
            let rest = self.raw_rest();
            if rest.is_empty() {
                let redir_op_location = self.location_of(&here_doc.op);
                let location = self.current_location();
                return Err(Error {
                    cause: SyntaxError::UnclosedHereDocContent { redir_op_location }.into(),
                    location,
                });
            }

            let line = rest.strip_suffix('\n').unwrap_or(rest);
            let tabs = if here_doc.remove_tabs {
                line.bytes().take_while(|&b| b == b'\t').count()
            } else {
                0
            };

            if line[tabs..] == *delimiter {
                let len = rest.len();
                self.take_raw(len, Id::Literal);
                break;
            }

            if tabs > 0 {
                self.take_raw(tabs, Id::Blank);
            }

            if here_doc.do_expansion {
                self.read_expanding_line(&mut parts)?;
            } else {
                let len = self.raw_rest().len();
                let token = self.take_raw(len, Id::Literal);
                parts.push(WordPart::Literal(token));
            }
        }

        here_doc
            .body
            .set(Word::Compound(parts))
            .expect("here-doc content must be read just once");
        Ok(())
    }

    /// Lexes one content line of an expanding here-document.
    ///
    /// A line continuation or a multi-line substitution may carry the
    /// position onto following lines; those lines then count as consumed
    /// content and are not compared against the delimiter.
    fn read_expanding_line(&mut self, parts: &mut Vec<WordPart>) -> Result<()> {
        let start_line = self.line_index();
        self.push_mode(LexMode::HereDocBody);
        while self.line_index() == start_line {
            match self.word_part(false)? {
                Some(part) => parts.push(part),
                None => break,
            }
        }
        self.pop_mode();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::core::Parser;
    use crate::syntax::{Command, Redir, RedirBody};
    use assert_matches::assert_matches;

    fn parse_simple(code: &str) -> (Command, String) {
        let mut lexer = Lexer::from_source("-", code);
        let mut parser = Parser::new(&mut lexer);
        let command = parser.compound_list().unwrap();
        let reconstructed = lexer.arena().reconstruct();
        (command, reconstructed)
    }

    fn here_doc_of(redir: &Redir) -> &HereDoc {
        match &redir.body {
            RedirBody::HereDoc(here_doc) => here_doc.as_ref(),
            other => panic!("not a here-document: {other:?}"),
        }
    }

    #[test]
    fn plain_here_doc() {
        let (command, reconstructed) = parse_simple("cat <<EOF\nhello\nworld\nEOF\n");
        assert_eq!(reconstructed, "cat <<EOF\nhello\nworld\nEOF\n");
        assert_matches!(command, Command::Simple(simple) => {
            let here_doc = here_doc_of(&simple.redirs[0]);
            assert!(here_doc.was_filled());
            assert!(here_doc.do_expansion);
            let body = here_doc.body.get().unwrap();
            assert_eq!(body.to_string(), "hello\nworld\n");
        });
    }

    #[test]
    fn quoted_delimiter_disables_expansion() {
        let (command, _) = parse_simple("cat <<'EOF'\na $b c\nEOF\n");
        assert_matches!(command, Command::Simple(simple) => {
            let here_doc = here_doc_of(&simple.redirs[0]);
            assert!(!here_doc.do_expansion);
            let body = here_doc.body.get().unwrap();
            assert_eq!(body.parts().len(), 1);
            assert_matches!(&body.parts()[0], WordPart::Literal(token) => {
                assert_eq!(token.value, "a $b c\n");
            });
        });
    }

    #[test]
    fn expanding_here_doc_has_substitutions() {
        let (command, _) = parse_simple("cat <<EOF\na $b c\nEOF\n");
        assert_matches!(command, Command::Simple(simple) => {
            let here_doc = here_doc_of(&simple.redirs[0]);
            let body = here_doc.body.get().unwrap();
            assert_matches!(&body.parts()[1], WordPart::SimpleVarSub(token) => {
                assert_eq!(token.value, "$b");
            });
        });
    }

    #[test]
    fn dash_form_strips_tabs() {
        let (command, reconstructed) = parse_simple("cat <<-EOF\n\thello\n\tEOF\n");
        assert_eq!(reconstructed, "cat <<-EOF\n\thello\n\tEOF\n");
        assert_matches!(command, Command::Simple(simple) => {
            let here_doc = here_doc_of(&simple.redirs[0]);
            let body = here_doc.body.get().unwrap();
            assert_eq!(body.to_string(), "hello\n");
        });
    }

    #[test]
    fn two_here_docs_on_one_line() {
        let (command, _) = parse_simple("cat <<A <<B\none\nA\ntwo\nB\n");
        assert_matches!(command, Command::Simple(simple) => {
            assert_eq!(simple.redirs.len(), 2);
            let first = here_doc_of(&simple.redirs[0]);
            let second = here_doc_of(&simple.redirs[1]);
            assert_eq!(first.body.get().unwrap().to_string(), "one\n");
            assert_eq!(second.body.get().unwrap().to_string(), "two\n");
        });
    }

    #[test]
    fn missing_delimiter_is_an_error() {
        let mut lexer = Lexer::from_source("-", "cat <<EOF\nno end\n");
        let mut parser = Parser::new(&mut lexer);
        let e = parser.compound_list().unwrap_err();
        assert_matches!(
            e.cause,
            crate::parser::error::ErrorCause::Syntax(
                SyntaxError::UnclosedHereDocContent { .. }
            )
        );
    }
}
