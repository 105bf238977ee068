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

//! Parsing of redirections

use super::core::{Parser, TokenId};
use super::error::{Result, SyntaxError};
use crate::id::Id;
use crate::syntax::{HereDoc, Redir, RedirBody};
use std::cell::OnceCell;
use std::rc::Rc;

impl Parser<'_> {
    /// Parses a redirection if the next token starts one.
    ///
    /// A here-document operator only parses its delimiter here; the content
    /// is read after the next newline token and backfilled into the node.
    pub fn redirection(&mut self) -> Result<Option<Redir>> {
        let fd = if self.peek_id()? == TokenId::IoNumber {
            Some(self.take_token()?.into_token())
        } else {
            None
        };

        let op_id = match self.peek_id()? {
            TokenId::Operator(id) if id.is_redirect_operator() => id,
            _ => {
                return if fd.is_some() {
                    // The lexer only produces an IO number directly before a
                    // redirection operator.
                    Err(self.error_here(SyntaxError::MissingRedirOperand))
                } else {
                    Ok(None)
                };
            }
        };
        let op = self.take_token()?.into_token();

        if let Id::LessLess | Id::LessLessDash = op_id {
            let delimiter = match self.peek_id()? {
                TokenId::Token(_) => self.take_token()?.word,
                _ => return Err(self.error_here(SyntaxError::MissingHereDocDelimiter)),
            };
            let (_, quoted) = delimiter.unquote();
            let here_doc = Rc::new(HereDoc {
                remove_tabs: op_id == Id::LessLessDash,
                do_expansion: !quoted,
                op,
                delimiter,
                body: OnceCell::new(),
            });
            self.memorize_unread_here_doc(Rc::clone(&here_doc));
            Ok(Some(Redir {
                fd,
                body: RedirBody::HereDoc(here_doc),
            }))
        } else {
            let target = match self.peek_id()? {
                TokenId::Token(_) => self.take_token()?.word,
                _ => return Err(self.error_here(SyntaxError::MissingRedirOperand)),
            };
            Ok(Some(Redir {
                fd,
                body: RedirBody::File { op, target },
            }))
        }
    }

    /// Parses as many redirections as there are.
    pub fn redirections(&mut self) -> Result<Vec<Redir>> {
        let mut redirs = Vec::new();
        while let Some(redir) = self.redirection()? {
            redirs.push(redir);
        }
        Ok(redirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::Lexer;
    use assert_matches::assert_matches;

    fn parse_redir(code: &str) -> Option<Redir> {
        let mut lexer = Lexer::from_source("-", code);
        let mut parser = Parser::new(&mut lexer);
        parser.redirection().unwrap()
    }

    #[test]
    fn file_redirections() {
        let redir = parse_redir("> out.txt").unwrap();
        assert_eq!(redir.fd, None);
        assert_matches!(redir.body, RedirBody::File { op, target } => {
            assert_eq!(op.id, Id::Greater);
            assert_eq!(target.to_string(), "out.txt");
        });
        assert_eq!(parse_redir(">> log").unwrap().to_string(), ">>log");
        assert_eq!(parse_redir("<&3").unwrap().to_string(), "<&3");
        assert_eq!(parse_redir(">| f").unwrap().to_string(), ">|f");
    }

    #[test]
    fn io_number_prefix() {
        let redir = parse_redir("2>&1").unwrap();
        assert_matches!(&redir.fd, Some(fd) => assert_eq!(fd.value, "2"));
        assert_eq!(redir.to_string(), "2>&1");
    }

    #[test]
    fn not_a_redirection() {
        assert!(parse_redir("word").is_none());
    }

    #[test]
    fn here_doc_opener() {
        let redir = parse_redir("<<EOF").unwrap();
        assert_matches!(redir.body, RedirBody::HereDoc(here_doc) => {
            assert!(!here_doc.remove_tabs);
            assert!(here_doc.do_expansion);
            assert!(!here_doc.was_filled());
        });

        let redir = parse_redir("<<-\"END\"").unwrap();
        assert_matches!(redir.body, RedirBody::HereDoc(here_doc) => {
            assert!(here_doc.remove_tabs);
            assert!(!here_doc.do_expansion);
        });
    }

    #[test]
    fn missing_operand() {
        let mut lexer = Lexer::from_source("-", "> >");
        let mut parser = Parser::new(&mut lexer);
        let e = parser.redirection().unwrap_err();
        assert_matches!(
            e.cause,
            crate::parser::error::ErrorCause::Syntax(SyntaxError::MissingRedirOperand)
        );
    }
}
