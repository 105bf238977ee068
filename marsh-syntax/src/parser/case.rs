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

//! Parsing of the case command
//!
//! Each arm records how it hands control onward: `;;` stops, `;&` falls
//! through into the next arm's body unconditionally, and `;;&` resumes
//! testing the remaining patterns. A fall-through arm does not inherit the
//! previous arm's redirections; an arm only ever owns its own.

use super::core::{Parser, TokenId};
use super::error::{Error, Result, SyntaxError};
use super::lex::Keyword;
use crate::id::Id;
use crate::syntax::{CaseArm, CaseContinuation, Command};

impl Parser<'_> {
    /// Parses a `case` command, starting at the `case` keyword.
    pub fn case_command(&mut self) -> Result<Command> {
        self.take_token()?;

        let subject = match self.peek_id()? {
            TokenId::Token(_) => self.take_token()?.word,
            _ => return Err(self.error_here(SyntaxError::MissingCaseSubject)),
        };

        self.skip_newlines()?;
        if self.peek_id()? != TokenId::Token(Some(Keyword::In)) {
            return Err(self.error_here(SyntaxError::MissingIn));
        }
        self.take_token()?;

        let mut arms = Vec::new();
        loop {
            self.skip_newlines()?;
            match self.peek_id()? {
                TokenId::Token(Some(Keyword::Esac)) => {
                    self.take_token()?;
                    break;
                }
                TokenId::EndOfInput => {
                    return Err(self.error_here(SyntaxError::MissingEsac));
                }
                _ => arms.push(self.case_arm()?),
            }
        }

        let redirs = self.redirections()?;
        Ok(Command::Case {
            subject,
            arms,
            redirs,
        })
    }

    /// Parses one arm of a `case` command.
    fn case_arm(&mut self) -> Result<CaseArm> {
        if self.peek_id()? == TokenId::Operator(Id::OpenParen) {
            self.take_token()?;
        }

        let mut patterns = Vec::new();
        loop {
            match self.peek_id()? {
                TokenId::Token(_) => patterns.push(self.take_token()?.word),
                _ => return Err(self.error_here(SyntaxError::UnclosedCasePattern)),
            }
            match self.peek_id()? {
                TokenId::Operator(Id::Bar) => {
                    self.take_token()?;
                }
                TokenId::Operator(Id::CloseParen) => {
                    self.take_token()?;
                    break;
                }
                _ => return Err(self.error_here(SyntaxError::UnclosedCasePattern)),
            }
        }

        let body = self.compound_list()?;

        let continuation = match self.peek_id()? {
            TokenId::Operator(Id::SemicolonSemicolon) => {
                self.take_token()?;
                CaseContinuation::Break
            }
            TokenId::Operator(Id::SemicolonAnd) => {
                self.take_token()?;
                CaseContinuation::FallThrough
            }
            TokenId::Operator(Id::SemicolonSemicolonAnd) => {
                self.take_token()?;
                CaseContinuation::Continue
            }
            // The last arm may omit its terminator.
            TokenId::Token(Some(Keyword::Esac)) => CaseContinuation::Break,
            _ => {
                let location = self.peek_location()?;
                return Err(Error {
                    cause: SyntaxError::MissingEsac.into(),
                    location,
                });
            }
        };

        Ok(CaseArm {
            patterns,
            body,
            continuation,
        })
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
        parser.compound_list().unwrap()
    }

    #[test]
    fn simple_case() {
        let command = parse("case $x in a) echo a;; b|c) echo bc;; esac");
        assert_matches!(command, Command::Case { subject, arms, .. } => {
            assert_eq!(subject.to_string(), "$x");
            assert_eq!(arms.len(), 2);
            assert_eq!(arms[0].patterns.len(), 1);
            assert_eq!(arms[1].patterns.len(), 2);
            assert_eq!(arms[0].continuation, CaseContinuation::Break);
        });
    }

    #[test]
    fn rescanning_terminator() {
        let command = parse("case a in a) echo A;;& *) echo star;;& *) echo star2;; esac");
        assert_matches!(command, Command::Case { arms, .. } => {
            assert_eq!(arms.len(), 3);
            assert_eq!(arms[0].continuation, CaseContinuation::Continue);
            assert_eq!(arms[1].continuation, CaseContinuation::Continue);
            assert_eq!(arms[2].continuation, CaseContinuation::Break);
        });
    }

    #[test]
    fn fall_through_terminator() {
        let command = parse("case a in a) echo A;& XX) echo two;& YY) echo three;; esac");
        assert_matches!(command, Command::Case { arms, .. } => {
            assert_eq!(arms[0].continuation, CaseContinuation::FallThrough);
            assert_eq!(arms[1].continuation, CaseContinuation::FallThrough);
        });
    }

    #[test]
    fn optional_open_paren_and_empty_body() {
        let command = parse("case x in (a) ;; (b) echo b ;; esac");
        assert_matches!(command, Command::Case { arms, .. } => {
            assert_eq!(arms.len(), 2);
            assert_matches!(arms[0].body, Command::NoOp);
        });
    }

    #[test]
    fn last_arm_without_terminator() {
        let command = parse("case x in a) echo a\nesac");
        assert_matches!(command, Command::Case { arms, .. } => {
            assert_eq!(arms.len(), 1);
            assert_eq!(arms[0].continuation, CaseContinuation::Break);
        });
    }

    #[test]
    fn patterns_may_be_keywords_or_globs() {
        let command = parse("case x in if|'*'|*) :;; esac");
        assert_matches!(command, Command::Case { arms, .. } => {
            assert_eq!(arms[0].patterns.len(), 3);
        });
    }

    #[test]
    fn missing_esac() {
        let mut lexer = Lexer::from_source("-", "case x in a) :;;");
        let mut parser = Parser::new(&mut lexer);
        let e = parser.compound_list().unwrap_err();
        assert_matches!(
            e.cause,
            crate::parser::error::ErrorCause::Syntax(SyntaxError::MissingEsac)
        );
    }

    #[test]
    fn multi_line_case() {
        let command = parse("case $x in\n  a)\n    echo a\n    ;;\n  *)\n    echo other\n    ;;\nesac");
        assert_matches!(command, Command::Case { arms, .. } => {
            assert_eq!(arms.len(), 2);
        });
    }
}
