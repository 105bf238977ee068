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

//! Parsing of simple commands
//!
//! A simple command is a run of assignment words, ordinary words, and
//! redirections. If no command name follows the assignments, the node is an
//! [`Assignment`](Command::Assignment); a declaring word such as `export`
//! followed only by assignment-shaped words also counts as one.

use super::core::{Parser, TokenId};
use super::error::{Result, SyntaxError};
use crate::id::Id;
use crate::syntax::{AssignPair, Command, SimpleCommand, Word, WordPart};

/// Splits a word into an assignment pair if it starts with `name=`.
fn to_assign_pair(word: Word) -> std::result::Result<AssignPair, Word> {
    match word {
        Word::Compound(mut parts)
            if matches!(
                parts.first(),
                Some(WordPart::Literal(token)) if token.id == Id::VarLike
            ) =>
        {
            let Some(WordPart::Literal(name)) = parts.first().cloned() else {
                unreachable!()
            };
            parts.remove(0);
            Ok(AssignPair {
                append: name.value.ends_with("+="),
                name,
                value: Word::Compound(parts),
            })
        }
        other => Err(other),
    }
}

/// Tests if the word has the `name=value` shape.
fn is_assign_word(word: &Word) -> bool {
    matches!(
        word.parts().first(),
        Some(WordPart::Literal(token)) if token.id == Id::VarLike
    )
}

/// Tests if the word names a declaration utility.
fn is_decl_word(word: &Word) -> bool {
    matches!(
        word.to_string_if_literal().as_deref(),
        Some("export" | "readonly" | "local")
    )
}

impl Parser<'_> {
    /// Parses a simple command.
    ///
    /// `first_word` is a word the caller has already consumed, if any.
    pub fn simple_command(&mut self, first_word: Option<Word>) -> Result<Command> {
        let mut assigns = Vec::new();
        let mut words: Vec<Word> = Vec::new();
        let mut redirs = Vec::new();
        if let Some(word) = first_word {
            match to_assign_pair(word) {
                Ok(pair) => assigns.push(pair),
                Err(word) => words.push(word),
            }
        }

        loop {
            if let Some(redir) = self.redirection()? {
                redirs.push(redir);
                continue;
            }
            match self.peek_id()? {
                TokenId::Token(_) => {
                    let word = self.take_token()?.word;
                    if words.is_empty() {
                        match to_assign_pair(word) {
                            Ok(pair) => assigns.push(pair),
                            Err(word) => words.push(word),
                        }
                    } else {
                        words.push(word);
                    }
                }
                _ => break,
            }
        }

        // Array values only make sense as assignment values.
        for word in &words {
            if word
                .parts()
                .iter()
                .any(|part| matches!(part, WordPart::ArrayLiteral(_)))
            {
                let location = self.word_location(word);
                return Err(super::error::Error {
                    cause: SyntaxError::InvalidArrayValue.into(),
                    location,
                });
            }
        }

        if words.is_empty() && redirs.is_empty() && !assigns.is_empty() {
            return Ok(Command::Assignment {
                keyword: None,
                pairs: assigns,
            });
        }

        if assigns.is_empty()
            && redirs.is_empty()
            && words.len() >= 2
            && is_decl_word(&words[0])
            && words[1..].iter().all(is_assign_word)
        {
            let mut words = words;
            let keyword = match words.remove(0) {
                Word::Compound(parts) => match parts.into_iter().next() {
                    Some(WordPart::Literal(token)) => token,
                    _ => unreachable!("declaration word is literal"),
                },
                Word::Token(token) => token,
            };
            let pairs = words
                .into_iter()
                .map(|word| to_assign_pair(word).ok().unwrap())
                .collect();
            return Ok(Command::Assignment {
                keyword: Some(keyword),
                pairs,
            });
        }

        Ok(Command::Simple(SimpleCommand {
            assigns,
            words,
            redirs,
        }))
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
        parser.simple_command(None).unwrap()
    }

    #[test]
    fn words_only() {
        assert_matches!(parse("echo a b"), Command::Simple(simple) => {
            assert_eq!(simple.words.len(), 3);
            assert!(simple.assigns.is_empty());
        });
    }

    #[test]
    fn assignments_before_command_name() {
        assert_matches!(parse("a=1 b=2 cmd x"), Command::Simple(simple) => {
            assert_eq!(simple.assigns.len(), 2);
            assert_eq!(simple.assigns[0].name(), "a");
            assert_eq!(simple.assigns[1].value.to_string(), "2");
            assert_eq!(simple.words.len(), 2);
        });
    }

    #[test]
    fn assignment_after_command_name_is_a_word() {
        assert_matches!(parse("cmd a=1"), Command::Simple(simple) => {
            assert!(simple.assigns.is_empty());
            assert_eq!(simple.words.len(), 2);
            assert_eq!(simple.words[1].to_string(), "a=1");
        });
    }

    #[test]
    fn pure_assignment() {
        assert_matches!(parse("a=1 b=$x"), Command::Assignment { keyword: None, pairs } => {
            assert_eq!(pairs.len(), 2);
            assert_eq!(pairs[0].name(), "a");
            assert!(!pairs[0].append);
        });

        assert_matches!(parse("a+=1"), Command::Assignment { pairs, .. } => {
            assert!(pairs[0].append);
            assert_eq!(pairs[0].name(), "a");
        });
    }

    #[test]
    fn declaring_assignment() {
        assert_matches!(parse("export a=1 b=2"), Command::Assignment { keyword: Some(keyword), pairs } => {
            assert_eq!(keyword.value, "export");
            assert_eq!(pairs.len(), 2);
        });

        // `export a` is not assignment-shaped, so it stays a simple command.
        assert_matches!(parse("export a"), Command::Simple(_));
    }

    #[test]
    fn redirections_mix_in() {
        assert_matches!(parse("a=1 >f cmd 2>&1 arg"), Command::Simple(simple) => {
            assert_eq!(simple.assigns.len(), 1);
            assert_eq!(simple.words.len(), 2);
            assert_eq!(simple.redirs.len(), 2);
        });
    }

    #[test]
    fn assignment_with_redirection_stays_simple() {
        assert_matches!(parse("a=1 >f"), Command::Simple(simple) => {
            assert_eq!(simple.assigns.len(), 1);
            assert!(simple.words.is_empty());
            assert_eq!(simple.redirs.len(), 1);
        });
    }

    #[test]
    fn array_assignment() {
        assert_matches!(parse("a=(1 2 3)"), Command::Assignment { pairs, .. } => {
            assert_matches!(&pairs[0].value.parts()[0], WordPart::ArrayLiteral(words) => {
                assert_eq!(words.len(), 3);
            });
        });
    }

    #[test]
    fn array_outside_assignment_is_rejected() {
        let mut lexer = Lexer::from_source("-", "cmd a=(1)");
        let mut parser = Parser::new(&mut lexer);
        let e = parser.simple_command(None).unwrap_err();
        assert_matches!(
            e.cause,
            crate::parser::error::ErrorCause::Syntax(SyntaxError::InvalidArrayValue)
        );
    }
}
