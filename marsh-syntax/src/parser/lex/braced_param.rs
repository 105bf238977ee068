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

//! Part of the lexer that parses braced parameter substitutions

use super::LexMode;
use super::core::Lexer;
use crate::id::Id;
use crate::parser::arith::arith_expr;
use crate::parser::error::{Error, Result, SyntaxError};
use crate::syntax::{
    BracedVarSub, BracketOp, PrefixOp, Replace, Slice, Switch, SwitchAction, SwitchCondition,
    SuffixOp, Trim, TrimLength, TrimSide, WordPart,
};

impl Lexer {
    /// Parses a braced parameter substitution, starting at `${`.
    ///
    /// Whether the enclosing context is double-quoted decides the mode the
    /// modifier arguments are lexed in: in a double-quoted context single
    /// quotes are ordinary characters there.
    pub fn braced_param(&mut self) -> Result<WordPart> {
        let in_double_quotes = matches!(
            self.mode(),
            LexMode::DoubleQuoted | LexMode::VsArgDouble | LexMode::HereDocBody
        );
        let open = self.next_token();
        let opening_location = self.location_of(&open);
        self.push_mode(LexMode::VsName);

        let prefix_op = match self.peek_id() {
            Id::BraceLength => {
                self.next_token();
                Some(PrefixOp::Length)
            }
            Id::BraceIndirect => {
                self.next_token();
                Some(PrefixOp::Indirect)
            }
            _ => None,
        };

        let name = match self.peek_id() {
            Id::BraceParamName | Id::BraceParamDigits | Id::BraceParamSpecial => self.next_token(),
            Id::CloseBrace => {
                return Err(Error {
                    cause: SyntaxError::EmptyParam.into(),
                    location: opening_location,
                });
            }
            _ => {
                return Err(Error {
                    cause: SyntaxError::InvalidParam.into(),
                    location: self.current_location(),
                });
            }
        };

        self.pop_mode();
        self.push_mode(LexMode::VsOp);

        let bracket_op = if self.peek_id() == Id::OpenBracket {
            Some(self.subscript()?)
        } else {
            None
        };

        let suffix_op = self.suffix_op(in_double_quotes)?;

        if prefix_op == Some(PrefixOp::Length) && suffix_op.is_some() {
            return Err(Error {
                cause: SyntaxError::MultipleModifier.into(),
                location: self.current_location(),
            });
        }

        match self.peek_id() {
            Id::CloseBrace => {
                self.next_token();
                self.pop_mode();
                Ok(WordPart::BracedVarSub(BracedVarSub {
                    name,
                    prefix_op,
                    bracket_op,
                    suffix_op,
                }))
            }
            Id::EndOfInput => Err(Error {
                cause: SyntaxError::UnclosedParam { opening_location }.into(),
                location: self.current_location(),
            }),
            _ => Err(Error {
                cause: SyntaxError::InvalidModifier.into(),
                location: self.current_location(),
            }),
        }
    }

    /// Parses a subscript, starting at `[`.
    fn subscript(&mut self) -> Result<BracketOp> {
        let open = self.next_token();
        let opening_location = self.location_of(&open);

        // `[@]` and `[*]` select the whole array.
        let rest = self.raw_rest();
        if rest.starts_with("@]") || rest.starts_with("*]") {
            let token = self.take_raw(1, Id::Literal);
            self.take_raw(1, Id::CloseBracket);
            return Ok(BracketOp::WholeArray(token));
        }

        self.push_mode(LexMode::Arith);
        let index = arith_expr(self)?;
        match self.peek_id() {
            Id::CloseBracket => {
                self.next_token();
                self.pop_mode();
                Ok(BracketOp::Index(index))
            }
            _ => Err(Error {
                cause: SyntaxError::UnclosedSubscript { opening_location }.into(),
                location: self.current_location(),
            }),
        }
    }

    /// Parses the suffix operator, if any.
    fn suffix_op(&mut self, in_double_quotes: bool) -> Result<Option<SuffixOp>> {
        let arg_mode = if in_double_quotes {
            LexMode::VsArgDouble
        } else {
            LexMode::VsArgUnquoted
        };
        // Pattern words carry their own quoting even inside double quotes,
        // like the trim patterns below.
        let pattern_mode = LexMode::VsArgUnquotedSlash;

        let (action, condition) = match self.peek_id() {
            Id::CloseBrace | Id::EndOfInput => return Ok(None),
            Id::SwitchHyphen => (SwitchAction::Default, SwitchCondition::Unset),
            Id::SwitchColonHyphen => (SwitchAction::Default, SwitchCondition::UnsetOrEmpty),
            Id::SwitchEqual => (SwitchAction::Assign, SwitchCondition::Unset),
            Id::SwitchColonEqual => (SwitchAction::Assign, SwitchCondition::UnsetOrEmpty),
            Id::SwitchQuestion => (SwitchAction::Error, SwitchCondition::Unset),
            Id::SwitchColonQuestion => (SwitchAction::Error, SwitchCondition::UnsetOrEmpty),
            Id::SwitchPlus => (SwitchAction::Alter, SwitchCondition::Unset),
            Id::SwitchColonPlus => (SwitchAction::Alter, SwitchCondition::UnsetOrEmpty),
            Id::TrimPercent | Id::TrimPercentPercent | Id::TrimPound | Id::TrimPoundPound => {
                return self.trim().map(Some);
            }
            Id::ReplaceSlash | Id::ReplaceSlashSlash => {
                return self.replace(pattern_mode, arg_mode).map(Some);
            }
            Id::SliceColon => return self.slice().map(Some),
            _ => {
                return Err(Error {
                    cause: SyntaxError::InvalidModifier.into(),
                    location: self.current_location(),
                });
            }
        };

        self.next_token();
        self.push_mode(arg_mode);
        let word = self.word()?;
        self.pop_mode();
        Ok(Some(SuffixOp::Switch(Switch {
            action,
            condition,
            word,
        })))
    }

    /// Parses a trim modifier, starting at its `%` or `#` operator.
    fn trim(&mut self) -> Result<SuffixOp> {
        let op = self.next_token();
        let (side, length) = match op.id {
            Id::TrimPercent => (TrimSide::Suffix, TrimLength::Shortest),
            Id::TrimPercentPercent => (TrimSide::Suffix, TrimLength::Longest),
            Id::TrimPound => (TrimSide::Prefix, TrimLength::Shortest),
            Id::TrimPoundPound => (TrimSide::Prefix, TrimLength::Longest),
            _ => unreachable!("not a trim operator: {:?}", op.id),
        };
        // The pattern of a trim is expanded in its own quoting context, so
        // the unquoted argument mode applies even inside double quotes.
        self.push_mode(LexMode::VsArgUnquoted);
        let pattern = self.word()?;
        self.pop_mode();
        Ok(SuffixOp::Trim(Trim {
            side,
            length,
            pattern,
        }))
    }

    /// Parses a replace modifier, starting at its `/` or `//` operator.
    fn replace(&mut self, pattern_mode: LexMode, arg_mode: LexMode) -> Result<SuffixOp> {
        let op = self.next_token();
        let all = op.id == Id::ReplaceSlashSlash;

        self.push_mode(pattern_mode);
        let pattern = self.word()?;
        self.pop_mode();

        let substitute = if self.peek_id_in(pattern_mode) == Id::Slash {
            self.push_mode(pattern_mode);
            self.next_token();
            self.pop_mode();
            self.push_mode(arg_mode);
            let word = self.word()?;
            self.pop_mode();
            Some(word)
        } else {
            None
        };

        Ok(SuffixOp::Replace(Replace {
            all,
            pattern,
            substitute,
        }))
    }

    /// Peeks the next token id as the given mode would lex it.
    fn peek_id_in(&mut self, mode: LexMode) -> Id {
        self.push_mode(mode);
        let id = self.peek_id();
        self.pop_mode();
        id
    }

    /// Parses a slice modifier, starting at its `:` operator.
    fn slice(&mut self) -> Result<SuffixOp> {
        self.next_token();
        self.push_mode(LexMode::Arith);
        let offset = arith_expr(self)?;
        let length = if self.peek_id() == Id::ArithColon {
            self.next_token();
            Some(arith_expr(self)?)
        } else {
            None
        };
        self.pop_mode();
        Ok(SuffixOp::Slice(Slice { offset, length }))
    }
}
