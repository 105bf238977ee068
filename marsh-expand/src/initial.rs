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

//! Initial expansion
//!
//! The first expansion stage evaluates the word parts: tilde expansion,
//! parameter substitution, command substitution, and arithmetic expansion,
//! producing a [`Phrase`] of attributed characters. Field splitting and
//! pathname expansion operate on the result afterwards.
//!
//! Quote context travels through the [`Ctx`]: inside double quotes
//! `is_quoted` is set and `will_split` cleared, and both propagate into the
//! argument words of `${…}` modifiers. That propagation is what turns
//! `"${x:-'a b'}"` into the literal text `'a b'`: the parser already kept
//! the quotes as plain characters, and the expansion marks them quoted.

pub(crate) mod param;

use super::attr::{AttrChar, AttrField, Origin};
use super::phrase::Phrase;
use super::{Env, Error, ErrorCause, Result};
use marsh_syntax::syntax::{ArithExpr, Command, Token, Word, WordPart};

/// Context of the initial expansion
///
/// Tracks whether the current position is inside double quotes and whether
/// field splitting will apply to the result.
pub(crate) struct Ctx<'e, 'a> {
    pub env: &'e mut Env<'a>,
    pub is_quoted: bool,
    pub will_split: bool,
}

/// Expands a sequence of word parts into a phrase.
///
/// An empty sequence expands to one empty field; a lone `"$@"` with no
/// positional parameters expands to zero fields.
pub(crate) fn expand_parts(parts: &[WordPart], ctx: &mut Ctx) -> Result<Phrase> {
    let mut result: Option<Phrase> = None;
    for part in parts {
        let phrase = expand_part(part, ctx)?;
        result = Some(match result {
            None => phrase,
            Some(acc) => acc + phrase,
        });
    }
    Ok(result.unwrap_or_else(Phrase::one_empty_field))
}

fn expand_part(part: &WordPart, ctx: &mut Ctx) -> Result<Phrase> {
    match part {
        WordPart::Literal(token) => Ok(Phrase::Field(
            AttrField::from_str(&token.value, Origin::Literal, ctx.is_quoted).0,
        )),
        WordPart::EscapedLiteral(token) => Ok(escaped_literal(token, ctx)),
        WordPart::SingleQuoted(tokens) => Ok(single_quoted(tokens, ctx)),
        WordPart::DollarSingleQuoted(_, decoded) => Ok(dollar_single_quoted(decoded, ctx)),
        WordPart::DoubleQuoted(parts) => double_quoted(parts, ctx),
        WordPart::SimpleVarSub(token) => param::expand_simple(token, ctx),
        WordPart::BracedVarSub(sub) => param::expand_braced(sub, ctx),
        WordPart::TildeSub(token) => Ok(tilde(token, ctx)),
        WordPart::CommandSub { command, .. } => command_subst(command, ctx),
        WordPart::ArithSub(expr) => arith(expr, ctx),
        WordPart::ArrayLiteral(_) => Err(Error {
            cause: ErrorCause::UnexpectedArrayValue,
            span: None,
        }),
    }
}

/// A quoting character that leaves no trace after quote removal
const fn quote_char(value: char, is_quoted: bool) -> AttrChar {
    AttrChar {
        value,
        origin: Origin::Literal,
        is_quoted,
        is_quoting: true,
    }
}

fn escaped_literal(token: &Token, ctx: &Ctx) -> Phrase {
    let mut chars = token.value.chars();
    let backslash = chars.next();
    debug_assert_eq!(backslash, Some('\\'));
    let mut field = vec![quote_char('\\', ctx.is_quoted)];
    field.extend(chars.map(|value| AttrChar {
        value,
        origin: Origin::Literal,
        is_quoted: true,
        is_quoting: false,
    }));
    Phrase::Field(field)
}

fn single_quoted(tokens: &[Token], ctx: &Ctx) -> Phrase {
    let mut field = vec![quote_char('\'', ctx.is_quoted)];
    for token in tokens {
        field.extend(token.value.chars().map(|value| AttrChar {
            value,
            origin: Origin::Literal,
            is_quoted: true,
            is_quoting: false,
        }));
    }
    field.push(quote_char('\'', ctx.is_quoted));
    Phrase::Field(field)
}

fn dollar_single_quoted(decoded: &str, ctx: &Ctx) -> Phrase {
    let mut field = vec![
        quote_char('$', ctx.is_quoted),
        quote_char('\'', ctx.is_quoted),
    ];
    field.extend(decoded.chars().map(|value| AttrChar {
        value,
        origin: Origin::Literal,
        is_quoted: true,
        is_quoting: false,
    }));
    field.push(quote_char('\'', ctx.is_quoted));
    Phrase::Field(field)
}

fn double_quoted(parts: &[WordPart], ctx: &mut Ctx) -> Result<Phrase> {
    let was_quoted = std::mem::replace(&mut ctx.is_quoted, true);
    let would_split = std::mem::replace(&mut ctx.will_split, false);
    let phrase = expand_parts(parts, ctx);
    ctx.is_quoted = was_quoted;
    ctx.will_split = would_split;

    // Surround every field with quoting marks; `"$@"` keeps one field per
    // positional parameter, zero included.
    let mut fields = phrase?.into_fields();
    for field in &mut fields {
        field.insert(0, quote_char('"', was_quoted));
        field.push(quote_char('"', was_quoted));
    }
    Ok(Phrase::Full(fields))
}

fn tilde(token: &Token, ctx: &Ctx) -> Phrase {
    let prefix = &token.value[1..];
    if prefix.is_empty() {
        if let Some(home) = ctx.env.variables.get_scalar("HOME") {
            if home.is_empty() {
                // An empty home still produces a field; the marker keeps it
                // from being dropped as an empty unquoted field.
                return Phrase::Field(vec![quote_char('"', ctx.is_quoted)]);
            }
            return Phrase::Field(
                AttrField::from_str(home, Origin::HardExpansion, ctx.is_quoted).0,
            );
        }
    }
    // Unknown user or no HOME: the word stays as written.
    Phrase::Field(AttrField::from_str(&token.value, Origin::Literal, ctx.is_quoted).0)
}

fn command_subst(command: &Command, ctx: &mut Ctx) -> Result<Phrase> {
    ctx.env.check_cancel()?;
    let output = ctx.env.runner.run(command).map_err(|error| Error {
        cause: ErrorCause::CommandSubst(error),
        span: None,
    })?;
    let trimmed = output.trim_end_matches('\n');
    Ok(Phrase::Field(
        AttrField::from_str(trimmed, Origin::SoftExpansion, ctx.is_quoted).0,
    ))
}

fn arith(expr: &ArithExpr, ctx: &mut Ctx) -> Result<Phrase> {
    let value = eval_arith(expr, ctx)?;
    Ok(Phrase::Field(
        AttrField::from_str(&value.to_string(), Origin::SoftExpansion, ctx.is_quoted).0,
    ))
}

/// Evaluates an arithmetic expression in the expansion environment.
///
/// Also used for subscripts and slice bounds.
pub(crate) fn eval_arith(expr: &ArithExpr, ctx: &mut Ctx) -> Result<i64> {
    let mut adapter = ArithEnv { ctx };
    match marsh_arith::eval(expr, &mut adapter) {
        Ok(value) => Ok(value.integer()),
        Err(marsh_arith::Error {
            cause: marsh_arith::ErrorCause::EnvError(inner),
            ..
        }) => Err(inner),
        Err(error) => Err(Error {
            span: error.span,
            cause: ErrorCause::Arith(Box::new(error)),
        }),
    }
}

/// Adapter exposing the expansion environment to arithmetic evaluation
struct ArithEnv<'x, 'e, 'a> {
    ctx: &'x mut Ctx<'e, 'a>,
}

impl marsh_arith::Env for ArithEnv<'_, '_, '_> {
    type Error = Error;

    fn get_variable(&self, name: &str) -> Option<String> {
        use marsh_env::variable::Value;
        match self.ctx.env.variables.get(name)?.value.as_ref()? {
            Value::Scalar(value) => Some(value.clone()),
            Value::Array(values) => values.first().cloned(),
        }
    }

    fn assign_variable(&mut self, name: &str, value: &str) -> Result<()> {
        use marsh_env::variable::{Scope, Value};
        self.ctx
            .env
            .variables
            .assign(Scope::Global, name, Value::scalar(value))
            .map(drop)
            .map_err(|error| Error {
                cause: ErrorCause::AssignError(error),
                span: None,
            })
    }

    fn expand_word(&mut self, word: &Word) -> Result<String> {
        let mut ctx = Ctx {
            env: &mut *self.ctx.env,
            is_quoted: false,
            will_split: false,
        };
        let phrase = expand_parts(word.parts(), &mut ctx)?;
        let fields: Vec<String> = phrase
            .into_fields()
            .into_iter()
            .map(super::quote_removal::to_plain_string)
            .collect();
        Ok(fields.join(" "))
    }
}

/// Marks unquoted literal characters as expansion output.
///
/// The words of `${x:-…}` modifiers are written inside the braces, but
/// their expansion is the result of a parameter expansion, so unquoted
/// characters become subject to field splitting. Quoted parts keep their
/// protection.
pub(crate) fn soften(phrase: &mut Phrase) {
    phrase.for_each_char_mut(|c| {
        if c.origin == Origin::Literal && !c.is_quoted && !c.is_quoting {
            c.origin = Origin::SoftExpansion;
        }
    });
}
