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

//! Parameter expansion
//!
//! Resolution covers named variables, positional parameters, and the
//! special parameters. Modifiers are applied in the order subscript, length
//! prefix, then the suffix operator. The words inside modifiers expand in
//! the quoting context of the whole substitution, except the pattern words
//! of trim and replace operators, which carry their own quoting.

use super::super::attr::{AttrChar, AttrField, Origin};
use super::super::phrase::Phrase;
use super::super::quote_removal;
use super::super::{Error, ErrorCause, Result};
use super::{Ctx, eval_arith, expand_parts, soften};
use marsh_env::variable::{Scope, Value};
use marsh_fnmatch::Pattern;
use marsh_syntax::parser::lex::rules::is_name;
use marsh_syntax::source::SpanId;
use marsh_syntax::syntax::{
    BracedVarSub, BracketOp, PrefixOp, Replace, Slice, SuffixOp, Switch, SwitchAction,
    SwitchCondition, Token, Trim, TrimLength, TrimSide, Word,
};
use std::fmt;

/// State of a parameter value that may count as "not set"
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ValueState {
    /// The parameter is not set at all.
    Unset,
    /// The value is a string with no characters.
    EmptyScalar,
    /// The value is an array with no elements.
    EmptyArray,
}

impl ValueState {
    /// Computes the state of a resolved value, `None` for a value that is
    /// set and non-empty.
    fn of(resolved: &Resolved) -> Option<ValueState> {
        match resolved {
            Resolved::Unset => Some(ValueState::Unset),
            Resolved::Scalar(value) if value.is_empty() => Some(ValueState::EmptyScalar),
            Resolved::Array(values) if values.is_empty() => Some(ValueState::EmptyArray),
            _ => None,
        }
    }

    /// Short description used in error messages
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            ValueState::Unset => "unset variable",
            ValueState::EmptyScalar => "empty string",
            ValueState::EmptyArray => "empty array",
        }
    }
}

impl fmt::Display for ValueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.description().fmt(f)
    }
}

/// Resolved value of a parameter
#[derive(Clone, Debug, Eq, PartialEq)]
enum Resolved {
    Unset,
    Scalar(String),
    Array(Vec<String>),
}

/// Looks up a parameter by name.
fn resolve(name: &str, ctx: &Ctx) -> Resolved {
    let env = &*ctx.env;
    match name {
        "@" | "*" => Resolved::Array(env.variables.positional_params().values().to_vec()),
        "#" => Resolved::Scalar(env.variables.positional_params().values().len().to_string()),
        "?" => Resolved::Scalar(env.last_exit_status.to_string()),
        "$" => Resolved::Scalar(
            env.shell_pid
                .map(|pid| pid.to_string())
                .unwrap_or_default(),
        ),
        "!" => match env.last_async_pid {
            Some(pid) => Resolved::Scalar(pid.to_string()),
            None => Resolved::Unset,
        },
        "0" => Resolved::Scalar(env.shell_name.clone()),
        "-" => Resolved::Scalar(option_flags(ctx)),
        _ if name.chars().all(|c| c.is_ascii_digit()) && !name.is_empty() => {
            match name
                .parse()
                .ok()
                .and_then(|index: usize| env.variables.positional_params().get(index))
            {
                Some(value) => Resolved::Scalar(value.to_string()),
                None => Resolved::Unset,
            }
        }
        _ => match env.variables.get(name).and_then(|v| v.value.as_ref()) {
            None => Resolved::Unset,
            Some(Value::Scalar(value)) => Resolved::Scalar(value.clone()),
            Some(Value::Array(values)) => Resolved::Array(values.clone()),
        },
    }
}

/// Letters of the active single-letter options, the value of `$-`.
fn option_flags(ctx: &Ctx) -> String {
    use marsh_env::option::{Off, ShellOption};
    let mut flags = String::new();
    if ctx.env.options.get(ShellOption::Glob) == Off {
        flags.push('f');
    }
    if ctx.env.options.get(ShellOption::Unset) == Off {
        flags.push('u');
    }
    flags
}

/// Converts a resolved value to a phrase of expansion output.
fn to_phrase(resolved: Resolved, is_quoted: bool) -> Phrase {
    match resolved {
        Resolved::Unset => Phrase::one_empty_field(),
        Resolved::Scalar(value) => Phrase::Field(
            AttrField::from_str(&value, Origin::SoftExpansion, is_quoted).0,
        ),
        Resolved::Array(values) => Phrase::Full(
            values
                .into_iter()
                .map(|value| AttrField::from_str(&value, Origin::SoftExpansion, is_quoted).0)
                .collect(),
        ),
    }
}

/// Joins a multi-field phrase on the first IFS character, the `$*` rule.
fn ifs_join(phrase: Phrase, ctx: &Ctx) -> Phrase {
    let separator = match ctx.env.variables.get_scalar("IFS") {
        None => Some(' '),
        Some(ifs) => ifs.chars().next(),
    };
    let mut result: Vec<AttrChar> = Vec::new();
    for (index, field) in phrase.into_fields().into_iter().enumerate() {
        if index > 0 {
            if let Some(value) = separator {
                result.push(AttrChar {
                    value,
                    origin: Origin::SoftExpansion,
                    is_quoted: ctx.is_quoted,
                    is_quoting: false,
                });
            }
        }
        result.extend(field);
    }
    Phrase::Field(result)
}

/// Expands `$name` and the single-character substitutions.
pub(crate) fn expand_simple(token: &Token, ctx: &mut Ctx) -> Result<Phrase> {
    let name = &token.value[1..];
    let resolved = resolve(name, ctx);
    check_set(&resolved, name, token.span, ctx)?;
    let mut phrase = to_phrase(resolved, ctx.is_quoted);
    if name == "*" && !ctx.will_split {
        phrase = ifs_join(phrase, ctx);
    }
    Ok(phrase)
}

/// Fails when an unset parameter is expanded under `set -u` semantics.
fn check_set(resolved: &Resolved, name: &str, span: Option<SpanId>, ctx: &Ctx) -> Result<()> {
    use marsh_env::option::{Off, ShellOption};
    if *resolved == Resolved::Unset && ctx.env.options.get(ShellOption::Unset) == Off {
        return Err(Error {
            cause: ErrorCause::UnsetParameter {
                name: name.to_string(),
            },
            span,
        });
    }
    Ok(())
}

/// Expands a braced substitution `${…}`.
pub(crate) fn expand_braced(sub: &BracedVarSub, ctx: &mut Ctx) -> Result<Phrase> {
    let span = sub.name.span;
    let mut name = sub.name.value.clone();

    // Indirection replaces the name with the named parameter's value.
    if sub.prefix_op == Some(PrefixOp::Indirect) {
        name = match resolve(&name, ctx) {
            Resolved::Scalar(value) => value,
            Resolved::Array(values) => values.first().cloned().unwrap_or_default(),
            Resolved::Unset => String::new(),
        };
    }

    let mut resolved = if name.is_empty() {
        Resolved::Unset
    } else {
        resolve(&name, ctx)
    };

    if let Some(bracket) = &sub.bracket_op {
        resolved = apply_subscript(resolved, bracket, ctx)?;
    }

    if sub.prefix_op == Some(PrefixOp::Length) {
        let length = match &resolved {
            Resolved::Unset => 0,
            Resolved::Scalar(value) => value.chars().count(),
            Resolved::Array(values) => values.len(),
        };
        return Ok(Phrase::Field(
            AttrField::from_str(&length.to_string(), Origin::SoftExpansion, ctx.is_quoted).0,
        ));
    }

    match &sub.suffix_op {
        Some(SuffixOp::Switch(switch)) => {
            if let Some(phrase) = apply_switch(switch, &name, &resolved, span, ctx)? {
                return Ok(phrase);
            }
        }
        suffix => {
            check_set(&resolved, &name, span, ctx)?;
            match suffix {
                None | Some(SuffixOp::Switch(_)) => {}
                Some(SuffixOp::Trim(trim)) => resolved = apply_trim(trim, resolved, ctx)?,
                Some(SuffixOp::Replace(replace)) => {
                    resolved = apply_replace(replace, resolved, ctx)?;
                }
                Some(SuffixOp::Slice(slice)) => resolved = apply_slice(slice, resolved, ctx)?,
            }
        }
    }

    let is_star = name == "*"
        || matches!(&sub.bracket_op, Some(BracketOp::WholeArray(token)) if token.value == "*");
    let mut phrase = to_phrase(resolved, ctx.is_quoted);
    if is_star && !ctx.will_split {
        phrase = ifs_join(phrase, ctx);
    }
    Ok(phrase)
}

/// Selects an element or the whole array.
fn apply_subscript(
    resolved: Resolved,
    bracket: &BracketOp,
    ctx: &mut Ctx,
) -> Result<Resolved> {
    match bracket {
        BracketOp::WholeArray(_) => Ok(match resolved {
            Resolved::Unset => Resolved::Array(Vec::new()),
            Resolved::Scalar(value) => Resolved::Array(vec![value]),
            array => array,
        }),
        BracketOp::Index(expr) => {
            let index = eval_arith(expr, ctx)?;
            Ok(match resolved {
                Resolved::Unset => Resolved::Unset,
                Resolved::Scalar(value) => {
                    if index == 0 {
                        Resolved::Scalar(value)
                    } else {
                        Resolved::Unset
                    }
                }
                Resolved::Array(values) => {
                    let index = if index < 0 {
                        index.checked_add(values.len() as i64)
                    } else {
                        Some(index)
                    };
                    match index
                        .and_then(|i| usize::try_from(i).ok())
                        .and_then(|i| values.get(i))
                    {
                        Some(value) => Resolved::Scalar(value.clone()),
                        None => Resolved::Unset,
                    }
                }
            })
        }
    }
}

/// Expands the word of a switch in the current quoting context.
///
/// The result counts as expansion output, so its unquoted characters are
/// subject to later field splitting.
fn expand_switch_word(word: &Word, ctx: &mut Ctx) -> Result<Phrase> {
    let mut phrase = expand_parts(word.parts(), ctx)?;
    soften(&mut phrase);
    Ok(phrase)
}

/// Applies a switch modifier.
///
/// Returns `Some(phrase)` when the switch decided the result and `None`
/// when the parameter's own value is to be used.
fn apply_switch(
    switch: &Switch,
    name: &str,
    resolved: &Resolved,
    span: Option<SpanId>,
    ctx: &mut Ctx,
) -> Result<Option<Phrase>> {
    let state = ValueState::of(resolved);
    let vacant = match switch.condition {
        SwitchCondition::UnsetOrEmpty => state.is_some(),
        SwitchCondition::Unset => state == Some(ValueState::Unset),
    };

    match switch.action {
        SwitchAction::Default => {
            if vacant {
                expand_switch_word(&switch.word, ctx).map(Some)
            } else {
                Ok(None)
            }
        }
        SwitchAction::Assign => {
            if !vacant {
                return Ok(None);
            }
            if !is_name(name) {
                return Err(Error {
                    cause: ErrorCause::NonassignableParameter {
                        name: name.to_string(),
                    },
                    span,
                });
            }
            let phrase = expand_switch_word(&switch.word, ctx)?;
            let value: Vec<String> = phrase
                .clone()
                .into_fields()
                .into_iter()
                .map(quote_removal::to_plain_string)
                .collect();
            ctx.env
                .variables
                .assign(Scope::Global, name, Value::scalar(value.join(" ")))
                .map_err(|error| Error {
                    cause: ErrorCause::AssignError(error),
                    span,
                })?;
            Ok(Some(phrase))
        }
        SwitchAction::Error => {
            if !vacant {
                return Ok(None);
            }
            let Some(state) = state else {
                unreachable!("a vacant value has a state")
            };
            let message = if switch.word.parts().is_empty() {
                None
            } else {
                let phrase = expand_parts(switch.word.parts(), ctx)?;
                let text: Vec<String> = phrase
                    .into_fields()
                    .into_iter()
                    .map(quote_removal::to_plain_string)
                    .collect();
                Some(text.join(" "))
            };
            Err(Error {
                cause: ErrorCause::EmptyExpansion {
                    name: name.to_string(),
                    state,
                    message,
                },
                span,
            })
        }
        SwitchAction::Alter => {
            if vacant {
                Ok(Some(Phrase::zero_fields()))
            } else {
                expand_switch_word(&switch.word, ctx).map(Some)
            }
        }
    }
}

/// Applies a function to every string of a resolved value.
fn map_values<F: FnMut(&str) -> String>(resolved: Resolved, mut f: F) -> Resolved {
    match resolved {
        Resolved::Unset => Resolved::Unset,
        Resolved::Scalar(value) => Resolved::Scalar(f(&value)),
        Resolved::Array(values) => {
            Resolved::Array(values.iter().map(|value| f(value)).collect())
        }
    }
}

/// Expands a pattern word and compiles it.
///
/// Pattern words carry their own quoting, independent of the quotes around
/// the whole substitution.
fn pattern_of(word: &Word, ctx: &mut Ctx) -> Result<Pattern> {
    let mut sub = Ctx {
        env: &mut *ctx.env,
        is_quoted: false,
        will_split: false,
    };
    let phrase = expand_parts(word.parts(), &mut sub)?;
    let mut chars = Vec::new();
    for field in phrase.into_fields() {
        chars.extend(field);
    }
    super::super::to_pattern(&AttrField(chars))
}

/// Expands a replacement word to plain text.
fn replacement_of(word: &Word, ctx: &mut Ctx) -> Result<String> {
    let mut sub = Ctx {
        env: &mut *ctx.env,
        is_quoted: false,
        will_split: false,
    };
    let phrase = expand_parts(word.parts(), &mut sub)?;
    Ok(phrase
        .into_fields()
        .into_iter()
        .map(quote_removal::to_plain_string)
        .collect::<Vec<String>>()
        .join(" "))
}

/// Byte indices of the character boundaries of a string, in order.
fn boundaries(s: &str) -> Vec<usize> {
    let mut result: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
    result.push(s.len());
    result
}

fn apply_trim(trim: &Trim, resolved: Resolved, ctx: &mut Ctx) -> Result<Resolved> {
    let pattern = pattern_of(&trim.pattern, ctx)?;
    Ok(map_values(resolved, |value| {
        trim_string(value, &pattern, trim.side, trim.length)
    }))
}

fn trim_string(s: &str, pattern: &Pattern, side: TrimSide, length: TrimLength) -> String {
    let bounds = boundaries(s);
    match side {
        TrimSide::Prefix => {
            let found = match length {
                TrimLength::Shortest => bounds.iter().find(|&&i| pattern.is_match(&s[..i])),
                TrimLength::Longest => {
                    bounds.iter().rev().find(|&&i| pattern.is_match(&s[..i]))
                }
            };
            match found {
                Some(&i) => s[i..].to_string(),
                None => s.to_string(),
            }
        }
        TrimSide::Suffix => {
            let found = match length {
                TrimLength::Shortest => {
                    bounds.iter().rev().find(|&&i| pattern.is_match(&s[i..]))
                }
                TrimLength::Longest => bounds.iter().find(|&&i| pattern.is_match(&s[i..])),
            };
            match found {
                Some(&i) => s[..i].to_string(),
                None => s.to_string(),
            }
        }
    }
}

fn apply_replace(replace: &Replace, resolved: Resolved, ctx: &mut Ctx) -> Result<Resolved> {
    let pattern = pattern_of(&replace.pattern, ctx)?;
    let substitute = match &replace.substitute {
        Some(word) => replacement_of(word, ctx)?,
        None => String::new(),
    };
    Ok(map_values(resolved, |value| {
        replace_string(value, &pattern, &substitute, replace.all)
    }))
}

/// Replaces the first or every non-empty match of the pattern.
///
/// At each position the longest match wins, as in pattern-matching shells.
fn replace_string(s: &str, pattern: &Pattern, substitute: &str, all: bool) -> String {
    let bounds = boundaries(s);
    let mut result = String::with_capacity(s.len());
    let mut start = 0;
    while start < s.len() {
        let found = bounds
            .iter()
            .rev()
            .filter(|&&end| end > start)
            .find(|&&end| pattern.is_match(&s[start..end]));
        match found {
            Some(&end) => {
                result.push_str(substitute);
                start = end;
                if !all {
                    result.push_str(&s[start..]);
                    return result;
                }
            }
            None => {
                let mut chars = s[start..].chars();
                if let Some(c) = chars.next() {
                    result.push(c);
                    start += c.len_utf8();
                }
            }
        }
    }
    result
}

fn apply_slice(slice: &Slice, resolved: Resolved, ctx: &mut Ctx) -> Result<Resolved> {
    let offset = eval_arith(&slice.offset, ctx)?;
    let length = match &slice.length {
        Some(expr) => Some(eval_arith(expr, ctx)?),
        None => None,
    };
    Ok(match resolved {
        Resolved::Unset => Resolved::Unset,
        Resolved::Scalar(value) => {
            let chars: Vec<char> = value.chars().collect();
            let (start, end) = slice_range(chars.len(), offset, length);
            Resolved::Scalar(chars[start..end].iter().collect())
        }
        Resolved::Array(values) => {
            let (start, end) = slice_range(values.len(), offset, length);
            Resolved::Array(values[start..end].to_vec())
        }
    })
}

/// Computes the element range a slice selects.
///
/// A negative offset counts from the end; a negative length leaves that
/// many elements off the end.
fn slice_range(len: usize, offset: i64, length: Option<i64>) -> (usize, usize) {
    let len_i = len as i64;
    let start = if offset < 0 {
        (len_i + offset).max(0)
    } else {
        offset.min(len_i)
    } as usize;
    let end = match length {
        None => len,
        Some(l) if l >= 0 => ((start as i64).saturating_add(l)).min(len_i) as usize,
        Some(l) => (len_i + l).max(start as i64) as usize,
    };
    (start, end.max(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_ranges() {
        assert_eq!(slice_range(5, 1, Some(2)), (1, 3));
        assert_eq!(slice_range(5, 0, None), (0, 5));
        assert_eq!(slice_range(5, -2, None), (3, 5));
        assert_eq!(slice_range(5, -7, None), (0, 5));
        assert_eq!(slice_range(5, 3, Some(99)), (3, 5));
        assert_eq!(slice_range(5, 1, Some(-1)), (1, 4));
        assert_eq!(slice_range(5, 4, Some(-3)), (4, 4));
        assert_eq!(slice_range(5, 9, None), (5, 5));
    }

    #[test]
    fn boundaries_are_char_boundaries() {
        assert_eq!(boundaries("ab"), [0, 1, 2]);
        assert_eq!(boundaries("é"), [0, 2]);
        assert_eq!(boundaries(""), [0]);
    }
}
