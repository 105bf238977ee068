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

//! Arithmetic expression evaluation
//!
//! Parsing lives in the `marsh-syntax` crate; this crate evaluates the
//! parsed [`ArithExpr`] against an [`Env`] that supplies variable values and
//! accepts assignments. All arithmetic is signed 64-bit with overflow
//! detection; division and modulus by zero fail.
//!
//! Integer literals accept decimal, `0x…` hexadecimal, `0…` octal, and the
//! `base#digits` form with bases 2 through 36.

mod eval;

use marsh_syntax::source::SpanId;
use marsh_syntax::syntax::Word;
use std::fmt::{self, Display};

pub use eval::eval;

/// Result of arithmetic evaluation
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Value {
    Integer(i64),
}

impl Value {
    /// Returns the integer value.
    #[must_use]
    pub const fn integer(self) -> i64 {
        match self {
            Value::Integer(i) => i,
        }
    }

    /// Whether the value counts as true in a condition
    #[must_use]
    pub const fn is_true(self) -> bool {
        self.integer() != 0
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => i.fmt(f),
        }
    }
}

/// Part of the shell environment arithmetic evaluation depends on
pub trait Env {
    /// Error produced by the environment itself
    type Error: Display;

    /// Returns the value of a variable, or `None` if unset.
    fn get_variable(&self, name: &str) -> Option<String>;

    /// Assigns a string value to a variable.
    fn assign_variable(&mut self, name: &str, value: &str) -> Result<(), Self::Error>;

    /// Expands a word operand to a string.
    ///
    /// Operands that are not plain number literals, such as `$x` or
    /// `${y:-0}`, go through the word expansion of the embedding shell.
    fn expand_word(&mut self, word: &Word) -> Result<String, Self::Error>;
}

/// Cause of an arithmetic evaluation error
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ErrorCause<E> {
    /// A variable value that is not a valid number
    InvalidVariableValue(String),
    /// A literal that is not a valid number, e.g. a bad base
    InvalidNumber(String),
    /// Result out of bounds
    Overflow,
    /// Division or modulus by zero
    DivisionByZero,
    /// Call of a function that does not exist
    UnknownFunction(String),
    /// `++`, `--`, or an assignment applied to something that is not a
    /// variable
    OperandNotVariable,
    /// Error reported by the environment
    EnvError(E),
}

impl<E: Display> Display for ErrorCause<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorCause::*;
        match self {
            InvalidVariableValue(value) => {
                write!(f, "variable value {value:?} cannot be parsed as a number")
            }
            InvalidNumber(value) => write!(f, "{value:?} is not a valid number"),
            Overflow => "overflow".fmt(f),
            DivisionByZero => "division by zero".fmt(f),
            UnknownFunction(name) => write!(f, "unknown function `{name}`"),
            OperandNotVariable => "operand of assignment is not a variable".fmt(f),
            EnvError(error) => error.fmt(f),
        }
    }
}

/// Description of an error that occurred during evaluation
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Error<E> {
    /// Cause of the error
    pub cause: ErrorCause<E>,
    /// Span of the sub-expression the error occurred in, when known
    pub span: Option<SpanId>,
}

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cause.fmt(f)
    }
}

impl<E: fmt::Debug + Display> std::error::Error for Error<E> {}

/// Parses an integer literal or variable value.
///
/// An empty or blank string parses as zero, matching how shells treat unset
/// and empty variables in arithmetic context.
#[must_use]
pub fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok();
    }
    if let Some((base, digits)) = text.split_once('#') {
        let base: u32 = base.parse().ok()?;
        if !(2..=36).contains(&base) || digits.is_empty() {
            return None;
        }
        return i64::from_str_radix(digits, base).ok();
    }
    if let Some(octal) = text.strip_prefix('0') {
        if octal.is_empty() {
            return Some(0);
        }
        return i64::from_str_radix(octal, 8).ok();
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_literals() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("0x1f"), Some(31));
        assert_eq!(parse_integer("0X10"), Some(16));
        assert_eq!(parse_integer("0755"), Some(493));
        assert_eq!(parse_integer("0"), Some(0));
        assert_eq!(parse_integer("2#1010"), Some(10));
        assert_eq!(parse_integer("36#z"), Some(35));
        assert_eq!(parse_integer(""), Some(0));
        assert_eq!(parse_integer("  7 "), Some(7));
        assert_eq!(parse_integer("-3"), Some(-3));
    }

    #[test]
    fn bad_integer_literals() {
        assert_eq!(parse_integer("08"), None);
        assert_eq!(parse_integer("1#0"), None);
        assert_eq!(parse_integer("37#z"), None);
        assert_eq!(parse_integer("2#"), None);
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("0xg"), None);
    }
}
