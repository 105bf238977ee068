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

//! Evaluation of parsed arithmetic expressions

use super::{Env, Error, ErrorCause, Value, parse_integer};
use marsh_syntax::id::Id;
use marsh_syntax::source::SpanId;
use marsh_syntax::syntax::{ArithExpr, Token, Word, WordPart};

type Result<T, E> = std::result::Result<T, Error<E>>;

fn error<T, E>(cause: ErrorCause<E>, span: Option<SpanId>) -> Result<T, E> {
    Err(Error { cause, span })
}

/// Evaluates an arithmetic expression.
pub fn eval<E: Env>(expr: &ArithExpr, env: &mut E) -> Result<Value, E::Error> {
    Ok(Value::Integer(eval_int(expr, env)?))
}

fn eval_int<E: Env>(expr: &ArithExpr, env: &mut E) -> Result<i64, E::Error> {
    match expr {
        ArithExpr::Var(token) => variable_value(token, env),
        ArithExpr::Word(word) => word_value(word, env),
        ArithExpr::Group(inner) => eval_int(inner, env),
        ArithExpr::Unary {
            op,
            postfix,
            operand,
        } => eval_unary(op, *postfix, operand, env),
        ArithExpr::Binary { op, lhs, rhs } => eval_binary(op, lhs, rhs, env),
        ArithExpr::Assign { op, lvalue, rhs } => eval_assign(op, lvalue, rhs, env),
        ArithExpr::Ternary {
            condition,
            consequent,
            alternative,
        } => {
            if eval_int(condition, env)? != 0 {
                eval_int(consequent, env)
            } else {
                eval_int(alternative, env)
            }
        }
        ArithExpr::FuncCall { name, .. } => error(
            ErrorCause::UnknownFunction(name.value.clone()),
            name.span,
        ),
    }
}

/// Resolves a bare variable operand; unset variables count as zero.
fn variable_value<E: Env>(token: &Token, env: &E) -> Result<i64, E::Error> {
    match env.get_variable(&token.value) {
        None => Ok(0),
        Some(value) => match parse_integer(&value) {
            Some(number) => Ok(number),
            None => error(ErrorCause::InvalidVariableValue(value), token.span),
        },
    }
}

/// Resolves a word operand: a number literal, or an expansion.
fn word_value<E: Env>(word: &Word, env: &mut E) -> Result<i64, E::Error> {
    let span = word.first_span();
    if let [WordPart::Literal(token)] = word.parts() {
        return match parse_integer(&token.value) {
            Some(number) => Ok(number),
            None => error(ErrorCause::InvalidNumber(token.value.clone()), token.span),
        };
    }
    let expanded = match env.expand_word(word) {
        Ok(expanded) => expanded,
        Err(e) => return error(ErrorCause::EnvError(e), span),
    };
    match parse_integer(&expanded) {
        Some(number) => Ok(number),
        None => error(ErrorCause::InvalidVariableValue(expanded), span),
    }
}

/// Assigns a numeric value to the variable named by the lvalue expression.
fn assign_to<E: Env>(lvalue: &ArithExpr, value: i64, env: &mut E) -> Result<(), E::Error> {
    match lvalue {
        ArithExpr::Var(token) => match env.assign_variable(&token.value, &value.to_string()) {
            Ok(()) => Ok(()),
            Err(e) => error(ErrorCause::EnvError(e), token.span),
        },
        other => error(ErrorCause::OperandNotVariable, arith_span(other)),
    }
}

/// Best-effort span of an expression, for error reporting.
fn arith_span(expr: &ArithExpr) -> Option<SpanId> {
    match expr {
        ArithExpr::Var(token) => token.span,
        ArithExpr::Word(word) => word.first_span(),
        ArithExpr::Unary { op, .. } => op.span,
        ArithExpr::Binary { op, .. } | ArithExpr::Assign { op, .. } => op.span,
        ArithExpr::Ternary { condition, .. } => arith_span(condition),
        ArithExpr::Group(inner) => arith_span(inner),
        ArithExpr::FuncCall { name, .. } => name.span,
    }
}

fn eval_unary<E: Env>(
    op: &Token,
    postfix: bool,
    operand: &ArithExpr,
    env: &mut E,
) -> Result<i64, E::Error> {
    match op.id {
        Id::ArithBang => Ok((eval_int(operand, env)? == 0) as i64),
        Id::ArithTilde => Ok(!eval_int(operand, env)?),
        Id::ArithPlus => eval_int(operand, env),
        Id::ArithMinus => match eval_int(operand, env)?.checked_neg() {
            Some(value) => Ok(value),
            None => error(ErrorCause::Overflow, op.span),
        },
        Id::ArithPlusPlus | Id::ArithMinusMinus => {
            let old = eval_int(operand, env)?;
            let delta = if op.id == Id::ArithPlusPlus { 1 } else { -1 };
            let new = match old.checked_add(delta) {
                Some(value) => value,
                None => return error(ErrorCause::Overflow, op.span),
            };
            assign_to(operand, new, env)?;
            Ok(if postfix { old } else { new })
        }
        _ => unreachable!("not a unary operator: {:?}", op.id),
    }
}

fn eval_binary<E: Env>(
    op: &Token,
    lhs: &ArithExpr,
    rhs: &ArithExpr,
    env: &mut E,
) -> Result<i64, E::Error> {
    // Logical connectives and the comma evaluate lazily.
    match op.id {
        Id::ArithAmpAmp => {
            return Ok((eval_int(lhs, env)? != 0 && eval_int(rhs, env)? != 0) as i64);
        }
        Id::ArithBarBar => {
            return Ok((eval_int(lhs, env)? != 0 || eval_int(rhs, env)? != 0) as i64);
        }
        Id::ArithComma => {
            eval_int(lhs, env)?;
            return eval_int(rhs, env);
        }
        _ => {}
    }

    let left = eval_int(lhs, env)?;
    let right = eval_int(rhs, env)?;
    apply_binary(op.id, left, right, op.span)
}

/// Applies a strict binary operator to evaluated operands.
fn apply_binary<E>(id: Id, left: i64, right: i64, span: Option<SpanId>) -> Result<i64, E> {
    let overflow = |value: Option<i64>| match value {
        Some(value) => Ok(value),
        None => error(ErrorCause::Overflow, span),
    };
    match id {
        Id::ArithPlus | Id::ArithPlusEqual => overflow(left.checked_add(right)),
        Id::ArithMinus | Id::ArithMinusEqual => overflow(left.checked_sub(right)),
        Id::ArithStar | Id::ArithStarEqual => overflow(left.checked_mul(right)),
        Id::ArithSlash | Id::ArithSlashEqual => {
            if right == 0 {
                error(ErrorCause::DivisionByZero, span)
            } else {
                overflow(left.checked_div(right))
            }
        }
        Id::ArithPercent | Id::ArithPercentEqual => {
            if right == 0 {
                error(ErrorCause::DivisionByZero, span)
            } else {
                overflow(left.checked_rem(right))
            }
        }
        Id::ArithStarStar => {
            if right < 0 {
                error(ErrorCause::Overflow, span)
            } else {
                let exponent = u32::try_from(right).ok();
                overflow(exponent.and_then(|e| left.checked_pow(e)))
            }
        }
        Id::ArithLessLess | Id::ArithLessLessEqual => {
            let amount = u32::try_from(right).ok().filter(|&s| s < 64);
            match amount {
                Some(amount) => overflow(left.checked_shl(amount)),
                None => error(ErrorCause::Overflow, span),
            }
        }
        Id::ArithGreaterGreater | Id::ArithGreaterGreaterEqual => {
            let amount = u32::try_from(right).ok().filter(|&s| s < 64);
            match amount {
                Some(amount) => overflow(left.checked_shr(amount)),
                None => error(ErrorCause::Overflow, span),
            }
        }
        Id::ArithAmp | Id::ArithAmpEqual => Ok(left & right),
        Id::ArithBarOp | Id::ArithBarEqual => Ok(left | right),
        Id::ArithCaret | Id::ArithCaretEqual => Ok(left ^ right),
        Id::ArithEqualEqual => Ok((left == right) as i64),
        Id::ArithBangEqual => Ok((left != right) as i64),
        Id::ArithLess => Ok((left < right) as i64),
        Id::ArithLessEqual => Ok((left <= right) as i64),
        Id::ArithGreater => Ok((left > right) as i64),
        Id::ArithGreaterEqual => Ok((left >= right) as i64),
        _ => unreachable!("not a binary operator: {id:?}"),
    }
}

fn eval_assign<E: Env>(
    op: &Token,
    lvalue: &ArithExpr,
    rhs: &ArithExpr,
    env: &mut E,
) -> Result<i64, E::Error> {
    let right = eval_int(rhs, env)?;
    let value = if op.id == Id::ArithEqual {
        right
    } else {
        let current = eval_int(lvalue, env)?;
        apply_binary(op.id, current, right, op.span)?
    };
    assign_to(lvalue, value, env)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use marsh_syntax::parser::arith::arith_expr;
    use marsh_syntax::parser::lex::{LexMode, Lexer};
    use std::collections::HashMap;
    use std::convert::Infallible;

    #[derive(Debug, Default)]
    struct TestEnv {
        variables: HashMap<String, String>,
    }

    impl Env for TestEnv {
        type Error = Infallible;

        fn get_variable(&self, name: &str) -> Option<String> {
            self.variables.get(name).cloned()
        }

        fn assign_variable(&mut self, name: &str, value: &str) -> std::result::Result<(), Infallible> {
            self.variables.insert(name.to_string(), value.to_string());
            Ok(())
        }

        fn expand_word(&mut self, word: &Word) -> std::result::Result<String, Infallible> {
            // Resolve `$name` directly; enough for these tests.
            let text = word.to_string();
            match text.strip_prefix('$') {
                Some(name) => Ok(self.get_variable(name).unwrap_or_default()),
                None => Ok(text),
            }
        }
    }

    fn eval_str(code: &str, env: &mut TestEnv) -> Result<i64, Infallible> {
        let mut lexer = Lexer::from_source("-", code);
        lexer.push_mode(LexMode::Arith);
        let expr = arith_expr(&mut lexer).unwrap();
        eval(&expr, env).map(|value| value.integer())
    }

    fn eval_ok(code: &str) -> i64 {
        eval_str(code, &mut TestEnv::default()).unwrap()
    }

    fn eval_err(code: &str) -> ErrorCause<Infallible> {
        eval_str(code, &mut TestEnv::default()).unwrap_err().cause
    }

    #[test]
    fn basic_arithmetic() {
        assert_eq!(eval_ok("1 + 2 * 3"), 7);
        assert_eq!(eval_ok("(1 + 2) * 3"), 9);
        assert_eq!(eval_ok("7 / 2"), 3);
        assert_eq!(eval_ok("7 % 2"), 1);
        assert_eq!(eval_ok("2 ** 10"), 1024);
        assert_eq!(eval_ok("-2 ** 2"), -4);
    }

    #[test]
    fn bases() {
        assert_eq!(eval_ok("0x10 + 010 + 2#11"), 16 + 8 + 3);
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(eval_ok("1 < 2"), 1);
        assert_eq!(eval_ok("2 <= 1"), 0);
        assert_eq!(eval_ok("3 == 3 && 4 != 5"), 1);
        assert_eq!(eval_ok("0 || 2"), 1);
        assert_eq!(eval_ok("!5"), 0);
        assert_eq!(eval_ok("~0"), -1);
    }

    #[test]
    fn short_circuit_skips_side_effects() {
        let mut env = TestEnv::default();
        assert_eq!(eval_str("0 && (x = 9)", &mut env).unwrap(), 0);
        assert_eq!(env.variables.get("x"), None);
        assert_eq!(eval_str("1 || (x = 9)", &mut env).unwrap(), 1);
        assert_eq!(env.variables.get("x"), None);
    }

    #[test]
    fn bitwise_and_shifts() {
        assert_eq!(eval_ok("6 & 3"), 2);
        assert_eq!(eval_ok("6 | 3"), 7);
        assert_eq!(eval_ok("6 ^ 3"), 5);
        assert_eq!(eval_ok("1 << 4"), 16);
        assert_eq!(eval_ok("256 >> 4"), 16);
    }

    #[test]
    fn variables_and_assignment() {
        let mut env = TestEnv::default();
        env.assign_variable("x", "5").unwrap();
        assert_eq!(eval_str("x + 1", &mut env).unwrap(), 6);
        assert_eq!(eval_str("x += 10", &mut env).unwrap(), 15);
        assert_eq!(env.variables["x"], "15");
        assert_eq!(eval_str("unset_var + 1", &mut env).unwrap(), 1);
        assert_eq!(eval_str("$x * 2", &mut env).unwrap(), 30);
    }

    #[test]
    fn increments() {
        let mut env = TestEnv::default();
        env.assign_variable("i", "5").unwrap();
        assert_eq!(eval_str("i++", &mut env).unwrap(), 5);
        assert_eq!(env.variables["i"], "6");
        assert_eq!(eval_str("++i", &mut env).unwrap(), 7);
        assert_eq!(eval_str("i--", &mut env).unwrap(), 7);
        assert_eq!(env.variables["i"], "6");
    }

    #[test]
    fn ternary_is_lazy() {
        let mut env = TestEnv::default();
        assert_eq!(eval_str("1 ? 10 : (x = 1)", &mut env).unwrap(), 10);
        assert_eq!(env.variables.get("x"), None);
    }

    #[test]
    fn comma_evaluates_both() {
        let mut env = TestEnv::default();
        assert_eq!(eval_str("x = 1, x + 1", &mut env).unwrap(), 2);
    }

    #[test]
    fn errors() {
        assert_matches!(eval_err("1 / 0"), ErrorCause::DivisionByZero);
        assert_matches!(eval_err("1 % 0"), ErrorCause::DivisionByZero);
        assert_matches!(
            eval_err("9223372036854775807 + 1"),
            ErrorCause::Overflow
        );
        assert_matches!(eval_err("1 << 64"), ErrorCause::Overflow);
        assert_matches!(eval_err("08"), ErrorCause::InvalidNumber(_));
        assert_matches!(eval_err("f(1)"), ErrorCause::UnknownFunction(_));
        assert_matches!(eval_err("5++"), ErrorCause::OperandNotVariable);

        let mut env = TestEnv::default();
        env.assign_variable("s", "hello").unwrap();
        assert_matches!(
            eval_str("s + 1", &mut env).unwrap_err().cause,
            ErrorCause::InvalidVariableValue(_)
        );
    }
}
