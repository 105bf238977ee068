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

//! Arithmetic expression parser
//!
//! A Pratt parser over the lexer in [arithmetic
//! mode](super::lex::LexMode::Arith). Only parsing happens here; evaluation
//! is a separate concern of the embedding shell. The grammar follows the C
//! operator set with `**` added, assignment and `**` right-associative, and
//! the comma operator at the bottom.
//!
//! The parser stops at any token that is not part of an expression, such as
//! `)`, `}`, `]`, `;`, or `:` outside a ternary; callers decide whether the
//! terminator is the one they expect.

use super::error::{Error, Result, SyntaxError};
use super::lex::Lexer;
use crate::id::Id;
use crate::syntax::{ArithExpr, Word, WordPart};

/// Binding powers of an infix operator
///
/// The second value is the minimum binding power for the right-hand side;
/// it is one more than the first for left-associative operators and equal
/// for right-associative ones.
fn infix_binding_power(id: Id) -> Option<(u8, u8, bool)> {
    use Id::*;
    Some(match id {
        ArithComma => (2, 3, false),
        ArithEqual | ArithPlusEqual | ArithMinusEqual | ArithStarEqual | ArithSlashEqual
        | ArithPercentEqual | ArithAmpEqual | ArithBarEqual | ArithCaretEqual
        | ArithLessLessEqual | ArithGreaterGreaterEqual => (4, 4, true),
        ArithBarBar => (8, 9, false),
        ArithAmpAmp => (10, 11, false),
        ArithBarOp => (12, 13, false),
        ArithCaret => (14, 15, false),
        ArithAmp => (16, 17, false),
        ArithEqualEqual | ArithBangEqual => (18, 19, false),
        ArithLess | ArithLessEqual | ArithGreater | ArithGreaterEqual => (20, 21, false),
        ArithLessLess | ArithGreaterGreater => (22, 23, false),
        ArithPlus | ArithMinus => (24, 25, false),
        ArithStar | ArithSlash | ArithPercent => (26, 27, false),
        ArithStarStar => (30, 29, false),
        _ => return None,
    })
}

/// Binding power of the ternary conditional operator
const TERNARY_BP: u8 = 6;

/// Minimum binding power for the operand of a prefix operator
const PREFIX_BP: u8 = 28;

/// Parses a whole arithmetic expression in the current position.
///
/// The lexer must be in arithmetic mode. The terminating token is not
/// consumed.
pub fn arith_expr(lexer: &mut Lexer) -> Result<ArithExpr> {
    parse_expr(lexer, 0)
}

/// Skips blanks and line continuations, returning the id of the next token.
fn skip_and_peek(lexer: &mut Lexer) -> Id {
    loop {
        match lexer.peek_id() {
            Id::Blank | Id::LineContinuation => {
                lexer.next_token();
            }
            id => return id,
        }
    }
}

fn invalid(lexer: &mut Lexer) -> Error {
    Error {
        cause: SyntaxError::InvalidArithExpr.into(),
        location: lexer.current_location(),
    }
}

fn parse_expr(lexer: &mut Lexer, min_bp: u8) -> Result<ArithExpr> {
    let mut lhs = parse_prefix(lexer)?;
    loop {
        let id = skip_and_peek(lexer);

        if id == Id::ArithQuestion {
            if TERNARY_BP < min_bp {
                break;
            }
            lexer.next_token();
            let consequent = parse_expr(lexer, 0)?;
            if skip_and_peek(lexer) != Id::ArithColon {
                return Err(invalid(lexer));
            }
            lexer.next_token();
            let alternative = parse_expr(lexer, TERNARY_BP)?;
            lhs = ArithExpr::Ternary {
                condition: Box::new(lhs),
                consequent: Box::new(consequent),
                alternative: Box::new(alternative),
            };
            continue;
        }

        let Some((left_bp, right_bp, is_assign)) = infix_binding_power(id) else {
            break;
        };
        if left_bp < min_bp {
            break;
        }
        let op = lexer.next_token();
        let rhs = parse_expr(lexer, right_bp)?;
        lhs = if is_assign {
            if !matches!(lhs, ArithExpr::Var(_)) {
                return Err(Error {
                    cause: SyntaxError::InvalidArithAssignment.into(),
                    location: lexer.location_of(&op),
                });
            }
            ArithExpr::Assign {
                op,
                lvalue: Box::new(lhs),
                rhs: Box::new(rhs),
            }
        } else {
            ArithExpr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }
        };
    }
    Ok(lhs)
}

fn parse_prefix(lexer: &mut Lexer) -> Result<ArithExpr> {
    use Id::*;
    let mut expr = match skip_and_peek(lexer) {
        ArithBang | ArithTilde | ArithPlus | ArithMinus | ArithPlusPlus | ArithMinusMinus => {
            let op = lexer.next_token();
            let operand = parse_expr(lexer, PREFIX_BP)?;
            ArithExpr::Unary {
                op,
                postfix: false,
                operand: Box::new(operand),
            }
        }
        ArithNumber => {
            let token = lexer.next_token();
            ArithExpr::Word(Word::Compound(vec![WordPart::Literal(token)]))
        }
        ArithName => {
            let name = lexer.next_token();
            if skip_and_peek(lexer) == OpenParen {
                parse_func_call(lexer, name)?
            } else {
                ArithExpr::Var(name)
            }
        }
        DollarName | DollarSpecial => {
            let token = lexer.next_token();
            ArithExpr::Word(Word::Compound(vec![WordPart::SimpleVarSub(token)]))
        }
        DollarBrace => ArithExpr::Word(Word::Compound(vec![lexer.braced_param()?])),
        DollarParen => ArithExpr::Word(Word::Compound(vec![lexer.command_substitution()?])),
        DollarDParen => ArithExpr::Word(Word::Compound(vec![lexer.arith_substitution()?])),
        Backquote => ArithExpr::Word(Word::Compound(vec![lexer.backquote()?])),
        OpenParen => {
            lexer.next_token();
            let inner = parse_expr(lexer, 0)?;
            if skip_and_peek(lexer) != CloseParen {
                return Err(invalid(lexer));
            }
            lexer.next_token();
            ArithExpr::Group(Box::new(inner))
        }
        _ => return Err(invalid(lexer)),
    };

    while matches!(skip_and_peek(lexer), ArithPlusPlus | ArithMinusMinus) {
        let op = lexer.next_token();
        expr = ArithExpr::Unary {
            op,
            postfix: true,
            operand: Box::new(expr),
        };
    }
    Ok(expr)
}

fn parse_func_call(lexer: &mut Lexer, name: crate::syntax::Token) -> Result<ArithExpr> {
    lexer.next_token(); // `(`
    let mut args = Vec::new();
    if skip_and_peek(lexer) == Id::CloseParen {
        lexer.next_token();
        return Ok(ArithExpr::FuncCall { name, args });
    }
    loop {
        args.push(parse_expr(lexer, 3)?);
        match skip_and_peek(lexer) {
            Id::ArithComma => {
                lexer.next_token();
            }
            Id::CloseParen => {
                lexer.next_token();
                return Ok(ArithExpr::FuncCall { name, args });
            }
            _ => return Err(invalid(lexer)),
        }
    }
}
