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

//! Match tables of the lexical modes
//!
//! One function per [`LexMode`], each taking the remaining suffix of the
//! current line and returning the id and byte length of the token at its
//! start. Every function returns the longest match its rules allow; where two
//! rules could match the same prefix, the one listed first in the function
//! wins. The input is never empty and never crosses a line boundary.

use super::LexMode;
use crate::id::Id;

/// Matches the token at the start of `rest` in the given mode.
///
/// Returns the token id and the length of the token in bytes. The length is
/// positive and at most `rest.len()`.
#[must_use]
pub fn match_token(mode: LexMode, rest: &str) -> (Id, usize) {
    debug_assert!(!rest.is_empty());
    match mode {
        LexMode::Outer => outer(rest),
        LexMode::DoubleQuoted => double_quoted(rest),
        LexMode::SingleQuoted => single_quoted(rest),
        LexMode::Arith => arith(rest),
        LexMode::VsName => vs_name(rest),
        LexMode::VsOp => vs_op(rest),
        LexMode::VsArgUnquoted => vs_arg_unquoted(rest, false),
        LexMode::VsArgUnquotedSlash => vs_arg_unquoted(rest, true),
        LexMode::VsArgDouble => vs_arg_double(rest),
        LexMode::BashRegex => bash_regex(rest),
        LexMode::HereDocBody => here_doc_body(rest),
        LexMode::Comment => comment(rest),
    }
}

fn first_char(rest: &str) -> char {
    rest.chars().next().unwrap()
}

/// Tests if the character can start a variable or function name.
pub fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

/// Tests if the character can continue a variable or function name.
pub fn is_name_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Tests if the string is a valid variable or function name.
#[must_use]
pub fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => chars.all(is_name_char),
        _ => false,
    }
}

/// Length of the longest prefix whose characters satisfy the predicate
fn run<F: Fn(char) -> bool>(rest: &str, f: F) -> usize {
    rest.char_indices()
        .find(|&(_, c)| !f(c))
        .map_or(rest.len(), |(i, _)| i)
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Characters that end a literal run in command position
fn is_outer_special(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\n' | '|' | '&' | ';' | '(' | ')' | '<' | '>' | '\'' | '"' | '`' | '\\'
            | '$' | '~' | '#' | '='
    )
}

/// Matches a `$`-initiated token, shared between several modes.
///
/// `quotes` enables `$'`, which is only special outside double quotes.
fn dollar(rest: &str, quotes: bool) -> (Id, usize) {
    let mut chars = rest.chars();
    chars.next(); // '$'
    match chars.next() {
        Some('(') => {
            if chars.next() == Some('(') {
                (Id::DollarDParen, 3)
            } else {
                (Id::DollarParen, 2)
            }
        }
        Some('{') => (Id::DollarBrace, 2),
        Some('\'') if quotes => (Id::DollarSingleQuote, 2),
        Some(c) if is_name_start(c) => (Id::DollarName, 1 + run(&rest[1..], is_name_char)),
        Some(c @ ('0'..='9' | '@' | '*' | '#' | '?' | '-' | '$' | '!')) => {
            (Id::DollarSpecial, 1 + c.len_utf8())
        }
        _ => (Id::Other, 1),
    }
}

/// Matches a backslash escape: line continuation, escaped character, or a
/// trailing backslash with nothing after it.
fn backslash(rest: &str) -> (Id, usize) {
    let mut chars = rest.chars();
    chars.next(); // '\\'
    match chars.next() {
        Some('\n') => (Id::LineContinuation, 2),
        Some(c) => (Id::EscapedChar, 1 + c.len_utf8()),
        None => (Id::Other, 1),
    }
}

fn outer(rest: &str) -> (Id, usize) {
    match first_char(rest) {
        ' ' | '\t' => (Id::Blank, run(rest, is_blank)),
        '\n' => (Id::Newline, 1),
        '\\' => backslash(rest),
        '&' => {
            if rest.starts_with("&&") {
                (Id::AndAnd, 2)
            } else {
                (Id::And, 1)
            }
        }
        '|' => {
            if rest.starts_with("||") {
                (Id::BarBar, 2)
            } else if rest.starts_with("|&") {
                (Id::BarAnd, 2)
            } else {
                (Id::Bar, 1)
            }
        }
        ';' => {
            if rest.starts_with(";;&") {
                (Id::SemicolonSemicolonAnd, 3)
            } else if rest.starts_with(";;") {
                (Id::SemicolonSemicolon, 2)
            } else if rest.starts_with(";&") {
                (Id::SemicolonAnd, 2)
            } else {
                (Id::Semicolon, 1)
            }
        }
        '(' => (Id::OpenParen, 1),
        ')' => (Id::CloseParen, 1),
        '<' => {
            if rest.starts_with("<<-") {
                (Id::LessLessDash, 3)
            } else if rest.starts_with("<<") {
                (Id::LessLess, 2)
            } else if rest.starts_with("<&") {
                (Id::LessAnd, 2)
            } else if rest.starts_with("<>") {
                (Id::LessGreater, 2)
            } else if rest.starts_with("<(") {
                (Id::LessOpenParen, 2)
            } else {
                (Id::Less, 1)
            }
        }
        '>' => {
            if rest.starts_with(">>") {
                (Id::GreaterGreater, 2)
            } else if rest.starts_with(">&") {
                (Id::GreaterAnd, 2)
            } else if rest.starts_with(">|") {
                (Id::GreaterBar, 2)
            } else if rest.starts_with(">(") {
                (Id::GreaterOpenParen, 2)
            } else {
                (Id::Greater, 1)
            }
        }
        '\'' => (Id::SingleQuote, 1),
        '"' => (Id::DoubleQuote, 1),
        '`' => (Id::Backquote, 1),
        '$' => dollar(rest, true),
        '#' => (Id::Pound, 1),
        '~' => (
            Id::TildeLike,
            1 + run(&rest[1..], |c| {
                c == '.' || c == '-' || c == '_' || c.is_ascii_alphanumeric()
            }),
        ),
        '0'..='9' => {
            // A digit run directly followed by a redirection operator is an
            // IO_NUMBER; anything else falls through to the literal rule.
            let digits = run(rest, |c| c.is_ascii_digit());
            match rest[digits..].chars().next() {
                Some('<' | '>') => (Id::IoNumber, digits),
                _ => (Id::Literal, run(rest, |c| !is_outer_special(c))),
            }
        }
        '=' => (Id::Other, 1),
        c => {
            if is_name_start(c) {
                // `name=` and `name+=` start an assignment.
                let name = run(rest, is_name_char);
                let after = &rest[name..];
                if after.starts_with('=') {
                    return (Id::VarLike, name + 1);
                }
                if after.starts_with("+=") {
                    return (Id::VarLike, name + 2);
                }
            }
            (Id::Literal, run(rest, |c| !is_outer_special(c)))
        }
    }
}

fn double_quoted(rest: &str) -> (Id, usize) {
    match first_char(rest) {
        '"' => (Id::DoubleQuote, 1),
        '\\' => {
            let mut chars = rest.chars();
            chars.next();
            match chars.next() {
                Some('\n') => (Id::LineContinuation, 2),
                Some(c @ ('$' | '`' | '"' | '\\')) => (Id::EscapedChar, 1 + c.len_utf8()),
                _ => (Id::Literal, 1),
            }
        }
        '$' => dollar(rest, false),
        '`' => (Id::Backquote, 1),
        _ => (
            Id::Literal,
            run(rest, |c| !matches!(c, '"' | '\\' | '$' | '`')),
        ),
    }
}

fn single_quoted(rest: &str) -> (Id, usize) {
    match first_char(rest) {
        '\'' => (Id::SingleQuote, 1),
        _ => (Id::Literal, run(rest, |c| c != '\'')),
    }
}

fn arith(rest: &str) -> (Id, usize) {
    match first_char(rest) {
        c if c.is_whitespace() => (Id::Blank, run(rest, char::is_whitespace)),
        '\\' if rest.starts_with("\\\n") => (Id::LineContinuation, 2),
        '0'..='9' => (
            Id::ArithNumber,
            run(rest, |c| c == '#' || c.is_ascii_alphanumeric()),
        ),
        '$' => dollar(rest, false),
        '`' => (Id::Backquote, 1),
        '(' => (Id::OpenParen, 1),
        ')' => (Id::CloseParen, 1),
        '}' => (Id::CloseBrace, 1),
        ']' => (Id::CloseBracket, 1),
        ';' => (Id::Semicolon, 1),
        '+' => match rest.as_bytes().get(1) {
            Some(b'+') => (Id::ArithPlusPlus, 2),
            Some(b'=') => (Id::ArithPlusEqual, 2),
            _ => (Id::ArithPlus, 1),
        },
        '-' => match rest.as_bytes().get(1) {
            Some(b'-') => (Id::ArithMinusMinus, 2),
            Some(b'=') => (Id::ArithMinusEqual, 2),
            _ => (Id::ArithMinus, 1),
        },
        '*' => match rest.as_bytes().get(1) {
            Some(b'*') => (Id::ArithStarStar, 2),
            Some(b'=') => (Id::ArithStarEqual, 2),
            _ => (Id::ArithStar, 1),
        },
        '/' => match rest.as_bytes().get(1) {
            Some(b'=') => (Id::ArithSlashEqual, 2),
            _ => (Id::ArithSlash, 1),
        },
        '%' => match rest.as_bytes().get(1) {
            Some(b'=') => (Id::ArithPercentEqual, 2),
            _ => (Id::ArithPercent, 1),
        },
        '<' => {
            if rest.starts_with("<<=") {
                (Id::ArithLessLessEqual, 3)
            } else if rest.starts_with("<<") {
                (Id::ArithLessLess, 2)
            } else if rest.starts_with("<=") {
                (Id::ArithLessEqual, 2)
            } else {
                (Id::ArithLess, 1)
            }
        }
        '>' => {
            if rest.starts_with(">>=") {
                (Id::ArithGreaterGreaterEqual, 3)
            } else if rest.starts_with(">>") {
                (Id::ArithGreaterGreater, 2)
            } else if rest.starts_with(">=") {
                (Id::ArithGreaterEqual, 2)
            } else {
                (Id::ArithGreater, 1)
            }
        }
        '=' => {
            if rest.starts_with("==") {
                (Id::ArithEqualEqual, 2)
            } else {
                (Id::ArithEqual, 1)
            }
        }
        '!' => {
            if rest.starts_with("!=") {
                (Id::ArithBangEqual, 2)
            } else {
                (Id::ArithBang, 1)
            }
        }
        '&' => {
            if rest.starts_with("&&") {
                (Id::ArithAmpAmp, 2)
            } else if rest.starts_with("&=") {
                (Id::ArithAmpEqual, 2)
            } else {
                (Id::ArithAmp, 1)
            }
        }
        '|' => {
            if rest.starts_with("||") {
                (Id::ArithBarBar, 2)
            } else if rest.starts_with("|=") {
                (Id::ArithBarEqual, 2)
            } else {
                (Id::ArithBarOp, 1)
            }
        }
        '^' => {
            if rest.starts_with("^=") {
                (Id::ArithCaretEqual, 2)
            } else {
                (Id::ArithCaret, 1)
            }
        }
        '~' => (Id::ArithTilde, 1),
        '?' => (Id::ArithQuestion, 1),
        ':' => (Id::ArithColon, 1),
        ',' => (Id::ArithComma, 1),
        c if is_name_start(c) => (Id::ArithName, run(rest, is_name_char)),
        c => (Id::Unknown, c.len_utf8()),
    }
}

fn vs_name(rest: &str) -> (Id, usize) {
    match first_char(rest) {
        '#' => {
            // `${#}` is the special parameter, `${#x}` a length prefix.
            if rest[1..].starts_with('}') {
                (Id::BraceParamSpecial, 1)
            } else {
                (Id::BraceLength, 1)
            }
        }
        '!' => {
            if rest[1..].starts_with('}') {
                (Id::BraceParamSpecial, 1)
            } else {
                (Id::BraceIndirect, 1)
            }
        }
        '}' => (Id::CloseBrace, 1),
        '0'..='9' => (Id::BraceParamDigits, run(rest, |c| c.is_ascii_digit())),
        '@' | '*' | '?' | '-' | '$' => (Id::BraceParamSpecial, 1),
        c if is_name_start(c) => (Id::BraceParamName, run(rest, is_name_char)),
        c => (Id::Unknown, c.len_utf8()),
    }
}

fn vs_op(rest: &str) -> (Id, usize) {
    match first_char(rest) {
        '}' => (Id::CloseBrace, 1),
        '[' => (Id::OpenBracket, 1),
        ':' => match rest.as_bytes().get(1) {
            Some(b'-') => (Id::SwitchColonHyphen, 2),
            Some(b'=') => (Id::SwitchColonEqual, 2),
            Some(b'?') => (Id::SwitchColonQuestion, 2),
            Some(b'+') => (Id::SwitchColonPlus, 2),
            _ => (Id::SliceColon, 1),
        },
        '-' => (Id::SwitchHyphen, 1),
        '=' => (Id::SwitchEqual, 1),
        '?' => (Id::SwitchQuestion, 1),
        '+' => (Id::SwitchPlus, 1),
        '%' => {
            if rest.starts_with("%%") {
                (Id::TrimPercentPercent, 2)
            } else {
                (Id::TrimPercent, 1)
            }
        }
        '#' => {
            if rest.starts_with("##") {
                (Id::TrimPoundPound, 2)
            } else {
                (Id::TrimPound, 1)
            }
        }
        '/' => {
            if rest.starts_with("//") {
                (Id::ReplaceSlashSlash, 2)
            } else {
                (Id::ReplaceSlash, 1)
            }
        }
        c => (Id::Unknown, c.len_utf8()),
    }
}

fn vs_arg_unquoted(rest: &str, slash_ends: bool) -> (Id, usize) {
    match first_char(rest) {
        '}' => (Id::CloseBrace, 1),
        '/' if slash_ends => (Id::Slash, 1),
        '\'' => (Id::SingleQuote, 1),
        '"' => (Id::DoubleQuote, 1),
        '\\' => backslash(rest),
        '$' => dollar(rest, true),
        '`' => (Id::Backquote, 1),
        '~' => (
            Id::TildeLike,
            1 + run(&rest[1..], |c| {
                c == '.' || c == '-' || c == '_' || c.is_ascii_alphanumeric()
            }),
        ),
        _ => (
            Id::Literal,
            run(rest, |c| {
                !matches!(c, '}' | '\'' | '"' | '\\' | '$' | '`' | '~') && !(slash_ends && c == '/')
            }),
        ),
    }
}

fn vs_arg_double(rest: &str) -> (Id, usize) {
    match first_char(rest) {
        '}' => (Id::CloseBrace, 1),
        '"' => (Id::DoubleQuote, 1),
        '\\' => {
            let mut chars = rest.chars();
            chars.next();
            match chars.next() {
                Some('\n') => (Id::LineContinuation, 2),
                Some(c @ ('$' | '`' | '"' | '\\' | '}')) => (Id::EscapedChar, 1 + c.len_utf8()),
                _ => (Id::Literal, 1),
            }
        }
        '$' => dollar(rest, false),
        '`' => (Id::Backquote, 1),
        _ => (
            Id::Literal,
            run(rest, |c| !matches!(c, '}' | '"' | '\\' | '$' | '`')),
        ),
    }
}

fn bash_regex(rest: &str) -> (Id, usize) {
    match first_char(rest) {
        ' ' | '\t' => (Id::Blank, run(rest, is_blank)),
        '\n' => (Id::Newline, 1),
        '\\' => backslash(rest),
        '\'' => (Id::SingleQuote, 1),
        '"' => (Id::DoubleQuote, 1),
        '$' => dollar(rest, true),
        '`' => (Id::Backquote, 1),
        _ => (
            Id::Literal,
            run(rest, |c| {
                !matches!(c, ' ' | '\t' | '\n' | '\\' | '\'' | '"' | '$' | '`')
            }),
        ),
    }
}

fn here_doc_body(rest: &str) -> (Id, usize) {
    match first_char(rest) {
        '\\' => {
            let mut chars = rest.chars();
            chars.next();
            match chars.next() {
                Some('\n') => (Id::LineContinuation, 2),
                Some(c @ ('$' | '`' | '\\')) => (Id::EscapedChar, 1 + c.len_utf8()),
                _ => (Id::Literal, 1),
            }
        }
        '$' => dollar(rest, false),
        '`' => (Id::Backquote, 1),
        _ => (Id::Literal, run(rest, |c| !matches!(c, '\\' | '$' | '`'))),
    }
}

fn comment(rest: &str) -> (Id, usize) {
    (Id::Comment, run(rest, |c| c != '\n').max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outer(rest: &str) -> (Id, usize) {
        match_token(LexMode::Outer, rest)
    }

    #[test]
    fn outer_operators_longest_match() {
        assert_eq!(outer("&& x"), (Id::AndAnd, 2));
        assert_eq!(outer("&x"), (Id::And, 1));
        assert_eq!(outer(";;& y"), (Id::SemicolonSemicolonAnd, 3));
        assert_eq!(outer(";;"), (Id::SemicolonSemicolon, 2));
        assert_eq!(outer(";&"), (Id::SemicolonAnd, 2));
        assert_eq!(outer("<<-X"), (Id::LessLessDash, 3));
        assert_eq!(outer("<<X"), (Id::LessLess, 2));
        assert_eq!(outer("<(x)"), (Id::LessOpenParen, 2));
        assert_eq!(outer(">|f"), (Id::GreaterBar, 2));
        assert_eq!(outer("|&"), (Id::BarAnd, 2));
    }

    #[test]
    fn outer_literals_and_assignments() {
        assert_eq!(outer("abc def"), (Id::Literal, 3));
        assert_eq!(outer("a=1"), (Id::VarLike, 2));
        assert_eq!(outer("a+=1"), (Id::VarLike, 3));
        assert_eq!(outer("a+b"), (Id::Literal, 3));
        assert_eq!(outer("=x"), (Id::Other, 1));
        assert_eq!(outer("--opt=v"), (Id::Literal, 5));
    }

    #[test]
    fn outer_io_number() {
        assert_eq!(outer("2>file"), (Id::IoNumber, 1));
        assert_eq!(outer("12<x"), (Id::IoNumber, 2));
        assert_eq!(outer("2x>f"), (Id::Literal, 2));
        assert_eq!(outer("2;"), (Id::Literal, 1));
    }

    #[test]
    fn outer_dollar_forms() {
        assert_eq!(outer("$foo bar"), (Id::DollarName, 4));
        assert_eq!(outer("$?x"), (Id::DollarSpecial, 2));
        assert_eq!(outer("$10"), (Id::DollarSpecial, 2));
        assert_eq!(outer("${x}"), (Id::DollarBrace, 2));
        assert_eq!(outer("$(x)"), (Id::DollarParen, 2));
        assert_eq!(outer("$((x))"), (Id::DollarDParen, 3));
        assert_eq!(outer("$'a'"), (Id::DollarSingleQuote, 2));
        assert_eq!(outer("$ x"), (Id::Other, 1));
    }

    #[test]
    fn outer_misc() {
        assert_eq!(outer("  \tx"), (Id::Blank, 3));
        assert_eq!(outer("\nx"), (Id::Newline, 1));
        assert_eq!(outer("\\a"), (Id::EscapedChar, 2));
        assert_eq!(outer("\\\nx"), (Id::LineContinuation, 2));
        assert_eq!(outer("~user/x"), (Id::TildeLike, 5));
        assert_eq!(outer("#rest"), (Id::Pound, 1));
    }

    #[test]
    fn double_quoted_escapes() {
        let dq = |s| match_token(LexMode::DoubleQuoted, s);
        assert_eq!(dq("\\$x"), (Id::EscapedChar, 2));
        assert_eq!(dq("\\'x"), (Id::Literal, 1));
        assert_eq!(dq("ab'c$"), (Id::Literal, 4));
        assert_eq!(dq("\"x"), (Id::DoubleQuote, 1));
    }

    #[test]
    fn vs_modes() {
        assert_eq!(match_token(LexMode::VsName, "#}"), (Id::BraceParamSpecial, 1));
        assert_eq!(match_token(LexMode::VsName, "#x}"), (Id::BraceLength, 1));
        assert_eq!(match_token(LexMode::VsName, "!x}"), (Id::BraceIndirect, 1));
        assert_eq!(match_token(LexMode::VsName, "foo}"), (Id::BraceParamName, 3));
        assert_eq!(match_token(LexMode::VsName, "12}"), (Id::BraceParamDigits, 2));
        assert_eq!(match_token(LexMode::VsOp, ":-d}"), (Id::SwitchColonHyphen, 2));
        assert_eq!(match_token(LexMode::VsOp, ":0}"), (Id::SliceColon, 1));
        assert_eq!(match_token(LexMode::VsOp, "%%p}"), (Id::TrimPercentPercent, 2));
        assert_eq!(match_token(LexMode::VsOp, "//a/b}"), (Id::ReplaceSlashSlash, 2));
    }

    #[test]
    fn vs_arg_quote_handling() {
        // Unquoted context: single quotes open a quotation.
        assert_eq!(
            match_token(LexMode::VsArgUnquoted, "'a b'}"),
            (Id::SingleQuote, 1)
        );
        // Double-quoted context: single quotes are ordinary characters.
        assert_eq!(
            match_token(LexMode::VsArgDouble, "'a b'}"),
            (Id::Literal, 5)
        );
        // Blanks do not end the argument in either context.
        assert_eq!(
            match_token(LexMode::VsArgUnquoted, "a b c}"),
            (Id::Literal, 5)
        );
    }

    #[test]
    fn arith_tokens() {
        let a = |s| match_token(LexMode::Arith, s);
        assert_eq!(a("**2"), (Id::ArithStarStar, 2));
        assert_eq!(a("<<=1"), (Id::ArithLessLessEqual, 3));
        assert_eq!(a("0x1f+"), (Id::ArithNumber, 4));
        assert_eq!(a("16#ff)"), (Id::ArithNumber, 5));
        assert_eq!(a("i++"), (Id::ArithName, 1));
        assert_eq!(a("++i"), (Id::ArithPlusPlus, 2));
        assert_eq!(a(" \n x"), (Id::Blank, 3));
    }
}
