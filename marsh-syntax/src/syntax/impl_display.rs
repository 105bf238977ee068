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

//! Display implementations producing the canonical source form
//!
//! The canonical form is a single line; here-document contents are omitted.
//! Re-parsing the canonical form of a here-document-free command yields a
//! structurally equal command.

use super::*;
use itertools::Itertools as _;
use std::fmt;
use std::fmt::Display;
use std::fmt::Write as _;

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOp::Length => f.write_char('#'),
            PrefixOp::Indirect => f.write_char('!'),
        }
    }
}

impl fmt::Display for BracketOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketOp::WholeArray(token) => write!(f, "[{token}]"),
            BracketOp::Index(expr) => write!(f, "[{expr}]"),
        }
    }
}

impl fmt::Display for SwitchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SwitchAction::*;
        let c = match self {
            Alter => '+',
            Default => '-',
            Assign => '=',
            Error => '?',
        };
        f.write_char(c)
    }
}

impl fmt::Display for SwitchCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchCondition::Unset => Ok(()),
            SwitchCondition::UnsetOrEmpty => f.write_char(':'),
        }
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.condition, self.action, self.word)
    }
}

impl fmt::Display for TrimSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrimSide::Prefix => f.write_char('#'),
            TrimSide::Suffix => f.write_char('%'),
        }
    }
}

impl fmt::Display for Trim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.side.fmt(f)?;
        match self.length {
            TrimLength::Shortest => (),
            TrimLength::Longest => self.side.fmt(f)?,
        }
        self.pattern.fmt(f)
    }
}

impl fmt::Display for Replace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all {
            f.write_char('/')?;
        }
        write!(f, "/{}", self.pattern)?;
        match &self.substitute {
            Some(substitute) => write!(f, "/{substitute}"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.offset)?;
        match &self.length {
            Some(length) => write!(f, ":{length}"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for SuffixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuffixOp::Switch(switch) => switch.fmt(f),
            SuffixOp::Trim(trim) => trim.fmt(f),
            SuffixOp::Replace(replace) => replace.fmt(f),
            SuffixOp::Slice(slice) => slice.fmt(f),
        }
    }
}

impl fmt::Display for BracedVarSub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("${")?;
        if let Some(prefix) = &self.prefix_op {
            prefix.fmt(f)?;
        }
        self.name.fmt(f)?;
        if let Some(bracket) = &self.bracket_op {
            bracket.fmt(f)?;
        }
        if let Some(suffix) = &self.suffix_op {
            suffix.fmt(f)?;
        }
        f.write_char('}')
    }
}

impl fmt::Display for WordPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use WordPart::*;
        match self {
            Literal(token) | EscapedLiteral(token) | SimpleVarSub(token) | TildeSub(token) => {
                token.fmt(f)
            }
            SingleQuoted(tokens) => {
                f.write_char('\'')?;
                for token in tokens {
                    token.fmt(f)?;
                }
                f.write_char('\'')
            }
            DollarSingleQuoted(token, _) => write!(f, "$'{token}'"),
            DoubleQuoted(parts) => {
                f.write_char('"')?;
                for part in parts {
                    part.fmt(f)?;
                }
                f.write_char('"')
            }
            BracedVarSub(sub) => sub.fmt(f),
            CommandSub {
                command,
                backquoted,
            } => {
                if *backquoted {
                    write!(f, "`{command}`")
                } else {
                    write!(f, "$({command})")
                }
            }
            ArithSub(expr) => write!(f, "$(({expr}))"),
            ArrayLiteral(words) => {
                f.write_char('(')?;
                write!(f, "{}", words.iter().format(" "))?;
                f.write_char(')')
            }
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Word::Token(token) => token.fmt(f),
            Word::Compound(parts) => parts.iter().try_for_each(|part| part.fmt(f)),
        }
    }
}

impl fmt::Display for ArithExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ArithExpr::*;
        match self {
            Var(token) => token.fmt(f),
            Word(word) => word.fmt(f),
            Unary {
                op,
                postfix,
                operand,
            } => {
                if *postfix {
                    write!(f, "{operand}{op}")
                } else {
                    write!(f, "{op}{operand}")
                }
            }
            Binary { op, lhs, rhs } => {
                if op.id == Id::ArithComma {
                    write!(f, "{lhs}{op} {rhs}")
                } else {
                    write!(f, "{lhs} {op} {rhs}")
                }
            }
            Assign { op, lvalue, rhs } => write!(f, "{lvalue} {op} {rhs}"),
            Ternary {
                condition,
                consequent,
                alternative,
            } => write!(f, "{condition} ? {consequent} : {alternative}"),
            Group(inner) => write!(f, "({inner})"),
            FuncCall { name, args } => write!(f, "{name}({})", args.iter().format(", ")),
        }
    }
}

impl fmt::Display for BoolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BoolExpr::*;
        match self {
            WordTest(word) => word.fmt(f),
            Unary { op, operand } => write!(f, "{op} {operand}"),
            Binary { op, lhs, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Not(inner) => write!(f, "! {inner}"),
            And(lhs, rhs) => write!(f, "{lhs} && {rhs}"),
            Or(lhs, rhs) => write!(f, "{lhs} || {rhs}"),
            Group(inner) => write!(f, "( {inner} )"),
        }
    }
}

impl fmt::Display for Redir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(fd) = &self.fd {
            fd.fmt(f)?;
        }
        match &self.body {
            RedirBody::File { op, target } => write!(f, "{op}{target}"),
            RedirBody::HereDoc(here_doc) => write!(f, "{}{}", here_doc.op, here_doc.delimiter),
        }
    }
}

impl fmt::Display for AssignPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.value)
    }
}

impl fmt::Display for SimpleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut space = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            if first {
                first = false;
                Ok(())
            } else {
                f.write_char(' ')
            }
        };
        for assign in &self.assigns {
            space(f)?;
            assign.fmt(f)?;
        }
        for word in &self.words {
            space(f)?;
            word.fmt(f)?;
        }
        for redir in &self.redirs {
            space(f)?;
            redir.fmt(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for CaseContinuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CaseContinuation::*;
        let s = match self {
            Break => ";;",
            FallThrough => ";&",
            Continue => ";;&",
        };
        f.write_str(s)
    }
}

impl fmt::Display for CaseArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) ", self.patterns.iter().format(" | "))?;
        if !matches!(self.body, Command::NoOp) {
            write_separated(f, &self.body)?;
            f.write_char(' ')?;
        }
        self.continuation.fmt(f)
    }
}

/// Writes a command followed by `;` unless its own text already ends with a
/// terminator.
fn write_separated(f: &mut fmt::Formatter<'_>, command: &Command) -> fmt::Result {
    command.fmt(f)?;
    if !command.ends_with_terminator() {
        f.write_char(';')?;
    }
    Ok(())
}

/// Writes the redirections of a compound command, each preceded by a space.
fn write_redirs(f: &mut fmt::Formatter<'_>, redirs: &[Redir]) -> fmt::Result {
    for redir in redirs {
        write!(f, " {redir}")?;
    }
    Ok(())
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Command::*;
        match self {
            NoOp => Ok(()),
            Simple(simple) => simple.fmt(f),
            Sentence { inner, terminator } => write!(f, "{inner}{terminator}"),
            Assignment { keyword, pairs } => {
                if let Some(keyword) = keyword {
                    write!(f, "{keyword} ")?;
                }
                write!(f, "{}", pairs.iter().format(" "))
            }
            Pipeline {
                children,
                negated,
                stderr_indices,
            } => {
                if *negated {
                    f.write_str("! ")?;
                }
                for (index, child) in children.iter().enumerate() {
                    if index > 0 {
                        if stderr_indices.contains(&(index - 1)) {
                            f.write_str(" |& ")?;
                        } else {
                            f.write_str(" | ")?;
                        }
                    }
                    child.fmt(f)?;
                }
                Ok(())
            }
            AndOr { children, ops } => {
                for (index, child) in children.iter().enumerate() {
                    if index > 0 {
                        write!(f, " {} ", ops[index - 1])?;
                    }
                    child.fmt(f)?;
                }
                Ok(())
            }
            List(children) => {
                for (index, child) in children.iter().enumerate() {
                    if index > 0 {
                        f.write_char(' ')?;
                    }
                    if index + 1 < children.len() && !child.ends_with_terminator() {
                        write!(f, "{child};")?;
                    } else {
                        child.fmt(f)?;
                    }
                }
                Ok(())
            }
            DoGroup { body } => {
                f.write_str("do ")?;
                write_separated(f, body)?;
                f.write_str(" done")
            }
            BraceGroup { body, redirs } => {
                f.write_str("{ ")?;
                write_separated(f, body)?;
                f.write_str(" }")?;
                write_redirs(f, redirs)
            }
            Subshell { body, redirs } => {
                write!(f, "({body})")?;
                write_redirs(f, redirs)
            }
            DParen { expr, redirs } => {
                write!(f, "(({expr}))")?;
                write_redirs(f, redirs)
            }
            DBracket { expr, redirs } => {
                write!(f, "[[ {expr} ]]")?;
                write_redirs(f, redirs)
            }
            ForEach(for_each) => {
                write!(f, "for {}", for_each.name)?;
                if !for_each.do_arg_iter {
                    f.write_str(" in")?;
                    for word in &for_each.words {
                        write!(f, " {word}")?;
                    }
                }
                write!(f, "; {}", for_each.body)?;
                write_redirs(f, &for_each.redirs)
            }
            ForExpr(for_expr) => {
                f.write_str("for ((")?;
                if let Some(init) = &for_expr.init {
                    init.fmt(f)?;
                }
                f.write_str("; ")?;
                if let Some(cond) = &for_expr.cond {
                    cond.fmt(f)?;
                }
                f.write_str("; ")?;
                if let Some(update) = &for_expr.update {
                    update.fmt(f)?;
                }
                write!(f, ")); {}", for_expr.body)?;
                write_redirs(f, &for_expr.redirs)
            }
            While {
                condition,
                body,
                redirs,
            } => {
                f.write_str("while ")?;
                write_separated(f, condition)?;
                write!(f, " {body}")?;
                write_redirs(f, redirs)
            }
            Until {
                condition,
                body,
                redirs,
            } => {
                f.write_str("until ")?;
                write_separated(f, condition)?;
                write!(f, " {body}")?;
                write_redirs(f, redirs)
            }
            If {
                arms,
                else_body,
                redirs,
            } => {
                for (index, arm) in arms.iter().enumerate() {
                    f.write_str(if index == 0 { "if " } else { " elif " })?;
                    write_separated(f, &arm.condition)?;
                    f.write_str(" then ")?;
                    write_separated(f, &arm.body)?;
                }
                if let Some(else_body) = else_body {
                    f.write_str(" else ")?;
                    write_separated(f, else_body)?;
                }
                f.write_str(" fi")?;
                write_redirs(f, redirs)
            }
            Case {
                subject,
                arms,
                redirs,
            } => {
                write!(f, "case {subject} in")?;
                for arm in arms {
                    write!(f, " {arm}")?;
                }
                f.write_str(" esac")?;
                write_redirs(f, redirs)
            }
            FuncDef { name, body, redirs } => {
                write!(f, "{name}() {body}")?;
                write_redirs(f, redirs)
            }
        }
    }
}
