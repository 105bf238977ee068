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

//! Definition of errors that happen in the parser

use crate::source::Location;
use crate::source::pretty::{Annotation, AnnotationType, Message, MessageBase};
use std::borrow::Cow;
use thiserror::Error;

/// Types of syntax errors
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{}", self.message())]
#[non_exhaustive]
pub enum SyntaxError {
    /// A single quotation lacks a closing `'`.
    UnclosedSingleQuote { opening_location: Location },
    /// A `$'` lacks a closing `'`.
    UnclosedDollarSingleQuote { opening_location: Location },
    /// A double quotation lacks a closing `"`.
    UnclosedDoubleQuote { opening_location: Location },
    /// A parameter expansion lacks a closing `}`.
    UnclosedParam { opening_location: Location },
    /// A parameter expansion lacks a name.
    EmptyParam,
    /// A parameter expansion has an invalid name.
    InvalidParam,
    /// A modifier does not have a valid form in a parameter expansion.
    InvalidModifier,
    /// A parameter expansion combines a length prefix with another modifier.
    MultipleModifier,
    /// A subscript lacks a closing `]`.
    UnclosedSubscript { opening_location: Location },
    /// A command substitution started with `$(` but lacks a closing `)`.
    UnclosedCommandSubstitution { opening_location: Location },
    /// A command substitution started with `` ` `` but lacks a closing
    /// `` ` ``.
    UnclosedBackquote { opening_location: Location },
    /// An arithmetic expansion lacks a closing `))`.
    UnclosedArith { opening_location: Location },
    /// An arithmetic expression could not be parsed.
    InvalidArithExpr,
    /// The left-hand side of an arithmetic assignment is not a variable.
    InvalidArithAssignment,
    /// A command begins with an inappropriate keyword or operator token.
    InvalidCommandToken,
    /// A separator is missing between commands.
    MissingSeparator,
    /// A redirection operator is missing its operand.
    MissingRedirOperand,
    /// A here-document operator is missing its delimiter token.
    MissingHereDocDelimiter,
    /// A here-document operator is missing its corresponding content.
    MissingHereDocContent,
    /// A here-document content is missing its delimiter.
    UnclosedHereDocContent { redir_op_location: Location },
    /// An array assignment started with `=(` but lacks a closing `)`.
    UnclosedArrayValue { opening_location: Location },
    /// An array value appeared outside an assignment.
    InvalidArrayValue,
    /// A `}` appears without a matching `{`.
    UnopenedGrouping,
    /// A grouping is not closed.
    UnclosedGrouping { opening_location: Location },
    /// A grouping contains no commands.
    EmptyGrouping,
    /// A `)` appears without a matching `(`.
    UnopenedSubshell,
    /// A subshell is not closed.
    UnclosedSubshell { opening_location: Location },
    /// A subshell contains no commands.
    EmptySubshell,
    /// A `do` clause is not closed.
    UnclosedDoClause { opening_location: Location },
    /// A `do` clause contains no commands.
    EmptyDoClause,
    /// A loop is missing its `do` clause.
    MissingDo,
    /// A loop or `if` condition contains no commands.
    EmptyCondition,
    /// The variable name is missing in a `for` loop.
    MissingForName,
    /// The variable name is not valid in a `for` loop.
    InvalidForName,
    /// An `if` command is missing `then`.
    MissingThen,
    /// An `if` command is missing `fi`.
    MissingFi,
    /// A `case` command is missing its subject word.
    MissingCaseSubject,
    /// A `case` command is missing `in`.
    MissingIn,
    /// A `case` pattern list is not closed with `)`.
    UnclosedCasePattern,
    /// A `case` command is missing `esac`.
    MissingEsac,
    /// A function name is not a valid identifier.
    InvalidFunctionName,
    /// A function declaration is missing its body.
    MissingFunctionBody,
    /// A `[[ ]]` test lacks a closing `]]`.
    UnclosedDBracket { opening_location: Location },
    /// A `[[ ]]` test contains no expression.
    EmptyDBracket,
}

impl SyntaxError {
    /// Returns a string describing the error.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        use SyntaxError::*;
        match self {
            UnclosedSingleQuote { .. } => "the single quote is not closed",
            UnclosedDollarSingleQuote { .. } => "the dollar single quote is not closed",
            UnclosedDoubleQuote { .. } => "the double quote is not closed",
            UnclosedParam { .. } => "the parameter expansion is not closed",
            EmptyParam => "the parameter name is missing",
            InvalidParam => "the parameter name is invalid",
            InvalidModifier => "the parameter expansion contains a malformed modifier",
            MultipleModifier => "a length prefix cannot be used together with other modifiers",
            UnclosedSubscript { .. } => "the subscript is not closed",
            UnclosedCommandSubstitution { .. } => "the command substitution is not closed",
            UnclosedBackquote { .. } => "the backquote is not closed",
            UnclosedArith { .. } => "the arithmetic expansion is not closed",
            InvalidArithExpr => "the arithmetic expression is malformed",
            InvalidArithAssignment => "the assignment target is not a variable",
            InvalidCommandToken => "a command cannot start with this token",
            MissingSeparator => "a separator is missing between commands",
            MissingRedirOperand => "the redirection operator is missing its operand",
            MissingHereDocDelimiter => "the here-document operator is missing its delimiter",
            MissingHereDocContent => "content of the here-document is missing",
            UnclosedHereDocContent { .. } => {
                "the here-document content is missing its delimiter"
            }
            UnclosedArrayValue { .. } => "the array assignment value is not closed",
            InvalidArrayValue => "an array value is not allowed here",
            UnopenedGrouping => "this `}` does not close a grouping",
            UnclosedGrouping { .. } => "the grouping is not closed",
            EmptyGrouping => "the grouping is missing its content",
            UnopenedSubshell => "this `)` does not close a subshell",
            UnclosedSubshell { .. } => "the subshell is not closed",
            EmptySubshell => "the subshell is missing its content",
            UnclosedDoClause { .. } => "the `do` clause is missing its closing `done`",
            EmptyDoClause => "the `do` clause is missing its content",
            MissingDo => "the loop is missing its `do` clause",
            EmptyCondition => "the condition is missing its content",
            MissingForName => "the variable name is missing in the `for` loop",
            InvalidForName => "the variable name is invalid",
            MissingThen => "the `if` command is missing `then`",
            MissingFi => "the `if` command is missing `fi`",
            MissingCaseSubject => "the subject is missing after `case`",
            MissingIn => "`in` is missing in the `case` command",
            UnclosedCasePattern => "the pattern list is not properly closed by a `)`",
            MissingEsac => "the `case` command is missing `esac`",
            InvalidFunctionName => "the function name is invalid",
            MissingFunctionBody => "the function body is missing",
            UnclosedDBracket { .. } => "the `[[` command is missing its closing `]]`",
            EmptyDBracket => "the `[[` command is missing its expression",
        }
    }

    /// Returns the location of the construct this error is about, if the
    /// error refers to one besides the main location.
    #[must_use]
    pub fn related_location(&self) -> Option<(&Location, &'static str)> {
        use SyntaxError::*;
        match self {
            UnclosedSingleQuote { opening_location }
            | UnclosedDollarSingleQuote { opening_location }
            | UnclosedDoubleQuote { opening_location }
            | UnclosedParam { opening_location }
            | UnclosedSubscript { opening_location }
            | UnclosedCommandSubstitution { opening_location }
            | UnclosedBackquote { opening_location }
            | UnclosedArith { opening_location }
            | UnclosedArrayValue { opening_location }
            | UnclosedGrouping { opening_location }
            | UnclosedSubshell { opening_location }
            | UnclosedDoClause { opening_location }
            | UnclosedDBracket { opening_location } => {
                Some((opening_location, "the construct opened here"))
            }
            UnclosedHereDocContent { redir_op_location } => {
                Some((redir_op_location, "for the here-document started here"))
            }
            _ => None,
        }
    }
}

/// Types of errors that may happen in parsing
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum ErrorCause {
    /// Syntax error
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Explanation of a failure in parsing
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{cause}")]
pub struct Error {
    pub cause: ErrorCause,
    pub location: Location,
}

impl MessageBase for Error {
    fn message_title(&self) -> Cow<'_, str> {
        self.to_string().into()
    }

    fn main_annotation(&self) -> Annotation<'_> {
        Annotation::new(AnnotationType::Error, self.to_string().into(), &self.location)
    }

    fn additional_annotations<'a, T: Extend<Annotation<'a>>>(&'a self, results: &mut T) {
        let ErrorCause::Syntax(error) = &self.cause;
        if let Some((location, label)) = error.related_location() {
            results.extend(std::iter::once(Annotation::new(
                AnnotationType::Info,
                label.into(),
                location,
            )));
        }
    }
}

/// Entire result of parsing
pub type Result<T> = std::result::Result<T, Error>;

/// Renders an error in the `path:line:col: message` form.
impl Error {
    #[must_use]
    pub fn render_plain(&self) -> String {
        Message::from(self).render_plain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_and_render() {
        let error = Error {
            cause: SyntaxError::EmptyParam.into(),
            location: Location::dummy("${}"),
        };
        assert_eq!(error.to_string(), "the parameter name is missing");
        let rendered = error.render_plain();
        assert!(rendered.starts_with("<unknown>:1:1: the parameter name is missing"));
    }
}
