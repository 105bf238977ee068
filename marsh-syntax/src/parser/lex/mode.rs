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

//! Lexical modes
//!
//! Shell tokenization is context-sensitive: the same characters lex
//! differently depending on the surrounding construct. Each [`LexMode`] names
//! one sub-lexer with its own match table in [`rules`](super::rules). The
//! [lexer](super::Lexer) keeps a stack of modes; the word and command parsers
//! push and pop as they enter and leave quotes, substitutions, and tests.

/// Lexical mode
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LexMode {
    /// Command and argument position, the default
    Outer,
    /// Inside double quotes
    DoubleQuoted,
    /// Inside single quotes; only `'` ends the run
    SingleQuoted,
    /// Inside `$((…))`, `((…))`, and subscript or slice expressions
    Arith,
    /// Right after `${`, expecting a parameter name or a prefix operator
    VsName,
    /// After the parameter name, expecting `}` or a suffix operator
    VsOp,
    /// Argument of a `${x:-…}`-style operator, unquoted context
    VsArgUnquoted,
    /// Like [`VsArgUnquoted`](Self::VsArgUnquoted), but `/` ends the word;
    /// used for the pattern of `${x/pattern/replacement}`
    VsArgUnquotedSlash,
    /// Argument of a `${x:-…}`-style operator inside double quotes; single
    /// quotes are ordinary characters here
    VsArgDouble,
    /// Right-hand side of `=~` inside `[[ ]]`
    BashRegex,
    /// Content line of an expanding here-document
    HereDocBody,
    /// Comment text after `#`
    Comment,
}
