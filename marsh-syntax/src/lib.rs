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

//! Shell language syntax for marsh
//!
//! This crate is the front-end of the marsh shell: a mode-switched lexer, a
//! recursive-descent parser producing a fully typed [syntax tree](syntax),
//! and the [arena](source::Arena) that ties every token back to the source
//! bytes it came from.
//!
//! Two properties are load-bearing for the rest of the shell:
//!
//! - Concatenating the arena's spans in lexing order reproduces the parsed
//!   source byte for byte, so tools can print a script exactly as written.
//! - The `Display` implementations on AST types produce a canonical
//!   single-line form that parses back to an equivalent tree.
//!
//! Word expansion is not defined here; see the `marsh-expand` crate. This
//! crate has no notion of executing anything.
//!
//! ```
//! use marsh_syntax::parser::parse_program;
//! # use marsh_syntax::syntax::Command;
//!
//! let source = "for f in *.c; do cc -c \"$f\"; done\n";
//! let (program, arena) = parse_program("build.sh", source).unwrap();
//! assert_eq!(arena.reconstruct(), source);
//! match &program {
//!     Command::List(items) => assert_eq!(items.len(), 1),
//!     _ => unreachable!(),
//! }
//! ```

pub mod id;
pub mod parser;
pub mod source;
pub mod syntax;

pub use id::Id;
