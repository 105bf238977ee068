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

//! Syntax parser for the shell language
//!
//! The parser works in two layers. The [lexer](lex) produces tokens under a
//! stack of lexical modes and assembles words; the functions of this module
//! combine words into [commands](crate::syntax::Command). Parsing is
//! fail-fast: the first error aborts the parse, carrying the location of the
//! offending token. Callers wanting to resume can re-parse from the next
//! line.
//!
//! [`parse_program`] is the all-in-one entry point:
//!
//! ```
//! # use marsh_syntax::parser::parse_program;
//! let (program, arena) = parse_program("demo.sh", "echo hello | wc -l\n").unwrap();
//! assert_eq!(arena.reconstruct(), "echo hello | wc -l\n");
//! assert_eq!(program.to_string(), "echo hello | wc -l");
//! ```

pub mod arith;
mod case;
mod compound_command;
pub mod core;
mod dbracket;
pub mod error;
mod for_loop;
mod from_str;
mod function;
mod grouping;
#[path = "parser/if.rs"]
mod r#if;
pub mod lex;
mod list;
mod pipeline;
mod redir;
mod simple_command;
mod while_loop;

pub use self::core::{CmdToken, Parser, ParserCheckpoint, TokenId};
pub use self::error::{Error, ErrorCause, Result, SyntaxError};
pub use self::lex::{Keyword, LexMode, Lexer};

use crate::source::Arena;
use crate::syntax::Command;

/// Parses a whole program.
///
/// Returns the root command list together with the arena holding the source
/// lines and token spans. The path is only used in diagnostics.
pub fn parse_program(path: &str, code: &str) -> Result<(Command, Arena)> {
    let mut lexer = Lexer::from_source(path, code);
    let mut parser = Parser::new(&mut lexer);
    let program = parser.program()?;
    drop(parser);
    Ok((program, lexer.into_arena()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_byte_for_byte() {
        let sources = [
            "echo hello\n",
            "  a=1   b=2 cmd --x 'y z'  # trailing comment\n",
            "if true; then echo yes; else echo no; fi\n",
            "for x in a b c; do echo \"$x\"; done\n",
            "case $1 in\n  (a|b) echo ab ;;\n  *) echo other ;;\nesac\n",
            "cat <<-EOF\n\tindented body $var\n\tEOF\n",
            "f() { echo \"${x:-'d e'}\" | tr a-z A-Z; }\n",
            "while read line\ndo\n  echo \"$line\" \\\n    done_marker\ndone < input\n",
            "(( x = 1 + 2 )) && [[ $x -gt 2 ]]\n",
            "echo `date` $(( 1 << 4 )) $(echo nested)\n",
        ];
        for source in sources {
            let (_, arena) = parse_program("-", source).unwrap();
            assert_eq!(arena.reconstruct(), source, "round trip of {source:?}");
        }
    }

    #[test]
    fn canonical_form_reparses_to_itself() {
        let sources = [
            "echo a && b || ! c | d",
            "if a; then b; elif c; then d; else e; fi",
            "for x in 1 2; do echo $x; done",
            "case y in (a) x;; (b|c) y;& (*) z;;& esac",
            "{ a; b& }",
            "(a; b) > f 2>&1",
            "x=${v%%*/} y=$((1 + 2)) cmd \"$@\"",
            "[[ -f $x && $y = b* ]]",
            "until false; do echo hi; break; done",
        ];
        for source in sources {
            let (first, _) = parse_program("-", source).unwrap();
            let canonical = first.to_string();
            let (second, _) = parse_program("-", &canonical).unwrap();
            assert_eq!(second.to_string(), canonical, "fixpoint of {source:?}");
        }
    }

    #[test]
    fn parse_errors_have_locations() {
        let error = parse_program("x.sh", "echo 'unterminated\n").unwrap_err();
        let message = error.render_plain();
        assert!(message.starts_with("x.sh:1:"), "got {message:?}");
    }
}
