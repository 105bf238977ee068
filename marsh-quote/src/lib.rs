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

//! Quoting a string for safe reuse as a single shell word
//!
//! [`quote`] is the dual of quote removal: feeding its result back to the
//! parser yields exactly one word whose expansion is the original string.
//! Strings that need no quoting are returned borrowed.
//!
//! ```
//! use marsh_quote::quote;
//! assert_eq!(quote("plain-word"), "plain-word");
//! assert_eq!(quote("a b"), "'a b'");
//! assert_eq!(quote("it's"), r#"'it'\''s'"#);
//! assert_eq!(quote(""), "''");
//! ```

use std::borrow::Cow;

/// Tests if a character forces the string to be quoted.
fn is_special(c: char) -> bool {
    matches!(
        c,
        ';' | '&' | '|' | '<' | '>' | '(' | ')' | '$' | '`' | '\\' | '"' | '\'' | '*' | '?'
            | '[' | ']' | '#' | '~' | '=' | '%' | '{' | '}' | ','
    ) || c.is_whitespace()
}

/// Quotes the string so it parses as a single word.
///
/// The result is the input itself when no quoting is needed; otherwise the
/// input is wrapped in single quotes, with embedded single quotes spliced
/// out as `'\''`.
#[must_use]
pub fn quote(s: &str) -> Cow<'_, str> {
    if !s.is_empty() && !s.chars().any(is_special) {
        return Cow::Borrowed(s);
    }
    if !s.contains('\'') {
        return Cow::Owned(format!("'{s}'"));
    }
    let mut result = String::with_capacity(s.len() + 2);
    result.push('\'');
    for c in s.chars() {
        if c == '\'' {
            result.push_str("'\\''");
        } else {
            result.push(c);
        }
    }
    result.push('\'');
    Cow::Owned(result)
}
