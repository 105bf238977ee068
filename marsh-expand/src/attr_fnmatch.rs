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

//! Reading `AttrChar` strings as fnmatch patterns
//!
//! Quoted characters become [`PatternChar::Literal`] so they never act as
//! pattern specials. An unquoted backslash quotes the character after it,
//! which [`apply_escapes`] makes explicit in the flags before conversion.

use super::attr::{AttrChar, Origin};
use marsh_fnmatch::PatternChar;

/// Converts unquoted backslashes to quoting characters.
///
/// Sets the `is_quoting` flag of each unquoted backslash and the
/// `is_quoted` flag of the character following it.
pub fn apply_escapes(chars: &mut [AttrChar]) {
    let mut i = 0;
    while i + 1 < chars.len() {
        if chars[i].value == '\\' && !chars[i].is_quoting && !chars[i].is_quoted {
            chars[i].is_quoting = true;
            chars[i + 1].is_quoted = true;
            i += 2;
        } else {
            i += 1;
        }
    }
}

/// Returns an iterator of `PatternChar`s over an `AttrChar` slice.
///
/// Quoting characters are skipped; quoted characters and characters from
/// tilde expansion match literally.
pub fn to_pattern_chars(chars: &[AttrChar]) -> impl Iterator<Item = PatternChar> + Clone + '_ {
    chars.iter().filter_map(|c| {
        if c.is_quoting {
            None
        } else if c.is_quoted || c.origin == Origin::HardExpansion {
            Some(PatternChar::Literal(c.value))
        } else {
            Some(PatternChar::Normal(c.value))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> Vec<AttrChar> {
        s.chars()
            .map(|value| AttrChar {
                value,
                origin: Origin::Literal,
                is_quoted: false,
                is_quoting: false,
            })
            .collect()
    }

    #[test]
    fn backslash_escapes_next_character() {
        let mut chars = plain("a\\*b");
        apply_escapes(&mut chars);
        let pattern: Vec<PatternChar> = to_pattern_chars(&chars).collect();
        assert_eq!(
            pattern,
            [
                PatternChar::Normal('a'),
                PatternChar::Literal('*'),
                PatternChar::Normal('b'),
            ]
        );
    }

    #[test]
    fn double_backslash_is_one_literal_backslash() {
        let mut chars = plain("\\\\*");
        apply_escapes(&mut chars);
        let pattern: Vec<PatternChar> = to_pattern_chars(&chars).collect();
        assert_eq!(
            pattern,
            [PatternChar::Literal('\\'), PatternChar::Normal('*')]
        );
    }
}
