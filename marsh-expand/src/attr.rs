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

//! Attributed characters
//!
//! The expansion pipeline works on characters that remember where they came
//! from. The origin decides whether a character participates in field
//! splitting and pathname expansion; the quoting flags drive quote removal
//! and pattern building.

/// Origin of a character produced in the initial expansion
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Origin {
    /// The character appeared literally in the original word.
    Literal,
    /// The character comes from tilde expansion.
    ///
    /// Such characters are not split and match literally in patterns.
    HardExpansion,
    /// The character comes from a parameter expansion, command
    /// substitution, or arithmetic expansion.
    ///
    /// Such characters are subject to field splitting where applicable.
    SoftExpansion,
}

/// Character with attributes describing its origin
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AttrChar {
    /// Character value
    pub value: char,
    /// Character origin
    pub origin: Origin,
    /// Whether this character is quoted by another character
    pub is_quoted: bool,
    /// Whether this is a quotation character that quotes others
    ///
    /// A character can be both quoting and quoted: in `"\$"` the backslash
    /// quotes the dollar and is itself quoted by the double quotes.
    pub is_quoting: bool,
}

/// String of attributed characters
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AttrField(pub Vec<AttrChar>);

impl AttrField {
    /// Converts plain text to a field of the given origin.
    #[must_use]
    pub fn from_str(value: &str, origin: Origin, is_quoted: bool) -> AttrField {
        AttrField(
            value
                .chars()
                .map(|value| AttrChar {
                    value,
                    origin,
                    is_quoted,
                    is_quoting: false,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_keeps_flags() {
        let field = AttrField::from_str("ab", Origin::SoftExpansion, true);
        assert_eq!(field.0.len(), 2);
        assert_eq!(field.0[0].value, 'a');
        assert_eq!(field.0[0].origin, Origin::SoftExpansion);
        assert!(field.0[0].is_quoted);
        assert!(!field.0[0].is_quoting);
    }
}
