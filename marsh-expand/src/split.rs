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

//! Field splitting
//!
//! Only unquoted characters with a `SoftExpansion` origin can act as
//! separators; literal and quoted text never splits. Whitespace separators
//! collapse: any run of IFS whitespace, possibly containing one IFS
//! non-whitespace character, is a single field boundary. A non-whitespace
//! separator always terminates a field, producing an empty one when two are
//! adjacent. Leading and trailing whitespace separators are dropped, and a
//! trailing non-whitespace separator does not create a trailing empty
//! field.

use super::attr::{AttrChar, AttrField, Origin};

/// Tests if the character is IFS whitespace.
fn is_ifs_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

/// Splits one field into zero or more fields on the given separators.
///
/// With an empty `ifs` the field is returned unchanged. A field with no
/// characters at all comes back as zero fields either way: it is the
/// residue of an elided empty expansion, not a real field.
#[must_use]
pub fn split(field: AttrField, ifs: &str) -> Vec<AttrField> {
    if field.0.is_empty() {
        return Vec::new();
    }
    if ifs.is_empty() {
        return vec![field];
    }

    let chars = field.0;
    let is_separator = |c: &AttrChar| {
        c.origin == Origin::SoftExpansion
            && !c.is_quoted
            && !c.is_quoting
            && ifs.contains(c.value)
    };

    let mut fields = Vec::new();
    let mut current = Vec::new();
    let mut i = 0;
    let n = chars.len();

    // Leading IFS whitespace is dropped.
    while i < n && is_separator(&chars[i]) && is_ifs_whitespace(chars[i].value) {
        i += 1;
    }

    while i < n {
        if !is_separator(&chars[i]) {
            current.push(chars[i]);
            i += 1;
            continue;
        }

        fields.push(AttrField(std::mem::take(&mut current)));

        if is_ifs_whitespace(chars[i].value) {
            while i < n && is_separator(&chars[i]) && is_ifs_whitespace(chars[i].value) {
                i += 1;
            }
            // One adjacent non-whitespace separator folds into the same
            // boundary, as may whitespace around it.
            if i < n && is_separator(&chars[i]) && !is_ifs_whitespace(chars[i].value) {
                i += 1;
                while i < n && is_separator(&chars[i]) && is_ifs_whitespace(chars[i].value) {
                    i += 1;
                }
            }
        } else {
            i += 1;
            while i < n && is_separator(&chars[i]) && is_ifs_whitespace(chars[i].value) {
                i += 1;
            }
        }
    }

    if !current.is_empty() {
        fields.push(AttrField(current));
    }
    fields
}
