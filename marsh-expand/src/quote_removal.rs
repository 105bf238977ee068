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

//! Quote removal and attribute stripping
//!
//! Quote removal is the final expansion stage: it discards the quotation
//! characters, the ones with the `is_quoting` flag, and keeps everything
//! else. Attribute stripping then reduces the surviving characters to plain
//! text.

use super::attr::AttrChar;

/// Performs quote removal on an iterator of characters.
pub fn skip_quotes<I>(iter: I) -> impl Iterator<Item = AttrChar>
where
    I: IntoIterator<Item = AttrChar>,
{
    iter.into_iter().filter(|c| !c.is_quoting)
}

/// Performs quote removal and attribute stripping, yielding plain text.
#[must_use]
pub fn to_plain_string<I>(iter: I) -> String
where
    I: IntoIterator<Item = AttrChar>,
{
    skip_quotes(iter).map(|c| c.value).collect()
}

#[cfg(test)]
mod tests {
    use super::super::attr::Origin;
    use super::*;

    #[test]
    fn quoting_characters_are_dropped() {
        let quote = AttrChar {
            value: '\'',
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: true,
        };
        let inner = AttrChar {
            value: 'x',
            origin: Origin::Literal,
            is_quoted: true,
            is_quoting: false,
        };
        assert_eq!(to_plain_string([quote, inner, quote]), "x");
    }
}
