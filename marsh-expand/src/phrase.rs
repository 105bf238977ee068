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

//! Array of fields as an intermediate expansion result
//!
//! A phrase is an array of zero or more fields of [`AttrChar`]s. Most
//! expansions produce a single field, so the representation has compact
//! variants for those cases.
//!
//! Joining phrases is not mere concatenation: when `a$x` expands with `$x`
//! holding several fields, the first of them glues onto `a` and the rest
//! stand alone. The [`append`](Phrase::append) method and the `+` operator
//! implement that edge-gluing rule. A phrase with zero fields disappears
//! when joined, which is how `"$@"` with no positional parameters vanishes
//! next to its neighbors.

use super::attr::AttrChar;
use std::ops::{Add, AddAssign};

/// Array of fields with optimized representation
#[derive(Clone, Debug, Eq)]
pub enum Phrase {
    /// Phrase of one field containing one character
    Char(AttrChar),
    /// Phrase of exactly one field
    Field(Vec<AttrChar>),
    /// Phrase of any number of fields
    Full(Vec<Vec<AttrChar>>),
}

use Phrase::*;

impl Phrase {
    /// Returns a phrase containing no fields.
    #[inline]
    #[must_use]
    pub fn zero_fields() -> Phrase {
        Full(Vec::new())
    }

    /// Returns a phrase containing one empty field.
    #[inline]
    #[must_use]
    pub fn one_empty_field() -> Phrase {
        Field(Vec::new())
    }

    /// Number of fields in the phrase
    #[must_use]
    pub fn field_count(&self) -> usize {
        match self {
            Char(_) | Field(_) => 1,
            Full(fields) => fields.len(),
        }
    }

    /// Converts the phrase to the general form.
    #[must_use]
    pub fn into_fields(self) -> Vec<Vec<AttrChar>> {
        match self {
            Char(c) => vec![vec![c]],
            Field(field) => vec![field],
            Full(fields) => fields,
        }
    }

    /// Applies a function to every character of the phrase.
    pub fn for_each_char_mut<F: FnMut(&mut AttrChar)>(&mut self, mut f: F) {
        match self {
            Char(c) => f(c),
            Field(field) => field.iter_mut().for_each(&mut f),
            Full(fields) => fields
                .iter_mut()
                .for_each(|field| field.iter_mut().for_each(&mut f)),
        }
    }

    /// Joins two phrases, gluing the edge fields.
    ///
    /// The last field of `self` is concatenated with the first field of
    /// `other`; all other fields keep their positions. If either phrase has
    /// zero fields, the result is the other phrase.
    #[must_use]
    pub fn append(self, other: Phrase) -> Phrase {
        match (self, other) {
            (Char(a), Char(b)) => Field(vec![a, b]),
            (Char(a), Field(mut b)) => {
                b.insert(0, a);
                Field(b)
            }
            (Field(mut a), Char(b)) => {
                a.push(b);
                Field(a)
            }
            (Field(mut a), Field(b)) => {
                a.extend(b);
                Field(a)
            }
            (left, right) => {
                let mut left = left.into_fields();
                let right = right.into_fields();
                if left.is_empty() {
                    return Full(right);
                }
                if right.is_empty() {
                    return Full(left);
                }
                let mut right = right.into_iter();
                let first = right.next().unwrap();
                left.last_mut().unwrap().extend(first);
                left.extend(right);
                Full(left)
            }
        }
    }
}

impl PartialEq for Phrase {
    #[must_use]
    fn eq(&self, other: &Phrase) -> bool {
        match (self, other) {
            (Char(a), Char(b)) => a == b,
            (Field(a), Field(b)) => a == b,
            (Full(a), Full(b)) => a == b,
            (Char(c), Field(f)) | (Field(f), Char(c)) => [*c].as_slice() == f.as_slice(),
            (Char(c), Full(v)) | (Full(v), Char(c)) => {
                matches!(v.as_slice(), [f] if [*c].as_slice() == f.as_slice())
            }
            (Field(f), Full(v)) | (Full(v), Field(f)) => {
                matches!(v.as_slice(), [fv] if f == fv)
            }
        }
    }
}

impl Add for Phrase {
    type Output = Phrase;
    #[must_use]
    fn add(self, other: Phrase) -> Phrase {
        self.append(other)
    }
}

impl AddAssign for Phrase {
    fn add_assign(&mut self, other: Phrase) {
        let this = std::mem::replace(self, Phrase::zero_fields());
        *self = this.append(other);
    }
}

#[cfg(test)]
mod tests {
    use super::super::attr::Origin;
    use super::*;

    fn ch(value: char) -> AttrChar {
        AttrChar {
            value,
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: false,
        }
    }

    fn field(s: &str) -> Vec<AttrChar> {
        s.chars().map(ch).collect()
    }

    #[test]
    fn single_field_concatenation() {
        let result = Phrase::Char(ch('a')) + Phrase::Field(field("bc"));
        assert_eq!(result, Phrase::Field(field("abc")));
    }

    #[test]
    fn edge_gluing() {
        let left = Phrase::Field(field("A"));
        let right = Phrase::Full(vec![field("a"), field("b"), field("c")]);
        let result = left + right;
        assert_eq!(
            result,
            Phrase::Full(vec![field("Aa"), field("b"), field("c")])
        );

        let left = Phrase::Full(vec![field("x"), field("y")]);
        let right = Phrase::Field(field("Z"));
        assert_eq!(
            left + right,
            Phrase::Full(vec![field("x"), field("yZ")])
        );
    }

    #[test]
    fn zero_fields_disappear() {
        let zero = Phrase::zero_fields();
        let one = Phrase::Field(field("a"));
        assert_eq!(zero.clone() + one.clone(), one);
        assert_eq!(one.clone() + zero.clone(), one);
        assert_eq!(zero.clone() + zero, Phrase::zero_fields());
    }

    #[test]
    fn empty_field_is_not_zero_fields() {
        let empty = Phrase::one_empty_field();
        assert_eq!(empty.field_count(), 1);
        let result = empty + Phrase::Field(field("x"));
        assert_eq!(result, Phrase::Field(field("x")));
    }

    #[test]
    fn representations_compare_equal() {
        assert_eq!(Phrase::Char(ch('a')), Phrase::Field(field("a")));
        assert_eq!(Phrase::Field(field("a")), Phrase::Full(vec![field("a")]));
    }
}
