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

//! Type definitions for shell options
//!
//! This module defines the [`OptionSet`] struct, a map from [`ShellOption`]
//! to [`State`]. The option set merely stores the state of each option; the
//! components that consult it are responsible for behaving accordingly.

use enumset::{EnumSet, EnumSetType};
use std::fmt::{self, Display, Formatter};
use std::ops::Not;
use strum::{Display as StrumDisplay, EnumString};

/// State of an option: either enabled or disabled.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum State {
    On,
    Off,
}

pub use State::*;

/// Converts a state to a string (`on` or `off`).
impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            On => "on",
            Off => "off",
        };
        s.fmt(f)
    }
}

impl Not for State {
    type Output = Self;
    #[must_use]
    fn not(self) -> Self {
        match self {
            On => Off,
            Off => On,
        }
    }
}

/// Shell option
///
/// Option names parse and print in lower snake case (`null_glob`).
#[derive(Clone, Copy, Debug, EnumSetType, EnumString, Eq, Hash, PartialEq, StrumDisplay)]
#[enumset(no_super_impls)]
#[non_exhaustive]
#[strum(serialize_all = "snake_case")]
pub enum ShellOption {
    /// Enables pathname expansion.
    Glob,
    /// Allows expanding unset parameters to empty strings.
    ///
    /// When off, expanding an unset parameter without a modifier is an
    /// error.
    Unset,
    /// Makes a pattern that matches no pathname expand to no fields instead
    /// of staying literal.
    NullGlob,
    /// Makes a pattern that matches no pathname an error. Also makes
    /// unreadable directories an error during pathname expansion.
    FailGlob,
}

/// Collection of states of all shell options
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct OptionSet {
    enabled: EnumSet<ShellOption>,
}

impl OptionSet {
    /// Returns a set with every option off.
    #[must_use]
    pub fn empty() -> OptionSet {
        OptionSet {
            enabled: EnumSet::empty(),
        }
    }

    /// Returns the state of an option.
    #[must_use]
    pub fn get(&self, option: ShellOption) -> State {
        if self.enabled.contains(option) {
            On
        } else {
            Off
        }
    }

    /// Sets the state of an option.
    pub fn set(&mut self, option: ShellOption, state: State) {
        match state {
            On => self.enabled.insert(option),
            Off => self.enabled.remove(option),
        };
    }
}

/// The default set has `glob` and `unset` on, matching POSIX defaults.
impl Default for OptionSet {
    fn default() -> OptionSet {
        OptionSet {
            enabled: ShellOption::Glob | ShellOption::Unset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = OptionSet::default();
        assert_eq!(options.get(ShellOption::Glob), On);
        assert_eq!(options.get(ShellOption::Unset), On);
        assert_eq!(options.get(ShellOption::NullGlob), Off);
        assert_eq!(options.get(ShellOption::FailGlob), Off);
    }

    #[test]
    fn set_and_get() {
        let mut options = OptionSet::default();
        options.set(ShellOption::Glob, Off);
        assert_eq!(options.get(ShellOption::Glob), Off);
        options.set(ShellOption::NullGlob, On);
        assert_eq!(options.get(ShellOption::NullGlob), On);
    }

    #[test]
    fn option_names() {
        assert_eq!("null_glob".parse(), Ok(ShellOption::NullGlob));
        assert_eq!(ShellOption::FailGlob.to_string(), "fail_glob");
        assert!("no_such_option".parse::<ShellOption>().is_err());
    }

    #[test]
    fn state_negation() {
        assert_eq!(!On, Off);
        assert_eq!(!Off, On);
    }
}
