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

//! Shell variables
//!
//! A [`VariableSet`] is a stack of scopes: a base context holding global
//! variables and zero or more local contexts pushed for function calls.
//! Assignment in the [`Local`](Scope::Local) scope shadows outer variables
//! until the context is popped.
//!
//! Positional parameters live beside the named variables. They are stored
//! behind a shared pointer with copy-on-write semantics, so a subshell can
//! clone the whole set cheaply.

use either::Either;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;
use thiserror::Error;

/// Value of a variable
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// Single string
    Scalar(String),
    /// Indexed array of strings
    Array(Vec<String>),
}

pub use Value::*;

impl Value {
    /// Creates a scalar value.
    #[must_use]
    pub fn scalar<S: Into<String>>(value: S) -> Value {
        Scalar(value.into())
    }

    /// Creates an array value.
    #[must_use]
    pub fn array<I, S>(values: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Array(values.into_iter().map(Into::into).collect())
    }

    /// Iterates over the string values: one item for a scalar, each element
    /// for an array.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            Scalar(value) => Either::Left(std::iter::once(value.as_str())),
            Array(values) => Either::Right(values.iter().map(String::as_str)),
        }
    }

    /// Length of the value: character count for a scalar, element count for
    /// an array.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Scalar(value) => value.chars().count(),
            Array(values) => values.len(),
        }
    }

    /// Whether the value is an empty string or an empty array
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar(value) => value.is_empty(),
            Array(values) => values.is_empty(),
        }
    }
}

/// Variable with its attributes
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Variable {
    /// Value, or `None` for a variable declared without one
    pub value: Option<Value>,
    /// Whether the variable rejects assignment and unsetting
    pub read_only: bool,
}

impl Variable {
    /// Creates a variable with a scalar value.
    #[must_use]
    pub fn new<S: Into<String>>(value: S) -> Variable {
        Variable {
            value: Some(Value::scalar(value)),
            read_only: false,
        }
    }
}

/// Selector of the scope an assignment or unset applies to
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Scope {
    /// The base context
    Global,
    /// The topmost local context, or the base context if none was pushed
    Local,
}

/// Error assigning to a read-only variable
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("read-only variable `{name}` cannot be assigned")]
pub struct AssignError {
    pub name: String,
}

/// Positional parameters (`$1`, `$2`, …)
///
/// The values sit behind a shared pointer; cloning a `PositionalParams` or
/// the whole variable set does not copy the strings until somebody writes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionalParams {
    values: Rc<Vec<String>>,
}

impl PositionalParams {
    /// Creates positional parameters from a list of strings.
    #[must_use]
    pub fn from_fields<I, S>(fields: I) -> PositionalParams
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PositionalParams {
            values: Rc::new(fields.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns the parameter values, `$1` first.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the 1-based parameter, if set.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Replaces the parameter values, detaching from any sharing clone.
    pub fn set_fields<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *Rc::make_mut(&mut self.values) = fields.into_iter().map(Into::into).collect();
    }
}

/// Collection of variables and positional parameters
#[derive(Clone, Debug, Default)]
pub struct VariableSet {
    base: HashMap<String, Variable>,
    local_contexts: Vec<HashMap<String, Variable>>,
    positional: PositionalParams,
}

impl VariableSet {
    #[must_use]
    pub fn new() -> VariableSet {
        VariableSet::default()
    }

    /// Looks up a variable, innermost context first.
    #[must_use]
    pub fn get<N>(&self, name: &N) -> Option<&Variable>
    where
        String: Borrow<N>,
        N: Hash + Eq + ?Sized,
    {
        self.local_contexts
            .iter()
            .rev()
            .find_map(|context| context.get(name))
            .or_else(|| self.base.get(name))
    }

    /// Looks up a variable and returns its scalar value.
    ///
    /// Returns `None` for unset variables, variables without a value, and
    /// arrays.
    #[must_use]
    pub fn get_scalar<N>(&self, name: &N) -> Option<&str>
    where
        String: Borrow<N>,
        N: Hash + Eq + ?Sized,
    {
        match self.get(name)?.value.as_ref()? {
            Scalar(value) => Some(value),
            Array(_) => None,
        }
    }

    /// Assigns a variable in the given scope.
    ///
    /// Returns the previous value visible in that scope, or an error if the
    /// variable is read-only.
    pub fn assign<S: Into<String>>(
        &mut self,
        scope: Scope,
        name: S,
        value: Value,
    ) -> Result<Option<Value>, AssignError> {
        let name = name.into();
        if let Some(current) = self.get(name.as_str()) {
            if current.read_only {
                return Err(AssignError { name });
            }
        }
        let context = match scope {
            Scope::Global => &mut self.base,
            Scope::Local => self.local_contexts.last_mut().unwrap_or(&mut self.base),
        };
        let old = context.insert(
            name,
            Variable {
                value: Some(value),
                read_only: false,
            },
        );
        Ok(old.and_then(|variable| variable.value))
    }

    /// Marks a variable read-only, creating it if necessary.
    pub fn make_read_only<S: Into<String>>(&mut self, name: S) {
        self.base.entry(name.into()).or_default().read_only = true;
    }

    /// Removes a variable from every context.
    ///
    /// Returns an error if the variable is read-only.
    pub fn unset(&mut self, name: &str) -> Result<(), AssignError> {
        if self.get(name).is_some_and(|variable| variable.read_only) {
            return Err(AssignError {
                name: name.to_string(),
            });
        }
        for context in &mut self.local_contexts {
            context.remove(name);
        }
        self.base.remove(name);
        Ok(())
    }

    /// Pushes a fresh local variable context.
    pub fn push_context(&mut self) {
        self.local_contexts.push(HashMap::new());
    }

    /// Pops the topmost local variable context.
    ///
    /// # Panics
    ///
    /// If no local context has been pushed.
    pub fn pop_context(&mut self) {
        self.local_contexts
            .pop()
            .expect("cannot pop the base variable context");
    }

    /// Returns the positional parameters.
    #[must_use]
    pub fn positional_params(&self) -> &PositionalParams {
        &self.positional
    }

    /// Returns the positional parameters for modification.
    pub fn positional_params_mut(&mut self) -> &mut PositionalParams {
        &mut self.positional
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn assign_and_get() {
        let mut variables = VariableSet::new();
        assert!(variables.get("x").is_none());
        variables
            .assign(Scope::Global, "x", Value::scalar("1"))
            .unwrap();
        assert_eq!(variables.get_scalar("x"), Some("1"));

        let old = variables
            .assign(Scope::Global, "x", Value::scalar("2"))
            .unwrap();
        assert_eq!(old, Some(Value::scalar("1")));
    }

    #[test]
    fn local_context_shadows_and_unwinds() {
        let mut variables = VariableSet::new();
        variables
            .assign(Scope::Global, "x", Value::scalar("outer"))
            .unwrap();
        variables.push_context();
        variables
            .assign(Scope::Local, "x", Value::scalar("inner"))
            .unwrap();
        assert_eq!(variables.get_scalar("x"), Some("inner"));
        variables.pop_context();
        assert_eq!(variables.get_scalar("x"), Some("outer"));
    }

    #[test]
    fn read_only_rejects_assignment() {
        let mut variables = VariableSet::new();
        variables
            .assign(Scope::Global, "x", Value::scalar("1"))
            .unwrap();
        variables.make_read_only("x");
        assert_matches!(
            variables.assign(Scope::Global, "x", Value::scalar("2")),
            Err(AssignError { name }) if name == "x"
        );
        assert!(variables.unset("x").is_err());
    }

    #[test]
    fn arrays() {
        let mut variables = VariableSet::new();
        variables
            .assign(Scope::Global, "a", Value::array(["x", "y"]))
            .unwrap();
        assert_eq!(variables.get_scalar("a"), None);
        let value = variables.get("a").unwrap().value.as_ref().unwrap();
        assert_eq!(value.iter().collect::<Vec<_>>(), ["x", "y"]);
        assert_eq!(value.len(), 2);
    }

    #[test]
    fn positional_params_copy_on_write() {
        let mut variables = VariableSet::new();
        variables
            .positional_params_mut()
            .set_fields(["a", "b", "c"]);
        let snapshot = variables.positional_params().clone();

        variables.positional_params_mut().set_fields(["z"]);
        assert_eq!(snapshot.values(), ["a", "b", "c"]);
        assert_eq!(variables.positional_params().values(), ["z"]);
        assert_eq!(snapshot.get(2), Some("b"));
        assert_eq!(snapshot.get(0), None);
        assert_eq!(snapshot.get(4), None);
    }
}
