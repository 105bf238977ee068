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

//! Word expansion
//!
//! This crate turns parsed [words](marsh_syntax::syntax::Word) into argument
//! strings, following the POSIX stages in order: tilde expansion and the
//! substitutions first (the [initial] expansion), then field
//! [splitting](split), [pathname expansion](glob), and
//! [quote removal](quote_removal).
//!
//! Expansion never mutates the syntax tree. It reads and writes variables
//! through [`marsh_env::variable::VariableSet`] and delegates command
//! substitution to a caller-supplied [`CommandSubstRunner`], since running
//! commands is the execution layer's business.
//!
//! ```
//! use marsh_expand::{Env, NoCommandSubst, expand_words};
//! use marsh_env::variable::{Scope, Value, VariableSet};
//! use marsh_syntax::syntax::Command;
//!
//! let mut variables = VariableSet::new();
//! variables.assign(Scope::Global, "greeting", Value::scalar("hello world")).unwrap();
//! let mut runner = NoCommandSubst;
//! let mut env = Env::new(&mut variables, &mut runner);
//!
//! let command: Command = "echo $greeting \"$greeting\"".parse().unwrap();
//! let Command::Simple(simple) = command else { unreachable!() };
//! let argv = expand_words(&simple.words, &mut env).unwrap();
//! assert_eq!(argv, ["echo", "hello", "world", "hello world"]);
//! ```

mod attr;
mod attr_fnmatch;
mod glob;
mod initial;
mod phrase;
mod quote_removal;
mod split;

pub use attr::{AttrChar, AttrField, Origin};
pub use initial::param::ValueState;
pub use phrase::Phrase;

use marsh_env::option::OptionSet;
use marsh_env::variable::{AssignError, VariableSet};
use marsh_syntax::source::SpanId;
use marsh_syntax::syntax::{Command, Word};
use std::cell::Cell;
use std::fmt::{self, Display};
use std::rc::Rc;
use thiserror::Error as ThisError;

/// Cooperative cancellation token
///
/// The expansion engine polls the token between its stages; a long-running
/// expansion stops with [`ErrorCause::Interrupted`] soon after
/// [`cancel`](Self::cancel) is called. Clones share one flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Rc<Cell<bool>>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.set(true);
    }

    /// Whether cancellation has been requested
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.flag.get()
    }
}

/// Error reported by a [`CommandSubstRunner`]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("error in command substitution: {message}")]
pub struct CommandSubstError {
    pub message: String,
}

/// Collaborator that runs the command of a command substitution
///
/// The expansion engine itself cannot spawn processes; the execution layer
/// passes an implementation of this trait that runs the command in a
/// subshell and captures its standard output.
pub trait CommandSubstRunner {
    fn run(&mut self, command: &Command) -> std::result::Result<String, CommandSubstError>;
}

/// Runner that fails every command substitution
///
/// Useful where expansion is performed without an execution layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCommandSubst;

impl CommandSubstRunner for NoCommandSubst {
    fn run(&mut self, _command: &Command) -> std::result::Result<String, CommandSubstError> {
        Err(CommandSubstError {
            message: "command substitution is not supported here".to_string(),
        })
    }
}

/// Environment a word expansion runs against
#[derive(Debug)]
pub struct Env<'a> {
    /// Variables and positional parameters
    pub variables: &'a mut VariableSet,
    /// Shell options consulted during expansion
    pub options: OptionSet,
    /// Collaborator for command substitutions
    pub runner: &'a mut dyn CommandSubstRunner,
    /// Cancellation token polled between stages
    pub cancel: CancelToken,
    /// Value of `$?`
    pub last_exit_status: i32,
    /// Value of `$0`
    pub shell_name: String,
    /// Value of `$$`, if the embedder provides one
    pub shell_pid: Option<u32>,
    /// Value of `$!`; unset until an asynchronous command ran
    pub last_async_pid: Option<u32>,
}

impl std::fmt::Debug for dyn CommandSubstRunner + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CommandSubstRunner")
    }
}

impl<'a> Env<'a> {
    /// Creates an environment with default options and no special
    /// parameters set.
    pub fn new(
        variables: &'a mut VariableSet,
        runner: &'a mut dyn CommandSubstRunner,
    ) -> Env<'a> {
        Env {
            variables,
            options: OptionSet::default(),
            runner,
            cancel: CancelToken::new(),
            last_exit_status: 0,
            shell_name: String::new(),
            shell_pid: None,
            last_async_pid: None,
        }
    }

    /// Fails with [`ErrorCause::Interrupted`] if cancellation was requested.
    fn check_cancel(&self) -> Result<()> {
        if self.cancel.is_canceled() {
            Err(Error {
                cause: ErrorCause::Interrupted,
                span: None,
            })
        } else {
            Ok(())
        }
    }

    /// Returns the field separators, defaulting to space, tab, newline.
    fn ifs(&self) -> String {
        self.variables
            .get_scalar("IFS")
            .unwrap_or(" \t\n")
            .to_string()
    }
}

/// Types of errors that may occur in word expansion
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorCause {
    /// `${x:?message}` found the parameter unset or empty.
    EmptyExpansion {
        name: String,
        state: ValueState,
        message: Option<String>,
    },
    /// An unset parameter was expanded while the `unset` option is off.
    UnsetParameter { name: String },
    /// `${x:=value}` tried to assign to a parameter that is not a variable.
    NonassignableParameter { name: String },
    /// A variable assignment failed.
    AssignError(AssignError),
    /// Arithmetic expansion failed.
    Arith(Box<marsh_arith::Error<Error>>),
    /// Command substitution failed.
    CommandSubst(CommandSubstError),
    /// An array literal appeared where a single value is required.
    UnexpectedArrayValue,
    /// A substitution pattern could not be compiled.
    PatternError(String),
    /// A directory could not be read during pathname expansion under
    /// `fail_glob`.
    GlobUnreadable { path: String },
    /// A pattern matched no pathname under `fail_glob`.
    NoGlobMatch { pattern: String },
    /// The cancellation token was triggered.
    Interrupted,
}

impl Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorCause::*;
        match self {
            EmptyExpansion {
                name,
                state,
                message: Some(message),
            } => write!(f, "{name}: {message} ({state})"),
            EmptyExpansion {
                name,
                state,
                message: None,
            } => write!(f, "parameter `{name}` is {state}"),
            UnsetParameter { name } => write!(f, "parameter `{name}` is not set"),
            NonassignableParameter { name } => {
                write!(f, "parameter `{name}` cannot be assigned")
            }
            AssignError(error) => error.fmt(f),
            Arith(error) => write!(f, "error in arithmetic expansion: {error}"),
            CommandSubst(error) => error.fmt(f),
            UnexpectedArrayValue => "an array value is not allowed here".fmt(f),
            PatternError(message) => write!(f, "invalid pattern: {message}"),
            GlobUnreadable { path } => write!(f, "cannot read directory `{path}`"),
            NoGlobMatch { pattern } => write!(f, "no match for pattern `{pattern}`"),
            Interrupted => "expansion was interrupted".fmt(f),
        }
    }
}

/// Explanation of an expansion failure
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    pub cause: ErrorCause,
    /// Span of the word part the failure originates from, when known
    pub span: Option<SpanId>,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cause.fmt(f)
    }
}

impl std::error::Error for Error {}

/// Result of word expansion
pub type Result<T> = std::result::Result<T, Error>;

/// Expands words to argument strings.
///
/// This is the full pipeline: initial expansion, field splitting, pathname
/// expansion, and quote removal, in that order. One word may contribute any
/// number of fields.
pub fn expand_words(words: &[Word], env: &mut Env) -> Result<Vec<String>> {
    let mut fields: Vec<AttrField> = Vec::new();
    for word in words {
        env.check_cancel()?;
        let mut ctx = initial::Ctx {
            env: &mut *env,
            is_quoted: false,
            will_split: true,
        };
        let phrase = initial::expand_parts(word.parts(), &mut ctx)?;
        let ifs = env.ifs();
        for field in phrase.into_fields() {
            // An entirely empty unquoted expansion comes back as zero
            // fields; an empty field produced by a non-whitespace separator
            // or by surviving quotes is kept.
            fields.extend(split::split(AttrField(field), &ifs));
        }
    }

    let mut argv = Vec::new();
    for field in fields {
        env.check_cancel()?;
        match glob::glob_field(&field, env)? {
            Some(paths) => argv.extend(paths),
            None => argv.push(quote_removal::to_plain_string(field.0)),
        }
    }
    Ok(argv)
}

/// Expands one word to exactly one string.
///
/// No field splitting and no pathname expansion happen; this is the
/// expansion used for case subjects, redirection targets, here-document
/// contents, and assignment values. Multiple fields, as from `"$@"`, join
/// on a single space.
pub fn expand_word(word: &Word, env: &mut Env) -> Result<String> {
    env.check_cancel()?;
    let mut ctx = initial::Ctx {
        env: &mut *env,
        is_quoted: false,
        will_split: false,
    };
    let phrase = initial::expand_parts(word.parts(), &mut ctx)?;
    let fields: Vec<String> = phrase
        .into_fields()
        .into_iter()
        .map(quote_removal::to_plain_string)
        .collect();
    Ok(fields.join(" "))
}

/// Expands one word keeping character attributes.
///
/// This is the expansion for pattern words: `case` patterns and the
/// operands of pattern-matching tests. The caller turns the result into a
/// matcher with [`attr_fnmatch`] semantics via [`to_pattern`].
pub fn expand_attr_word(word: &Word, env: &mut Env) -> Result<AttrField> {
    env.check_cancel()?;
    let mut ctx = initial::Ctx {
        env: &mut *env,
        is_quoted: false,
        will_split: false,
    };
    let phrase = initial::expand_parts(word.parts(), &mut ctx)?;
    let mut fields = phrase.into_fields().into_iter();
    let mut result = fields.next().unwrap_or_default();
    for field in fields {
        result.push(AttrChar {
            value: ' ',
            origin: Origin::SoftExpansion,
            is_quoted: false,
            is_quoting: false,
        });
        result.extend(field);
    }
    Ok(AttrField(result))
}

/// Compiles an expanded pattern field into a matcher.
///
/// Unquoted backslashes escape the character after them, and quoted
/// characters never act as pattern specials. This single entry point serves
/// `case` matching and the trim and replace operators alike.
pub fn to_pattern(field: &AttrField) -> Result<marsh_fnmatch::Pattern> {
    let mut chars = field.0.clone();
    attr_fnmatch::apply_escapes(&mut chars);
    marsh_fnmatch::Pattern::parse(attr_fnmatch::to_pattern_chars(&chars)).map_err(|error| Error {
        cause: ErrorCause::PatternError(error.to_string()),
        span: None,
    })
}

/// Renders expanded fields as one shell-quoted line.
///
/// Each field is quoted so the line parses back into the same fields; this
/// is the form execution tracing prints.
#[must_use]
pub fn quote_fields(fields: &[String]) -> String {
    use itertools::Itertools as _;
    fields
        .iter()
        .map(|field| marsh_quote::quote(field))
        .format(" ")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use marsh_env::option::{Off, ShellOption};
    use marsh_env::variable::{Scope, Value, VariableSet};
    use marsh_syntax::syntax::Command;

    fn words_of(code: &str) -> Vec<Word> {
        let command: Command = code.parse().unwrap();
        match command {
            Command::Simple(simple) => simple.words,
            other => panic!("not a simple command: {other:?}"),
        }
    }

    fn try_argv<F>(setup: F, code: &str) -> Result<Vec<String>>
    where
        F: FnOnce(&mut Env),
    {
        let mut variables = VariableSet::new();
        let mut runner = NoCommandSubst;
        let mut env = Env::new(&mut variables, &mut runner);
        setup(&mut env);
        let words = words_of(code);
        expand_words(&words, &mut env)
    }

    fn argv<F>(setup: F, code: &str) -> Vec<String>
    where
        F: FnOnce(&mut Env),
    {
        try_argv(setup, code).unwrap()
    }

    fn set(env: &mut Env, name: &str, value: &str) {
        env.variables
            .assign(Scope::Global, name, Value::scalar(value))
            .unwrap();
    }

    fn set_array(env: &mut Env, name: &str, values: &[&str]) {
        env.variables
            .assign(Scope::Global, name, Value::array(values.iter().copied()))
            .unwrap();
    }

    fn set_positional(env: &mut Env, values: &[&str]) {
        env.variables
            .positional_params_mut()
            .set_fields(values.iter().copied());
    }

    #[test]
    fn default_for_empty_and_unset() {
        let args = argv(|env| set(env, "empty", ""), "argv ${empty:-a} ${Unset:-b}");
        assert_eq!(args, ["argv", "a", "b"]);
    }

    #[test]
    fn default_without_colon_distinguishes_unset() {
        let args = argv(|env| set(env, "empty", ""), "argv ${empty-a} ${Unset-b}");
        // The empty-but-set parameter expands to an empty field and is elided.
        assert_eq!(args, ["argv", "b"]);
    }

    #[test]
    fn single_quotes_are_literal_inside_double_quoted_default() {
        let args = argv(|_| (), "argv \"${Unset:-'b'}\"");
        assert_eq!(args, ["argv", "'b'"]);
    }

    #[test]
    fn defaults_split_unless_quoted() {
        let args = argv(|_| (), "argv ${Unset:-a b c}");
        assert_eq!(args, ["argv", "a", "b", "c"]);

        let args = argv(|_| (), "argv \"${Unset:-a b c}\"");
        assert_eq!(args, ["argv", "a b c"]);
    }

    #[test]
    fn default_with_mixed_quoting_joins_edge_fields() {
        let args = argv(
            |env| set(env, "var", "a b c"),
            "argv ${Unset:-A$var \" $var\"D E F}",
        );
        assert_eq!(args, ["argv", "Aa", "b", "c", " a b cD", "E", "F"]);
    }

    #[test]
    fn trim_with_escaped_quote_in_pattern() {
        let args = argv(|env| set(env, "foo", "'a b c d'"), "argv \"${foo%d\\'}\"");
        assert_eq!(args, ["argv", "'a b c "]);
    }

    #[test]
    fn trim_operators() {
        assert_eq!(argv(|e| set(e, "v", "banana"), "argv ${v%na}"), ["argv", "bana"]);
        assert_eq!(argv(|e| set(e, "v", "banana"), "argv ${v%%n*}"), ["argv", "ba"]);
        assert_eq!(argv(|e| set(e, "v", "banana"), "argv ${v#ba}"), ["argv", "nana"]);
        assert_eq!(argv(|e| set(e, "v", "banana"), "argv ${v##*n}"), ["argv", "a"]);
        // No match leaves the value alone.
        assert_eq!(argv(|e| set(e, "v", "banana"), "argv ${v%xyz}"), ["argv", "banana"]);
    }

    #[test]
    fn replace_operators() {
        assert_eq!(
            argv(|e| set(e, "v", "banana"), "argv ${v/na/xy}"),
            ["argv", "baxyna"]
        );
        assert_eq!(
            argv(|e| set(e, "v", "banana"), "argv ${v//na/xy}"),
            ["argv", "baxyxy"]
        );
        assert_eq!(argv(|e| set(e, "v", "banana"), "argv ${v//an}"), ["argv", "ba"]);
    }

    #[test]
    fn length_and_slice() {
        assert_eq!(argv(|e| set(e, "v", "abcdef"), "argv ${#v}"), ["argv", "6"]);
        assert_eq!(argv(|e| set(e, "v", "abcdef"), "argv ${v:1:3}"), ["argv", "bcd"]);
        assert_eq!(argv(|e| set(e, "v", "abcdef"), "argv ${v:4}"), ["argv", "ef"]);
        assert_eq!(argv(|e| set(e, "v", "abcdef"), "argv ${v: -2}"), ["argv", "ef"]);
    }

    #[test]
    fn assign_default_writes_back() {
        let mut variables = VariableSet::new();
        let mut runner = NoCommandSubst;
        let mut env = Env::new(&mut variables, &mut runner);
        let words = words_of("argv ${u:=x y}");
        let args = expand_words(&words, &mut env).unwrap();
        assert_eq!(args, ["argv", "x", "y"]);
        assert_eq!(variables.get_scalar("u"), Some("x y"));
    }

    #[test]
    fn error_switch_reports_state() {
        let error = try_argv(|_| (), "argv ${u:?is required}").unwrap_err();
        assert_matches!(error.cause, ErrorCause::EmptyExpansion { name, state, message } => {
            assert_eq!(name, "u");
            assert_eq!(state, ValueState::Unset);
            assert_eq!(message.as_deref(), Some("is required"));
        });
    }

    #[test]
    fn alternative_switch() {
        let args = argv(|e| set(e, "v", "x"), "argv ${v:+alt} ${unset_v:+alt}");
        assert_eq!(args, ["argv", "alt"]);

        // A vacant `:+` vanishes even inside double quotes.
        let args = argv(|_| (), "argv \"${unset_v:+alt}\"");
        assert_eq!(args, ["argv"]);
    }

    #[test]
    fn unset_option_makes_unset_an_error() {
        let error = try_argv(
            |env| env.options.set(ShellOption::Unset, Off),
            "argv $nope",
        )
        .unwrap_err();
        assert_matches!(error.cause, ErrorCause::UnsetParameter { name } => {
            assert_eq!(name, "nope");
        });

        // A default modifier still protects the expansion.
        let args = argv(
            |env| env.options.set(ShellOption::Unset, Off),
            "argv ${nope:-ok}",
        );
        assert_eq!(args, ["argv", "ok"]);
    }

    #[test]
    fn positional_parameters_quoted_and_not() {
        let setup = |env: &mut Env| set_positional(env, &["a b", "c"]);
        assert_eq!(argv(setup, "argv \"$@\""), ["argv", "a b", "c"]);
        assert_eq!(
            argv(|e| set_positional(e, &["a b", "c"]), "argv $@"),
            ["argv", "a", "b", "c"]
        );
        assert_eq!(
            argv(|e| set_positional(e, &["a b", "c"]), "argv \"$*\""),
            ["argv", "a b c"]
        );
        assert_eq!(argv(|e| set_positional(e, &["a", "b"]), "argv $#"), ["argv", "2"]);
    }

    #[test]
    fn at_with_no_parameters_vanishes() {
        assert_eq!(argv(|_| (), "argv \"$@\""), ["argv"]);
        // An empty quoted string still produces a field.
        assert_eq!(argv(|_| (), "argv \"\""), ["argv", ""]);
    }

    #[test]
    fn field_joining_around_at() {
        let args = argv(|e| set_positional(e, &["x", "y"]), "argv a\"$@\"b");
        assert_eq!(args, ["argv", "ax", "yb"]);
    }

    #[test]
    fn ifs_splitting_rules() {
        let setup = |env: &mut Env| {
            set(env, "IFS", ":");
            set(env, "x", "a:b::c");
        };
        assert_eq!(argv(setup, "argv $x"), ["argv", "a", "b", "", "c"]);

        // With an empty IFS the expansion stays one field.
        let setup = |env: &mut Env| {
            set(env, "IFS", "");
            set(env, "x", "a b c");
        };
        assert_eq!(argv(setup, "argv $x"), ["argv", "a b c"]);
    }

    #[test]
    fn quoting_protects_from_splitting() {
        let args = argv(|e| set(e, "x", "a b"), "argv \"$x\" '$x' \\$x");
        assert_eq!(args, ["argv", "a b", "$x", "$x"]);
    }

    #[test]
    fn arithmetic_expansion() {
        assert_eq!(argv(|_| (), "argv $((2 + 3 * 4))"), ["argv", "14"]);
        assert_eq!(argv(|_| (), "argv \"$((1 << 4))\""), ["argv", "16"]);
        assert_eq!(argv(|e| set(e, "n", "6"), "argv $((n * 7))"), ["argv", "42"]);
    }

    #[test]
    fn arithmetic_errors_propagate() {
        let error = try_argv(|_| (), "argv $((1 / 0))").unwrap_err();
        assert_matches!(error.cause, ErrorCause::Arith(_));
    }

    #[test]
    fn arrays() {
        let setup = |env: &mut Env| set_array(env, "a", &["x", "y z"]);
        assert_eq!(argv(setup, "argv ${a[0]} \"${a[1]}\""), ["argv", "x", "y z"]);
        assert_eq!(
            argv(|e| set_array(e, "a", &["x", "y z"]), "argv \"${a[@]}\""),
            ["argv", "x", "y z"]
        );
        assert_eq!(
            argv(
                |e| set_array(e, "a", &["x", "y z"]),
                "argv ${#a[@]} \"${a[-1]}\""
            ),
            ["argv", "2", "y z"]
        );

        // Without a subscript an array contributes its first element.
        assert_eq!(
            argv(|e| set_array(e, "a", &["5", "7"]), "argv $((a + 1))"),
            ["argv", "6"]
        );
    }

    #[test]
    fn indirection() {
        let setup = |env: &mut Env| {
            set(env, "ref", "target");
            set(env, "target", "hello");
        };
        assert_eq!(argv(setup, "argv ${!ref}"), ["argv", "hello"]);
    }

    #[test]
    fn special_parameters() {
        let setup = |env: &mut Env| {
            env.last_exit_status = 42;
            env.shell_name = "marsh".to_string();
        };
        assert_eq!(argv(setup, "argv $? $0"), ["argv", "42", "marsh"]);
    }

    #[test]
    fn tilde_expansion() {
        let args = argv(
            |e| set(e, "HOME", "/home/me"),
            "argv ~ ~/src a~b \"~\"",
        );
        assert_eq!(args, ["argv", "/home/me", "/home/me/src", "a~b", "~"]);
    }

    #[test]
    fn command_substitution_uses_the_runner() {
        struct FixedOutput;
        impl CommandSubstRunner for FixedOutput {
            fn run(&mut self, _: &Command) -> std::result::Result<String, CommandSubstError> {
                Ok("one two\n\n".to_string())
            }
        }

        let mut variables = VariableSet::new();
        let mut runner = FixedOutput;
        let mut env = Env::new(&mut variables, &mut runner);
        let words = words_of("argv $(whatever) \"$(whatever)\"");
        let args = expand_words(&words, &mut env).unwrap();
        // Trailing newlines are trimmed; the unquoted result splits.
        assert_eq!(args, ["argv", "one", "two", "one two"]);
    }

    #[test]
    fn command_substitution_failure_is_an_error() {
        let error = try_argv(|_| (), "argv $(oops)").unwrap_err();
        assert_matches!(error.cause, ErrorCause::CommandSubst(_));
    }

    #[test]
    fn cancellation_interrupts_expansion() {
        let error = try_argv(|env| env.cancel.cancel(), "argv a b").unwrap_err();
        assert_matches!(error.cause, ErrorCause::Interrupted);
    }

    #[test]
    fn expand_word_joins_fields() {
        let mut variables = VariableSet::new();
        variables.positional_params_mut().set_fields(["a", "b"]);
        variables
            .assign(Scope::Global, "x", Value::scalar("keep  spaces"))
            .unwrap();
        let mut runner = NoCommandSubst;
        let mut env = Env::new(&mut variables, &mut runner);

        let word: Word = "\"$x\"".parse().unwrap();
        assert_eq!(expand_word(&word, &mut env).unwrap(), "keep  spaces");
        // Unquoted expansions do not split here either.
        let word: Word = "$x".parse().unwrap();
        assert_eq!(expand_word(&word, &mut env).unwrap(), "keep  spaces");
        let word: Word = "\"$@\"".parse().unwrap();
        assert_eq!(expand_word(&word, &mut env).unwrap(), "a b");
    }

    #[test]
    fn case_pattern_matching_via_attr_word() {
        let mut variables = VariableSet::new();
        variables
            .assign(Scope::Global, "pat", Value::scalar("*"))
            .unwrap();
        let mut runner = NoCommandSubst;
        let mut env = Env::new(&mut variables, &mut runner);

        // An unquoted `*` from a literal matches anything...
        let word: Word = "a*".parse().unwrap();
        let pattern = to_pattern(&expand_attr_word(&word, &mut env).unwrap()).unwrap();
        assert!(pattern.is_match("abc"));
        assert!(!pattern.is_match("b"));

        // ... a quoted one only itself ...
        let word: Word = "'a*'".parse().unwrap();
        let pattern = to_pattern(&expand_attr_word(&word, &mut env).unwrap()).unwrap();
        assert!(!pattern.is_match("abc"));
        assert!(pattern.is_match("a*"));

        // ... and one coming from a substitution is a live pattern.
        let word: Word = "$pat".parse().unwrap();
        let pattern = to_pattern(&expand_attr_word(&word, &mut env).unwrap()).unwrap();
        assert!(pattern.is_match("anything"));
    }

    #[test]
    fn quote_fields_round_trips() {
        let fields = vec![
            "plain".to_string(),
            "a b".to_string(),
            "it's".to_string(),
            String::new(),
        ];
        assert_eq!(quote_fields(&fields), "plain 'a b' 'it'\\''s' ''");
    }

    #[test]
    fn determinism_without_substitutions() {
        let first = argv(|e| set(e, "x", "a  b"), "argv $x \"lit\" 'q'");
        let second = argv(|e| set(e, "x", "a  b"), "argv $x \"lit\" 'q'");
        assert_eq!(first, second);
    }
}
