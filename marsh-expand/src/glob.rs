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

//! Pathname expansion
//!
//! A field containing an unquoted `*`, `?`, or `[` is split on `/` into
//! components and matched against the directory tree, one component per
//! level. Purely literal components are checked for existence without a
//! directory scan. Results come back sorted.
//!
//! When nothing matches, the policy is decided by the shell options: the
//! default keeps the field literally, `null_glob` drops it, and `fail_glob`
//! makes it an error. Unreadable directories are silently skipped unless
//! `fail_glob` is on.

use super::attr::{AttrChar, AttrField, Origin};
use super::attr_fnmatch::{apply_escapes, to_pattern_chars};
use super::quote_removal;
use super::{Env, Error, ErrorCause, Result};
use marsh_env::option::{Off, On, ShellOption};
use marsh_fnmatch::{Pattern, PatternChar};
use std::path::Path;

/// Tests if the field contains an unquoted pattern character.
fn has_specials(chars: &[AttrChar]) -> bool {
    chars.iter().any(|c| {
        !c.is_quoted
            && !c.is_quoting
            && c.origin != Origin::HardExpansion
            && matches!(c.value, '*' | '?' | '[')
    })
}

/// Performs pathname expansion on one field.
///
/// Returns `None` when the field is not subject to expansion or when no
/// pathname matched and the field is to be kept literally; the caller then
/// finishes with ordinary quote removal.
pub(crate) fn glob_field(field: &AttrField, env: &Env) -> Result<Option<Vec<String>>> {
    if env.options.get(ShellOption::Glob) == Off || !has_specials(&field.0) {
        return Ok(None);
    }

    let mut chars = field.0.clone();
    apply_escapes(&mut chars);

    // Split into path components on unquoted and quoted slashes alike.
    let components: Vec<Vec<PatternChar>> = to_pattern_chars(&chars)
        .collect::<Vec<_>>()
        .split(|c| c.char_value() == '/')
        .map(<[PatternChar]>::to_vec)
        .collect();
    let absolute = matches!(components.first(), Some(c) if c.is_empty());

    let mut candidates: Vec<String> = vec![if absolute {
        "/".to_string()
    } else {
        String::new()
    }];

    for component in &components {
        if component.is_empty() {
            // Leading slash handled above; duplicate and trailing slashes
            // only require the candidates to be directories.
            candidates.retain(|c| !c.is_empty() && Path::new(c).is_dir());
            for candidate in &mut candidates {
                if !candidate.ends_with('/') {
                    candidate.push('/');
                }
            }
            continue;
        }
        let pattern = Pattern::parse(component.iter().copied()).map_err(|error| Error {
            cause: ErrorCause::PatternError(error.to_string()),
            span: None,
        })?;

        let mut next = Vec::new();
        if let Some(literal) = pattern.as_literal() {
            for candidate in &candidates {
                let path = join(candidate, literal);
                if Path::new(&path).symlink_metadata().is_ok() {
                    next.push(path);
                }
            }
        } else {
            for candidate in &candidates {
                let dir = if candidate.is_empty() { "." } else { candidate };
                let entries = match std::fs::read_dir(dir) {
                    Ok(entries) => entries,
                    Err(_) if env.options.get(ShellOption::FailGlob) == On => {
                        return Err(Error {
                            cause: ErrorCause::GlobUnreadable {
                                path: dir.to_string(),
                            },
                            span: None,
                        });
                    }
                    Err(_) => continue,
                };
                for entry in entries.flatten() {
                    let name = entry.file_name();
                    let Some(name) = name.to_str() else { continue };
                    if name.starts_with('.') && !pattern.starts_with_period() {
                        continue;
                    }
                    if pattern.is_match(name) {
                        next.push(join(candidate, name));
                    }
                }
            }
        }
        candidates = next;
        if candidates.is_empty() {
            break;
        }
    }

    if candidates.is_empty() || (candidates.len() == 1 && candidates[0].is_empty()) {
        return if env.options.get(ShellOption::FailGlob) == On {
            Err(Error {
                cause: ErrorCause::NoGlobMatch {
                    pattern: quote_removal::to_plain_string(field.0.iter().copied()),
                },
                span: None,
            })
        } else if env.options.get(ShellOption::NullGlob) == On {
            Ok(Some(Vec::new()))
        } else {
            Ok(None)
        };
    }

    candidates.sort();
    Ok(Some(candidates))
}

/// Joins a candidate path and a component name.
fn join(candidate: &str, name: &str) -> String {
    if candidate.is_empty() {
        name.to_string()
    } else if candidate.ends_with('/') {
        format!("{candidate}{name}")
    } else {
        format!("{candidate}/{name}")
    }
}
