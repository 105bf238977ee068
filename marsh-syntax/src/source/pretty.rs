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

//! Pretty-printing diagnostic messages containing references to source code
//!
//! Errors produced by the parser and the expansion engine convert into a
//! [`Message`], an intermediate structure that can be rendered in two ways:
//!
//! - [`Message::render_plain`] produces the classic `path:line:col: message`
//!   form followed by the offending line and a caret underline.
//! - With the `annotate-snippets` feature enabled, a `Message` converts into
//!   an `annotate_snippets::Group` for rich terminal reports.
//!
//! Implement [`MessageBase`] for your error type to get the `From<&E>`
//! conversion to `Message` for free.

use super::Location;
use std::borrow::Cow;

/// Type of annotation
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnnotationType {
    Error,
    Warning,
    Info,
    Note,
    Help,
}

/// Source code fragment annotated with a label
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Annotation<'a> {
    /// Type of annotation
    pub r#type: AnnotationType,
    /// Label explaining the annotated fragment
    pub label: Cow<'a, str>,
    /// Position of the annotated fragment
    pub location: Location,
}

impl<'a> Annotation<'a> {
    #[must_use]
    pub fn new(r#type: AnnotationType, label: Cow<'a, str>, location: &Location) -> Self {
        Annotation {
            r#type,
            label,
            location: location.clone(),
        }
    }
}

/// Entire diagnostic message
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message<'a> {
    /// Type of the message, used for the primary annotation
    pub r#type: AnnotationType,
    /// Summary of the diagnosed problem
    pub title: Cow<'a, str>,
    /// References to source code fragments
    pub annotations: Vec<Annotation<'a>>,
}

impl Message<'_> {
    /// Renders the message in the `path:line:col: message` form.
    ///
    /// The first annotation's location determines the position. The offending
    /// line is printed below, with a caret underline marking the fragment.
    #[must_use]
    pub fn render_plain(&self) -> String {
        use std::fmt::Write as _;

        let mut result = String::new();
        match self.annotations.first() {
            Some(annotation) => {
                let location = &annotation.location;
                writeln!(result, "{}: {}", location, self.title).unwrap();
                let line = location.line.text.trim_end_matches('\n');
                writeln!(result, "  {line}").unwrap();
                let pad = location.line.text[..location.range.start.min(line.len())]
                    .chars()
                    .count();
                let marked = location.line.text
                    [location.range.start.min(line.len())..location.range.end.min(line.len())]
                    .chars()
                    .count();
                result.push_str("  ");
                result.extend(std::iter::repeat_n(' ', pad));
                result.push('^');
                if marked > 1 {
                    result.extend(std::iter::repeat_n('~', marked - 1));
                }
                result.push('\n');
            }
            None => writeln!(result, "{}", self.title).unwrap(),
        }
        result
    }
}

/// Helper for constructing a [`Message`] from an error type
///
/// Error types implement this trait to describe their title and main
/// annotation; the blanket `From<&T> for Message` conversion does the rest.
pub trait MessageBase {
    /// Returns the message type, [`Error`](AnnotationType::Error) by default.
    fn message_type(&self) -> AnnotationType {
        AnnotationType::Error
    }

    /// Returns the message title.
    fn message_title(&self) -> Cow<'_, str>;

    /// Returns the main annotation.
    fn main_annotation(&self) -> Annotation<'_>;

    /// Appends additional annotations, none by default.
    fn additional_annotations<'a, T: Extend<Annotation<'a>>>(&'a self, _results: &mut T) {}
}

impl<'a, T: MessageBase> From<&'a T> for Message<'a> {
    fn from(base: &'a T) -> Self {
        let mut annotations = vec![base.main_annotation()];
        base.additional_annotations(&mut annotations);
        Message {
            r#type: base.message_type(),
            title: base.message_title(),
            annotations,
        }
    }
}

#[cfg(feature = "annotate-snippets")]
mod annotate_snippets_support {
    use super::*;

    /// Converts `AnnotationType` into `annotate_snippets::Level`.
    ///
    /// This implementation is only available when the `marsh_syntax` crate is
    /// built with the `annotate-snippets` feature enabled.
    impl From<AnnotationType> for annotate_snippets::Level<'_> {
        fn from(r#type: AnnotationType) -> Self {
            use AnnotationType::*;
            match r#type {
                Error => Self::ERROR,
                Warning => Self::WARNING,
                Info => Self::INFO,
                Note => Self::NOTE,
                Help => Self::HELP,
            }
        }
    }

    /// Converts `AnnotationType` into `annotate_snippets::AnnotationKind`.
    impl From<AnnotationType> for annotate_snippets::AnnotationKind {
        fn from(r#type: AnnotationType) -> Self {
            use AnnotationType::*;
            match r#type {
                Error | Warning => Self::Primary,
                Info | Note | Help => Self::Context,
            }
        }
    }

    /// Converts `Message` into `annotate_snippets::Group`.
    ///
    /// Each annotation becomes a snippet showing the line it refers to.
    impl<'a> From<&'a Message<'a>> for annotate_snippets::Group<'a> {
        fn from(message: &'a Message<'a>) -> Self {
            annotate_snippets::Level::from(message.r#type)
                .primary_title(&*message.title)
                .elements(message.annotations.iter().map(|annotation| {
                    let location = &annotation.location;
                    let kind = annotate_snippets::AnnotationKind::from(annotation.r#type);
                    annotate_snippets::Snippet::source(&*location.line.text)
                        .line_start(location.line.number.get().try_into().unwrap_or(usize::MAX))
                        .path(&*location.line.path)
                        .annotations(vec![
                            kind.span(location.range.clone()).label(&annotation.label),
                        ])
                }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_plain_points_at_fragment() {
        let mut location = Location::dummy("echo $();");
        location.range = 5..8;
        let message = Message {
            r#type: AnnotationType::Error,
            title: "unexpected token".into(),
            annotations: vec![Annotation::new(
                AnnotationType::Error,
                "here".into(),
                &location,
            )],
        };
        let rendered = message.render_plain();
        assert_eq!(
            rendered,
            "<unknown>:1:6: unexpected token\n  echo $();\n       ^~~\n"
        );
    }
}
