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

//! Shell script source code
//!
//! This module defines the [`Arena`] that owns the lines of a parsed script
//! and the [`LineSpan`] records that tokens use to refer back to them. Spans
//! are appended in lexing order, so concatenating the text of every span
//! reproduces the original source byte for byte; this is what
//! [`Arena::reconstruct`] does and what the pretty-printer relies on.

pub mod pretty;

use std::fmt;
use std::num::NonZeroU64;
use std::ops::Range;
use std::rc::Rc;

/// Handle to a [`SourceLine`] in an [`Arena`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct LineId(usize);

/// Handle to a [`LineSpan`] in an [`Arena`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SpanId(usize);

/// One line of source code
///
/// The text includes the terminating newline character if the line had one.
/// Lines are cheap to clone; the text and path are shared.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceLine {
    /// Text of the line, including the trailing newline if any
    pub text: Rc<str>,
    /// 1-based line number
    pub number: NonZeroU64,
    /// Name of the file or input the line came from
    pub path: Rc<str>,
}

/// Region of one source line
///
/// `col` is a 0-based byte offset into the line text and `length` is a byte
/// count. A span never crosses a line boundary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LineSpan {
    pub line_id: LineId,
    pub col: usize,
    pub length: usize,
}

/// Storage for source lines and the spans that refer to them
///
/// The arena outlives the tokens produced from it. Spans are recorded in the
/// order the lexer consumes tokens; rewinding a parse truncates the record so
/// abandoned productions leave no trace.
#[derive(Clone, Debug, Default)]
pub struct Arena {
    lines: Vec<SourceLine>,
    spans: Vec<LineSpan>,
}

impl Arena {
    #[must_use]
    pub fn new() -> Arena {
        Arena::default()
    }

    /// Creates an arena pre-filled with the lines of the given source text.
    ///
    /// The text is split after every newline character; a trailing line
    /// without a newline is kept as well.
    #[must_use]
    pub fn from_source(path: &str, code: &str) -> Arena {
        let path: Rc<str> = Rc::from(path);
        let mut arena = Arena::new();
        for (index, text) in code.split_inclusive('\n').enumerate() {
            let number = NonZeroU64::new(index as u64 + 1).unwrap();
            arena.lines.push(SourceLine {
                text: Rc::from(text),
                number,
                path: Rc::clone(&path),
            });
        }
        arena
    }

    /// Number of lines in the arena
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the line for the given handle.
    #[must_use]
    pub fn line(&self, id: LineId) -> &SourceLine {
        &self.lines[id.0]
    }

    /// Returns the handle for the line at the given index.
    ///
    /// # Panics
    ///
    /// If the index is out of bounds.
    #[must_use]
    pub fn line_id(&self, index: usize) -> LineId {
        assert!(index < self.lines.len(), "no line at index {index}");
        LineId(index)
    }

    /// Records a span and returns its handle.
    pub fn add_span(&mut self, span: LineSpan) -> SpanId {
        let id = SpanId(self.spans.len());
        self.spans.push(span);
        id
    }

    /// Returns the span for the given handle.
    #[must_use]
    pub fn span(&self, id: SpanId) -> LineSpan {
        self.spans[id.0]
    }

    /// Number of spans recorded so far
    ///
    /// Used together with [`truncate_spans`](Self::truncate_spans) to undo
    /// the spans recorded by an abandoned parse.
    #[must_use]
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Discards all spans recorded after the given watermark.
    pub fn truncate_spans(&mut self, count: usize) {
        self.spans.truncate(count);
    }

    /// Returns the substring of the source a span refers to.
    #[must_use]
    pub fn span_text(&self, id: SpanId) -> &str {
        let span = self.spans[id.0];
        let line = &self.lines[span.line_id.0];
        &line.text[span.col..span.col + span.length]
    }

    /// Concatenates the text of every span in recording order.
    ///
    /// For a successfully parsed script this reproduces the source byte for
    /// byte, because the lexer records a span for every token including
    /// blanks, comments, and line continuations.
    #[must_use]
    pub fn reconstruct(&self) -> String {
        let mut result = String::new();
        for index in 0..self.spans.len() {
            result.push_str(self.span_text(SpanId(index)));
        }
        result
    }

    /// Computes the location of a span for diagnostic purposes.
    #[must_use]
    pub fn location(&self, id: SpanId) -> Location {
        let span = self.spans[id.0];
        let line = self.lines[span.line_id.0].clone();
        Location {
            line,
            range: span.col..span.col + span.length,
        }
    }

    /// Returns the location just past the end of the last line.
    ///
    /// This is where an unexpected end of input is reported.
    #[must_use]
    pub fn end_location(&self) -> Location {
        match self.lines.last() {
            Some(line) => {
                let end = line.text.len();
                Location {
                    line: line.clone(),
                    range: end..end,
                }
            }
            None => Location::dummy(""),
        }
    }
}

/// Position of a source code fragment, used in diagnostics
///
/// A location owns a copy of the line it refers to, so it stays meaningful
/// after the arena is gone. The range is in bytes within the line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Location {
    /// Line containing the fragment
    pub line: SourceLine,
    /// Byte range of the fragment within the line
    pub range: Range<usize>,
}

impl Location {
    /// Creates a location referring to a pseudo line that is not part of any
    /// real source. Convenient in tests.
    #[must_use]
    pub fn dummy<S: Into<Rc<str>>>(text: S) -> Location {
        let text = text.into();
        let range = 0..text.len();
        Location {
            line: SourceLine {
                text,
                number: NonZeroU64::new(1).unwrap(),
                path: Rc::from("<unknown>"),
            },
            range,
        }
    }

    /// 1-based column of the first character of the fragment, in characters
    #[must_use]
    pub fn column(&self) -> NonZeroU64 {
        let chars = self.line.text[..self.range.start.min(self.line.text.len())]
            .chars()
            .count() as u64;
        NonZeroU64::new(chars + 1).unwrap()
    }
}

/// Formats the location as `path:line:col`.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.line.path,
            self.line.number,
            self.column()
        )
    }
}
