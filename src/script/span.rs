//! Source positions carried by every syntax node.

use std::fmt;

/// A line/column location in the source (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    /// Byte offset into the source
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Range of source covered by a syntax node, with its original text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
    pub text: String,
}

impl Span {
    /// Build the span covering `start..end` of `source`
    pub fn new(source: &str, start: Position, end: Position) -> Self {
        let text = source
            .get(start.offset..end.offset)
            .unwrap_or_default()
            .to_string();
        Self { start, end, text }
    }

    /// Span for text that did not come from a parsed source
    pub fn synthetic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}
