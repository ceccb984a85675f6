//! Syntax errors and source positions.

use std::fmt;
use std::ops::Range;

/// Maps byte offsets in a source string to 1-based line/column pairs.
///
/// Columns count characters, so a multi-byte character occupies one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    source: String,
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|(_, c)| *c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source: source.to_string(),
            line_starts,
        }
    }

    /// The source text this index was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of lines (a trailing newline starts an empty final line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a `(line, column)` pair, both 1-based.
    ///
    /// Offsets past the end clamp to the end of the source.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line];
        let column = self.source[start..offset].chars().count() + 1;
        (to_u32(line + 1), to_u32(column))
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// A lexing or parsing failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    /// Byte range of the offending input, when known.
    pub span: Option<Range<usize>>,
    /// 1-based `(line, column)` of the span start, when known.
    pub position: Option<(u32, u32)>,
}

impl SyntaxError {
    /// An error with no location.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
            position: None,
        }
    }

    /// An error located at `span` within the indexed source.
    pub fn at(message: impl Into<String>, span: Range<usize>, index: &LineIndex) -> Self {
        let position = index.position(span.start);
        Self {
            message: message.into(),
            span: Some(span),
            position: Some(position),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some((line, column)) => {
                write!(f, "{} at line {}, column {}", self.message, line, column)
            }
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for SyntaxError {}
