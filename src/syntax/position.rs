//! Offset → line/column conversion.

use serde::{Deserialize, Serialize};

use super::Span;

/// A resolved source position. `line` and `column` are 1-based; the column
/// counts characters, not bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Start and end positions of a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub start: Position,
    pub end: Position,
}

/// Start position plus byte length of a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetSpan {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl OffsetSpan {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Line-start table for one source text. Built once per parse.
#[derive(Debug, Clone)]
pub struct PositionTracker<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> PositionTracker<'s> {
    pub fn new(source: &'s str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    line_starts.push(i + 2);
                    i += 2;
                    continue;
                }
                b'\r' | b'\n' => line_starts.push(i + 1),
                _ => {}
            }
            i += 1;
        }
        Self {
            source,
            line_starts,
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Resolves a byte offset. Offsets past the end clamp to the end of input.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        let line_start = self.line_starts[line_index];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count())
            + 1;
        Position {
            offset,
            line: line_index + 1,
            column,
        }
    }

    pub fn line(&self, offset: usize) -> usize {
        self.position(offset).line
    }

    pub fn bounds(&self, span: Span) -> Bounds {
        Bounds {
            start: self.position(span.start),
            end: self.position(span.end),
        }
    }

    pub fn offset_span(&self, span: Span) -> OffsetSpan {
        let start = self.position(span.start);
        OffsetSpan {
            offset: start.offset,
            line: start.line,
            column: start.column,
            length: span.len(),
        }
    }
}
