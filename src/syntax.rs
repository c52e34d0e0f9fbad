//! Source-location primitives shared by the grammar engine, the AST and the
//! diagnostics layer.
//!
//! Offsets are byte offsets into the UTF-8 source text. Line/column values are
//! derived on demand by [`position::PositionTracker`]; nothing here stores them
//! redundantly.

use serde::{Deserialize, Serialize};

pub mod options;
pub mod position;

pub use options::ParseOptions;
pub use position::{Bounds, OffsetSpan, Position, PositionTracker};

/// Represents a span in the source code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves both ends by `base`, turning a span local to a nested input into
    /// one relative to the enclosing source.
    pub fn shifted(self, base: usize) -> Self {
        Self {
            start: self.start + base,
            end: self.end + base,
        }
    }
}

/// Converts a [`Span`] to a miette `SourceSpan` for labeled diagnostics.
pub fn to_source_span(span: Span) -> miette::SourceSpan {
    miette::SourceSpan::from(span.start..span.end)
}
