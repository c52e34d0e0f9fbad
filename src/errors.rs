//! Error types.
//!
//! [`ParseException`] is what the engine raises: raw offsets and an optional
//! translation key, no text. [`PhpError`] is what callers see: a resolved
//! message, the source path and a line, plus a `miette` snippet for rendering.
//! The [`ErrorHandler`](crate::diagnostics::ErrorHandler) turns one into the
//! other.

use std::collections::HashMap;
use std::sync::Arc;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// ENGINE FAILURE
// ============================================================================

/// A failed parse as the engine sees it. Offsets are absolute byte offsets
/// into the top-level source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse failed at offset {furthest}")]
pub struct ParseException {
    /// Where the failing construct started.
    pub start: usize,
    /// The furthest offset any failed match reached.
    pub furthest: usize,
    /// The furthest offset is the end of input.
    pub at_end: bool,
    /// The character found at `furthest`.
    pub unexpected: Option<char>,
    /// Set for constructs with a dedicated fatal message.
    pub translation_key: Option<String>,
    pub placeholders: HashMap<String, String>,
}

impl ParseException {
    pub fn syntax(furthest: usize, at_end: bool, unexpected: Option<char>) -> Self {
        Self {
            start: furthest,
            furthest,
            at_end,
            unexpected,
            translation_key: None,
            placeholders: HashMap::new(),
        }
    }

    pub fn fatal(key: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            start,
            furthest: end,
            at_end: false,
            unexpected: None,
            translation_key: Some(key.into()),
            placeholders: HashMap::new(),
        }
    }

    pub fn with_placeholder(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.placeholders.insert(name.into(), value.into());
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.translation_key.is_some()
    }
}

// ============================================================================
// CALLER-FACING ERRORS
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum PhpError {
    /// Ordinary syntax error, reported at the furthest line reached.
    #[error("PHP Parse error: {message} in {path} on line {line}")]
    #[diagnostic(code(php::parse))]
    Parse {
        message: String,
        path: String,
        line: usize,
        #[source_code]
        src: Arc<NamedSource<String>>,
        #[label("{message}")]
        span: SourceSpan,
    },

    /// A recognizable but disallowed construct, reported at its start line.
    #[error("PHP Fatal error: {message} in {path} on line {line}")]
    #[diagnostic(code(php::fatal))]
    Fatal {
        message: String,
        path: String,
        line: usize,
        #[source_code]
        src: Arc<NamedSource<String>>,
        #[label("{message}")]
        span: SourceSpan,
    },
}

impl PhpError {
    pub fn message(&self) -> &str {
        match self {
            PhpError::Parse { message, .. } | PhpError::Fatal { message, .. } => message,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            PhpError::Parse { path, .. } | PhpError::Fatal { path, .. } => path,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            PhpError::Parse { line, .. } | PhpError::Fatal { line, .. } => *line,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            PhpError::Parse { span, .. } | PhpError::Fatal { span, .. } => *span,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, PhpError::Fatal { .. })
    }
}
