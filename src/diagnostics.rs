//! Turning engine failures into caller-facing errors.
//!
//! The engine only knows offsets. [`ErrorHandler`] decides which kind of
//! error a [`ParseException`] is, resolves its message through the
//! [`Translator`] and pins it to a line of the source.

use std::collections::HashMap;
use std::sync::Arc;

use miette::NamedSource;

use crate::errors::{ParseException, PhpError};
use crate::syntax::{to_source_span, PositionTracker, Span};

pub mod translator;

pub use translator::{MessageCatalog, Translator, DEFAULT_LOCALE};

/// Path reported when the caller did not set one.
pub const DEFAULT_PATH: &str = "(program)";

pub struct ErrorHandler<'p> {
    translator: &'p dyn Translator,
    path: &'p str,
}

impl<'p> ErrorHandler<'p> {
    pub fn new(translator: &'p dyn Translator, path: Option<&'p str>) -> Self {
        Self {
            translator,
            path: path.unwrap_or(DEFAULT_PATH),
        }
    }

    /// Fatal errors are reported at the construct's first line; syntax
    /// errors at the line of the furthest offset reached.
    pub fn handle(&self, exception: &ParseException, source: &str) -> PhpError {
        let tracker = PositionTracker::new(source);
        let src = Arc::new(NamedSource::new(self.path, source.to_string()));

        if let Some(key) = &exception.translation_key {
            let message = self.translator.translate(key, &exception.placeholders);
            let line = tracker.line(exception.start);
            log::debug!("fatal `{}` at line {}", key, line);
            return PhpError::Fatal {
                message,
                path: self.path.to_string(),
                line,
                src,
                span: to_source_span(Span::new(exception.start, exception.furthest.max(exception.start))),
            };
        }

        let (key, placeholders, width) = match exception.unexpected {
            Some(found) if !exception.at_end => (
                translator::SYNTAX_ERROR,
                HashMap::from([("what".to_string(), found.to_string())]),
                found.len_utf8(),
            ),
            _ => (
                translator::UNEXPECTED_END_OF_INPUT,
                HashMap::new(),
                0,
            ),
        };
        let message = self.translator.translate(key, &placeholders);
        let offset = exception.furthest.min(source.len());
        let line = tracker.line(offset);
        log::debug!("syntax error at offset {} (line {})", offset, line);

        PhpError::Parse {
            message,
            path: self.path.to_string(),
            line,
            src,
            span: to_source_span(Span::new(offset, offset + width)),
        }
    }
}
