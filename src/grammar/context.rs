//! What a rule processor gets to work with.

use crate::ast::{Node, Value};
use crate::errors::ParseException;
use crate::syntax::{ParseOptions, Span};

use super::session::Session;

pub struct ProcessorContext<'s, 'a> {
    session: &'s mut Session<'a>,
    span: Span,
}

impl<'s, 'a> ProcessorContext<'s, 'a> {
    pub(crate) fn new(session: &'s mut Session<'a>, span: Span) -> Self {
        Self { session, span }
    }

    /// The rule's span, local to the current input.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The rule's span in the top-level source.
    pub fn absolute_span(&self) -> Span {
        self.span.shifted(self.session.base)
    }

    /// The source text the rule matched.
    pub fn text(&self) -> &str {
        self.session
            .input
            .get(self.span.start..self.span.end)
            .unwrap_or_default()
    }

    pub fn options(&self) -> ParseOptions {
        self.session.options
    }

    /// Instruments `node` from the start of its `first` field to the end of
    /// its `last` field.
    pub fn spanning(&self, node: Node, first: &str, last: &str) -> Node {
        let start = node.get(first).and_then(byte_range).map(|(start, _)| start);
        let end = node.get(last).and_then(byte_range).map(|(_, end)| end);
        self.covering(node, start, end)
    }

    /// Instruments `node` over absolute offsets `start..end`. A missing edge
    /// falls back to the rule's own span.
    pub fn covering(&self, mut node: Node, start: Option<usize>, end: Option<usize>) -> Node {
        if !self.session.options.instruments() {
            return node;
        }
        let absolute = self.absolute_span();
        let base = self.session.base;
        let start = start.unwrap_or(absolute.start).saturating_sub(base);
        let end = end.unwrap_or(absolute.end).saturating_sub(base);
        self.session.instrument(&mut node, Span::new(start, end.max(start)));
        node
    }

    /// Runs `rule` over `text` with trivia skipping off. `local_offset` is
    /// where `text` starts within the current input; positions of the
    /// resulting nodes are reported against the top-level source.
    ///
    /// A mismatch is `Ok(None)`; only fatal conditions are errors.
    pub fn reparse(
        &mut self,
        rule: &str,
        text: &str,
        local_offset: usize,
    ) -> Result<Option<Value>, ParseException> {
        let session = &*self.session;
        let mut nested = Session::new(
            session.grammar,
            text,
            session.base + local_offset,
            session.tracker,
            session.options,
        )
        .with_max_depth(session.max_depth());
        nested.depth = session.depth;
        match nested.run(rule, false) {
            Ok(value) => Ok(Some(value)),
            Err(failure) if failure.is_fatal() => Err(failure),
            Err(failure) => {
                log::debug!(
                    "re-parse of `{}` with `{}` failed at offset {}",
                    text,
                    rule,
                    failure.furthest
                );
                Ok(None)
            }
        }
    }

    /// A construct-specific fatal error covering the rule's span.
    pub fn fatal(&self, key: &str) -> ParseException {
        let absolute = self.absolute_span();
        ParseException::fatal(key, absolute.start, absolute.end)
    }
}

/// Absolute byte range of an instrumented node, or of the first through
/// last instrumented items of a list.
pub fn byte_range(value: &Value) -> Option<(usize, usize)> {
    match value {
        Value::Node(node) => node.byte_range(),
        Value::List(items) => {
            let start = items.iter().find_map(byte_range)?.0;
            let end = items.iter().rev().find_map(byte_range)?.1;
            Some((start, end))
        }
        _ => None,
    }
}
