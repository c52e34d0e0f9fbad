//! The per-parse interpreter.
//!
//! A [`Session`] owns everything that changes during one parse: the memo
//! table, the furthest-failure mark and the lookahead depth. The grammar it
//! walks is borrowed and never mutated, so any number of sessions can run
//! against the same table at once.
//!
//! Mismatches are `Ok(None)`. `Err` only carries fatal conditions raised by
//! processors and the final failure returned from [`Session::run`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::{Fields, Node, Value};
use crate::diagnostics::translator::NESTING_TOO_DEEP;
use crate::errors::ParseException;
use crate::syntax::{ParseOptions, PositionTracker, Span};

use super::context::ProcessorContext;
use super::pattern::{Pattern, Repeat};
use super::{Grammar, Rule};

/// A successful match. `start` is after any skipped trivia; `end` is the
/// offset just past the last consumed byte.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched {
    pub start: usize,
    pub end: usize,
    pub value: Value,
}

impl Matched {
    fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
            value: Value::Null,
        }
    }

    fn consumed(&self) -> bool {
        self.end > self.start
    }
}

type MemoKey = (usize, usize, bool, bool);

/// Rule invocations allowed on the stack at once. One level of parentheses
/// or call arguments costs about 26 (the expression cascade), so this admits
/// a few hundred levels of source nesting.
pub const MAX_RULE_DEPTH: usize = 8_000;

/// Free stack below which a rule invocation moves to a fresh segment.
const RED_ZONE: usize = 128 * 1024;
const STACK_SEGMENT: usize = 4 * 1024 * 1024;

pub struct Session<'a> {
    pub(crate) grammar: &'a Grammar,
    pub(crate) input: &'a str,
    /// Absolute offset of `input[0]` in the top-level source.
    pub(crate) base: usize,
    pub(crate) tracker: &'a PositionTracker<'a>,
    pub(crate) options: ParseOptions,
    memo: HashMap<MemoKey, Option<Matched>>,
    furthest: usize,
    quiet: usize,
    memo_hits: usize,
    /// Rule invocations currently on the stack, sub-parses included.
    pub(crate) depth: usize,
    max_depth: usize,
}

impl<'a> Session<'a> {
    pub fn new(
        grammar: &'a Grammar,
        input: &'a str,
        base: usize,
        tracker: &'a PositionTracker<'a>,
        options: ParseOptions,
    ) -> Self {
        Self {
            grammar,
            input,
            base,
            tracker,
            options,
            memo: HashMap::new(),
            furthest: 0,
            quiet: 0,
            memo_hits: 0,
            depth: 0,
            max_depth: MAX_RULE_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Matches `start` against the whole input. Unless the rule anchors
    /// itself with [`end`](super::end), trailing input is left unconsumed.
    pub fn run(&mut self, start: &str, trivia: bool) -> Result<Value, ParseException> {
        let Some(id) = self.grammar.rule_id(start) else {
            return Err(self.failure());
        };
        let outcome = self.match_rule(id, 0, trivia)?;
        log::debug!(
            "session `{}` over {} bytes: {} memo entries, {} hits, furthest {}",
            start,
            self.input.len(),
            self.memo.len(),
            self.memo_hits,
            self.furthest
        );
        match outcome {
            Some(matched) => Ok(matched.value),
            None => Err(self.failure()),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Local offset of the furthest recorded failure.
    pub fn furthest(&self) -> usize {
        self.furthest
    }

    fn failure(&self) -> ParseException {
        let at_end = self.furthest >= self.input.len();
        let unexpected = self
            .input
            .get(self.furthest..)
            .and_then(|rest| rest.chars().next());
        ParseException::syntax(self.base + self.furthest, at_end, unexpected)
    }

    fn fail(&mut self, offset: usize) {
        if self.quiet == 0 && offset > self.furthest {
            self.furthest = offset;
        }
    }

    pub(crate) fn skip_trivia(&self, offset: usize) -> usize {
        let Some(trivia) = self.grammar.trivia() else {
            return offset;
        };
        let mut cursor = offset;
        while let Some(len) = self.input.get(cursor..).and_then(|rest| trivia.match_len(rest)) {
            if len == 0 {
                break;
            }
            cursor += len;
        }
        cursor
    }

    /// Attaches the requested instrumentation for a local span.
    pub(crate) fn instrument(&self, node: &mut Node, span: Span) {
        let absolute = span.shifted(self.base);
        if self.options.capture_all_bounds {
            node.bounds = Some(self.tracker.bounds(absolute));
        }
        if self.options.capture_all_offsets {
            node.offset = Some(self.tracker.offset_span(absolute));
        }
    }

    // =====================
    // Rules
    // =====================

    fn match_rule(
        &mut self,
        id: usize,
        offset: usize,
        trivia: bool,
    ) -> Result<Option<Matched>, ParseException> {
        let key = (id, offset, trivia, self.quiet > 0);
        if let Some(cached) = self.memo.get(&key) {
            self.memo_hits += 1;
            return Ok(cached.clone());
        }

        if self.depth >= self.max_depth {
            log::debug!("rule nesting passed {} at offset {}", self.max_depth, offset);
            return Err(
                ParseException::fatal(NESTING_TOO_DEEP, self.base + offset, self.base + offset)
                    .with_placeholder("depth", self.max_depth.to_string()),
            );
        }

        self.depth += 1;
        let outcome = stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || {
            self.evaluate_rule(id, offset, trivia)
        });
        self.depth -= 1;

        let result = outcome?;
        self.memo.insert(key, result.clone());
        Ok(result)
    }

    fn evaluate_rule(
        &mut self,
        id: usize,
        offset: usize,
        trivia: bool,
    ) -> Result<Option<Matched>, ParseException> {
        let grammar = self.grammar;
        let rule = &grammar.rules()[id];
        match self.match_pattern(&rule.pattern, offset, trivia)? {
            Some(matched) => Ok(Some(self.shape(rule, matched)?)),
            None => Ok(None),
        }
    }

    /// Turns a rule's raw match into its final value.
    fn shape(&mut self, rule: &'a Rule, matched: Matched) -> Result<Matched, ParseException> {
        let Matched { start, end, value } = matched;
        let mut value = value;

        if let (Some(fallback), Value::Record(fields)) = (&rule.if_no_match, &mut value) {
            if fields.get(fallback.component).map_or(true, Value::is_empty) {
                let value = fields.take(fallback.capture);
                return Ok(Matched { start, end, value });
            }
        }

        if let Some(picked) = rule.pick {
            if let Value::Record(mut fields) = value {
                value = fields.take(picked);
            }
        }

        value = match value {
            Value::Record(fields) => Node::with_fields(rule.tag(), fields).into(),
            Value::Node(node) => Value::Node(node),
            _ if rule.as_node => Node::new(rule.tag()).into(),
            other => other,
        };

        let span = Span::new(start, end);
        if let Some(processor) = rule.processor {
            let mut context = ProcessorContext::new(self, span);
            value = processor(value, &mut context)?;
        }

        if self.options.instruments() {
            if let Value::Node(node) = &mut value {
                if !node.is_instrumented() {
                    self.instrument(Arc::make_mut(node), span);
                }
            }
        }

        Ok(Matched { start, end, value })
    }

    // =====================
    // Patterns
    // =====================

    pub(crate) fn match_pattern(
        &mut self,
        pattern: &'a Pattern,
        offset: usize,
        trivia: bool,
    ) -> Result<Option<Matched>, ParseException> {
        match pattern {
            Pattern::Terminal(terminal) => {
                let start = self.leading(offset, trivia);
                let found = self
                    .input
                    .get(start..)
                    .and_then(|rest| terminal.match_at(rest));
                Ok(self.leaf(start, found))
            }
            Pattern::Scan(scanner) => {
                let start = self.leading(offset, trivia);
                let found = self.input.get(start..).and_then(scanner.scan);
                Ok(self.leaf(start, found))
            }
            Pattern::End => {
                let start = self.leading(offset, trivia);
                if start >= self.input.len() {
                    return Ok(Some(Matched::empty(start)));
                }
                self.fail(start);
                Ok(None)
            }
            Pattern::Rule(reference) => {
                let id = reference.id.or_else(|| self.grammar.rule_id(reference.name));
                match id {
                    Some(id) => self.match_rule(id, offset, trivia),
                    None => Ok(None),
                }
            }
            Pattern::Sequence(components) => self.match_sequence(components, offset, trivia),
            Pattern::Choice(alternatives) => {
                for alternative in alternatives {
                    if let Some(matched) = self.match_pattern(alternative, offset, trivia)? {
                        return Ok(Some(matched));
                    }
                }
                Ok(None)
            }
            Pattern::Repeat(repeat) => self.match_repeat(repeat, offset, trivia),
            Pattern::Optional(inner) => Ok(Some(
                self.match_pattern(inner, offset, trivia)?
                    .unwrap_or_else(|| Matched::empty(offset)),
            )),
            Pattern::Lookahead { negate, inner } => {
                self.quiet += 1;
                let outcome = self.match_pattern(inner, offset, trivia);
                self.quiet -= 1;
                let matched = outcome?.is_some();
                Ok((matched != *negate).then(|| Matched::empty(offset)))
            }
            Pattern::Trivia { skip, inner } => self.match_pattern(inner, offset, *skip),
            Pattern::Silent(inner) => Ok(self
                .match_pattern(inner, offset, trivia)?
                .map(|matched| Matched {
                    value: Value::Null,
                    ..matched
                })),
        }
    }

    fn leading(&self, offset: usize, trivia: bool) -> usize {
        if trivia {
            self.skip_trivia(offset)
        } else {
            offset
        }
    }

    fn leaf(&mut self, start: usize, found: Option<(usize, Value)>) -> Option<Matched> {
        match found {
            Some((len, value)) => Some(Matched {
                start,
                end: start + len,
                value,
            }),
            None => {
                self.fail(start);
                None
            }
        }
    }

    fn match_sequence(
        &mut self,
        components: &'a [super::Component],
        offset: usize,
        trivia: bool,
    ) -> Result<Option<Matched>, ParseException> {
        let mut cursor = offset;
        let mut start = None;
        let mut fields = Fields::new();
        let mut has_fields = false;

        for component in components {
            let Some(matched) = self.match_pattern(&component.pattern, cursor, trivia)? else {
                return Ok(None);
            };
            if start.is_none() && matched.consumed() {
                start = Some(matched.start);
            }
            cursor = matched.end;

            match component.field {
                Some(name) => {
                    has_fields = true;
                    fields.insert(name, component.capture.apply(matched.value));
                }
                None => {
                    if let Value::Record(inner) = matched.value {
                        has_fields = true;
                        fields.extend(inner);
                    }
                }
            }
        }

        let start = start.unwrap_or(cursor);
        let value = if has_fields {
            Value::Record(fields)
        } else {
            Value::Text(self.input[start..cursor].to_string())
        };
        Ok(Some(Matched {
            start,
            end: cursor,
            value,
        }))
    }

    fn match_repeat(
        &mut self,
        repeat: &'a Repeat,
        offset: usize,
        trivia: bool,
    ) -> Result<Option<Matched>, ParseException> {
        let mut items = Vec::new();
        let mut cursor = offset;
        let mut start = None;
        let mut empty_first = false;

        loop {
            let mut next = cursor;
            if !items.is_empty() {
                if let Some(separator) = &repeat.separator {
                    match self.match_pattern(separator, cursor, trivia)? {
                        Some(matched) => next = matched.end,
                        None => break,
                    }
                }
            }

            let Some(matched) = self.match_pattern(&repeat.item, next, trivia)? else {
                if repeat.trailing && next > cursor {
                    cursor = next;
                }
                break;
            };

            if matched.end == cursor {
                // An empty first item is allowed before a separator: `list(, $b)`.
                if !(items.is_empty() && repeat.separator.is_some()) {
                    break;
                }
                empty_first = true;
            }
            if start.is_none() && matched.consumed() {
                start = Some(matched.start);
            }
            cursor = matched.end;
            items.push(matched.value);
        }

        if empty_first && items.len() == 1 {
            items.clear();
        }
        if items.len() < repeat.min {
            return Ok(None);
        }
        Ok(Some(Matched {
            start: start.unwrap_or(offset),
            end: cursor,
            value: Value::List(items),
        }))
    }
}
