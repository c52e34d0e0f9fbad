//! The grammar as data.
//!
//! A [`Pattern`] is a tagged union interpreted by the session. Rules refer to
//! each other by name; the names are resolved to table indices when the
//! [`Grammar`](super::Grammar) is linked, so a table can be written in any
//! order and mutual recursion between precedence levels needs no forward
//! declarations.

use std::fmt;

use crate::ast::Value;

use super::terminal::Terminal;

// =====================
// Core Data Structures
// =====================

/// Hand-written matcher for constructs a regex cannot express (delimiter
/// searches, heredoc closing lines). Returns the consumed length and value.
pub type ScanFn = fn(&str) -> Option<(usize, Value)>;

#[derive(Clone, Copy)]
pub struct Scanner {
    pub name: &'static str,
    pub scan: ScanFn,
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

/// A by-name rule reference. `id` is filled in by the link pass.
#[derive(Debug, Clone)]
pub struct RuleRef {
    pub name: &'static str,
    pub id: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Repeat {
    pub item: Pattern,
    pub separator: Option<Pattern>,
    pub min: usize,
    /// Consume a separator that is not followed by another item.
    pub trailing: bool,
}

#[derive(Debug, Clone)]
pub enum Pattern {
    Terminal(Terminal),
    Rule(RuleRef),
    Sequence(Vec<Component>),
    /// Ordered choice: the first alternative that matches wins.
    Choice(Vec<Pattern>),
    Repeat(Box<Repeat>),
    Optional(Box<Pattern>),
    /// Zero-width assertion. Failures beneath it are not recorded.
    Lookahead { negate: bool, inner: Box<Pattern> },
    /// Turns trivia skipping on or off for everything beneath.
    Trivia { skip: bool, inner: Box<Pattern> },
    /// Matches like `inner` but yields null.
    Silent(Box<Pattern>),
    Scan(Scanner),
    /// End of input.
    End,
}

/// How a sequence component stores its match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// The matched value, or null when an optional part was absent.
    Value,
    /// `true` when the part matched something, `false` otherwise.
    Flag,
    /// Always a list; an absent part becomes an empty list.
    List,
}

impl Capture {
    pub(crate) fn apply(self, value: Value) -> Value {
        match self {
            Capture::Value => value,
            Capture::Flag => Value::Bool(!value.is_null()),
            Capture::List => Value::List(value.into_list()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Component {
    pub field: Option<&'static str>,
    pub capture: Capture,
    pub pattern: Pattern,
}

// =====================
// Conversions
// =====================

impl From<Terminal> for Pattern {
    fn from(terminal: Terminal) -> Self {
        Pattern::Terminal(terminal)
    }
}

/// A bare string is a rule reference.
impl From<&'static str> for Pattern {
    fn from(name: &'static str) -> Self {
        rule(name)
    }
}

impl From<Component> for Pattern {
    fn from(component: Component) -> Self {
        Pattern::Sequence(vec![component])
    }
}

impl From<Pattern> for Component {
    fn from(pattern: Pattern) -> Self {
        Component {
            field: None,
            capture: Capture::Value,
            pattern,
        }
    }
}

impl From<Terminal> for Component {
    fn from(terminal: Terminal) -> Self {
        Pattern::from(terminal).into()
    }
}

impl From<&'static str> for Component {
    fn from(name: &'static str) -> Self {
        rule(name).into()
    }
}

impl Pattern {
    /// Marks a separated repetition as accepting a dangling separator.
    pub fn trailing(mut self) -> Self {
        if let Pattern::Repeat(repeat) = &mut self {
            repeat.trailing = true;
        }
        self
    }

    /// Calls `visit` on every rule reference beneath this pattern.
    pub fn for_each_reference(&self, visit: &mut dyn FnMut(&RuleRef)) {
        match self {
            Pattern::Rule(reference) => visit(reference),
            Pattern::Sequence(components) => components
                .iter()
                .for_each(|c| c.pattern.for_each_reference(visit)),
            Pattern::Choice(alternatives) => alternatives
                .iter()
                .for_each(|p| p.for_each_reference(visit)),
            Pattern::Repeat(repeat) => {
                repeat.item.for_each_reference(visit);
                if let Some(separator) = &repeat.separator {
                    separator.for_each_reference(visit);
                }
            }
            Pattern::Optional(inner)
            | Pattern::Silent(inner)
            | Pattern::Lookahead { inner, .. }
            | Pattern::Trivia { inner, .. } => inner.for_each_reference(visit),
            Pattern::Terminal(_) | Pattern::Scan(_) | Pattern::End => {}
        }
    }

    /// Calls `visit` on every mutable rule reference and terminal; used by
    /// the link pass.
    pub(crate) fn for_each_leaf_mut(
        &mut self,
        visit: &mut dyn FnMut(Leaf<'_>) -> Result<(), super::GrammarError>,
    ) -> Result<(), super::GrammarError> {
        match self {
            Pattern::Terminal(terminal) => visit(Leaf::Terminal(terminal)),
            Pattern::Rule(reference) => visit(Leaf::Rule(reference)),
            Pattern::Sequence(components) => components
                .iter_mut()
                .try_for_each(|c| c.pattern.for_each_leaf_mut(visit)),
            Pattern::Choice(alternatives) => alternatives
                .iter_mut()
                .try_for_each(|p| p.for_each_leaf_mut(visit)),
            Pattern::Repeat(repeat) => {
                repeat.item.for_each_leaf_mut(visit)?;
                match &mut repeat.separator {
                    Some(separator) => separator.for_each_leaf_mut(visit),
                    None => Ok(()),
                }
            }
            Pattern::Optional(inner)
            | Pattern::Silent(inner)
            | Pattern::Lookahead { inner, .. }
            | Pattern::Trivia { inner, .. } => inner.for_each_leaf_mut(visit),
            Pattern::Scan(_) | Pattern::End => Ok(()),
        }
    }
}

pub(crate) enum Leaf<'p> {
    Terminal(&'p mut Terminal),
    Rule(&'p mut RuleRef),
}

// =====================
// Builders
// =====================

pub fn rule(name: &'static str) -> Pattern {
    Pattern::Rule(RuleRef { name, id: None })
}

pub fn opt(pattern: impl Into<Pattern>) -> Pattern {
    Pattern::Optional(Box::new(pattern.into()))
}

fn repeat(item: Pattern, separator: Option<Pattern>, min: usize) -> Pattern {
    Pattern::Repeat(Box::new(Repeat {
        item,
        separator,
        min,
        trailing: false,
    }))
}

pub fn zero_or_more(item: impl Into<Pattern>) -> Pattern {
    repeat(item.into(), None, 0)
}

pub fn one_or_more(item: impl Into<Pattern>) -> Pattern {
    repeat(item.into(), None, 1)
}

/// Zero or more `item`s separated by `separator`.
pub fn list(item: impl Into<Pattern>, separator: impl Into<Pattern>) -> Pattern {
    repeat(item.into(), Some(separator.into()), 0)
}

/// One or more `item`s separated by `separator`.
pub fn list1(item: impl Into<Pattern>, separator: impl Into<Pattern>) -> Pattern {
    repeat(item.into(), Some(separator.into()), 1)
}

pub fn ahead(pattern: impl Into<Pattern>) -> Pattern {
    Pattern::Lookahead {
        negate: false,
        inner: Box::new(pattern.into()),
    }
}

pub fn not(pattern: impl Into<Pattern>) -> Pattern {
    Pattern::Lookahead {
        negate: true,
        inner: Box::new(pattern.into()),
    }
}

/// Whitespace and comments are significant beneath this pattern.
pub fn raw(pattern: impl Into<Pattern>) -> Pattern {
    Pattern::Trivia {
        skip: false,
        inner: Box::new(pattern.into()),
    }
}

/// Re-enables trivia skipping inside a [`raw`] region.
pub fn cooked(pattern: impl Into<Pattern>) -> Pattern {
    Pattern::Trivia {
        skip: true,
        inner: Box::new(pattern.into()),
    }
}

pub fn silent(pattern: impl Into<Pattern>) -> Pattern {
    Pattern::Silent(Box::new(pattern.into()))
}

pub fn scan(name: &'static str, scan: ScanFn) -> Pattern {
    Pattern::Scan(Scanner { name, scan })
}

pub fn end() -> Pattern {
    Pattern::End
}

/// Stores the match under `name`.
pub fn field(name: &'static str, pattern: impl Into<Pattern>) -> Component {
    Component {
        field: Some(name),
        capture: Capture::Value,
        pattern: pattern.into(),
    }
}

/// Stores whether the pattern matched anything under `name`.
pub fn flag(name: &'static str, pattern: impl Into<Pattern>) -> Component {
    Component {
        field: Some(name),
        capture: Capture::Flag,
        pattern: pattern.into(),
    }
}

/// Stores the match under `name` as a list.
pub fn list_field(name: &'static str, pattern: impl Into<Pattern>) -> Component {
    Component {
        field: Some(name),
        capture: Capture::List,
        pattern: pattern.into(),
    }
}

/// Builds a [`Pattern::Sequence`] from anything convertible to a component.
#[macro_export]
macro_rules! seq {
    ($($component:expr),+ $(,)?) => {
        $crate::grammar::Pattern::Sequence(vec![
            $($crate::grammar::Component::from($component)),+
        ])
    };
}

/// Builds a [`Pattern::Choice`] from anything convertible to a pattern.
#[macro_export]
macro_rules! one_of {
    ($($alternative:expr),+ $(,)?) => {
        $crate::grammar::Pattern::Choice(vec![
            $($crate::grammar::Pattern::from($alternative)),+
        ])
    };
}
