//! A memoizing, backtracking PEG engine driven by a rule table.
//!
//! ## Layout
//! - [`terminal`]: anchored regex terminals and their text transforms
//! - [`pattern`]: the `Pattern` union, builders and the `seq!`/`one_of!` macros
//! - [`session`]: the per-parse interpreter (memo table, furthest failure)
//! - [`context`]: what rule processors can see and do
//!
//! A [`Grammar`] is built once and linked: rule references are resolved to
//! indices and every terminal regex is compiled. After that it is read-only
//! and can be shared between threads.

use std::collections::HashMap;
use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::Value;
use crate::errors::ParseException;

pub mod context;
pub mod pattern;
pub mod session;
pub mod terminal;

pub use context::ProcessorContext;
pub use pattern::{
    ahead, cooked, end, field, flag, list, list1, list_field, not, one_or_more, opt, raw, rule,
    scan, silent, zero_or_more, Capture, Component, Pattern, Repeat, RuleRef, ScanFn, Scanner,
};
pub use session::{Matched, Session};
pub use terminal::{kw, lit, re, re_i, EscapeSet, Terminal, Transform};

/// Post-match hook attached to a rule.
pub type Processor = fn(Value, &mut ProcessorContext<'_, '_>) -> Result<Value, ParseException>;

// =====================
// Errors
// =====================

#[derive(Debug, Error, Diagnostic)]
pub enum GrammarError {
    #[error("rule `{0}` is defined more than once")]
    #[diagnostic(code(grammar::duplicate_rule))]
    DuplicateRule(&'static str),

    #[error("rule `{rule}` references unknown rule `{target}`")]
    #[diagnostic(code(grammar::unknown_rule))]
    UnknownRule {
        rule: &'static str,
        target: &'static str,
    },

    #[error("rule `{rule}` has an invalid terminal /{pattern}/")]
    #[diagnostic(code(grammar::invalid_pattern))]
    InvalidPattern {
        rule: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// =====================
// Rules
// =====================

/// When `component` captured nothing, the rule yields `capture` as-is
/// instead of building a node.
#[derive(Debug, Clone, Copy)]
pub struct IfNoMatch {
    pub component: &'static str,
    pub capture: &'static str,
}

#[derive(Clone)]
pub struct Rule {
    pub name: &'static str,
    pub pattern: Pattern,
    /// Node tag to emit instead of the rule name.
    pub capture_as: Option<&'static str>,
    pub processor: Option<Processor>,
    pub if_no_match: Option<IfNoMatch>,
    /// Yield one captured field instead of a node.
    pub pick: Option<&'static str>,
    /// Emit a field-less node whatever the pattern yields.
    pub as_node: bool,
}

impl Rule {
    pub fn new(name: &'static str, pattern: impl Into<Pattern>) -> Self {
        Self {
            name,
            pattern: pattern.into(),
            capture_as: None,
            processor: None,
            if_no_match: None,
            pick: None,
            as_node: false,
        }
    }

    pub fn capture_as(mut self, tag: &'static str) -> Self {
        self.capture_as = Some(tag);
        self
    }

    pub fn process(mut self, processor: Processor) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn if_no_match(mut self, component: &'static str, capture: &'static str) -> Self {
        self.if_no_match = Some(IfNoMatch { component, capture });
        self
    }

    pub fn pick(mut self, field: &'static str) -> Self {
        self.pick = Some(field);
        self
    }

    pub fn as_node(mut self) -> Self {
        self.as_node = true;
        self
    }

    /// The tag of nodes this rule produces.
    pub fn tag(&self) -> &'static str {
        self.capture_as.unwrap_or(self.name)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("capture_as", &self.capture_as)
            .field("processor", &self.processor.is_some())
            .field("if_no_match", &self.if_no_match)
            .field("pick", &self.pick)
            .field("as_node", &self.as_node)
            .finish()
    }
}

// =====================
// Grammar
// =====================

#[derive(Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    index: HashMap<&'static str, usize>,
    trivia: Option<Terminal>,
}

impl Grammar {
    /// Links a rule table. `trivia` is skipped before terminals wherever
    /// trivia skipping is on.
    pub fn new(rules: Vec<Rule>, trivia: Option<Terminal>) -> Result<Self, GrammarError> {
        let mut index = HashMap::with_capacity(rules.len());
        for (id, rule) in rules.iter().enumerate() {
            if index.insert(rule.name, id).is_some() {
                return Err(GrammarError::DuplicateRule(rule.name));
            }
        }

        let mut rules = rules;
        for rule in &mut rules {
            let owner = rule.name;
            rule.pattern
                .for_each_leaf_mut(&mut |leaf| link_leaf(owner, leaf, &index))?;
        }

        let trivia = match trivia {
            Some(mut terminal) => {
                terminal
                    .compile()
                    .map_err(|source| GrammarError::InvalidPattern {
                        rule: "<trivia>",
                        pattern: terminal.source().to_string(),
                        source,
                    })?;
                Some(terminal)
            }
            None => None,
        };

        log::trace!("linked grammar with {} rules", rules.len());
        Ok(Self {
            rules,
            index,
            trivia,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rule_id(name).map(|id| &self.rules[id])
    }

    pub fn rule_id(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn trivia(&self) -> Option<&Terminal> {
        self.trivia.as_ref()
    }
}

fn link_leaf(
    owner: &'static str,
    leaf: pattern::Leaf<'_>,
    index: &HashMap<&'static str, usize>,
) -> Result<(), GrammarError> {
    match leaf {
        pattern::Leaf::Rule(reference) => {
            let id = index
                .get(reference.name)
                .copied()
                .ok_or(GrammarError::UnknownRule {
                    rule: owner,
                    target: reference.name,
                })?;
            reference.id = Some(id);
            Ok(())
        }
        pattern::Leaf::Terminal(terminal) => {
            terminal
                .compile()
                .map_err(|source| GrammarError::InvalidPattern {
                    rule: owner,
                    pattern: terminal.source().to_string(),
                    source,
                })
        }
    }
}
