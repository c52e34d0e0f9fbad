//! Static checks over a rule table.
//!
//! Linking already rejects duplicate names, unknown references and bad
//! regexes; the validators here look for problems a table can link with and
//! still be wrong: rules nothing reaches, repetitions whose item can match
//! nothing, and start rules that do not anchor at end of input. They accept
//! unlinked rule lists too, so a table can be checked before it is built.

pub mod rules;

use crate::grammar::{Grammar, Rule};

// =====================
// Core Data Structures
// =====================

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

// =====================
// Traits
// =====================

pub trait ValidationReporter {
    fn report_error(&mut self, message: impl Into<String>);
    fn report_warning(&mut self, message: impl Into<String>);
    fn report_suggestion(&mut self, message: impl Into<String>);
}

impl ValidationReporter for ValidationResult {
    fn report_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
    fn report_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
    fn report_suggestion(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.is_valid() && self.warnings.is_empty() && self.suggestions.is_empty()
    }

    /// Plain-text report, one section per non-empty category.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_section(&mut out, &self.errors, "GRAMMAR VALIDATION ERRORS");
        render_section(&mut out, &self.warnings, "GRAMMAR WARNINGS");
        render_section(&mut out, &self.suggestions, "GRAMMAR SUGGESTIONS");
        if self.is_clean() {
            out.push_str("Grammar validation passed - no issues found\n");
        }
        out
    }
}

fn render_section(out: &mut String, items: &[String], title: &str) {
    // Guard clause - skip empty sections
    if items.is_empty() {
        return;
    }

    out.push_str(title);
    out.push_str(":\n");
    for item in items {
        out.push_str("  - ");
        out.push_str(item);
        out.push('\n');
    }
    out.push('\n');
}

// =====================
// Public API
// =====================

/// Validates a linked grammar. `roots` are the rules callers may start from.
pub fn validate_grammar(grammar: &Grammar, roots: &[&str]) -> ValidationResult {
    validate_rules(grammar.rules(), roots)
}

/// Validates a rule list, linked or not.
pub fn validate_rules(table: &[Rule], roots: &[&str]) -> ValidationResult {
    use rules::GrammarValidators;

    let mut result = ValidationResult::new();
    GrammarValidators::check_duplicate_rules(table, &mut result);
    GrammarValidators::check_rule_references(table, &mut result);
    GrammarValidators::check_roots(table, roots, &mut result);
    GrammarValidators::check_reachability(table, roots, &mut result);
    GrammarValidators::check_nullable_repetition(table, &mut result);
    GrammarValidators::check_redundant_aliases(table, &mut result);
    result
}
