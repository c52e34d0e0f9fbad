use std::collections::{HashMap, HashSet};

use crate::grammar::{Pattern, Rule};
use crate::validation::{ValidationReporter, ValidationResult};

/// Validates a rule table for structural issues.
/// Each validator focuses on a single concern.
pub struct GrammarValidators;

impl GrammarValidators {
    /// Checks that every rule name is defined once.
    pub fn check_duplicate_rules(table: &[Rule], result: &mut ValidationResult) {
        let mut seen = HashSet::new();
        for rule in table {
            if !seen.insert(rule.name) {
                result.report_error(format!("Rule '{}' is defined more than once", rule.name));
            }
        }
    }

    /// Checks for references to rules that do not exist.
    pub fn check_rule_references(table: &[Rule], result: &mut ValidationResult) {
        let names: HashSet<&str> = table.iter().map(|rule| rule.name).collect();

        for rule in table {
            let mut missing = Vec::new();
            rule.pattern.for_each_reference(&mut |reference| {
                if !names.contains(reference.name) {
                    missing.push(reference.name);
                }
            });
            for target in missing {
                result.report_error(format!(
                    "Rule '{}' references undefined rule '{}'",
                    rule.name, target
                ));
            }
        }
    }

    /// Checks that every root exists and that the first root consumes all
    /// input.
    pub fn check_roots(table: &[Rule], roots: &[&str], result: &mut ValidationResult) {
        for &root in roots {
            let Some(rule) = table.iter().find(|rule| rule.name == root) else {
                result.report_error(format!("Missing root rule: '{}'", root));
                continue;
            };
            if !ends_at_end_of_input(&rule.pattern) {
                result.report_warning(format!(
                    "Root rule '{}' should end with `end()` so trailing input is rejected",
                    root
                ));
            }
        }
    }

    /// Reports rules no root can reach.
    pub fn check_reachability(table: &[Rule], roots: &[&str], result: &mut ValidationResult) {
        // Guard clause - nothing to reach from
        if roots.is_empty() {
            return;
        }

        let by_name: HashMap<&str, &Rule> = table.iter().map(|rule| (rule.name, rule)).collect();
        let mut reached: HashSet<&str> = HashSet::new();
        let mut pending: Vec<&str> = roots.to_vec();

        while let Some(name) = pending.pop() {
            if !reached.insert(name) {
                continue;
            }
            if let Some(rule) = by_name.get(name) {
                rule.pattern
                    .for_each_reference(&mut |reference| pending.push(reference.name));
            }
        }

        for rule in table {
            if !reached.contains(rule.name) {
                result.report_warning(format!("Rule '{}' is unreachable", rule.name));
            }
        }
    }

    /// Repetitions without a separator whose item can succeed without
    /// consuming input stop after one empty round; that is almost always a
    /// grammar bug.
    pub fn check_nullable_repetition(table: &[Rule], result: &mut ValidationResult) {
        let nullable = nullable_rules(table);

        for rule in table {
            let mut offenders = 0;
            visit_repeats(&rule.pattern, &mut |item, separated| {
                if !separated && is_nullable(item, &nullable) {
                    offenders += 1;
                }
            });
            if offenders > 0 {
                result.report_error(format!(
                    "Rule '{}' repeats a pattern that can match empty input",
                    rule.name
                ));
            }
        }
    }

    /// Suggests dropping `capture_as` when it only repeats the rule name.
    pub fn check_redundant_aliases(table: &[Rule], result: &mut ValidationResult) {
        for rule in table {
            if rule.capture_as == Some(rule.name) {
                result.report_suggestion(format!(
                    "Rule '{}' captures as its own name; `capture_as` can be removed",
                    rule.name
                ));
            }
        }
    }
}

// === Analysis helpers ===

fn ends_at_end_of_input(pattern: &Pattern) -> bool {
    match pattern {
        Pattern::End => true,
        Pattern::Sequence(components) => components
            .last()
            .is_some_and(|last| ends_at_end_of_input(&last.pattern)),
        Pattern::Choice(alternatives) => {
            !alternatives.is_empty() && alternatives.iter().all(ends_at_end_of_input)
        }
        Pattern::Trivia { inner, .. } | Pattern::Silent(inner) => ends_at_end_of_input(inner),
        _ => false,
    }
}

fn visit_repeats(pattern: &Pattern, visit: &mut dyn FnMut(&Pattern, bool)) {
    match pattern {
        Pattern::Repeat(repeat) => {
            visit(&repeat.item, repeat.separator.is_some());
            visit_repeats(&repeat.item, visit);
            if let Some(separator) = &repeat.separator {
                visit_repeats(separator, visit);
            }
        }
        Pattern::Sequence(components) => components
            .iter()
            .for_each(|component| visit_repeats(&component.pattern, visit)),
        Pattern::Choice(alternatives) => alternatives
            .iter()
            .for_each(|alternative| visit_repeats(alternative, visit)),
        Pattern::Optional(inner)
        | Pattern::Silent(inner)
        | Pattern::Lookahead { inner, .. }
        | Pattern::Trivia { inner, .. } => visit_repeats(inner, visit),
        Pattern::Terminal(_) | Pattern::Rule(_) | Pattern::Scan(_) | Pattern::End => {}
    }
}

/// Fixpoint over the table: which rules can succeed on empty input.
fn nullable_rules(table: &[Rule]) -> HashSet<&'static str> {
    let mut nullable = HashSet::new();
    loop {
        let before = nullable.len();
        for rule in table {
            if !nullable.contains(rule.name) && is_nullable(&rule.pattern, &nullable) {
                nullable.insert(rule.name);
            }
        }
        if nullable.len() == before {
            return nullable;
        }
    }
}

fn is_nullable(pattern: &Pattern, nullable: &HashSet<&'static str>) -> bool {
    match pattern {
        Pattern::Terminal(terminal) => terminal.matches_empty(),
        Pattern::Scan(scanner) => (scanner.scan)("").is_some(),
        Pattern::Rule(reference) => nullable.contains(reference.name),
        Pattern::Sequence(components) => components
            .iter()
            .all(|component| is_nullable(&component.pattern, nullable)),
        Pattern::Choice(alternatives) => alternatives
            .iter()
            .any(|alternative| is_nullable(alternative, nullable)),
        Pattern::Repeat(repeat) => repeat.min == 0 || is_nullable(&repeat.item, nullable),
        Pattern::Optional(_) | Pattern::Lookahead { .. } | Pattern::End => true,
        Pattern::Silent(inner) | Pattern::Trivia { inner, .. } => is_nullable(inner, nullable),
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::*;
    use crate::seq;
    use crate::validation::validate_rules;

    #[test]
    fn unknown_references_are_errors() {
        let table = vec![Rule::new("Start", seq![rule("Missing"), end()])];
        let result = validate_rules(&table, &["Start"]);
        assert!(!result.is_valid());
        assert!(result.errors[0].contains("'Missing'"));
    }

    #[test]
    fn unreachable_rules_are_warnings() {
        let table = vec![
            Rule::new("Start", seq![lit("a"), end()]),
            Rule::new("Orphan", lit("b")),
        ];
        let result = validate_rules(&table, &["Start"]);
        assert!(result.is_valid());
        assert_eq!(result.warnings, vec!["Rule 'Orphan' is unreachable".to_string()]);
    }

    #[test]
    fn nullable_repetition_items_are_errors() {
        let table = vec![
            Rule::new("Start", seq![zero_or_more("Maybe"), end()]),
            Rule::new("Maybe", opt(lit("a"))),
        ];
        let result = validate_rules(&table, &["Start"]);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("'Start' repeats a pattern that can match empty input")));
    }

    #[test]
    fn separated_lists_may_have_empty_items() {
        let table = vec![Rule::new("Start", seq![list(opt(lit("a")), lit(",")), end()])];
        let result = validate_rules(&table, &["Start"]);
        assert!(result.is_valid());
    }

    #[test]
    fn unanchored_roots_are_warned_about() {
        let table = vec![Rule::new("Start", lit("a"))];
        let result = validate_rules(&table, &["Start"]);
        assert!(result.warnings[0].contains("end()"));
    }
}
