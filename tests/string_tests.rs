// tests/string_tests.rs

mod common;

use common::{child, expression, items};
use php_ast::Node;

fn parts(node: &Node) -> Vec<&Node> {
    items(node, "parts")
}

fn literal(node: &Node) -> &str {
    assert_eq!(node.name, "StringLiteral", "{node:?}");
    node.text("string").unwrap()
}

// ---
// Heredoc and nowdoc
// ---

#[test]
fn empty_heredoc_has_one_empty_literal_part() {
    let heredoc = expression("<<<EOT\nEOT");
    assert_eq!(heredoc.name, "Heredoc");
    let parts = parts(&heredoc);
    assert_eq!(parts.len(), 1);
    assert_eq!(literal(parts[0]), "");
}

#[test]
fn heredoc_with_only_a_variable_has_one_part() {
    let heredoc = expression("<<<EOT\n$v\nEOT");
    let parts = parts(&heredoc);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].name, "Variable");
    assert_eq!(parts[0].text("variable"), Some("v"));
}

#[test]
fn text_around_a_variable_stays_in_separate_parts() {
    let heredoc = expression("<<<EOT\nab$v!cd\nEOT");
    let parts = parts(&heredoc);
    assert_eq!(parts.len(), 3);
    assert_eq!(literal(parts[0]), "ab");
    assert_eq!(parts[1].text("variable"), Some("v"));
    assert_eq!(literal(parts[2]), "!cd");
}

#[test]
fn heredoc_spans_lines_and_keeps_escaped_quotes() {
    let heredoc = expression("<<<\"END\"\nline \\\"one\\\"\\n\n  {$a->b} two\nEND");
    let parts = parts(&heredoc);
    assert_eq!(parts.len(), 3);
    assert_eq!(literal(parts[0]), "line \\\"one\\\"\n\n  ");
    assert_eq!(parts[1].name, "ObjectProperty");
    assert_eq!(literal(parts[2]), " two");
}

#[test]
fn nowdoc_is_verbatim() {
    let nowdoc = expression("<<<'EOT'\n$x {$y} \\n\nEOT");
    assert_eq!(nowdoc.name, "Nowdoc");
    assert_eq!(nowdoc.text("string"), Some("$x {$y} \\n"));
}

// ---
// Double-quoted strings
// ---

#[test]
fn plain_double_quoted_string_is_a_literal() {
    let string = expression(r#""cost \$5""#);
    assert_eq!(literal(&string), "cost $5");
    assert_eq!(literal(&expression(r#""""#)), "");
}

#[test]
fn simple_interpolation() {
    let string = expression(r#""Hello $name!""#);
    assert_eq!(string.name, "StringExpression");
    let parts = parts(&string);
    assert_eq!(parts.len(), 3);
    assert_eq!(literal(parts[0]), "Hello ");
    assert_eq!(parts[1].text("variable"), Some("name"));
    assert_eq!(literal(parts[2]), "!");
}

#[test]
fn simple_interpolation_takes_one_index_or_property() {
    let string = expression(r#""$a[0] $a[key] $o->p->q""#);
    let parts = parts(&string);
    let names: Vec<_> = parts.iter().map(|part| part.name).collect();
    assert_eq!(
        names,
        ["ArrayIndex", "StringLiteral", "ArrayIndex", "StringLiteral", "ObjectProperty", "StringLiteral"]
    );
    assert_eq!(child(parts[0], "index").text("number"), Some("0"));
    let key = child(parts[2], "index");
    assert_eq!(key.name, "String");
    assert_eq!(key.text("string"), Some("key"));
    assert_eq!(parts[4].text("property"), Some("p"));
    assert_eq!(literal(parts[5]), "->q");
}

#[test]
fn braced_interpolation() {
    let string = expression(r#""{$o->items[1]}${name}""#);
    let parts = parts(&string);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].name, "ArrayIndex");
    assert_eq!(child(parts[0], "array").name, "ObjectProperty");
    assert_eq!(parts[1].name, "Variable");
    assert_eq!(parts[1].text("variable"), Some("name"));
}

#[test]
fn complex_interpolation_allows_whitespace_inside_braces() {
    let string = expression(r#""x{$a + 1 }y""#);
    let parts = parts(&string);
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[1].name, "BinaryExpression");
}

#[test]
fn dollar_without_a_name_is_text() {
    let string = expression(r#""$ 5 {x}""#);
    assert_eq!(literal(&string), "$ 5 {x}");
}

#[test]
fn braced_name_with_an_index_indexes_the_variable() {
    let string = expression(r#""${a[0]}${b['k'] }""#);
    let parts = parts(&string);
    assert_eq!(parts.len(), 2);

    let first = parts[0];
    assert_eq!(first.name, "ArrayIndex");
    let array = child(first, "array");
    assert_eq!(array.name, "Variable");
    assert_eq!(array.text("variable"), Some("a"));
    assert_eq!(child(first, "index").text("number"), Some("0"));

    assert_eq!(child(parts[1], "array").text("variable"), Some("b"));
    assert_eq!(literal(child(parts[1], "index")), "k");
}

#[test]
fn braced_expression_is_a_variable_variable() {
    let string = expression(r#""${$name}""#);
    let parts = parts(&string);
    assert_eq!(parts[0].name, "VariableExpression");
}
