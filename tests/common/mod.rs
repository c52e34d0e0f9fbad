//! Shared helpers for the integration tests.

#![allow(dead_code)]

use php_ast::{parse, Node, Value};

/// Parses `source`, failing the test with the rendered error otherwise.
pub fn program(source: &str) -> Node {
    match parse(source) {
        Ok(program) => program,
        Err(error) => panic!("failed to parse {source:?}: {error}"),
    }
}

/// The top-level statements of `source`, markup included.
pub fn statements(source: &str) -> Vec<Node> {
    let mut program = program(source);
    assert_eq!(program.name, "Program");
    program
        .take("statements")
        .into_list()
        .into_iter()
        .map(|statement| statement.into_node().expect("statement is a node"))
        .collect()
}

/// The single statement of `<?php <code>`.
pub fn statement(code: &str) -> Node {
    let mut statements = statements(&format!("<?php {code}"));
    assert_eq!(statements.len(), 1, "expected one statement in {code:?}");
    statements.remove(0)
}

/// The expression of `<?php return <expression>;`.
pub fn expression(expression: &str) -> Node {
    let mut statement = statement(&format!("return {expression};"));
    assert_eq!(statement.name, "ReturnStatement");
    statement
        .take("expression")
        .into_node()
        .expect("returned expression is a node")
}

pub fn child<'n>(node: &'n Node, key: &str) -> &'n Node {
    node.node(key)
        .unwrap_or_else(|| panic!("`{}` has no node at `{key}`: {node:?}", node.name))
}

pub fn items<'n>(node: &'n Node, key: &str) -> Vec<&'n Node> {
    node.list(key)
        .unwrap_or_else(|| panic!("`{}` has no list at `{key}`: {node:?}", node.name))
        .iter()
        .filter_map(Value::as_node)
        .collect()
}
