// tests/expression_tests.rs

mod common;

use common::{child, expression, items, statement};
use php_ast::{Node, Value};

fn variable<'n>(node: &'n Node, key: &str) -> &'n str {
    let variable = child(node, key);
    assert_eq!(variable.name, "Variable", "`{key}` of {node:?}");
    variable.text("variable").unwrap()
}

// ---
// Binary operators
// ---

#[test]
fn same_level_operators_fold_to_the_left() {
    let outer = expression("$a + $b + $c");
    assert_eq!(outer.name, "BinaryExpression");
    assert_eq!(outer.text("operator"), Some("+"));
    assert_eq!(variable(&outer, "right"), "c");

    let inner = child(&outer, "left");
    assert_eq!(inner.name, "BinaryExpression");
    assert_eq!(variable(inner, "left"), "a");
    assert_eq!(variable(inner, "right"), "b");
}

#[test]
fn mixed_operators_at_one_level_fold_to_the_left() {
    let outer = expression("$a - $b . $c");
    assert_eq!(outer.text("operator"), Some("."));
    assert_eq!(child(&outer, "left").text("operator"), Some("-"));
}

#[test]
fn tighter_operators_nest_on_the_right() {
    let sum = expression("$a + $b * $c");
    assert_eq!(sum.text("operator"), Some("+"));
    assert_eq!(variable(&sum, "left"), "a");
    assert_eq!(child(&sum, "right").text("operator"), Some("*"));

    let comparison = expression("$a < $b && $c >= 1");
    assert_eq!(comparison.text("operator"), Some("&&"));
    assert_eq!(child(&comparison, "left").text("operator"), Some("<"));
    assert_eq!(child(&comparison, "right").text("operator"), Some(">="));
}

#[test]
fn operators_sharing_a_prefix_are_told_apart() {
    assert_eq!(expression("$a || $b").text("operator"), Some("||"));
    assert_eq!(expression("$a | $b").text("operator"), Some("|"));
    assert_eq!(expression("$a <=> $b").text("operator"), Some("<=>"));
    assert_eq!(expression("$a << 2").text("operator"), Some("<<"));
    assert_eq!(expression("$a !== $b").text("operator"), Some("!=="));
}

#[test]
fn word_operators_bind_looser_than_assignment() {
    let or = expression("$a = 1 or $b");
    assert_eq!(or.name, "BinaryExpression");
    assert_eq!(or.text("operator"), Some("or"));
    assert_eq!(child(&or, "left").name, "Assignment");
}

#[test]
fn coalesce_nests_to_the_right() {
    let outer = expression("$a ?? $b ?? $c");
    assert_eq!(outer.text("operator"), Some("??"));
    assert_eq!(variable(&outer, "left"), "a");
    let inner = child(&outer, "right");
    assert_eq!(inner.text("operator"), Some("??"));
    assert_eq!(variable(inner, "left"), "b");
}

#[test]
fn power_nests_to_the_right() {
    let outer = expression("2 ** 3 ** 2");
    assert_eq!(outer.text("operator"), Some("**"));
    assert_eq!(child(&outer, "left").text("number"), Some("2"));
    assert_eq!(child(&outer, "right").text("operator"), Some("**"));
}

// ---
// Ternaries
// ---

#[test]
fn ternary_in_alternate_position_nests_in_the_alternate() {
    let outer = expression("$a ? 1 : $b ? 2 : 3");
    assert_eq!(outer.name, "Ternary");
    assert_eq!(variable(&outer, "condition"), "a");
    assert_eq!(child(&outer, "consequent").text("number"), Some("1"));

    let inner = child(&outer, "alternate");
    assert_eq!(inner.name, "Ternary");
    assert_eq!(variable(inner, "condition"), "b");
    assert_eq!(child(inner, "consequent").text("number"), Some("2"));
    assert_eq!(child(inner, "alternate").text("number"), Some("3"));
}

#[test]
fn ternary_in_consequent_position_nests_in_the_consequent() {
    let outer = expression("$a ? $b ? 1 : 2 : 3");
    assert_eq!(outer.name, "Ternary");
    assert_eq!(child(&outer, "alternate").text("number"), Some("3"));

    let inner = child(&outer, "consequent");
    assert_eq!(inner.name, "Ternary");
    assert_eq!(variable(inner, "condition"), "b");
    assert_eq!(child(inner, "alternate").text("number"), Some("2"));
}

#[test]
fn shorthand_ternary_has_no_consequent() {
    let ternary = expression("$a ?: $b");
    assert_eq!(ternary.name, "Ternary");
    assert!(ternary.get("consequent").is_some_and(|value| value.is_null()));
    assert_eq!(variable(&ternary, "alternate"), "b");
}

// ---
// Member access
// ---

#[test]
fn member_chains_nest_innermost_first() {
    let call = expression("$o->p[0]->m()");
    assert_eq!(call.name, "MethodCall");
    assert_eq!(call.text("method"), Some("m"));
    assert_eq!(call.list("args").map(<[Value]>::len), Some(0));

    let index = child(&call, "object");
    assert_eq!(index.name, "ArrayIndex");
    assert_eq!(child(index, "index").text("number"), Some("0"));

    let property = child(index, "array");
    assert_eq!(property.name, "ObjectProperty");
    assert_eq!(property.text("property"), Some("p"));
    assert_eq!(variable(property, "object"), "o");
}

#[test]
fn consecutive_indices_each_wrap_the_previous_access() {
    let outer = expression("$m[1][2]");
    assert_eq!(outer.name, "ArrayIndex");
    assert_eq!(child(&outer, "index").text("number"), Some("2"));
    let inner = child(&outer, "array");
    assert_eq!(inner.name, "ArrayIndex");
    assert_eq!(variable(inner, "array"), "m");
}

#[test]
fn static_members() {
    let call = expression("Foo::bar(1, ...$rest)");
    assert_eq!(call.name, "StaticMethodCall");
    assert_eq!(child(&call, "class").text("string"), Some("Foo"));
    assert_eq!(call.text("method"), Some("bar"));
    let args = items(&call, "args");
    assert_eq!(args[0].name, "Integer");
    assert_eq!(args[1].name, "Spread");

    let constant = expression("self::VERSION");
    assert_eq!(constant.name, "ClassConstant");
    assert_eq!(child(&constant, "class").name, "SelfReference");
    assert_eq!(constant.text("constant"), Some("VERSION"));
}

#[test]
fn calls_on_names_and_callables() {
    let call = expression(r"\strlen($s)");
    assert_eq!(call.name, "FunctionCall");
    assert_eq!(child(&call, "func").text("string"), Some(r"\strlen"));

    let nested = expression("$f()()");
    assert_eq!(nested.name, "FunctionCall");
    assert_eq!(child(&nested, "func").name, "FunctionCall");
}

#[test]
fn bare_names_are_constants() {
    let constant = expression("PHP_EOL");
    assert_eq!(constant.name, "Constant");
    assert_eq!(constant.text("constant"), Some("PHP_EOL"));
}

// ---
// Assignment and unary operators
// ---

#[test]
fn assignment_is_right_associative() {
    let outer = expression("$a = $b = 1");
    assert_eq!(outer.name, "Assignment");
    assert_eq!(outer.text("operator"), Some("="));
    assert_eq!(outer.flag("by_reference"), Some(false));
    assert_eq!(variable(&outer, "target"), "a");
    assert_eq!(child(&outer, "value").name, "Assignment");
}

#[test]
fn compound_and_reference_assignment() {
    let compound = expression("$a->total .= 'x'");
    assert_eq!(compound.text("operator"), Some(".="));
    assert_eq!(child(&compound, "target").name, "ObjectProperty");

    let reference = expression("$a = &$b");
    assert_eq!(reference.flag("by_reference"), Some(true));
}

#[test]
fn list_destructuring() {
    let assignment = expression("[$a, , $c] = $pair");
    assert_eq!(assignment.name, "ListAssignment");
    let target = child(&assignment, "target");
    assert_eq!(target.name, "List");
    assert_eq!(target.list("elements").map(<[Value]>::len), Some(3));
}

#[test]
fn not_applies_to_the_whole_instanceof_test() {
    let not = expression("!$a instanceof Foo");
    assert_eq!(not.name, "UnaryExpression");
    assert_eq!(not.text("operator"), Some("!"));
    let test = child(&not, "expression");
    assert_eq!(test.name, "InstanceOf");
    assert_eq!(child(test, "class").text("string"), Some("Foo"));
}

#[test]
fn prefix_and_postfix_updates() {
    let prefix = expression("++$i");
    assert_eq!(prefix.name, "PrefixUpdate");
    assert_eq!(prefix.text("operator"), Some("++"));

    let postfix = expression("$i--");
    assert_eq!(postfix.name, "PostfixUpdate");
    assert_eq!(postfix.text("operator"), Some("--"));
}

#[test]
fn casts_are_normalized() {
    let cast = expression("( INT ) $x");
    assert_eq!(cast.name, "Cast");
    assert_eq!(cast.text("type"), Some("int"));
}

// ---
// Terms
// ---

#[test]
fn array_literals() {
    let array = expression("['a' => 1, 2, ...$more,]");
    assert_eq!(array.name, "Array");
    let elements = items(&array, "elements");
    let names: Vec<_> = elements.iter().map(|element| element.name).collect();
    assert_eq!(names, ["KeyValuePair", "Integer", "Spread"]);

    assert_eq!(expression("array()").list("elements").map(<[Value]>::len), Some(0));
}

#[test]
fn closures_and_arrow_functions() {
    let closure = expression("function ($x) use (&$total): int { return $x; }");
    assert_eq!(closure.name, "Closure");
    let bindings = items(&closure, "bind");
    assert_eq!(bindings[0].flag("by_reference"), Some(true));
    assert_eq!(bindings[0].text("variable"), Some("total"));
    assert_eq!(child(&closure, "return_type").text("type"), Some("int"));

    let arrow = expression("fn($x) => $x * 2");
    assert_eq!(arrow.name, "ArrowFunction");
    assert_eq!(child(&arrow, "expression").name, "BinaryExpression");
}

#[test]
fn object_creation() {
    let new = expression("new Foo(1)");
    assert_eq!(new.name, "New");
    assert_eq!(child(&new, "class").text("string"), Some("Foo"));
    assert_eq!(new.list("args").map(<[Value]>::len), Some(1));

    let bare = expression("new $class");
    assert_eq!(variable(&bare, "class"), "class");
    assert_eq!(bare.list("args").map(<[Value]>::len), Some(0));
}

#[test]
fn language_constructs() {
    assert_eq!(expression("isset($a, $b[1])").list("variables").map(<[Value]>::len), Some(2));
    assert_eq!(expression("empty($a)").name, "Empty");
    assert_eq!(expression("print 'x'").name, "Print");
    assert_eq!(expression("__LINE__").text("constant"), Some("__LINE__"));

    let include = expression("require_once 'lib.php'");
    assert_eq!(include.name, "Include");
    assert_eq!(include.text("type"), Some("require_once"));
}

#[test]
fn exit_without_status() {
    let exit = statement("exit;");
    let exit = child(&exit, "expression");
    assert_eq!(exit.name, "Exit");
    assert!(exit.get("status").is_some_and(|value| value.is_null()));
}
