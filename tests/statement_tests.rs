// tests/statement_tests.rs

mod common;

use common::{child, items, statement, statements};
use php_ast::Value;

// ---
// Control flow
// ---

#[test]
fn elseif_clauses_nest_in_the_alternate() {
    let outer = statement("if ($a) { f(); } elseif ($b) { g(); } else { h(); }");
    assert_eq!(outer.name, "If");
    assert_eq!(child(&outer, "consequent").name, "CompoundStatement");
    assert!(outer.get("elseifs").is_none());

    let nested = child(&outer, "alternate");
    assert_eq!(nested.name, "If");
    assert_eq!(child(nested, "condition").text("variable"), Some("b"));
    assert_eq!(child(nested, "alternate").name, "CompoundStatement");
}

#[test]
fn if_without_else_has_a_null_alternate() {
    let statement = statement("if ($a) echo 1;");
    assert_eq!(child(&statement, "consequent").name, "EchoStatement");
    assert!(statement.get("alternate").is_some_and(Value::is_null));
}

#[test]
fn colon_syntax_if() {
    let outer = statement("if ($a): echo 1; elseif ($b): echo 2; else: echo 3; endif;");
    assert_eq!(outer.name, "If");
    let consequent = child(&outer, "consequent");
    assert_eq!(consequent.name, "CompoundStatement");
    assert_eq!(items(consequent, "statements").len(), 1);
    assert_eq!(child(&outer, "alternate").name, "If");
}

#[test]
fn loops() {
    let while_loop = statement("while ($i < 3) { $i++; }");
    assert_eq!(while_loop.name, "While");
    assert_eq!(child(&while_loop, "body").name, "CompoundStatement");

    let do_while = statement("do { $i--; } while ($i);");
    assert_eq!(do_while.name, "DoWhile");

    let for_loop = statement("for ($i = 0, $j = 1; $i < 3; $i++) {}");
    assert_eq!(for_loop.name, "For");
    assert_eq!(items(&for_loop, "initializers").len(), 2);
    assert_eq!(items(&for_loop, "updates").len(), 1);

    let endless = statement("for (;;) {}");
    assert_eq!(endless.list("conditions").map(<[Value]>::len), Some(0));

    let colon = statement("foreach ($rows as $i => &$row): endforeach;");
    assert_eq!(colon.name, "Foreach");
    assert_eq!(child(&colon, "key").text("variable"), Some("i"));
    assert_eq!(colon.flag("by_reference"), Some(true));
}

#[test]
fn switch_cases() {
    let switch = statement("switch ($x) { case 1: case 2; echo 'a'; break; default: echo 'b'; }");
    assert_eq!(switch.name, "Switch");
    let cases = items(&switch, "cases");
    let names: Vec<_> = cases.iter().map(|case| case.name).collect();
    assert_eq!(names, ["Case", "Case", "DefaultCase"]);
    assert_eq!(items(cases[1], "statements").len(), 2);
}

#[test]
fn try_catch_finally() {
    let statement = statement(
        "try { risky(); } catch (A | \\B\\C $e) { log($e); } finally { done(); }",
    );
    assert_eq!(statement.name, "Try");
    let catches = items(&statement, "catches");
    assert_eq!(catches.len(), 1);
    let types: Vec<_> = catches[0]
        .list("types")
        .unwrap()
        .iter()
        .filter_map(Value::as_text)
        .collect();
    assert_eq!(types, ["A", "\\B\\C"]);
    assert_eq!(catches[0].text("variable"), Some("e"));
    assert_eq!(child(&statement, "finally").name, "CompoundStatement");
}

#[test]
fn labels_and_goto() {
    let statements = statements("<?php start: goto start;");
    assert_eq!(statements[0].name, "Label");
    assert_eq!(statements[0].text("label"), Some("start"));
    assert_eq!(statements[1].name, "Goto");
}

// ---
// Declarations
// ---

#[test]
fn function_declaration() {
    let function = statement("function &total(?int $base = 0, Item ...$items): float { }");
    assert_eq!(function.name, "FunctionDeclaration");
    assert_eq!(function.text("func"), Some("total"));
    assert_eq!(function.flag("by_reference"), Some(true));

    let params = items(&function, "args");
    assert_eq!(params.len(), 2);
    let base = child(params[0], "type");
    assert_eq!(base.name, "Type");
    assert_eq!(base.flag("nullable"), Some(true));
    assert_eq!(child(params[0], "default").text("number"), Some("0"));
    assert_eq!(params[1].flag("variadic"), Some(true));
    assert_eq!(child(&function, "return_type").text("type"), Some("float"));
}

#[test]
fn class_declaration() {
    let class = statement(
        r"abstract class Shape extends Base implements Countable, \Serializable {
            use Named, Sized { Named::size insteadof Sized; Sized::size as protected measure; }
            const SIDES = 0, NAME = 'shape';
            private static ?int $count = 0, $total;
            abstract public function area(): float;
            public static function make(...$args) { return new static(...$args); }
        }",
    );
    assert_eq!(class.name, "Class");
    assert_eq!(class.text("class_name"), Some("Shape"));
    assert_eq!(class.text("extends"), Some("Base"));
    assert_eq!(class.list("implements").map(<[Value]>::len), Some(2));
    assert_eq!(class.list("modifiers").map(<[Value]>::len), Some(1));

    let members = items(&class, "members");
    let names: Vec<_> = members.iter().map(|member| member.name).collect();
    assert_eq!(
        names,
        ["TraitUse", "ClassConstantDeclaration", "PropertyDeclaration", "Method", "Method"]
    );
    assert_eq!(items(members[0], "adaptations").len(), 2);
    assert_eq!(items(members[2], "properties").len(), 2);
    assert!(members[3].get("body").is_some_and(Value::is_null));
    assert_eq!(members[4].text("method"), Some("make"));
}

#[test]
fn interfaces_and_traits() {
    let interface = statement("interface Walker extends A, B { public function walk(); }");
    assert_eq!(interface.name, "Interface");
    assert_eq!(interface.list("extends").map(<[Value]>::len), Some(2));

    let trait_ = statement("trait Greets { public $greeting = 'hi'; }");
    assert_eq!(trait_.name, "Trait");
    assert_eq!(trait_.text("trait_name"), Some("Greets"));
}

#[test]
fn namespaces_and_imports() {
    let statements = statements(
        "<?php namespace App\\Models; use Foo\\Bar as Baz, Qux; use function strlen;",
    );
    assert_eq!(statements[0].name, "Namespace");
    assert_eq!(statements[0].text("name"), Some("App\\Models"));

    let uses = items(&statements[1], "uses");
    assert_eq!(uses.len(), 2);
    assert_eq!(uses[0].text("alias"), Some("Baz"));
    assert_eq!(statements[2].text("type"), Some("function"));
}

#[test]
fn braced_namespace_holds_its_statements() {
    let namespace = statement("namespace { echo 1; }");
    assert!(namespace.get("name").is_some_and(Value::is_null));
    assert_eq!(items(&namespace, "statements").len(), 1);
}

// ---
// Simple statements
// ---

#[test]
fn echo_tag_is_an_echo_statement() {
    let statements = statements("<p><?= $title, '!' ?></p>");
    let names: Vec<_> = statements.iter().map(|statement| statement.name).collect();
    assert_eq!(names, ["InlineHtml", "EchoStatement", "InlineHtml"]);
    assert_eq!(items(&statements[1], "expressions").len(), 2);
}

#[test]
fn variable_declarations() {
    let global = statement("global $a, $$b;");
    assert_eq!(global.name, "Global");
    let variables = items(&global, "variables");
    assert_eq!(variables[1].name, "VariableExpression");

    let statics = statement("static $n = 0, $m;");
    assert_eq!(statics.name, "StaticStatement");
    assert_eq!(items(&statics, "variables").len(), 2);

    let unset = statement("unset($a[1], $b);");
    assert_eq!(items(&unset, "variables").len(), 2);
}

#[test]
fn constants_and_declare() {
    let constants = statement("const A = 1, B = A * 2;");
    assert_eq!(constants.name, "ConstStatement");
    assert_eq!(items(&constants, "constants")[1].text("constant"), Some("B"));

    let declare = statement("declare(strict_types=1);");
    assert_eq!(declare.name, "Declare");
    assert_eq!(items(&declare, "directives")[0].text("directive"), Some("strict_types"));
}

#[test]
fn empty_statements_are_kept() {
    let statements = statements("<?php ;;");
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].name, "EmptyStatement");
}
