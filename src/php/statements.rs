//! Statements, the program rule and the markup around `<?php ... ?>`.

use crate::ast::Value;
use crate::grammar::{
    ahead, end, field, flag, kw, list, list1, list_field, lit, opt, raw, re, re_i, scan, silent,
    zero_or_more, Pattern, Rule, Transform,
};
use crate::{one_of, seq};

use super::lexical::{member_identifier, token, variable_name};
use super::shaping;

/// Markup up to the next `<?php` (followed by whitespace) or `<?=`.
fn scan_markup(input: &str) -> Option<(usize, Value)> {
    let bytes = input.as_bytes();
    let mut cursor = 0;
    while let Some(found) = input[cursor..].find("<?") {
        let at = cursor + found;
        let rest = &bytes[at + 2..];
        let php_tag = rest.len() >= 3
            && rest[..3].eq_ignore_ascii_case(b"php")
            && rest.get(3).map_or(true, u8::is_ascii_whitespace);
        if php_tag || rest.first() == Some(&b'=') {
            return Some((at, Value::Text(input[..at].to_string())));
        }
        cursor = at + 2;
    }
    Some((input.len(), Value::Text(input.to_string())))
}

/// Whatever follows `__halt_compiler();`.
fn scan_rest(input: &str) -> Option<(usize, Value)> {
    Some((input.len(), Value::Text(input.to_string())))
}

fn open_tag() -> Pattern {
    re_i(r"<\?php(?:\s|\z)").into()
}

fn condition() -> Pattern {
    seq![lit("("), field("condition", "Expression"), lit(")")]
}

/// A statement body, or `:` statements `end_keyword;`.
fn body(end_keyword: &'static str) -> Pattern {
    one_of![
        seq![
            lit(":"),
            field("body", "ColonBody"),
            kw(end_keyword),
            "Terminator"
        ],
        seq![field("body", "Statement")]
    ]
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "Program",
            seq![
                field("leading", "LeadingHtml"),
                list_field("statements", zero_or_more("TopStatement")),
                end()
            ],
        )
        .process(shaping::assemble_program),
        Rule::new(
            "LeadingHtml",
            raw(seq![field("html", scan("markup", scan_markup)), opt(open_tag())]),
        )
        .capture_as("InlineHtml"),
        Rule::new(
            "TopStatement",
            one_of!["HaltCompiler", "NamespaceStatement", "Statement"],
        ),
        Rule::new(
            "HaltCompiler",
            seq![
                kw("__halt_compiler"),
                flag("call", opt(seq![lit("("), lit(")"), "Terminator"])),
                raw(field("data", scan("rest of input", scan_rest)))
            ],
        )
        .process(shaping::check_halt_compiler),
        Rule::new(
            "NestedHaltCompiler",
            kw("__halt_compiler"),
        )
        .process(shaping::reject_nested_halt_compiler),
        Rule::new(
            "NamespaceStatement",
            seq![
                kw("namespace"),
                field("name", opt("Name")),
                one_of![
                    // A braced body is not the outermost scope.
                    seq![
                        lit("{"),
                        list_field("statements", zero_or_more("Statement")),
                        lit("}")
                    ],
                    "Terminator"
                ]
            ],
        )
        .capture_as("Namespace"),
        Rule::new("Terminator", one_of![lit(";"), ahead(lit("?>"))]),
        // ====================
        // Statement dispatch
        // ====================
        Rule::new(
            "Statement",
            one_of![
                "Block",
                "InlineHtml",
                "EchoTag",
                "FunctionDeclaration",
                "ClassDeclaration",
                "InterfaceDeclaration",
                "TraitDeclaration",
                "IfStatement",
                "While",
                "DoWhile",
                "For",
                "Foreach",
                "Switch",
                "Break",
                "Continue",
                "ReturnStatement",
                "EchoStatement",
                "Global",
                "StaticStatement",
                "Unset",
                "Throw",
                "Try",
                "ConstStatement",
                "Use",
                "Declare",
                "Goto",
                "Label",
                "NestedHaltCompiler",
                "EmptyStatement",
                "ExpressionStatement"
            ],
        ),
        Rule::new(
            "Block",
            seq![
                lit("{"),
                list_field("statements", zero_or_more("Statement")),
                lit("}")
            ],
        )
        .capture_as("CompoundStatement"),
        Rule::new(
            "ColonBody",
            seq![list_field("statements", zero_or_more("Statement"))],
        )
        .capture_as("CompoundStatement"),
        // `?>` markup `<?php`; one newline right after `?>` belongs to the tag.
        Rule::new(
            "InlineHtml",
            seq![
                lit("?>"),
                raw(seq![
                    opt(re(r"\r\n|\n")),
                    field("html", scan("markup", scan_markup)),
                    opt(open_tag())
                ])
            ],
        ),
        Rule::new(
            "EchoTag",
            seq![
                lit("<?="),
                list_field("expressions", list1("Expression", lit(","))),
                "Terminator"
            ],
        )
        .capture_as("EchoStatement"),
        // ====================
        // Functions
        // ====================
        Rule::new(
            "FunctionDeclaration",
            seq![
                kw("function"),
                flag("by_reference", opt(lit("&"))),
                field("func", "Identifier"),
                field("args", "ParameterList"),
                field("return_type", opt("ReturnType")),
                field("body", "Block")
            ],
        ),
        Rule::new(
            "ParameterList",
            seq![
                lit("("),
                list_field("params", list("Parameter", lit(",")).trailing()),
                lit(")")
            ],
        )
        .pick("params"),
        Rule::new(
            "Parameter",
            seq![
                field("type", opt("TypeHint")),
                flag("by_reference", opt(lit("&"))),
                flag("variadic", opt(lit("..."))),
                field("variable", variable_name()),
                field("default", opt("DefaultValue"))
            ],
        ),
        Rule::new(
            "DefaultValue",
            seq![token(lit("="), "[=>]"), field("value", "Expression")],
        )
        .pick("value"),
        Rule::new(
            "TypeHint",
            seq![
                flag("nullable", opt(lit("?"))),
                field(
                    "type",
                    one_of![
                        re_i(r"(?:array|callable)\b").transform(Transform::Lowercase),
                        "Name"
                    ]
                )
            ],
        )
        .capture_as("Type"),
        Rule::new("ReturnType", seq![lit(":"), field("type", "TypeHint")]).pick("type"),
        // ====================
        // Control flow
        // ====================
        Rule::new("IfStatement", one_of!["BraceIf", "ColonIf"]),
        Rule::new(
            "BraceIf",
            seq![
                kw("if"),
                condition(),
                field("consequent", "Statement"),
                list_field("elseifs", zero_or_more("ElseIf")),
                opt(seq![kw("else"), field("alternate", "Statement")])
            ],
        )
        .capture_as("If")
        .process(shaping::fold_if),
        Rule::new(
            "ElseIf",
            seq![kw("elseif"), condition(), field("consequent", "Statement")],
        ),
        Rule::new(
            "ColonIf",
            seq![
                kw("if"),
                condition(),
                lit(":"),
                field("consequent", "ColonBody"),
                list_field("elseifs", zero_or_more("ColonElseIf")),
                opt(seq![kw("else"), lit(":"), field("alternate", "ColonBody")]),
                kw("endif"),
                "Terminator"
            ],
        )
        .capture_as("If")
        .process(shaping::fold_if),
        Rule::new(
            "ColonElseIf",
            seq![
                kw("elseif"),
                condition(),
                lit(":"),
                field("consequent", "ColonBody")
            ],
        )
        .capture_as("ElseIf"),
        Rule::new("While", seq![kw("while"), condition(), body("endwhile")]),
        Rule::new(
            "DoWhile",
            seq![
                kw("do"),
                field("body", "Statement"),
                kw("while"),
                condition(),
                "Terminator"
            ],
        ),
        Rule::new(
            "For",
            seq![
                kw("for"),
                lit("("),
                list_field("initializers", list("Expression", lit(","))),
                lit(";"),
                list_field("conditions", list("Expression", lit(","))),
                lit(";"),
                list_field("updates", list("Expression", lit(","))),
                lit(")"),
                body("endfor")
            ],
        ),
        Rule::new(
            "Foreach",
            seq![
                kw("foreach"),
                lit("("),
                field("expression", "Expression"),
                kw("as"),
                field("key", opt("ForeachKey")),
                flag("by_reference", opt(lit("&"))),
                field("value", one_of!["ArrayDestructure", "AssignableTarget"]),
                lit(")"),
                body("endforeach")
            ],
        ),
        Rule::new(
            "ForeachKey",
            seq![field("key", "Expression"), lit("=>")],
        )
        .pick("key"),
        Rule::new(
            "Switch",
            seq![
                kw("switch"),
                condition(),
                one_of![
                    seq![
                        lit("{"),
                        opt(lit(";")),
                        list_field("cases", zero_or_more("SwitchCase")),
                        lit("}")
                    ],
                    seq![
                        lit(":"),
                        opt(lit(";")),
                        list_field("cases", zero_or_more("SwitchCase")),
                        kw("endswitch"),
                        "Terminator"
                    ]
                ]
            ],
        ),
        Rule::new("SwitchCase", one_of!["Case", "DefaultCase"]),
        Rule::new(
            "Case",
            seq![
                kw("case"),
                field("test", "Expression"),
                re("[:;]"),
                list_field("statements", zero_or_more("Statement"))
            ],
        ),
        Rule::new(
            "DefaultCase",
            seq![
                kw("default"),
                re("[:;]"),
                list_field("statements", zero_or_more("Statement"))
            ],
        ),
        Rule::new(
            "Break",
            seq![kw("break"), field("level", opt("Expression")), "Terminator"],
        ),
        Rule::new(
            "Continue",
            seq![kw("continue"), field("level", opt("Expression")), "Terminator"],
        ),
        Rule::new(
            "ReturnStatement",
            seq![kw("return"), field("expression", opt("Expression")), "Terminator"],
        ),
        Rule::new(
            "Try",
            seq![
                kw("try"),
                field("body", "Block"),
                list_field("catches", zero_or_more("Catch")),
                field("finally", opt("Finally"))
            ],
        )
        .process(shaping::check_try),
        Rule::new(
            "Catch",
            seq![
                kw("catch"),
                lit("("),
                list_field("types", list1("Name", token(lit("|"), "[|]"))),
                field("variable", variable_name()),
                lit(")"),
                field("body", "Block")
            ],
        ),
        Rule::new("Finally", seq![kw("finally"), field("body", "Block")]).pick("body"),
        Rule::new("Throw", seq![kw("throw"), field("expression", "Expression"), "Terminator"]),
        Rule::new("Goto", seq![kw("goto"), field("label", "Identifier"), "Terminator"]),
        Rule::new("Label", seq![field("label", "Identifier"), token(lit(":"), ":")]),
        // ====================
        // Simple statements
        // ====================
        Rule::new(
            "EchoStatement",
            seq![
                kw("echo"),
                list_field("expressions", list1("Expression", lit(","))),
                "Terminator"
            ],
        ),
        Rule::new(
            "Global",
            seq![
                kw("global"),
                list_field(
                    "variables",
                    list1(one_of!["Variable", "VariableExpression"], lit(","))
                ),
                "Terminator"
            ],
        ),
        Rule::new(
            "StaticStatement",
            seq![
                kw("static"),
                list_field("variables", list1("StaticVariable", lit(","))),
                "Terminator"
            ],
        ),
        Rule::new(
            "StaticVariable",
            seq![
                field("variable", variable_name()),
                field("default", opt("DefaultValue"))
            ],
        ),
        Rule::new(
            "Unset",
            seq![
                kw("unset"),
                lit("("),
                list_field("variables", list1("Expression", lit(",")).trailing()),
                lit(")"),
                "Terminator"
            ],
        ),
        Rule::new(
            "ConstStatement",
            seq![
                kw("const"),
                list_field("constants", list1("ConstantDefinition", lit(","))),
                "Terminator"
            ],
        ),
        Rule::new(
            "ConstantDefinition",
            seq![
                field("constant", member_identifier()),
                token(lit("="), "[=>]"),
                field("value", "Expression")
            ],
        ),
        Rule::new(
            "Use",
            seq![
                kw("use"),
                field(
                    "type",
                    opt(re_i(r"(?:function|const)\b").transform(Transform::Lowercase))
                ),
                list_field("uses", list1("UseClause", lit(","))),
                "Terminator"
            ],
        ),
        Rule::new(
            "UseClause",
            seq![field("name", "Name"), field("alias", opt("UseAlias"))],
        ),
        Rule::new("UseAlias", seq![kw("as"), field("alias", "Identifier")]).pick("alias"),
        Rule::new(
            "Declare",
            seq![
                kw("declare"),
                lit("("),
                list_field("directives", list1("DeclareDirective", lit(","))),
                lit(")"),
                body("enddeclare")
            ],
        ),
        Rule::new(
            "DeclareDirective",
            seq![
                field("directive", member_identifier()),
                token(lit("="), "[=>]"),
                field("value", "Expression")
            ],
        ),
        Rule::new("EmptyStatement", silent(lit(";"))).as_node(),
        Rule::new(
            "ExpressionStatement",
            seq![field("expression", "Expression"), "Terminator"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_stops_at_open_tags() {
        assert_eq!(
            scan_markup("<p>hi</p><?php echo 1;"),
            Some((9, Value::Text("<p>hi</p>".to_string())))
        );
        assert_eq!(scan_markup("a<?= $b ?>").map(|(len, _)| len), Some(1));
        assert_eq!(scan_markup("<?PHP\n").map(|(len, _)| len), Some(0));
    }

    #[test]
    fn markup_without_a_tag_runs_to_the_end() {
        assert_eq!(scan_markup("<?xml version?>").map(|(len, _)| len), Some(15));
        assert_eq!(scan_markup("").map(|(len, _)| len), Some(0));
    }
}
