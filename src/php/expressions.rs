//! The expression cascade.
//!
//! Each `*Level` rule matches the next tighter level first and then tries its
//! own operators, so precedence falls out of the rule order and nothing is
//! left-recursive. Binary levels capture `{left, right: [{operator, operand}]}`
//! and either hand back `left` untouched or get folded by
//! [`shaping`](super::shaping).

use crate::grammar::{
    ahead, field, flag, kw, list, list1, list_field, lit, not, one_or_more, opt, re, re_i,
    zero_or_more, Pattern, Rule, Transform,
};
use crate::{one_of, seq};

use super::lexical::{member_identifier, token, variable_name};
use super::shaping;

/// A left-associative binary level.
fn binary(name: &'static str, operand: &'static str, operator: impl Into<Pattern>) -> Rule {
    Rule::new(
        name,
        seq![
            field("left", operand),
            list_field(
                "right",
                zero_or_more(seq![field("operator", operator), field("operand", operand)])
            )
        ],
    )
    .capture_as("BinaryExpression")
    .if_no_match("right", "left")
    .process(shaping::fold_binary)
}

fn parenthesized(inner: impl Into<Pattern>) -> Pattern {
    seq![lit("("), field("expression", inner), lit(")")]
}

pub fn rules() -> Vec<Rule> {
    let mut rules = vec![
        Rule::new("Expression", "LogicalOrLevel"),
        // ====================
        // Word operators and print
        // ====================
        binary("LogicalOrLevel", "LogicalXorLevel", kw("or")),
        binary("LogicalXorLevel", "LogicalAndLevel", kw("xor")),
        binary("LogicalAndLevel", "PrintLevel", kw("and")),
        Rule::new("PrintLevel", one_of!["PrintExpression", "AssignmentLevel"]),
        Rule::new(
            "PrintExpression",
            seq![kw("print"), field("expression", "PrintLevel")],
        )
        .capture_as("Print"),
        // ====================
        // Assignment
        // ====================
        Rule::new(
            "AssignmentLevel",
            one_of!["ListAssignment", "AssignmentExpression", "TernaryLevel"],
        ),
        Rule::new(
            "AssignmentExpression",
            seq![
                field("target", "AssignableTarget"),
                field("operator", "AssignmentOperator"),
                flag("by_reference", opt(lit("&"))),
                field("value", "AssignmentLevel")
            ],
        )
        .capture_as("Assignment"),
        Rule::new(
            "AssignmentOperator",
            one_of![
                re(r"\*\*=|\?\?=|<<=|>>=|[-+*/.%&|^]="),
                token(lit("="), "[=>]")
            ],
        ),
        Rule::new(
            "ListAssignment",
            seq![
                field("target", "ArrayDestructure"),
                token(lit("="), "[=>]"),
                field("value", "AssignmentLevel")
            ],
        ),
        Rule::new(
            "ArrayDestructure",
            one_of![
                seq![
                    kw("list"),
                    lit("("),
                    list_field("elements", list(opt("DestructureElement"), lit(","))),
                    lit(")")
                ],
                seq![
                    lit("["),
                    list_field("elements", list(opt("DestructureElement"), lit(","))),
                    lit("]")
                ]
            ],
        )
        .capture_as("List"),
        Rule::new(
            "DestructureElement",
            one_of!["DestructureKeyValue", "ArrayDestructure", "AssignableTarget"],
        ),
        Rule::new(
            "DestructureKeyValue",
            seq![
                field("key", "Expression"),
                lit("=>"),
                field("value", one_of!["ArrayDestructure", "AssignableTarget"])
            ],
        )
        .capture_as("KeyValuePair"),
        // Variables and member chains only: `$a + $b = 1` does not parse.
        Rule::new(
            "AssignableTarget",
            one_of![
                seq![
                    field("root", one_of!["Variable", "VariableExpression"]),
                    list_field("members", zero_or_more("Member"))
                ],
                seq![
                    field("root", one_of!["SpecialClass", "BareName"]),
                    list_field("members", one_or_more("Member"))
                ]
            ],
        )
        .if_no_match("members", "root")
        .process(shaping::fold_members),
        // ====================
        // Conditional
        // ====================
        Rule::new(
            "TernaryLevel",
            seq![
                field("condition", "CoalesceLevel"),
                list_field("operands", zero_or_more("TernaryOperand"))
            ],
        )
        .capture_as("Ternary")
        .if_no_match("operands", "condition")
        .process(shaping::fold_ternary),
        Rule::new("TernaryOperand", one_of!["ShorthandOperand", "FullOperand"]),
        Rule::new(
            "ShorthandOperand",
            seq![lit("?"), lit(":"), field("shorthand", "CoalesceLevel")],
        ),
        Rule::new(
            "FullOperand",
            seq![
                lit("?"),
                field("consequent", "AssignmentLevel"),
                lit(":"),
                field("alternate", "CoalesceLevel")
            ],
        ),
        Rule::new(
            "CoalesceLevel",
            seq![
                field("left", "BooleanOrLevel"),
                list_field(
                    "right",
                    zero_or_more(seq![
                        field("operator", lit("??")),
                        field("operand", "BooleanOrLevel")
                    ])
                )
            ],
        )
        .capture_as("BinaryExpression")
        .if_no_match("right", "left")
        .process(shaping::fold_binary_right),
        // ====================
        // Symbolic binary operators, loosest first
        // ====================
        binary("BooleanOrLevel", "BooleanAndLevel", lit("||")),
        binary("BooleanAndLevel", "BitwiseOrLevel", lit("&&")),
        binary("BitwiseOrLevel", "BitwiseXorLevel", token(lit("|"), "[|=]")),
        binary("BitwiseXorLevel", "BitwiseAndLevel", token(lit("^"), "=")),
        binary("BitwiseAndLevel", "EqualityLevel", token(lit("&"), "[&=]")),
        binary("EqualityLevel", "RelationalLevel", re(r"===|!==|==|!=|<>|<=>")),
        binary("RelationalLevel", "ShiftLevel", token(re(r"<=|>=|<|>"), "[<>=]")),
        binary("ShiftLevel", "AdditiveLevel", token(re(r"<<|>>"), "[=<]")),
        binary("AdditiveLevel", "MultiplicativeLevel", token(re(r"[-+.]"), r"[=.]")),
        binary("MultiplicativeLevel", "LogicalNotLevel", token(re(r"[*/%]"), r"[=*]")),
        // ====================
        // Prefix operators
        // ====================
        Rule::new("LogicalNotLevel", one_of!["NotExpression", "InstanceOfLevel"]),
        Rule::new(
            "NotExpression",
            seq![
                field("operator", lit("!")),
                field("expression", one_of!["AssignmentExpression", "LogicalNotLevel"])
            ],
        )
        .capture_as("UnaryExpression"),
        Rule::new(
            "InstanceOfLevel",
            seq![
                field("object", "UnaryLevel"),
                opt(seq![kw("instanceof"), field("class", "ClassReference")])
            ],
        )
        .capture_as("InstanceOf")
        .if_no_match("class", "object"),
        Rule::new(
            "UnaryLevel",
            one_of![
                "Cast",
                "Suppress",
                "PrefixUpdate",
                "SignedExpression",
                "CloneExpression",
                "PowerLevel"
            ],
        ),
        // `!$x = f()` and `@$y = g()` assign before applying the operator.
        Rule::new(
            "UnaryOperand",
            one_of!["AssignmentExpression", "NotExpression", "UnaryLevel"],
        ),
        Rule::new(
            "Cast",
            seq![
                field(
                    "type",
                    re_i(r"\(\s*(int|integer|bool|boolean|float|double|real|string|array|object|unset|binary)\s*\)")
                        .group(1)
                        .transform(Transform::Lowercase)
                ),
                field("expression", "UnaryOperand")
            ],
        ),
        Rule::new(
            "Suppress",
            seq![lit("@"), field("expression", "UnaryOperand")],
        ),
        Rule::new(
            "PrefixUpdate",
            seq![field("operator", re(r"\+\+|--")), field("operand", "AssignableTarget")],
        ),
        Rule::new(
            "SignedExpression",
            seq![field("operator", re(r"[-+~]")), field("expression", "UnaryOperand")],
        )
        .capture_as("UnaryExpression"),
        Rule::new(
            "CloneExpression",
            seq![kw("clone"), field("expression", "UnaryOperand")],
        )
        .capture_as("Clone"),
        // Right-associative: the right operand is itself a unary level.
        Rule::new(
            "PowerLevel",
            seq![
                field("left", "PostfixUpdateLevel"),
                list_field(
                    "right",
                    opt(seq![
                        field("operator", token(lit("**"), "=")),
                        field("operand", "UnaryOperand")
                    ])
                )
            ],
        )
        .capture_as("BinaryExpression")
        .if_no_match("right", "left")
        .process(shaping::fold_binary),
        Rule::new(
            "PostfixUpdateLevel",
            seq![
                field("operand", "PostfixLevel"),
                field("operator", opt(re(r"\+\+|--")))
            ],
        )
        .capture_as("PostfixUpdate")
        .if_no_match("operator", "operand"),
        // ====================
        // Member access chains
        // ====================
        Rule::new(
            "PostfixLevel",
            seq![field("root", "Term"), list_field("members", zero_or_more("Member"))],
        )
        .if_no_match("members", "root")
        .process(shaping::fold_members),
        Rule::new(
            "Member",
            one_of![
                "IndexMembers",
                "PropertyMembers",
                "MethodMember",
                "StaticMethodMember",
                "StaticPropertyMember",
                "ClassConstantMember",
                "CallMember"
            ],
        ),
        Rule::new(
            "IndexMembers",
            seq![list_field("indices", one_or_more("IndexSegment"))],
        ),
        Rule::new(
            "IndexSegment",
            seq![lit("["), field("index", opt("Expression")), lit("]")],
        ),
        Rule::new(
            "PropertyMembers",
            seq![list_field("properties", one_or_more("PropertySegment"))],
        ),
        Rule::new(
            "PropertySegment",
            seq![lit("->"), field("property", "MemberName"), not(lit("("))],
        ),
        Rule::new(
            "MethodMember",
            seq![
                lit("->"),
                field("method", "MemberName"),
                field("args", "ArgumentList")
            ],
        ),
        Rule::new(
            "StaticMethodMember",
            seq![
                lit("::"),
                field("method", "MemberName"),
                field("args", "ArgumentList")
            ],
        ),
        Rule::new(
            "StaticPropertyMember",
            seq![lit("::"), field("property", variable_name())],
        ),
        Rule::new(
            "ClassConstantMember",
            seq![lit("::"), field("constant", member_identifier())],
        ),
        Rule::new("CallMember", seq![field("args", "ArgumentList")]),
        Rule::new(
            "MemberName",
            one_of![member_identifier(), "Variable", "BracedExpression"],
        ),
        Rule::new(
            "BracedExpression",
            seq![lit("{"), field("expression", "Expression"), lit("}")],
        )
        .pick("expression"),
        Rule::new(
            "ArgumentList",
            seq![
                lit("("),
                list_field("args", list("Argument", lit(",")).trailing()),
                lit(")")
            ],
        )
        .pick("args"),
        Rule::new("Argument", one_of!["Spread", "Expression"]),
        Rule::new("Spread", seq![lit("..."), field("operand", "Expression")]),
        // Class position after `new` and `instanceof`.
        Rule::new("ClassReference", one_of!["ClassVariable", "BareName"]),
        Rule::new(
            "ClassVariable",
            seq![
                field("root", one_of!["Variable", "VariableExpression"]),
                list_field(
                    "members",
                    zero_or_more(one_of!["IndexMembers", "PropertyMembers", "StaticPropertyMember"])
                )
            ],
        )
        .if_no_match("members", "root")
        .process(shaping::fold_members),
    ];
    rules.extend(terms());
    rules
}

fn terms() -> Vec<Rule> {
    vec![
        Rule::new(
            "Term",
            one_of![
                "Parenthesized",
                "Variable",
                "VariableExpression",
                "ArrayLiteral",
                "Closure",
                "ArrowFunction",
                "New",
                "Isset",
                "Empty",
                "Exit",
                "Eval",
                "Include",
                "Float",
                "Integer",
                "SingleQuotedString",
                "DoubleQuotedString",
                "Nowdoc",
                "Heredoc",
                "Boolean",
                "Null",
                "MagicConstant",
                "SpecialClass",
                "Constant",
                "BareName"
            ],
        ),
        Rule::new("Parenthesized", parenthesized("Expression")).pick("expression"),
        // `$$name` and `${expr}`.
        Rule::new(
            "VariableExpression",
            seq![
                lit("$"),
                field("expression", one_of!["Variable", "VariableExpression", "BracedExpression"])
            ],
        ),
        Rule::new(
            "ArrayLiteral",
            one_of![
                seq![
                    kw("array"),
                    lit("("),
                    list_field("elements", list("ArrayElement", lit(",")).trailing()),
                    lit(")")
                ],
                seq![
                    lit("["),
                    list_field("elements", list("ArrayElement", lit(",")).trailing()),
                    lit("]")
                ]
            ],
        )
        .capture_as("Array"),
        Rule::new(
            "ArrayElement",
            one_of!["KeyValuePair", "Reference", "Spread", "Expression"],
        ),
        Rule::new(
            "KeyValuePair",
            seq![
                field("key", "Expression"),
                lit("=>"),
                field("value", one_of!["Reference", "Expression"])
            ],
        ),
        Rule::new("Reference", seq![lit("&"), field("operand", "AssignableTarget")]),
        Rule::new(
            "Closure",
            seq![
                flag("static", opt(kw("static"))),
                kw("function"),
                flag("by_reference", opt(lit("&"))),
                field("args", "ParameterList"),
                list_field("bind", opt("ClosureUse")),
                field("return_type", opt("ReturnType")),
                field("body", "Block")
            ],
        ),
        Rule::new(
            "ClosureUse",
            seq![
                kw("use"),
                lit("("),
                list_field("bindings", list1("ClosureBinding", lit(",")).trailing()),
                lit(")")
            ],
        )
        .pick("bindings"),
        Rule::new(
            "ClosureBinding",
            seq![
                flag("by_reference", opt(lit("&"))),
                field("variable", variable_name())
            ],
        ),
        Rule::new(
            "ArrowFunction",
            seq![
                flag("static", opt(kw("static"))),
                kw("fn"),
                flag("by_reference", opt(lit("&"))),
                field("args", "ParameterList"),
                field("return_type", opt("ReturnType")),
                lit("=>"),
                field("expression", "Expression")
            ],
        ),
        Rule::new(
            "New",
            seq![
                kw("new"),
                field("class", "ClassReference"),
                list_field("args", opt("ArgumentList"))
            ],
        ),
        Rule::new(
            "Isset",
            seq![
                kw("isset"),
                lit("("),
                list_field("variables", list1("Expression", lit(",")).trailing()),
                lit(")")
            ],
        ),
        Rule::new("Empty", seq![kw("empty"), parenthesized("Expression")]),
        Rule::new(
            "Exit",
            seq![
                re_i(r"(?:exit|die)\b"),
                field("status", opt("ExitStatus"))
            ],
        ),
        Rule::new(
            "ExitStatus",
            seq![lit("("), field("status", opt("Expression")), lit(")")],
        )
        .pick("status"),
        Rule::new("Eval", seq![kw("eval"), field("code", "Parenthesized")]),
        Rule::new(
            "Include",
            seq![
                field(
                    "type",
                    re_i(r"(?:include|require)(?:_once)?\b").transform(Transform::Lowercase)
                ),
                field("path", "Expression")
            ],
        ),
        Rule::new(
            "SpecialClass",
            one_of!["SelfReference", "StaticReference", "ParentReference"],
        ),
        Rule::new("SelfReference", seq![kw("self"), ahead(lit("::"))]).as_node(),
        Rule::new("StaticReference", seq![kw("static"), ahead(lit("::"))]).as_node(),
        Rule::new("ParentReference", seq![kw("parent"), ahead(lit("::"))]).as_node(),
        Rule::new(
            "Constant",
            seq![field("constant", "Name"), not(one_of![lit("("), lit("::")])],
        ),
    ]
}
