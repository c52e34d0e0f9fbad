//! Classes, interfaces and traits.

use crate::grammar::{
    field, flag, kw, list1, list_field, lit, one_or_more, opt, re_i, silent, zero_or_more,
    Pattern, Rule, Transform,
};
use crate::{one_of, seq};

use super::lexical::{member_identifier, variable_name};

/// `{ members }`, merged into the declaring node.
fn class_body() -> Pattern {
    seq![
        lit("{"),
        list_field("members", zero_or_more("ClassMember")),
        lit("}")
    ]
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "ClassDeclaration",
            seq![
                list_field(
                    "modifiers",
                    zero_or_more(re_i(r"(?:abstract|final)\b").transform(Transform::Lowercase))
                ),
                kw("class"),
                field("class_name", "Identifier"),
                field("extends", opt("Extends")),
                list_field("implements", opt("Implements")),
                class_body()
            ],
        )
        .capture_as("Class"),
        Rule::new("Extends", seq![kw("extends"), field("name", "Name")]).pick("name"),
        Rule::new(
            "Implements",
            seq![kw("implements"), list_field("names", list1("Name", lit(",")))],
        )
        .pick("names"),
        Rule::new(
            "InterfaceDeclaration",
            seq![
                kw("interface"),
                field("interface_name", "Identifier"),
                list_field("extends", opt("InterfaceExtends")),
                class_body()
            ],
        )
        .capture_as("Interface"),
        Rule::new(
            "InterfaceExtends",
            seq![kw("extends"), list_field("names", list1("Name", lit(",")))],
        )
        .pick("names"),
        Rule::new(
            "TraitDeclaration",
            seq![kw("trait"), field("trait_name", "Identifier"), class_body()],
        )
        .capture_as("Trait"),
        Rule::new(
            "ClassMember",
            one_of![
                "TraitUse",
                "ClassConstantDeclaration",
                "Method",
                "PropertyDeclaration"
            ],
        ),
        // ====================
        // Members
        // ====================
        Rule::new(
            "TraitUse",
            seq![
                kw("use"),
                list_field("traits", list1("Name", lit(","))),
                list_field("adaptations", one_of!["TraitRules", silent(lit(";"))])
            ],
        ),
        Rule::new(
            "TraitRules",
            seq![
                lit("{"),
                list_field("rules", zero_or_more("TraitAdaptation")),
                lit("}")
            ],
        )
        .pick("rules"),
        Rule::new("TraitAdaptation", one_of!["TraitPrecedence", "TraitAlias"]),
        Rule::new(
            "TraitMethodReference",
            seq![
                field("trait", "Name"),
                lit("::"),
                field("method", member_identifier())
            ],
        ),
        Rule::new(
            "TraitPrecedence",
            seq![
                field("method", "TraitMethodReference"),
                kw("insteadof"),
                list_field("instead_of", list1("Name", lit(","))),
                lit(";")
            ],
        ),
        Rule::new(
            "TraitAlias",
            seq![
                field("method", one_of!["TraitMethodReference", member_identifier()]),
                kw("as"),
                field("modifier", opt("Modifier")),
                field("alias", opt(member_identifier())),
                lit(";")
            ],
        ),
        Rule::new(
            "ClassConstantDeclaration",
            seq![
                list_field("modifiers", zero_or_more("Modifier")),
                kw("const"),
                list_field("constants", list1("ConstantDefinition", lit(","))),
                lit(";")
            ],
        ),
        Rule::new(
            "Method",
            seq![
                list_field("modifiers", zero_or_more("Modifier")),
                kw("function"),
                flag("by_reference", opt(lit("&"))),
                field("method", member_identifier()),
                field("args", "ParameterList"),
                field("return_type", opt("ReturnType")),
                field("body", one_of!["Block", silent(lit(";"))])
            ],
        ),
        Rule::new(
            "PropertyDeclaration",
            seq![
                list_field("modifiers", one_or_more("Modifier")),
                field("type", opt("TypeHint")),
                list_field("properties", list1("PropertyDefinition", lit(","))),
                lit(";")
            ],
        ),
        Rule::new(
            "PropertyDefinition",
            seq![
                field("variable", variable_name()),
                field("default", opt("DefaultValue"))
            ],
        ),
    ]
}
