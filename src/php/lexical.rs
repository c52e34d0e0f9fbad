//! Terminals shared by the rest of the PHP table: trivia, names, variables,
//! numbers and the reserved-word list.

use crate::grammar::{field, not, raw, re, re_i, Pattern, Rule, Terminal, Transform};
use crate::seq;

/// Whitespace, `//` and `#` comments (which end before `?>`), and block
/// comments including doc comments.
pub const TRIVIA: &str = concat!(
    r"(?:\s+",
    r"|(?://|#)(?:[^\r\n?]|\?+[^\r\n>?])*(?:\?+(?:\r\n|\n|\r|\z))?",
    r"|/\*(?s:.)*?\*/",
    r")+"
);

pub const IDENT: &str = r"[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*";

/// Keywords that cannot name functions, constants or classes. `self`,
/// `static` and `parent` are deliberately absent.
pub const RESERVED_WORDS: &[&str] = &[
    "__halt_compiler", "abstract", "and", "array", "as", "break", "callable", "case", "catch",
    "class", "clone", "const", "continue", "declare", "default", "die", "do", "echo", "else",
    "elseif", "empty", "enddeclare", "endfor", "endforeach", "endif", "endswitch", "endwhile",
    "eval", "exit", "extends", "final", "finally", "fn", "for", "foreach", "function", "global",
    "goto", "if", "implements", "include", "include_once", "instanceof", "insteadof",
    "interface", "isset", "list", "namespace", "new", "or", "print", "private", "protected",
    "public", "require", "require_once", "return", "switch", "throw", "trait", "try", "unset",
    "use", "var", "while", "xor",
];

pub fn trivia() -> Terminal {
    re(TRIVIA)
}

fn reserved_word() -> Terminal {
    re_i(format!(r"(?:{})\b", RESERVED_WORDS.join("|")))
}

/// `$name` yielding `name`.
pub fn variable_name() -> Terminal {
    re(format!(r"\$({IDENT})")).group(1)
}

/// An identifier in any position where keywords are allowed too: after
/// `->`, after `::`, and in member declarations.
pub fn member_identifier() -> Terminal {
    re(IDENT)
}

/// `operator` not immediately followed by any of `next`: keeps `|` from
/// matching the start of `||` or `|=`.
pub fn token(operator: impl Into<Pattern>, next: &'static str) -> Pattern {
    seq![operator.into(), not(raw(re(next)))]
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new("ReservedWord", reserved_word()),
        Rule::new(
            "Identifier",
            seq![not("ReservedWord"), field("identifier", re(IDENT))],
        )
        .pick("identifier"),
        // Optionally fully qualified, possibly namespaced.
        Rule::new(
            "Name",
            seq![
                not("ReservedWord"),
                field("name", re(format!(r"\\?{IDENT}(?:\\{IDENT})*")))
            ],
        )
        .pick("name"),
        Rule::new("BareName", seq![field("string", "Name")]).capture_as("String"),
        Rule::new("Variable", seq![field("variable", variable_name())]),
        Rule::new(
            "Float",
            seq![field(
                "number",
                re(concat!(
                    r"[0-9]*\.[0-9]+(?:[eE][+-]?[0-9]+)?",
                    r"|[0-9]+\.[0-9]*(?:[eE][+-]?[0-9]+)?",
                    r"|[0-9]+[eE][+-]?[0-9]+"
                ))
            )],
        ),
        Rule::new(
            "Integer",
            seq![field(
                "number",
                re(r"0[xX][0-9a-fA-F]+|0[bB][01]+|[0-9]+").transform(Transform::Integer)
            )],
        ),
        Rule::new(
            "Boolean",
            seq![field(
                "bool",
                re_i(r"(?:true|false)\b").transform(Transform::Lowercase)
            )],
        ),
        Rule::new("Null", re_i(r"null\b")).as_node(),
        Rule::new(
            "MagicConstant",
            seq![field(
                "constant",
                re_i(r"__(?:LINE|FILE|DIR|FUNCTION|CLASS|TRAIT|METHOD|NAMESPACE)__\b")
                    .transform(Transform::Uppercase)
            )],
        ),
        Rule::new(
            "Modifier",
            re_i(r"(?:public|protected|private|static|abstract|final|var)\b")
                .transform(Transform::Lowercase),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn line_comments_stop_before_a_closing_tag() {
        let trivia = Regex::new(&format!(r"\A{TRIVIA}")).unwrap();
        let found = trivia.find("// note ?> <p>").unwrap();
        assert_eq!(found.as_str(), "// note ");
    }

    #[test]
    fn question_marks_inside_comments_are_comment_text() {
        let trivia = Regex::new(&format!(r"\A{TRIVIA}")).unwrap();
        let source = "# really?\n$x";
        assert_eq!(trivia.find(source).unwrap().end(), source.find('$').unwrap());
    }

    #[test]
    fn block_and_doc_comments_are_trivia() {
        let trivia = Regex::new(&format!(r"\A{TRIVIA}")).unwrap();
        let source = "/** doc */ /* a\n b */ x";
        assert_eq!(trivia.find(source).unwrap().end(), source.len() - 1);
    }

    #[test]
    fn reserved_words_are_whole_words() {
        let mut reserved = reserved_word();
        reserved.compile().unwrap();
        assert!(reserved.match_at("ECHO 1").is_some());
        assert!(reserved.match_at("echoes").is_none());
        assert!(reserved.match_at("parent").is_none());
    }
}
