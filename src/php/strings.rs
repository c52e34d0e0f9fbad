//! String literals and the interpolation sub-parser.
//!
//! Double-quoted strings and heredocs are matched in two passes. The outer
//! rule only finds the closing delimiter and captures the raw body. Its
//! processor then re-runs the engine over that body with `StringParts` or
//! `HeredocParts` as the start rule and trivia skipping off, splitting it into
//! literal runs and interpolated expressions. Literal runs are
//! `StringLiteral` nodes with their escapes resolved.

use lazy_static::lazy_static;
use regex::Regex;

use crate::ast::kinds::{HEREDOC, NOWDOC, STRING_EXPRESSION, STRING_LITERAL};
use crate::ast::{Node, Value};
use crate::errors::ParseException;
use crate::grammar::{
    ahead, cooked, end, field, list_field, lit, opt, re, scan, zero_or_more, EscapeSet,
    ProcessorContext, Rule, Transform,
};
use crate::{one_of, seq};

use super::lexical::IDENT;
use super::shaping;

lazy_static! {
    static ref DOC_HEADER: Regex = Regex::new(&format!(
        r#"\A<<<[ \t]*(?:({IDENT})|"({IDENT})"|'({IDENT})')(?:\r\n|\n|\r)"#
    ))
    .unwrap();
}

// ============================================================================
// SCANNERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocKind {
    Heredoc,
    Nowdoc,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// `<<<ID` up to a line that starts with `ID` not followed by an identifier
/// character. The body excludes the newline before the closing line.
fn scan_doc(input: &str, kind: DocKind) -> Option<(usize, Value)> {
    let header = DOC_HEADER.captures(input)?;
    let (label, doc_kind) = match (header.get(1), header.get(2), header.get(3)) {
        (Some(label), _, _) | (_, Some(label), _) => (label.as_str(), DocKind::Heredoc),
        (_, _, Some(label)) => (label.as_str(), DocKind::Nowdoc),
        _ => return None,
    };
    if doc_kind != kind {
        return None;
    }
    let body_start = header.get(0)?.end();

    let mut line_start = body_start;
    loop {
        let line = &input[line_start..];
        if let Some(after) = line.strip_prefix(label) {
            if !after.chars().next().is_some_and(is_ident_char) {
                let body_end = if line_start == body_start {
                    body_start
                } else {
                    let before = &input[..line_start];
                    line_start - if before.ends_with("\r\n") { 2 } else { 1 }
                };
                let body = input[body_start..body_end].to_string();
                return Some((line_start + label.len(), Value::Text(body)));
            }
        }
        let newline = line.find(['\n', '\r'])?;
        let skip = if line[newline..].starts_with("\r\n") { 2 } else { 1 };
        line_start += newline + skip;
    }
}

fn scan_heredoc(input: &str) -> Option<(usize, Value)> {
    scan_doc(input, DocKind::Heredoc)
}

fn scan_nowdoc(input: &str) -> Option<(usize, Value)> {
    scan_doc(input, DocKind::Nowdoc)
}

/// Length of the literal run at the start of `body`: up to `$name`, `${` or
/// `{$`. Backslash pairs are skipped whole so `\$x` stays literal.
fn literal_run(body: &str) -> usize {
    let mut chars = body.char_indices().peekable();
    while let Some((at, c)) = chars.next() {
        let next = chars.peek().map(|&(_, next)| next);
        match (c, next) {
            ('\\', Some(_)) => {
                chars.next();
            }
            ('$', Some(next)) if next == '{' || is_ident_start(next) => return at,
            ('{', Some('$')) => return at,
            _ => {}
        }
    }
    body.len()
}

fn scan_text(body: &str, escapes: EscapeSet) -> Option<(usize, Value)> {
    let len = literal_run(body);
    if len == 0 {
        return None;
    }
    Some((len, Value::Text(escapes.apply(&body[..len]).into_owned())))
}

fn scan_double_quoted_text(body: &str) -> Option<(usize, Value)> {
    scan_text(body, EscapeSet::DoubleQuoted)
}

fn scan_heredoc_text(body: &str) -> Option<(usize, Value)> {
    scan_text(body, EscapeSet::Heredoc)
}

// ============================================================================
// RULES
// ============================================================================

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "SingleQuotedString",
            seq![field(
                "string",
                re(r"'((?:[^'\\]|\\[\s\S])*)'")
                    .group(1)
                    .transform(Transform::Escapes(EscapeSet::SingleQuoted))
            )],
        )
        .capture_as(STRING_LITERAL),
        Rule::new(
            "DoubleQuotedString",
            seq![field("string", re(r#""((?:[^"\\]|\\[\s\S])*)""#).group(1))],
        )
        .capture_as(STRING_LITERAL)
        .process(interpolate_double_quoted),
        Rule::new(
            HEREDOC,
            seq![field("body", scan("heredoc", scan_heredoc))],
        )
        .process(interpolate_heredoc),
        Rule::new(
            NOWDOC,
            seq![field("string", scan("nowdoc", scan_nowdoc))],
        ),
        // ====================
        // Interpolation start rules
        // ====================
        Rule::new(
            "StringParts",
            seq![list_field("parts", zero_or_more("StringPart")), end()],
        )
        .pick("parts")
        .process(non_empty_parts),
        Rule::new(
            "HeredocParts",
            seq![list_field("parts", zero_or_more("HeredocPart")), end()],
        )
        .pick("parts")
        .process(non_empty_parts),
        Rule::new(
            "StringPart",
            one_of!["Interpolation", "DoubleQuotedText"],
        ),
        Rule::new("HeredocPart", one_of!["Interpolation", "HeredocText"]),
        Rule::new(
            "DoubleQuotedText",
            seq![field("string", scan("double-quoted text", scan_double_quoted_text))],
        )
        .capture_as(STRING_LITERAL),
        Rule::new(
            "HeredocText",
            seq![field("string", scan("heredoc text", scan_heredoc_text))],
        )
        .capture_as(STRING_LITERAL),
        Rule::new(
            "Interpolation",
            one_of![
                "ComplexInterpolation",
                "BracedVariableName",
                "BracedVariableIndex",
                "BracedVariableExpression",
                "SimpleInterpolation"
            ],
        ),
        // `{$expr}`: a full expression, whitespace allowed inside.
        Rule::new(
            "ComplexInterpolation",
            seq![
                lit("{"),
                ahead(lit("$")),
                cooked(field("expression", "Expression")),
                cooked(lit("}"))
            ],
        )
        .pick("expression"),
        Rule::new(
            "BracedVariableName",
            seq![lit("${"), field("variable", re(IDENT)), lit("}")],
        )
        .capture_as("Variable"),
        // `${name[expr]}` indexes `$name`, as `${name}` names it.
        Rule::new(
            "BracedVariableIndex",
            seq![
                lit("${"),
                field("root", "BracedName"),
                list_field("members", "BracedIndex"),
                cooked(lit("}"))
            ],
        )
        .if_no_match("members", "root")
        .process(shaping::fold_members),
        Rule::new("BracedName", seq![field("variable", re(IDENT))]).capture_as("Variable"),
        Rule::new(
            "BracedIndex",
            seq![
                lit("["),
                cooked(field("index", "Expression")),
                cooked(lit("]"))
            ],
        )
        .capture_as("IndexSegment"),
        Rule::new(
            "BracedVariableExpression",
            seq![
                lit("${"),
                cooked(field("expression", "Expression")),
                cooked(lit("}"))
            ],
        )
        .capture_as("VariableExpression"),
        // `$name`, optionally followed by one `[key]` or `->property`.
        Rule::new(
            "SimpleInterpolation",
            seq![
                field("root", "Variable"),
                list_field(
                    "members",
                    opt(one_of!["InterpolatedIndex", "InterpolatedProperty"])
                )
            ],
        )
        .if_no_match("members", "root")
        .process(shaping::fold_members),
        Rule::new(
            "InterpolatedIndex",
            seq![
                lit("["),
                field("index", one_of!["Integer", "Variable", "InterpolatedKey"]),
                lit("]")
            ],
        )
        .capture_as("IndexSegment"),
        Rule::new(
            "InterpolatedKey",
            seq![field("string", re(IDENT))],
        )
        .capture_as("String"),
        Rule::new(
            "InterpolatedProperty",
            seq![lit("->"), field("property", re(IDENT))],
        )
        .capture_as("PropertySegment"),
    ]
}

// ============================================================================
// PROCESSORS
// ============================================================================

/// An empty body still has one (empty) literal part.
fn non_empty_parts(value: Value, ctx: &mut ProcessorContext<'_, '_>) -> Result<Value, ParseException> {
    let parts = value.into_list();
    if !parts.is_empty() {
        return Ok(Value::List(parts));
    }
    let empty = ctx.covering(Node::new(STRING_LITERAL).with("string", ""), None, None);
    Ok(Value::List(vec![empty.into()]))
}

fn interpolate_double_quoted(
    value: Value,
    ctx: &mut ProcessorContext<'_, '_>,
) -> Result<Value, ParseException> {
    let Value::Node(node) = value else {
        return Ok(value);
    };
    let body = node.text("string").unwrap_or_default().to_string();
    let offset = ctx.span().start + 1;

    let Some(parts) = ctx.reparse("StringParts", &body, offset)? else {
        return Ok(Value::Node(node));
    };
    let mut parts = parts.into_list();
    if parts.len() == 1 && parts[0].kind() == Some(STRING_LITERAL) {
        let literal = parts.pop().unwrap_or_default();
        let text = literal
            .as_node()
            .and_then(|part| part.text("string"))
            .unwrap_or_default()
            .to_string();
        return Ok(Node::new(STRING_LITERAL).with("string", text).into());
    }
    Ok(Node::new(STRING_EXPRESSION).with("parts", parts).into())
}

fn interpolate_heredoc(
    value: Value,
    ctx: &mut ProcessorContext<'_, '_>,
) -> Result<Value, ParseException> {
    let Value::Node(node) = value else {
        return Ok(value);
    };
    let body = node.text("body").unwrap_or_default().to_string();
    // The body starts on the line after `<<<ID`.
    let header = DOC_HEADER.find(ctx.text()).map_or(0, |found| found.end());
    let offset = ctx.span().start + header;

    match ctx.reparse("HeredocParts", &body, offset)? {
        Some(parts) => Ok(Node::new(HEREDOC).with("parts", parts).into()),
        None => Ok(Value::Node(node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(found: Option<(usize, Value)>) -> Option<(usize, String)> {
        found.and_then(|(len, value)| Some((len, value.into_text()?)))
    }

    #[test]
    fn heredoc_body_stops_before_the_closing_line() {
        let source = "<<<EOT\nline one\nline two\nEOT;\n";
        assert_eq!(
            text(scan_heredoc(source)),
            Some((source.find(';').unwrap(), "line one\nline two".to_string()))
        );
    }

    #[test]
    fn empty_heredoc_has_an_empty_body() {
        assert_eq!(text(scan_heredoc("<<<EOT\nEOT;")), Some((10, String::new())));
    }

    #[test]
    fn closing_label_must_end_the_identifier() {
        let source = "<<<\"END\"\nENDING\nEND\n";
        assert_eq!(
            text(scan_heredoc(source)),
            Some((source.len() - 1, "ENDING".to_string()))
        );
    }

    #[test]
    fn nowdoc_and_heredoc_headers_are_distinct() {
        assert!(scan_heredoc("<<<'EOT'\nx\nEOT").is_none());
        assert_eq!(
            text(scan_nowdoc("<<<'EOT'\n$x\nEOT")),
            Some((15, "$x".to_string()))
        );
    }

    #[test]
    fn literal_runs_stop_at_interpolations() {
        assert_eq!(literal_run("cost: $total"), 6);
        assert_eq!(literal_run("a{$b}"), 1);
        assert_eq!(literal_run("a${b}"), 1);
        assert_eq!(literal_run("price $5 \\$x {x}"), 16);
    }

    #[test]
    fn literal_runs_resolve_escapes() {
        assert_eq!(
            text(scan_double_quoted_text(r#"tab\there \"q\"$x"#)),
            Some((15, "tab\there \"q\"".to_string()))
        );
        assert_eq!(
            text(scan_heredoc_text(r#"keep \"q\""#)),
            Some((10, r#"keep \"q\""#.to_string()))
        );
    }
}
