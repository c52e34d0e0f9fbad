//! Tree-shaping processors.
//!
//! The grammar captures operator chains, ternary tails and member accesses
//! as flat lists because a PEG cannot be left-recursive. The folds here
//! rebuild those lists into nested nodes after the rule has matched. When
//! instrumentation is on, every node a fold creates is instrumented from the
//! start of its leftmost part to the end of its rightmost part.

use crate::ast::kinds::*;
use crate::ast::{Fields, Node, Value};
use crate::diagnostics::translator::{
    MALFORMED_HALT_COMPILER, NESTED_HALT_COMPILER, TRY_WITHOUT_CATCH_OR_FINALLY,
};
use crate::errors::ParseException;
use crate::grammar::context::byte_range;
use crate::grammar::ProcessorContext;

type Processed = Result<Value, ParseException>;

fn start_of(value: &Value) -> Option<usize> {
    byte_range(value).map(|(start, _)| start)
}

fn end_of(value: &Value) -> Option<usize> {
    byte_range(value).map(|(_, end)| end)
}

/// Fields of an anonymous record or of a descriptor node.
fn into_fields(value: Value) -> Fields {
    match value {
        Value::Record(fields) => fields,
        Value::Node(node) => Node::unshare(node).fields,
        _ => Fields::new(),
    }
}

// ============================================================================
// OPERATORS
// ============================================================================

/// `{left, right: [{operator, operand}..]}` into left-nested
/// `BinaryExpression {left, operator, right}` nodes.
pub fn fold_binary(value: Value, ctx: &mut ProcessorContext<'_, '_>) -> Processed {
    let mut node = match value {
        Value::Node(node) => Node::unshare(node),
        other => return Ok(other),
    };
    let mut left = node.take("left");
    let start = start_of(&left);

    for step in node.take("right").into_list() {
        let mut step = into_fields(step);
        let operand = step.take("operand");
        let end = end_of(&operand);
        let folded = Node::new(BINARY_EXPRESSION)
            .with("left", left)
            .with("operator", step.take("operator"))
            .with("right", operand);
        left = ctx.covering(folded, start, end).into();
    }
    Ok(left)
}

/// Like [`fold_binary`] but right-nested, for `??`.
pub fn fold_binary_right(value: Value, ctx: &mut ProcessorContext<'_, '_>) -> Processed {
    let mut node = match value {
        Value::Node(node) => Node::unshare(node),
        other => return Ok(other),
    };
    let mut operands = vec![node.take("left")];
    let mut operators = Vec::new();
    for step in node.take("right").into_list() {
        let mut step = into_fields(step);
        operators.push(step.take("operator"));
        operands.push(step.take("operand"));
    }

    let mut right = operands.pop().unwrap_or_default();
    let end = end_of(&right);
    while let Some(operator) = operators.pop() {
        let left = operands.pop().unwrap_or_default();
        let start = start_of(&left);
        let folded = Node::new(BINARY_EXPRESSION)
            .with("left", left)
            .with("operator", operator)
            .with("right", right);
        right = ctx.covering(folded, start, end).into();
    }
    Ok(right)
}

/// `{condition, operands: [FullOperand | ShorthandOperand]..}` into
/// `Ternary {condition, consequent, alternate}`.
///
/// Each operand's alternate is the condition of the next one, so the chain
/// is unwound from the right: `$a ? 1 : $b ? 2 : 3` nests the second ternary
/// in the first one's `alternate`. A shorthand `?:` has a null consequent.
pub fn fold_ternary(value: Value, ctx: &mut ProcessorContext<'_, '_>) -> Processed {
    let mut node = match value {
        Value::Node(node) => Node::unshare(node),
        other => return Ok(other),
    };
    let mut conditions = vec![node.take("condition")];
    let mut consequents = Vec::new();

    for operand in node.take("operands").into_list() {
        let Some(mut operand) = operand.into_node() else {
            continue;
        };
        if operand.is(SHORTHAND_OPERAND) {
            consequents.push(Value::Null);
            conditions.push(operand.take("shorthand"));
        } else {
            consequents.push(operand.take("consequent"));
            conditions.push(operand.take("alternate"));
        }
    }

    let mut alternate = conditions.pop().unwrap_or_default();
    let end = end_of(&alternate);
    while let Some(consequent) = consequents.pop() {
        let condition = conditions.pop().unwrap_or_default();
        let start = start_of(&condition);
        let ternary = Node::new(TERNARY)
            .with("condition", condition)
            .with("consequent", consequent)
            .with("alternate", alternate);
        alternate = ctx.covering(ternary, start, end).into();
    }
    Ok(alternate)
}

// ============================================================================
// MEMBER ACCESS
// ============================================================================

/// `{root, members: [..]}` into nested access nodes, innermost first.
///
/// `IndexMembers` and `PropertyMembers` group consecutive segments of one
/// kind; each segment becomes its own node.
pub fn fold_members(value: Value, ctx: &mut ProcessorContext<'_, '_>) -> Processed {
    let mut node = match value {
        Value::Node(node) => Node::unshare(node),
        other => return Ok(other),
    };
    let mut target = node.take("root");
    let start = start_of(&target);

    for member in node.take("members").into_list() {
        let Some(member) = member.into_node() else {
            continue;
        };
        for mut segment in segments(member) {
            let Some(&(_, kind, slot, parts)) =
                ACCESSES.iter().find(|(name, ..)| *name == segment.name)
            else {
                log::debug!("ignoring unknown member segment `{}`", segment.name);
                continue;
            };
            let end = segment.byte_range().map(|(_, end)| end);
            let mut access = Node::new(kind).with(slot, std::mem::take(&mut target));
            for &part in parts {
                access.set(part, segment.take(part));
            }
            target = ctx.covering(access, start, end).into();
        }
    }
    Ok(target)
}

/// Segment descriptor, resulting node, the slot the accumulated target goes
/// into, and the descriptor fields carried over.
type Access = (&'static str, &'static str, &'static str, &'static [&'static str]);

const ACCESSES: &[Access] = &[
    (INDEX_SEGMENT, ARRAY_INDEX, "array", &["index"]),
    (PROPERTY_SEGMENT, OBJECT_PROPERTY, "object", &["property"]),
    (METHOD_MEMBER, METHOD_CALL, "object", &["method", "args"]),
    (STATIC_METHOD_MEMBER, STATIC_METHOD_CALL, "class", &["method", "args"]),
    (STATIC_PROPERTY_MEMBER, STATIC_PROPERTY, "class", &["property"]),
    (CLASS_CONSTANT_MEMBER, CLASS_CONSTANT, "class", &["constant"]),
    (CALL_MEMBER, FUNCTION_CALL, "func", &["args"]),
];

fn segments(mut member: Node) -> Vec<Node> {
    let group = match member.name {
        INDEX_MEMBERS => "indices",
        PROPERTY_MEMBERS => "properties",
        _ => return vec![member],
    };
    member
        .take(group)
        .into_list()
        .into_iter()
        .filter_map(Value::into_node)
        .collect()
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// `If {condition, consequent, elseifs, alternate}` into an `If` whose
/// `elseif` clauses are nested `If` nodes in the `alternate` slot.
pub fn fold_if(value: Value, ctx: &mut ProcessorContext<'_, '_>) -> Processed {
    let mut node = match value {
        Value::Node(node) => Node::unshare(node),
        other => return Ok(other),
    };
    let mut alternate = node.take("alternate");
    let clauses = node.take("elseifs").into_list();
    let end = end_of(&alternate).or_else(|| clauses.last().and_then(end_of));

    for clause in clauses.into_iter().rev() {
        let Some(mut clause) = clause.into_node() else {
            continue;
        };
        let start = clause.byte_range().map(|(start, _)| start);
        let nested = Node::new(IF)
            .with("condition", clause.take("condition"))
            .with("consequent", clause.take("consequent"))
            .with("alternate", alternate);
        alternate = ctx.covering(nested, start, end).into();
    }

    node.set("alternate", alternate);
    Ok(node.into())
}

/// `Program {leading, statements}` into `Program {statements}`. Leading
/// markup becomes the first statement; empty markup (`?><?php`) is dropped.
pub fn assemble_program(value: Value, _ctx: &mut ProcessorContext<'_, '_>) -> Processed {
    let mut node = match value {
        Value::Node(node) => Node::unshare(node),
        other => return Ok(other),
    };
    let leading = node.take("leading");
    let statements: Vec<Value> = std::iter::once(leading)
        .chain(node.take("statements").into_list())
        .filter(|statement| !is_empty_markup(statement))
        .collect();
    node.set("statements", statements);
    Ok(node.into())
}

fn is_empty_markup(statement: &Value) -> bool {
    match statement {
        Value::Null => true,
        Value::Node(node) if node.is(INLINE_HTML) => node.text("html").map_or(true, str::is_empty),
        _ => false,
    }
}

pub fn check_try(value: Value, ctx: &mut ProcessorContext<'_, '_>) -> Processed {
    let Some(node) = value.as_node() else {
        return Ok(value);
    };
    let has_catch = node.list("catches").is_some_and(|catches| !catches.is_empty());
    let has_finally = node.get("finally").is_some_and(|finally| !finally.is_null());
    if !has_catch && !has_finally {
        return Err(ctx.fatal(TRY_WITHOUT_CATCH_OR_FINALLY));
    }
    Ok(value)
}

/// `__halt_compiler` must be called as `__halt_compiler();`; everything
/// after it is kept verbatim as `data`.
pub fn check_halt_compiler(value: Value, ctx: &mut ProcessorContext<'_, '_>) -> Processed {
    let mut node = match value {
        Value::Node(node) => Node::unshare(node),
        other => return Ok(other),
    };
    if node.take("call").as_bool() != Some(true) {
        return Err(ctx.fatal(MALFORMED_HALT_COMPILER));
    }
    Ok(node.into())
}

pub fn reject_nested_halt_compiler(_value: Value, ctx: &mut ProcessorContext<'_, '_>) -> Processed {
    Err(ctx.fatal(NESTED_HALT_COMPILER))
}
