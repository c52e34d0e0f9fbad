//! Node tags.
//!
//! Most nodes are tagged with the name (or `capture_as` alias) of the rule
//! that built them. The constants below are the tags the tree-shaping
//! processors create or inspect by hand, plus the statement tags callers
//! match on most often.

// ============================================================================
// PROGRAM STRUCTURE
// ============================================================================

pub const PROGRAM: &str = "Program";
pub const INLINE_HTML: &str = "InlineHtml";
pub const ECHO_STATEMENT: &str = "EchoStatement";
pub const RETURN_STATEMENT: &str = "ReturnStatement";
pub const EXPRESSION_STATEMENT: &str = "ExpressionStatement";
pub const COMPOUND_STATEMENT: &str = "CompoundStatement";
pub const FUNCTION_DECLARATION: &str = "FunctionDeclaration";
pub const IF: &str = "If";
pub const HALT_COMPILER: &str = "HaltCompiler";

// ============================================================================
// EXPRESSIONS
// ============================================================================

pub const BINARY_EXPRESSION: &str = "BinaryExpression";
pub const TERNARY: &str = "Ternary";
pub const ASSIGNMENT: &str = "Assignment";
pub const VARIABLE: &str = "Variable";
pub const VARIABLE_EXPRESSION: &str = "VariableExpression";
pub const STRING: &str = "String";
pub const CONSTANT: &str = "Constant";
pub const PARENT_REFERENCE: &str = "ParentReference";

// Member-access chain results.
pub const ARRAY_INDEX: &str = "ArrayIndex";
pub const OBJECT_PROPERTY: &str = "ObjectProperty";
pub const METHOD_CALL: &str = "MethodCall";
pub const STATIC_PROPERTY: &str = "StaticProperty";
pub const STATIC_METHOD_CALL: &str = "StaticMethodCall";
pub const CLASS_CONSTANT: &str = "ClassConstant";
pub const FUNCTION_CALL: &str = "FunctionCall";

// Literals.
pub const INTEGER: &str = "Integer";
pub const FLOAT: &str = "Float";
pub const BOOLEAN: &str = "Boolean";
pub const NULL: &str = "Null";
pub const STRING_LITERAL: &str = "StringLiteral";
pub const STRING_EXPRESSION: &str = "StringExpression";
pub const HEREDOC: &str = "Heredoc";
pub const NOWDOC: &str = "Nowdoc";

// ============================================================================
// DESCRIPTORS
// ============================================================================
//
// Built by the grammar, consumed by a fold, never present in a finished tree.

pub const FULL_OPERAND: &str = "FullOperand";
pub const SHORTHAND_OPERAND: &str = "ShorthandOperand";
pub const INDEX_MEMBERS: &str = "IndexMembers";
pub const INDEX_SEGMENT: &str = "IndexSegment";
pub const PROPERTY_MEMBERS: &str = "PropertyMembers";
pub const PROPERTY_SEGMENT: &str = "PropertySegment";
pub const METHOD_MEMBER: &str = "MethodMember";
pub const STATIC_METHOD_MEMBER: &str = "StaticMethodMember";
pub const STATIC_PROPERTY_MEMBER: &str = "StaticPropertyMember";
pub const CLASS_CONSTANT_MEMBER: &str = "ClassConstantMember";
pub const CALL_MEMBER: &str = "CallMember";
pub const ELSE_IF: &str = "ElseIf";
