//! Abstract syntax tree
//!
//! `Node` is the single recursive tagged union produced by the [parser](crate::parser)
//! and rewritten in place (top to bottom) by the [normalizing transformer](crate::transform).
//! The interpreter (in the `quill-semantics` crate) only ever reads this tree.
//!
//! Recursive fields are boxed to keep `Node`'s stack footprint bounded; the
//! tree has a single owner (the `Entry` that contains it), so plain `Box`
//! indirection is enough — nothing here is shared or reference-counted.

use crate::source::Span;

/// Binary arithmetic operators, shared between [`BinOp`](Node::BinOp) and
/// [`AugAssignStatement`](Node::AugAssignStatement).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mult,
    TrueDiv,
    FloorDiv,
    Mod,
    Pow,
}

/// Chained comparison operators.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
}

/// Short-circuiting boolean operators.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

/// Unary operators.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum UnaryOp {
    Not,
    Plus,
    Minus,
}

/// A calendar date, validated only against the literal field ranges given in
/// spec.md (year 1900-2100, month 1-12, day 1-31); leap years and month
/// lengths are deliberately not checked (see `SPEC_FULL.md` §4.1).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DateLit {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// A positional function argument.
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub expr: Box<Node>,
}

/// A `name: expr` keyword argument.
#[derive(Clone, Debug, PartialEq)]
pub struct KeywordArgument {
    pub name: String,
    pub expr: Box<Node>,
}

/// A lambda or function parameter name. Quill has no default values or
/// variadics, matching spec.md's `Lambda`/`FunctionDef` parameter lists.
pub type Param = String;

/// A decorator attached to a [`FunctionDef`](Node::FunctionDef) or
/// [`ExternFunctionDecl`](Node::ExternFunctionDecl), e.g. `@cached` or
/// `@route("/x")`. Decorators are retained on the AST but have no
/// interpreter-level effect (see `SPEC_FULL.md` §2).
#[derive(Clone, Debug, PartialEq)]
pub struct Decorator {
    pub name: String,
    pub args: Vec<Node>,
}

/// The recursive AST node.
///
/// See spec.md §3 for the authoritative attribute list per variant; this
/// enum follows it one-to-one.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Null,
    Ellipsis,
    Pass,
    Break,
    Continue,

    Bool(bool),

    /// Integer literal. `lexeme` preserves the exact source text (spec.md
    /// requires literal lexemes survive unchanged).
    Int64 { value: i64, lexeme: String },
    UInt64 { value: u64, lexeme: String },
    Double { value: f64, lexeme: String },

    /// Identifier; may contain `.` and `_` per spec.md's `id` token.
    Name(String),

    /// Unquoted symbolic string produced by some grammar rules.
    String(String),
    /// A `"..."`-quoted string literal, escapes already resolved.
    QuotedString(String),

    Date(DateLit),
    DateRange(DateLit, DateLit),

    Tuple(Vec<Node>),
    List(Vec<Node>),
    Set(Vec<Node>),
    Dict(Vec<(Node, Node)>),

    UnaryOp { op: UnaryOp, operand: Box<Node> },
    BoolOp { op: BoolOp, operands: Vec<Node> },
    CompareOp { first: Box<Node>, rest: Vec<(CompareOp, Node)> },
    BinOp { left: Box<Node>, op: ArithOp, right: Box<Node> },

    /// Transient left-to-right operator chain produced by the parser.
    /// Folded into nested [`BinOp`](Node::BinOp) nodes by the normalizing
    /// transformer; must never survive it (spec.md §3 invariant).
    BinOpIntermediate { first: Box<Node>, rest: Vec<(ArithOp, Node)> },

    Call { callee: String, args: Vec<Node> },
    Argument(Argument),
    KeywordArgument(KeywordArgument),
    Subscript { target: String, index: Box<Node> },

    Lambda { params: Vec<Param>, body: Box<Node> },
    FunctionDef {
        decorators: Vec<Decorator>,
        name: String,
        params: Vec<Param>,
        body: Box<Node>,
    },
    ExternFunctionDecl {
        decorators: Vec<Decorator>,
        name: String,
        params: Vec<Param>,
        return_type: String,
    },

    AssignStatement { target: String, expr: Box<Node>, span: Span },
    LazyAssignStatement { target: String, expr: Box<Node>, span: Span },
    AugAssignStatement { target: String, op: ArithOp, expr: Box<Node>, span: Span },

    ReturnStatement { expr: Option<Box<Node>>, span: Span },

    IfStatement {
        condition: Box<Node>,
        body: Box<Node>,
        or_else: Option<Box<Node>>,
        span: Span,
    },
    ForStatement {
        init: Option<Box<Node>>,
        condition: Option<Box<Node>>,
        iter: Option<Box<Node>>,
        body: Box<Node>,
        or_else: Option<Box<Node>>,
        span: Span,
    },
    RangeBasedForStatement {
        targets: Vec<String>,
        iterable: Box<Node>,
        body: Box<Node>,
        or_else: Option<Box<Node>>,
        span: Span,
    },
    WhileStatement {
        condition: Box<Node>,
        body: Box<Node>,
        or_else: Option<Box<Node>>,
        span: Span,
    },

    StatementList(Vec<Node>),

    PackageName(String),
    ImportPackage(String),

    Entry { package: String, body: Box<Node>, span: Span },
}
