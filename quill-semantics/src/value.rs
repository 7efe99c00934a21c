//! Runtime values
//!
//! One tagged union covers everything a Quill program can hold at
//! runtime. The numeric kinds form a small coercion lattice — `Int64 <
//! UInt64 < Double` — used by [`Value::coerce_numeric_pair`] whenever a
//! binary arithmetic or comparison operator sees two different numeric
//! kinds; the richer kind always wins.

use crate::error::RuntimeError;
use itertools::Itertools as _;
use quill_syntax::ast::{DateLit, Node, Param};
use std::fmt;
use std::rc::Rc;

/// A function value closed over the environment it was defined in.
#[derive(Clone, Debug)]
pub struct Lambda {
    pub params: Vec<Param>,
    pub body: Rc<Node>,
}

/// A named, top-level function defined with `def`.
#[derive(Clone, Debug)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Rc<Node>,
}

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    /// A bare identifier used as a symbolic tag, distinct from `String`
    /// (spec.md §4.3's `Name` value — not the same as a variable lookup,
    /// which never produces one of these).
    Name(String),
    String(String),
    Date(DateLit),
    DateRange(DateLit, DateLit),
    /// An unevaluated expression bound lazily with `:=`; re-evaluated on
    /// every read (spec.md §4.3).
    Code(Rc<Node>),
    Lambda(Rc<Lambda>),
    Function(Rc<Function>),
    Tuple(Vec<Value>),
    Vector(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

/// Relative rank of a numeric kind in the coercion lattice.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
enum NumericRank {
    Int64,
    UInt64,
    Double,
}

impl Value {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Double(_) => "double",
            Value::Name(_) => "name",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateRange(_, _) => "date_range",
            Value::Code(_) => "code",
            Value::Lambda(_) => "lambda",
            Value::Function(_) => "function",
            Value::Tuple(_) => "tuple",
            Value::Vector(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "dict",
        }
    }

    fn numeric_rank(&self) -> Option<NumericRank> {
        match self {
            Value::Int64(_) => Some(NumericRank::Int64),
            Value::UInt64(_) => Some(NumericRank::UInt64),
            Value::Double(_) => Some(NumericRank::Double),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.numeric_rank().is_some()
    }

    /// Truthiness used by `if`, `while`, `and`/`or`, and unary `not`
    /// (spec.md §4.3): `null`, `false`, zero `Int64`/`UInt64`/`Double`, and
    /// the empty `String` are falsy; everything else — including a `Name`
    /// sentinel (which spec.md's truthiness rule never singles out the way
    /// it does `String`) and every container regardless of length — is
    /// truthy. Matches `check_branch_condition_` in
    /// `original_source/src/expressions/interpreter/ast_interpreter.cpp`,
    /// which only special-cases `Null`/`Bool`/`Int64`/`UInt64`/`Double`/
    /// `String` and leaves `flag = true` for everything else, `Tuple`/
    /// `Vector`/`Set`/`Map` included.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int64(n) => *n != 0,
            Value::UInt64(n) => *n != 0,
            Value::Double(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Name(_) | Value::Date(_) | Value::DateRange(_, _) | Value::Code(_)
            | Value::Lambda(_) | Value::Function(_)
            | Value::Tuple(_) | Value::Vector(_) | Value::Set(_) | Value::Map(_) => true,
        }
    }

    /// Widens two numeric values to their common kind, returning both as
    /// `f64` pairs alongside the rank they were widened to, so the caller
    /// can narrow back down for integer-only operators.
    pub(crate) fn coerce_numeric_pair(
        left: &Value,
        right: &Value,
    ) -> Result<(Value, Value), RuntimeError> {
        let (Some(lr), Some(rr)) = (left.numeric_rank(), right.numeric_rank()) else {
            return Err(RuntimeError::InvalidOperandKind {
                kind: left.type_name(),
                other: right.type_name(),
            });
        };
        let rank = lr.max(rr);
        Ok((widen(left, rank), widen(right, rank)))
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(n) => Some(*n as f64),
            Value::UInt64(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }
}

fn widen(value: &Value, to: NumericRank) -> Value {
    match (value, to) {
        (Value::Int64(n), NumericRank::Int64) => Value::Int64(*n),
        (Value::UInt64(n), NumericRank::UInt64) => Value::UInt64(*n),
        (Value::Double(n), NumericRank::Double) => Value::Double(*n),
        (Value::Int64(n), NumericRank::UInt64) => Value::UInt64(*n as u64),
        (Value::Int64(n), NumericRank::Double) => Value::Double(*n as f64),
        (Value::UInt64(n), NumericRank::Double) => Value::Double(*n as f64),
        (Value::UInt64(n), NumericRank::Int64) => Value::Int64(*n as i64),
        (Value::Double(n), NumericRank::Int64) => Value::Int64(*n as i64),
        (Value::Double(n), NumericRank::UInt64) => Value::UInt64(*n as u64),
        (other, _) => other.clone(),
    }
}

impl fmt::Display for Value {
    /// Renders a value the way `print` does (spec.md §6): quoted strings
    /// print without their quotes, dates as `YYYY-MM-DD`, and `Dict`
    /// entries in insertion order as `{k: v, ...}` rather than left empty
    /// (`SPEC_FULL.md` §4.1 fixes the reference's rendering bug here).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int64(n) => write!(f, "{n}"),
            Value::UInt64(n) => write!(f, "{n}"),
            Value::Double(n) => write!(f, "{n}"),
            Value::Name(s) | Value::String(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{:04}-{:02}-{:02}", d.year, d.month, d.day),
            Value::DateRange(from, to) => write!(
                f,
                "{:04}-{:02}-{:02}-{:04}-{:02}-{:02}",
                from.year, from.month, from.day, to.year, to.month, to.day
            ),
            Value::Code(_) => write!(f, "<code>"),
            Value::Lambda(_) => write!(f, "<lambda>"),
            Value::Function(func) => write!(f, "<function {}>", func.name),
            Value::Tuple(items) => write!(f, "({})", items.iter().format(", ")),
            Value::Vector(items) => write!(f, "[{}]", items.iter().format(", ")),
            Value::Set(items) => write!(f, "<<?{}?>>", items.iter().format(", ")),
            Value::Map(entries) => write!(
                f,
                "{{{}}}",
                entries.iter().format_with(", ", |(k, v), fmt| fmt(&format_args!("{k}: {v}")))
            ),
        }
    }
}
