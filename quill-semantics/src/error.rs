//! Runtime errors
//!
//! Every failure the interpreter can produce, excluding the non-local
//! control-flow exits modeled by [`crate::signal::Divert`] — those are not
//! errors, they are the normal mechanism for `break`/`continue`/`return`.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RuntimeError {
    #[error("undefined name {0:?}")]
    UndefinedName(String),

    #[error("{0:?} is not callable")]
    NotCallable(String),

    #[error("{name} expects {expected} argument(s), got {got}")]
    ArityMismatch { name: String, expected: usize, got: usize },

    #[error("unknown keyword argument {0:?}")]
    UnknownKeywordArgument(String),

    #[error("cannot assign to {0}")]
    InvalidAssignmentTarget(String),

    #[error("{kind} does not support this operation with {other}")]
    InvalidOperandKind { kind: &'static str, other: &'static str },

    #[error("{op} is not defined between {left} and {right}")]
    UnsupportedComparison { op: &'static str, left: &'static str, right: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("index {0} out of range")]
    IndexOutOfRange(String),

    #[error("{0} is not subscriptable")]
    NotSubscriptable(&'static str),

    #[error("{0} is not iterable")]
    NotIterable(&'static str),

    #[error("break outside a loop")]
    BreakOutsideLoop,

    #[error("continue outside a loop")]
    ContinueOutsideLoop,

    #[error("unknown builtin {0:?}")]
    UnknownBuiltin(String),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
