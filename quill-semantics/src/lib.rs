//! Tree-walking evaluation of a Quill [`quill_syntax::ast::Node::Entry`].
//!
//! [`execute`] is the single public entry point: it walks the AST produced
//! by `quill_syntax::parse_to_ast`, evaluating every node against a
//! [`Env`] (one global map plus a stack of call-frame locals), and returns
//! the program's final [`Value`]. Control-flow effects (`break`, `continue`,
//! `return`) are modeled as [`signal::Divert`]s that unwind through
//! [`std::ops::ControlFlow`] rather than `Err`; only genuine contract
//! violations (an undefined name, a type error, wrong arity) surface as
//! [`RuntimeError`].

mod eval;
mod signal;

pub mod env;
pub mod error;
pub mod value;

pub use env::Env;
pub use error::RuntimeError;
pub use value::{Function, Lambda, Value};

use quill_syntax::ast::Node;
use signal::{Divert, Signal};

/// Evaluates `entry` from a fresh, empty environment.
///
/// # Errors
///
/// Returns the first [`RuntimeError`] the evaluation encounters; per
/// spec.md §7 this aborts the whole `execute` call rather than attempting
/// any recovery.
pub fn execute(entry: &Node) -> Result<Value, RuntimeError> {
    let mut env = Env::new();
    execute_with_env(entry, &mut env)
}

/// Evaluates `entry` against a caller-supplied [`Env`], so a host can seed
/// globals (or inspect them afterwards) across multiple `execute` calls
/// that share state. Any stray `break`/`continue` that escapes all the way
/// to the program root is absorbed as `Null` rather than raised, matching
/// spec.md §4.3's "`Entry`: ... catching any stray signals".
pub fn execute_with_env(entry: &Node, env: &mut Env) -> Result<Value, RuntimeError> {
    match eval::eval(entry, env)? {
        Signal::Continue(v) => Ok(v),
        Signal::Break(Divert::Return(v)) => Ok(v),
        Signal::Break(Divert::Break | Divert::Continue) => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Value {
        let entry = quill_syntax::parse_to_ast(src).expect("parse_to_ast should succeed");
        execute(&entry).expect("execute should succeed")
    }

    #[test]
    fn arithmetic_respects_precedence() {
        assert_matches::assert_matches!(
            run("package p; x = 1 + 2 * 3; return x;"),
            Value::Int64(7)
        );
    }

    #[test]
    fn chained_comparison_short_circuits() {
        assert_matches::assert_matches!(run("package p; return 1 < 2 < 3;"), Value::Bool(true));
        assert_matches::assert_matches!(run("package p; return 1 < 2 > 3;"), Value::Bool(false));
    }

    #[test]
    fn lazy_assignment_rereads_on_every_lookup() {
        assert_matches::assert_matches!(
            run("package p; x := y + 1; y = 10; return x;"),
            Value::Int64(11)
        );
    }

    #[test]
    fn loop_else_runs_only_on_normal_exit() {
        assert_matches::assert_matches!(
            run(
                "package p; s = \"\"; i = 0; \
                 while (i < 3) { s = s + \"a\"; i = i + 1; } else { s = s + \"!\"; } \
                 return s;"
            ),
            Value::String(ref s) if s == "aaa!"
        );
        assert_matches::assert_matches!(
            run("package p; i = 0; while (i < 3) { break; } else { i = 99; } return i;"),
            Value::Int64(0)
        );
    }
}
