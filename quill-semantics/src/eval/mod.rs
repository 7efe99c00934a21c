//! Tree-walking evaluation
//!
//! Mirrors the "what does running this node do" pattern the teacher
//! built around a single `execute`-style entry point: [`eval`] dispatches
//! over every [`Node`] variant, expression and statement alike, since
//! Quill's grammar does not separate the two at the type level.

mod builtins;
mod expr;
mod stmt;

use crate::env::Env;
use crate::error::RuntimeError;
use crate::signal::Signal;
use crate::value::Value;
use quill_syntax::ast::Node;

/// The result of evaluating one node: `Ok(Signal::Continue(value))` on
/// ordinary completion, `Ok(Signal::Break(divert))` when a
/// `break`/`continue`/`return` is unwinding past this node, or `Err` on a
/// [`RuntimeError`].
pub(crate) type Eval = Result<Signal<Value>, RuntimeError>;

pub(crate) fn value(v: Value) -> Eval {
    Ok(Signal::Continue(v))
}

/// Evaluates any node, expression or statement.
pub(crate) fn eval(node: &Node, env: &mut Env) -> Eval {
    match node {
        Node::Null
        | Node::Ellipsis
        | Node::Bool(_)
        | Node::Int64 { .. }
        | Node::UInt64 { .. }
        | Node::Double { .. }
        | Node::Name(_)
        | Node::String(_)
        | Node::QuotedString(_)
        | Node::Date(_)
        | Node::DateRange(_, _)
        | Node::Tuple(_)
        | Node::List(_)
        | Node::Set(_)
        | Node::Dict(_)
        | Node::UnaryOp { .. }
        | Node::BoolOp { .. }
        | Node::CompareOp { .. }
        | Node::BinOp { .. }
        | Node::Call { .. }
        | Node::Subscript { .. }
        | Node::Lambda { .. } => expr::eval_expr(node, env),

        Node::BinOpIntermediate { .. } => unreachable!(
            "BinOpIntermediate must be folded away by quill_syntax::transform::normalize before evaluation"
        ),
        Node::Argument(_) | Node::KeywordArgument(_) => {
            unreachable!("Argument/KeywordArgument are only ever evaluated from within a Call")
        }

        Node::Pass => value(Value::Null),
        Node::Break => Ok(Signal::Break(crate::signal::Divert::Break)),
        Node::Continue => Ok(Signal::Break(crate::signal::Divert::Continue)),

        Node::FunctionDef { .. } | Node::ExternFunctionDecl { .. } => {
            stmt::eval_function_def(node, env)
        }
        Node::AssignStatement { .. }
        | Node::LazyAssignStatement { .. }
        | Node::AugAssignStatement { .. } => stmt::eval_assignment(node, env),
        Node::ReturnStatement { expr, .. } => stmt::eval_return(expr.as_deref(), env),
        Node::IfStatement { condition, body, or_else, .. } => {
            stmt::eval_if(condition, body, or_else.as_deref(), env)
        }
        Node::ForStatement { init, condition, iter, body, or_else, .. } => {
            stmt::eval_for(init.as_deref(), condition.as_deref(), iter.as_deref(), body, or_else.as_deref(), env)
        }
        Node::RangeBasedForStatement { targets, iterable, body, or_else, .. } => {
            stmt::eval_range_for(targets, iterable, body, or_else.as_deref(), env)
        }
        Node::WhileStatement { condition, body, or_else, .. } => {
            stmt::eval_while(condition, body, or_else.as_deref(), env)
        }
        Node::StatementList(statements) => stmt::eval_statement_list(statements, env),

        Node::PackageName(_) | Node::ImportPackage(_) => value(Value::Null),

        Node::Entry { body, .. } => eval(body, env),
    }
}
