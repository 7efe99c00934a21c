//! Expression evaluation

use super::{builtins, eval, value, Eval};
use crate::env::Env;
use crate::error::RuntimeError;
use crate::signal::{Divert, Signal};
use crate::value::{Function, Lambda, Value};
use quill_syntax::ast::{ArithOp, BoolOp, CompareOp, Node, UnaryOp};
use std::collections::HashMap;
use std::rc::Rc;

pub(super) fn eval_expr(node: &Node, env: &mut Env) -> Eval {
    match node {
        Node::Null => value(Value::Null),
        Node::Ellipsis => value(Value::Null),
        Node::Bool(b) => value(Value::Bool(*b)),
        Node::Int64 { value: v, .. } => value(Value::Int64(*v)),
        Node::UInt64 { value: v, .. } => value(Value::UInt64(*v)),
        Node::Double { value: v, .. } => value(Value::Double(*v)),
        Node::Name(name) => eval_name(name, env),
        Node::String(s) => value(Value::String(s.clone())),
        Node::QuotedString(s) => value(Value::String(s.clone())),
        Node::Date(d) => value(Value::Date(*d)),
        Node::DateRange(from, to) => value(Value::DateRange(*from, *to)),

        Node::Tuple(items) => eval_sequence(items, env).map(|s| s.map(Value::Tuple)),
        Node::List(items) => eval_sequence(items, env).map(|s| s.map(Value::Vector)),
        Node::Set(items) => eval_sequence(items, env).map(|s| {
            s.map(|items| {
                let mut set: Vec<Value> = Vec::new();
                for item in items {
                    if !set.iter().any(|existing| values_equal(existing, &item)) {
                        set.push(item);
                    }
                }
                Value::Set(set)
            })
        }),
        Node::Dict(entries) => eval_dict(entries, env),

        Node::UnaryOp { op, operand } => eval_unary(*op, operand, env),
        Node::BoolOp { op, operands } => eval_bool_op(*op, operands, env),
        Node::CompareOp { first, rest } => eval_compare(first, rest, env),
        Node::BinOp { left, op, right } => eval_binop(*op, left, right, env),

        Node::Call { callee, args } => eval_call(callee, args, env),
        Node::Subscript { target, index } => eval_subscript(target, index, env),

        Node::Lambda { params, body } => value(Value::Lambda(Rc::new(Lambda {
            params: params.clone(),
            body: Rc::new((**body).clone()),
        }))),

        other => unreachable!("{other:?} is not an expression node"),
    }
}

/// A name that resolves to a `Code` thunk re-evaluates it against the
/// *current* environment on every lookup (spec.md §4.3's non-memoizing
/// `:=`). A name with no binding at all is not a `RuntimeError`: it
/// evaluates to a `Name` sentinel carrying its own text, so that later
/// contexts (comparisons, membership tests, `print`) can still inspect
/// what was asked for instead of aborting the whole evaluation.
fn eval_name(name: &str, env: &mut Env) -> Eval {
    match env.get(name).cloned() {
        Some(Value::Code(thunk)) => eval(&thunk, env),
        Some(v) => value(v),
        None => value(Value::Name(name.to_string())),
    }
}

fn eval_sequence(items: &[Node], env: &mut Env) -> Result<Signal<Vec<Value>>, RuntimeError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match eval(item, env)? {
            Signal::Continue(v) => out.push(v),
            Signal::Break(divert) => return Ok(Signal::Break(divert)),
        }
    }
    Ok(Signal::Continue(out))
}

fn eval_dict(entries: &[(Node, Node)], env: &mut Env) -> Eval {
    let mut out = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let key = match eval(k, env)? {
            Signal::Continue(v) => v,
            Signal::Break(divert) => return Ok(Signal::Break(divert)),
        };
        let val = match eval(v, env)? {
            Signal::Continue(v) => v,
            Signal::Break(divert) => return Ok(Signal::Break(divert)),
        };
        if let Some(slot) = out.iter_mut().find(|(k, _): &&mut (Value, Value)| values_equal(k, &key)) {
            slot.1 = val;
        } else {
            out.push((key, val));
        }
    }
    value(Value::Map(out))
}

fn eval_unary(op: UnaryOp, operand: &Node, env: &mut Env) -> Eval {
    let operand = match eval(operand, env)? {
        Signal::Continue(v) => v,
        signal @ Signal::Break(_) => return Ok(signal),
    };
    let result = match op {
        UnaryOp::Not => Value::Bool(!operand.is_truthy()),
        UnaryOp::Plus => match operand {
            Value::Int64(_) | Value::UInt64(_) | Value::Double(_) => operand,
            other => {
                return Err(RuntimeError::InvalidOperandKind { kind: other.type_name(), other: "unary +" })
            }
        },
        UnaryOp::Minus => match operand {
            Value::Int64(n) => Value::Int64(-n),
            Value::UInt64(n) => Value::Int64(-(n as i64)),
            Value::Double(n) => Value::Double(-n),
            other => {
                return Err(RuntimeError::InvalidOperandKind { kind: other.type_name(), other: "unary -" })
            }
        },
    };
    value(result)
}

fn eval_bool_op(op: BoolOp, operands: &[Node], env: &mut Env) -> Eval {
    let mut last = Value::Bool(matches!(op, BoolOp::And));
    for operand in operands {
        let v = match eval(operand, env)? {
            Signal::Continue(v) => v,
            signal @ Signal::Break(_) => return Ok(signal),
        };
        let truthy = v.is_truthy();
        last = Value::Bool(truthy);
        match op {
            BoolOp::And if !truthy => return value(Value::Bool(false)),
            BoolOp::Or if truthy => return value(Value::Bool(true)),
            _ => {}
        }
    }
    value(last)
}

fn eval_compare(first: &Node, rest: &[(CompareOp, Node)], env: &mut Env) -> Eval {
    let mut left = match eval(first, env)? {
        Signal::Continue(v) => v,
        signal @ Signal::Break(_) => return Ok(signal),
    };
    for (op, rhs) in rest {
        let right = match eval(rhs, env)? {
            Signal::Continue(v) => v,
            signal @ Signal::Break(_) => return Ok(signal),
        };
        if !compare(*op, &left, &right)? {
            return value(Value::Bool(false));
        }
        left = right;
    }
    value(Value::Bool(true))
}

fn values_equal(a: &Value, b: &Value) -> bool {
    use Value::*;
    match (a, b) {
        (Null, Null) => true,
        (Bool(x), Bool(y)) => x == y,
        (Name(x), Name(y)) | (String(x), String(y)) => x == y,
        (Date(x), Date(y)) => x == y,
        (DateRange(x1, x2), DateRange(y1, y2)) => x1 == y1 && x2 == y2,
        (Tuple(x), Tuple(y)) | (Vector(x), Vector(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Set(x), Set(y)) => {
            x.len() == y.len() && x.iter().all(|a| y.iter().any(|b| values_equal(a, b)))
        }
        (Map(x), Map(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| {
                    y.iter().any(|(k2, v2)| values_equal(k, k2) && values_equal(v, v2))
                })
        }
        _ if a.is_numeric() && b.is_numeric() => {
            a.as_f64().zip(b.as_f64()).map(|(x, y)| x == y).unwrap_or(false)
        }
        _ => false,
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    match op {
        CompareOp::Eq => Ok(values_equal(left, right)),
        CompareOp::Neq => Ok(!values_equal(left, right)),
        CompareOp::In | CompareOp::NotIn => {
            let found = match right {
                Value::Tuple(items) | Value::Vector(items) | Value::Set(items) => {
                    items.iter().any(|item| values_equal(item, left))
                }
                Value::Map(entries) => entries.iter().any(|(k, _)| values_equal(k, left)),
                Value::String(s) => match left {
                    Value::String(needle) => s.contains(needle.as_str()),
                    _ => false,
                },
                other => return Err(RuntimeError::NotIterable(other.type_name())),
            };
            Ok(if matches!(op, CompareOp::In) { found } else { !found })
        }
        CompareOp::Lt | CompareOp::Lte | CompareOp::Gt | CompareOp::Gte => {
            let ordering = ordered_compare(left, right)?;
            Ok(match op {
                CompareOp::Lt => ordering.is_lt(),
                CompareOp::Lte => ordering.is_le(),
                CompareOp::Gt => ordering.is_gt(),
                CompareOp::Gte => ordering.is_ge(),
                _ => unreachable!(),
            })
        }
    }
}

fn ordered_compare(left: &Value, right: &Value) -> Result<std::cmp::Ordering, RuntimeError> {
    if left.is_numeric() && right.is_numeric() {
        let (l, r) = (left.as_f64().unwrap(), right.as_f64().unwrap());
        return l.partial_cmp(&r).ok_or(RuntimeError::DivisionByZero);
    }
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Ok((a.year, a.month, a.day).cmp(&(b.year, b.month, b.day))),
        _ => Err(RuntimeError::UnsupportedComparison {
            op: "ordering",
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

fn eval_binop(op: ArithOp, left: &Node, right: &Node, env: &mut Env) -> Eval {
    let left = match eval(left, env)? {
        Signal::Continue(v) => v,
        signal @ Signal::Break(_) => return Ok(signal),
    };
    let right = match eval(right, env)? {
        Signal::Continue(v) => v,
        signal @ Signal::Break(_) => return Ok(signal),
    };
    value(apply_arith(op, left, right)?)
}

/// Applies a [`BinOp`](quill_syntax::ast::Node::BinOp)-style arithmetic
/// operator to two already-evaluated values. Shared by expression `BinOp`
/// evaluation and by [`super::stmt`]'s `AugAssignStatement` handling, which
/// needs the exact same numeric tower without re-parsing a `BinOp` node.
///
/// Per spec.md §4.3 ("Non-numeric, non-String operands yield Null"),
/// confirmed against `execute_bin_op_`'s `generic_bin_op` in
/// `original_source/src/expressions/interpreter/ast_interpreter.cpp`, any
/// pair the numeric tower and the `Add`-on-`String` case don't cover falls
/// through to `Null` rather than a `RuntimeError` — that includes
/// `String`s combined with anything but `Add`.
pub(super) fn apply_arith(op: ArithOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    if let (Value::String(a), Value::String(b)) = (&left, &right) {
        return Ok(match op {
            ArithOp::Add => Value::String(format!("{a}{b}")),
            _ => Value::Null,
        });
    }

    if !left.is_numeric() || !right.is_numeric() {
        return Ok(Value::Null);
    }

    let (l, r) = Value::coerce_numeric_pair(&left, &right)?;
    Ok(match (&l, &r) {
        (Value::Int64(a), Value::Int64(b)) => int_binop(op, *a, *b)?,
        (Value::UInt64(a), Value::UInt64(b)) => uint_binop(op, *a, *b)?,
        (Value::Double(a), Value::Double(b)) => double_binop(op, *a, *b)?,
        _ => unreachable!("coerce_numeric_pair always widens to a matching pair"),
    })
}

/// `FloorDiv`/`Mod` truncate toward zero (the CPU's native `/`/`%`), not
/// Euclidean floor/positive-remainder division, matching `kFloorDiv`/`kMod`
/// in `original_source/src/expressions/interpreter/ast_interpreter.cpp`
/// (`static_cast<int64_t>(a / b)` / plain `a % b`) and spec.md §4.3's
/// "truncated via cast to Int64".
fn int_binop(op: ArithOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
    Ok(match op {
        ArithOp::Add => Value::Int64(a.wrapping_add(b)),
        ArithOp::Sub => Value::Int64(a.wrapping_sub(b)),
        ArithOp::Mult => Value::Int64(a.wrapping_mul(b)),
        ArithOp::FloorDiv => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Int64(a.wrapping_div(b))
        }
        ArithOp::Mod => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Int64(a.wrapping_rem(b))
        }
        ArithOp::TrueDiv => Value::Double(a as f64 / b as f64),
        ArithOp::Pow => Value::Double((a as f64).powf(b as f64)),
    })
}

fn uint_binop(op: ArithOp, a: u64, b: u64) -> Result<Value, RuntimeError> {
    Ok(match op {
        ArithOp::Add => Value::UInt64(a.wrapping_add(b)),
        ArithOp::Sub => Value::UInt64(a.wrapping_sub(b)),
        ArithOp::Mult => Value::UInt64(a.wrapping_mul(b)),
        ArithOp::FloorDiv => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::UInt64(a / b)
        }
        ArithOp::Mod => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::UInt64(a % b)
        }
        ArithOp::TrueDiv => Value::Double(a as f64 / b as f64),
        ArithOp::Pow => Value::Double((a as f64).powf(b as f64)),
    })
}

/// `FloorDiv` on two `Double`s narrows to `Int64` by truncating toward zero
/// (`static_cast<int64_t>(a / b)` in `ast_interpreter.cpp`, matching
/// spec.md §4.3's "truncated via cast to Int64" — the result is an integer
/// kind even though both operands were `Double`). Every other operator
/// stays `Double`.
fn double_binop(op: ArithOp, a: f64, b: f64) -> Result<Value, RuntimeError> {
    Ok(match op {
        ArithOp::Add => Value::Double(a + b),
        ArithOp::Sub => Value::Double(a - b),
        ArithOp::Mult => Value::Double(a * b),
        ArithOp::TrueDiv => Value::Double(a / b),
        ArithOp::FloorDiv => {
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Int64((a / b).trunc() as i64)
        }
        ArithOp::Mod => Value::Double(a % b),
        ArithOp::Pow => Value::Double(a.powf(b)),
    })
}

fn eval_subscript(target: &str, index: &Node, env: &mut Env) -> Eval {
    let container = match env.get(target).cloned() {
        Some(v) => v,
        None => return Err(RuntimeError::UndefinedName(target.to_string())),
    };
    let index = match eval(index, env)? {
        Signal::Continue(v) => v,
        signal @ Signal::Break(_) => return Ok(signal),
    };
    match &container {
        Value::Vector(items) | Value::Tuple(items) => {
            let i = index_to_usize(&index, items.len())?;
            items
                .get(i)
                .cloned()
                .map(value)
                .unwrap_or_else(|| Err(RuntimeError::IndexOutOfRange(index.to_string())))
        }
        Value::Map(entries) => entries
            .iter()
            .find(|(k, _)| values_equal(k, &index))
            .map(|(_, v)| value(v.clone()))
            .unwrap_or_else(|| Err(RuntimeError::IndexOutOfRange(index.to_string())))?,
        other => Err(RuntimeError::NotSubscriptable(other.type_name())),
    }
}

fn index_to_usize(index: &Value, len: usize) -> Result<usize, RuntimeError> {
    let i = match index {
        Value::Int64(n) => *n,
        Value::UInt64(n) => *n as i64,
        other => return Err(RuntimeError::NotSubscriptable(other.type_name())),
    };
    let resolved = if i < 0 { len as i64 + i } else { i };
    if resolved < 0 || resolved as usize >= len {
        return Err(RuntimeError::IndexOutOfRange(i.to_string()));
    }
    Ok(resolved as usize)
}

fn eval_call(callee: &str, args: &[Node], env: &mut Env) -> Eval {
    let mut positional = Vec::new();
    let mut named = HashMap::new();
    for arg in args {
        match arg {
            Node::Argument(a) => match eval(&a.expr, env)? {
                Signal::Continue(v) => positional.push(v),
                signal @ Signal::Break(_) => return Ok(signal),
            },
            Node::KeywordArgument(a) => match eval(&a.expr, env)? {
                Signal::Continue(v) => {
                    named.insert(a.name.clone(), v);
                }
                signal @ Signal::Break(_) => return Ok(signal),
            },
            other => unreachable!("{other:?} cannot appear in a call argument list"),
        }
    }

    if builtins::is_builtin(callee) {
        return builtins::call(callee, positional).map(Signal::Continue);
    }

    let callable = match env.get(callee).cloned() {
        Some(v) => v,
        None => return Err(RuntimeError::NotCallable(callee.to_string())),
    };
    let (params, body): (Vec<String>, Rc<Node>) = match callable {
        Value::Lambda(lambda) => (lambda.params.clone(), Rc::clone(&lambda.body)),
        Value::Function(func) => (func.params.clone(), Rc::clone(&func.body)),
        _ => return Err(RuntimeError::NotCallable(callee.to_string())),
    };

    bind_and_call(&params, &body, positional, named, env)
}

fn bind_and_call(
    params: &[String],
    body: &Node,
    positional: Vec<Value>,
    mut named: HashMap<String, Value>,
    env: &mut Env,
) -> Eval {
    if positional.len() > params.len() {
        return Err(RuntimeError::ArityMismatch {
            name: "<call>".to_string(),
            expected: params.len(),
            got: positional.len(),
        });
    }

    let positional_count = positional.len();
    let mut locals = HashMap::new();
    for (param, arg) in params.iter().zip(positional) {
        locals.insert(param.clone(), arg);
    }
    for param in &params[positional_count..] {
        if let Some(v) = named.remove(param) {
            locals.insert(param.clone(), v);
        }
    }
    if let Some((name, _)) = named.into_iter().next() {
        return Err(RuntimeError::UnknownKeywordArgument(name));
    }
    if locals.len() != params.len() {
        return Err(RuntimeError::ArityMismatch {
            name: "<call>".to_string(),
            expected: params.len(),
            got: locals.len(),
        });
    }

    env.push_frame(locals);
    let result = eval(body, env);
    env.pop_frame();

    match result? {
        Signal::Continue(v) => value(v),
        Signal::Break(Divert::Return(v)) => value(v),
        Signal::Break(Divert::Break) => Err(RuntimeError::BreakOutsideLoop),
        Signal::Break(Divert::Continue) => Err(RuntimeError::ContinueOutsideLoop),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_floor_div_and_mod_truncate_toward_zero() {
        assert_matches::assert_matches!(
            apply_arith(ArithOp::FloorDiv, Value::Int64(-7), Value::Int64(2)),
            Ok(Value::Int64(-3))
        );
        assert_matches::assert_matches!(
            apply_arith(ArithOp::Mod, Value::Int64(-7), Value::Int64(2)),
            Ok(Value::Int64(-1))
        );
    }

    #[test]
    fn double_floor_div_truncates_and_narrows_to_int64() {
        assert_matches::assert_matches!(
            apply_arith(ArithOp::FloorDiv, Value::Double(7.0), Value::Double(2.0)),
            Ok(Value::Int64(3))
        );
        assert_matches::assert_matches!(
            apply_arith(ArithOp::FloorDiv, Value::Double(-7.0), Value::Double(2.0)),
            Ok(Value::Int64(-3))
        );
    }

    #[test]
    fn double_floor_div_by_zero_is_a_runtime_error() {
        assert_matches::assert_matches!(
            apply_arith(ArithOp::FloorDiv, Value::Double(1.0), Value::Double(0.0)),
            Err(RuntimeError::DivisionByZero)
        );
    }
}
