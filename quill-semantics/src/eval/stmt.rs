//! Statement evaluation
//!
//! Assignment, control flow, and function definition all funnel through
//! here; [`super::expr`] only ever handles the purely expression-shaped
//! nodes. `for`, range-`for`, and `while` all route each iteration's result
//! through [`crate::signal::absorb_loop_signal`] for the same
//! break/continue/return handling, per spec.md §4.3 and §9.

use super::{eval, value, Eval};
use crate::env::Env;
use crate::error::RuntimeError;
use crate::signal::{absorb_loop_signal, Divert, Signal};
use crate::value::{Function, Value};
use quill_syntax::ast::{DateLit, Node};
use std::rc::Rc;

pub(super) fn eval_function_def(node: &Node, env: &mut Env) -> Eval {
    match node {
        Node::FunctionDef { name, params, body, .. } => {
            let func = Function {
                name: name.clone(),
                params: params.clone(),
                body: Rc::new((**body).clone()),
            };
            env.set_global(name.clone(), Value::Function(Rc::new(func)));
            value(Value::Null)
        }
        // No interpreter-level effect: an extern declaration has no body to
        // run and produces no callable binding (SPEC_FULL.md §2).
        Node::ExternFunctionDecl { .. } => value(Value::Null),
        other => unreachable!("{other:?} is not a function-defining statement"),
    }
}

pub(super) fn eval_assignment(node: &Node, env: &mut Env) -> Eval {
    match node {
        Node::AssignStatement { target, expr, .. } => {
            let v = match eval(expr, env)? {
                Signal::Continue(v) => v,
                signal @ Signal::Break(_) => return Ok(signal),
            };
            env.set_global(target.clone(), v);
            value(Value::Null)
        }
        Node::LazyAssignStatement { target, expr, .. } => {
            // Stored unevaluated: every later read of `target` re-runs
            // `expr` against the environment at read time (spec.md §4.3),
            // so this must not evaluate it now.
            env.set_global(target.clone(), Value::Code(Rc::new((**expr).clone())));
            value(Value::Null)
        }
        Node::AugAssignStatement { target, op, expr, .. } => {
            let current = env
                .get(target)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedName(target.clone()))?;
            let rhs = match eval(expr, env)? {
                Signal::Continue(v) => v,
                signal @ Signal::Break(_) => return Ok(signal),
            };
            let result = super::expr::apply_arith(*op, current, rhs)?;
            env.set_global(target.clone(), result);
            value(Value::Null)
        }
        other => unreachable!("{other:?} is not an assignment statement"),
    }
}

pub(super) fn eval_return(expr: Option<&Node>, env: &mut Env) -> Eval {
    let v = match expr {
        None => Value::Null,
        Some(expr) => match eval(expr, env)? {
            Signal::Continue(v) => v,
            signal @ Signal::Break(_) => return Ok(signal),
        },
    };
    Ok(Signal::Break(Divert::Return(v)))
}

pub(super) fn eval_if(condition: &Node, body: &Node, or_else: Option<&Node>, env: &mut Env) -> Eval {
    let cond = match eval(condition, env)? {
        Signal::Continue(v) => v,
        signal @ Signal::Break(_) => return Ok(signal),
    };
    if cond.is_truthy() {
        eval(body, env)
    } else if let Some(or_else) = or_else {
        eval(or_else, env)
    } else {
        value(Value::Null)
    }
}

pub(super) fn eval_statement_list(statements: &[Node], env: &mut Env) -> Eval {
    for statement in statements {
        match eval(statement, env)? {
            Signal::Continue(_) => {}
            signal @ Signal::Break(_) => return Ok(signal),
        }
    }
    value(Value::Null)
}

pub(super) fn eval_for(
    init: Option<&Node>,
    condition: Option<&Node>,
    iter: Option<&Node>,
    body: &Node,
    or_else: Option<&Node>,
    env: &mut Env,
) -> Eval {
    if let Some(init) = init {
        match eval(init, env)? {
            Signal::Continue(_) => {}
            signal @ Signal::Break(_) => return Ok(signal),
        }
    }

    let mut ran_to_completion = true;
    loop {
        let keep_going = match condition {
            None => true,
            Some(condition) => match eval(condition, env)? {
                Signal::Continue(v) => v.is_truthy(),
                signal @ Signal::Break(_) => return Ok(signal),
            },
        };
        if !keep_going {
            break;
        }

        let body_signal = eval(body, env)?;
        match absorb_loop_signal(body_signal) {
            Signal::Continue(stop) => {
                if stop {
                    ran_to_completion = false;
                    break;
                }
            }
            signal @ Signal::Break(_) => return Ok(signal),
        }

        if let Some(iter) = iter {
            match eval(iter, env)? {
                Signal::Continue(_) => {}
                signal @ Signal::Break(_) => return Ok(signal),
            }
        }
    }

    if ran_to_completion {
        if let Some(or_else) = or_else {
            return eval(or_else, env);
        }
    }
    value(Value::Null)
}

pub(super) fn eval_while(condition: &Node, body: &Node, or_else: Option<&Node>, env: &mut Env) -> Eval {
    let mut ran_to_completion = true;
    loop {
        let keep_going = match eval(condition, env)? {
            Signal::Continue(v) => v.is_truthy(),
            signal @ Signal::Break(_) => return Ok(signal),
        };
        if !keep_going {
            break;
        }

        let body_signal = eval(body, env)?;
        match absorb_loop_signal(body_signal) {
            Signal::Continue(stop) => {
                if stop {
                    ran_to_completion = false;
                    break;
                }
            }
            signal @ Signal::Break(_) => return Ok(signal),
        }
    }

    if ran_to_completion {
        if let Some(or_else) = or_else {
            return eval(or_else, env);
        }
    }
    value(Value::Null)
}

pub(super) fn eval_range_for(
    targets: &[String],
    iterable: &Node,
    body: &Node,
    or_else: Option<&Node>,
    env: &mut Env,
) -> Eval {
    let iterable_value = match eval(iterable, env)? {
        Signal::Continue(v) => v,
        signal @ Signal::Break(_) => return Ok(signal),
    };
    let items = materialize_iteration(&iterable_value)?;

    let mut ran_to_completion = true;
    for item in items {
        bind_targets(targets, item, env)?;

        let body_signal = eval(body, env)?;
        match absorb_loop_signal(body_signal) {
            Signal::Continue(stop) => {
                if stop {
                    ran_to_completion = false;
                    break;
                }
            }
            signal @ Signal::Break(_) => return Ok(signal),
        }
    }

    if ran_to_completion {
        if let Some(or_else) = or_else {
            return eval(or_else, env);
        }
    }
    value(Value::Null)
}

/// Expands an iterable `Value` into the sequence of per-iteration values a
/// `RangeBasedForStatement` walks, per `SPEC_FULL.md` §4.1's resolution of
/// spec.md §9's open question: `List`/`Set`/`Tuple` yield their elements in
/// order, `Map` yields `(key, value)` tuples in insertion order, and
/// `DateRange` yields one `Date` per calendar day, inclusive of both ends.
fn materialize_iteration(value: &Value) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::Vector(items) | Value::Tuple(items) | Value::Set(items) => Ok(items.clone()),
        Value::Map(entries) => Ok(entries
            .iter()
            .map(|(k, v)| Value::Tuple(vec![k.clone(), v.clone()]))
            .collect()),
        Value::DateRange(from, to) => Ok(iterate_date_range(*from, *to).map(Value::Date).collect()),
        other => Err(RuntimeError::NotIterable(other.type_name())),
    }
}

/// Binds one iteration's value to `targets`: a single target takes the
/// whole item, two or more targets destructure a `Tuple`/`Vector` of
/// matching length element-wise (used for `Map`'s `(key, value)` pairs).
fn bind_targets(targets: &[String], item: Value, env: &mut Env) -> Result<(), RuntimeError> {
    if targets.len() == 1 {
        env.set_global(targets[0].clone(), item);
        return Ok(());
    }
    match item {
        Value::Tuple(mut elems) | Value::Vector(mut elems) if elems.len() == targets.len() => {
            for target in targets.iter().rev() {
                let v = elems.pop().expect("length checked above");
                env.set_global(target.clone(), v);
            }
            Ok(())
        }
        other => Err(RuntimeError::ArityMismatch {
            name: "<for-target>".to_string(),
            expected: targets.len(),
            got: match &other {
                Value::Tuple(e) | Value::Vector(e) => e.len(),
                _ => 1,
            },
        }),
    }
}

/// Inclusive day-by-day walk from `from` to `to`, using Howard Hinnant's
/// `days_from_civil`/`civil_from_days` proleptic-Gregorian conversion so
/// each step is ordinary calendar arithmetic even though spec.md's date
/// literals admit calendar-invalid day-of-month values like `2022-02-30`
/// (validated only against the literal range 1..=31, never leap years or
/// month lengths — see `SPEC_FULL.md` §4.1). Converting through a day
/// count normalizes any such literal to the real date it denotes before
/// the first step.
fn iterate_date_range(from: DateLit, to: DateLit) -> impl Iterator<Item = DateLit> {
    let start = days_from_civil(from);
    let end = days_from_civil(to);
    (start..=end).map(civil_from_days)
}

fn days_from_civil(date: DateLit) -> i64 {
    let y = i64::from(date.year) - i64::from(date.month <= 2);
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let m = i64::from(date.month);
    let d = i64::from(date.day);
    let doy = (153 * (m + if m > 2 { -3 } else { 9 }) + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(z: i64) -> DateLit {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = mp + if mp < 10 { 3 } else { -9 };
    let y = y + i64::from(m <= 2);
    DateLit { year: y as u16, month: m as u8, day: d as u8 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_round_trips_through_day_count() {
        let d = DateLit { year: 2022, month: 3, day: 1 };
        assert_eq!(civil_from_days(days_from_civil(d)), d);
    }

    #[test]
    fn calendar_invalid_literal_normalizes_forward() {
        // 2022-02-30 has no real calendar meaning; stepping through the day
        // count lands on the first of March, matching ordinary rollover.
        let bogus = DateLit { year: 2022, month: 2, day: 30 };
        let normalized = civil_from_days(days_from_civil(bogus));
        assert_eq!(normalized, DateLit { year: 2022, month: 3, day: 2 });
    }

    #[test]
    fn iterates_inclusive_day_range() {
        let from = DateLit { year: 2022, month: 1, day: 30 };
        let to = DateLit { year: 2022, month: 2, day: 1 };
        let days: Vec<_> = iterate_date_range(from, to).collect();
        assert_eq!(
            days,
            vec![
                DateLit { year: 2022, month: 1, day: 30 },
                DateLit { year: 2022, month: 1, day: 31 },
                DateLit { year: 2022, month: 2, day: 1 },
            ]
        );
    }
}
