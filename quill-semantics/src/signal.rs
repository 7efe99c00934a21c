//! Non-local control flow
//!
//! `break`, `continue`, and `return` all need to unwind past an arbitrary
//! number of enclosing statements without going through `RuntimeError`.
//! [`std::ops::ControlFlow`] models exactly this split: `Continue(T)` is
//! the ordinary "keep evaluating" path, `Break(Divert)` is a signal working
//! its way up to the loop or function call that knows how to consume it.

use crate::value::Value;
use std::ops::ControlFlow;

#[derive(Clone, Debug)]
pub enum Divert {
    Break,
    Continue,
    Return(Value),
}

/// The result of evaluating a statement: either it completed normally with
/// `T` (usually `()` or a final expression [`Value`]), or it produced a
/// [`Divert`] that must propagate to the nearest loop or call frame that
/// handles it.
pub type Signal<T> = ControlFlow<Divert, T>;

/// Runs a loop body's `Signal`, converting `Break`/`Continue` into plain
/// `bool` control (true = stop the loop) and letting `Return` propagate
/// further up by re-wrapping it.
pub(crate) fn absorb_loop_signal(signal: Signal<Value>) -> Signal<bool> {
    match signal {
        ControlFlow::Continue(_) => ControlFlow::Continue(false),
        ControlFlow::Break(Divert::Break) => ControlFlow::Continue(true),
        ControlFlow::Break(Divert::Continue) => ControlFlow::Continue(false),
        ControlFlow::Break(divert @ Divert::Return(_)) => ControlFlow::Break(divert),
    }
}
