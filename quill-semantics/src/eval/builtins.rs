//! The `print` builtin
//!
//! spec.md §4.3 special-cases exactly one callee: `print(...)`. Everything
//! else resolves through the ordinary `Lambda`/`Function` call path in
//! [`super::expr`]. Keeping it in its own module mirrors how a teacher-style
//! interpreter keeps its handful of intrinsics out of the general call
//! dispatcher.

use crate::error::RuntimeError;
use crate::value::Value;

/// True if `name` names a builtin rather than a user-defined callable.
/// Builtins shadow any same-named `Lambda`/`Function` binding, matching
/// spec.md §4.3's "special-case builtin `print(...)`" wording.
#[must_use]
pub(super) fn is_builtin(name: &str) -> bool {
    name == "print"
}

/// Invokes the builtin named `name` with already-evaluated positional
/// arguments. Keyword arguments are not accepted by any builtin.
pub(super) fn call(name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
    match name {
        "print" => {
            print(&args);
            Ok(Value::Null)
        }
        other => Err(RuntimeError::UnknownBuiltin(other.to_string())),
    }
}

/// Renders `args` space-separated, terminated by a newline, per spec.md §6.
fn print(args: &[Value]) {
    let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
    println!("{}", rendered.join(" "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_print_and_nothing_else() {
        assert!(is_builtin("print"));
        assert!(!is_builtin("len"));
    }

    #[test]
    fn unknown_builtin_is_an_error() {
        let err = call("frobnicate", vec![]).unwrap_err();
        assert_matches::assert_matches!(err, RuntimeError::UnknownBuiltin(_));
    }
}
