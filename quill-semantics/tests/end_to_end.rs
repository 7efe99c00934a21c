//! End-to-end parse-then-execute scenarios from spec.md §8.
//!
//! `print` writes to stdout rather than returning a value, so each scenario
//! is expressed with an explicit trailing `return` of whatever `print`
//! would have rendered, and asserted against [`Value`]'s `Display` output
//! (spec.md §6's rendering rules) rather than captured stdout.

use quill_semantics::{execute, Env, RuntimeError, Value};

fn run(src: &str) -> Value {
    let entry = quill_syntax::parse_to_ast(src).expect("parse_to_ast should succeed");
    execute(&entry).expect("execute should succeed")
}

#[test]
fn scenario_1_arithmetic_precedence() {
    assert_eq!(run("package p; x = 1 + 2 * 3; return x;").to_string(), "7");
}

#[test]
fn scenario_2_function_call_with_two_params() {
    assert_eq!(
        run("package p; def f(a, b) { return a + b; } return f(3, 4);").to_string(),
        "7"
    );
}

#[test]
fn scenario_3_classic_for_concatenates_strings() {
    assert_eq!(
        run(r#"package p; s = ""; for (i = 0; i < 3; i += 1) { s = s + "a"; } return s;"#)
            .to_string(),
        "aaa"
    );
}

#[test]
fn scenario_4_short_circuit_and_chained_comparison() {
    assert_eq!(run("package p; return 1 < 2 and 2 < 3;").to_string(), "true");
    assert_eq!(run("package p; return 1 < 2 < 3;").to_string(), "true");
}

#[test]
fn scenario_5_lazy_assignment_rereads_free_variable() {
    assert_eq!(
        run("package p; x := y + 1; y = 10; a = x; y = 20; b = x; return a;").to_string(),
        "11"
    );
    assert_eq!(
        run("package p; x := y + 1; y = 10; a = x; y = 20; b = x; return b;").to_string(),
        "21"
    );
}

#[test]
fn scenario_6_sequence_rendering() {
    assert_eq!(run("package p; return [1, 2, 3];").to_string(), "[1, 2, 3]");
    assert_eq!(run("package p; return (1, 2);").to_string(), "(1, 2)");
}

#[test]
fn scenario_6_dict_renders_canonically_rather_than_empty() {
    // SPEC_FULL.md §4.1 resolves spec.md §9's "looks like a bug" open
    // question by rendering `{k: v, ...}` instead of the reference's empty
    // string.
    assert_eq!(run(r#"package p; return {"a": 1};"#).to_string(), "{a: 1}");
}

#[test]
fn membership_in_list_set_and_dict() {
    assert_eq!(run("package p; return 3 in [1, 2, 3];").to_string(), "true");
    assert_eq!(run(r#"package p; return "k" in {"k": 1};"#).to_string(), "true");
    assert_eq!(run("package p; return 1 not in {1, 2};").to_string(), "false");
}

#[test]
fn truthiness_of_zero_empty_string_and_null() {
    for src in [
        "package p; if (0) { return true; } else { return false; }",
        r#"package p; if ("") { return true; } else { return false; }"#,
        "package p; if (null) { return true; } else { return false; }",
        "package p; if (false) { return true; } else { return false; }",
    ] {
        assert_eq!(run(src).to_string(), "false");
    }
}

#[test]
fn empty_containers_are_truthy() {
    // spec.md §4.3: only Null/false/zero numbers/empty String are falsy —
    // an empty Tuple/List/Set/Dict is truthy regardless of length.
    for src in [
        "package p; if ([]) { return true; } else { return false; }",
        "package p; if (()) { return true; } else { return false; }",
        r#"package p; if ({}) { return true; } else { return false; }"#,
    ] {
        assert_eq!(run(src).to_string(), "true");
    }
}

#[test]
fn loop_else_skipped_on_break_but_not_on_normal_exit() {
    assert_eq!(
        run("package p; i = 0; while (i < 3) { i = i + 1; } else { i = 99; } return i;")
            .to_string(),
        "99"
    );
    assert_eq!(
        run("package p; i = 0; while (true) { i = 1; break; } else { i = 99; } return i;")
            .to_string(),
        "1"
    );
}

#[test]
fn return_inside_loop_unwinds_past_the_loop_and_its_else() {
    assert_eq!(
        run(
            "package p; def f() { i = 0; while (true) { return 42; } else { return 0; } } \
             return f();"
        )
        .to_string(),
        "42"
    );
}

#[test]
fn range_based_for_iterates_a_date_range() {
    assert_eq!(
        run(
            "package p; n = 0; \
             for (d : 2022-01-30-2022-02-01) { n = n + 1; } \
             return n;"
        )
        .to_string(),
        "3"
    );
}

#[test]
fn binop_on_non_numeric_non_string_operands_yields_null() {
    assert_eq!(run("package p; return null + true;").to_string(), "null");
}

#[test]
fn calling_an_undefined_name_is_a_runtime_error() {
    let entry = quill_syntax::parse_to_ast("package p; return f();").expect("parses");
    let err = execute(&entry).unwrap_err();
    assert_matches::assert_matches!(err, RuntimeError::NotCallable(_));
}

#[test]
fn arity_mismatch_is_a_runtime_error() {
    let entry =
        quill_syntax::parse_to_ast("package p; def f(a, b) { return a; } return f(1);")
            .expect("parses");
    let err = execute(&entry).unwrap_err();
    assert_matches::assert_matches!(err, RuntimeError::ArityMismatch { .. });
}

#[test]
fn assignments_always_land_in_the_global_frame() {
    // spec.md §9's two-tier-environment quirk: a function body's assignment
    // to a name also used as a loop counter outside it is visible globally,
    // because there is no function-local scope for plain assignment.
    let mut env = Env::new();
    let entry = quill_syntax::parse_to_ast(
        "package p; def bump() { counter = counter + 1; } counter = 0; bump(); bump(); return counter;",
    )
    .expect("parses");
    let result = quill_semantics::execute_with_env(&entry, &mut env).expect("execute should succeed");
    assert_eq!(result.to_string(), "2");
    assert_eq!(env.get_global("counter").expect("global set").to_string(), "2");
}
