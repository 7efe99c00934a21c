//! End-to-end parser + normalizer scenarios from spec.md §8.

use quill_syntax::ast::{ArithOp, BoolOp, CompareOp, Node};
use quill_syntax::{parse_to_ast, transform};

fn statements(entry: &Node) -> &[Node] {
    let Node::Entry { body, .. } = entry else {
        panic!("expected Entry, got {entry:?}");
    };
    let Node::StatementList(statements) = body.as_ref() else {
        panic!("expected StatementList body, got {body:?}");
    };
    statements
}

#[test]
fn precedence_nests_mult_and_pow_inside_add() {
    let entry = parse_to_ast("package p; x = 1 + 2 * 3 ** 2;").expect("parses");
    let Node::AssignStatement { expr, .. } = &statements(&entry)[0] else {
        panic!("expected an assignment");
    };
    assert_matches::assert_matches!(
        expr.as_ref(),
        Node::BinOp { op: ArithOp::Add, right, .. }
            if matches!(right.as_ref(), Node::BinOp { op: ArithOp::Mult, .. })
    );
}

#[test]
fn subtraction_is_left_associative() {
    let entry = parse_to_ast("package p; x = 1 - 2 - 3;").expect("parses");
    let Node::AssignStatement { expr, .. } = &statements(&entry)[0] else {
        panic!("expected an assignment");
    };
    // `(1 - 2) - 3`: the outer node's left child is itself a `Sub`.
    assert_matches::assert_matches!(
        expr.as_ref(),
        Node::BinOp { op: ArithOp::Sub, left, .. }
            if matches!(left.as_ref(), Node::BinOp { op: ArithOp::Sub, .. })
    );
}

#[test]
fn or_binds_looser_than_and() {
    let entry = parse_to_ast("package p; x = a or b and c;").expect("parses");
    let Node::AssignStatement { expr, .. } = &statements(&entry)[0] else {
        panic!("expected an assignment");
    };
    assert_matches::assert_matches!(
        expr.as_ref(),
        Node::BoolOp { op: BoolOp::Or, operands }
            if matches!(operands.last(), Some(Node::BoolOp { op: BoolOp::And, .. }))
    );
}

#[test]
fn chained_comparison_collapses_into_one_node() {
    let entry = parse_to_ast("package p; x = 1 < 2 < 3;").expect("parses");
    let Node::AssignStatement { expr, .. } = &statements(&entry)[0] else {
        panic!("expected an assignment");
    };
    assert_matches::assert_matches!(
        expr.as_ref(),
        Node::CompareOp { rest, .. } if rest.len() == 2 && rest.iter().all(|(op, _)| *op == CompareOp::Lt)
    );
}

#[test]
fn normalizing_twice_is_a_no_op() {
    let entry = parse_to_ast(
        "package p; x = 1 + 2 * 3 ** 2 - 4; y = a or b and c or not d; if (1 < 2 < 3) { pass; }",
    )
    .expect("parses");
    let twice = transform::normalize(entry.clone());
    assert_eq!(entry, twice);
}

#[test]
fn no_bin_op_intermediate_survives_normalization() {
    fn assert_no_intermediate(node: &Node) {
        assert!(!matches!(node, Node::BinOpIntermediate { .. }), "found {node:?}");
        match node {
            Node::BinOp { left, right, .. } => {
                assert_no_intermediate(left);
                assert_no_intermediate(right);
            }
            Node::StatementList(items) | Node::Tuple(items) | Node::List(items) | Node::Set(items) => {
                items.iter().for_each(assert_no_intermediate);
            }
            Node::AssignStatement { expr, .. } | Node::LazyAssignStatement { expr, .. } => {
                assert_no_intermediate(expr);
            }
            Node::Entry { body, .. } => assert_no_intermediate(body),
            _ => {}
        }
    }

    let entry = parse_to_ast("package p; x = 1 + 2 * 3 - 4 / 2 % 5;").expect("parses");
    assert_no_intermediate(&entry);
}

#[test]
fn date_rejects_month_out_of_range() {
    let err = parse_to_ast("package p; x = 2022-13-01;").unwrap_err();
    assert_matches::assert_matches!(err.cause, quill_syntax::SyntaxError::InvalidDate(_));
}

#[test]
fn date_rejects_year_below_1900() {
    let err = parse_to_ast("package p; x = 1899-01-01;").unwrap_err();
    assert_matches::assert_matches!(err.cause, quill_syntax::SyntaxError::InvalidDate(_));
}

#[test]
fn date_accepts_calendar_invalid_day_of_month() {
    // spec.md §8: day is validated only against the literal range 1..=31,
    // never against the actual days in February.
    let entry = parse_to_ast("package p; x = 2022-02-30;").expect("parses syntactically");
    let Node::AssignStatement { expr, .. } = &statements(&entry)[0] else {
        panic!("expected an assignment");
    };
    assert_matches::assert_matches!(expr.as_ref(), Node::Date(_));
}

#[test]
fn date_range_literal_parses_both_endpoints() {
    let entry = parse_to_ast("package p; x = 2022-01-01-2022-12-31;").expect("parses");
    let Node::AssignStatement { expr, .. } = &statements(&entry)[0] else {
        panic!("expected an assignment");
    };
    assert_matches::assert_matches!(expr.as_ref(), Node::DateRange(_, _));
}

#[test]
fn classic_for_parses_without_a_do_keyword() {
    let entry = parse_to_ast("package p; for (i = 0; i < 3; i += 1) { pass; }").expect("parses");
    assert_matches::assert_matches!(statements(&entry)[0], Node::ForStatement { .. });
}

#[test]
fn range_based_for_parses_without_a_do_keyword() {
    let entry = parse_to_ast("package p; for (item : [1, 2, 3]) { pass; }").expect("parses");
    assert_matches::assert_matches!(statements(&entry)[0], Node::RangeBasedForStatement { .. });
}

#[test]
fn floor_div_assign_is_not_swallowed_as_a_comment() {
    let entry = parse_to_ast("package p; x //= 2;").expect("parses");
    assert_matches::assert_matches!(
        statements(&entry)[0],
        Node::AugAssignStatement { op: ArithOp::FloorDiv, .. }
    );
}
