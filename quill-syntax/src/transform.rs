//! Normalizing AST transformer
//!
//! The parser in [`crate::parser`] produces a tree with a few transient or
//! redundant shapes that are easier to emit during parsing than to avoid:
//! flat arithmetic chains, comparison chains with no comparisons at all,
//! and boolean chains with a single operand. `normalize` rewrites the whole
//! tree bottom-up into its canonical form in a single traversal:
//!
//! 1. every [`Node::BinOpIntermediate`] folds left-associatively into
//!    nested [`Node::BinOp`] nodes (or, with an empty `rest`, disappears
//!    entirely in favor of its lone operand);
//! 2. every [`Node::CompareOp`] with an empty `rest` collapses to its bare
//!    `first` operand;
//! 3. every [`Node::BoolOp`] with exactly one operand collapses to that
//!    operand.
//!
//! `normalize` is idempotent: running it twice produces the same tree as
//! running it once, since none of its three rules can produce a shape that
//! triggers another rule.

use crate::ast::Node;

/// Rewrites `entry` into its canonical form. Called automatically by
/// [`crate::parse_to_ast`]; exposed separately so tests can check
/// idempotence directly.
#[must_use]
pub fn normalize(node: Node) -> Node {
    match node {
        Node::Null
        | Node::Ellipsis
        | Node::Pass
        | Node::Break
        | Node::Continue
        | Node::Bool(_)
        | Node::Int64 { .. }
        | Node::UInt64 { .. }
        | Node::Double { .. }
        | Node::Name(_)
        | Node::String(_)
        | Node::QuotedString(_)
        | Node::Date(_)
        | Node::DateRange(_, _)
        | Node::PackageName(_)
        | Node::ImportPackage(_) => node,

        Node::Tuple(items) => Node::Tuple(normalize_all(items)),
        Node::List(items) => Node::List(normalize_all(items)),
        Node::Set(items) => Node::Set(normalize_all(items)),
        Node::Dict(entries) => Node::Dict(
            entries.into_iter().map(|(k, v)| (normalize(k), normalize(v))).collect(),
        ),

        Node::UnaryOp { op, operand } => {
            Node::UnaryOp { op, operand: Box::new(normalize(*operand)) }
        }

        Node::BoolOp { op, operands } => {
            let mut operands = normalize_all(operands);
            if operands.len() == 1 {
                operands.remove(0)
            } else {
                Node::BoolOp { op, operands }
            }
        }

        Node::CompareOp { first, rest } => {
            let first = normalize(*first);
            let rest: Vec<_> = rest.into_iter().map(|(op, n)| (op, normalize(n))).collect();
            if rest.is_empty() {
                first
            } else {
                Node::CompareOp { first: Box::new(first), rest }
            }
        }

        Node::BinOp { left, op, right } => Node::BinOp {
            left: Box::new(normalize(*left)),
            op,
            right: Box::new(normalize(*right)),
        },

        Node::BinOpIntermediate { first, rest } => {
            let first = normalize(*first);
            let mut acc = first;
            for (op, operand) in rest {
                let operand = normalize(operand);
                acc = Node::BinOp { left: Box::new(acc), op, right: Box::new(operand) };
            }
            acc
        }

        Node::Call { callee, args } => Node::Call { callee, args: normalize_all(args) },
        Node::Argument(crate::ast::Argument { expr }) => {
            Node::Argument(crate::ast::Argument { expr: Box::new(normalize(*expr)) })
        }
        Node::KeywordArgument(crate::ast::KeywordArgument { name, expr }) => {
            Node::KeywordArgument(crate::ast::KeywordArgument {
                name,
                expr: Box::new(normalize(*expr)),
            })
        }
        Node::Subscript { target, index } => {
            Node::Subscript { target, index: Box::new(normalize(*index)) }
        }

        Node::Lambda { params, body } => Node::Lambda { params, body: Box::new(normalize(*body)) },
        Node::FunctionDef { decorators, name, params, body } => Node::FunctionDef {
            decorators,
            name,
            params,
            body: Box::new(normalize(*body)),
        },
        Node::ExternFunctionDecl { decorators, name, params, return_type } => {
            Node::ExternFunctionDecl { decorators, name, params, return_type }
        }

        Node::AssignStatement { target, expr, span } => {
            Node::AssignStatement { target, expr: Box::new(normalize(*expr)), span }
        }
        Node::LazyAssignStatement { target, expr, span } => {
            Node::LazyAssignStatement { target, expr: Box::new(normalize(*expr)), span }
        }
        Node::AugAssignStatement { target, op, expr, span } => {
            Node::AugAssignStatement { target, op, expr: Box::new(normalize(*expr)), span }
        }

        Node::ReturnStatement { expr, span } => {
            Node::ReturnStatement { expr: expr.map(|e| Box::new(normalize(*e))), span }
        }

        Node::IfStatement { condition, body, or_else, span } => Node::IfStatement {
            condition: Box::new(normalize(*condition)),
            body: Box::new(normalize(*body)),
            or_else: or_else.map(|n| Box::new(normalize(*n))),
            span,
        },
        Node::ForStatement { init, condition, iter, body, or_else, span } => Node::ForStatement {
            init: init.map(|n| Box::new(normalize(*n))),
            condition: condition.map(|n| Box::new(normalize(*n))),
            iter: iter.map(|n| Box::new(normalize(*n))),
            body: Box::new(normalize(*body)),
            or_else: or_else.map(|n| Box::new(normalize(*n))),
            span,
        },
        Node::RangeBasedForStatement { targets, iterable, body, or_else, span } => {
            Node::RangeBasedForStatement {
                targets,
                iterable: Box::new(normalize(*iterable)),
                body: Box::new(normalize(*body)),
                or_else: or_else.map(|n| Box::new(normalize(*n))),
                span,
            }
        }
        Node::WhileStatement { condition, body, or_else, span } => Node::WhileStatement {
            condition: Box::new(normalize(*condition)),
            body: Box::new(normalize(*body)),
            or_else: or_else.map(|n| Box::new(normalize(*n))),
            span,
        },

        Node::StatementList(statements) => Node::StatementList(normalize_all(statements)),

        Node::Entry { package, body, span } => {
            Node::Entry { package, body: Box::new(normalize(*body)), span }
        }
    }
}

fn normalize_all(nodes: Vec<Node>) -> Vec<Node> {
    nodes.into_iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArithOp, BoolOp};

    #[test]
    fn folds_binop_chain_left_associatively() {
        let chain = Node::BinOpIntermediate {
            first: Box::new(Node::Int64 { value: 1, lexeme: "1".into() }),
            rest: vec![
                (ArithOp::Add, Node::Int64 { value: 2, lexeme: "2".into() }),
                (ArithOp::Sub, Node::Int64 { value: 3, lexeme: "3".into() }),
            ],
        };
        let folded = normalize(chain);
        assert_matches::assert_matches!(
            folded,
            Node::BinOp { op: ArithOp::Sub, .. }
        );
        if let Node::BinOp { left, .. } = folded {
            assert_matches::assert_matches!(*left, Node::BinOp { op: ArithOp::Add, .. });
        }
    }

    #[test]
    fn collapses_degenerate_compare_chain() {
        let node = Node::CompareOp {
            first: Box::new(Node::Int64 { value: 1, lexeme: "1".into() }),
            rest: vec![],
        };
        assert_eq!(normalize(node), Node::Int64 { value: 1, lexeme: "1".into() });
    }

    #[test]
    fn collapses_single_operand_bool_op() {
        let node = Node::BoolOp { op: BoolOp::And, operands: vec![Node::Bool(true)] };
        assert_eq!(normalize(node), Node::Bool(true));
    }

    #[test]
    fn is_idempotent() {
        let chain = Node::BinOpIntermediate {
            first: Box::new(Node::Int64 { value: 1, lexeme: "1".into() }),
            rest: vec![(ArithOp::Add, Node::Int64 { value: 2, lexeme: "2".into() })],
        };
        let once = normalize(chain.clone());
        let twice = normalize(normalize(chain));
        assert_eq!(once, twice);
    }
}
