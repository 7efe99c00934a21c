//! Recursive-descent grammar
//!
//! Implements the precedence ladder from spec.md §4.1 directly on top of
//! [`Lexer`]: `entry -> statement* -> expression -> lambda | bool_or ->
//! bool_and -> compare -> additive -> multiplicative -> exponential ->
//! unary -> postfix -> atom`. There is no error recovery: the first
//! mismatch aborts the whole parse (spec.md §4.1), so every rule simply
//! returns on the first `Err`.

use super::date::{scan_date_or_range, starts_date};
use super::error::{ParseError, Result, SyntaxError};
use super::keyword::{is_reserved, Keyword};
use super::lexer::Lexer;
use super::number::{scan_number, starts_number};
use super::string::scan_quoted_string;
use crate::ast::{
    ArithOp, Argument, BoolOp, CompareOp, Decorator, KeywordArgument, Node, Param, UnaryOp,
};
use crate::source::Span;

pub(crate) struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub(crate) fn new(source: &str) -> Self {
        Parser { lexer: Lexer::new(source) }
    }

    pub(crate) fn parse_entry(&mut self) -> Result<Node> {
        self.skip_trivia()?;
        let start = self.lexer.location();

        let package = self.parse_package_decl()?;

        let mut statements = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.lexer.is_eof() {
                break;
            }
            if let Some(import) = self.try_parse_import()? {
                statements.push(import);
                continue;
            }
            statements.push(self.parse_statement()?);
        }

        let end = self.lexer.location();
        Ok(Node::Entry {
            package,
            body: Box::new(Node::StatementList(statements)),
            span: Span { start, end },
        })
    }

    fn parse_package_decl(&mut self) -> Result<String> {
        self.skip_trivia()?;
        if self.eat_keyword(Keyword::Package)? {
            self.skip_trivia()?;
            let name = self.parse_dotted_name()?;
            self.skip_trivia()?;
            self.eat(';')?;
            Ok(name)
        } else {
            Ok(String::new())
        }
    }

    fn try_parse_import(&mut self) -> Result<Option<Node>> {
        self.skip_trivia()?;
        if !self.eat_keyword(Keyword::Import)? {
            return Ok(None);
        }
        self.skip_trivia()?;
        let name = self.parse_dotted_name()?;
        self.skip_trivia()?;
        if self.eat_keyword(Keyword::From)? {
            self.skip_trivia()?;
            let _package = self.parse_dotted_name()?;
        }
        self.skip_trivia()?;
        self.eat(';')?;
        Ok(Some(Node::ImportPackage(name)))
    }

    // ---- statements ----------------------------------------------------

    fn parse_statement(&mut self) -> Result<Node> {
        self.skip_trivia()?;

        if self.eat(';')? {
            return Ok(Node::Pass);
        }

        let decorators = self.parse_decorators()?;
        self.skip_trivia()?;

        if self.peek_keyword(Keyword::Def)? {
            return self.parse_function_like(decorators);
        }
        if self.peek_keyword(Keyword::If)? {
            return self.parse_if_statement();
        }
        if self.peek_keyword(Keyword::For)? {
            return self.parse_for_like();
        }
        if self.peek_keyword(Keyword::While)? {
            return self.parse_while_statement();
        }

        let stmt = self.parse_simple_statement()?;
        self.skip_trivia()?;
        self.eat(';')?;
        Ok(stmt)
    }

    fn parse_decorators(&mut self) -> Result<Vec<Decorator>> {
        let mut decorators = Vec::new();
        loop {
            self.skip_trivia()?;
            if !self.eat('@')? {
                break;
            }
            self.skip_trivia()?;
            let name = self.parse_identifier()?;
            self.skip_trivia()?;
            let mut args = Vec::new();
            if self.eat('(')? {
                self.skip_trivia()?;
                if !self.peek_char(')') {
                    loop {
                        args.push(self.parse_expression()?);
                        self.skip_trivia()?;
                        if !self.eat(',')? {
                            break;
                        }
                        self.skip_trivia()?;
                    }
                }
                self.skip_trivia()?;
                self.expect(')')?;
            }
            decorators.push(Decorator { name, args });
        }
        Ok(decorators)
    }

    fn parse_function_like(&mut self, decorators: Vec<Decorator>) -> Result<Node> {
        self.expect_keyword(Keyword::Def)?;
        self.skip_trivia()?;
        let name = self.parse_identifier()?;
        self.skip_trivia()?;
        let params = self.parse_param_list()?;
        self.skip_trivia()?;

        if self.eat_str("->")? {
            self.skip_trivia()?;
            let return_type = self.parse_identifier()?;
            self.skip_trivia()?;
            self.expect(';')?;
            return Ok(Node::ExternFunctionDecl { decorators, name, params, return_type });
        }

        self.skip_trivia()?;
        let body = self.parse_block()?;
        Ok(Node::FunctionDef { decorators, name, params, body: Box::new(body) })
    }

    fn parse_param_list(&mut self) -> Result<Vec<Param>> {
        self.expect('(')?;
        self.skip_trivia()?;
        let mut params = Vec::new();
        if !self.peek_char(')') {
            loop {
                params.push(self.parse_identifier()?);
                self.skip_trivia()?;
                if !self.eat(',')? {
                    break;
                }
                self.skip_trivia()?;
            }
        }
        self.skip_trivia()?;
        self.expect(')')?;
        Ok(params)
    }

    fn parse_if_statement(&mut self) -> Result<Node> {
        let start = self.lexer.location();
        self.expect_keyword(Keyword::If)?;
        self.skip_trivia()?;
        self.expect('(')?;
        self.skip_trivia()?;
        let condition = self.parse_expression()?;
        self.skip_trivia()?;
        self.expect(')')?;
        self.skip_trivia()?;
        let body = self.parse_block()?;
        self.skip_trivia()?;
        let or_else = if self.eat_keyword(Keyword::Else)? {
            self.skip_trivia()?;
            if self.peek_keyword(Keyword::If)? {
                Some(Box::new(self.parse_if_statement()?))
            } else {
                self.skip_trivia()?;
                Some(Box::new(self.parse_block()?))
            }
        } else {
            None
        };
        let end = self.lexer.location();
        Ok(Node::IfStatement {
            condition: Box::new(condition),
            body: Box::new(body),
            or_else,
            span: Span { start, end },
        })
    }

    /// Dispatches between the C-style `for (init; cond; iter) body` loop and
    /// the `for (target[, target...] : iterable) body` range loop, both
    /// introduced by `for`, disambiguated by scanning the parenthesized
    /// clause for a top-level `;` (classic) vs. `:` (range-based) — matching
    /// `original_source`'s `classic_for_statement`/`range_based_for_statement`
    /// split (`grammar_def.hpp`), which uses the same two confix shapes.
    fn parse_for_like(&mut self) -> Result<Node> {
        let start = self.lexer.location();
        self.expect_keyword(Keyword::For)?;
        self.skip_trivia()?;
        self.expect('(')?;
        self.skip_trivia()?;

        if self.looks_like_range_for()? {
            let mut targets = vec![self.parse_identifier()?];
            self.skip_trivia()?;
            while self.eat(',')? {
                self.skip_trivia()?;
                targets.push(self.parse_identifier()?);
                self.skip_trivia()?;
            }
            self.expect(':')?;
            self.skip_trivia()?;
            let iterable = self.parse_expression()?;
            self.skip_trivia()?;
            self.expect(')')?;
            self.skip_trivia()?;
            let body = self.parse_block()?;
            self.skip_trivia()?;
            let or_else = self.parse_optional_else()?;
            let end = self.lexer.location();
            return Ok(Node::RangeBasedForStatement {
                targets,
                iterable: Box::new(iterable),
                body: Box::new(body),
                or_else,
                span: Span { start, end },
            });
        }

        let init = if self.peek_char(';') { None } else { Some(Box::new(self.parse_simple_statement()?)) };
        self.skip_trivia()?;
        self.expect(';')?;
        self.skip_trivia()?;
        let condition = if self.peek_char(';') { None } else { Some(Box::new(self.parse_expression()?)) };
        self.skip_trivia()?;
        self.expect(';')?;
        self.skip_trivia()?;
        let iter = if self.peek_char(')') { None } else { Some(Box::new(self.parse_simple_statement()?)) };
        self.skip_trivia()?;
        self.expect(')')?;
        self.skip_trivia()?;
        let body = self.parse_block()?;
        self.skip_trivia()?;
        let or_else = self.parse_optional_else()?;
        let end = self.lexer.location();
        Ok(Node::ForStatement {
            init,
            condition,
            iter,
            body: Box::new(body),
            or_else,
            span: Span { start, end },
        })
    }

    /// Lookahead-only: true if the clause just inside `for (` is a
    /// comma-separated identifier list followed by `:` (range-based),
    /// false if it is the classic `init; cond; iter` form. Never consumes.
    fn looks_like_range_for(&mut self) -> Result<bool> {
        let saved = self.lexer.clone();
        let result = (|| -> Result<bool> {
            if !self.peek_ident_start() {
                return Ok(false);
            }
            let _ = self.parse_identifier()?;
            self.skip_trivia()?;
            while self.eat(',')? {
                self.skip_trivia()?;
                if self.parse_identifier().is_err() {
                    return Ok(false);
                }
                self.skip_trivia()?;
            }
            Ok(self.peek_char(':'))
        })();
        self.lexer = saved;
        result
    }

    fn parse_while_statement(&mut self) -> Result<Node> {
        let start = self.lexer.location();
        self.expect_keyword(Keyword::While)?;
        self.skip_trivia()?;
        self.expect('(')?;
        self.skip_trivia()?;
        let condition = self.parse_expression()?;
        self.skip_trivia()?;
        self.expect(')')?;
        self.skip_trivia()?;
        let body = self.parse_block()?;
        self.skip_trivia()?;
        let or_else = self.parse_optional_else()?;
        let end = self.lexer.location();
        Ok(Node::WhileStatement {
            condition: Box::new(condition),
            body: Box::new(body),
            or_else,
            span: Span { start, end },
        })
    }

    fn parse_optional_else(&mut self) -> Result<Option<Box<Node>>> {
        self.skip_trivia()?;
        if self.eat_keyword(Keyword::Else)? {
            self.skip_trivia()?;
            Ok(Some(Box::new(self.parse_block()?)))
        } else {
            Ok(None)
        }
    }

    fn parse_block(&mut self) -> Result<Node> {
        self.skip_trivia()?;
        if self.eat('{')? {
            let mut statements = Vec::new();
            loop {
                self.skip_trivia()?;
                if self.eat('}')? {
                    break;
                }
                if self.lexer.is_eof() {
                    return Err(self.lexer.error(SyntaxError::UnexpectedEof));
                }
                statements.push(self.parse_statement()?);
            }
            Ok(Node::StatementList(statements))
        } else {
            self.parse_statement()
        }
    }

    fn parse_simple_statement(&mut self) -> Result<Node> {
        self.skip_trivia()?;
        let start = self.lexer.location();

        if self.eat_keyword(Keyword::Pass)? {
            return Ok(Node::Pass);
        }
        if self.eat_keyword(Keyword::Break)? {
            return Ok(Node::Break);
        }
        if self.eat_keyword(Keyword::Continue)? {
            return Ok(Node::Continue);
        }
        if self.eat_keyword(Keyword::Return)? {
            self.skip_trivia()?;
            let expr = if self.peek_char(';') || self.peek_char('}') || self.lexer.is_eof() {
                None
            } else {
                Some(Box::new(self.parse_expression()?))
            };
            let end = self.lexer.location();
            return Ok(Node::ReturnStatement { expr, span: Span { start, end } });
        }

        if self.peek_assignment_target()? {
            return self.parse_assignment(start);
        }

        self.parse_expression()
    }

    /// True if the upcoming tokens are `id (:= | = | +=|-=|*=|/=|//=|%=|**=)`,
    /// decided with a lookahead clone so plain expression statements are not
    /// mistaken for assignments.
    fn peek_assignment_target(&mut self) -> Result<bool> {
        let saved = self.lexer.clone();
        let is_assignment = (|| -> Result<bool> {
            if !self.peek_ident_start() {
                return Ok(false);
            }
            let _ = self.parse_identifier()?;
            self.skip_trivia()?;
            Ok(self.starts_assign_op())
        })();
        self.lexer = saved;
        is_assignment
    }

    fn starts_assign_op(&self) -> bool {
        for op in [":=", "+=", "-=", "//=", "*=", "/=", "%=", "**="] {
            if self.lexer.starts_with(op) {
                return true;
            }
        }
        self.lexer.peek() == Some('=') && self.lexer.peek_at(1) != Some('=')
    }

    fn parse_assignment(&mut self, start: crate::source::Location) -> Result<Node> {
        let target = self.parse_identifier()?;
        self.skip_trivia()?;

        if self.eat_str(":=")? {
            self.skip_trivia()?;
            let expr = self.parse_expression()?;
            let end = self.lexer.location();
            return Ok(Node::LazyAssignStatement {
                target,
                expr: Box::new(expr),
                span: Span { start, end },
            });
        }

        for (text, op) in [
            ("+=", ArithOp::Add),
            ("-=", ArithOp::Sub),
            ("**=", ArithOp::Pow),
            ("*=", ArithOp::Mult),
            ("//=", ArithOp::FloorDiv),
            ("/=", ArithOp::TrueDiv),
            ("%=", ArithOp::Mod),
        ] {
            if self.eat_str(text)? {
                self.skip_trivia()?;
                let expr = self.parse_expression()?;
                let end = self.lexer.location();
                return Ok(Node::AugAssignStatement {
                    target,
                    op,
                    expr: Box::new(expr),
                    span: Span { start, end },
                });
            }
        }

        self.expect('=')?;
        self.skip_trivia()?;
        let expr = self.parse_expression()?;
        let end = self.lexer.location();
        Ok(Node::AssignStatement { target, expr: Box::new(expr), span: Span { start, end } })
    }

    // ---- expressions -----------------------------------------------------

    fn parse_expression(&mut self) -> Result<Node> {
        self.skip_trivia()?;
        if let Some(lambda) = self.try_parse_lambda()? {
            return Ok(lambda);
        }
        self.parse_bool_or()
    }

    /// `(params) => body`, tried with a lookahead clone since it shares a
    /// `(` prefix with a parenthesized expression or tuple.
    fn try_parse_lambda(&mut self) -> Result<Option<Node>> {
        if !self.peek_char('(') {
            return Ok(None);
        }
        let saved = self.lexer.clone();
        let attempt = (|| -> Result<Node> {
            let params = self.parse_param_list()?;
            self.skip_trivia()?;
            if !self.eat_str("=>")? {
                return Err(self.lexer.error_expecting("=>"));
            }
            self.skip_trivia()?;
            let body = self.parse_expression()?;
            Ok(Node::Lambda { params, body: Box::new(body) })
        })();
        match attempt {
            Ok(node) => Ok(Some(node)),
            Err(_) => {
                self.lexer = saved;
                Ok(None)
            }
        }
    }

    fn parse_bool_or(&mut self) -> Result<Node> {
        let mut operands = vec![self.parse_bool_and()?];
        loop {
            self.skip_trivia()?;
            if self.eat_word("or")? {
                self.skip_trivia()?;
                operands.push(self.parse_bool_and()?);
            } else {
                break;
            }
        }
        Ok(Node::BoolOp { op: BoolOp::Or, operands })
    }

    fn parse_bool_and(&mut self) -> Result<Node> {
        let mut operands = vec![self.parse_compare()?];
        loop {
            self.skip_trivia()?;
            if self.peek_keyword_str("and")? {
                self.eat_word("and")?;
                self.skip_trivia()?;
                operands.push(self.parse_compare()?);
            } else {
                break;
            }
        }
        Ok(Node::BoolOp { op: BoolOp::And, operands })
    }

    fn parse_compare(&mut self) -> Result<Node> {
        let first = self.parse_additive()?;
        let mut rest = Vec::new();
        loop {
            self.skip_trivia()?;
            let op = if self.eat_str("==")? {
                CompareOp::Eq
            } else if self.eat_str("!=")? {
                CompareOp::Neq
            } else if self.eat_str("<=")? {
                CompareOp::Lte
            } else if self.eat_str(">=")? {
                CompareOp::Gte
            } else if self.eat_word("not")? {
                self.skip_trivia()?;
                self.expect_keyword(Keyword::In)?;
                CompareOp::NotIn
            } else if self.eat_word("in")? {
                CompareOp::In
            } else if self.peek_char('<') {
                self.expect('<')?;
                CompareOp::Lt
            } else if self.peek_char('>') {
                self.expect('>')?;
                CompareOp::Gt
            } else {
                break;
            };
            self.skip_trivia()?;
            rest.push((op, self.parse_additive()?));
        }
        Ok(Node::CompareOp { first: Box::new(first), rest })
    }

    fn parse_additive(&mut self) -> Result<Node> {
        let first = self.parse_multiplicative()?;
        let mut rest = Vec::new();
        loop {
            self.skip_trivia()?;
            let op = if self.peek_char('+') {
                self.expect('+')?;
                ArithOp::Add
            } else if self.peek_char('-') && !self.lexer.starts_with("->") {
                self.expect('-')?;
                ArithOp::Sub
            } else {
                break;
            };
            self.skip_trivia()?;
            rest.push((op, self.parse_multiplicative()?));
        }
        Ok(Node::BinOpIntermediate { first: Box::new(first), rest })
    }

    fn parse_multiplicative(&mut self) -> Result<Node> {
        let first = self.parse_exponential()?;
        let mut rest = Vec::new();
        loop {
            self.skip_trivia()?;
            let op = if self.eat_str("//")? {
                ArithOp::FloorDiv
            } else if self.peek_char('*') && !self.lexer.starts_with("**") {
                self.expect('*')?;
                ArithOp::Mult
            } else if self.peek_char('/') {
                self.expect('/')?;
                ArithOp::TrueDiv
            } else if self.peek_char('%') {
                self.expect('%')?;
                ArithOp::Mod
            } else {
                break;
            };
            self.skip_trivia()?;
            rest.push((op, self.parse_exponential()?));
        }
        Ok(Node::BinOpIntermediate { first: Box::new(first), rest })
    }

    fn parse_exponential(&mut self) -> Result<Node> {
        let base = self.parse_unary()?;
        self.skip_trivia()?;
        if self.eat_str("**")? {
            self.skip_trivia()?;
            let exponent = self.parse_exponential()?;
            Ok(Node::BinOp { left: Box::new(base), op: ArithOp::Pow, right: Box::new(exponent) })
        } else {
            Ok(base)
        }
    }

    fn parse_unary(&mut self) -> Result<Node> {
        self.skip_trivia()?;
        if self.eat_word("not")? {
            self.skip_trivia()?;
            let operand = self.parse_unary()?;
            return Ok(Node::UnaryOp { op: UnaryOp::Not, operand: Box::new(operand) });
        }
        if self.peek_char('!') && self.lexer.peek_at(1) != Some('=') {
            self.expect('!')?;
            self.skip_trivia()?;
            let operand = self.parse_unary()?;
            return Ok(Node::UnaryOp { op: UnaryOp::Not, operand: Box::new(operand) });
        }
        if self.peek_char('-') {
            self.expect('-')?;
            self.skip_trivia()?;
            let operand = self.parse_unary()?;
            return Ok(Node::UnaryOp { op: UnaryOp::Minus, operand: Box::new(operand) });
        }
        if self.peek_char('+') {
            self.expect('+')?;
            self.skip_trivia()?;
            let operand = self.parse_unary()?;
            return Ok(Node::UnaryOp { op: UnaryOp::Plus, operand: Box::new(operand) });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Node> {
        let atom = self.parse_atom()?;
        self.skip_trivia()?;

        if let Node::Name(name) = &atom {
            if self.peek_char('(') {
                let args = self.parse_call_args()?;
                return Ok(Node::Call { callee: name.clone(), args });
            }
            if self.peek_char('[') {
                self.expect('[')?;
                self.skip_trivia()?;
                let index = self.parse_expression()?;
                self.skip_trivia()?;
                self.expect(']')?;
                return Ok(Node::Subscript { target: name.clone(), index: Box::new(index) });
            }
        }
        Ok(atom)
    }

    fn parse_call_args(&mut self) -> Result<Vec<Node>> {
        self.expect('(')?;
        self.skip_trivia()?;
        let mut args = Vec::new();
        if !self.peek_char(')') {
            loop {
                args.push(self.parse_call_arg()?);
                self.skip_trivia()?;
                if !self.eat(',')? {
                    break;
                }
                self.skip_trivia()?;
            }
        }
        self.skip_trivia()?;
        self.expect(')')?;
        Ok(args)
    }

    fn parse_call_arg(&mut self) -> Result<Node> {
        let saved = self.lexer.clone();
        if self.peek_ident_start() {
            if let Ok(name) = self.parse_identifier() {
                self.skip_trivia()?;
                if self.peek_char(':') && self.lexer.peek_at(1) != Some(':') {
                    self.expect(':')?;
                    self.skip_trivia()?;
                    let expr = self.parse_expression()?;
                    return Ok(Node::KeywordArgument(KeywordArgument {
                        name,
                        expr: Box::new(expr),
                    }));
                }
            }
        }
        self.lexer = saved;
        let expr = self.parse_expression()?;
        Ok(Node::Argument(Argument { expr: Box::new(expr) }))
    }

    fn parse_atom(&mut self) -> Result<Node> {
        self.skip_trivia()?;

        if starts_date(&self.lexer) {
            return scan_date_or_range(&mut self.lexer);
        }
        if starts_number(&self.lexer) {
            return scan_number(&mut self.lexer);
        }
        if self.peek_char('"') {
            return Ok(Node::QuotedString(scan_quoted_string(&mut self.lexer)?));
        }
        if self.eat_str("...")? {
            return Ok(Node::Ellipsis);
        }
        if self.eat('(')? {
            self.skip_trivia()?;
            if self.eat(')')? {
                return Ok(Node::Tuple(Vec::new()));
            }
            let first = self.parse_expression()?;
            self.skip_trivia()?;
            if self.eat(',')? {
                let mut items = vec![first];
                self.skip_trivia()?;
                while !self.peek_char(')') {
                    items.push(self.parse_expression()?);
                    self.skip_trivia()?;
                    if !self.eat(',')? {
                        break;
                    }
                    self.skip_trivia()?;
                }
                self.skip_trivia()?;
                self.expect(')')?;
                return Ok(Node::Tuple(items));
            }
            self.skip_trivia()?;
            self.expect(')')?;
            return Ok(first);
        }
        if self.eat('[')? {
            self.skip_trivia()?;
            let mut items = Vec::new();
            if !self.peek_char(']') {
                loop {
                    items.push(self.parse_expression()?);
                    self.skip_trivia()?;
                    if !self.eat(',')? {
                        break;
                    }
                    self.skip_trivia()?;
                }
            }
            self.skip_trivia()?;
            self.expect(']')?;
            return Ok(Node::List(items));
        }
        if self.eat('{')? {
            return self.parse_dict_or_set();
        }
        if self.eat_keyword(Keyword::Null)? {
            return Ok(Node::Null);
        }
        if self.eat_keyword(Keyword::True)? {
            return Ok(Node::Bool(true));
        }
        if self.eat_keyword(Keyword::False)? {
            return Ok(Node::Bool(false));
        }
        if self.peek_ident_start() {
            let name = self.parse_identifier()?;
            return Ok(Node::Name(name));
        }

        Err(self.lexer.error_expecting("an expression"))
    }

    fn parse_dict_or_set(&mut self) -> Result<Node> {
        self.skip_trivia()?;
        if self.eat('}')? {
            return Ok(Node::Dict(Vec::new()));
        }
        let first_key = self.parse_expression()?;
        self.skip_trivia()?;
        if self.eat(':')? {
            self.skip_trivia()?;
            let first_value = self.parse_expression()?;
            let mut entries = vec![(first_key, first_value)];
            self.skip_trivia()?;
            while self.eat(',')? {
                self.skip_trivia()?;
                if self.peek_char('}') {
                    break;
                }
                let key = self.parse_expression()?;
                self.skip_trivia()?;
                self.expect(':')?;
                self.skip_trivia()?;
                let value = self.parse_expression()?;
                entries.push((key, value));
                self.skip_trivia()?;
            }
            self.skip_trivia()?;
            self.expect('}')?;
            Ok(Node::Dict(entries))
        } else {
            let mut items = vec![first_key];
            self.skip_trivia()?;
            while self.eat(',')? {
                self.skip_trivia()?;
                if self.peek_char('}') {
                    break;
                }
                items.push(self.parse_expression()?);
                self.skip_trivia()?;
            }
            self.skip_trivia()?;
            self.expect('}')?;
            Ok(Node::Set(items))
        }
    }

    fn parse_dotted_name(&mut self) -> Result<String> {
        let mut name = self.parse_identifier()?;
        while self.lexer.peek() == Some('.') && matches!(self.lexer.peek_at(1), Some(c) if is_ident_continue(c)) {
            self.lexer.bump();
            name.push('.');
            name.push_str(&self.parse_identifier()?);
        }
        Ok(name)
    }

    fn parse_identifier(&mut self) -> Result<String> {
        self.skip_trivia()?;
        if !self.peek_ident_start() {
            return Err(self.lexer.error_expecting("an identifier"));
        }
        let start_loc = self.lexer.location();
        let mut s = String::new();
        while let Some(c) = self.lexer.peek() {
            if is_ident_continue(c) {
                s.push(c);
                self.lexer.bump();
            } else {
                break;
            }
        }
        if is_reserved(&s) {
            return Err(ParseError::new(start_loc, SyntaxError::ReservedWordAsIdentifier(s)));
        }
        Ok(s)
    }

    // ---- low-level helpers ------------------------------------------------

    fn skip_trivia(&mut self) -> Result<()> {
        self.lexer.skip_trivia()
    }

    fn peek_char(&self, c: char) -> bool {
        self.lexer.peek() == Some(c)
    }

    fn peek_ident_start(&self) -> bool {
        matches!(self.lexer.peek(), Some(c) if c.is_alphabetic() || c == '_')
    }

    fn eat(&mut self, c: char) -> Result<bool> {
        Ok(self.lexer.eat(c))
    }

    fn eat_str(&mut self, s: &str) -> Result<bool> {
        Ok(self.lexer.eat_str(s))
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.lexer.eat(c) {
            Ok(())
        } else {
            Err(self.lexer.error_expecting(format!("{c:?}")))
        }
    }

    /// True if the next identifier-like run of characters is exactly `word`
    /// (not a prefix of a longer identifier).
    fn peek_keyword_str(&self, word: &str) -> Result<bool> {
        if !self.lexer.starts_with(word) {
            return Ok(false);
        }
        let after = self.lexer.peek_at(word.chars().count());
        Ok(!matches!(after, Some(c) if is_ident_continue(c)))
    }

    fn eat_word(&mut self, word: &str) -> Result<bool> {
        if self.peek_keyword_str(word)? {
            for _ in word.chars() {
                self.lexer.bump();
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn peek_keyword(&mut self, kw: Keyword) -> Result<bool> {
        self.peek_keyword_str(kw.as_str())
    }

    fn eat_keyword(&mut self, kw: Keyword) -> Result<bool> {
        self.eat_word(kw.as_str())
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<()> {
        if self.eat_keyword(kw)? {
            Ok(())
        } else {
            Err(self.lexer.error_expecting(kw))
        }
    }
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Node {
        Parser::new(src).parse_entry().expect("parse")
    }

    #[test]
    fn parses_simple_assignment() {
        let entry = parse("x = 1 + 2;");
        assert_matches::assert_matches!(entry, Node::Entry { .. });
    }

    #[test]
    fn parses_if_else_chain() {
        parse("if (x > 0) { y = 1; } else if (x < 0) { y = -1; } else { y = 0; }");
    }

    #[test]
    fn parses_range_for() {
        parse("for (item : [1, 2, 3]) { print(item); }");
    }

    #[test]
    fn parses_classic_for_without_do() {
        parse("for (i = 0; i < 3; i += 1) { print(i); }");
    }

    #[test]
    fn rejects_reserved_word_identifier() {
        let err = Parser::new("if = 1;").parse_entry().unwrap_err();
        assert_matches::assert_matches!(err.cause, SyntaxError::ReservedWordAsIdentifier(_));
    }

    #[test]
    fn parses_date_range_literal() {
        parse("x = 2020-2021;");
    }

    #[test]
    fn parses_lambda_expression() {
        parse("f = (x, y) => x + y;");
    }

    #[test]
    fn bang_is_an_alternate_spelling_of_unary_not() {
        let entry = parse("x = !y;");
        let Node::Entry { body, .. } = entry else { unreachable!() };
        let Node::StatementList(statements) = *body else { unreachable!() };
        assert_matches::assert_matches!(
            &statements[0],
            Node::AssignStatement { expr, .. }
                if matches!(expr.as_ref(), Node::UnaryOp { op: UnaryOp::Not, .. })
        );
    }

    #[test]
    fn bang_equals_is_still_the_neq_operator() {
        parse("x = a != b;");
    }
}
