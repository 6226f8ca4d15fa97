//! Statement parsing: let, return, expression statements, blocks.

use crate::ast::*;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};

impl Parser {
    pub(crate) fn statement(&mut self) -> ParseResult<Stmt> {
        if self.check(&TokenKind::Let) {
            self.let_statement()
        } else if self.check(&TokenKind::Return) {
            self.return_statement()
        } else {
            self.expression_statement()
        }
    }

    fn let_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Let)?;

        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Assign)?;

        let mut value = self.expression()?;

        // A function literal bound by `let` knows its own name, so the
        // compiler can resolve recursive self-references.
        if let ExprKind::FunctionLiteral { name: fn_name, .. } = &mut value.kind {
            *fn_name = name.clone();
        }

        self.consume_semicolons();
        let span = start_span.merge(&self.previous_span());

        Ok(Stmt::new(StmtKind::Let { name, value }, span))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Return)?;

        let value = self.expression()?;

        self.consume_semicolons();
        let span = start_span.merge(&self.previous_span());

        Ok(Stmt::new(StmtKind::Return(value), span))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;

        self.consume_semicolons();
        let span = expr.span;

        Ok(Stmt::new(StmtKind::Expression(expr), span))
    }

    /// Parse a `{ ... }` block.
    pub(crate) fn block(&mut self) -> ParseResult<BlockStmt> {
        let start_span = self.current_span();
        self.expect(&TokenKind::LBrace)?;

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.statement()?);
        }
        self.expect(&TokenKind::RBrace)?;

        let span = start_span.merge(&self.previous_span());
        Ok(BlockStmt::new(statements, span))
    }

    /// Trailing semicolons are optional, and extra ones are harmless.
    fn consume_semicolons(&mut self) {
        while self.match_token(&TokenKind::Semicolon) {}
    }
}
