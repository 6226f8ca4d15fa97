//! Expression parsing using Pratt precedence.

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::TokenKind;
use crate::span::Span;

use super::core::{ParseResult, Parser};
use super::precedence::{get_precedence, Precedence};

impl Parser {
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.parse_precedence(Precedence::Lowest)
    }

    pub(crate) fn parse_precedence(&mut self, min_precedence: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.is_at_end() {
            let precedence = get_precedence(&self.peek().kind);
            if precedence <= min_precedence {
                break;
            }

            left = self.parse_infix(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let start_span = token.span;

        match token.kind {
            TokenKind::Ident => Ok(Expr::new(ExprKind::Identifier(token.literal), start_span)),

            TokenKind::Int => match token.literal.parse::<i64>() {
                Ok(value) => Ok(Expr::new(ExprKind::IntegerLiteral(value), start_span)),
                Err(_) => Err(ParserError::invalid_integer(token.literal, start_span)),
            },

            TokenKind::Str => Ok(Expr::new(
                ExprKind::StringLiteral(token.literal),
                start_span,
            )),

            TokenKind::True => Ok(Expr::new(ExprKind::BooleanLiteral(true), start_span)),
            TokenKind::False => Ok(Expr::new(ExprKind::BooleanLiteral(false), start_span)),

            TokenKind::Bang => self.parse_unary(UnaryOp::Not, start_span),
            TokenKind::Minus => self.parse_unary(UnaryOp::Neg, start_span),

            TokenKind::LParen => {
                let expr = self.expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }

            TokenKind::If => self.parse_if(start_span),
            TokenKind::Function => self.parse_function_literal(start_span),
            TokenKind::LBracket => self.parse_array(start_span),
            TokenKind::LBrace => self.parse_hash(start_span),

            _ => Err(ParserError::no_prefix_parse(
                token.kind.to_string(),
                start_span,
            )),
        }
    }

    fn parse_infix(&mut self, left: Expr, precedence: Precedence) -> ParseResult<Expr> {
        let token = self.advance();

        let operator = match token.kind {
            TokenKind::LParen => return self.parse_call(left),
            TokenKind::LBracket => return self.parse_index(left),
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Asterisk => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Gt => BinaryOp::Gt,
            _ => {
                return Err(ParserError::unexpected_token(
                    "infix operator",
                    token.kind.to_string(),
                    token.span,
                ))
            }
        };

        let right = self.parse_precedence(precedence)?;
        let span = left.span.merge(&right.span);
        Ok(Expr::new(
            ExprKind::Infix {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            span,
        ))
    }

    fn parse_unary(&mut self, operator: UnaryOp, start_span: Span) -> ParseResult<Expr> {
        let right = self.parse_precedence(Precedence::Prefix)?;
        let span = start_span.merge(&right.span);
        Ok(Expr::new(
            ExprKind::Prefix {
                operator,
                right: Box::new(right),
            },
            span,
        ))
    }

    fn parse_if(&mut self, start_span: Span) -> ParseResult<Expr> {
        self.expect(&TokenKind::LParen)?;
        let condition = self.expression()?;
        self.expect(&TokenKind::RParen)?;

        let consequence = self.block()?;

        let alternative = if self.match_token(&TokenKind::Else) {
            Some(self.block()?)
        } else {
            None
        };

        let span = start_span.merge(&self.previous_span());
        Ok(Expr::new(
            ExprKind::If {
                condition: Box::new(condition),
                consequence,
                alternative,
            },
            span,
        ))
    }

    fn parse_function_literal(&mut self, start_span: Span) -> ParseResult<Expr> {
        self.expect(&TokenKind::LParen)?;

        let mut parameters = Vec::new();
        if !self.check(&TokenKind::RParen) {
            parameters.push(self.expect_identifier()?);
            while self.match_token(&TokenKind::Comma) {
                parameters.push(self.expect_identifier()?);
            }
        }
        self.expect(&TokenKind::RParen)?;

        let body = self.block()?;
        let span = start_span.merge(&self.previous_span());

        Ok(Expr::new(
            ExprKind::FunctionLiteral {
                parameters,
                body,
                // Filled in when the literal is the value of a `let`.
                name: String::new(),
            },
            span,
        ))
    }

    fn parse_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let arguments = self.expression_list(&TokenKind::RParen)?;
        let span = callee.span.merge(&self.previous_span());
        Ok(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                arguments,
            },
            span,
        ))
    }

    fn parse_index(&mut self, left: Expr) -> ParseResult<Expr> {
        let index = self.expression()?;
        self.expect(&TokenKind::RBracket)?;
        let span = left.span.merge(&self.previous_span());
        Ok(Expr::new(
            ExprKind::Index {
                left: Box::new(left),
                index: Box::new(index),
            },
            span,
        ))
    }

    fn parse_array(&mut self, start_span: Span) -> ParseResult<Expr> {
        let elements = self.expression_list(&TokenKind::RBracket)?;
        let span = start_span.merge(&self.previous_span());
        Ok(Expr::new(ExprKind::ArrayLiteral(elements), span))
    }

    fn parse_hash(&mut self, start_span: Span) -> ParseResult<Expr> {
        let mut pairs = Vec::new();

        if !self.check(&TokenKind::RBrace) {
            loop {
                let key = self.expression()?;
                self.expect(&TokenKind::Colon)?;
                let value = self.expression()?;
                pairs.push((key, value));

                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RBrace)?;

        let span = start_span.merge(&self.previous_span());
        Ok(Expr::new(ExprKind::HashLiteral(pairs), span))
    }

    /// Parse a comma-separated expression list terminated by `end`.
    fn expression_list(&mut self, end: &TokenKind) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();

        if !self.check(end) {
            items.push(self.expression()?);
            while self.match_token(&TokenKind::Comma) {
                items.push(self.expression()?);
            }
        }
        self.expect(end)?;

        Ok(items)
    }
}
