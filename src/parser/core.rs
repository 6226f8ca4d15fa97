//! Core parser struct and token-stream helpers.

use crate::ast::Program;
use crate::error::ParserError;
use crate::lexer::{Scanner, Token, TokenKind};
use crate::span::Span;

pub type ParseResult<T> = Result<T, ParserError>;

/// The parser for Monkey.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) current: usize,
    pub(crate) errors: Vec<ParserError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
        }
    }

    /// Convenience constructor that lexes `source` first.
    pub fn from_source(source: &str) -> Self {
        Self::new(Scanner::new(source).scan_tokens())
    }

    /// Parse a complete program. Always returns a `Program`; check
    /// [`Parser::errors`] to find out whether it is trustworthy.
    pub fn parse(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }

        Program::new(statements)
    }

    /// Errors accumulated so far.
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// Consume the accumulated errors.
    pub fn take_errors(&mut self) -> Vec<ParserError> {
        std::mem::take(&mut self.errors)
    }

    /// Skip forward to a plausible statement boundary after an error.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.match_token(&TokenKind::Semicolon) {
                return;
            }
            if self.check(&TokenKind::Let) || self.check(&TokenKind::Return) {
                return;
            }
            self.advance();
        }
    }

    // ===== Token manipulation =====

    pub(crate) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.tokens[self.current - 1].clone()
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParserError::unexpected_token(
                kind.to_string(),
                self.peek().kind.to_string(),
                self.current_span(),
            ))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> ParseResult<String> {
        if self.check(&TokenKind::Ident) {
            Ok(self.advance().literal)
        } else {
            Err(ParserError::unexpected_token(
                TokenKind::Ident.to_string(),
                self.peek().kind.to_string(),
                self.current_span(),
            ))
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.previous().span
    }
}
