//! Error types for all phases of the toolchain.
//!
//! Parser errors carry a [`Span`] and are accumulated on the parser so a
//! single pass can report several problems. Compile and runtime errors are
//! returned on the first offense. Runtime errors are deliberately span-less:
//! bytecode carries no source positions, and both engines must report the
//! same failures for the same programs.

use crate::span::Span;
use thiserror::Error;

/// Parser errors.
#[derive(Debug, Clone, Error)]
pub enum ParserError {
    #[error("expected next token to be {expected}, got {found} instead at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("no prefix parse function for {0} found at {1}")]
    NoPrefixParse(String, Span),

    #[error("could not parse {0} as integer at {1}")]
    InvalidInteger(String, Span),
}

impl ParserError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn no_prefix_parse(found: impl Into<String>, span: Span) -> Self {
        Self::NoPrefixParse(found.into(), span)
    }

    pub fn invalid_integer(literal: impl Into<String>, span: Span) -> Self {
        Self::InvalidInteger(literal.into(), span)
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } => *span,
            Self::NoPrefixParse(_, span) => *span,
            Self::InvalidInteger(_, span) => *span,
        }
    }
}

/// Bytecode compilation errors.
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error("undefined variable {0}")]
    UndefinedVariable(String),
}

/// Runtime errors, shared by the VM and the tree-walking evaluator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    #[error("stack overflow")]
    StackOverflow,

    #[error("unknown opcode: {0}")]
    UnknownOpcode(u8),

    #[error("unsupported types for binary operation: {left} {right}")]
    UnsupportedBinaryTypes {
        left: &'static str,
        right: &'static str,
    },

    #[error("unsupported type for negation: {0}")]
    UnsupportedNegation(&'static str),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("wrong number of arguments: want={want}, got={got}")]
    WrongArgumentCount { want: usize, got: usize },

    #[error("not a function: {0}")]
    NotAFunction(&'static str),

    #[error("calling non-function and non-built-in")]
    NotCallable,

    #[error("unusable as hash key: {0}")]
    UnusableHashKey(&'static str),

    #[error("index operator not supported: {0}")]
    IndexNotSupported(&'static str),

    #[error("{0}")]
    General(String),
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::General(message.into())
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch(message.into())
    }

    pub fn unknown_operator(message: impl Into<String>) -> Self {
        Self::UnknownOperator(message.into())
    }
}

/// A unified error type for all phases.
#[derive(Debug, Error)]
pub enum MonkeyError {
    #[error("{}", format_parser_errors(.0))]
    Parse(Vec<ParserError>),

    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Vec<ParserError>> for MonkeyError {
    fn from(errors: Vec<ParserError>) -> Self {
        Self::Parse(errors)
    }
}

fn format_parser_errors(errors: &[ParserError]) -> String {
    let lines: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    format!("parser errors:\n  {}", lines.join("\n  "))
}
