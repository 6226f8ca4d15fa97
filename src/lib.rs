//! Monkey: a small, dynamically-typed, expression-oriented scripting
//! language.
//!
//! Source text runs through one pipeline — lexer, Pratt parser, and then
//! one of two interchangeable engines:
//!
//! - **Tree-walk interpreter**: direct AST evaluation over an environment
//!   chain.
//! - **Bytecode VM**: a single-pass compiler with closure conversion
//!   feeding a stack-based virtual machine.
//!
//! Both engines produce identical observable results for the same program.

pub mod ast;
pub mod bytecode;
pub mod compiler;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod span;
pub mod vm;

use ast::Program;
use bytecode::Bytecode;
use compiler::Compiler;
use error::{MonkeyError, ParserError, RuntimeError};
use interpreter::{Interpreter, Value};
use parser::Parser;
use vm::Vm;

/// Execution engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Tree-walking interpreter.
    TreeWalk,
    /// Bytecode virtual machine (default).
    #[default]
    Bytecode,
}

/// Parse source code into an AST without executing it.
pub fn parse(source: &str) -> Result<Program, Vec<ParserError>> {
    let mut parser = Parser::from_source(source);
    let program = parser.parse();
    let errors = parser.take_errors();
    if errors.is_empty() {
        Ok(program)
    } else {
        Err(errors)
    }
}

/// Compile source code to bytecode without executing it.
pub fn compile(source: &str) -> Result<Bytecode, MonkeyError> {
    let program = parse(source)?;
    let mut compiler = Compiler::new();
    compiler.compile(&program)?;
    Ok(compiler.bytecode())
}

/// Execute compiled bytecode on a fresh VM.
pub fn run(bytecode: Bytecode) -> Result<Value, RuntimeError> {
    Vm::new(bytecode).run()
}

/// Evaluate source code with the tree-walking interpreter.
pub fn eval(source: &str) -> Result<Value, MonkeyError> {
    let program = parse(source)?;
    Ok(Interpreter::new().interpret(&program)?)
}

/// Run source code end to end on the chosen engine.
pub fn execute(source: &str, mode: ExecutionMode) -> Result<Value, MonkeyError> {
    match mode {
        ExecutionMode::TreeWalk => eval(source),
        ExecutionMode::Bytecode => Ok(run(compile(source)?)?),
    }
}

/// Compile source code and render a human-readable bytecode listing.
pub fn disassemble(source: &str) -> Result<String, MonkeyError> {
    Ok(compile(source)?.disassemble())
}
