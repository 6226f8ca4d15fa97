//! AST-to-bytecode compiler.
//!
//! A recursive tree walk emitting into the current compilation scope. Each
//! function literal gets a fresh scope (instruction buffer plus an enclosed
//! symbol table); leaving the scope yields the function's instructions,
//! after which the free variables the body captured are loaded and the
//! whole thing is wrapped by `OpClosure`. The last two emitted instructions
//! are tracked per scope so conditionals can strip a trailing `OpPop` and
//! function bodies can turn one into an implicit return.

pub mod symbol_table;

use crate::ast::{BinaryOp, BlockStmt, Expr, ExprKind, Program, Stmt, StmtKind, UnaryOp};
use crate::bytecode::{make, Bytecode, Instructions, Opcode};
use crate::error::CompileError;
use crate::interpreter::builtins::BUILTINS;
use crate::interpreter::value::{CompiledFunction, Value};

pub use symbol_table::{Symbol, SymbolScope, SymbolTable};

use std::rc::Rc;

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// An emitted instruction's opcode and byte offset, kept for peephole
/// decisions.
#[derive(Debug, Clone, Copy)]
struct EmittedInstruction {
    opcode: Opcode,
    position: usize,
}

/// One function body under compilation.
#[derive(Debug, Default)]
struct CompilationScope {
    instructions: Instructions,
    last_instruction: Option<EmittedInstruction>,
    previous_instruction: Option<EmittedInstruction>,
}

/// The compiler: transforms an AST into bytecode plus a constant pool.
pub struct Compiler {
    constants: Vec<Value>,
    symbol_table: SymbolTable,
    scopes: Vec<CompilationScope>,
    scope_index: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        let mut symbol_table = SymbolTable::new();
        for (i, builtin) in BUILTINS.iter().enumerate() {
            symbol_table.define_builtin(i, builtin.name);
        }

        Self {
            constants: Vec::new(),
            symbol_table,
            scopes: vec![CompilationScope::default()],
            scope_index: 0,
        }
    }

    /// Resume with state from a previous compilation, so a REPL can keep
    /// its definitions across submissions.
    pub fn with_state(symbol_table: SymbolTable, constants: Vec<Value>) -> Self {
        let mut compiler = Self::new();
        compiler.symbol_table = symbol_table;
        compiler.constants = constants;
        compiler
    }

    /// Hand the threaded state back, for the next `with_state`.
    pub fn into_state(self) -> (SymbolTable, Vec<Value>) {
        (self.symbol_table, self.constants)
    }

    pub fn compile(&mut self, program: &Program) -> CompileResult<()> {
        for stmt in &program.statements {
            self.compile_stmt(stmt)?;
        }
        Ok(())
    }

    pub fn bytecode(&self) -> Bytecode {
        Bytecode {
            instructions: self.current_instructions().clone(),
            constants: self.constants.clone(),
        }
    }

    fn compile_stmt(&mut self, stmt: &Stmt) -> CompileResult<()> {
        match &stmt.kind {
            StmtKind::Let { name, value } => {
                // Defined before the value compiles, so the value can refer
                // to the binding (recursive functions).
                let symbol = self.symbol_table.define(name);
                self.compile_expr(value)?;
                match symbol.scope {
                    SymbolScope::Global => self.emit(Opcode::SetGlobal, &[symbol.index]),
                    _ => self.emit(Opcode::SetLocal, &[symbol.index]),
                };
            }
            StmtKind::Return(value) => {
                self.compile_expr(value)?;
                self.emit(Opcode::ReturnValue, &[]);
            }
            StmtKind::Expression(expr) => {
                self.compile_expr(expr)?;
                self.emit(Opcode::Pop, &[]);
            }
        }
        Ok(())
    }

    fn compile_block(&mut self, block: &BlockStmt) -> CompileResult<()> {
        for stmt in &block.statements {
            self.compile_stmt(stmt)?;
        }
        Ok(())
    }

    fn compile_expr(&mut self, expr: &Expr) -> CompileResult<()> {
        match &expr.kind {
            ExprKind::IntegerLiteral(value) => {
                let idx = self.add_constant(Value::Int(*value));
                self.emit(Opcode::Constant, &[idx]);
            }

            ExprKind::StringLiteral(value) => {
                let idx = self.add_constant(Value::Str(value.clone()));
                self.emit(Opcode::Constant, &[idx]);
            }

            ExprKind::BooleanLiteral(true) => {
                self.emit(Opcode::True, &[]);
            }
            ExprKind::BooleanLiteral(false) => {
                self.emit(Opcode::False, &[]);
            }

            ExprKind::Identifier(name) => {
                let symbol = self
                    .symbol_table
                    .resolve(name)
                    .ok_or_else(|| CompileError::UndefinedVariable(name.clone()))?;
                self.load_symbol(&symbol);
            }

            ExprKind::Prefix { operator, right } => {
                self.compile_expr(right)?;
                match operator {
                    UnaryOp::Not => self.emit(Opcode::Bang, &[]),
                    UnaryOp::Neg => self.emit(Opcode::Minus, &[]),
                };
            }

            ExprKind::Infix {
                left,
                operator,
                right,
            } => {
                // `a < b` compiles as `b > a`: swap the operands and reuse
                // the single greater-than opcode.
                if *operator == BinaryOp::Lt {
                    self.compile_expr(right)?;
                    self.compile_expr(left)?;
                    self.emit(Opcode::GreaterThan, &[]);
                    return Ok(());
                }

                self.compile_expr(left)?;
                self.compile_expr(right)?;
                match operator {
                    BinaryOp::Add => self.emit(Opcode::Add, &[]),
                    BinaryOp::Sub => self.emit(Opcode::Sub, &[]),
                    BinaryOp::Mul => self.emit(Opcode::Mul, &[]),
                    BinaryOp::Div => self.emit(Opcode::Div, &[]),
                    BinaryOp::Gt => self.emit(Opcode::GreaterThan, &[]),
                    BinaryOp::Eq => self.emit(Opcode::Equal, &[]),
                    BinaryOp::NotEq => self.emit(Opcode::NotEqual, &[]),
                    BinaryOp::Lt => unreachable!("handled above"),
                };
            }

            ExprKind::If {
                condition,
                consequence,
                alternative,
            } => {
                self.compile_expr(condition)?;

                // Placeholder target, patched once the consequence length
                // is known.
                let jump_not_truthy_pos = self.emit(Opcode::JumpNotTruthy, &[9999]);

                self.compile_block(consequence)?;
                if self.last_instruction_is(Opcode::Pop) {
                    self.remove_last_pop();
                }

                let jump_pos = self.emit(Opcode::Jump, &[9999]);

                let after_consequence = self.current_instructions().len();
                self.change_operand(jump_not_truthy_pos, after_consequence);

                match alternative {
                    None => {
                        self.emit(Opcode::Null, &[]);
                    }
                    Some(alt) => {
                        self.compile_block(alt)?;
                        if self.last_instruction_is(Opcode::Pop) {
                            self.remove_last_pop();
                        }
                    }
                }

                let after_alternative = self.current_instructions().len();
                self.change_operand(jump_pos, after_alternative);
            }

            ExprKind::FunctionLiteral {
                parameters,
                body,
                name,
            } => {
                self.enter_scope();

                if !name.is_empty() {
                    self.symbol_table.define_function_name(name);
                }
                for param in parameters {
                    self.symbol_table.define(param);
                }

                self.compile_block(body)?;

                // The body's last expression becomes the return value; an
                // empty body returns null.
                if self.last_instruction_is(Opcode::Pop) {
                    self.replace_last_pop_with_return();
                }
                if !self.last_instruction_is(Opcode::ReturnValue) {
                    self.emit(Opcode::Return, &[]);
                }

                let free_symbols = self.symbol_table.free_symbols.clone();
                let num_locals = self.symbol_table.num_definitions;
                let instructions = self.leave_scope();

                for symbol in &free_symbols {
                    self.load_symbol(symbol);
                }

                let func = CompiledFunction {
                    instructions,
                    num_locals,
                    num_parameters: parameters.len(),
                };
                let idx = self.add_constant(Value::CompiledFunction(Rc::new(func)));
                self.emit(Opcode::Closure, &[idx, free_symbols.len()]);
            }

            ExprKind::Call { callee, arguments } => {
                self.compile_expr(callee)?;
                for arg in arguments {
                    self.compile_expr(arg)?;
                }
                self.emit(Opcode::Call, &[arguments.len()]);
            }

            ExprKind::ArrayLiteral(elements) => {
                for element in elements {
                    self.compile_expr(element)?;
                }
                self.emit(Opcode::Array, &[elements.len()]);
            }

            ExprKind::HashLiteral(pairs) => {
                // Sort by the key's source rendering so bytecode is
                // deterministic regardless of literal order.
                let mut sorted: Vec<&(Expr, Expr)> = pairs.iter().collect();
                sorted.sort_by(|a, b| a.0.to_string().cmp(&b.0.to_string()));

                for (key, value) in sorted {
                    self.compile_expr(key)?;
                    self.compile_expr(value)?;
                }
                self.emit(Opcode::Hash, &[pairs.len() * 2]);
            }

            ExprKind::Index { left, index } => {
                self.compile_expr(left)?;
                self.compile_expr(index)?;
                self.emit(Opcode::Index, &[]);
            }
        }
        Ok(())
    }

    // --- Emission helpers ---

    fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    pub(crate) fn emit(&mut self, op: Opcode, operands: &[usize]) -> usize {
        let ins = make(op, operands);
        let pos = self.add_instruction(&ins);
        self.set_last_instruction(op, pos);
        pos
    }

    fn add_instruction(&mut self, ins: &[u8]) -> usize {
        let pos = self.current_instructions().len();
        self.scopes[self.scope_index].instructions.extend(ins);
        pos
    }

    pub(crate) fn current_instructions(&self) -> &Instructions {
        &self.scopes[self.scope_index].instructions
    }

    fn set_last_instruction(&mut self, opcode: Opcode, position: usize) {
        let scope = &mut self.scopes[self.scope_index];
        scope.previous_instruction = scope.last_instruction;
        scope.last_instruction = Some(EmittedInstruction { opcode, position });
    }

    fn last_instruction_is(&self, op: Opcode) -> bool {
        self.scopes[self.scope_index]
            .last_instruction
            .map_or(false, |last| last.opcode == op)
    }

    fn remove_last_pop(&mut self) {
        let scope = &mut self.scopes[self.scope_index];
        if let Some(last) = scope.last_instruction {
            scope.instructions.0.truncate(last.position);
            scope.last_instruction = scope.previous_instruction;
        }
    }

    fn replace_instruction(&mut self, pos: usize, new_instruction: &[u8]) {
        let ins = &mut self.scopes[self.scope_index].instructions.0;
        ins[pos..pos + new_instruction.len()].copy_from_slice(new_instruction);
    }

    /// Re-encode the instruction at `op_pos` with a new operand. Only used
    /// for jump patching, where the widths never change.
    fn change_operand(&mut self, op_pos: usize, operand: usize) {
        if let Some(op) = Opcode::from_byte(self.current_instructions().0[op_pos]) {
            let new_instruction = make(op, &[operand]);
            self.replace_instruction(op_pos, &new_instruction);
        }
    }

    fn replace_last_pop_with_return(&mut self) {
        if let Some(last) = self.scopes[self.scope_index].last_instruction {
            self.replace_instruction(last.position, &make(Opcode::ReturnValue, &[]));
            self.scopes[self.scope_index].last_instruction = Some(EmittedInstruction {
                opcode: Opcode::ReturnValue,
                position: last.position,
            });
        }
    }

    // --- Scope management ---

    pub(crate) fn enter_scope(&mut self) {
        self.scopes.push(CompilationScope::default());
        self.scope_index += 1;

        let outer = std::mem::take(&mut self.symbol_table);
        self.symbol_table = SymbolTable::new_enclosed(outer);
    }

    pub(crate) fn leave_scope(&mut self) -> Instructions {
        let scope = self.scopes.pop().unwrap_or_default();
        self.scope_index -= 1;

        if let Some(outer) = self.symbol_table.outer.take() {
            self.symbol_table = *outer;
        }

        scope.instructions
    }

    fn load_symbol(&mut self, symbol: &Symbol) {
        match symbol.scope {
            SymbolScope::Global => self.emit(Opcode::GetGlobal, &[symbol.index]),
            SymbolScope::Local => self.emit(Opcode::GetLocal, &[symbol.index]),
            SymbolScope::Builtin => self.emit(Opcode::GetBuiltin, &[symbol.index]),
            SymbolScope::Free => self.emit(Opcode::GetFree, &[symbol.index]),
            SymbolScope::Function => self.emit(Opcode::CurrentClosure, &[]),
        };
    }

    #[cfg(test)]
    pub(crate) fn scope_depth(&self) -> usize {
        self.scope_index
    }

    #[cfg(test)]
    pub(crate) fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }
}
