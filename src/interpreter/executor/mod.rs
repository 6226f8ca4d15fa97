//! Tree-walking evaluator for Monkey.
//!
//! Executes the AST directly against an [`Environment`] chain. Early
//! `return` travels as a [`Value::Returned`] sentinel, unwrapped at
//! function-call boundaries and at the top-level program. Failures
//! short-circuit as `Err(RuntimeError)`.

mod expressions;
mod operators;
mod statements;

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{BlockStmt, Program};
use crate::error::RuntimeError;
use crate::interpreter::environment::Environment;
use crate::interpreter::value::{Function, Value};

pub(crate) type RuntimeResult<T> = Result<T, RuntimeError>;

/// The Monkey tree-walking interpreter.
pub struct Interpreter {
    pub(crate) environment: Rc<RefCell<Environment>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            environment: Rc::new(RefCell::new(Environment::new())),
        }
    }

    /// Evaluate a complete program, returning the value of its last
    /// statement. A top-level `return` stops evaluation early.
    pub fn interpret(&mut self, program: &Program) -> RuntimeResult<Value> {
        let mut result = Value::Null;

        for stmt in &program.statements {
            result = self.execute(stmt)?;
            if let Value::Returned(value) = result {
                return Ok(*value);
            }
        }

        Ok(result)
    }

    /// Evaluate a block in the current environment. Blocks do not open a
    /// new scope; only function calls do. A `Returned` sentinel propagates
    /// unwrapped so nested blocks pass it through.
    pub(crate) fn execute_block(&mut self, block: &BlockStmt) -> RuntimeResult<Value> {
        let mut result = Value::Null;

        for stmt in &block.statements {
            result = self.execute(stmt)?;
            if matches!(result, Value::Returned(_)) {
                return Ok(result);
            }
        }

        Ok(result)
    }

    /// Call a user function: bind arguments in a fresh environment enclosed
    /// by the function's captured environment, run the body, unwrap any
    /// early return.
    pub(crate) fn call_function(
        &mut self,
        func: &Rc<Function>,
        arguments: Vec<Value>,
    ) -> RuntimeResult<Value> {
        if arguments.len() != func.parameters.len() {
            return Err(RuntimeError::WrongArgumentCount {
                want: func.parameters.len(),
                got: arguments.len(),
            });
        }

        let mut call_env = Environment::with_enclosing(func.env.clone());
        for (param, value) in func.parameters.iter().zip(arguments) {
            call_env.define(param.clone(), value);
        }

        let previous = std::mem::replace(&mut self.environment, Rc::new(RefCell::new(call_env)));
        let result = self.execute_block(&func.body);
        self.environment = previous;

        match result? {
            Value::Returned(value) => Ok(*value),
            value => Ok(value),
        }
    }
}
