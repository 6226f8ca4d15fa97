//! Statement execution.

use crate::ast::{Stmt, StmtKind};
use crate::interpreter::value::Value;

use super::{Interpreter, RuntimeResult};

impl Interpreter {
    /// Execute a statement and produce its result value. `let` yields the
    /// bound value, matching what the VM leaves behind as its last popped
    /// element; `return` yields the `Returned` sentinel.
    pub(crate) fn execute(&mut self, stmt: &Stmt) -> RuntimeResult<Value> {
        match &stmt.kind {
            StmtKind::Let { name, value } => {
                let value = self.evaluate(value)?;
                self.environment
                    .borrow_mut()
                    .define(name.clone(), value.clone());
                Ok(value)
            }
            StmtKind::Return(value) => {
                let value = self.evaluate(value)?;
                Ok(Value::Returned(Box::new(value)))
            }
            StmtKind::Expression(expr) => self.evaluate(expr),
        }
    }
}
