//! Expression evaluation.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{Expr, ExprKind};
use crate::error::RuntimeError;
use crate::interpreter::builtins;
use crate::interpreter::value::{Function, HashKey, Value};

use super::{Interpreter, RuntimeResult};

impl Interpreter {
    pub(crate) fn evaluate(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match &expr.kind {
            ExprKind::IntegerLiteral(value) => Ok(Value::Int(*value)),
            ExprKind::BooleanLiteral(value) => Ok(Value::Bool(*value)),
            ExprKind::StringLiteral(value) => Ok(Value::Str(value.clone())),

            ExprKind::Identifier(name) => self.evaluate_identifier(name),

            ExprKind::Prefix { operator, right } => {
                let right = self.evaluate(right)?;
                self.evaluate_prefix(*operator, right)
            }

            ExprKind::Infix {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.evaluate_infix(left, *operator, right)
            }

            ExprKind::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.evaluate(condition)?;
                if condition.is_truthy() {
                    self.execute_block(consequence)
                } else if let Some(alt) = alternative {
                    self.execute_block(alt)
                } else {
                    Ok(Value::Null)
                }
            }

            ExprKind::FunctionLiteral {
                parameters, body, ..
            } => Ok(Value::Function(Rc::new(Function {
                parameters: parameters.clone(),
                body: body.clone(),
                env: self.environment.clone(),
            }))),

            ExprKind::Call { callee, arguments } => {
                let callee = self.evaluate(callee)?;
                let mut args = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate(arg)?);
                }
                self.apply_function(callee, args)
            }

            ExprKind::ArrayLiteral(elements) => {
                let mut elems = Vec::with_capacity(elements.len());
                for element in elements {
                    elems.push(self.evaluate(element)?);
                }
                Ok(Value::Array(Rc::new(elems)))
            }

            ExprKind::HashLiteral(pairs) => {
                // Insert in the same key-sorted order the compiler emits,
                // so both engines render hashes identically.
                let mut sorted: Vec<&(Expr, Expr)> = pairs.iter().collect();
                sorted.sort_by(|a, b| a.0.to_string().cmp(&b.0.to_string()));

                let mut entries = IndexMap::with_capacity(pairs.len());
                for (key_expr, value_expr) in sorted {
                    let key = self.evaluate(key_expr)?;
                    let hash_key = HashKey::from_value(&key)
                        .ok_or_else(|| RuntimeError::UnusableHashKey(key.type_name()))?;
                    let value = self.evaluate(value_expr)?;
                    entries.insert(hash_key, value);
                }
                Ok(Value::Hash(Rc::new(entries)))
            }

            ExprKind::Index { left, index } => {
                let left = self.evaluate(left)?;
                let index = self.evaluate(index)?;
                self.evaluate_index(left, index)
            }
        }
    }

    fn evaluate_identifier(&mut self, name: &str) -> RuntimeResult<Value> {
        if let Some(value) = self.environment.borrow().get(name) {
            return Ok(value);
        }
        if let Some(builtin) = builtins::lookup(name) {
            return Ok(Value::Builtin(builtin));
        }
        Err(RuntimeError::IdentifierNotFound(name.to_string()))
    }

    fn apply_function(&mut self, callee: Value, arguments: Vec<Value>) -> RuntimeResult<Value> {
        match callee {
            Value::Function(func) => self.call_function(&func, arguments),
            Value::Builtin(builtin) => (builtin.func)(arguments),
            other => Err(RuntimeError::NotAFunction(other.type_name())),
        }
    }

    fn evaluate_index(&mut self, left: Value, index: Value) -> RuntimeResult<Value> {
        match (&left, &index) {
            (Value::Array(elements), Value::Int(i)) => {
                let i = *i;
                if i < 0 || i as usize >= elements.len() {
                    Ok(Value::Null)
                } else {
                    Ok(elements[i as usize].clone())
                }
            }
            // An array indexed by anything that is not an integer
            // yields null rather than an error.
            (Value::Array(_), _) => Ok(Value::Null),
            (Value::Hash(entries), key) => {
                let hash_key = HashKey::from_value(key)
                    .ok_or_else(|| RuntimeError::UnusableHashKey(key.type_name()))?;
                Ok(entries.get(&hash_key).cloned().unwrap_or(Value::Null))
            }
            _ => Err(RuntimeError::IndexNotSupported(left.type_name())),
        }
    }
}
