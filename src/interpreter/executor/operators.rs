//! Prefix and infix operator evaluation.

use crate::ast::{BinaryOp, UnaryOp};
use crate::error::RuntimeError;
use crate::interpreter::value::Value;

use super::{Interpreter, RuntimeResult};

impl Interpreter {
    pub(crate) fn evaluate_prefix(
        &mut self,
        operator: UnaryOp,
        right: Value,
    ) -> RuntimeResult<Value> {
        match operator {
            UnaryOp::Not => Ok(Value::Bool(!right.is_truthy())),
            UnaryOp::Neg => match right {
                Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
                other => Err(RuntimeError::unknown_operator(format!(
                    "-{}",
                    other.type_name()
                ))),
            },
        }
    }

    pub(crate) fn evaluate_infix(
        &mut self,
        left: Value,
        operator: BinaryOp,
        right: Value,
    ) -> RuntimeResult<Value> {
        match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => integer_infix(*a, operator, *b),
            (Value::Str(a), Value::Str(b)) => string_infix(a, operator, b),
            _ => match operator {
                BinaryOp::Eq => Ok(Value::Bool(left == right)),
                BinaryOp::NotEq => Ok(Value::Bool(left != right)),
                _ if left.type_name() != right.type_name() => {
                    Err(RuntimeError::type_mismatch(format!(
                        "{} {} {}",
                        left.type_name(),
                        operator,
                        right.type_name()
                    )))
                }
                _ => Err(RuntimeError::unknown_operator(format!(
                    "{} {} {}",
                    left.type_name(),
                    operator,
                    right.type_name()
                ))),
            },
        }
    }
}

fn integer_infix(left: i64, operator: BinaryOp, right: i64) -> RuntimeResult<Value> {
    // Integer arithmetic wraps on overflow.
    match operator {
        BinaryOp::Add => Ok(Value::Int(left.wrapping_add(right))),
        BinaryOp::Sub => Ok(Value::Int(left.wrapping_sub(right))),
        BinaryOp::Mul => Ok(Value::Int(left.wrapping_mul(right))),
        BinaryOp::Div => {
            if right == 0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(Value::Int(left.wrapping_div(right)))
            }
        }
        BinaryOp::Lt => Ok(Value::Bool(left < right)),
        BinaryOp::Gt => Ok(Value::Bool(left > right)),
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
    }
}

fn string_infix(left: &str, operator: BinaryOp, right: &str) -> RuntimeResult<Value> {
    match operator {
        BinaryOp::Add => Ok(Value::Str(format!("{}{}", left, right))),
        // Equality on strings compares contents.
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        _ => Err(RuntimeError::unknown_operator(format!(
            "STRING {} STRING",
            operator
        ))),
    }
}
