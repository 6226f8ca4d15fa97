//! Native builtin functions.
//!
//! The registry is index-addressed: the compiler registers each builtin
//! symbol under its position here and the VM loads it back with
//! `OpGetBuiltin`, so the order is part of the bytecode contract. The
//! evaluator looks builtins up by name instead.

use std::rc::Rc;

use crate::error::RuntimeError;
use crate::interpreter::value::{Builtin, Value};

pub static BUILTINS: &[Builtin] = &[
    Builtin {
        name: "len",
        func: builtin_len,
    },
    Builtin {
        name: "puts",
        func: builtin_puts,
    },
    Builtin {
        name: "first",
        func: builtin_first,
    },
    Builtin {
        name: "last",
        func: builtin_last,
    },
    Builtin {
        name: "rest",
        func: builtin_rest,
    },
    Builtin {
        name: "push",
        func: builtin_push,
    },
];

/// Look a builtin up by name.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

fn check_arity(args: &[Value], want: usize) -> Result<(), RuntimeError> {
    if args.len() != want {
        return Err(RuntimeError::new(format!(
            "wrong number of arguments. got={}, want={}",
            args.len(),
            want
        )));
    }
    Ok(())
}

fn builtin_len(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1)?;
    match &args[0] {
        Value::Str(s) => Ok(Value::Int(s.len() as i64)),
        Value::Array(elements) => Ok(Value::Int(elements.len() as i64)),
        other => Err(RuntimeError::new(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_puts(args: Vec<Value>) -> Result<Value, RuntimeError> {
    for arg in &args {
        println!("{}", arg);
    }
    Ok(Value::Null)
}

fn builtin_first(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1)?;
    match &args[0] {
        Value::Array(elements) => Ok(elements.first().cloned().unwrap_or(Value::Null)),
        other => Err(RuntimeError::new(format!(
            "argument to `first` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_last(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1)?;
    match &args[0] {
        Value::Array(elements) => Ok(elements.last().cloned().unwrap_or(Value::Null)),
        other => Err(RuntimeError::new(format!(
            "argument to `last` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_rest(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 1)?;
    match &args[0] {
        Value::Array(elements) => {
            if elements.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(Value::Array(Rc::new(elements[1..].to_vec())))
            }
        }
        other => Err(RuntimeError::new(format!(
            "argument to `rest` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_push(args: Vec<Value>) -> Result<Value, RuntimeError> {
    check_arity(&args, 2)?;
    match &args[0] {
        Value::Array(elements) => {
            let mut extended = elements.as_ref().clone();
            extended.push(args[1].clone());
            Ok(Value::Array(Rc::new(extended)))
        }
        other => Err(RuntimeError::new(format!(
            "argument to `push` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}
