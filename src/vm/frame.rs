//! Call frames.

use std::rc::Rc;

use crate::bytecode::Instructions;
use crate::interpreter::value::Closure;

/// One call record: the closure being executed, its instruction pointer,
/// and where its locals start on the value stack.
#[derive(Debug, Clone)]
pub struct Frame {
    pub closure: Rc<Closure>,
    pub ip: usize,
    pub base_pointer: usize,
}

impl Frame {
    pub fn new(closure: Rc<Closure>, base_pointer: usize) -> Self {
        Self {
            closure,
            ip: 0,
            base_pointer,
        }
    }

    pub fn instructions(&self) -> &Instructions {
        &self.closure.func.instructions
    }
}
