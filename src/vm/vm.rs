//! The fetch-decode-execute loop.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::bytecode::{read_u16, read_u8, Bytecode, Opcode};
use crate::error::RuntimeError;
use crate::interpreter::builtins::BUILTINS;
use crate::interpreter::value::{Builtin, Closure, CompiledFunction, HashKey, Value};

use super::frame::Frame;

/// Value stack depth. Exceeding it is a runtime error, not a panic.
pub const STACK_SIZE: usize = 2048;
/// Global binding slots.
pub const GLOBALS_SIZE: usize = 65536;
/// Call depth.
pub const MAX_FRAMES: usize = 1024;

/// The virtual machine. `sp` always points at the next free stack slot;
/// the value most recently popped stays behind at `stack[sp]`.
pub struct Vm {
    constants: Vec<Value>,
    stack: Vec<Value>,
    sp: usize,
    globals: Vec<Value>,
    frames: Vec<Frame>,
}

impl Vm {
    pub fn new(bytecode: Bytecode) -> Self {
        Self::with_globals(bytecode, vec![Value::Null; GLOBALS_SIZE])
    }

    /// Reuse a globals array from an earlier run, so a REPL keeps its
    /// bindings across submissions.
    pub fn with_globals(bytecode: Bytecode, globals: Vec<Value>) -> Self {
        // The whole program is treated as one top-level function that is
        // never returned from.
        let main_fn = Rc::new(CompiledFunction {
            instructions: bytecode.instructions,
            num_locals: 0,
            num_parameters: 0,
        });
        let main_closure = Rc::new(Closure {
            func: main_fn,
            free: Vec::new(),
        });

        let mut frames = Vec::with_capacity(MAX_FRAMES);
        frames.push(Frame::new(main_closure, 0));

        Self {
            constants: bytecode.constants,
            stack: vec![Value::Null; STACK_SIZE],
            sp: 0,
            globals,
            frames,
        }
    }

    /// Hand the globals back, for the next `with_globals`.
    pub fn into_globals(self) -> Vec<Value> {
        self.globals
    }

    /// The value most recently popped off the stack. After a successful
    /// run this is the program's result.
    pub fn last_popped(&self) -> &Value {
        &self.stack[self.sp]
    }

    /// Run to completion and return the program's result.
    pub fn run(&mut self) -> Result<Value, RuntimeError> {
        loop {
            let frame_idx = self.frames.len() - 1;
            let ip = self.frames[frame_idx].ip;
            if ip >= self.frames[frame_idx].instructions().len() {
                break;
            }

            let byte = self.frames[frame_idx].instructions().0[ip];
            self.frames[frame_idx].ip += 1;

            let op = Opcode::from_byte(byte).ok_or(RuntimeError::UnknownOpcode(byte))?;

            match op {
                Opcode::Constant => {
                    let idx = self.read_u16_operand();
                    let constant = self.constants[idx].clone();
                    self.push(constant)?;
                }

                Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
                    self.execute_binary_operation(op)?;
                }

                Opcode::Pop => {
                    self.pop();
                }

                Opcode::True => self.push(Value::Bool(true))?,
                Opcode::False => self.push(Value::Bool(false))?,
                Opcode::Null => self.push(Value::Null)?,

                Opcode::Equal | Opcode::NotEqual | Opcode::GreaterThan => {
                    self.execute_comparison(op)?;
                }

                Opcode::Bang => {
                    let operand = self.pop();
                    self.push(Value::Bool(!operand.is_truthy()))?;
                }

                Opcode::Minus => {
                    let operand = self.pop();
                    match operand {
                        Value::Int(n) => self.push(Value::Int(n.wrapping_neg()))?,
                        other => {
                            return Err(RuntimeError::UnsupportedNegation(other.type_name()))
                        }
                    }
                }

                Opcode::Jump => {
                    let pos = self.read_u16_operand();
                    self.frames[frame_idx].ip = pos;
                }

                Opcode::JumpNotTruthy => {
                    let pos = self.read_u16_operand();
                    let condition = self.pop();
                    if !condition.is_truthy() {
                        self.frames[frame_idx].ip = pos;
                    }
                }

                Opcode::SetGlobal => {
                    let idx = self.read_u16_operand();
                    self.globals[idx] = self.pop();
                }

                Opcode::GetGlobal => {
                    let idx = self.read_u16_operand();
                    let value = self.globals[idx].clone();
                    self.push(value)?;
                }

                Opcode::SetLocal => {
                    let idx = self.read_u8_operand();
                    let base = self.frames[frame_idx].base_pointer;
                    self.stack[base + idx] = self.pop();
                }

                Opcode::GetLocal => {
                    let idx = self.read_u8_operand();
                    let base = self.frames[frame_idx].base_pointer;
                    let value = self.stack[base + idx].clone();
                    self.push(value)?;
                }

                Opcode::GetBuiltin => {
                    let idx = self.read_u8_operand();
                    self.push(Value::Builtin(&BUILTINS[idx]))?;
                }

                Opcode::GetFree => {
                    let idx = self.read_u8_operand();
                    let value = self.frames[frame_idx].closure.free[idx].clone();
                    self.push(value)?;
                }

                Opcode::CurrentClosure => {
                    let closure = self.frames[frame_idx].closure.clone();
                    self.push(Value::Closure(closure))?;
                }

                Opcode::Array => {
                    let count = self.read_u16_operand();
                    let elements = self.stack[self.sp - count..self.sp].to_vec();
                    self.sp -= count;
                    self.push(Value::Array(Rc::new(elements)))?;
                }

                Opcode::Hash => {
                    let count = self.read_u16_operand();
                    let hash = self.build_hash(self.sp - count, self.sp)?;
                    self.sp -= count;
                    self.push(hash)?;
                }

                Opcode::Index => {
                    let index = self.pop();
                    let left = self.pop();
                    self.execute_index(left, index)?;
                }

                Opcode::Call => {
                    let argc = self.read_u8_operand();
                    self.execute_call(argc)?;
                }

                Opcode::Closure => {
                    let const_idx = self.read_u16_operand();
                    let num_free = self.read_u8_operand();
                    self.push_closure(const_idx, num_free)?;
                }

                Opcode::ReturnValue => {
                    let return_value = self.pop();

                    if self.frames.len() == 1 {
                        // A top-level return ends the program with this
                        // value as the result.
                        self.stack[0] = return_value;
                        self.sp = 0;
                        break;
                    }

                    if let Some(frame) = self.frames.pop() {
                        // Drop the callee and every local/argument slot.
                        self.sp = frame.base_pointer - 1;
                    }
                    self.push(return_value)?;
                }

                Opcode::Return => {
                    if self.frames.len() == 1 {
                        self.stack[0] = Value::Null;
                        self.sp = 0;
                        break;
                    }

                    if let Some(frame) = self.frames.pop() {
                        self.sp = frame.base_pointer - 1;
                    }
                    self.push(Value::Null)?;
                }
            }
        }

        Ok(self.last_popped().clone())
    }

    // --- Operand decoding ---

    fn read_u16_operand(&mut self) -> usize {
        let frame_idx = self.frames.len() - 1;
        let frame = &mut self.frames[frame_idx];
        let value = read_u16(&frame.closure.func.instructions.0[frame.ip..]) as usize;
        frame.ip += 2;
        value
    }

    fn read_u8_operand(&mut self) -> usize {
        let frame_idx = self.frames.len() - 1;
        let frame = &mut self.frames[frame_idx];
        let value = read_u8(&frame.closure.func.instructions.0[frame.ip..]) as usize;
        frame.ip += 1;
        value
    }

    // --- Stack primitives ---

    fn push(&mut self, value: Value) -> Result<(), RuntimeError> {
        if self.sp >= STACK_SIZE {
            return Err(RuntimeError::StackOverflow);
        }
        self.stack[self.sp] = value;
        self.sp += 1;
        Ok(())
    }

    /// Pop the top of the stack. The slot keeps the value so
    /// [`Vm::last_popped`] can see it. Compiled code never underflows;
    /// hand-built instruction streams get null instead of a panic.
    fn pop(&mut self) -> Value {
        if self.sp == 0 {
            return Value::Null;
        }
        self.sp -= 1;
        self.stack[self.sp].clone()
    }

    fn push_frame(&mut self, frame: Frame) -> Result<(), RuntimeError> {
        if self.frames.len() >= MAX_FRAMES {
            return Err(RuntimeError::StackOverflow);
        }
        self.frames.push(frame);
        Ok(())
    }

    // --- Operations ---

    fn execute_binary_operation(&mut self, op: Opcode) -> Result<(), RuntimeError> {
        let right = self.pop();
        let left = self.pop();

        match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => {
                let result = match op {
                    Opcode::Add => a.wrapping_add(*b),
                    Opcode::Sub => a.wrapping_sub(*b),
                    Opcode::Mul => a.wrapping_mul(*b),
                    _ => {
                        if *b == 0 {
                            return Err(RuntimeError::DivisionByZero);
                        }
                        a.wrapping_div(*b)
                    }
                };
                self.push(Value::Int(result))
            }
            // Only `+` means anything for strings: concatenation.
            (Value::Str(a), Value::Str(b)) if op == Opcode::Add => {
                self.push(Value::Str(format!("{}{}", a, b)))
            }
            _ => Err(RuntimeError::UnsupportedBinaryTypes {
                left: left.type_name(),
                right: right.type_name(),
            }),
        }
    }

    fn execute_comparison(&mut self, op: Opcode) -> Result<(), RuntimeError> {
        let right = self.pop();
        let left = self.pop();

        match op {
            Opcode::Equal => self.push(Value::Bool(left == right)),
            Opcode::NotEqual => self.push(Value::Bool(left != right)),
            _ => match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => self.push(Value::Bool(a > b)),
                _ => Err(RuntimeError::unknown_operator(format!(
                    "{} > {}",
                    left.type_name(),
                    right.type_name()
                ))),
            },
        }
    }

    fn build_hash(&self, start: usize, end: usize) -> Result<Value, RuntimeError> {
        let mut entries = IndexMap::with_capacity((end - start) / 2);

        let mut i = start;
        while i < end {
            let key = &self.stack[i];
            let value = self.stack[i + 1].clone();
            let hash_key = HashKey::from_value(key)
                .ok_or_else(|| RuntimeError::UnusableHashKey(key.type_name()))?;
            entries.insert(hash_key, value);
            i += 2;
        }

        Ok(Value::Hash(Rc::new(entries)))
    }

    fn execute_index(&mut self, left: Value, index: Value) -> Result<(), RuntimeError> {
        match (&left, &index) {
            (Value::Array(elements), Value::Int(i)) => {
                let i = *i;
                if i < 0 || i as usize >= elements.len() {
                    self.push(Value::Null)
                } else {
                    self.push(elements[i as usize].clone())
                }
            }
            // Out-of-domain array indexes yield null rather than erroring.
            (Value::Array(_), _) => self.push(Value::Null),
            (Value::Hash(entries), key) => {
                let hash_key = HashKey::from_value(key)
                    .ok_or_else(|| RuntimeError::UnusableHashKey(key.type_name()))?;
                let value = entries.get(&hash_key).cloned().unwrap_or(Value::Null);
                self.push(value)
            }
            _ => Err(RuntimeError::IndexNotSupported(left.type_name())),
        }
    }

    fn execute_call(&mut self, argc: usize) -> Result<(), RuntimeError> {
        let callee = self.stack[self.sp - 1 - argc].clone();
        match callee {
            Value::Closure(closure) => self.call_closure(closure, argc),
            Value::Builtin(builtin) => self.call_builtin(builtin, argc),
            _ => Err(RuntimeError::NotCallable),
        }
    }

    fn call_closure(&mut self, closure: Rc<Closure>, argc: usize) -> Result<(), RuntimeError> {
        if argc != closure.func.num_parameters {
            return Err(RuntimeError::WrongArgumentCount {
                want: closure.func.num_parameters,
                got: argc,
            });
        }

        let num_locals = closure.func.num_locals;
        let base_pointer = self.sp - argc;

        if base_pointer + num_locals >= STACK_SIZE {
            return Err(RuntimeError::StackOverflow);
        }

        self.push_frame(Frame::new(closure, base_pointer))?;
        // Parameters already sit in the first `argc` local slots; reserve
        // the rest.
        self.sp = base_pointer + num_locals;
        Ok(())
    }

    fn call_builtin(&mut self, builtin: &'static Builtin, argc: usize) -> Result<(), RuntimeError> {
        let args = self.stack[self.sp - argc..self.sp].to_vec();
        let result = (builtin.func)(args)?;

        // Discard the callee and argument slots.
        self.sp -= argc + 1;
        self.push(result)
    }

    fn push_closure(&mut self, const_idx: usize, num_free: usize) -> Result<(), RuntimeError> {
        let func = match self.constants[const_idx].clone() {
            Value::CompiledFunction(func) => func,
            other => return Err(RuntimeError::NotAFunction(other.type_name())),
        };

        let free = self.stack[self.sp - num_free..self.sp].to_vec();
        self.sp -= num_free;

        self.push(Value::Closure(Rc::new(Closure { func, free })))
    }

    #[cfg(test)]
    pub(crate) fn stack_pointer(&self) -> usize {
        self.sp
    }

    #[cfg(test)]
    pub(crate) fn frame_count(&self) -> usize {
        self.frames.len()
    }
}
