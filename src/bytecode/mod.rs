//! Bytecode instruction set for the Monkey VM.
//!
//! Instructions are a flat byte buffer: a one-byte opcode followed by its
//! operands. Operand widths are fixed per opcode and all multi-byte
//! operands are big-endian. Instruction boundaries are recovered solely
//! from the opcode-indexed width table, which is what makes
//! [`opcode::make`] and [`opcode::read_operands`] exact inverses.

pub mod instructions;
pub mod opcode;

pub use instructions::{Bytecode, Instructions};
pub use opcode::{make, read_operands, read_u16, read_u8, Definition, Opcode};
