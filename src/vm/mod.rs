//! Stack-based virtual machine executing Monkey bytecode.

pub mod frame;
#[allow(clippy::module_inception)]
pub mod vm;

pub use frame::Frame;
pub use vm::{Vm, GLOBALS_SIZE, MAX_FRAMES, STACK_SIZE};
