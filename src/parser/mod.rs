//! Pratt parser for Monkey.
//!
//! Top-down operator precedence: every token kind can carry a prefix rule,
//! an infix rule, or both. Errors are accumulated on the parser and parsing
//! continues on a best-effort basis, so one pass can report several
//! problems.

pub mod core;
pub mod expressions;
pub mod precedence;
pub mod statements;
mod tests;

pub use self::core::Parser;
pub use precedence::Precedence;
