//! Abstract Syntax Tree for Monkey.
//!
//! Every node renders back to canonical source text through `Display`. The
//! compiler relies on that rendering to order hash-literal keys, so the
//! output format is part of the crate's observable behavior.

pub mod expr;
pub mod stmt;

pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use stmt::{BlockStmt, Program, Stmt, StmtKind};
