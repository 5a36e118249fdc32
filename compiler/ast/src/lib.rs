//! AST node shapes and the runtime value model for the Kira programming
//! language.
//!
//! Mirrors the split upstream keeps between its `expressions`/`statements`
//! modules and its `interpreter_value` module: node shapes here, no
//! evaluation logic — dispatch on them lives in the interpreter crate.

pub mod env;
pub mod expr;
pub mod stmt;
pub mod value;

pub use env::Env;
pub use expr::{AssignTarget, BinaryOp, Expr, Param, UnaryOp};
pub use stmt::{Block, FnDecl, Program, Stmt};
pub use value::{Arity, Builtin, BuiltinFn, DictKey, Function, Io, Value};
