//! The tree-walking evaluator, environment, and builtins for the Kira
//! programming language.

pub mod builtins;
mod ctx;
mod eval;
mod exec;
mod flow;
mod numeric;

#[cfg(test)]
mod tests;

pub use ctx::Ctx;
pub use flow::Flow;
pub use kira_ast::{Env, Io, Value};

use kira_ast::{Program, Stmt};
use kira_errors::Result;

/// A fresh root environment with every builtin installed as a sealed
/// `const` binding.
pub fn new_root_env() -> Env {
    let env = Env::root();
    builtins::install(&env);
    env
}

/// Runs a whole program against `env` (persisting top-level bindings
/// across calls, the way the REPL needs to), returning the value of its
/// terminal `ExprStmt` — or `Null` if the program is empty or doesn't end
/// in one (the same rule a `Block` follows).
pub fn run_program(program: &Program, env: &Env, io: &mut Io<'_>) -> Result<Value> {
    let mut ctx = Ctx::new(io);
    let mut result = Value::Null;
    for (i, stmt) in program.stmts.iter().enumerate() {
        let flow = exec::exec_stmt(stmt, env, &mut ctx)?;
        if flow.is_returning() {
            return Ok(flow.into_value());
        }
        result = if i + 1 == program.stmts.len() && matches!(stmt, Stmt::ExprStmt(_)) {
            flow.into_value()
        } else {
            Value::Null
        };
    }
    Ok(result)
}
