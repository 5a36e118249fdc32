//! Statement execution and block semantics.

use crate::ctx::Ctx;
use crate::eval::eval;
use crate::flow::Flow;
use kira_ast::{Block, Env, Function, Stmt, Value};
use kira_errors::Result;
use std::rc::Rc;

/// A block introduces a fresh child scope, runs its statements in order,
/// and yields the value of its terminal `ExprStmt` — or `Null` if the
/// block is empty or its last statement isn't one.
pub fn exec_block(block: &Block, env: &Env, ctx: &mut Ctx) -> Result<Flow> {
    let scope = env.child();
    let mut result = Value::Null;
    for (i, stmt) in block.stmts.iter().enumerate() {
        let flow = exec_stmt(stmt, &scope, ctx)?;
        if flow.is_returning() {
            return Ok(flow);
        }
        result = if i + 1 == block.stmts.len() && matches!(stmt, Stmt::ExprStmt(_)) {
            flow.into_value()
        } else {
            Value::Null
        };
    }
    Ok(Flow::Normal(result))
}

pub fn exec_stmt(stmt: &Stmt, env: &Env, ctx: &mut Ctx) -> Result<Flow> {
    tracing::trace!(span = %stmt.span(), "executing statement");
    match stmt {
        Stmt::Let { name, value, span } => {
            let flow = eval(value, env, ctx)?;
            if flow.is_returning() {
                return Ok(flow);
            }
            env.define(name, flow.into_value(), true, *span)?;
            Ok(Flow::Normal(Value::Null))
        }
        Stmt::Const { name, value, span } => {
            let flow = eval(value, env, ctx)?;
            if flow.is_returning() {
                return Ok(flow);
            }
            env.define(name, flow.into_value(), false, *span)?;
            Ok(Flow::Normal(Value::Null))
        }
        Stmt::ExprStmt(expr) => eval(expr, env, ctx),
        Stmt::Return { value, span } => match value {
            Some(expr) => {
                let flow = eval(expr, env, ctx)?;
                if flow.is_returning() {
                    return Ok(flow);
                }
                Ok(Flow::Returning(flow.into_value()))
            }
            None => {
                let _ = span;
                Ok(Flow::Returning(Value::Null))
            }
        },
        Stmt::While { cond, body, span: _ } => {
            loop {
                let cond_flow = eval(cond, env, ctx)?;
                if cond_flow.is_returning() {
                    return Ok(cond_flow);
                }
                if !cond_flow.into_value().is_truthy() {
                    break;
                }
                let body_flow = exec_block(body, env, ctx)?;
                if body_flow.is_returning() {
                    return Ok(body_flow);
                }
            }
            Ok(Flow::Normal(Value::Null))
        }
        Stmt::For { name, iterable, body, span } => {
            let flow = eval(iterable, env, ctx)?;
            if flow.is_returning() {
                return Ok(flow);
            }
            let items = iterate(&flow.into_value(), *span)?;
            for item in items {
                let scope = env.child();
                scope.define(name, item, true, *span)?;
                let body_flow = exec_block(body, &scope, ctx)?;
                if body_flow.is_returning() {
                    return Ok(body_flow);
                }
            }
            Ok(Flow::Normal(Value::Null))
        }
        Stmt::FnDecl(decl) => {
            env.define(&decl.name, Value::Null, true, decl.span)?;
            let function = Value::Function(Rc::new(Function {
                name: Some(decl.name.clone()),
                params: decl.params.iter().map(|p| p.name.clone()).collect(),
                body: decl.body.clone(),
                captured_env: env.clone(),
            }));
            env.redefine(&decl.name, function);
            Ok(Flow::Normal(Value::Null))
        }
    }
}

/// `For`: arrays and dicts iterate their elements/keys in
/// order; strings iterate one-character strings.
fn iterate(value: &Value, span: kira_span::Span) -> Result<Vec<Value>> {
    match value {
        Value::Array(arr) => Ok(arr.borrow().clone()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.to_string())).collect()),
        Value::Dict(dict) => Ok(dict.borrow().keys().cloned().map(kira_ast::DictKey::into_value).collect()),
        other => Err(kira_errors::RuntimeError::Type {
            message: format!("'{}' is not iterable", other.type_name()),
            span,
        }
        .into()),
    }
}
