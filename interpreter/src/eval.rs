//! Expression evaluation: `eval(node, env) -> Value`.

use crate::ctx::Ctx;
use crate::exec::exec_block;
use crate::flow::Flow;
use crate::numeric;
use kira_ast::{AssignTarget, BinaryOp, DictKey, Env, Expr, Function, UnaryOp, Value};
use kira_errors::{Result, RuntimeError};
use kira_span::Span;
use std::cmp::Ordering;
use std::rc::Rc;

pub fn eval(expr: &Expr, env: &Env, ctx: &mut Ctx) -> Result<Flow> {
    let value = match expr {
        Expr::IntLit(n, _) => Value::Int(*n),
        Expr::FloatLit(n, _) => Value::Float(*n),
        Expr::StrLit(s, _) => Value::Str(s.clone()),
        Expr::BoolLit(b, _) => Value::Bool(*b),
        Expr::NullLit(_) => Value::Null,
        Expr::Ident(name, span) => env.lookup(name, *span)?,

        Expr::ArrayLit(elems, _) => {
            let mut values = Vec::with_capacity(elems.len());
            for elem in elems {
                let flow = eval(elem, env, ctx)?;
                if flow.is_returning() {
                    return Ok(flow);
                }
                values.push(flow.into_value());
            }
            Value::array(values)
        }

        Expr::DictLit(pairs, span) => {
            let mut entries = indexmap::IndexMap::new();
            for (key_expr, value_expr) in pairs {
                let key_flow = eval(key_expr, env, ctx)?;
                if key_flow.is_returning() {
                    return Ok(key_flow);
                }
                let key = DictKey::from_value(&key_flow.into_value(), *span)?;
                let value_flow = eval(value_expr, env, ctx)?;
                if value_flow.is_returning() {
                    return Ok(value_flow);
                }
                entries.insert(key, value_flow.into_value());
            }
            Value::dict(entries)
        }

        Expr::Index { target, key, span } => {
            let target_flow = eval(target, env, ctx)?;
            if target_flow.is_returning() {
                return Ok(target_flow);
            }
            let key_flow = eval(key, env, ctx)?;
            if key_flow.is_returning() {
                return Ok(key_flow);
            }
            index_get(&target_flow.into_value(), &key_flow.into_value(), *span)?
        }

        Expr::Call { callee, args, span } => {
            let callee_flow = eval(callee, env, ctx)?;
            if callee_flow.is_returning() {
                return Ok(callee_flow);
            }
            let mut arg_values = Vec::with_capacity(args.len());
            for arg in args {
                let flow = eval(arg, env, ctx)?;
                if flow.is_returning() {
                    return Ok(flow);
                }
                arg_values.push(flow.into_value());
            }
            call(&callee_flow.into_value(), &arg_values, *span, ctx)?
        }

        Expr::Prefix { op, rhs, span } => {
            let rhs_flow = eval(rhs, env, ctx)?;
            if rhs_flow.is_returning() {
                return Ok(rhs_flow);
            }
            eval_prefix(*op, &rhs_flow.into_value(), *span)?
        }

        Expr::Infix { op, lhs, rhs, span } => return eval_infix(*op, lhs, rhs, *span, env, ctx),

        Expr::Assign { target, value, span } => {
            let value_flow = eval(value, env, ctx)?;
            if value_flow.is_returning() {
                return Ok(value_flow);
            }
            let value = value_flow.into_value();
            assign(target, value.clone(), *span, env, ctx)?;
            value
        }

        Expr::If { cond, then_block, else_block, span: _ } => {
            let cond_flow = eval(cond, env, ctx)?;
            if cond_flow.is_returning() {
                return Ok(cond_flow);
            }
            if cond_flow.into_value().is_truthy() {
                return exec_block(then_block, env, ctx);
            }
            match else_block {
                Some(branch) => return eval(branch, env, ctx),
                None => Value::Null,
            }
        }

        Expr::FnLit { params, body, span: _ } => Value::Function(Rc::new(Function {
            name: None,
            params: params.iter().map(|p| p.name.clone()).collect(),
            body: body.clone(),
            captured_env: env.clone(),
        })),

        Expr::Block(block) => return exec_block(block, env, ctx),
    };
    Ok(Flow::Normal(value))
}

fn eval_prefix(op: UnaryOp, rhs: &Value, span: Span) -> Result<Value> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!rhs.is_truthy())),
        UnaryOp::Neg => match rhs {
            Value::Int(n) => Ok(Value::Int(-n)),
            Value::Float(n) => Ok(Value::Float(-n)),
            other => Err(RuntimeError::Type {
                message: format!("bad operand type for unary -: '{}'", other.type_name()),
                span,
            }
            .into()),
        },
        UnaryOp::Plus => match rhs {
            Value::Int(_) | Value::Float(_) => Ok(rhs.clone()),
            other => Err(RuntimeError::Type {
                message: format!("bad operand type for unary +: '{}'", other.type_name()),
                span,
            }
            .into()),
        },
    }
}

/// Handles `and`/`or` short-circuiting before evaluating the right-hand
/// side at all; every other operator evaluates both sides.
fn eval_infix(op: BinaryOp, lhs: &Expr, rhs: &Expr, span: Span, env: &Env, ctx: &mut Ctx) -> Result<Flow> {
    if matches!(op, BinaryOp::And | BinaryOp::Or) {
        let lhs_flow = eval(lhs, env, ctx)?;
        if lhs_flow.is_returning() {
            return Ok(lhs_flow);
        }
        let lhs_value = lhs_flow.into_value();
        let short_circuits = match op {
            BinaryOp::And => !lhs_value.is_truthy(),
            BinaryOp::Or => lhs_value.is_truthy(),
            _ => unreachable!(),
        };
        if short_circuits {
            return Ok(Flow::Normal(lhs_value));
        }
        return eval(rhs, env, ctx);
    }

    let lhs_flow = eval(lhs, env, ctx)?;
    if lhs_flow.is_returning() {
        return Ok(lhs_flow);
    }
    let rhs_flow = eval(rhs, env, ctx)?;
    if rhs_flow.is_returning() {
        return Ok(rhs_flow);
    }
    let (lhs, rhs) = (lhs_flow.into_value(), rhs_flow.into_value());

    let value = match op {
        BinaryOp::Add => numeric::add(&lhs, &rhs, span)?,
        BinaryOp::Sub => numeric::sub(&lhs, &rhs, span)?,
        BinaryOp::Mul => numeric::mul(&lhs, &rhs, span)?,
        BinaryOp::Div => numeric::div(&lhs, &rhs, span)?,
        BinaryOp::Mod => numeric::modulo(&lhs, &rhs, span)?,
        BinaryOp::Pow => numeric::pow(&lhs, &rhs, span)?,
        BinaryOp::Eq => Value::Bool(lhs.values_equal(&rhs)),
        BinaryOp::Neq => Value::Bool(!lhs.values_equal(&rhs)),
        BinaryOp::Lt => Value::Bool(numeric::compare(&lhs, &rhs, span)? == Ordering::Less),
        BinaryOp::Lte => Value::Bool(numeric::compare(&lhs, &rhs, span)? != Ordering::Greater),
        BinaryOp::Gt => Value::Bool(numeric::compare(&lhs, &rhs, span)? == Ordering::Greater),
        BinaryOp::Gte => Value::Bool(numeric::compare(&lhs, &rhs, span)? != Ordering::Less),
        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    };
    Ok(Flow::Normal(value))
}

/// `Index` reads: arrays and strings by non-negative integer,
/// dicts by hashable key.
pub fn index_get(target: &Value, key: &Value, span: Span) -> Result<Value> {
    match target {
        Value::Array(arr) => {
            let arr = arr.borrow();
            let i = require_index(key, span)?;
            arr.get(i)
                .cloned()
                .ok_or_else(|| RuntimeError::IndexOutOfRange { index: i as i64, len: arr.len(), span }.into())
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let i = require_index(key, span)?;
            chars
                .get(i)
                .map(|c| Value::str(c.to_string()))
                .ok_or_else(|| RuntimeError::IndexOutOfRange { index: i as i64, len: chars.len(), span }.into())
        }
        Value::Dict(dict) => {
            let dict_key = DictKey::from_value(key, span)?;
            dict.borrow()
                .get(&dict_key)
                .cloned()
                .ok_or_else(|| RuntimeError::KeyNotFound { key: dict_key.to_string(), span }.into())
        }
        other => Err(RuntimeError::Type {
            message: format!("'{}' is not indexable", other.type_name()),
            span,
        }
        .into()),
    }
}

/// Negative indices are not supported; they raise `IndexOutOfRange`
/// rather than wrapping from the end the way some scripting languages do.
fn require_index(key: &Value, span: Span) -> Result<usize> {
    match key {
        Value::Int(i) if *i >= 0 => Ok(*i as usize),
        Value::Int(_) => Err(RuntimeError::IndexOutOfRange { index: 0, len: 0, span }.into()),
        other => Err(RuntimeError::Type {
            message: format!("index must be an int, not '{}'", other.type_name()),
            span,
        }
        .into()),
    }
}

fn assign(target: &AssignTarget, value: Value, span: Span, env: &Env, ctx: &mut Ctx) -> Result<()> {
    match target {
        AssignTarget::Ident(name) => env.assign(name, value, span),
        AssignTarget::Index { target, key } => {
            let target_flow = eval(target, env, ctx)?;
            let target_value = target_flow.into_value();
            let key_flow = eval(key, env, ctx)?;
            let key_value = key_flow.into_value();
            index_set(&target_value, &key_value, value, span)
        }
    }
}

fn index_set(target: &Value, key: &Value, value: Value, span: Span) -> Result<()> {
    match target {
        Value::Array(arr) => {
            let mut arr = arr.borrow_mut();
            let i = require_index(key, span)?;
            let len = arr.len();
            match arr.get_mut(i) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(RuntimeError::IndexOutOfRange { index: i as i64, len, span }.into()),
            }
        }
        Value::Dict(dict) => {
            let dict_key = DictKey::from_value(key, span)?;
            dict.borrow_mut().insert(dict_key, value);
            Ok(())
        }
        other => Err(RuntimeError::Type {
            message: format!("'{}' does not support item assignment", other.type_name()),
            span,
        }
        .into()),
    }
}

/// `Call`: dispatches to a user function or a builtin.
pub fn call(callee: &Value, args: &[Value], span: Span, ctx: &mut Ctx) -> Result<Value> {
    match callee {
        Value::Function(func) => {
            if func.params.len() != args.len() {
                return Err(RuntimeError::Arity {
                    callee: func.name.clone().unwrap_or_else(|| "<fn>".to_string()),
                    expected: func.params.len().to_string(),
                    got: args.len(),
                    span,
                }
                .into());
            }
            ctx.enter_call(span)?;
            let call_env = func.captured_env.child();
            for (param, arg) in func.params.iter().zip(args) {
                call_env.define(param, arg.clone(), true, span)?;
            }
            let result = exec_block(&func.body, &call_env, ctx);
            ctx.exit_call();
            Ok(result?.into_value())
        }
        Value::Builtin(builtin) => {
            if !builtin.arity.accepts(args.len()) {
                return Err(RuntimeError::Arity {
                    callee: builtin.name.to_string(),
                    expected: builtin.arity.describe(),
                    got: args.len(),
                    span,
                }
                .into());
            }
            (builtin.handler)(args, span, ctx.io)
        }
        other => Err(RuntimeError::Type { message: format!("'{}' is not callable", other.type_name()), span }.into()),
    }
}
