//! Arithmetic and comparison dispatch over [`Value`], grounded
//! on the upstream `evaluate.rs` pattern of one small function per
//! operator that matches on the operand shapes and raises a typed error
//! on anything it doesn't recognize.

use kira_ast::Value;
use kira_errors::{Result, RuntimeError};
use kira_span::Span;

fn type_error(op: &str, lhs: &Value, rhs: &Value, span: Span) -> kira_errors::KiraError {
    RuntimeError::Type {
        message: format!("unsupported operand types for {op}: '{}' and '{}'", lhs.type_name(), rhs.type_name()),
        span,
    }
    .into()
}

/// Two operands as an `(i64, i64)` pair, an `(f64, f64)` pair, or neither.
enum Numeric {
    Ints(i64, i64),
    Floats(f64, f64),
}

fn coerce(lhs: &Value, rhs: &Value) -> Option<Numeric> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Some(Numeric::Ints(*a, *b)),
        (Value::Int(a), Value::Float(b)) => Some(Numeric::Floats(*a as f64, *b)),
        (Value::Float(a), Value::Int(b)) => Some(Numeric::Floats(*a, *b as f64)),
        (Value::Float(a), Value::Float(b)) => Some(Numeric::Floats(*a, *b)),
        _ => None,
    }
}

pub fn add(lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
    if let (Value::Str(a), Value::Str(b)) = (lhs, rhs) {
        return Ok(Value::str(format!("{a}{b}")));
    }
    match coerce(lhs, rhs) {
        Some(Numeric::Ints(a, b)) => Ok(Value::Int(a.wrapping_add(b))),
        Some(Numeric::Floats(a, b)) => Ok(Value::Float(a + b)),
        None => Err(type_error("+", lhs, rhs, span)),
    }
}

pub fn sub(lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
    match coerce(lhs, rhs) {
        Some(Numeric::Ints(a, b)) => Ok(Value::Int(a.wrapping_sub(b))),
        Some(Numeric::Floats(a, b)) => Ok(Value::Float(a - b)),
        None => Err(type_error("-", lhs, rhs, span)),
    }
}

pub fn mul(lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
    match coerce(lhs, rhs) {
        Some(Numeric::Ints(a, b)) => Ok(Value::Int(a.wrapping_mul(b))),
        Some(Numeric::Floats(a, b)) => Ok(Value::Float(a * b)),
        None => Err(type_error("*", lhs, rhs, span)),
    }
}

/// True division: both-int operands that divide evenly stay
/// `Int`; anything else promotes to `Float`. Zero divisor always errors.
pub fn div(lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
    match coerce(lhs, rhs) {
        Some(Numeric::Ints(_, 0)) => Err(RuntimeError::ZeroDivision { span }.into()),
        Some(Numeric::Ints(a, b)) if a % b == 0 => Ok(Value::Int(a / b)),
        Some(Numeric::Ints(a, b)) => Ok(Value::Float(a as f64 / b as f64)),
        Some(Numeric::Floats(_, b)) if b == 0.0 => Err(RuntimeError::ZeroDivision { span }.into()),
        Some(Numeric::Floats(a, b)) => Ok(Value::Float(a / b)),
        None => Err(type_error("/", lhs, rhs, span)),
    }
}

/// Truncated-toward-zero modulo — Rust's `%` already has that
/// behavior for both integers and floats.
pub fn modulo(lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
    match coerce(lhs, rhs) {
        Some(Numeric::Ints(_, 0)) => Err(RuntimeError::ZeroDivision { span }.into()),
        Some(Numeric::Ints(a, b)) => Ok(Value::Int(a % b)),
        Some(Numeric::Floats(_, b)) if b == 0.0 => Err(RuntimeError::ZeroDivision { span }.into()),
        Some(Numeric::Floats(a, b)) => Ok(Value::Float(a % b)),
        None => Err(type_error("%", lhs, rhs, span)),
    }
}

/// Int**Int with a non-negative exponent stays `Int`; every other
/// combination promotes to `Float`.
pub fn pow(lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
    match coerce(lhs, rhs) {
        Some(Numeric::Ints(a, b)) if b >= 0 => Ok(Value::Int(a.wrapping_pow(b as u32))),
        Some(Numeric::Ints(a, b)) => Ok(Value::Float((a as f64).powf(b as f64))),
        Some(Numeric::Floats(a, b)) => Ok(Value::Float(a.powf(b))),
        None => Err(type_error("**", lhs, rhs, span)),
    }
}

/// `<`/`<=`/`>`/`>=`: both numeric, or both string (lexicographic);
/// anything else is a `TypeError`.
pub fn compare(lhs: &Value, rhs: &Value, span: Span) -> Result<std::cmp::Ordering> {
    match coerce(lhs, rhs) {
        Some(Numeric::Ints(a, b)) => Ok(a.cmp(&b)),
        Some(Numeric::Floats(a, b)) => a.partial_cmp(&b).ok_or_else(|| {
            RuntimeError::Type { message: "cannot compare NaN".to_string(), span }.into()
        }),
        None => match (lhs, rhs) {
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            _ => Err(type_error("comparison", lhs, rhs, span)),
        },
    }
}
