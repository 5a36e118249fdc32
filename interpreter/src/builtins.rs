//! The builtin function table, installed into the sealed root
//! environment as `const`-bound `Builtin` values.

use kira_ast::{Arity, Builtin, DictKey, Env, Io, Value};
use kira_errors::{Result, RuntimeError};
use kira_span::Span;
use std::io::{BufRead, Write};
use std::rc::Rc;

fn arg_error(name: &str, message: impl Into<String>, span: Span) -> kira_errors::KiraError {
    RuntimeError::Type { message: format!("{name}: {}", message.into()), span }.into()
}

fn as_array(value: &Value, name: &str, span: Span) -> Result<Rc<std::cell::RefCell<Vec<Value>>>> {
    match value {
        Value::Array(arr) => Ok(arr.clone()),
        other => Err(arg_error(name, format!("expected array, found '{}'", other.type_name()), span)),
    }
}

fn as_str(value: &Value, name: &str, span: Span) -> Result<Rc<str>> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => Err(arg_error(name, format!("expected string, found '{}'", other.type_name()), span)),
    }
}

fn as_int(value: &Value, name: &str, span: Span) -> Result<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(arg_error(name, format!("expected int, found '{}'", other.type_name()), span)),
    }
}

fn builtin_print(args: &[Value], span: Span, io: &mut Io<'_>) -> Result<Value> {
    let text = args.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
    write!(io.stdout, "{text}").map_err(|e| arg_error("print", e.to_string(), span))?;
    Ok(Value::Null)
}

fn builtin_println(args: &[Value], span: Span, io: &mut Io<'_>) -> Result<Value> {
    let text = args.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
    writeln!(io.stdout, "{text}").map_err(|e| arg_error("println", e.to_string(), span))?;
    Ok(Value::Null)
}

fn builtin_input(args: &[Value], span: Span, io: &mut Io<'_>) -> Result<Value> {
    if let Some(prompt) = args.first() {
        write!(io.stdout, "{prompt}").map_err(|e| arg_error("input", e.to_string(), span))?;
        io.stdout.flush().map_err(|e| arg_error("input", e.to_string(), span))?;
    }
    let mut line = String::new();
    io.stdin.read_line(&mut line).map_err(|e| arg_error("input", e.to_string(), span))?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Value::str(line))
}

fn builtin_len(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let n = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::Array(arr) => arr.borrow().len(),
        Value::Dict(dict) => dict.borrow().len(),
        other => return Err(arg_error("len", format!("object of type '{}' has no len()", other.type_name()), span)),
    };
    Ok(Value::Int(n as i64))
}

fn builtin_type(args: &[Value], _span: Span, _io: &mut Io<'_>) -> Result<Value> {
    Ok(Value::str(args[0].type_name()))
}

fn builtin_str(args: &[Value], _span: Span, _io: &mut Io<'_>) -> Result<Value> {
    Ok(Value::str(args[0].to_string()))
}

fn builtin_int(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let value = match &args[0] {
        Value::Int(n) => *n,
        Value::Float(n) => n.trunc() as i64,
        Value::Bool(b) => i64::from(*b),
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| RuntimeError::Value { message: format!("invalid literal for int(): '{s}'"), span })?,
        other => return Err(arg_error("int", format!("cannot convert '{}' to int", other.type_name()), span)),
    };
    Ok(Value::Int(value))
}

fn builtin_float(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let value = match &args[0] {
        Value::Float(n) => *n,
        Value::Int(n) => *n as f64,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| RuntimeError::Value { message: format!("could not convert string to float: '{s}'"), span })?,
        other => return Err(arg_error("float", format!("cannot convert '{}' to float", other.type_name()), span)),
    };
    Ok(Value::Float(value))
}

fn builtin_range(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let (start, stop, step) = match args.len() {
        1 => (0, as_int(&args[0], "range", span)?, 1),
        2 => (as_int(&args[0], "range", span)?, as_int(&args[1], "range", span)?, 1),
        3 => (
            as_int(&args[0], "range", span)?,
            as_int(&args[1], "range", span)?,
            as_int(&args[2], "range", span)?,
        ),
        _ => unreachable!("arity already checked"),
    };
    if step == 0 {
        return Err(RuntimeError::Value { message: "range() step must not be zero".to_string(), span }.into());
    }
    let mut values = Vec::new();
    let mut i = start;
    if step > 0 {
        while i < stop {
            values.push(Value::Int(i));
            i += step;
        }
    } else {
        while i > stop {
            values.push(Value::Int(i));
            i += step;
        }
    }
    Ok(Value::array(values))
}

fn builtin_push(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let arr = as_array(&args[0], "push", span)?;
    arr.borrow_mut().push(args[1].clone());
    Ok(Value::Array(arr))
}

fn builtin_pop(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let arr = as_array(&args[0], "pop", span)?;
    arr.borrow_mut().pop().ok_or_else(|| RuntimeError::PopEmpty { span }.into())
}

fn builtin_first(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let arr = as_array(&args[0], "first", span)?;
    let arr = arr.borrow();
    arr.first().cloned().ok_or_else(|| RuntimeError::IndexOutOfRange { index: 0, len: 0, span }.into())
}

fn builtin_last(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let arr = as_array(&args[0], "last", span)?;
    let arr = arr.borrow();
    arr.last().cloned().ok_or_else(|| RuntimeError::IndexOutOfRange { index: 0, len: 0, span }.into())
}

fn builtin_rest(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let arr = as_array(&args[0], "rest", span)?;
    let arr = arr.borrow();
    Ok(Value::array(arr.iter().skip(1).cloned().collect()))
}

/// Stable merge sort with a fallible comparator, since `sort_by`'s
/// `Ordering`-returning closure can't surface the `TypeError` a mixed bag
/// of incomparable values must raise.
fn try_sorted(values: &[Value], span: Span) -> Result<Vec<Value>> {
    if values.len() <= 1 {
        return Ok(values.to_vec());
    }
    let mid = values.len() / 2;
    let left = try_sorted(&values[..mid], span)?;
    let right = try_sorted(&values[mid..], span)?;
    let mut merged = Vec::with_capacity(values.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if crate::numeric::compare(&left[i], &right[j], span)? != std::cmp::Ordering::Greater {
            merged.push(left[i].clone());
            i += 1;
        } else {
            merged.push(right[j].clone());
            j += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    Ok(merged)
}

fn builtin_sorted(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let arr = as_array(&args[0], "sorted", span)?;
    let sorted = try_sorted(&arr.borrow(), span)?;
    Ok(Value::array(sorted))
}

fn builtin_reversed(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let arr = as_array(&args[0], "reversed", span)?;
    let mut values = arr.borrow().clone();
    values.reverse();
    Ok(Value::array(values))
}

fn builtin_join(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let arr = as_array(&args[0], "join", span)?;
    let sep = as_str(&args[1], "join", span)?;
    let arr = arr.borrow();
    let mut parts = Vec::with_capacity(arr.len());
    for elem in arr.iter() {
        parts.push(as_str(elem, "join", span)?);
    }
    Ok(Value::str(parts.join(&sep)))
}

fn as_dict(value: &Value, name: &str, span: Span) -> Result<Rc<std::cell::RefCell<indexmap::IndexMap<DictKey, Value>>>> {
    match value {
        Value::Dict(d) => Ok(d.clone()),
        other => Err(arg_error(name, format!("expected dict, found '{}'", other.type_name()), span)),
    }
}

fn builtin_keys(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let dict = as_dict(&args[0], "keys", span)?;
    Ok(Value::array(dict.borrow().keys().cloned().map(DictKey::into_value).collect()))
}

fn builtin_values(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let dict = as_dict(&args[0], "values", span)?;
    Ok(Value::array(dict.borrow().values().cloned().collect()))
}

fn builtin_abs(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(n.wrapping_abs())),
        Value::Float(n) => Ok(Value::Float(n.abs())),
        other => Err(arg_error("abs", format!("expected number, found '{}'", other.type_name()), span)),
    }
}

fn numeric_operands(args: &[Value], name: &str, span: Span) -> Result<Vec<Value>> {
    let values: Vec<Value> = if args.len() == 1 {
        match &args[0] {
            Value::Array(arr) => arr.borrow().clone(),
            other => vec![other.clone()],
        }
    } else {
        args.to_vec()
    };
    if values.is_empty() {
        return Err(RuntimeError::Value { message: format!("{name}() arg is an empty sequence"), span }.into());
    }
    Ok(values)
}

fn builtin_min(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let values = numeric_operands(args, "min", span)?;
    let mut best = values[0].clone();
    for candidate in &values[1..] {
        if crate::numeric::compare(candidate, &best, span)? == std::cmp::Ordering::Less {
            best = candidate.clone();
        }
    }
    Ok(best)
}

fn builtin_max(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let values = numeric_operands(args, "max", span)?;
    let mut best = values[0].clone();
    for candidate in &values[1..] {
        if crate::numeric::compare(candidate, &best, span)? == std::cmp::Ordering::Greater {
            best = candidate.clone();
        }
    }
    Ok(best)
}

fn builtin_sum(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let arr = as_array(&args[0], "sum", span)?;
    let mut total = Value::Int(0);
    for elem in arr.borrow().iter() {
        total = crate::numeric::add(&total, elem, span)?;
    }
    Ok(total)
}

fn builtin_split(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let s = as_str(&args[0], "split", span)?;
    let sep = as_str(&args[1], "split", span)?;
    let parts: Vec<Value> = if sep.is_empty() {
        s.chars().map(|c| Value::str(c.to_string())).collect()
    } else {
        s.split(sep.as_ref()).map(Value::str).collect()
    };
    Ok(Value::array(parts))
}

fn builtin_upper(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    Ok(Value::str(as_str(&args[0], "upper", span)?.to_uppercase()))
}

fn builtin_lower(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    Ok(Value::str(as_str(&args[0], "lower", span)?.to_lowercase()))
}

fn builtin_strip(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    Ok(Value::str(as_str(&args[0], "strip", span)?.trim().to_string()))
}

fn builtin_replace(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let s = as_str(&args[0], "replace", span)?;
    let old = as_str(&args[1], "replace", span)?;
    let new = as_str(&args[2], "replace", span)?;
    Ok(Value::str(s.replace(old.as_ref(), &new)))
}

fn builtin_contains(args: &[Value], span: Span, _io: &mut Io<'_>) -> Result<Value> {
    let found = match &args[0] {
        Value::Array(arr) => arr.borrow().iter().any(|v| v.values_equal(&args[1])),
        Value::Dict(dict) => {
            let key = DictKey::from_value(&args[1], span)?;
            dict.borrow().contains_key(&key)
        }
        Value::Str(s) => {
            let needle = as_str(&args[1], "contains", span)?;
            s.contains(needle.as_ref())
        }
        other => {
            return Err(arg_error(
                "contains",
                format!("'{}' is not a container", other.type_name()),
                span,
            ));
        }
    };
    Ok(Value::Bool(found))
}

const MAX_ARITY: usize = usize::MAX;

/// Installs every builtin into `env` as a sealed, `const`-bound value —
/// the root frame is pre-populated with all builtins before any user code
/// runs.
pub fn install(env: &Env) {
    let table: &[(&str, Arity, kira_ast::BuiltinFn)] = &[
        ("print", Arity::Variadic, builtin_print),
        ("println", Arity::Variadic, builtin_println),
        ("input", Arity::Range(0, 1), builtin_input),
        ("len", Arity::Exact(1), builtin_len),
        ("type", Arity::Exact(1), builtin_type),
        ("str", Arity::Exact(1), builtin_str),
        ("int", Arity::Exact(1), builtin_int),
        ("float", Arity::Exact(1), builtin_float),
        ("range", Arity::Range(1, 3), builtin_range),
        ("push", Arity::Exact(2), builtin_push),
        ("pop", Arity::Exact(1), builtin_pop),
        ("first", Arity::Exact(1), builtin_first),
        ("last", Arity::Exact(1), builtin_last),
        ("rest", Arity::Exact(1), builtin_rest),
        ("sorted", Arity::Exact(1), builtin_sorted),
        ("reversed", Arity::Exact(1), builtin_reversed),
        ("join", Arity::Exact(2), builtin_join),
        ("keys", Arity::Exact(1), builtin_keys),
        ("values", Arity::Exact(1), builtin_values),
        ("abs", Arity::Exact(1), builtin_abs),
        ("min", Arity::Range(1, MAX_ARITY), builtin_min),
        ("max", Arity::Range(1, MAX_ARITY), builtin_max),
        ("sum", Arity::Exact(1), builtin_sum),
        ("split", Arity::Exact(2), builtin_split),
        ("upper", Arity::Exact(1), builtin_upper),
        ("lower", Arity::Exact(1), builtin_lower),
        ("strip", Arity::Exact(1), builtin_strip),
        ("replace", Arity::Exact(3), builtin_replace),
        ("contains", Arity::Exact(2), builtin_contains),
    ];
    for (name, arity, handler) in table {
        let value = Value::Builtin(Rc::new(Builtin { name: *name, arity: *arity, handler: *handler }));
        env.define(name, value, false, Span::dummy()).expect("builtin names are unique");
    }
}
