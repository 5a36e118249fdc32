//! The runtime value model, grounded on the shape of upstream's own
//! interpreter value type (`interpreter_value/value.rs`): a flat tagged
//! enum, a `Display` impl that doubles as the language's "display form",
//! and reference types wrapped in `Rc<RefCell<_>>` so that aliasing
//! through assignment is observable.

use crate::env::Env;
use crate::stmt::Block;
use indexmap::IndexMap;
use kira_errors::{RuntimeError, Result};
use kira_span::Span;
use std::cell::RefCell;
use std::fmt;
use std::io::{BufRead, Write};
use std::rc::Rc;

/// A dict key. Restricted to hashable scalars — containers and callables
/// cannot be keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DictKey {
    Str(Rc<str>),
    Int(i64),
    Bool(bool),
    /// Float keys are compared by bit pattern, not numeric equality, so
    /// that `NaN`-free floats still form a legal `Eq`/`Hash` pair.
    Float(u64),
    Null,
}

impl DictKey {
    pub fn from_value(value: &Value, span: Span) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(Self::Str(s.clone())),
            Value::Int(i) => Ok(Self::Int(*i)),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Float(f) => Ok(Self::Float(f.to_bits())),
            Value::Null => Ok(Self::Null),
            other => Err(RuntimeError::Type {
                message: format!("unhashable type: '{}'", other.type_name()),
                span,
            }
            .into()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Str(s) => Value::Str(s),
            Self::Int(i) => Value::Int(i),
            Self::Bool(b) => Value::Bool(b),
            Self::Float(bits) => Value::Float(f64::from_bits(bits)),
            Self::Null => Value::Null,
        }
    }
}

impl fmt::Display for DictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.clone().into_value().write_echo(f)
    }
}

/// A user-defined closure: the parameter names, body, and the environment
/// frame active at the point of definition.
#[derive(Clone)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Rc<Block>,
    pub captured_env: Env,
}

/// The I/O surface builtins are given, so that `print`/`println`/`input`
/// stay testable without touching real stdout/stdin.
pub struct Io<'a> {
    pub stdout: &'a mut dyn Write,
    pub stdin: &'a mut dyn BufRead,
}

pub type BuiltinFn = fn(&[Value], Span, &mut Io<'_>) -> Result<Value>;

/// A builtin's arity contract.
#[derive(Debug, Clone, Copy)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    Variadic,
}

impl Arity {
    pub fn accepts(&self, got: usize) -> bool {
        match self {
            Self::Exact(n) => got == *n,
            Self::Range(min, max) => got >= *min && got <= *max,
            Self::Variadic => true,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Exact(n) => n.to_string(),
            Self::Range(min, max) => format!("{min}-{max}"),
            Self::Variadic => "any number of".to_string(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub handler: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// The only thing evaluation produces.
///
/// `Array` and `Dict` are reference types (`Rc<RefCell<_>>`): cloning a
/// `Value::Array` clones the handle, so `let b = a; b[0] = 9` mutates the
/// object `a` still points at. `Str` is a value type backed by `Rc<str>`
/// purely for cheap cloning; concatenation always allocates a new string.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<str>),
    Null,
    Array(Rc<RefCell<Vec<Value>>>),
    Dict(Rc<RefCell<IndexMap<DictKey, Value>>>),
    Function(Rc<Function>),
    Builtin(Rc<Builtin>),
}

impl Value {
    pub fn str(s: impl Into<Rc<str>>) -> Self {
        Self::Str(s.into())
    }

    pub fn array(elems: Vec<Value>) -> Self {
        Self::Array(Rc::new(RefCell::new(elems)))
    }

    pub fn dict(entries: IndexMap<DictKey, Value>) -> Self {
        Self::Dict(Rc::new(RefCell::new(entries)))
    }

    /// The `type(x)` builtin's result and the tag used in type-error
    /// messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
            Self::Null => "null",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Function(_) => "function",
            Self::Builtin(_) => "builtin",
        }
    }

    /// Truthiness: `false`, `null`, `0`, `0.0`, `""`, `[]`,
    /// `{}` are falsy; everything else, including non-empty containers
    /// and any function value, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Null => false,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Array(a) => !a.borrow().is_empty(),
            Self::Dict(d) => !d.borrow().is_empty(),
            Self::Function(_) | Self::Builtin(_) => true,
        }
    }

    /// Cross-type numeric/structural equality: never errors.
    pub fn values_equal(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::Array(a), Self::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.values_equal(y))
            }
            (Self::Dict(a), Self::Dict(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|ov| v.values_equal(ov)))
            }
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }

    /// The REPL's top-level echo form: identical to `Display`
    /// except a bare string is quoted with escapes instead of printed raw.
    pub fn echo_form(&self) -> String {
        struct Echo<'a>(&'a Value);
        impl fmt::Display for Echo<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.write_echo(f)
            }
        }
        Echo(self).to_string()
    }

    /// Writes the *echo* form: strings quoted with escapes, used inside
    /// array/dict display and REPL echo.
    fn write_echo(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '\r' => write!(f, "\\r")?,
                        other => write!(f, "{other}")?,
                    }
                }
                write!(f, "\"")
            }
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => {
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
            Self::Array(a) => {
                write!(f, "[")?;
                for (i, elem) in a.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    elem.write_echo(f)?;
                }
                write!(f, "]")
            }
            Self::Dict(d) => {
                write!(f, "{{")?;
                for (i, (k, v)) in d.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: ")?;
                    v.write_echo(f)?;
                }
                write!(f, "}}")
            }
            Self::Function(func) => match &func.name {
                Some(name) => write!(f, "<fn {name}>"),
                None => write!(f, "<fn>"),
            },
            Self::Builtin(b) => write!(f, "<builtin {}>", b.name),
        }
    }
}
