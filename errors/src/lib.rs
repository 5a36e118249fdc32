//! The Kira error taxonomy and diagnostic rendering.
//!
//! Mirrors the shape of upstream's own errors crate: one `thiserror` enum
//! per error family, each variant a plain struct carrying the span of the
//! token or construct it came from.

use kira_span::Span;
use std::fmt;

/// Malformed token, unterminated string.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },
    #[error("unexpected character '{found}'")]
    UnknownChar { found: char, span: Span },
    #[error("integer literal '{lexeme}' out of range")]
    IntOutOfRange { lexeme: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnterminatedString { span }
            | Self::UnknownChar { span, .. }
            | Self::IntOutOfRange { span, .. } => *span,
        }
    }
}

/// Unexpected token, invalid assignment target, unterminated construct.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String, span: Span },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget { span: Span },
    #[error("unterminated {construct}")]
    UnterminatedConstruct { construct: String, span: Span },
    #[error("unexpected end of input")]
    UnexpectedEof { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::InvalidAssignmentTarget { span }
            | Self::UnterminatedConstruct { span, .. }
            | Self::UnexpectedEof { span } => *span,
        }
    }
}

/// Every error the evaluator itself can raise.
///
/// Kept as a single enum (rather than one type per variant) because, unlike
/// lex/parse errors, every runtime error crosses the same `eval`/`exec`
/// boundary and is handled identically by the driver: print and unwind.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("name '{name}' is not defined")]
    UnboundName { name: String, span: Span },
    #[error("'{name}' is already defined in this scope")]
    DuplicateBinding { name: String, span: Span },
    #[error("cannot assign to const '{name}'")]
    ConstAssignment { name: String, span: Span },
    #[error("{message}")]
    Type { message: String, span: Span },
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize, span: Span },
    #[error("pop from empty array")]
    PopEmpty { span: Span },
    #[error("key {key} not found")]
    KeyNotFound { key: String, span: Span },
    #[error("{callee} takes {expected} argument(s), got {got}")]
    Arity { callee: String, expected: String, got: usize, span: Span },
    #[error("{message}")]
    Value { message: String, span: Span },
    #[error("division by zero")]
    ZeroDivision { span: Span },
    #[error("maximum recursion depth exceeded")]
    Recursion { span: Span },
}

impl RuntimeError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnboundName { span, .. }
            | Self::DuplicateBinding { span, .. }
            | Self::ConstAssignment { span, .. }
            | Self::Type { span, .. }
            | Self::IndexOutOfRange { span, .. }
            | Self::PopEmpty { span }
            | Self::KeyNotFound { span, .. }
            | Self::Arity { span, .. }
            | Self::Value { span, .. }
            | Self::ZeroDivision { span }
            | Self::Recursion { span } => *span,
        }
    }

    /// The bare error-kind name used in the `file:line:col: <kind>: msg`
    /// diagnostic format and by `type`-adjacent tooling.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnboundName { .. } | Self::DuplicateBinding { .. } => "NameError",
            Self::ConstAssignment { .. } => "ConstError",
            Self::Type { .. } => "TypeError",
            Self::IndexOutOfRange { .. } | Self::PopEmpty { .. } => "IndexError",
            Self::KeyNotFound { .. } => "KeyError",
            Self::Arity { .. } => "ArityError",
            Self::Value { .. } => "ValueError",
            Self::ZeroDivision { .. } => "ZeroDivisionError",
            Self::Recursion { .. } => "RecursionError",
        }
    }
}

/// The union of every error the driver (REPL or file runner) must catch.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum KiraError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl KiraError {
    pub fn span(&self) -> Span {
        match self {
            Self::Lex(e) => e.span(),
            Self::Parse(e) => e.span(),
            Self::Runtime(e) => e.span(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lex(_) => "LexError",
            Self::Parse(_) => "ParseError",
            Self::Runtime(e) => e.kind(),
        }
    }

    /// Process exit code per the CLI surface: 0 success, 1
    /// runtime error, 2 parse/lex error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Lex(_) | Self::Parse(_) => 2,
            Self::Runtime(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, KiraError>;

/// Renders `file:line:col: <kind>: <message>`, colorized when `color` is
/// set (the CLI decides this once via `is-terminal` against stderr).
pub struct Diagnostic<'a> {
    pub file: &'a str,
    pub error: &'a KiraError,
    pub color: bool,
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use colored::Colorize as _;

        let span = self.error.span();
        let location = format!("{}:{}", self.file, span);
        let kind = self.error.kind();
        if self.color {
            write!(f, "{}: {}: {}", location.bold(), kind.red().bold(), self.error)
        } else {
            write!(f, "{location}: {kind}: {error}", error = self.error)
        }
    }
}
