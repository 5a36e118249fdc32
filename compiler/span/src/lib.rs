//! Source positions for the Kira programming language.
//!
//! Kira programs are always a single in-memory source string, so unlike a
//! multi-file compiler's span crate there is no interned `SourceMap` here:
//! a [`Span`] is simply the 1-based line/column of its first character, the
//! same coordinates the lexer already tracks while scanning, carried
//! forward onto every token and AST node for diagnostics.

use std::fmt;

/// A 1-based line/column source position.
///
/// `line` and `column` both start at 1, matching the CLI's diagnostic
/// format `file:line:col: <kind>: <message>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// A placeholder span for synthesized nodes that never reach a diagnostic.
    pub const fn dummy() -> Self {
        Self { line: 0, column: 0 }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Pairs a value with the span of the token or construct it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub const fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}
