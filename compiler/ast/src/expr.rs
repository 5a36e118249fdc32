//! Expression AST nodes.
//!
//! Every node carries the [`Span`] of its leading token, the way
//! `compiler/ast/src/expressions/binary.rs` attaches a `span` field to each
//! expression node upstream.

use crate::stmt::Block;
use kira_span::Span;
use std::rc::Rc;

/// A binary operator, ordered here from loosest to tightest precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::And => "and",
            Self::Or => "or",
        };
        write!(f, "{s}")
    }
}

/// A prefix operator: numeric negation/identity bind tighter than `not`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

/// An assignment target: `Ident` or `Index` only.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Ident(String),
    Index { target: Box<Expr>, key: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub span: Span,
}

/// An expression node. Every variant carries the span of its leading token.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLit(i64, Span),
    FloatLit(f64, Span),
    StrLit(Rc<str>, Span),
    BoolLit(bool, Span),
    NullLit(Span),
    Ident(String, Span),
    ArrayLit(Vec<Expr>, Span),
    /// Key/value pairs, evaluated key-then-value, left to right.
    DictLit(Vec<(Expr, Expr)>, Span),
    Index { target: Box<Expr>, key: Box<Expr>, span: Span },
    Call { callee: Box<Expr>, args: Vec<Expr>, span: Span },
    Prefix { op: UnaryOp, rhs: Box<Expr>, span: Span },
    Infix { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr>, span: Span },
    Assign { target: AssignTarget, value: Box<Expr>, span: Span },
    If { cond: Box<Expr>, then_block: Block, else_block: Option<Box<Expr>>, span: Span },
    FnLit { params: Vec<Param>, body: Rc<Block>, span: Span },
    Block(Block),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Self::IntLit(_, s)
            | Self::FloatLit(_, s)
            | Self::StrLit(_, s)
            | Self::BoolLit(_, s)
            | Self::NullLit(s)
            | Self::Ident(_, s)
            | Self::ArrayLit(_, s)
            | Self::DictLit(_, s)
            | Self::Index { span: s, .. }
            | Self::Call { span: s, .. }
            | Self::Prefix { span: s, .. }
            | Self::Infix { span: s, .. }
            | Self::Assign { span: s, .. }
            | Self::If { span: s, .. }
            | Self::FnLit { span: s, .. } => *s,
            Self::Block(block) => block.span,
        }
    }
}
