//! A statement or expression evaluation either produces a plain value or
//! is propagating a `return`.

use kira_ast::Value;

#[derive(Clone)]
pub enum Flow {
    Normal(Value),
    Returning(Value),
}

impl Flow {
    /// Collapses either variant to its carried value. Used at the call
    /// boundary, the one place `Returning` is consumed: a
    /// function body's implicit return and its explicit `return` both
    /// yield the same value to the caller.
    pub fn into_value(self) -> Value {
        match self {
            Self::Normal(v) | Self::Returning(v) => v,
        }
    }

    pub fn is_returning(&self) -> bool {
        matches!(self, Self::Returning(_))
    }
}
