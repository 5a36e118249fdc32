//! The lexical environment / closure frame chain.
//!
//! Lives alongside [`crate::value::Value`] rather than in the evaluator
//! crate because a `Value::Function` closes over an `Env` by reference:
//! keeping the two in one crate avoids a dependency cycle between the
//! value model and the component that walks it.

use crate::value::Value;
use indexmap::IndexMap;
use kira_errors::{RuntimeError, Result};
use kira_span::Span;
use std::cell::RefCell;
use std::rc::Rc;

struct Binding {
    value: Value,
    mutable: bool,
}

struct Frame {
    bindings: IndexMap<String, Binding>,
    parent: Option<Env>,
}

/// A reference-counted handle to one frame in the chain.
///
/// Cloning an `Env` clones the handle, not the frame: every closure that
/// captures the same defining scope shares mutations through it, which is
/// what lets two closures created by the same call share one counter.
#[derive(Clone)]
pub struct Env(Rc<RefCell<Frame>>);

impl Env {
    /// A fresh, parentless frame. Used once, to build the sealed root
    /// environment that builtins are installed into.
    pub fn root() -> Self {
        Self(Rc::new(RefCell::new(Frame { bindings: IndexMap::new(), parent: None })))
    }

    /// A fresh child frame of `self`, the environment created on block and
    /// function entry.
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Frame { bindings: IndexMap::new(), parent: Some(self.clone()) })))
    }

    /// Binds `name` in *this* frame. Spec: `let`/`const` create; a second
    /// `let`/`const` of the same name in the same scope is a `NameError`.
    pub fn define(&self, name: &str, value: Value, mutable: bool, span: Span) -> Result<()> {
        let mut frame = self.0.borrow_mut();
        if frame.bindings.contains_key(name) {
            return Err(RuntimeError::DuplicateBinding { name: name.to_string(), span }.into());
        }
        frame.bindings.insert(name.to_string(), Binding { value, mutable });
        Ok(())
    }

    /// Overwrites an existing binding already in this frame, used by
    /// `FnDecl` to fill in the constructed `Function` after pre-binding the
    /// name so the closure's captured env contains the final value.
    pub fn redefine(&self, name: &str, value: Value) {
        let mut frame = self.0.borrow_mut();
        if let Some(binding) = frame.bindings.get_mut(name) {
            binding.value = value;
        }
    }

    /// Walks the chain looking for `name` and reassigns it in place.
    /// Spec: assignment never creates a binding; unbound is a `NameError`,
    /// assignment to a `const` is a `ConstError`.
    pub fn assign(&self, name: &str, value: Value, span: Span) -> Result<()> {
        let mut frame = self.0.borrow_mut();
        if let Some(binding) = frame.bindings.get_mut(name) {
            if !binding.mutable {
                return Err(RuntimeError::ConstAssignment { name: name.to_string(), span }.into());
            }
            binding.value = value;
            return Ok(());
        }
        match &frame.parent {
            Some(parent) => parent.assign(name, value, span),
            None => Err(RuntimeError::UnboundName { name: name.to_string(), span }.into()),
        }
    }

    /// Walks the chain looking for `name`, returning its current value.
    pub fn lookup(&self, name: &str, span: Span) -> Result<Value> {
        let frame = self.0.borrow();
        if let Some(binding) = frame.bindings.get(name) {
            return Ok(binding.value.clone());
        }
        match &frame.parent {
            Some(parent) => parent.lookup(name, span),
            None => Err(RuntimeError::UnboundName { name: name.to_string(), span }.into()),
        }
    }
}
