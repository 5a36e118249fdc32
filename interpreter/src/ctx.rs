//! Per-evaluation context threaded through `eval`/`exec`: the I/O surface
//! builtins write to, plus a call-depth counter backing the `RecursionError`
//! guard, a graceful alternative to a host stack overflow.

use kira_ast::Io;

const MAX_CALL_DEPTH: u32 = 2_000;

pub struct Ctx<'a, 'b> {
    pub io: &'a mut Io<'b>,
    depth: u32,
}

impl<'a, 'b> Ctx<'a, 'b> {
    pub fn new(io: &'a mut Io<'b>) -> Self {
        Self { io, depth: 0 }
    }

    pub fn enter_call(&mut self, span: kira_span::Span) -> kira_errors::Result<()> {
        self.depth += 1;
        if self.depth > MAX_CALL_DEPTH {
            self.depth -= 1;
            tracing::debug!(depth = self.depth, %span, "recursion limit exceeded");
            return Err(kira_errors::RuntimeError::Recursion { span }.into());
        }
        tracing::trace!(depth = self.depth, "call entered");
        Ok(())
    }

    pub fn exit_call(&mut self) {
        tracing::trace!(depth = self.depth, "call exited");
        self.depth -= 1;
    }
}
