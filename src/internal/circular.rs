//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::token::AnyToken;

/// Tokens currently under construction, outermost first.
///
/// Each token appears at most once: entering a token that is already on the
/// stack is reported as a cycle instead of being pushed, so the stack never
/// grows beyond the number of registered services.
#[derive(Default)]
pub(crate) struct ResolutionStack {
    stack: RefCell<Vec<AnyToken>>,
}

impl ResolutionStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pushes `token`, or fails with the cycle path if it is already in progress.
    ///
    /// The returned guard pops the token when dropped, including during
    /// unwinding out of a panicking factory.
    pub(crate) fn enter(&self, token: AnyToken) -> DiResult<StackGuard<'_>> {
        let mut stack = self.stack.borrow_mut();

        // Circular detection BEFORE pushing the new token
        if let Some(start) = stack.iter().position(|t| *t == token) {
            let mut path: Vec<&'static str> = stack[start..].iter().map(AnyToken::name).collect();
            path.push(token.name());
            return Err(DiError::Circular(path));
        }

        stack.push(token);
        Ok(StackGuard { owner: self, token })
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    pub(crate) fn clear(&self) {
        self.stack.borrow_mut().clear();
    }
}

/// Guard for one entry on the resolution stack
pub(crate) struct StackGuard<'a> {
    owner: &'a ResolutionStack,
    token: AnyToken,
}

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        let mut stack = self.owner.stack.borrow_mut();
        // clear() may already have emptied the stack
        if let Some(pos) = stack.iter().rposition(|t| *t == self.token) {
            stack.truncate(pos);
        }
    }
}
