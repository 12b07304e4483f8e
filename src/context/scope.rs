// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scope guards.

use std::marker::PhantomData;

use super::context_impl::Context;
use super::frame::ContextID;
use crate::error::{LogError, LogResult};

/// Keeps a context frame on the calling thread's stack.
///
/// Returned by [`Context::enter`](super::Context::enter) and the
/// [`scope!`](crate::scope) macro.  The frame is released exactly once: when
/// the guard is dropped (including during a panic unwind) or when it is
/// consumed by [`exit`](ScopeGuard::exit).
///
/// Releasing pops the stack down to and including this guard's frame, so inner
/// scopes whose guards were leaked are discarded along with it.
///
/// The guard is `!Send`: it refers to the stack of the thread that created it.
///
/// ```rust
/// use logaware::context::{self, Context};
/// use logaware::Fields;
///
/// fn fetch() -> Result<(), &'static str> {
///     Err("failed")
/// }
///
/// fn handle() -> Result<(), &'static str> {
///     let _scope = Context::enter(Fields::new().with("request_id", "r-7"));
///     fetch()?;
///     Ok(())
/// }
///
/// Context::reset();
/// assert!(handle().is_err());
/// assert!(context::current().is_empty());
/// ```
#[must_use = "the scope is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ScopeGuard {
    id: ContextID,
    released: bool,
    _not_send: PhantomData<*const ()>,
}

impl ScopeGuard {
    pub(crate) fn new(id: ContextID) -> ScopeGuard {
        ScopeGuard {
            id,
            released: false,
            _not_send: PhantomData,
        }
    }

    /// The ID of the frame this guard pushed.
    pub fn context_id(&self) -> ContextID {
        self.id
    }

    /// Releases the scope now, reporting a mismatch instead of logging it.
    pub fn exit(mut self) -> LogResult<()> {
        self.released = true;
        Context::pop(self.id)
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match Context::pop(self.id) {
            Ok(()) => {}
            // Thread teardown: the stack is going away with the thread.
            Err(LogError::ContextUnavailable) => {}
            Err(e) => crate::global_logger::diagnostic(crate::Level::Warning, e.to_string()),
        }
    }
}
