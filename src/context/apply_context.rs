// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async context preservation.

use std::future::Future;
use std::mem::ManuallyDrop;
use std::pin::Pin;
use std::task::Poll;

use super::context_impl::Context;
use crate::fields::Fields;

/// A [`Future`] wrapper that carries a context stack across executor boundaries.
///
/// Executors poll futures on whatever thread is free, so the thread-local
/// stack of the poller has nothing to do with the future.  `ApplyContext`
/// installs its own stack for the duration of each poll and puts the poller's
/// stack back afterwards, even if the inner future panics.
///
/// Scopes entered inside the future and still open when it returns
/// `Pending` are kept for the next poll.  If the wrapper is dropped before
/// the future completes (a timeout, a losing `select!` branch), the future is
/// dropped under its own stack too, so its open scopes unwind cleanly.
///
/// # Examples
///
/// ```rust
/// use logaware::context::{self, ApplyContext, Context};
/// use logaware::Fields;
///
/// async fn process_data() -> bool {
///     context::current().contains_key("job")
/// }
///
/// # async fn example() {
/// let ctx = Context::from_parent(Context::current(), Fields::new().with("job", "import"));
/// assert!(ApplyContext::new(ctx, process_data()).await);
/// # }
/// ```
pub struct ApplyContext<F> {
    context: Context,
    // dropped by hand in `Drop`, while `context` is installed
    future: ManuallyDrop<F>,
}

impl<F> ApplyContext<F> {
    pub fn new(context: Context, future: F) -> Self {
        Self {
            context,
            future: ManuallyDrop::new(future),
        }
    }

    /// The stack this future will run under on its next poll.
    pub fn context(&self) -> &Context {
        &self.context
    }
}

/// Puts the poller's stack back when dropped, and records the future's stack.
struct Restore<'a> {
    slot: &'a mut Context,
    prior: Option<Context>,
}

impl Drop for Restore<'_> {
    fn drop(&mut self) {
        if let Some(prior) = self.prior.take() {
            *self.slot = prior.replace_current();
        }
    }
}

impl<F> Future for ApplyContext<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        // SAFETY: `future` is structurally pinned and never moved out; `context`
        // is not pinned.
        let (context, fut) = unsafe {
            let d = self.get_unchecked_mut();
            (&mut d.context, Pin::new_unchecked(&mut *d.future))
        };
        let prior = context.clone().replace_current();
        let _restore = Restore {
            slot: context,
            prior: Some(prior),
        };
        fut.poll(cx)
    }
}

impl<F> Drop for ApplyContext<F> {
    fn drop(&mut self) {
        let prior = self.context.clone().replace_current();
        let _restore = Restore {
            slot: &mut self.context,
            prior: Some(prior),
        };
        // SAFETY: `future` is dropped exactly once, here, and in place, which
        // keeps the pinning guarantee.
        unsafe { ManuallyDrop::drop(&mut self.future) };
    }
}

/// Extension methods for running a future under a context.
pub trait ContextFutureExt: Future + Sized {
    /// Runs the future under the caller's current stack plus a frame holding `entries`.
    fn in_context(self, entries: impl Into<Fields>) -> ApplyContext<Self> {
        ApplyContext::new(Context::from_parent(Context::current(), entries), self)
    }

    /// Runs the future under the caller's current stack, wherever it is polled.
    fn in_current_context(self) -> ApplyContext<Self> {
        ApplyContext::new(Context::current(), self)
    }
}

impl<F: Future> ContextFutureExt for F {}
