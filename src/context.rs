// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread-local context stacks.
//!
//! Each thread has a stack of context frames.  A frame is pushed when a scope
//! is entered and popped when its [`ScopeGuard`] goes away, and every record
//! logged in between carries the merged entries of all active frames.
//!
//! # Overview
//!
//! - [`Context`]: a handle to the innermost frame of a stack
//! - [`ScopeGuard`]: releases a frame on every exit path
//! - [`ApplyContext`]: a [`Future`] wrapper that carries a stack across polls
//!
//! # Scopes
//!
//! ```rust
//! use logaware::context;
//! use logaware::Fields;
//!
//! logaware::context::Context::reset();
//! {
//!     let _request = context::enter(Fields::new().with("request_id", "r-1"));
//!     let _user = context::enter(Fields::new().with("user_id", 42));
//!     assert_eq!(
//!         context::current(),
//!         Fields::new().with("request_id", "r-1").with("user_id", 42)
//!     );
//! }
//! assert!(context::current().is_empty());
//! ```
//!
//! # Threads
//!
//! Stacks are never shared: a new thread starts with an empty stack.  To carry
//! the parent's entries into a child thread, hand it a [`Context`] and call
//! [`Context::set_current`] there.  Frames are immutable, so the child can
//! push and pop its own scopes without affecting the parent.
//!
//! # Async
//!
//! ```rust
//! use logaware::context::{self, ContextFutureExt};
//! use logaware::Fields;
//!
//! async fn handle() -> bool {
//!     context::current().contains_key("request_id")
//! }
//!
//! # async fn example() {
//! let found = handle()
//!     .in_context(Fields::new().with("request_id", "r-2"))
//!     .await;
//! assert!(found);
//! # }
//! ```

mod apply_context;
mod context_impl;
mod frame;
mod scope;


pub use apply_context::{ApplyContext, ContextFutureExt};
pub use context_impl::Context;
pub use frame::ContextID;
pub use scope::ScopeGuard;

use crate::error::LogResult;
use crate::fields::Fields;

/// The merged entries of the calling thread's stack, outer to inner.
///
/// Returns an empty mapping when no scope is active, and during thread
/// teardown.
pub fn current() -> Fields {
    Context::current().snapshot()
}

/// Like [`current`], but reports an inaccessible thread-local instead of
/// hiding it.
pub fn try_current() -> LogResult<Fields> {
    Context::try_current().map(|c| c.snapshot())
}

/// Pushes a frame holding `entries` onto the calling thread's stack.
pub fn enter(entries: impl Into<Fields>) -> ScopeGuard {
    Context::enter(entries)
}

/// Runs `f` inside a scope holding `entries`.
///
/// ```rust
/// use logaware::context;
/// use logaware::Fields;
///
/// let user = context::with_scope(Fields::new().with("user", "bob"), || {
///     context::current().get("user").cloned()
/// });
/// assert_eq!(user, Some("bob".into()));
/// ```
pub fn with_scope<R>(entries: impl Into<Fields>, f: impl FnOnce() -> R) -> R {
    let _guard = Context::enter(entries);
    f()
}
