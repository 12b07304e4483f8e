// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core Context implementation.

use crate::error::{LogError, LogResult};
use crate::fields::Fields;
use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::frame::{ContextID, Frame};
use super::scope::ScopeGuard;

#[derive(Debug)]
pub(crate) struct ContextInner {
    pub(crate) parent: Option<Context>,
    pub(crate) frame: Frame,
}

/// A handle to the innermost frame of a context stack.
///
/// A `Context` is a point in a chain of frames leading back to a root frame
/// with no entries.  Handles are cheap to clone (Arc-based) and can be sent
/// to other threads; each thread has its own *current* handle, so installing a
/// handle on one thread never affects another.
///
/// # Examples
///
/// ```rust
/// use logaware::context::Context;
/// use logaware::Fields;
///
/// Context::reset();
/// let outer = Context::enter(Fields::new().with("a", 1));
/// {
///     let _inner = Context::enter(Fields::new().with("a", 2).with("b", 3));
///     assert_eq!(Context::current().snapshot(), Fields::new().with("a", 2).with("b", 3));
/// }
/// assert_eq!(Context::current().snapshot(), Fields::new().with("a", 1));
/// drop(outer);
/// assert!(Context::current().snapshot().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    pub(crate) inner: Arc<ContextInner>,
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Context {}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

thread_local! {
    static CONTEXT: RefCell<Context> = RefCell::new(Context::root());
}

impl Context {
    /// Creates a new root context with no entries and no parent.
    pub fn root() -> Context {
        Context {
            inner: Arc::new(ContextInner {
                parent: None,
                frame: Frame::new(Fields::new()),
            }),
        }
    }

    /// Creates a context with `entries` on top of `parent`.
    ///
    /// The new context is not installed; see [`set_current`](Context::set_current)
    /// or use [`enter`](Context::enter), which does both.
    pub fn from_parent(parent: Context, entries: impl Into<Fields>) -> Context {
        Context {
            inner: Arc::new(ContextInner {
                parent: Some(parent),
                frame: Frame::new(entries.into()),
            }),
        }
    }

    /// Returns the current context for this thread.
    ///
    /// During thread teardown, when the thread-local is gone, this returns a
    /// fresh root instead.
    #[inline]
    pub fn current() -> Context {
        Self::try_current().unwrap_or_else(|_| Context::root())
    }

    /// Returns the current context for this thread, or
    /// [`LogError::ContextUnavailable`] during thread teardown.
    pub fn try_current() -> LogResult<Context> {
        CONTEXT
            .try_with(|cell| cell.borrow().clone())
            .map_err(|_| LogError::ContextUnavailable)
    }

    /// Sets this context as the current context of the calling thread.
    ///
    /// This is how a stack is handed to a child thread:
    ///
    /// ```rust
    /// use logaware::context::Context;
    /// use logaware::Fields;
    ///
    /// let _scope = Context::enter(Fields::new().with("request_id", "r-1"));
    /// let parent = Context::current();
    /// std::thread::spawn(move || {
    ///     parent.set_current();
    ///     assert!(Context::current().snapshot().contains_key("request_id"));
    /// })
    /// .join()
    /// .unwrap();
    /// ```
    pub fn set_current(self) {
        let _ = self.replace_current();
    }

    /// Installs this context and returns the one it replaced.
    pub(crate) fn replace_current(self) -> Context {
        CONTEXT
            .try_with(|cell| cell.replace(self))
            .unwrap_or_else(|_| Context::root())
    }

    /// Discards the calling thread's stack, installing a fresh root.
    ///
    /// Useful when a pooled thread starts an unrelated unit of work.
    pub fn reset() {
        Context::root().set_current();
    }

    /// Pushes a new frame holding `entries` onto the calling thread's stack.
    ///
    /// The frame stays active until the returned guard is dropped or
    /// [`exit`](ScopeGuard::exit)ed.
    pub fn enter(entries: impl Into<Fields>) -> ScopeGuard {
        let context = Context::from_parent(Context::current(), entries);
        let id = context.context_id();
        context.set_current();
        ScopeGuard::new(id)
    }

    /// Pops frames from the calling thread's stack down to and including the
    /// frame with `id`.
    ///
    /// Frames pushed above `id` and never released are discarded too.  If `id`
    /// is not on the current chain, or names the root, the stack is left
    /// untouched and [`LogError::ScopeMismatch`] is returned.
    pub fn pop(id: ContextID) -> LogResult<()> {
        CONTEXT
            .try_with(|cell| {
                let mut current = cell.borrow().clone();
                loop {
                    let parent = current.inner.parent.clone();
                    if current.context_id() == id {
                        let parent = parent.ok_or(LogError::ScopeMismatch { id: id.0 })?;
                        *cell.borrow_mut() = parent;
                        return Ok(());
                    }
                    match parent {
                        Some(p) => current = p,
                        None => return Err(LogError::ScopeMismatch { id: id.0 }),
                    }
                }
            })
            .map_err(|_| LogError::ContextUnavailable)?
    }

    /// Returns the entries of this frame alone, without its ancestors.
    pub fn entries(&self) -> &Fields {
        &self.inner.frame.entries
    }

    pub fn parent(&self) -> Option<&Context> {
        self.inner.parent.as_ref()
    }

    #[inline]
    pub fn context_id(&self) -> ContextID {
        self.inner.frame.id
    }

    /// Number of frames above the root.
    pub fn depth(&self) -> usize {
        let mut level = 0;
        let mut current = self;
        while let Some(parent) = &current.inner.parent {
            level += 1;
            current = parent;
        }
        level
    }

    /// Returns whether the frame `id` is on this context's chain.
    pub fn contains(&self, id: ContextID) -> bool {
        let mut current = Some(self);
        while let Some(c) = current {
            if c.context_id() == id {
                return true;
            }
            current = c.parent();
        }
        false
    }

    /// Merges every frame of the chain, outer to inner.  Inner frames win on
    /// key collision.
    pub fn snapshot(&self) -> Fields {
        let mut chain = Vec::with_capacity(self.depth() + 1);
        let mut current = Some(self);
        while let Some(c) = current {
            chain.push(c.entries());
            current = c.parent();
        }
        let mut merged = Fields::new();
        for entries in chain.into_iter().rev() {
            merged.overlay(entries);
        }
        merged
    }
}
