// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context frames.

use crate::fields::Fields;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

pub(crate) static CONTEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for a context frame.
///
/// Each frame gets a monotonically increasing ID that is unique across the
/// entire process lifetime.  Scope guards remember the ID of the frame they
/// pushed and release the stack down to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextID(pub(crate) u64);

impl ContextID {
    pub(crate) fn next() -> ContextID {
        ContextID(CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for ContextID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One pushed set of key/value pairs.
///
/// Frames are immutable once created; entering a nested scope creates a new
/// frame whose parent is the previous one.
#[derive(Debug)]
pub(crate) struct Frame {
    pub(crate) id: ContextID,
    pub(crate) entries: Fields,
}

impl Frame {
    pub(crate) fn new(entries: Fields) -> Frame {
        Frame {
            id: ContextID::next(),
            entries,
        }
    }
}
