// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types.
//!
//! None of these escape a logging call.  They are returned from the explicit
//! `try_*` entry points and otherwise turned into diagnostics.

use thiserror::Error;

/// Errors produced while rendering a `{key}` message template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("no value for placeholder `{{{0}}}`")]
    UnknownKey(String),

    #[error("empty placeholder `{{}}` at offset {0}")]
    EmptyPlaceholder(usize),

    #[error("unclosed `{{` at offset {0}")]
    UnclosedBrace(usize),

    #[error("unmatched `}}` at offset {0}")]
    UnmatchedCloseBrace(usize),

    #[error("invalid format spec `{spec}` for `{key}`")]
    InvalidSpec { key: String, spec: String },

    /// The spec does not apply to the value, e.g. `{count:d}` on a string.
    #[error("format spec `{spec}` does not apply to the value of `{key}`")]
    SpecMismatch { key: String, spec: String },
}

/// Errors surfaced by logaware.
#[derive(Debug, Error)]
pub enum LogError {
    /// A scope was released whose frame is not on the current context chain.
    #[error("scope {id} is not on the current context chain")]
    ScopeMismatch { id: u64 },

    /// The thread-local context could not be read, typically during thread teardown.
    #[error("thread-local context is unavailable")]
    ContextUnavailable,

    #[error("cannot format log message `{template}`: {source}")]
    Format {
        template: String,
        #[source]
        source: FormatError,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for logaware operations.
pub type LogResult<T> = Result<T, LogError>;
