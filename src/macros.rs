// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging and scope macros.
//!
//! Every logging macro comes in two forms:
//!
//! ```rust
//! use logaware::AwareLogger;
//! # let user = "bob";
//! // through the default logger
//! logaware::info!("User {user} logged in", user = user);
//!
//! // through a particular logger
//! let log = AwareLogger::new();
//! logaware::info!(log, "User {user} logged in", user = user);
//! ```
//!
//! The template must be a string literal.  Each `key = value` pair becomes an
//! explicit field of the record and can be referenced as `{key}` in the
//! template.  Values are anything implementing
//! [`IntoFieldValue`](crate::IntoFieldValue); `None` values are left out.
//!
//! The macros evaluate to the emitted [`LogRecord`](crate::LogRecord), or
//! `None` when the level was filtered out.

/// Builds a [`Fields`](crate::Fields) from `key = value` pairs.
///
/// ```rust
/// let fields = logaware::fields!(user_id = 42, name = "bob", nickname = None::<&str>);
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    ($($key:ident = $value:expr),* $(,)?) => {
        $crate::Fields::new() $( .with(::std::stringify!($key), $value) )*
    };
}

/// Logs at an explicit level through an explicit logger.
///
/// ```rust
/// use logaware::{AwareLogger, Level};
/// let log = AwareLogger::new();
/// let level = Level::Warning;
/// logaware::log!(log, level, "retrying in {secs}s", secs = 3);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:literal $(, $key:ident = $value:expr)* $(,)?) => {
        ($logger).log(
            $level,
            $crate::location!(),
            $template,
            $crate::fields!($($key = $value),*),
        )
    };
}

/// Logs at [`Level::Debug`](crate::Level::Debug).
#[macro_export]
macro_rules! debug {
    ($template:literal $($rest:tt)*) => {
        $crate::log!($crate::default_logger(), $crate::Level::Debug, $template $($rest)*)
    };
    ($logger:expr, $template:literal $($rest:tt)*) => {
        $crate::log!($logger, $crate::Level::Debug, $template $($rest)*)
    };
}

/// Logs at [`Level::Info`](crate::Level::Info).
///
/// ```rust
/// let _scope = logaware::scope!(request_id = "r-1");
/// logaware::info!("Processing request");
/// ```
#[macro_export]
macro_rules! info {
    ($template:literal $($rest:tt)*) => {
        $crate::log!($crate::default_logger(), $crate::Level::Info, $template $($rest)*)
    };
    ($logger:expr, $template:literal $($rest:tt)*) => {
        $crate::log!($logger, $crate::Level::Info, $template $($rest)*)
    };
}

/// Logs at [`Level::Warning`](crate::Level::Warning).
#[macro_export]
macro_rules! warning {
    ($template:literal $($rest:tt)*) => {
        $crate::log!($crate::default_logger(), $crate::Level::Warning, $template $($rest)*)
    };
    ($logger:expr, $template:literal $($rest:tt)*) => {
        $crate::log!($logger, $crate::Level::Warning, $template $($rest)*)
    };
}

/// Alias for [`warning!`].
#[macro_export]
macro_rules! warn {
    ($($args:tt)*) => {
        $crate::warning!($($args)*)
    };
}

/// Logs at [`Level::Error`](crate::Level::Error).
///
/// To log an error value together with its sources, see
/// [`AwareLogger::log_error`](crate::AwareLogger::log_error).
#[macro_export]
macro_rules! error {
    ($template:literal $($rest:tt)*) => {
        $crate::log!($crate::default_logger(), $crate::Level::Error, $template $($rest)*)
    };
    ($logger:expr, $template:literal $($rest:tt)*) => {
        $crate::log!($logger, $crate::Level::Error, $template $($rest)*)
    };
}

/// Logs at [`Level::Critical`](crate::Level::Critical).
#[macro_export]
macro_rules! critical {
    ($template:literal $($rest:tt)*) => {
        $crate::log!($crate::default_logger(), $crate::Level::Critical, $template $($rest)*)
    };
    ($logger:expr, $template:literal $($rest:tt)*) => {
        $crate::log!($logger, $crate::Level::Critical, $template $($rest)*)
    };
}

/// Alias for [`critical!`].
#[macro_export]
macro_rules! fatal {
    ($($args:tt)*) => {
        $crate::critical!($($args)*)
    };
}

/**
Pushes a context scope on the current thread and returns its
[`ScopeGuard`](crate::context::ScopeGuard).

The scope ends when the guard is dropped, including on `?` and panics.
Bind the guard to a named variable: `let _ = scope!(..)` drops it at once.

```rust
use logaware::context;

{
    let _scope = logaware::scope!(user_id = 123, request_id = "abc");
    assert_eq!(context::current().get("user_id"), Some(&123.into()));
}
assert!(context::current().get("user_id").is_none());
```
*/
#[macro_export]
macro_rules! scope {
    ($($key:ident = $value:expr),* $(,)?) => {
        $crate::context::enter($crate::fields!($($key = $value),*))
    };
}

#[cfg(test)]
mod tests {
    use crate::context::Context;
    use crate::{AwareLogger, ContextValue, InMemoryLogger, Level};
    use std::sync::Arc;

    fn capture() -> (AwareLogger, Arc<InMemoryLogger>) {
        let memory = Arc::new(InMemoryLogger::new());
        (AwareLogger::new().with_logger(memory.clone()), memory)
    }

    #[test]
    fn fields_macro_skips_none() {
        let missing: Option<i64> = None;
        let fields = crate::fields!(a = 1, b = missing, c = "x",);
        assert_eq!(fields.len(), 2);
        assert!(!fields.contains_key("b"));
    }

    #[test]
    fn level_macros_set_level_and_location() {
        let (log, memory) = capture();
        crate::debug!(log, "d");
        crate::info!(log, "i");
        crate::warning!(log, "w");
        crate::warn!(log, "w2");
        crate::error!(log, "e");
        crate::critical!(log, "c");
        crate::fatal!(log, "f");
        let levels: Vec<Level> = memory.drain_records().iter().map(|r| r.level()).collect();
        assert_eq!(
            levels,
            vec![
                Level::Debug,
                Level::Info,
                Level::Warning,
                Level::Warning,
                Level::Error,
                Level::Critical,
                Level::Critical
            ]
        );

        let record = crate::info!(log, "where").unwrap();
        assert_eq!(record.location().module, module_path!());
    }

    #[test]
    fn macro_fields_render_and_stay_explicit() {
        Context::reset();
        let (log, _memory) = capture();
        let _scope = crate::scope!(user_id = "ctx", request_id = "r-9");
        let record = crate::info!(log, "hello {user_id}", user_id = "explicit").unwrap();
        assert_eq!(record.message(), "hello explicit");
        assert_eq!(record.field("user_id"), Some(&ContextValue::from("explicit")));
        assert_eq!(record.field("request_id"), Some(&ContextValue::from("r-9")));
    }

    #[test]
    fn log_macro_takes_runtime_level() {
        let (log, memory) = capture();
        let level = if memory.is_empty() { Level::Error } else { Level::Debug };
        crate::log!(log, level, "n={n}", n = 1.5);
        assert_eq!(memory.drain_logs(), format!("ERROR {}:n=1.5 {{\"n\":1.5}}", module_path!()));
    }
}
