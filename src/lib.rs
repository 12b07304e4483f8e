// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# logaware

logaware is a context-aware logging library for Rust.

# The problem

A request handler deep inside a service logs `"cache miss"`.  Which request?
Which user?  The usual answer is to thread a `request_id` through every
function signature just so it can be repeated in every log call, and
sooner or later someone forgets.

logaware keeps that information next to the code that knows it instead.
A handler declares a scope once, and every record logged inside the scope,
in any function, carries its fields:

```rust
use logaware::{AwareLogger, InMemoryLogger};
use std::sync::Arc;

fn lookup(log: &AwareLogger) {
    logaware::info!(log, "cache miss");
}

let memory = Arc::new(InMemoryLogger::new());
let log = AwareLogger::new().with_logger(memory.clone());

{
    let _scope = logaware::scope!(request_id = "r-17", user_id = 5);
    lookup(&log);
}
lookup(&log);

let lines = memory.drain_logs();
assert!(lines.contains(r#"cache miss {"request_id":"r-17", "user_id":5}"#));
assert!(lines.ends_with(":cache miss"));
```

# Scopes

Context lives in a per-thread stack of frames.  [`scope!`] (or
[`context::enter`]) pushes a frame and returns a
[`ScopeGuard`](context::ScopeGuard); dropping the guard pops the frame and
everything above it.  Early returns and panics therefore clean up after
themselves, and a scope whose guard was leaked is still removed when an
outer scope ends.

Inner frames shadow outer ones key by key.  [`context::current`] returns
the merged view.

# Records

The logging macros ([`debug!`], [`info!`], [`warning!`], [`error!`],
[`critical!`]) render a `{key}` template with their `key = value`
arguments, keep those arguments as explicit fields, and merge in the
current context:

* Fields given at the call site always win over context with the same name.
* Context keys that would collide with the record's own data (`message`,
  `level`, `timestamp`, `module`, `function`, `file`, `line`) are renamed
  with a prefix, `ctx_message` by default.
* Empty string values are left out.

All of this is adjustable through [`Config`].

# Threads and async

Context does not follow work to other threads on its own.  Capture it with
[`context::Context::current`] and install it with
[`set_current`](context::Context::set_current) on the other side, or wrap a
future with [`ContextFutureExt`](context::ContextFutureExt) so that it
carries its context to whichever thread polls it.

# Loggers

Records are finished by [`Logger`]s.  [`StdErrorLogger`] writes text,
[`JsonLogger`] writes one JSON object per line and [`InMemoryLogger`]
keeps records around for tests.  An [`AwareLogger`] either has its own
loggers or uses the [global ones](global_logger).
*/

mod aware_logger;
mod config;
pub mod context;
mod enricher;
mod error;
mod fields;
pub mod format;
pub mod global_logger;
mod inmemory_logger;
mod json_logger;
mod level;
mod log_record;
mod logger;
mod macros;
mod spinlock;
mod stderror_logger;
mod sys;
mod value;

pub use aware_logger::{AwareLogger, FORMAT_ERROR_FIELD, default_logger, init_default_logger};
pub use config::{Config, LEVEL_ENV, PREFIX_ENV};
pub use enricher::Enricher;
pub use error::{FormatError, LogError, LogResult};
pub use fields::Fields;
pub use global_logger::{add_global_logger, global_loggers, set_global_loggers};
pub use inmemory_logger::InMemoryLogger;
pub use json_logger::JsonLogger;
pub use level::Level;
pub use log_record::{CORE_FIELD_NAMES, Location, LogRecord};
#[doc(hidden)]
pub use log_record::short_function_name as __short_function_name;
pub use logger::Logger;
pub use stderror_logger::StdErrorLogger;
pub use value::{ContextValue, IntoFieldValue};
