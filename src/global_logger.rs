// SPDX-License-Identifier: MIT OR Apache-2.0

//! Global logger management.
//!
//! An [`AwareLogger`](crate::AwareLogger) built without explicit loggers
//! sends its records to every logger registered here.  logaware's own
//! diagnostics (for instance a scope released out of order) are delivered
//! here too.
//!
//! By default the list holds a single [`StdErrorLogger`](crate::StdErrorLogger).
//!
//! # Examples
//!
//! ```
//! use logaware::global_logger::{global_loggers, set_global_loggers};
//! use logaware::InMemoryLogger;
//! use std::sync::Arc;
//!
//! let original = global_loggers();
//! let logger = Arc::new(InMemoryLogger::new());
//! set_global_loggers(vec![logger.clone()]);
//!
//! logaware::warning!("Only captured in memory");
//! assert!(logger.drain_logs().contains("Only captured in memory"));
//!
//! set_global_loggers(original);
//! ```
//!
//! # Implementation Notes
//!
//! The list is guarded by a reader/writer spinlock rather than a `Mutex` so
//! that it works on the wasm main thread.  Readers clone the `Arc`s out and
//! release the lock before calling any logger, so a logger that itself logs
//! cannot deadlock, and a logger removed by [`set_global_loggers`] stays
//! alive until in-flight records are finished.

use crate::Level;
use crate::log_record::{LogRecord, Location};
use crate::logger::Logger;
use crate::spinlock::Spinlock;
use crate::stderror_logger::StdErrorLogger;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static GLOBAL_LOGGERS: OnceLock<Spinlock<Vec<Arc<dyn Logger>>>> = OnceLock::new();

fn loggers_lock() -> &'static Spinlock<Vec<Arc<dyn Logger>>> {
    GLOBAL_LOGGERS.get_or_init(|| Spinlock::new(vec![Arc::new(StdErrorLogger::new())]))
}

/// Retrieves the current set of global loggers.
pub fn global_loggers() -> Vec<Arc<dyn Logger>> {
    loggers_lock().read(|loggers| loggers.clone())
}

/// Adds a logger to the global collection.
pub fn add_global_logger(logger: Arc<dyn Logger>) {
    loggers_lock().write(|loggers| loggers.push(logger));
}

/// Replaces all global loggers.
///
/// An empty list is allowed; records are then silently dropped.
pub fn set_global_loggers(new_loggers: Vec<Arc<dyn Logger>>) {
    loggers_lock().write(|loggers| *loggers = new_loggers);
}

/// Asks every global logger to flush.
pub fn prepare_to_die() {
    for logger in global_loggers() {
        logger.prepare_to_die();
    }
}

/// Sends `record` to every global logger.
pub(crate) fn dispatch(record: LogRecord) {
    let loggers = global_loggers();
    if let Some((last, rest)) = loggers.split_last() {
        for logger in rest {
            logger.finish_log_record(record.clone());
        }
        last.finish_log_record(record);
    }
}

thread_local! {
    static IN_DIAGNOSTIC: Cell<bool> = const { Cell::new(false) };
}

/// Clears [`IN_DIAGNOSTIC`] even if a logger panics.
struct DiagnosticScope;

impl Drop for DiagnosticScope {
    fn drop(&mut self) {
        let _ = IN_DIAGNOSTIC.try_with(|flag| flag.set(false));
    }
}

/// Reports a problem inside logaware itself.
///
/// Diagnostics are not enriched: they usually mean the context stack is not
/// in the state its owner expected.  A diagnostic raised while another one is
/// being delivered on the same thread is dropped.
pub(crate) fn diagnostic(level: Level, message: String) {
    let entered = IN_DIAGNOSTIC
        .try_with(|flag| !flag.replace(true))
        .unwrap_or(false);
    if !entered {
        return;
    }
    let _scope = DiagnosticScope;
    let record = LogRecord::new(level, message)
        .with_location(Location::new(module_path!(), file!(), line!()));
    dispatch(record);
}

/// Reports the first write failure of a logger; `failed` remembers it.
pub(crate) fn report_sink_failure(failed: &AtomicBool, sink: &str, error: &std::io::Error) {
    if !failed.swap(true, Ordering::Relaxed) {
        diagnostic(Level::Error, format!("{sink} failed to write: {error}"));
    }
}
