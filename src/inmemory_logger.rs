// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Logger
//!
//! Captures records in memory instead of writing them anywhere, which makes
//! it the logger of choice for tests: records keep their fields, so a test
//! can check exactly what enrichment produced.

use crate::log_record::LogRecord;
use crate::logger::Logger;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A logger that stores records in a `Vec`.
///
/// # Example
///
/// ```rust
/// use logaware::{AwareLogger, InMemoryLogger};
/// use std::sync::Arc;
///
/// let memory = Arc::new(InMemoryLogger::new());
/// let log = AwareLogger::new().with_logger(memory.clone());
///
/// logaware::info!(log, "Test message {value}", value = 42);
///
/// let records = memory.drain_records();
/// assert_eq!(records[0].message(), "Test message 42");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: required by Logger
// - Default: empty buffer
// - Clone: NOT implemented - loggers are shared through Arc
// - PartialEq/Eq/Hash: NOT implemented - equality of loggers is not meaningful
// - Send/Sync: automatic through Mutex

impl InMemoryLogger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    // A test that panicked while logging should not hide the other records.
    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes and returns every captured record, oldest first.
    pub fn drain_records(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.lock())
    }

    /// Returns a copy of every captured record without clearing the buffer.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Drains all records into their text form, one per line.
    pub fn drain_logs(&self) -> String {
        self.drain_records()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Writes every captured record to the console and clears the buffer.
    pub fn drain_to_console(&self) {
        for record in self.drain_records() {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(&record.to_string().into());
            #[cfg(not(target_arch = "wasm32"))]
            eprintln!("{}", record);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Logger for InMemoryLogger {
    fn finish_log_record(&self, record: LogRecord) {
        self.lock().push(record);
    }

    fn finish_log_record_async<'s>(
        &'s self,
        record: LogRecord,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 's>> {
        Box::pin(async move {
            self.finish_log_record(record);
        })
    }

    fn prepare_to_die(&self) {
        // nothing buffered outside of memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;

    #[test]
    fn drain_clears_buffer() {
        let logger = InMemoryLogger::new();
        logger.finish_log_record(LogRecord::new(Level::Info, "first"));
        logger.finish_log_record(LogRecord::new(Level::Warning, "second"));
        assert_eq!(logger.len(), 2);
        assert_eq!(logger.drain_logs(), "INFO first\nWARNING second");
        assert!(logger.is_empty());
        assert_eq!(logger.drain_logs(), "");
    }

    #[test]
    fn records_does_not_clear() {
        let logger = InMemoryLogger::new();
        logger.finish_log_record(LogRecord::new(Level::Debug, "kept"));
        assert_eq!(logger.records().len(), 1);
        assert_eq!(logger.records().len(), 1);
    }

    #[test_executors::async_test]
    async fn async_finish_stores_record() {
        let logger = InMemoryLogger::new();
        logger
            .finish_log_record_async(LogRecord::new(Level::Error, "later"))
            .await;
        assert_eq!(logger.drain_records()[0].message(), "later");
    }
}
