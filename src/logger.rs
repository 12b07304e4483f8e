// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::log_record::LogRecord;
use std::fmt::Debug;

/// A destination for finished, enriched records.
///
/// Loggers decide how records are formatted and where they go.  They may be
/// called from many threads at once and must do their own synchronization.
pub trait Logger: Debug + Send + Sync {
    /**
        Submits the log record for logging.

        Implementations must not panic: a failing destination should drop the record.
    */
    fn finish_log_record(&self, record: LogRecord);

    /**
    Submits the log record for logging asynchronously.

    This allows loggers to reuse an async context that already exists.
    Loggers may choose to implement this as a simple wrapper around [Self::finish_log_record] if they wish.
    */
    fn finish_log_record_async<'s>(
        &'s self,
        record: LogRecord,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 's>>;

    /**
    The application may imminently exit.  Ensure all buffers are flushed and up to date.
    */
    fn prepare_to_die(&self);
}

/*
Boilerplate notes.

# Logger

Clone is not required; loggers are shared through Arc.
PartialEq/Eq/Hash: unclear whether we would mean data equality or provenance, so none.
Default is not sensible in general (a file logger needs a path).
Send/Sync are required since one logger receives records from every thread.
*/
