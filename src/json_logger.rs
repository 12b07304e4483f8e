// SPDX-License-Identifier: MIT OR Apache-2.0

//! A logger that writes one JSON object per line.

use crate::log_record::LogRecord;
use crate::logger::Logger;
use std::fmt::Debug;
use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::{Mutex, PoisonError};

/**
Writes each record as a line of JSON to any [`Write`] destination.

```rust
use logaware::{JsonLogger, Level, LogRecord, Logger};

let logger = JsonLogger::new(Vec::new());
logger.finish_log_record(LogRecord::new(Level::Info, "started").with_field("port", 8080));
let out = String::from_utf8(logger.into_inner()).unwrap();
assert!(out.starts_with(r#"{"level":"info","message":"started""#));
assert!(out.ends_with("\"fields\":{\"port\":8080}}\n"));
```

Logging never fails the caller.  The first failed write or flush is
reported as a diagnostic to the global loggers; later failures are dropped.
*/
pub struct JsonLogger<W: Write + Send = Box<dyn Write + Send>> {
    writer: Mutex<W>,
    failed: AtomicBool,
}

impl JsonLogger {
    /// A logger writing to standard output.
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}

impl<W: Write + Send> JsonLogger<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            failed: AtomicBool::new(false),
        }
    }

    /// Returns the destination, for instance to inspect a `Vec<u8>` buffer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Debug for JsonLogger<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLogger").finish_non_exhaustive()
    }
}

impl<W: Write + Send> Logger for JsonLogger<W> {
    fn finish_log_record(&self, record: LogRecord) {
        let mut line = record.to_json();
        line.push('\n');
        let result = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_all(line.as_bytes());
        if let Err(e) = result {
            crate::global_logger::report_sink_failure(&self.failed, "JsonLogger", &e);
        }
    }

    fn finish_log_record_async<'s>(
        &'s self,
        record: LogRecord,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 's>> {
        Box::pin(async move { self.finish_log_record(record) })
    }

    fn prepare_to_die(&self) {
        let result = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush();
        if let Err(e) = result {
            crate::global_logger::report_sink_failure(&self.failed, "JsonLogger", &e);
        }
    }
}
