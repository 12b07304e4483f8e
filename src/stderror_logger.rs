// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::log_record::LogRecord;
use crate::logger::Logger;
use std::sync::atomic::AtomicBool;

/**
A reference logger that writes one text line per record to stderr.

The line is the record's `Display` form: `LEVEL module:message {fields}`.
On wasm the line goes to the browser console at the matching console level.

The first failed write is reported as a diagnostic to the global loggers;
later failures are dropped.
 */
#[derive(Debug, Default)]
pub struct StdErrorLogger {
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    failed: AtomicBool,
}

impl StdErrorLogger {
    pub const fn new() -> Self {
        Self {
            failed: AtomicBool::new(false),
        }
    }
}

impl Logger for StdErrorLogger {
    fn finish_log_record(&self, record: LogRecord) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::Write;
            let line = format!("{record}\n");
            if let Err(e) = std::io::stderr().lock().write_all(line.as_bytes()) {
                crate::global_logger::report_sink_failure(&self.failed, "StdErrorLogger", &e);
            }
        }
        #[cfg(target_arch = "wasm32")]
        {
            use crate::Level;
            let msg = record.to_string();
            let level = record.level();
            if level >= Level::Error {
                web_sys::console::error_1(&msg.into());
            } else if level >= Level::Warning {
                web_sys::console::warn_1(&msg.into());
            } else if level >= Level::Info {
                web_sys::console::info_1(&msg.into());
            } else {
                web_sys::console::debug_1(&msg.into());
            }
        }
    }

    fn finish_log_record_async<'s>(
        &'s self,
        record: LogRecord,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 's>> {
        Box::pin(async move { self.finish_log_record(record) })
    }

    fn prepare_to_die(&self) {
        //nothing to do since we are unbuffered
    }
}
