// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logging call surface.
//!
//! An [`AwareLogger`] turns a call like
//!
//! ```rust
//! # let user = "bob"; let id = 20;
//! logaware::info!("User {user} ({id}) logged in", user = user, id = id);
//! ```
//!
//! into a [`LogRecord`]: it checks the level, renders the `{key}` template
//! with the call's fields, keeps those fields on the record, merges in the
//! calling thread's context and hands the result to its loggers.
//!
//! Nothing in here returns an error or panics on behalf of a logging call.
//! The `try_*` methods exist for callers who want to see template errors.

use crate::Level;
use crate::config::Config;
use crate::enricher::Enricher;
use crate::error::{LogError, LogResult};
use crate::fields::Fields;
use crate::format;
use crate::log_record::{LogRecord, Location};
use crate::logger::Logger;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};

/// Field added to a record whose template could not be rendered.
pub const FORMAT_ERROR_FIELD: &str = "format_error";

type ContextSource = Arc<dyn Fn() -> LogResult<Fields> + Send + Sync>;

/// A context-aware logger.
///
/// Without explicit loggers, records go to the
/// [global loggers](crate::global_logger).
///
/// ```rust
/// use logaware::{AwareLogger, InMemoryLogger, Level, context};
/// use logaware::Fields;
/// use std::sync::Arc;
///
/// let memory = Arc::new(InMemoryLogger::new());
/// let log = AwareLogger::new()
///     .with_min_level(Level::Info)
///     .with_logger(memory.clone());
///
/// let _scope = context::enter(Fields::new().with("request_id", "r-1"));
/// logaware::debug!(log, "not shown");
/// logaware::info!(log, "Order {order} shipped", order = 7);
///
/// let records = memory.drain_records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].message(), "Order 7 shipped");
/// assert_eq!(
///     records[0].fields(),
///     &Fields::new().with("order", 7).with("request_id", "r-1")
/// );
/// ```
#[derive(Clone)]
pub struct AwareLogger {
    min_level: Level,
    skip_empty: bool,
    enricher: Enricher,
    loggers: Option<Vec<Arc<dyn Logger>>>,
    source: Option<ContextSource>,
}

impl Debug for AwareLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwareLogger")
            .field("min_level", &self.min_level)
            .field("enricher", &self.enricher)
            .field("loggers", &self.loggers)
            .field("custom_source", &self.source.is_some())
            .finish()
    }
}

impl Default for AwareLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl AwareLogger {
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            min_level: config.min_level,
            skip_empty: config.skip_empty,
            enricher: Enricher::from_config(config),
            loggers: None,
            source: None,
        }
    }

    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Sends records to `logger` instead of, or in addition to previously
    /// added, explicit loggers.  Global loggers are no longer used.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.loggers.get_or_insert_with(Vec::new).push(logger);
        self
    }

    pub fn with_loggers(mut self, loggers: Vec<Arc<dyn Logger>>) -> Self {
        self.loggers = Some(loggers);
        self
    }

    /// Reads context from `source` instead of the calling thread's stack.
    ///
    /// For frameworks that keep request metadata somewhere of their own.
    pub fn with_context_source(
        mut self,
        source: impl Fn() -> LogResult<Fields> + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn enricher(&self) -> &Enricher {
        &self.enricher
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn snapshot(&self) -> LogResult<Fields> {
        match &self.source {
            Some(source) => source(),
            None => crate::context::try_current(),
        }
    }

    /// Builds the enriched record, or `Ok(None)` when `level` is filtered out.
    fn build(
        &self,
        level: Level,
        location: Location,
        template: &str,
        mut fields: Fields,
    ) -> LogResult<Option<LogRecord>> {
        if !self.is_enabled_for(level) {
            return Ok(None);
        }
        let message = if fields.is_empty() {
            template.to_string()
        } else {
            format::render(template, &fields).map_err(|source| LogError::Format {
                template: template.to_string(),
                source,
            })?
        };
        if self.skip_empty {
            fields.retain_non_empty();
        }
        let record = LogRecord::new(level, message)
            .with_location(location)
            .with_fields(fields);
        Ok(Some(self.enrich(record)))
    }

    fn enrich(&self, record: LogRecord) -> LogRecord {
        match self.snapshot() {
            Ok(snapshot) => self.enricher.enrich(record, &snapshot),
            // context is best effort; the record itself still goes out
            Err(_) => record,
        }
    }

    /// Like [`build`](Self::build), but a template error yields a record
    /// carrying the raw template and a [`FORMAT_ERROR_FIELD`].
    fn build_lenient(
        &self,
        level: Level,
        location: Location,
        template: &str,
        fields: Fields,
    ) -> Option<LogRecord> {
        match self.build(level, location, template, fields.clone()) {
            Ok(record) => record,
            Err(e) => {
                let mut fields = fields;
                if self.skip_empty {
                    fields.retain_non_empty();
                }
                let record = LogRecord::new(level, template)
                    .with_location(location)
                    .with_fields(fields)
                    .with_field(FORMAT_ERROR_FIELD, e.to_string());
                Some(self.enrich(record))
            }
        }
    }

    fn emit(&self, record: LogRecord) {
        match &self.loggers {
            Some(loggers) => {
                for logger in loggers {
                    logger.finish_log_record(record.clone());
                }
            }
            None => crate::global_logger::dispatch(record),
        }
    }

    /// Logs a message, returning the record that was emitted.
    ///
    /// Returns `None` when `level` is below the threshold.  A template that
    /// cannot be rendered is logged verbatim with a [`FORMAT_ERROR_FIELD`].
    pub fn log(
        &self,
        level: Level,
        location: Location,
        template: &str,
        fields: Fields,
    ) -> Option<LogRecord> {
        let record = self.build_lenient(level, location, template, fields)?;
        self.emit(record.clone());
        Some(record)
    }

    /// Logs a message, reporting a template error instead of emitting.
    pub fn try_log(
        &self,
        level: Level,
        location: Location,
        template: &str,
        fields: Fields,
    ) -> LogResult<Option<LogRecord>> {
        let record = self.build(level, location, template, fields)?;
        if let Some(record) = &record {
            self.emit(record.clone());
        }
        Ok(record)
    }

    /// Async version of [`log`](Self::log), using each logger's
    /// [`finish_log_record_async`](Logger::finish_log_record_async).
    ///
    /// Context is read when the returned future is first polled, so wrap
    /// the calling future in [`ApplyContext`](crate::context::ApplyContext)
    /// when it may be polled on another thread.
    pub async fn log_async(
        &self,
        level: Level,
        location: Location,
        template: &str,
        fields: Fields,
    ) -> Option<LogRecord> {
        let record = self.build_lenient(level, location, template, fields)?;
        let loggers = match &self.loggers {
            Some(loggers) => loggers.clone(),
            None => crate::global_logger::global_loggers(),
        };
        for logger in &loggers {
            logger.finish_log_record_async(record.clone()).await;
        }
        Some(record)
    }

    /// Logs an error and its chain of sources at [`Level::Error`].
    ///
    /// The message is the error's `Display`; the sources, outermost first,
    /// are joined into a `caused_by` field.
    pub fn log_error(
        &self,
        location: Location,
        error: &(dyn std::error::Error + 'static),
    ) -> Option<LogRecord> {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(e) = source {
            chain.push(e.to_string());
            source = e.source();
        }
        if !self.is_enabled_for(Level::Error) {
            return None;
        }
        let mut record = LogRecord::new(Level::Error, error.to_string()).with_location(location);
        if !chain.is_empty() {
            record.set_field("caused_by", chain.join(": "));
        }
        let record = self.enrich(record);
        self.emit(record.clone());
        Some(record)
    }

    #[track_caller]
    fn log_plain(&self, level: Level, message: &str) -> Option<LogRecord> {
        let caller = std::panic::Location::caller();
        let location = Location::new("", caller.file(), caller.line());
        let record = self.build_lenient(level, location, message, Fields::new())?;
        self.emit(record.clone());
        Some(record)
    }

    /// Logs `message` verbatim at [`Level::Debug`].  Braces are not interpreted.
    #[track_caller]
    pub fn debug(&self, message: &str) -> Option<LogRecord> {
        self.log_plain(Level::Debug, message)
    }

    #[track_caller]
    pub fn info(&self, message: &str) -> Option<LogRecord> {
        self.log_plain(Level::Info, message)
    }

    #[track_caller]
    pub fn warning(&self, message: &str) -> Option<LogRecord> {
        self.log_plain(Level::Warning, message)
    }

    #[track_caller]
    pub fn error(&self, message: &str) -> Option<LogRecord> {
        self.log_plain(Level::Error, message)
    }

    #[track_caller]
    pub fn critical(&self, message: &str) -> Option<LogRecord> {
        self.log_plain(Level::Critical, message)
    }
}

static DEFAULT_LOGGER: OnceLock<AwareLogger> = OnceLock::new();

/// The logger used by the logging macros when none is given.
///
/// Configured from the environment (see [`Config::from_env`]) on first use
/// unless [`init_default_logger`] ran earlier.  A bad environment falls back
/// to the defaults and reports the problem as a warning.
pub fn default_logger() -> &'static AwareLogger {
    DEFAULT_LOGGER.get_or_init(|| match Config::from_env() {
        Ok(config) => AwareLogger::from_config(&config),
        Err(e) => {
            crate::global_logger::diagnostic(Level::Warning, e.to_string());
            AwareLogger::new()
        }
    })
}

/// Installs the logger used by the logging macros.
///
/// Fails, handing the logger back, if the default logger was already set or used.
pub fn init_default_logger(logger: AwareLogger) -> Result<(), AwareLogger> {
    DEFAULT_LOGGER.set(logger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{self, Context};
    use crate::inmemory_logger::InMemoryLogger;
    use crate::value::ContextValue;

    fn capture() -> (AwareLogger, Arc<InMemoryLogger>) {
        let memory = Arc::new(InMemoryLogger::new());
        (AwareLogger::new().with_logger(memory.clone()), memory)
    }

    fn here() -> Location {
        Location::new("tests", "src/aware_logger.rs", 1)
    }

    #[test]
    fn renders_template_and_keeps_fields() {
        Context::reset();
        let (log, memory) = capture();
        let fields = Fields::new().with("user", "bob").with("id", 20);
        let record = log
            .log(Level::Info, here(), "User {user} ({id}) logged in", fields)
            .unwrap();
        assert_eq!(record.message(), "User bob (20) logged in");
        assert_eq!(record.field("id"), Some(&ContextValue::Int(20)));
        assert_eq!(memory.drain_records(), vec![record]);
    }

    #[test]
    fn template_without_fields_is_untouched() {
        let (log, _memory) = capture();
        let record = log
            .log(Level::Info, here(), "literal {braces}", Fields::new())
            .unwrap();
        assert_eq!(record.message(), "literal {braces}");
    }

    #[test]
    fn threshold_filters_before_building() {
        let (log, memory) = capture();
        let log = log.with_min_level(Level::Warning);
        assert!(log.log(Level::Info, here(), "quiet", Fields::new()).is_none());
        assert!(log.log(Level::Error, here(), "loud", Fields::new()).is_some());
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn bad_template_degrades_in_log() {
        Context::reset();
        let (log, memory) = capture();
        let record = log
            .log(Level::Info, here(), "Hello {missing}", Fields::new().with("x", 1))
            .unwrap();
        assert_eq!(record.message(), "Hello {missing}");
        assert!(record.has_field(FORMAT_ERROR_FIELD));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn bad_template_is_reported_by_try_log() {
        let (log, memory) = capture();
        let result = log.try_log(Level::Info, here(), "Hello {missing}", Fields::new().with("x", 1));
        assert!(matches!(result, Err(LogError::Format { .. })));
        assert!(memory.is_empty());
    }

    #[test]
    fn empty_caller_values_are_dropped() {
        let (log, _memory) = capture();
        let record = log
            .log(
                Level::Info,
                here(),
                "User {user}",
                Fields::new().with("user", "bob").with("note", ""),
            )
            .unwrap();
        assert!(!record.has_field("note"));
    }

    #[test]
    fn context_is_merged_and_caller_wins() {
        Context::reset();
        let (log, _memory) = capture();
        let _scope = context::enter(
            Fields::new()
                .with("user_id", "ctx")
                .with("request_id", "r-3")
                .with("message", "x"),
        );
        let record = log
            .log(Level::Info, here(), "hi", Fields::new().with("user_id", "explicit"))
            .unwrap();
        assert_eq!(record.message(), "hi");
        assert_eq!(record.field("user_id"), Some(&ContextValue::from("explicit")));
        assert_eq!(record.field("request_id"), Some(&ContextValue::from("r-3")));
        assert_eq!(record.field("ctx_message"), Some(&ContextValue::from("x")));
    }

    #[test]
    fn unavailable_source_still_emits() {
        let (log, memory) = capture();
        let log = log.with_context_source(|| Err(LogError::ContextUnavailable));
        let record = log.log(Level::Warning, here(), "still here", Fields::new());
        assert!(record.is_some());
        assert_eq!(memory.drain_logs(), "WARNING tests:still here");
    }

    #[test]
    fn custom_source_replaces_thread_context() {
        Context::reset();
        let _scope = context::enter(Fields::new().with("thread", true));
        let (log, _memory) = capture();
        let log = log.with_context_source(|| Ok(Fields::new().with("tenant", "acme")));
        let record = log.log(Level::Info, here(), "m", Fields::new()).unwrap();
        assert!(record.has_field("tenant"));
        assert!(!record.has_field("thread"));
    }

    #[derive(Debug)]
    struct Inner;
    impl std::fmt::Display for Inner {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("connection refused")
        }
    }
    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);
    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("cannot load profile")
        }
    }
    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn log_error_records_source_chain() {
        Context::reset();
        let (log, memory) = capture();
        let _scope = context::enter(Fields::new().with("user_id", 9));
        let record = log.log_error(here(), &Outer(Inner)).unwrap();
        assert_eq!(record.level(), Level::Error);
        assert_eq!(record.message(), "cannot load profile");
        assert_eq!(
            record.field("caused_by"),
            Some(&ContextValue::from("connection refused"))
        );
        assert!(record.has_field("user_id"));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn plain_methods_capture_caller_line() {
        let (log, _memory) = capture();
        let line = line!() + 1;
        let record = log.warning("plain {not a template}").unwrap();
        assert_eq!(record.message(), "plain {not a template}");
        assert_eq!(record.location().line, line);
        assert!(record.location().file.ends_with("aware_logger.rs"));
    }

    #[test_executors::async_test]
    async fn log_async_uses_async_path() {
        let (log, memory) = capture();
        let record = log
            .log_async(Level::Info, here(), "n={n}", Fields::new().with("n", 1))
            .await
            .unwrap();
        assert_eq!(record.message(), "n=1");
        assert_eq!(memory.len(), 1);
    }
}
