// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log record type.
//!
//! A [`LogRecord`] is built by an [`AwareLogger`](crate::AwareLogger), enriched
//! with the current context, then handed by value to every
//! [`Logger`](crate::Logger).
//!
//! # Example
//!
//! ```rust
//! use logaware::{Level, LogRecord};
//!
//! let record = LogRecord::new(Level::Info, "Processing request")
//!     .with_field("request_id", "r-1");
//! assert_eq!(record.message(), "Processing request");
//! assert!(record.has_field("request_id"));
//! ```

use crate::Level;
use crate::fields::Fields;
use crate::value::{ContextValue, IntoFieldValue};
use serde::Serialize;
use std::fmt::Display;

/// Names of the core record fields.  Extra fields with these names would be
/// mistaken for the record's own data by flat renderers.
pub const CORE_FIELD_NAMES: [&str; 7] = [
    "message",
    "level",
    "timestamp",
    "module",
    "function",
    "file",
    "line",
];

/// Where in the source a record was logged from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub module: &'static str,
    /// Name of the enclosing function, without its module path.  Empty when
    /// unknown.
    pub function: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl Location {
    pub const fn new(module: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            module,
            function: "",
            file,
            line,
        }
    }

    pub const fn with_function(mut self, function: &'static str) -> Self {
        self.function = function;
        self
    }

    /// Location for records that were not logged through a macro.
    pub const fn unknown() -> Self {
        Self::new("", "", 0)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Expands to the [`Location`] of the invocation, enclosing function included.
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(::std::module_path!(), ::std::file!(), ::std::line!())
            .with_function($crate::__function_name!())
    };
}

/// Name of the enclosing function.  Closures and async blocks report the
/// function they are written in.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        $crate::__short_function_name(::std::any::type_name_of_val(&f))
    }};
}

/// Reduces `a::b::outer::{{closure}}::f` to `outer`.
#[doc(hidden)]
pub fn short_function_name(path: &'static str) -> &'static str {
    let mut path = path.strip_suffix("::f").unwrap_or(path);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path.rsplit("::").next().unwrap_or(path)
}

/**
A log record.

The message is final: any `{key}` template has been rendered by the time a
record exists.  Extra fields set by the caller are never overwritten by
enrichment.
*/
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    level: Level,
    message: String,
    #[serde(serialize_with = "serialize_timestamp")]
    timestamp: crate::sys::SystemTime,
    #[serde(flatten)]
    location: Location,
    fields: Fields,
}

fn serialize_timestamp<S: serde::Serializer>(
    t: &crate::sys::SystemTime,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.serialize_f64(unix_seconds(*t))
}

fn unix_seconds(t: crate::sys::SystemTime) -> f64 {
    t.duration_since(crate::sys::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: crate::sys::SystemTime::now(),
            location: Location::unknown(),
            fields: Fields::new(),
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_timestamp(mut self, timestamp: crate::sys::SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets an extra field explicitly.  `None` values are skipped.
    pub fn with_field(mut self, key: impl Into<String>, value: impl IntoFieldValue) -> Self {
        if let Some(value) = value.into_field_value() {
            self.fields.insert(key, value);
        }
        self
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields.overlay(&fields);
        self
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.fields.insert(key, value);
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn field(&self, key: &str) -> Option<&ContextValue> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> crate::sys::SystemTime {
        self.timestamp
    }

    /// Seconds since the Unix epoch.
    pub fn unix_timestamp(&self) -> f64 {
        unix_seconds(self.timestamp)
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Renders the record as a single JSON object.
    ///
    /// Core members come first; extra fields are nested under `"fields"` so
    /// they can never shadow them.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                "{{\"level\":\"{}\",\"message\":{:?},\"error\":{:?}}}",
                self.level,
                self.message,
                e.to_string()
            )
        })
    }
}

impl Default for LogRecord {
    fn default() -> Self {
        Self::new(Level::Info, String::new())
    }
}

/// `LEVEL module:message {fields}`, the fields part omitted when empty.
impl Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.level)?;
        if !self.location.module.is_empty() {
            write!(f, "{}:", self.location.module)?;
        }
        f.write_str(&self.message)?;
        if !self.fields.is_empty() {
            write!(f, " {}", self.fields)?;
        }
        Ok(())
    }
}
/*
Boilerplate notes for LogRecord:

- Clone: records are handed by value to every logger
- PartialEq: for tests; not Eq because fields may hold floats
- Hash/Ord: no meaningful identity or ordering for log records
- Default: Info, empty message
- Display: the text line used by StdErrorLogger and InMemoryLogger::drain_logs
*/
