// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merging context into records.
//!
//! # Collision policy
//!
//! Two kinds of collision can happen when a context snapshot is merged into a
//! record, and they are resolved in this order:
//!
//! 1. A context key equal to a reserved name (by default the core record
//!    fields `message`, `level`, `timestamp`, `module`, `function`, `file`,
//!    `line`) is renamed to `<prefix><key>`, `ctx_message` with the default prefix.
//! 2. If the record already has a field with the resulting name, the
//!    record's value is kept.  Fields set by the caller always win.
//!
//! Context values that are empty strings are skipped unless the
//! configuration says otherwise.
//!
//! ```rust
//! use logaware::{Enricher, Fields, Level, LogRecord};
//!
//! let snapshot = Fields::new()
//!     .with("user_id", "ctx")
//!     .with("request_id", "r-1")
//!     .with("message", "x");
//! let record = LogRecord::new(Level::Info, "hello").with_field("user_id", "explicit");
//!
//! let enriched = Enricher::new().enrich(record, &snapshot);
//! assert_eq!(enriched.message(), "hello");
//! assert_eq!(
//!     enriched.fields(),
//!     &Fields::new()
//!         .with("ctx_message", "x")
//!         .with("request_id", "r-1")
//!         .with("user_id", "explicit")
//! );
//! ```

use crate::config::Config;
use crate::fields::Fields;
use crate::log_record::LogRecord;
use std::borrow::Cow;
use std::collections::BTreeSet;

/// Merges a context snapshot into log records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enricher {
    reserved: BTreeSet<String>,
    prefix: String,
    skip_empty: bool,
}

impl Default for Enricher {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Enricher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            reserved: config.reserved.iter().cloned().collect(),
            prefix: config.prefix.clone(),
            skip_empty: config.skip_empty,
        }
    }

    /// The name a context key is stored under in a record.
    pub fn context_key<'a>(&self, key: &'a str) -> Cow<'a, str> {
        if self.reserved.contains(key) {
            Cow::Owned(format!("{}{}", self.prefix, key))
        } else {
            Cow::Borrowed(key)
        }
    }

    /// Merges `snapshot` into the record's extra fields.
    ///
    /// Deterministic and free of side effects: the result depends only on
    /// `record`, `snapshot` and this enricher's configuration.
    pub fn enrich(&self, mut record: LogRecord, snapshot: &Fields) -> LogRecord {
        let fields = record.fields_mut();
        for (key, value) in snapshot {
            if self.skip_empty && value.is_empty() {
                continue;
            }
            fields.insert_if_absent(self.context_key(key).into_owned(), value.clone());
        }
        record
    }

    /// Merges the calling thread's context into the record.
    ///
    /// If the context cannot be read the record is returned unchanged.
    pub fn enrich_current(&self, record: LogRecord) -> LogRecord {
        match crate::context::try_current() {
            Ok(snapshot) => self.enrich(record, &snapshot),
            Err(_) => record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use crate::context::{self, Context};
    use crate::value::ContextValue;

    fn text<'a>(record: &'a LogRecord, key: &str) -> Option<&'a str> {
        record.field(key).and_then(ContextValue::as_str)
    }

    #[test]
    fn explicit_field_wins() {
        let record = LogRecord::new(Level::Info, "m").with_field("user_id", "explicit");
        let snapshot = Fields::new().with("user_id", "ctx");
        let enriched = Enricher::new().enrich(record, &snapshot);
        assert_eq!(text(&enriched, "user_id"), Some("explicit"));
    }

    #[test]
    fn reserved_key_is_namespaced() {
        let snapshot = Fields::new().with("message", "x").with("level", "loud");
        let enriched = Enricher::new().enrich(LogRecord::new(Level::Warning, "real"), &snapshot);
        assert_eq!(enriched.message(), "real");
        assert_eq!(enriched.level(), Level::Warning);
        assert_eq!(text(&enriched, "ctx_message"), Some("x"));
        assert_eq!(text(&enriched, "ctx_level"), Some("loud"));
        assert!(!enriched.has_field("message"));
    }

    #[test]
    fn namespaced_key_still_yields_to_caller() {
        let record = LogRecord::new(Level::Info, "m").with_field("ctx_message", "caller");
        let enriched = Enricher::new().enrich(record, &Fields::new().with("message", "ctx"));
        assert_eq!(text(&enriched, "ctx_message"), Some("caller"));
    }

    #[test]
    fn custom_prefix_and_reserved_names() {
        let config = Config::new().with_prefix("context.").with_reserved("service");
        let enricher = Enricher::from_config(&config);
        let enriched = enricher.enrich(
            LogRecord::new(Level::Info, "m"),
            &Fields::new().with("service", "api"),
        );
        assert_eq!(text(&enriched, "context.service"), Some("api"));
    }

    #[test]
    fn empty_values_are_skipped_by_default() {
        let snapshot = Fields::new().with("user", "").with("id", 0);
        let enriched = Enricher::new().enrich(LogRecord::default(), &snapshot);
        assert!(!enriched.has_field("user"));
        assert!(enriched.has_field("id"));

        let keep = Enricher::from_config(&Config::new().with_skip_empty(false));
        assert!(keep.enrich(LogRecord::default(), &snapshot).has_field("user"));
    }

    #[test]
    fn enrich_is_deterministic() {
        let snapshot = Fields::new().with("a", 1).with("b", true);
        let record = LogRecord::new(Level::Debug, "m");
        let enricher = Enricher::new();
        let one = enricher.enrich(record.clone(), &snapshot);
        let two = enricher.enrich(record, &snapshot);
        assert_eq!(one, two);
    }

    #[test]
    fn enrich_current_reads_thread_context() {
        Context::reset();
        let _g = context::enter(Fields::new().with("request_id", "r-5"));
        let enriched = Enricher::new().enrich_current(LogRecord::default());
        assert_eq!(text(&enriched, "request_id"), Some("r-5"));
    }
}
