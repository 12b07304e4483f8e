// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for [`AwareLogger`](crate::AwareLogger) and
//! [`Enricher`](crate::Enricher).
//!
//! A [`Config`] can be built in code, parsed from JSON, or read from the
//! environment:
//!
//! ```rust
//! use logaware::{Config, Level};
//!
//! let config = Config::from_json_str(r#"{"min_level": "warning", "prefix": "context."}"#).unwrap();
//! assert_eq!(config.min_level, Level::Warning);
//! assert_eq!(config.prefix, "context.");
//! assert!(config.is_reserved("message"));
//! ```

use crate::Level;
use crate::error::{LogError, LogResult};
use crate::log_record::CORE_FIELD_NAMES;
use serde::Deserialize;

/// Environment variable holding the minimum level, e.g. `LOGAWARE_LEVEL=warning`.
pub const LEVEL_ENV: &str = "LOGAWARE_LEVEL";
/// Environment variable holding the prefix for reserved context keys.
pub const PREFIX_ENV: &str = "LOGAWARE_CONTEXT_PREFIX";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Records below this level are not built at all.
    pub min_level: Level,
    /// Context keys that would collide with core record fields.
    pub reserved: Vec<String>,
    /// Prepended to a reserved context key when it is merged into a record.
    pub prefix: String,
    /// Whether empty string values are left out of records.
    pub skip_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_level: Level::Debug,
            reserved: CORE_FIELD_NAMES.iter().map(|s| s.to_string()).collect(),
            prefix: "ctx_".to_string(),
            skip_empty: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Adds a name to the reserved set.
    pub fn with_reserved(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.reserved.contains(&name) {
            self.reserved.push(name);
        }
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_skip_empty(mut self, skip_empty: bool) -> Self {
        self.skip_empty = skip_empty;
        self
    }

    pub fn is_reserved(&self, key: &str) -> bool {
        self.reserved.iter().any(|r| r == key)
    }

    /// Parses a JSON object.  Omitted members keep their defaults.
    pub fn from_json_str(json: &str) -> LogResult<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| LogError::Config(e.to_string()))?;
        config.validate()
    }

    /// Defaults, overridden by [`LEVEL_ENV`] and [`PREFIX_ENV`] when set.
    pub fn from_env() -> LogResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LogResult<Self> {
        let mut config = Config::default();
        if let Some(level) = lookup(LEVEL_ENV) {
            config.min_level = level.parse()?;
        }
        if let Some(prefix) = lookup(PREFIX_ENV) {
            config.prefix = prefix;
        }
        config.validate()
    }

    fn validate(self) -> LogResult<Self> {
        if self.prefix.is_empty() && !self.reserved.is_empty() {
            return Err(LogError::Config(
                "prefix must not be empty while reserved names are configured".to_string(),
            ));
        }
        Ok(self)
    }
}
