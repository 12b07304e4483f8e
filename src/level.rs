// SPDX-License-Identifier: MIT OR Apache-2.0
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Severity of a log record.
///
/// Numeric values follow the conventional 10/20/30/40/50 ladder so that levels
/// can be compared with thresholds configured from the environment.  Levels
/// order by value, so an application can slot its own levels in between:
///
/// ```rust
/// use logaware::{AwareLogger, InMemoryLogger, Level};
/// use std::sync::Arc;
///
/// const AUDIT: Level = Level::custom(42, "AUDIT");
///
/// let memory = Arc::new(InMemoryLogger::new());
/// let log = AwareLogger::new()
///     .with_min_level(Level::Error)
///     .with_logger(memory.clone());
/// logaware::log!(log, AUDIT, "password changed");
/// assert_eq!(memory.drain_logs(), format!("AUDIT {}:password changed", module_path!()));
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default)]
pub enum Level {
    /// Print-style debugging
    #[default]
    Debug,
    /// Normal operation
    Info,
    /// Suspicious condition
    Warning,
    /// Runtime error
    Error,
    /// The application cannot continue
    Critical,
    /// An application-defined level.  An empty name displays as `Level <value>`.
    Custom(u8, &'static str),
}

const BUILTIN: [Level; 5] = [
    Level::Debug,
    Level::Info,
    Level::Warning,
    Level::Error,
    Level::Critical,
];

impl Level {
    pub const fn custom(value: u8, name: &'static str) -> Level {
        Level::Custom(value, name)
    }

    /// The built-in level with `value`, or an unnamed custom level.
    pub fn from_value(value: u8) -> Level {
        BUILTIN
            .into_iter()
            .find(|l| l.value() == value)
            .unwrap_or(Level::Custom(value, ""))
    }

    pub const fn value(self) -> u8 {
        match self {
            Level::Debug => 10,
            Level::Info => 20,
            Level::Warning => 30,
            Level::Error => 40,
            Level::Critical => 50,
            Level::Custom(value, _) => value,
        }
    }

    pub fn name(self) -> Cow<'static, str> {
        match self {
            Level::Debug => Cow::Borrowed("DEBUG"),
            Level::Info => Cow::Borrowed("INFO"),
            Level::Warning => Cow::Borrowed("WARNING"),
            Level::Error => Cow::Borrowed("ERROR"),
            Level::Critical => Cow::Borrowed("CRITICAL"),
            Level::Custom(value, "") => Cow::Owned(format!("Level {value}")),
            Level::Custom(_, name) => Cow::Borrowed(name),
        }
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Level {}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// By value, then by name.
impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value()
            .cmp(&other.value())
            .then_with(|| self.name().cmp(&other.name()))
    }
}

impl Hash for Level {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value().hash(state);
        self.name().hash(state);
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

/// Accepts level names in any case (`warn` and `fatal` included) and
/// numeric values.
impl FromStr for Level {
    type Err = crate::LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "FATAL" | "CRITICAL" => Ok(Level::Critical),
            _ => s
                .parse::<u8>()
                .map(Level::from_value)
                .map_err(|_| crate::LogError::Config(format!("unknown level `{s}`"))),
        }
    }
}

/// Lowercase name, e.g. `"warning"`.
impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name().to_ascii_lowercase())
    }
}

/// Same spellings as [`FromStr`], or a bare number.
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelVisitor;

        impl Visitor<'_> for LevelVisitor {
            type Value = Level;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a level name or a number from 0 to 255")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Level, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Level, E> {
                u8::try_from(v)
                    .map(Level::from_value)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::Level;

    #[test]
    fn ordering_follows_value() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Error < Level::Critical);
        assert_eq!(Level::Warning.value(), 30);
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("warn".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!(" Fatal ".parse::<Level>().unwrap(), Level::Critical);
        assert_eq!("20".parse::<Level>().unwrap(), Level::Info);
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn custom_levels_slot_in_by_value() {
        let blerg = Level::custom(42, "BLERG");
        assert!(Level::Error < blerg && blerg < Level::Critical);
        assert_eq!(blerg.to_string(), "BLERG");
        assert_eq!(Level::from_value(20), Level::Info);
        assert_eq!(Level::from_value(42).to_string(), "Level 42");
        assert_eq!(Level::custom(20, "INFO"), Level::Info);
        assert_ne!(Level::custom(20, "NOTICE"), Level::Info);
    }

    #[test]
    fn serde_agrees_with_from_str() {
        for text in ["\"WARNING\"", "\"warning\"", "\"Warn\"", "30"] {
            let level: Level = serde_json::from_str(text).unwrap();
            assert_eq!(level, Level::Warning, "{text}");
        }
        assert!(serde_json::from_str::<Level>("\"loud\"").is_err());
        assert!(serde_json::from_str::<Level>("300").is_err());
        assert_eq!(serde_json::to_string(&Level::custom(42, "BLERG")).unwrap(), "\"blerg\"");
        assert_eq!(serde_json::to_string(&Level::Info).unwrap(), "\"info\"");
    }
}
