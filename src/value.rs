// SPDX-License-Identifier: MIT OR Apache-2.0

//! Values that may be attached to a context frame or a log record.
//!
//! Only primitive kinds are permitted so that every sink can serialize them
//! the same way.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A primitive context value.
///
/// # Examples
///
/// ```
/// use logaware::ContextValue;
///
/// assert_eq!(ContextValue::from("bob"), ContextValue::Str("bob".to_string()));
/// assert_eq!(ContextValue::from(20u16), ContextValue::Int(20));
/// assert_eq!(ContextValue::from(true).to_string(), "true");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ContextValue {
    /// Empty strings are treated as "no value" and are not emitted.
    pub fn is_empty(&self) -> bool {
        matches!(self, ContextValue::Str(s) if s.is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for ContextValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextValue::Bool(b) => write!(f, "{b}"),
            ContextValue::Int(i) => write!(f, "{i}"),
            ContextValue::Float(x) => write!(f, "{x}"),
            ContextValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Str(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Str(value)
    }
}

impl From<&String> for ContextValue {
    fn from(value: &String) -> Self {
        ContextValue::Str(value.clone())
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl From<f32> for ContextValue {
    fn from(value: f32) -> Self {
        ContextValue::Float(f64::from(value))
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Float(value)
    }
}

macro_rules! from_lossless_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ContextValue {
                fn from(value: $t) -> Self {
                    ContextValue::Int(i64::from(value))
                }
            }
        )*
    };
}
from_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

// Values past i64::MAX keep their digits as a string.
macro_rules! from_wide_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ContextValue {
                fn from(value: $t) -> Self {
                    i64::try_from(value)
                        .map(ContextValue::Int)
                        .unwrap_or_else(|_| ContextValue::Str(value.to_string()))
                }
            }
        )*
    };
}
from_wide_int!(u64, usize, isize, i128, u128);

/// Conversion used by the logging and scope macros.
///
/// Every type convertible into a [`ContextValue`] is accepted, and so is an
/// `Option` of one; `None` means the key is left out entirely.
pub trait IntoFieldValue {
    fn into_field_value(self) -> Option<ContextValue>;
}

impl IntoFieldValue for ContextValue {
    fn into_field_value(self) -> Option<ContextValue> {
        Some(self)
    }
}

impl IntoFieldValue for Option<ContextValue> {
    fn into_field_value(self) -> Option<ContextValue> {
        self
    }
}

macro_rules! into_field_value {
    ($($t:ty),*) => {
        $(
            impl IntoFieldValue for $t {
                #[inline]
                fn into_field_value(self) -> Option<ContextValue> {
                    Some(self.into())
                }
            }
            impl IntoFieldValue for Option<$t> {
                #[inline]
                fn into_field_value(self) -> Option<ContextValue> {
                    self.map(Into::into)
                }
            }
        )*
    };
}
into_field_value!(
    &str, String, &String, bool, f32, f64, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize,
    i128, u128
);
