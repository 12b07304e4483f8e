// SPDX-License-Identifier: MIT OR Apache-2.0

//! `{key}` message templates.
//!
//! Log messages are written as templates whose placeholders name fields of
//! the same call:
//!
//! ```
//! use logaware::{Fields, format::render};
//!
//! let fields = Fields::new().with("user", "bob").with("id", 20);
//! let message = render("User {user} ({id}) logged in", &fields).unwrap();
//! assert_eq!(message, "User bob (20) logged in");
//! ```
//!
//! `{{` and `}}` produce literal braces.  A template with no placeholders is
//! returned unchanged, regardless of the fields supplied.
//!
//! # Format specs
//!
//! A placeholder may carry a spec after a colon,
//! `{key:[[fill]align][+][0][width][.precision][type]}`:
//!
//! | part        | meaning                                                    |
//! |-------------|------------------------------------------------------------|
//! | `align`     | `<` left, `>` right, `^` center; numbers default to right  |
//! | `+`         | sign on non-negative numbers                               |
//! | `0`         | zero padding after the sign, numbers only                  |
//! | `precision` | digits after the point for floats, max chars for strings   |
//! | `type`      | `s` string, `d` integer, `f` fixed-point float             |
//!
//! ```
//! use logaware::{Fields, format::render};
//!
//! let fields = Fields::new().with("id", 7).with("ratio", 0.5).with("name", "bob");
//! assert_eq!(
//!     render("[{id:03d}] [{ratio:.2f}] [{name:*^7}]", &fields).unwrap(),
//!     "[007] [0.50] [**bob**]"
//! );
//! ```
//!
//! A spec that does not fit the value, such as `{name:d}` on a string, is a
//! [`FormatError::SpecMismatch`].

use crate::error::FormatError;
use crate::fields::Fields;
use crate::value::ContextValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spec {
    fill: char,
    align: Option<Align>,
    plus: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
    kind: Option<char>,
}

impl Default for Spec {
    fn default() -> Self {
        Spec {
            fill: ' ',
            align: None,
            plus: false,
            zero: false,
            width: 0,
            precision: None,
            kind: None,
        }
    }
}

fn align_of(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        _ => None,
    }
}

fn digits(chars: &[char], i: &mut usize) -> Option<usize> {
    let start = *i;
    while chars.get(*i).is_some_and(char::is_ascii_digit) {
        *i += 1;
    }
    if *i == start {
        return None;
    }
    chars[start..*i].iter().collect::<String>().parse().ok()
}

impl Spec {
    fn parse(raw: &str) -> Option<Spec> {
        let chars: Vec<char> = raw.chars().collect();
        let mut spec = Spec::default();
        let mut i = 0;
        if let Some(align) = chars.get(1).copied().and_then(align_of) {
            spec.fill = chars[0];
            spec.align = Some(align);
            i = 2;
        } else if let Some(align) = chars.first().copied().and_then(align_of) {
            spec.align = Some(align);
            i = 1;
        }
        if chars.get(i) == Some(&'+') {
            spec.plus = true;
            i += 1;
        }
        if chars.get(i) == Some(&'0') {
            spec.zero = true;
            i += 1;
        }
        spec.width = digits(&chars, &mut i).unwrap_or(0);
        if chars.get(i) == Some(&'.') {
            i += 1;
            spec.precision = Some(digits(&chars, &mut i)?);
        }
        if let Some(&kind @ ('s' | 'd' | 'f')) = chars.get(i) {
            spec.kind = Some(kind);
            i += 1;
        }
        (i == chars.len()).then_some(spec)
    }

    /// Renders `value`, or `None` when the spec does not apply to it.
    fn apply(&self, value: &ContextValue) -> Option<String> {
        let (body, numeric) = match (self.kind, value) {
            (None | Some('s'), ContextValue::Str(s)) => match self.precision {
                Some(p) => (s.chars().take(p).collect(), false),
                None => (s.clone(), false),
            },
            (None, ContextValue::Bool(b)) if self.precision.is_none() => (b.to_string(), false),
            (None | Some('d'), ContextValue::Int(i)) if self.precision.is_none() => {
                (i.to_string(), true)
            }
            (Some('d'), ContextValue::Bool(b)) if self.precision.is_none() => {
                (i64::from(*b).to_string(), true)
            }
            (None, ContextValue::Float(x)) => match self.precision {
                Some(p) => (format!("{x:.p$}"), true),
                None => (x.to_string(), true),
            },
            (Some('f'), ContextValue::Float(x)) => {
                (format!("{x:.p$}", p = self.precision.unwrap_or(6)), true)
            }
            (Some('f'), ContextValue::Int(i)) => {
                (format!("{:.p$}", *i as f64, p = self.precision.unwrap_or(6)), true)
            }
            _ => return None,
        };
        if !numeric && (self.plus || self.zero) {
            return None;
        }
        let body = if self.plus && !body.starts_with('-') {
            format!("+{body}")
        } else {
            body
        };
        Some(self.pad(body, numeric))
    }

    fn pad(&self, body: String, numeric: bool) -> String {
        let len = body.chars().count();
        if len >= self.width {
            return body;
        }
        let missing = self.width - len;
        if self.zero && self.align.is_none() {
            let digits_at = usize::from(body.starts_with(['-', '+']));
            let (sign, rest) = body.split_at(digits_at);
            return format!("{sign}{}{rest}", "0".repeat(missing));
        }
        let fill = if self.zero && self.fill == ' ' { '0' } else { self.fill };
        let align = self
            .align
            .unwrap_or(if numeric { Align::Right } else { Align::Left });
        let (left, right) = match align {
            Align::Left => (0, missing),
            Align::Right => (missing, 0),
            Align::Center => (missing / 2, missing - missing / 2),
        };
        let fill = fill.to_string();
        format!("{}{body}{}", fill.repeat(left), fill.repeat(right))
    }
}

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Key(&'a str),
    Formatted { key: &'a str, raw: &'a str, spec: Spec },
}

fn parse(template: &str) -> Result<Vec<Piece<'_>>, FormatError> {
    let mut pieces = Vec::new();
    let bytes = template.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                pieces.push(Piece::Literal(&template[literal_start..=i]));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                if literal_start < i {
                    pieces.push(Piece::Literal(&template[literal_start..i]));
                }
                let close = template[i + 1..]
                    .find('}')
                    .map(|off| i + 1 + off)
                    .ok_or(FormatError::UnclosedBrace(i))?;
                let inner = &template[i + 1..close];
                let (key, raw) = match inner.split_once(':') {
                    Some((key, raw)) => (key.trim(), Some(raw)),
                    None => (inner.trim(), None),
                };
                if key.is_empty() {
                    return Err(FormatError::EmptyPlaceholder(i));
                }
                pieces.push(match raw {
                    None => Piece::Key(key),
                    Some(raw) => {
                        let spec = Spec::parse(raw).ok_or_else(|| FormatError::InvalidSpec {
                            key: key.to_string(),
                            spec: raw.to_string(),
                        })?;
                        Piece::Formatted { key, raw, spec }
                    }
                });
                i = close + 1;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                pieces.push(Piece::Literal(&template[literal_start..=i]));
                i += 2;
                literal_start = i;
            }
            b'}' => return Err(FormatError::UnmatchedCloseBrace(i)),
            _ => i += 1,
        }
    }
    if literal_start < template.len() {
        pieces.push(Piece::Literal(&template[literal_start..]));
    }
    Ok(pieces)
}

fn lookup<'f>(fields: &'f Fields, key: &str) -> Result<&'f ContextValue, FormatError> {
    fields
        .get(key)
        .ok_or_else(|| FormatError::UnknownKey(key.to_string()))
}

/// Substitutes every `{key}` in `template` with the matching value of `fields`.
pub fn render(template: &str, fields: &Fields) -> Result<String, FormatError> {
    let pieces = parse(template)?;
    let mut out = String::with_capacity(template.len());
    for piece in pieces {
        match piece {
            Piece::Literal(s) => out.push_str(s),
            Piece::Key(key) => out.push_str(&lookup(fields, key)?.to_string()),
            Piece::Formatted { key, raw, spec } => {
                let value = lookup(fields, key)?;
                let text = spec.apply(value).ok_or_else(|| FormatError::SpecMismatch {
                    key: key.to_string(),
                    spec: raw.to_string(),
                })?;
                out.push_str(&text);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(render("nothing here", &Fields::new()).unwrap(), "nothing here");
    }

    #[test]
    fn escapes_produce_literal_braces() {
        let fields = Fields::new().with("n", 3);
        assert_eq!(render("{{n}} is {n}", &fields).unwrap(), "{n} is 3");
        assert_eq!(render("}}{{", &fields).unwrap(), "}{");
    }

    #[test]
    fn unknown_key_is_reported() {
        let err = render("Hello {missing}!", &Fields::new().with("provided", 1)).unwrap_err();
        assert_eq!(err, FormatError::UnknownKey("missing".to_string()));
    }

    #[test]
    fn malformed_templates_are_reported() {
        let fields = Fields::new();
        assert_eq!(render("a {b", &fields), Err(FormatError::UnclosedBrace(2)));
        assert_eq!(render("a } b", &fields), Err(FormatError::UnmatchedCloseBrace(2)));
        assert_eq!(render("a {} b", &fields), Err(FormatError::EmptyPlaceholder(2)));
        assert_eq!(render("a {:d} b", &fields), Err(FormatError::EmptyPlaceholder(2)));
    }

    #[test]
    fn multibyte_text_around_placeholders() {
        let fields = Fields::new().with("user", "fӫӫ");
        assert_eq!(
            render("ユーザー {user} ログイン", &fields).unwrap(),
            "ユーザー fӫӫ ログイン"
        );
    }

    #[test]
    fn integer_type_spec() {
        let fields = Fields::new().with("foo", 1).with("neg", -42);
        assert_eq!(render("args {foo:d}", &fields).unwrap(), "args 1");
        assert_eq!(render("[{foo:4d}]", &fields).unwrap(), "[   1]");
        assert_eq!(render("[{neg:06d}]", &fields).unwrap(), "[-00042]");
        assert_eq!(render("[{foo:+d}]", &fields).unwrap(), "[+1]");
        assert_eq!(render("[{foo:<3}]", &fields).unwrap(), "[1  ]");
    }

    #[test]
    fn float_precision_and_width() {
        let fields = Fields::new().with("x", 3.14159).with("n", 2);
        assert_eq!(render("{x:.2f}", &fields).unwrap(), "3.14");
        assert_eq!(render("{x:8.3f}", &fields).unwrap(), "   3.142");
        assert_eq!(render("{x:.1}", &fields).unwrap(), "3.1");
        assert_eq!(render("{n:.1f}", &fields).unwrap(), "2.0");
        assert_eq!(render("{n:f}", &fields).unwrap(), "2.000000");
    }

    #[test]
    fn string_alignment_fill_and_truncation() {
        let fields = Fields::new().with("name", "bob");
        assert_eq!(render("[{name:6}]", &fields).unwrap(), "[bob   ]");
        assert_eq!(render("[{name:>6}]", &fields).unwrap(), "[   bob]");
        assert_eq!(render("[{name:-^8}]", &fields).unwrap(), "[--bob---]");
        assert_eq!(render("[{name:.2}]", &fields).unwrap(), "[bo]");
        assert_eq!(render("[{name:s}]", &fields).unwrap(), "[bob]");
    }

    #[test]
    fn spec_that_does_not_fit_the_value() {
        let fields = Fields::new().with("foo", "a").with("n", 1).with("x", 1.5);
        let mismatch = |key: &str, spec: &str| FormatError::SpecMismatch {
            key: key.to_string(),
            spec: spec.to_string(),
        };
        assert_eq!(render("Some args {foo:d}", &fields), Err(mismatch("foo", "d")));
        assert_eq!(render("{n:s}", &fields), Err(mismatch("n", "s")));
        assert_eq!(render("{x:d}", &fields), Err(mismatch("x", "d")));
        assert_eq!(render("{n:.2}", &fields), Err(mismatch("n", ".2")));
        assert_eq!(render("{foo:05}", &fields), Err(mismatch("foo", "05")));
    }

    #[test]
    fn unparseable_spec_is_reported() {
        let fields = Fields::new().with("n", 1);
        assert_eq!(
            render("{n:q}", &fields),
            Err(FormatError::InvalidSpec {
                key: "n".to_string(),
                spec: "q".to_string()
            })
        );
        assert!(matches!(render("{n:.}", &fields), Err(FormatError::InvalidSpec { .. })));
    }
}
