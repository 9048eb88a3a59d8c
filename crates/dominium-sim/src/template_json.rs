//! Minimal recursive-descent reader for the flat `key=value`/array shapes a
//! world template file needs.
//!
//! Not a general JSON library surface: no escape sequences beyond `\"` and
//! `\\`, no unicode code points, no distinguishing int from float (numbers
//! parse as `f64` and truncate where an integer is expected). Template files
//! are hand-authored fixtures, not an interchange format, so this is
//! sufficient for the object/array/number/string shapes they use.

use std::collections::BTreeMap;
use std::fmt;

/// A parsed template value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null`.
    Null,
    /// `true`/`false`.
    Bool(bool),
    /// Any numeric literal, parsed as `f64`.
    Number(f64),
    /// A double-quoted string.
    String(String),
    /// `[...]`.
    Array(Vec<Value>),
    /// `{...}`, insertion order not preserved (keys are sorted).
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the value as an `i64`, truncating a `Number`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n as i64),
            _ => None,
        }
    }

    /// Returns the value as a `u32`, truncating a `Number`.
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        self.as_i64().and_then(|n| u32::try_from(n).ok())
    }

    /// Returns the value as a `&str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the value as a slice of array elements.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Looks up `key` if this value is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }
}

/// A parse failure, with a byte offset into the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Byte offset into the input where the failure was detected.
    pub offset: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.offset)
    }
}

/// Parses `text` into a single [`Value`], per this module's minimal grammar.
///
/// # Errors
/// Returns [`ParseError`] on any malformed token, unterminated string, or
/// trailing non-whitespace content after the top-level value.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    skip_ws(bytes, &mut pos);
    let value = parse_value(bytes, &mut pos)?;
    skip_ws(bytes, &mut pos);
    if pos != bytes.len() {
        return Err(ParseError {
            message: "trailing content after top-level value".to_string(),
            offset: pos,
        });
    }
    Ok(value)
}

fn skip_ws(bytes: &[u8], pos: &mut usize) {
    while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
}

fn parse_value(bytes: &[u8], pos: &mut usize) -> Result<Value, ParseError> {
    skip_ws(bytes, pos);
    match bytes.get(*pos) {
        Some(b'{') => parse_object(bytes, pos),
        Some(b'[') => parse_array(bytes, pos),
        Some(b'"') => parse_string(bytes, pos).map(Value::String),
        Some(b't') => parse_literal(bytes, pos, "true", Value::Bool(true)),
        Some(b'f') => parse_literal(bytes, pos, "false", Value::Bool(false)),
        Some(b'n') => parse_literal(bytes, pos, "null", Value::Null),
        Some(c) if c.is_ascii_digit() || *c == b'-' => parse_number(bytes, pos),
        _ => Err(ParseError {
            message: "expected a value".to_string(),
            offset: *pos,
        }),
    }
}

fn parse_literal(bytes: &[u8], pos: &mut usize, literal: &str, value: Value) -> Result<Value, ParseError> {
    let end = *pos + literal.len();
    if bytes.get(*pos..end) == Some(literal.as_bytes()) {
        *pos = end;
        Ok(value)
    } else {
        Err(ParseError {
            message: format!("expected `{literal}`"),
            offset: *pos,
        })
    }
}

fn parse_object(bytes: &[u8], pos: &mut usize) -> Result<Value, ParseError> {
    *pos += 1; // `{`
    let mut map = BTreeMap::new();
    skip_ws(bytes, pos);
    if bytes.get(*pos) == Some(&b'}') {
        *pos += 1;
        return Ok(Value::Object(map));
    }
    loop {
        skip_ws(bytes, pos);
        let key = parse_string(bytes, pos)?;
        skip_ws(bytes, pos);
        if bytes.get(*pos) != Some(&b':') {
            return Err(ParseError {
                message: "expected `:` after object key".to_string(),
                offset: *pos,
            });
        }
        *pos += 1;
        let value = parse_value(bytes, pos)?;
        map.insert(key, value);
        skip_ws(bytes, pos);
        match bytes.get(*pos) {
            Some(b',') => {
                *pos += 1;
            }
            Some(b'}') => {
                *pos += 1;
                break;
            }
            _ => {
                return Err(ParseError {
                    message: "expected `,` or `}` in object".to_string(),
                    offset: *pos,
                })
            }
        }
    }
    Ok(Value::Object(map))
}

fn parse_array(bytes: &[u8], pos: &mut usize) -> Result<Value, ParseError> {
    *pos += 1; // `[`
    let mut items = Vec::new();
    skip_ws(bytes, pos);
    if bytes.get(*pos) == Some(&b']') {
        *pos += 1;
        return Ok(Value::Array(items));
    }
    loop {
        items.push(parse_value(bytes, pos)?);
        skip_ws(bytes, pos);
        match bytes.get(*pos) {
            Some(b',') => {
                *pos += 1;
            }
            Some(b']') => {
                *pos += 1;
                break;
            }
            _ => {
                return Err(ParseError {
                    message: "expected `,` or `]` in array".to_string(),
                    offset: *pos,
                })
            }
        }
    }
    Ok(Value::Array(items))
}

fn parse_string(bytes: &[u8], pos: &mut usize) -> Result<String, ParseError> {
    if bytes.get(*pos) != Some(&b'"') {
        return Err(ParseError {
            message: "expected `\"`".to_string(),
            offset: *pos,
        });
    }
    *pos += 1;
    let mut out = String::new();
    loop {
        match bytes.get(*pos) {
            Some(b'"') => {
                *pos += 1;
                return Ok(out);
            }
            Some(b'\\') => {
                *pos += 1;
                match bytes.get(*pos) {
                    Some(b'"') => out.push('"'),
                    Some(b'\\') => out.push('\\'),
                    Some(b'n') => out.push('\n'),
                    Some(b't') => out.push('\t'),
                    _ => {
                        return Err(ParseError {
                            message: "unsupported escape sequence".to_string(),
                            offset: *pos,
                        })
                    }
                }
                *pos += 1;
            }
            Some(&c) => {
                out.push(c as char);
                *pos += 1;
            }
            None => {
                return Err(ParseError {
                    message: "unterminated string".to_string(),
                    offset: *pos,
                })
            }
        }
    }
}

fn parse_number(bytes: &[u8], pos: &mut usize) -> Result<Value, ParseError> {
    let start = *pos;
    if bytes.get(*pos) == Some(&b'-') {
        *pos += 1;
    }
    while bytes
        .get(*pos)
        .is_some_and(|c| c.is_ascii_digit() || *c == b'.')
    {
        *pos += 1;
    }
    let text = std::str::from_utf8(&bytes[start..*pos]).unwrap_or_default();
    text.parse::<f64>().map(Value::Number).map_err(|_| ParseError {
        message: "malformed number".to_string(),
        offset: start,
    })
}
