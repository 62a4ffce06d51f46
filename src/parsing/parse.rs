//! Coercion of untyped values into declared shapes.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::parsing::schema::{Kind, Schema};
use crate::parsing::value::{str_to_bool, Value};

/// Error raised when a value cannot be coerced into its declared shape.
///
/// Always propagates unchanged to the immediate caller; at the request
/// boundary it becomes a 400-class error carrying this message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("'{value}' is not {expected}")]
    WrongType { value: String, expected: &'static str },

    #[error("cannot parse '{value}' into {expected}")]
    Unparseable { value: String, expected: &'static str },

    #[error("invalid truth value '{0}'")]
    InvalidTruthValue(String),

    #[error("missing required argument '{0}'")]
    MissingArgument(String),

    #[error("field '{0}' has no declared kind")]
    UntypedField(String),

    #[error("unable to parse '{0}'")]
    Unsupported(String),
}

/// A target shape of the structural parser.
///
/// Implementors register their field table as [`Schema`] and construct
/// themselves from the coerced field map. `from_parsed` runs after
/// validation, so its error arm only fires on a schema/constructor
/// mismatch, which is a programming error surfaced in tests.
pub trait Structured: Sized {
    const SCHEMA: &'static Schema;

    fn from_parsed(fields: &BTreeMap<String, Value>) -> Result<Self, ParseError>;
}

/// Parse an untyped value into an instance of `T`.
pub fn parse<T: Structured>(raw: &Value, strict: bool) -> Result<T, ParseError> {
    let fields = coerce_fields(T::SCHEMA, raw, strict)?;
    T::from_parsed(&fields)
}

/// Parse a flat query-argument map (already reduced to last-value-wins)
/// into an instance of `T`, non-strict.
pub fn parse_request_args<T: Structured>(
    args: &BTreeMap<String, String>,
) -> Result<T, ParseError> {
    let map: BTreeMap<String, Value> = args
        .iter()
        .map(|(key, value)| (key.clone(), Value::Str(value.clone())))
        .collect();
    parse(&Value::Map(map), false)
}

/// Coerce a raw value into the given declared kind.
pub fn coerce(kind: &Kind, raw: &Value, strict: bool) -> Result<Value, ParseError> {
    match kind {
        Kind::Optional(inner) => {
            if raw.is_null() {
                Ok(Value::Null)
            } else {
                coerce(inner, raw, strict)
            }
        }
        Kind::List(inner) => match raw {
            // atomic: the first failing element fails the whole list
            Value::List(items) => Ok(Value::List(
                items
                    .iter()
                    .map(|item| coerce(inner, item, strict))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            other => Err(ParseError::Unparseable {
                value: other.to_string(),
                expected: "a sequence",
            }),
        },
        Kind::Bool => coerce_bool(raw, strict).map(Value::Bool),
        Kind::Str => coerce_str(raw, strict).map(Value::Str),
        Kind::Int => coerce_int(raw, strict).map(Value::Int),
        Kind::Float => coerce_float(raw, strict).map(Value::Float),
        Kind::Nested(schema) => Ok(Value::Map(coerce_fields(schema, raw, strict)?)),
        Kind::Untyped => {
            if strict {
                Err(ParseError::Unsupported(raw.to_string()))
            } else {
                Ok(raw.clone())
            }
        }
    }
}

fn coerce_bool(raw: &Value, strict: bool) -> Result<bool, ParseError> {
    if let Value::Bool(b) = raw {
        return Ok(*b);
    }
    if strict {
        return Err(ParseError::WrongType {
            value: raw.to_string(),
            expected: "bool",
        });
    }
    match raw {
        Value::Int(0) => Ok(false),
        Value::Int(1) => Ok(true),
        Value::Str(s) => {
            str_to_bool(s, None).ok_or_else(|| ParseError::InvalidTruthValue(s.clone()))
        }
        other => Err(ParseError::Unparseable {
            value: other.to_string(),
            expected: "bool",
        }),
    }
}

fn coerce_str(raw: &Value, strict: bool) -> Result<String, ParseError> {
    if let Value::Str(s) = raw {
        return Ok(s.clone());
    }
    if strict {
        return Err(ParseError::WrongType {
            value: raw.to_string(),
            expected: "str",
        });
    }
    Ok(raw.to_string())
}

fn coerce_int(raw: &Value, strict: bool) -> Result<i64, ParseError> {
    match raw {
        Value::Int(i) => return Ok(*i),
        Value::Float(f) if f.fract() == 0.0 => return Ok(*f as i64),
        _ => {}
    }
    if strict {
        return Err(ParseError::WrongType {
            value: raw.to_string(),
            expected: "a number",
        });
    }
    match raw {
        Value::Str(s) => parse_int_literal(s).ok_or_else(|| ParseError::Unparseable {
            value: s.clone(),
            expected: "int",
        }),
        Value::Bool(b) => Ok(i64::from(*b)),
        other => Err(ParseError::Unparseable {
            value: other.to_string(),
            expected: "int",
        }),
    }
}

fn coerce_float(raw: &Value, strict: bool) -> Result<f64, ParseError> {
    match raw {
        Value::Float(f) => return Ok(*f),
        Value::Int(i) => return Ok(*i as f64),
        _ => {}
    }
    if strict {
        return Err(ParseError::WrongType {
            value: raw.to_string(),
            expected: "a number",
        });
    }
    match raw {
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::Unparseable {
                value: s.clone(),
                expected: "float",
            }),
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        other => Err(ParseError::Unparseable {
            value: other.to_string(),
            expected: "float",
        }),
    }
}

/// Parse an integer literal with the standard base prefixes
/// (`0x`, `0o`, `0b`), an optional sign, and `_` digit separators.
fn parse_int_literal(input: &str) -> Option<i64> {
    let cleaned = input.trim().replace('_', "");
    let (negative, rest) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    let (radix, digits) = if let Some(hex) = rest.strip_prefix("0x").or(rest.strip_prefix("0X")) {
        (16, hex)
    } else if let Some(oct) = rest.strip_prefix("0o").or(rest.strip_prefix("0O")) {
        (8, oct)
    } else if let Some(bin) = rest.strip_prefix("0b").or(rest.strip_prefix("0B")) {
        (2, bin)
    } else {
        (10, rest)
    };

    if digits.is_empty() {
        return None;
    }

    i64::from_str_radix(digits, radix)
        .ok()
        .map(|n| if negative { -n } else { n })
}

/// Resolve every declared field of `schema` against the raw mapping,
/// applying defaults and coercing present values recursively.
fn coerce_fields(
    schema: &Schema,
    raw: &Value,
    strict: bool,
) -> Result<BTreeMap<String, Value>, ParseError> {
    let map = raw.as_map().ok_or_else(|| ParseError::Unparseable {
        value: raw.to_string(),
        expected: schema.name,
    })?;

    let mut fields = BTreeMap::new();
    for field in schema.fields {
        let value = match map.get(field.name) {
            None => match field.default {
                Some(default) => default.to_value(),
                None => return Err(ParseError::MissingArgument(field.name.to_string())),
            },
            Some(value) => match field.kind {
                Kind::Untyped if strict => {
                    return Err(ParseError::UntypedField(field.name.to_string()))
                }
                Kind::Untyped => value.clone(),
                ref kind => coerce(kind, value, strict)?,
            },
        };
        fields.insert(field.name.to_string(), value);
    }
    Ok(fields)
}

// Accessors used by Structured::from_parsed implementations. The coerced
// map is guaranteed to hold the declared shape, so a miss here means the
// schema and the constructor disagree.

pub fn field_bool(fields: &BTreeMap<String, Value>, name: &str) -> Result<bool, ParseError> {
    fields
        .get(name)
        .and_then(Value::as_bool)
        .ok_or_else(|| ParseError::MissingArgument(name.to_string()))
}

pub fn field_int(fields: &BTreeMap<String, Value>, name: &str) -> Result<i64, ParseError> {
    fields
        .get(name)
        .and_then(Value::as_int)
        .ok_or_else(|| ParseError::MissingArgument(name.to_string()))
}

pub fn field_float(fields: &BTreeMap<String, Value>, name: &str) -> Result<f64, ParseError> {
    fields
        .get(name)
        .and_then(Value::as_float)
        .ok_or_else(|| ParseError::MissingArgument(name.to_string()))
}

pub fn field_str(fields: &BTreeMap<String, Value>, name: &str) -> Result<String, ParseError> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ParseError::MissingArgument(name.to_string()))
}

pub fn field_opt_str(
    fields: &BTreeMap<String, Value>,
    name: &str,
) -> Result<Option<String>, ParseError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Str(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ParseError::WrongType {
            value: other.to_string(),
            expected: "str",
        }),
    }
}

pub fn field_opt_float(
    fields: &BTreeMap<String, Value>,
    name: &str,
) -> Result<Option<f64>, ParseError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Float(f)) => Ok(Some(*f)),
        Some(other) => Err(ParseError::WrongType {
            value: other.to_string(),
            expected: "float",
        }),
    }
}
