//! Envelope codec: maps typed payloads to and from the wrapper keys the
//! admin API uses per entity and operation.
//!
//! A created group arrives as `{"group": {...}}`, a group policy link as
//! `{"policy_links": [{...}]}`, a dataplane as a bare object. The
//! [`Envelope`] descriptor names which of those shapes a call expects so the
//! repositories never index into raw JSON themselves.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{AdminError, Result};

// ── Descriptor ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope<'a> {
    /// The payload is the whole body.
    None,
    /// `{"<key>": payload}`
    Single(&'a str),
    /// `{"<key>": [payload, ...]}`
    Array(&'a str),
    /// `{"<outer>": {"<inner>": payload}}`
    Nested(&'a str, &'a str),
}

impl<'a> Envelope<'a> {
    /// Parse the textual form: `none`, `single:<key>`, `array:<key>` or
    /// `nested:<outer>.<inner>`.
    pub fn parse(descriptor: &'a str) -> Result<Self> {
        let invalid = || AdminError::InvalidRequest(format!("invalid envelope descriptor '{}'", descriptor));

        if descriptor == "none" {
            return Ok(Envelope::None);
        }
        let (shape, keys) = descriptor.split_once(':').ok_or_else(invalid)?;
        if keys.is_empty() {
            return Err(invalid());
        }
        match shape {
            "single" => Ok(Envelope::Single(keys)),
            "array" => Ok(Envelope::Array(keys)),
            "nested" => match keys.split_once('.') {
                Some((outer, inner)) if !outer.is_empty() && !inner.is_empty() => {
                    Ok(Envelope::Nested(outer, inner))
                }
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Envelope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Envelope::None => write!(f, "none"),
            Envelope::Single(key) => write!(f, "single:{}", key),
            Envelope::Array(key) => write!(f, "array:{}", key),
            Envelope::Nested(outer, inner) => write!(f, "nested:{}.{}", outer, inner),
        }
    }
}

// ── Encode ────────────────────────────────────────────────────

/// Serialize `payload` wrapped according to `envelope`.
pub fn encode<T: Serialize + ?Sized>(payload: &T, envelope: Envelope<'_>) -> Result<Vec<u8>> {
    let value = serde_json::to_value(payload)?;
    let wrapped = match envelope {
        Envelope::None => value,
        Envelope::Single(key) => wrap(key, value),
        Envelope::Array(key) => wrap(key, Value::Array(vec![value])),
        Envelope::Nested(outer, inner) => wrap(outer, wrap(inner, value)),
    };
    Ok(serde_json::to_vec(&wrapped)?)
}

fn wrap(key: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), value);
    Value::Object(map)
}

// ── Decode ────────────────────────────────────────────────────

/// Decode exactly one entity.
///
/// For an [`Envelope::Array`] the array must hold exactly one element; zero or
/// several is a contract violation and fails instead of picking one.
pub fn decode<T: DeserializeOwned>(body: &[u8], envelope: Envelope<'_>) -> Result<T> {
    let inner = unwrap(parse_body(body, envelope)?, envelope)?;
    let value = match (envelope, inner) {
        (Envelope::Array(_), Value::Array(mut items)) => {
            if items.len() != 1 {
                return Err(AdminError::malformed(
                    envelope,
                    format!("expected exactly one element, found {}", items.len()),
                ));
            }
            items.remove(0)
        }
        (Envelope::Array(_), other) => {
            return Err(AdminError::malformed(
                envelope,
                format!("expected an array, found {}", kind_of(&other)),
            ))
        }
        (_, value) => value,
    };
    from_value(value, envelope)
}

/// Decode a list of entities; the unwrapped value must be a JSON array.
pub fn decode_all<T: DeserializeOwned>(body: &[u8], envelope: Envelope<'_>) -> Result<Vec<T>> {
    match unwrap(parse_body(body, envelope)?, envelope)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| from_value(item, envelope))
            .collect(),
        other => Err(AdminError::malformed(
            envelope,
            format!("expected an array, found {}", kind_of(&other)),
        )),
    }
}

/// Unwrap to the raw elements of a list without decoding them.
///
/// A `null` list counts as empty, so callers can check how many elements
/// came back before any of them has to parse.
pub fn elements(body: &[u8], envelope: Envelope<'_>) -> Result<Vec<Value>> {
    let value = parse_body(body, envelope)?;
    let inner = match envelope {
        Envelope::Array(key) => match value {
            Value::Object(mut map) => map
                .remove(key)
                .ok_or_else(|| AdminError::malformed(envelope, format!("missing key '{}'", key)))?,
            other => {
                return Err(AdminError::malformed(
                    envelope,
                    format!("expected an object holding '{}', found {}", key, kind_of(&other)),
                ))
            }
        },
        _ => unwrap(value, envelope)?,
    };
    match inner {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items),
        other => Err(AdminError::malformed(
            envelope,
            format!("expected an array, found {}", kind_of(&other)),
        )),
    }
}

/// Decode one element previously taken out by [`elements`].
pub fn decode_element<T: DeserializeOwned>(value: Value, envelope: Envelope<'_>) -> Result<T> {
    from_value(value, envelope)
}

#[derive(Debug, Default, Deserialize)]
struct Ack {
    #[serde(default)]
    message: Option<String>,
}

/// Decode the acknowledgement returned by update and delete calls.
///
/// The remote answers with `{"message": "..."}`; an empty body is accepted.
pub fn decode_ack(body: &[u8]) -> Result<Option<String>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let ack: Ack = serde_json::from_slice(body)
        .map_err(|e| AdminError::malformed(Envelope::None, format!("invalid acknowledgement: {}", e)))?;
    Ok(ack.message)
}

fn parse_body(body: &[u8], envelope: Envelope<'_>) -> Result<Value> {
    serde_json::from_slice(body)
        .map_err(|e| AdminError::malformed(envelope, format!("body is not valid JSON: {}", e)))
}

fn unwrap(value: Value, envelope: Envelope<'_>) -> Result<Value> {
    match envelope {
        Envelope::None => Ok(value),
        Envelope::Single(key) | Envelope::Array(key) => take_key(value, key, envelope),
        Envelope::Nested(outer, inner) => {
            let outer_value = take_key(value, outer, envelope)?;
            take_key(outer_value, inner, envelope)
        }
    }
}

fn take_key(value: Value, key: &str, envelope: Envelope<'_>) -> Result<Value> {
    let mut map = match value {
        Value::Object(map) => map,
        other => {
            return Err(AdminError::malformed(
                envelope,
                format!("expected an object holding '{}', found {}", key, kind_of(&other)),
            ))
        }
    };
    match map.remove(key) {
        None | Some(Value::Null) => Err(AdminError::malformed(envelope, format!("missing key '{}'", key))),
        Some(inner) => Ok(inner),
    }
}

fn from_value<T: DeserializeOwned>(value: Value, envelope: Envelope<'_>) -> Result<T> {
    serde_json::from_value(value).map_err(|e| AdminError::malformed(envelope, e.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
