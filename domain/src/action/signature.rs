//! Canonical action signatures.
//!
//! A [`Signature`] is the `(name, normalized arguments)` pair that drives
//! in-round deduplication and cross-round convergence detection. Every raw
//! request passes through [`Signature::canonicalize`] exactly once, before
//! any gate, repair or execution decision is made.
//!
//! # Canonical form
//!
//! - String-encoded arguments are parsed as JSON; an empty or
//!   whitespace-only string means `{}`. `null` also means `{}`.
//! - The parsed value must be a JSON object.
//! - Object keys are sorted (recursively), insignificant whitespace is
//!   dropped, and floats with no fractional part that fit in an `i64` are
//!   written as integers (`1.0` and `1` are the same argument).
//! - Array order and string contents are preserved as-is.

use super::entities::{ActionRequest, RawArguments};
use crate::core::error::ArgumentError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Write as _;

/// Canonical identity of an action request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature {
    name: String,
    arguments: String,
}

impl Signature {
    /// Normalize a request into its signature and parsed argument object.
    ///
    /// The returned value is what the action is invoked with; the signature
    /// is what the run state remembers.
    pub fn canonicalize(request: &ActionRequest) -> Result<(Self, Value), ArgumentError> {
        let value = parse_arguments(&request.raw_arguments)?;
        let mut arguments = String::new();
        write_canonical(&value, &mut arguments);
        Ok((
            Self {
                name: request.name.clone(),
                arguments,
            },
            value,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical JSON text of the arguments.
    pub fn arguments(&self) -> &str {
        &self.arguments
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

fn parse_arguments(raw: &RawArguments) -> Result<Value, ArgumentError> {
    let value = match raw {
        RawArguments::Encoded(text) if text.trim().is_empty() => Value::Null,
        RawArguments::Encoded(text) => serde_json::from_str::<Value>(text)
            .map_err(|e| ArgumentError::Unparsable(e.to_string()))?,
        RawArguments::Structured(value) => value.clone(),
    };

    match value {
        Value::Null => Ok(Value::Object(Map::new())),
        Value::Object(_) => Ok(value),
        Value::Bool(_) => Err(ArgumentError::NotAnObject("boolean")),
        Value::Number(_) => Err(ArgumentError::NotAnObject("number")),
        Value::String(_) => Err(ArgumentError::NotAnObject("string")),
        Value::Array(_) => Err(ArgumentError::NotAnObject("array")),
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => out.push_str(&value.to_string()),
        Value::Number(n) => match n.as_f64() {
            Some(f)
                if n.is_f64()
                    && f.fract() == 0.0
                    && f >= i64::MIN as f64
                    && f < i64::MAX as f64 =>
            {
                let _ = write!(out, "{}", f as i64);
            }
            _ => out.push_str(&n.to_string()),
        },
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signature(name: &str, raw: impl Into<RawArguments>) -> Signature {
        Signature::canonicalize(&ActionRequest::new("id", name, raw))
            .unwrap()
            .0
    }

    #[test]
    fn test_encoded_and_structured_are_equal() {
        let encoded = signature("search", r#"{ "q": "x", "limit": 5 }"#);
        let structured = signature("search", json!({"limit": 5, "q": "x"}));
        assert_eq!(encoded, structured);
        assert_eq!(encoded.arguments(), r#"{"limit":5,"q":"x"}"#);
    }

    #[test]
    fn test_request_id_is_ignored() {
        let a = Signature::canonicalize(&ActionRequest::new("a", "search", json!({"q": "x"})));
        let b = Signature::canonicalize(&ActionRequest::new("b", "search", json!({"q": "x"})));
        assert_eq!(a.unwrap().0, b.unwrap().0);
    }

    #[test]
    fn test_name_participates() {
        assert_ne!(
            signature("search", json!({"q": "x"})),
            signature("fetch", json!({"q": "x"}))
        );
    }

    #[test]
    fn test_nested_keys_are_sorted() {
        let sig = signature("op", json!({"b": {"z": 1, "a": [ {"y": 2, "x": 1} ]}, "a": null}));
        assert_eq!(sig.arguments(), r#"{"a":null,"b":{"a":[{"x":1,"y":2}],"z":1}}"#);
    }

    #[test]
    fn test_integral_floats_normalize() {
        assert_eq!(
            signature("op", r#"{"n": 1.0}"#),
            signature("op", r#"{"n": 1}"#)
        );
        assert_eq!(signature("op", r#"{"n": 1.5}"#).arguments(), r#"{"n":1.5}"#);
    }

    #[test]
    fn test_out_of_range_floats_keep_their_form() {
        assert_ne!(
            signature("op", r#"{"n": 9223372036854775808.0}"#),
            signature("op", json!({"n": i64::MAX}))
        );
        assert_eq!(
            signature("op", r#"{"n": -9223372036854775808.0}"#),
            signature("op", json!({"n": i64::MIN}))
        );
    }

    #[test]
    fn test_array_order_matters() {
        assert_ne!(
            signature("op", json!({"v": [1, 2]})),
            signature("op", json!({"v": [2, 1]}))
        );
    }

    #[test]
    fn test_empty_and_null_mean_no_arguments() {
        assert_eq!(signature("op", "").arguments(), "{}");
        assert_eq!(signature("op", "   ").arguments(), "{}");
        assert_eq!(signature("op", json!(null)).arguments(), "{}");
        assert_eq!(signature("op", "null").arguments(), "{}");
    }

    #[test]
    fn test_unparsable_string() {
        let err = Signature::canonicalize(&ActionRequest::new("1", "op", r#"{"q": "#))
            .unwrap_err();
        assert!(matches!(err, ArgumentError::Unparsable(_)));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = Signature::canonicalize(&ActionRequest::new("1", "op", "[1, 2]")).unwrap_err();
        assert_eq!(err, ArgumentError::NotAnObject("array"));

        let err = Signature::canonicalize(&ActionRequest::new("1", "op", json!("text")))
            .unwrap_err();
        assert_eq!(err, ArgumentError::NotAnObject("string"));
    }

    #[test]
    fn test_parsed_value_returned() {
        let (_, value) =
            Signature::canonicalize(&ActionRequest::new("1", "op", r#"{"q":"x"}"#)).unwrap();
        assert_eq!(value, json!({"q": "x"}));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            signature("search", json!({"q": "x"})).to_string(),
            r#"search({"q":"x"})"#
        );
    }
}
