//! String-to-value coercion.
//!
//! Table cells always arrive as strings. Before a cell lands in a JSON
//! document or a typed variable it is converted either by inspecting its
//! literal form or by matching the type of a value already in place.

use crate::models::{TypedValue, VariableType};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use bigdecimal::BigDecimal;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

/// All-digit literal, inferred as an integer.
static INTEGER_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("Failed to compile integer literal regex"));

/// Digits, a dot, digits; inferred as a decimal.
static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+\.[0-9]+$").expect("Failed to compile decimal literal regex")
});

/// Errors raised when a raw string cannot take the demanded type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// `raw` is not a valid literal of `expected`
    #[error("Type mismatch: '{raw}' is not a valid {expected}")]
    TypeMismatch { expected: VariableType, raw: String },
}

impl CoercionError {
    fn mismatch(expected: VariableType, raw: &str) -> Self {
        CoercionError::TypeMismatch {
            expected,
            raw: raw.to_string(),
        }
    }
}

/// Infers a JSON value from the literal form of `raw`.
///
/// Rules are applied in order: `true`/`false` become booleans, all-digit
/// tokens integers, `digits.digits` decimals, `null` a JSON null, and
/// everything else stays a string. Inference never fails: an all-digit
/// token too wide for 64 bits is written as a decimal number instead.
///
/// # Examples
///
/// ```
/// use request_composer::coercion::coerce_by_inference;
/// use serde_json::json;
///
/// assert_eq!(coerce_by_inference("42"), json!(42));
/// assert_eq!(coerce_by_inference("true"), json!(true));
/// assert_eq!(coerce_by_inference("hello"), json!("hello"));
/// ```
pub fn coerce_by_inference(raw: &str) -> Value {
    debug!("Inferring value type from '{}'", raw);
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ if INTEGER_LITERAL.is_match(raw) => raw
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| raw.parse::<u64>().map(Value::from))
            .unwrap_or_else(|_| decimal_literal(raw)),
        _ if DECIMAL_LITERAL.is_match(raw) => decimal_literal(raw),
        _ => Value::String(raw.to_string()),
    }
}

/// JSON form of a literal already known to match a numeric pattern.
fn decimal_literal(raw: &str) -> Value {
    BigDecimal::from_str(raw)
        .map(|d| TypedValue::Decimal(d).to_json())
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Converts `raw` to the JSON type of an existing leaf.
///
/// Booleans, integers and floating-point numbers demand a parse of the same
/// type; strings, objects and arrays take `raw` unchanged as a string.
/// An integer leaf above `i64::MAX` demands an unsigned 64-bit value.
/// A `null` leaf carries no type and falls back to inference.
pub fn coerce_by_existing(existing: &Value, raw: &str) -> Result<Value, CoercionError> {
    debug!("Coercing '{}' to the type of existing value {}", raw, existing);
    match existing {
        Value::Null => Ok(coerce_by_inference(raw)),
        Value::Bool(_) => Ok(parse_as(raw, VariableType::Boolean)?.to_json()),
        Value::Number(n) if n.is_i64() => Ok(parse_as(raw, VariableType::Integer)?.to_json()),
        Value::Number(n) if n.is_u64() => raw
            .trim()
            .parse::<u64>()
            .map(Value::from)
            .map_err(|_| CoercionError::mismatch(VariableType::Integer, raw)),
        Value::Number(_) => Ok(parse_as(raw, VariableType::Decimal)?.to_json()),
        Value::String(_) | Value::Array(_) | Value::Object(_) => Ok(Value::String(raw.to_string())),
    }
}

/// Parses `raw` into a value of the given type.
///
/// Booleans accept `true`/`false` in any case; integers are signed 64-bit;
/// decimals accept plain and scientific notation with any number of digits
/// and any exponent. Strings are kept as-is.
///
/// # Examples
///
/// ```
/// use request_composer::coercion::parse_as;
/// use request_composer::models::{TypedValue, VariableType};
///
/// assert_eq!(parse_as("42", VariableType::Integer).unwrap(), TypedValue::Integer(42));
/// assert!(parse_as("abc", VariableType::Integer).is_err());
/// ```
pub fn parse_as(raw: &str, expected: VariableType) -> Result<TypedValue, CoercionError> {
    match expected {
        VariableType::String => Ok(TypedValue::String(raw.to_string())),
        VariableType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(TypedValue::Integer)
            .map_err(|_| CoercionError::mismatch(expected, raw)),
        VariableType::Boolean => match raw.trim() {
            b if b.eq_ignore_ascii_case("true") => Ok(TypedValue::Boolean(true)),
            b if b.eq_ignore_ascii_case("false") => Ok(TypedValue::Boolean(false)),
            _ => Err(CoercionError::mismatch(expected, raw)),
        },
        VariableType::Decimal => BigDecimal::from_str(raw.trim())
            .map(TypedValue::Decimal)
            .map_err(|_| CoercionError::mismatch(expected, raw)),
    }
}
