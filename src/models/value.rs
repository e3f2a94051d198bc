//! Typed variable values.
//!
//! Values harvested from responses are kept in one of four typed forms.
//! Decimals use `BigDecimal`, so any number of digits and any exponent is
//! kept exactly and comparisons never drift the way binary floating point
//! does.

use crate::variables::VarError;
use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Type tag of a stored variable.
///
/// Tags appear in data tables as `String`, `Integer`, `Boolean` or `Decimal`
/// and are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableType {
    /// Free-form text
    String,
    /// Signed 64-bit integer
    Integer,
    /// `true` / `false`
    Boolean,
    /// Arbitrary-precision decimal
    Decimal,
}

impl VariableType {
    /// Placeholder lookup order across namespaces.
    pub const RESOLUTION_ORDER: [VariableType; 4] = [
        VariableType::String,
        VariableType::Integer,
        VariableType::Boolean,
        VariableType::Decimal,
    ];

    /// Returns the canonical tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::String => "String",
            VariableType::Integer => "Integer",
            VariableType::Boolean => "Boolean",
            VariableType::Decimal => "Decimal",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = VarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        VariableType::RESOLUTION_ORDER
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| VarError::UnsupportedType(tag.to_string()))
    }
}

/// A value held in one of the four typed namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Decimal(BigDecimal),
}

impl TypedValue {
    /// Returns the type tag matching this value.
    pub fn variable_type(&self) -> VariableType {
        match self {
            TypedValue::String(_) => VariableType::String,
            TypedValue::Integer(_) => VariableType::Integer,
            TypedValue::Boolean(_) => VariableType::Boolean,
            TypedValue::Decimal(_) => VariableType::Decimal,
        }
    }

    /// Converts the value into a JSON leaf.
    ///
    /// Decimals become JSON numbers; a decimal that has no finite `f64`
    /// representation falls back to its string form. Exact digits beyond
    /// `f64` precision survive only in the store and in comparisons.
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::Integer(i) => Value::Number((*i).into()),
            TypedValue::Boolean(b) => Value::Bool(*b),
            TypedValue::Decimal(d) => d
                .to_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(d.to_string())),
        }
    }
}

/// Textual form used when a value is substituted into a template.
impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::String(s) => write!(f, "{}", s),
            TypedValue::Integer(i) => write!(f, "{}", i),
            TypedValue::Boolean(b) => write!(f, "{}", b),
            TypedValue::Decimal(d) => write!(f, "{}", d),
        }
    }
}
