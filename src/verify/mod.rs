//! Field assertions on response bodies.
//!
//! A verification table has three rows: response paths, expected values
//! and expected types. `NOT_NULL`, `NULL` and `null` are presence checks;
//! any other expected value goes through
//! [`VariableStore::convert_or_retrieve`] and is compared by type.

use crate::coercion::parse_as;
use crate::models::{DataTable, TableError, TypedValue, VariableType};
use crate::path::{PathError, PathExpression};
use crate::variables::{VarError, VariableStore};
use log::{debug, info};
use serde_json::Value;
use thiserror::Error;

/// Expected value asserting the field is present and not null.
pub const NOT_NULL: &str = "NOT_NULL";

/// Expected values asserting the field is missing or null.
pub const NULL_SENTINELS: [&str; 2] = ["NULL", "null"];

/// Errors that can occur while verifying a response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Variables(#[from] VarError),

    /// The field at `path` does not hold the expected value
    #[error("Field '{path}' expected {expected}, found {actual}")]
    FieldMismatch {
        path: String,
        expected: String,
        actual: String,
    },
}

/// What a single column of the table asserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    NotNull,
    Null,
    Equals(TypedValue),
}

impl Expectation {
    /// Builds the expectation for one cell pair.
    ///
    /// Sentinels are recognized before the store is consulted.
    pub fn from_cells(
        expected: &str,
        type_tag: &str,
        store: &VariableStore,
    ) -> Result<Self, VarError> {
        if expected == NOT_NULL {
            return Ok(Expectation::NotNull);
        }
        if NULL_SENTINELS.contains(&expected) {
            return Ok(Expectation::Null);
        }

        let expected_type = type_tag.parse::<VariableType>()?;
        Ok(Expectation::Equals(
            store.convert_or_retrieve(expected, expected_type)?,
        ))
    }

    /// Returns true if `actual` satisfies the expectation.
    pub fn is_met_by(&self, actual: Option<&Value>) -> bool {
        match self {
            Expectation::NotNull => actual.is_some_and(|v| !v.is_null()),
            Expectation::Null => actual.map_or(true, Value::is_null),
            Expectation::Equals(expected) => actual.is_some_and(|v| matches(v, expected)),
        }
    }
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expectation::NotNull => write!(f, "a non-null value"),
            Expectation::Null => write!(f, "null"),
            Expectation::Equals(value) => write!(f, "{} {}", value.variable_type(), value),
        }
    }
}

/// Checks every column of a three-row table against `body`.
///
/// Stops at the first failing column.
///
/// # Examples
///
/// ```
/// use request_composer::models::DataTable;
/// use request_composer::variables::VariableStore;
/// use request_composer::verify::verify_fields;
/// use serde_json::json;
///
/// let body = json!({"name": "Road trip", "tracks": {"total": 3}, "description": null});
/// let table = DataTable::from_rows(&[
///     &["name", "tracks.total", "description"],
///     &["Road trip", "3", "NULL"],
///     &["String", "Integer", "String"],
/// ]);
///
/// verify_fields(&table, &body, &VariableStore::new()).unwrap();
/// ```
pub fn verify_fields(
    table: &DataTable,
    body: &Value,
    store: &VariableStore,
) -> Result<(), VerifyError> {
    let columns = table.three_row_triples()?;
    info!("Verifying {} response field(s)", columns.len());

    for (path, expected, type_tag) in columns {
        let expression = PathExpression::parse(path)?;
        let expectation = Expectation::from_cells(expected, type_tag, store)?;
        let actual = expression.lookup(body);

        debug!("Checking '{}' is {}", path, expectation);
        if !expectation.is_met_by(actual) {
            return Err(VerifyError::FieldMismatch {
                path: path.to_string(),
                expected: expectation.to_string(),
                actual: actual.map_or_else(|| "nothing".to_string(), Value::to_string),
            });
        }
    }

    Ok(())
}

/// Compares a JSON value with a typed value.
///
/// Types must agree; numbers compared against a decimal are read as exact
/// decimals.
pub fn matches(actual: &Value, expected: &TypedValue) -> bool {
    match (actual, expected) {
        (Value::String(s), TypedValue::String(e)) => s == e,
        (Value::Bool(b), TypedValue::Boolean(e)) => b == e,
        (Value::Number(n), TypedValue::Integer(e)) => n.as_i64() == Some(*e),
        (Value::Number(n), TypedValue::Decimal(e)) => {
            match parse_as(&n.to_string(), VariableType::Decimal) {
                Ok(TypedValue::Decimal(d)) => d == *e,
                _ => false,
            }
        }
        _ => false,
    }
}
