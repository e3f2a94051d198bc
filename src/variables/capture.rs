//! Capturing response values into the variable store.
//!
//! Capture instructions come as a table with a header row:
//!
//! ```text
//! | variableName | variableType | responsePath      |
//! | playlistId   | String       | id                |
//! | trackCount   | Integer      | tracks.total      |
//! | firstPublic  | Boolean      | items[0].public   |
//! ```

use super::{VarError, VariableStore};
use crate::models::{DataTable, TableError, VariableType};
use crate::path::PathExpression;
use log::info;
use serde_json::Value;

/// Header cells of a capture table, in order.
pub const CAPTURE_COLUMNS: [&str; 3] = ["variableName", "variableType", "responsePath"];

/// One capture instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRow {
    /// Name to store the value under
    pub variable_name: String,

    /// Namespace the value goes into
    pub variable_type: VariableType,

    /// Where the value sits in the response body
    pub response_path: PathExpression,
}

impl CaptureRow {
    /// Creates a capture row from raw cells.
    pub fn new(variable_name: &str, type_tag: &str, response_path: &str) -> Result<Self, VarError> {
        Ok(Self {
            variable_name: variable_name.to_string(),
            variable_type: type_tag.parse()?,
            response_path: PathExpression::parse(response_path)?,
        })
    }
}

/// Parses a capture table into rows.
///
/// The table must have exactly the three [`CAPTURE_COLUMNS`] in its header.
pub fn parse_capture_rows(table: &DataTable) -> Result<Vec<CaptureRow>, VarError> {
    let malformed = || {
        TableError::Malformed(format!(
            "DataTable must have three columns. {}",
            CAPTURE_COLUMNS.join(" | ")
        ))
    };

    let records = table.records(CAPTURE_COLUMNS.len()).map_err(|_| malformed())?;

    records
        .iter()
        .map(|record| {
            let cell = |column: &str| record.get(column).copied().ok_or_else(malformed);
            CaptureRow::new(
                cell(CAPTURE_COLUMNS[0])?,
                cell(CAPTURE_COLUMNS[1])?,
                cell(CAPTURE_COLUMNS[2])?,
            )
        })
        .collect()
}

/// Extracts each row's value from `body` and stores it.
///
/// A path that is missing or `null` in the body fails with
/// [`VarError::MissingValue`].
pub fn store_captures(
    store: &mut VariableStore,
    rows: &[CaptureRow],
    body: &Value,
) -> Result<(), VarError> {
    for row in rows {
        info!(
            "Storing response body value '{}' as {} variable '{}'",
            row.response_path, row.variable_type, row.variable_name
        );

        let value = row
            .response_path
            .lookup(body)
            .filter(|v| !v.is_null())
            .ok_or_else(|| VarError::MissingValue(row.response_path.to_string()))?;

        store.store(&row.variable_name, row.variable_type, &json_value_to_string(value))?;
    }
    Ok(())
}

/// Textual form of a JSON value: strings unquoted, containers serialized.
fn json_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
