//! Data table shapes.
//!
//! Callers pass overrides, expectations and capture instructions as small
//! row-oriented tables. Each consumer expects a fixed shape; a table that
//! does not match is rejected before anything is applied.

use std::collections::HashMap;
use thiserror::Error;

/// Errors raised when a table does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Row or column count violates the consumer's contract
    #[error("Malformed table: {0}")]
    Malformed(String),
}

/// A table of string cells, row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Creates a table from owned rows.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Creates a table from borrowed cells.
    ///
    /// ```
    /// use request_composer::models::DataTable;
    ///
    /// let table = DataTable::from_rows(&[&["name", "age"], &["Ada", "36"]]);
    /// assert_eq!(table.row_count(), 2);
    /// ```
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    /// Returns the raw rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Reads a two-row table as column-wise `(key, value)` pairs.
    ///
    /// The first row holds keys and the second their values.
    pub fn two_row_pairs(&self) -> Result<Vec<(&str, &str)>, TableError> {
        let [keys, values] = self.exact_rows::<2>()?;
        Ok(keys
            .iter()
            .zip(values.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect())
    }

    /// Reads a three-row table as column-wise triples.
    pub fn three_row_triples(&self) -> Result<Vec<(&str, &str, &str)>, TableError> {
        let [first, second, third] = self.exact_rows::<3>()?;
        Ok(first
            .iter()
            .zip(second.iter())
            .zip(third.iter())
            .map(|((a, b), c)| (a.as_str(), b.as_str(), c.as_str()))
            .collect())
    }

    /// Reads a table whose first row is a header as a list of records.
    ///
    /// Every data row must have exactly `columns` cells, as must the header.
    pub fn records(&self, columns: usize) -> Result<Vec<HashMap<&str, &str>>, TableError> {
        let (header, data) = self
            .rows
            .split_first()
            .ok_or_else(|| TableError::Malformed("DataTable must have a header row".to_string()))?;

        if header.len() != columns {
            return Err(TableError::Malformed(format!(
                "DataTable must have {} columns, found {}",
                columns,
                header.len()
            )));
        }

        data.iter()
            .enumerate()
            .map(|(i, row)| {
                if row.len() != columns {
                    return Err(TableError::Malformed(format!(
                        "row {} has {} cells, expected {}",
                        i + 1,
                        row.len(),
                        columns
                    )));
                }
                Ok(header
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect())
            })
            .collect()
    }

    fn exact_rows<const N: usize>(&self) -> Result<[&Vec<String>; N], TableError> {
        if self.rows.len() != N {
            return Err(TableError::Malformed(format!(
                "DataTable must have {} rows, found {}",
                N,
                self.rows.len()
            )));
        }

        let width = self.rows[0].len();
        if let Some(row) = self.rows.iter().position(|r| r.len() != width) {
            return Err(TableError::Malformed(format!(
                "row {} has {} cells, expected {}",
                row + 1,
                self.rows[row].len(),
                width
            )));
        }

        let mut out = [&self.rows[0]; N];
        for (slot, row) in out.iter_mut().zip(self.rows.iter()) {
            *slot = row;
        }
        Ok(out)
    }
}
