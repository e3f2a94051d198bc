//! Request body composition.
//!
//! A request body starts from a base JSON document and is adjusted by a
//! table of `path -> value` overrides. Missing intermediate objects and
//! arrays are created on the way down; existing leaves keep their JSON type.
//!
//! # Example
//!
//! ```
//! use request_composer::body::apply_table;
//! use request_composer::models::DataTable;
//! use serde_json::json;
//!
//! let mut doc = json!({"name": "old", "public": false});
//! let table = DataTable::from_rows(&[
//!     &["name", "public", "owner.id"],
//!     &["Road trip", "true", "42"],
//! ]);
//!
//! apply_table(&mut doc, &table).unwrap();
//! assert_eq!(doc, json!({"name": "Road trip", "public": true, "owner": {"id": 42}}));
//! ```

pub mod mutator;

pub use mutator::{apply, apply_pair, apply_table};

use crate::coercion::CoercionError;
use crate::models::TableError;
use crate::path::PathError;
use thiserror::Error;

/// Errors raised while applying overrides to a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyError {
    /// The override table has the wrong shape
    #[error(transparent)]
    Table(#[from] TableError),

    /// The key is not a valid path expression
    #[error(transparent)]
    Path(#[from] PathError),

    /// A scalar sits where the path needs an object or array
    #[error("Path conflict in '{path}': '{segment}' does not address a container")]
    PathConflict { path: String, segment: String },

    /// The value cannot take the type of the existing leaf
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}
