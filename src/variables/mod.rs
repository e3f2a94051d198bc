//! Typed response variables.
//!
//! Values captured from earlier responses are kept in four typed
//! namespaces and later substituted into endpoints, headers and bodies
//! through `{name}` placeholders.

pub mod capture;
pub mod placeholder;
pub mod store;

pub use capture::{parse_capture_rows, store_captures, CaptureRow};
pub use placeholder::{scan_placeholders, Placeholder};
pub use store::VariableStore;

use crate::coercion::CoercionError;
use crate::models::{TableError, VariableType};
use crate::path::PathError;
use thiserror::Error;

/// Errors that can occur while storing or resolving variables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarError {
    /// A `{name}` placeholder matched no namespace
    #[error("No replacement found for key: {0}")]
    UnresolvedPlaceholder(String),

    /// A typed lookup missed
    #[error("No {variable_type} variable named '{name}'")]
    NotFound {
        name: String,
        variable_type: VariableType,
    },

    /// The type tag is not one of the four supported types
    #[error("variableType should be Boolean, Integer, Decimal or String, got '{0}'")]
    UnsupportedType(String),

    /// A capture path addressed nothing in the response body
    #[error("No value at response path '{0}'")]
    MissingValue(String),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Path(#[from] PathError),
}
