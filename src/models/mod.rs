//! Data models shared by the composition engine.
//!
//! This module contains the typed values captured from responses, the
//! variable type tags used by data tables, and the data table shape itself.

pub mod table;
pub mod value;

pub use table::{DataTable, TableError};
pub use value::{TypedValue, VariableType};
