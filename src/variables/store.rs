//! Scenario-scoped store of typed variables.
//!
//! Names are unique within a type but may repeat across types. Typed
//! lookups need both name and type; placeholder resolution searches the
//! namespaces in the fixed order String, Integer, Boolean, Decimal and
//! takes the first hit.

use super::placeholder::scan_placeholders;
use super::VarError;
use crate::coercion::parse_as;
use crate::models::{TypedValue, VariableType};
use log::{debug, info};
use bigdecimal::BigDecimal;
use std::collections::HashMap;

/// Four disjoint namespaces of captured values.
///
/// A store is created fresh for each scenario and dropped at its end; it
/// is not shared between threads.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    strings: HashMap<String, String>,
    integers: HashMap<String, i64>,
    booleans: HashMap<String, bool>,
    decimals: HashMap<String, BigDecimal>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `raw` as `variable_type` and stores it under `name`.
    ///
    /// Any previous value with the same name and type is replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_composer::models::{TypedValue, VariableType};
    /// use request_composer::variables::VariableStore;
    ///
    /// let mut store = VariableStore::new();
    /// store.store("total", VariableType::Integer, "42").unwrap();
    /// assert_eq!(store.get("total", VariableType::Integer), Some(TypedValue::Integer(42)));
    /// ```
    pub fn store(
        &mut self,
        name: &str,
        variable_type: VariableType,
        raw: &str,
    ) -> Result<(), VarError> {
        info!("Storing {} variable '{}'", variable_type, name);
        let value = parse_as(raw, variable_type)?;
        self.insert(name, value);
        Ok(())
    }

    /// Like [`store`](Self::store), with the type given as a table tag.
    pub fn store_tagged(&mut self, name: &str, type_tag: &str, raw: &str) -> Result<(), VarError> {
        let variable_type = type_tag.parse::<VariableType>()?;
        self.store(name, variable_type, raw)
    }

    /// Inserts an already typed value into its namespace.
    pub fn insert(&mut self, name: impl Into<String>, value: TypedValue) {
        let name = name.into();
        match value {
            TypedValue::String(s) => {
                self.strings.insert(name, s);
            }
            TypedValue::Integer(i) => {
                self.integers.insert(name, i);
            }
            TypedValue::Boolean(b) => {
                self.booleans.insert(name, b);
            }
            TypedValue::Decimal(d) => {
                self.decimals.insert(name, d);
            }
        }
    }

    /// Looks up `name` in the namespace of `variable_type`.
    pub fn get(&self, name: &str, variable_type: VariableType) -> Option<TypedValue> {
        match variable_type {
            VariableType::String => self.strings.get(name).cloned().map(TypedValue::String),
            VariableType::Integer => self.integers.get(name).copied().map(TypedValue::Integer),
            VariableType::Boolean => self.booleans.get(name).copied().map(TypedValue::Boolean),
            VariableType::Decimal => self.decimals.get(name).cloned().map(TypedValue::Decimal),
        }
    }

    /// Looks up `name` across all namespaces in resolution order.
    pub fn find(&self, name: &str) -> Option<TypedValue> {
        VariableType::RESOLUTION_ORDER
            .iter()
            .find_map(|t| self.get(name, *t))
    }

    /// Replaces every `{name}` in `template` with the stored value's text.
    ///
    /// Fails on the first name that no namespace holds; no partially
    /// substituted string is ever returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_composer::models::VariableType;
    /// use request_composer::variables::VariableStore;
    ///
    /// let mut store = VariableStore::new();
    /// store.store("userId", VariableType::String, "smedjan").unwrap();
    /// store.store("limit", VariableType::Integer, "5").unwrap();
    ///
    /// let url = store.resolve("users/{userId}/playlists?limit={limit}").unwrap();
    /// assert_eq!(url, "users/smedjan/playlists?limit=5");
    /// ```
    pub fn resolve(&self, template: &str) -> Result<String, VarError> {
        let placeholders = scan_placeholders(template);
        if placeholders.is_empty() {
            return Ok(template.to_string());
        }
        info!("Resolving {} placeholder(s) in '{}'", placeholders.len(), template);

        let mut result = String::with_capacity(template.len() + template.len() / 4);
        let mut last_match_end = 0;

        for placeholder in placeholders {
            let value = self
                .find(placeholder.name)
                .ok_or_else(|| VarError::UnresolvedPlaceholder(placeholder.name.to_string()))?;

            result.push_str(&template[last_match_end..placeholder.start]);
            result.push_str(&value.to_string());
            last_match_end = placeholder.end;
        }

        result.push_str(&template[last_match_end..]);
        Ok(result)
    }

    /// Turns an expected-value cell into a typed value.
    ///
    /// A braced cell (`{name}`) is a typed lookup of `name` under
    /// `expected_type`; anything else is parsed as `expected_type`.
    pub fn convert_or_retrieve(
        &self,
        expected: &str,
        expected_type: VariableType,
    ) -> Result<TypedValue, VarError> {
        debug!(
            "Converting or retrieving expected value '{}' as {}",
            expected, expected_type
        );

        match expected
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Some(name) => self
                .get(name, expected_type)
                .ok_or_else(|| VarError::NotFound {
                    name: name.to_string(),
                    variable_type: expected_type,
                }),
            None => Ok(parse_as(expected, expected_type)?),
        }
    }

    /// Total number of stored variables across all namespaces.
    pub fn len(&self) -> usize {
        self.strings.len() + self.integers.len() + self.booleans.len() + self.decimals.len()
    }

    /// Returns true if no variable is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every stored variable.
    pub fn clear(&mut self) {
        self.strings.clear();
        self.integers.clear();
        self.booleans.clear();
        self.decimals.clear();
    }
}
