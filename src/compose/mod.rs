//! Request assembly from tables, properties and captured variables.
//!
//! Endpoints resolve `{{key}}` properties first and `{name}` variables
//! second. Header values resolve properties and the `{access_token}`
//! marker, which pulls an authorization value from the credential cache.
//! Bodies start from a base document and get a table of overrides applied.

use crate::auth::{AuthError, CredentialCache};
use crate::body::{apply_table, BodyError};
use crate::config::{resolve_property_placeholders, ConfigError};
use crate::models::{DataTable, TableError};
use crate::variables::{VarError, VariableStore};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Marker replaced by the cache's current `Authorization` value.
pub const ACCESS_TOKEN_PLACEHOLDER: &str = "{access_token}";

/// Errors that can occur while assembling a request.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Variables(#[from] VarError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Body(#[from] BodyError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The base document is not valid JSON
    #[error("Invalid base document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}

/// Resolves an endpoint against properties and then stored variables.
///
/// # Examples
///
/// ```
/// use request_composer::compose::resolve_endpoint;
/// use request_composer::models::VariableType;
/// use request_composer::variables::VariableStore;
/// use std::collections::HashMap;
///
/// let mut properties = HashMap::new();
/// properties.insert("user_id".to_string(), "smedjan".to_string());
///
/// let mut store = VariableStore::new();
/// store.store("playlistId", VariableType::String, "37i9dQZF1DX").unwrap();
///
/// let endpoint = resolve_endpoint("users/{{user_id}}/playlists/{playlistId}", &properties, &store).unwrap();
/// assert_eq!(endpoint, "users/smedjan/playlists/37i9dQZF1DX");
/// ```
pub fn resolve_endpoint(
    endpoint: &str,
    properties: &HashMap<String, String>,
    store: &VariableStore,
) -> Result<String, ComposeError> {
    let with_properties = resolve_property_placeholders(endpoint, properties)?;
    let resolved = store.resolve(&with_properties)?;
    info!("Resolved endpoint '{}' to '{}'", endpoint, resolved);
    Ok(resolved)
}

/// Builds request headers from a two-row table of names and values.
///
/// The token is fetched at most once, and only if some value contains
/// [`ACCESS_TOKEN_PLACEHOLDER`]. Header order follows the table.
pub fn build_headers(
    table: &DataTable,
    properties: &HashMap<String, String>,
    cache: &CredentialCache,
) -> Result<Vec<(String, String)>, ComposeError> {
    let pairs = table.two_row_pairs()?;
    let mut token: Option<String> = None;
    let mut headers = Vec::with_capacity(pairs.len());

    for (name, raw) in pairs {
        let mut value = resolve_property_placeholders(raw, properties)?;

        if value.contains(ACCESS_TOKEN_PLACEHOLDER) {
            let authorization = match token.as_deref() {
                Some(t) => t.to_string(),
                None => {
                    let fetched = cache.get_token()?;
                    token = Some(fetched.clone());
                    fetched
                }
            };
            value = value.replace(ACCESS_TOKEN_PLACEHOLDER, &authorization);
        }

        debug!("Adding request header '{}'", name);
        headers.push((name.to_string(), value));
    }

    Ok(headers)
}

/// Parses a base document from JSON text.
pub fn parse_base_document(json: &str) -> Result<Value, ComposeError> {
    Ok(serde_json::from_str(json)?)
}

/// Applies a two-row override table to `base` and returns the result.
///
/// A failing pair stops the build; the partially built document is dropped.
pub fn build_body(mut base: Value, table: &DataTable) -> Result<Value, ComposeError> {
    apply_table(&mut base, table)?;
    Ok(base)
}
