//! `{{key}}` property placeholders.
//!
//! Endpoint and header strings may reference configuration properties as
//! `{{key}}`. These are resolved before any `{name}` variable placeholder.

use super::ConfigError;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Cached regex for `{{key}}` with optional surrounding whitespace.
static PROPERTY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("Failed to compile property regex"));

/// Replaces every `{{key}}` in `text` with its property value.
///
/// # Examples
///
/// ```
/// use request_composer::config::resolve_property_placeholders;
/// use std::collections::HashMap;
///
/// let mut properties = HashMap::new();
/// properties.insert("user_id".to_string(), "smedjan".to_string());
///
/// let endpoint = resolve_property_placeholders("users/{{user_id}}/playlists", &properties).unwrap();
/// assert_eq!(endpoint, "users/smedjan/playlists");
/// ```
pub fn resolve_property_placeholders(
    text: &str,
    properties: &HashMap<String, String>,
) -> Result<String, ConfigError> {
    if !text.contains("{{") {
        return Ok(text.to_string());
    }
    debug!("Replacing property placeholders in '{}'", text);

    let mut result = String::with_capacity(text.len());
    let mut last_match_end = 0;

    for cap in PROPERTY_REGEX.captures_iter(text) {
        let (Some(full_match), Some(key)) = (cap.get(0), cap.get(1)) else {
            continue;
        };

        let value = require_property(properties, key.as_str().trim())?;
        result.push_str(&text[last_match_end..full_match.start()]);
        result.push_str(value);
        last_match_end = full_match.end();
    }

    result.push_str(&text[last_match_end..]);
    Ok(result)
}

/// Returns the value of a required property.
pub fn require_property<'a>(
    properties: &'a HashMap<String, String>,
    key: &str,
) -> Result<&'a str, ConfigError> {
    properties
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingProperty(key.to_string()))
}
