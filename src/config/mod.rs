//! Configuration management for the request composer.
//!
//! Configuration is read from a settings document under the
//! `"request-composer"` key and merged with defaults. The result is a plain
//! value owned by the caller; nothing is kept in process-wide state.

pub mod properties;
pub mod schema;

pub use properties::{require_property, resolve_property_placeholders};
pub use schema::ComposerConfig;

use log::warn;
use serde_json::Value;
use thiserror::Error;

/// Settings key holding this crate's configuration.
pub const SETTINGS_KEY: &str = "request-composer";

/// Errors raised by configuration handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required property is not defined
    #[error("Property not found: {0}")]
    MissingProperty(String),

    /// The configuration failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ComposerConfig {
    /// Builds a configuration from a settings document.
    ///
    /// Reads the `"request-composer"` settings, merges them with defaults
    /// and validates the result. Settings that fail to deserialize are
    /// ignored with a warning.
    ///
    /// # Example
    ///
    /// ```
    /// use request_composer::config::ComposerConfig;
    /// use serde_json::json;
    ///
    /// let settings = json!({
    ///     "request-composer": {
    ///         "safetyMarginSecs": 120,
    ///         "properties": {"user_id": "smedjan"}
    ///     }
    /// });
    ///
    /// let config = ComposerConfig::from_settings(&settings).unwrap();
    /// assert_eq!(config.safety_margin_secs, 120);
    /// ```
    pub fn from_settings(settings: &Value) -> Result<Self, ConfigError> {
        let mut config = ComposerConfig::default();

        if let Some(section) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<ComposerConfig>(section.clone()) {
                Ok(user_config) => {
                    config = config.merge(&user_config);
                }
                Err(e) => {
                    warn!(
                        "Failed to parse {} settings: {}. Using defaults.",
                        SETTINGS_KEY, e
                    );
                }
            }
        }

        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}
