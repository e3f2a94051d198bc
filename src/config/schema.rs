//! Configuration schema for the request composer.
//!
//! This module defines the configuration structure and validation logic for
//! every user-configurable setting.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure.
///
/// All settings are read from the `"request-composer"` key of a settings
/// document. Missing settings fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerConfig {
    /// Seconds subtracted from an issued token's lifetime.
    ///
    /// The credential cache treats a token as expired this long before the
    /// issuer would, absorbing clock skew and in-flight latency. Defaults
    /// to 300 seconds.
    #[serde(default = "default_safety_margin_secs")]
    pub safety_margin_secs: u64,

    /// Path of the token endpoint, relative to `accounts.base.uri`.
    ///
    /// Defaults to `"api/token"`. Must not be empty.
    #[serde(default = "default_token_path")]
    pub token_path: String,

    /// Timeout for the token exchange in milliseconds.
    ///
    /// Defaults to 30000ms. Must be greater than 0.
    #[serde(default = "default_renewal_timeout")]
    pub renewal_timeout: u64,

    /// Key-value properties.
    ///
    /// Used to resolve `{{key}}` placeholders in endpoints and headers, and
    /// to supply the credential settings (`accounts.base.uri`, `client_id`,
    /// `client_secret`, `refresh_token`, `grant_type`).
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            safety_margin_secs: default_safety_margin_secs(),
            token_path: default_token_path(),
            renewal_timeout: default_renewal_timeout(),
            properties: HashMap::new(),
        }
    }
}

impl ComposerConfig {
    /// Validates the configuration and returns an error message for the
    /// first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.renewal_timeout == 0 {
            return Err("renewalTimeout must be greater than 0".to_string());
        }

        if self.token_path.trim().is_empty() {
            return Err("tokenPath must not be empty".to_string());
        }

        Ok(())
    }

    /// Returns the renewal timeout as a `std::time::Duration`.
    pub fn renewal_timeout_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.renewal_timeout)
    }

    /// Returns the safety margin as a `chrono::Duration`.
    pub fn safety_margin(&self) -> chrono::Duration {
        let secs = i64::try_from(self.safety_margin_secs).unwrap_or(i64::MAX / 1000);
        chrono::Duration::try_seconds(secs).unwrap_or(chrono::Duration::MAX)
    }

    /// Merges this configuration with another, using values from `other`.
    ///
    /// Properties are combined; keys in `other` win.
    pub fn merge(&self, other: &ComposerConfig) -> Self {
        let mut properties = self.properties.clone();
        properties.extend(other.properties.clone());

        Self {
            safety_margin_secs: other.safety_margin_secs,
            token_path: other.token_path.clone(),
            renewal_timeout: other.renewal_timeout,
            properties,
        }
    }
}

// Default value functions for serde

fn default_safety_margin_secs() -> u64 {
    300
}

fn default_token_path() -> String {
    "api/token".to_string()
}

fn default_renewal_timeout() -> u64 {
    30000
}
