//! Refresh-token exchange against an accounts service.
//!
//! Posts the client credentials and refresh token as a form to
//! `<accounts.base.uri>/<tokenPath>` and reads `access_token`,
//! `token_type` and `expires_in` from the JSON answer.

use super::cache::{TokenGrant, TokenRenewer};
use super::AuthError;
use crate::config::{require_property, ComposerConfig};
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Property holding the accounts service base URI.
pub const ACCOUNTS_BASE_URI: &str = "accounts.base.uri";

/// Everything the token endpoint needs to issue a new token.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSettings {
    pub accounts_base_uri: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub grant_type: String,
}

impl CredentialSettings {
    /// Reads the settings from configuration properties.
    ///
    /// Fails with [`ConfigError::MissingProperty`](crate::config::ConfigError::MissingProperty)
    /// naming the first absent key.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self, AuthError> {
        Ok(Self {
            accounts_base_uri: require_property(properties, ACCOUNTS_BASE_URI)?.to_string(),
            client_id: require_property(properties, "client_id")?.to_string(),
            client_secret: require_property(properties, "client_secret")?.to_string(),
            refresh_token: require_property(properties, "refresh_token")?.to_string(),
            grant_type: require_property(properties, "grant_type")?.to_string(),
        })
    }

    fn form(&self) -> [(&'static str, &str); 4] {
        [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
            ("grant_type", self.grant_type.as_str()),
        ]
    }
}

impl fmt::Debug for CredentialSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSettings")
            .field("accounts_base_uri", &self.accounts_base_uri)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("grant_type", &self.grant_type)
            .finish()
    }
}

/// Blocking [`TokenRenewer`] that performs the refresh-token exchange.
#[derive(Debug)]
pub struct RefreshTokenExchange {
    settings: CredentialSettings,
    endpoint: Url,
    client: reqwest::blocking::Client,
}

impl RefreshTokenExchange {
    /// Creates an exchange posting to `token_path` under the accounts URI.
    pub fn new(
        settings: CredentialSettings,
        token_path: &str,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let endpoint = token_endpoint(&settings.accounts_base_uri, token_path)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::RenewalFailed(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    /// Creates an exchange from the properties, token path and timeout in `config`.
    pub fn from_config(config: &ComposerConfig) -> Result<Self, AuthError> {
        let settings = CredentialSettings::from_properties(&config.properties)?;
        Self::new(settings, &config.token_path, config.renewal_timeout_duration())
    }

    /// The resolved token endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl TokenRenewer for RefreshTokenExchange {
    fn renew(&self) -> Result<TokenGrant, AuthError> {
        info!("Requesting new access token from {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&self.settings.form())
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::RenewalFailed("Token request timed out".to_string())
                } else {
                    AuthError::RenewalFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AuthError::RenewalFailed(format!(
                "Token endpoint answered {}",
                status.as_u16()
            )));
        }

        let grant = response
            .json::<TokenGrant>()
            .map_err(|e| AuthError::RenewalFailed(format!("Invalid token response: {}", e)))?;

        debug!(
            "Received {} token expiring in {}s",
            grant.token_type, grant.expires_in
        );
        Ok(grant)
    }
}

/// Joins `token_path` onto `base`, treating `base` as a directory.
fn token_endpoint(base: &str, token_path: &str) -> Result<Url, AuthError> {
    let invalid = |e: url::ParseError| AuthError::InvalidEndpoint(format!("{}: {}", base, e));

    let mut base_url = Url::parse(base).map_err(invalid)?;
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }

    base_url
        .join(token_path.trim_start_matches('/'))
        .map_err(invalid)
}
