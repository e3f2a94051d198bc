//! Access token handling.
//!
//! [`CredentialCache`] keeps one token and renews it through a
//! [`TokenRenewer`] when it is missing or about to expire. With the `http`
//! feature, [`RefreshTokenExchange`] is a renewer that trades a refresh
//! token for a new access token.

pub mod bearer;
pub mod cache;
pub mod clock;
#[cfg(feature = "http")]
pub mod exchange;

pub use cache::{CredentialCache, CredentialRecord, TokenGrant, TokenRenewer};
pub use clock::{Clock, ManualClock, SystemClock};
#[cfg(feature = "http")]
pub use exchange::{CredentialSettings, RefreshTokenExchange};

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur while obtaining a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The issuer did not hand out a token
    #[error("Token renewal failed: {0}")]
    RenewalFailed(String),

    /// The token endpoint could not be built
    #[error("Invalid token endpoint: {0}")]
    InvalidEndpoint(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
