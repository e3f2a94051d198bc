//! Expiry-aware cache for a single access token.
//!
//! The cache moves through `Absent -> Valid -> Expired -> Valid -> ...`.
//! A token counts as expired a safety margin before the issuer's own
//! expiry, so a request never leaves with a token that dies in flight.

use super::bearer::authorization_value;
use super::clock::{Clock, SystemClock};
use super::AuthError;
use crate::config::ComposerConfig;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use serde::Deserialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Default number of seconds a token is given up early.
pub const DEFAULT_SAFETY_MARGIN_SECS: i64 = 300;

/// Successful answer of a token issuer.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds, counted from the moment of issue
    pub expires_in: i64,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Obtains a fresh token from the issuer.
///
/// Called by [`CredentialCache`] while it holds its lock, so at most one
/// renewal runs at a time. Any closure returning a grant is a renewer.
pub trait TokenRenewer: Send + Sync {
    fn renew(&self) -> Result<TokenGrant, AuthError>;
}

impl<F> TokenRenewer for F
where
    F: Fn() -> Result<TokenGrant, AuthError> + Send + Sync,
{
    fn renew(&self) -> Result<TokenGrant, AuthError> {
        self()
    }
}

/// The cached token with its absolute expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub token: String,
    pub token_type: String,
    /// Instant from which the token is no longer handed out
    pub expires_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Returns true once `now` has reached the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// The `Authorization` header value, `"<tokenType> <token>"`.
    pub fn authorization_value(&self) -> String {
        authorization_value(&self.token_type, &self.token)
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Thread-safe holder of one access token.
///
/// Create one per process and share it by reference or `Arc`. All access
/// goes through a single mutex that spans the check, the renewal and the
/// store, so concurrent callers of an expired cache trigger exactly one
/// renewal and all receive its token.
///
/// # Examples
///
/// ```
/// use request_composer::auth::{CredentialCache, TokenGrant};
///
/// let cache = CredentialCache::new(|| {
///     Ok(TokenGrant {
///         access_token: "abc".to_string(),
///         token_type: "Bearer".to_string(),
///         expires_in: 3600,
///     })
/// });
///
/// assert!(cache.is_invalid());
/// assert_eq!(cache.get_token().unwrap(), "Bearer abc");
/// assert!(!cache.is_invalid());
/// ```
pub struct CredentialCache {
    renewer: Box<dyn TokenRenewer>,
    clock: Box<dyn Clock>,
    safety_margin: Duration,
    record: Mutex<Option<CredentialRecord>>,
}

impl CredentialCache {
    /// Creates an empty cache using the wall clock and the default margin.
    pub fn new(renewer: impl TokenRenewer + 'static) -> Self {
        Self {
            renewer: Box::new(renewer),
            clock: Box::new(SystemClock),
            safety_margin: Duration::seconds(DEFAULT_SAFETY_MARGIN_SECS),
            record: Mutex::new(None),
        }
    }

    /// Creates an empty cache with the safety margin from `config`.
    pub fn from_config(config: &ComposerConfig, renewer: impl TokenRenewer + 'static) -> Self {
        Self::new(renewer).with_safety_margin(config.safety_margin())
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the safety margin.
    pub fn with_safety_margin(mut self, safety_margin: Duration) -> Self {
        self.safety_margin = safety_margin;
        self
    }

    /// Returns a valid `Authorization` value, renewing first if needed.
    ///
    /// On renewal failure the previous record, if any, is left as it was
    /// and the next call tries again.
    pub fn get_token(&self) -> Result<String, AuthError> {
        let mut record = self.record.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(current) = record.as_ref() {
            if !current.is_expired_at(self.clock.now()) {
                debug!("Using cached {} token", current.token_type);
                return Ok(current.authorization_value());
            }
            info!("Access token expired at {}, renewing", current.expires_at);
        } else {
            info!("No access token cached, renewing");
        }

        let grant = self.renewer.renew().map_err(|e| {
            warn!("Token renewal failed: {}", e);
            e
        })?;
        let renewed = self.record_from_grant(grant)?;
        let value = renewed.authorization_value();

        debug!("Cached new token valid until {}", renewed.expires_at);
        *record = Some(renewed);

        Ok(value)
    }

    /// Returns true if no token is cached or the cached one has expired.
    pub fn is_invalid(&self) -> bool {
        let record = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        match record.as_ref() {
            Some(current) => current.is_expired_at(self.clock.now()),
            None => true,
        }
    }

    /// Returns a copy of the cached record.
    pub fn record(&self) -> Option<CredentialRecord> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drops the cached record so the next call renews.
    pub fn invalidate(&self) {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn record_from_grant(&self, grant: TokenGrant) -> Result<CredentialRecord, AuthError> {
        let out_of_range =
            || AuthError::RenewalFailed(format!("expires_in out of range: {}", grant.expires_in));

        let lifetime = Duration::try_seconds(grant.expires_in).ok_or_else(out_of_range)?;
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(lifetime)
            .and_then(|t| t.checked_sub_signed(self.safety_margin))
            .ok_or_else(out_of_range)?;

        Ok(CredentialRecord {
            token: grant.access_token,
            token_type: grant.token_type,
            expires_at,
        })
    }
}

impl fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCache")
            .field("safety_margin", &self.safety_margin)
            .field("record", &self.record())
            .finish()
    }
}
