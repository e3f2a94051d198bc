//! Authorization header values for issued tokens.
//!
//! Token endpoints report a `token_type` next to the access token; the
//! header value is the two joined by a single space (RFC 6750 for the
//! `Bearer` type).

/// Formats a token and its type into an `Authorization` header value.
///
/// # Arguments
///
/// * `token_type` - The type reported by the issuer, usually `"Bearer"`
/// * `token` - The access token
///
/// # Examples
///
/// ```
/// use request_composer::auth::bearer::authorization_value;
///
/// assert_eq!(authorization_value("Bearer", "abc123xyz"), "Bearer abc123xyz");
/// ```
pub fn authorization_value(token_type: &str, token: &str) -> String {
    format!("{} {}", token_type, token)
}
