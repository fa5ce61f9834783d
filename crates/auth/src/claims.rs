use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claim set carried by an access token.
///
/// This is the minimal set of claims the gateway expects once a token has
/// been verified by a [`crate::TokenVerifier`]. Constructed once per request
/// and discarded with it; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the backend's user identifier (opaque to the gateway).
    pub sub: String,

    /// Role exactly as the issuing backend spelled it.
    ///
    /// Normalization to a canonical [`crate::Role`] happens at the gateway
    /// boundary, not here.
    pub role: String,

    /// Contact email, when the issuer includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Expiration as unix seconds. Tokens without an expiry never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token could not be decoded or parsed.
    #[error("malformed token")]
    Malformed,

    /// Signature did not verify against the issuer's key.
    #[error("signature verification failed")]
    BadSignature,

    /// `exp` is in the past.
    #[error("token has expired")]
    Expired,
}

/// Deterministically validate claim timing.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// lives behind [`crate::TokenVerifier`].
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if let Some(exp) = claims.exp {
        if now.timestamp() >= exp {
            return Err(TokenError::Expired);
        }
    }
    Ok(())
}
