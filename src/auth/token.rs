//! Bearer token codec
//!
//! Tokens are HS256 JWTs signed with the server secret. Verification is pure:
//! it checks the signature, then compares the `exp` claim against the `now`
//! supplied by the caller.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::models::{Claims, Identity};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Signs a token for `identity` that expires `ttl` after `now`.
pub fn mint(
    identity: &Identity,
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let claims = Claims {
        sub: identity.sub.clone(),
        email: identity.email.clone(),
        name: identity.name.clone(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Verifies signature and expiry of `token` as of `now`.
pub fn verify(token: &str, secret: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is compared against the caller's clock below.
    validation.validate_exp = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| TokenError::Malformed(e.to_string()))?;

    if data.claims.exp <= now.timestamp() {
        return Err(TokenError::Expired);
    }

    Ok(data.claims)
}
