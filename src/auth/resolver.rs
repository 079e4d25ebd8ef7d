//! Identity resolution: bearer header to stored user
//!
//! Every protected handler goes through [`authenticate`]. Checks run in a
//! fixed order (header format, signature, expiry, user existence) so each
//! rejection is reported as its own [`AuthError`] variant.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::models::User;
use super::services::UsersService;
use super::token::{self, TokenError};
use crate::common::{safe_email_log, safe_token_log, ApiError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or invalid authorization header")]
    MissingCredential,

    #[error("invalid token")]
    InvalidCredential,

    #[error("token expired")]
    ExpiredCredential,

    #[error("user not found")]
    UnknownSubject,

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingCredential => {
                ApiError::Unauthorized("Missing or invalid authorization header".to_string())
            }
            AuthError::InvalidCredential => ApiError::Unauthorized("Invalid token".to_string()),
            AuthError::ExpiredCredential => ApiError::Unauthorized("Token expired".to_string()),
            AuthError::UnknownSubject => ApiError::Unauthorized("User not found".to_string()),
            AuthError::Storage(e) => ApiError::DatabaseError(e),
        }
    }
}

/// Extracts the token from a `Bearer <token>` header value.
pub fn bearer_token(raw_header: Option<&str>) -> Result<&str, AuthError> {
    let raw = raw_header.ok_or(AuthError::MissingCredential)?;

    let (scheme, token) = raw
        .split_once(' ')
        .ok_or(AuthError::MissingCredential)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingCredential);
    }

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::MissingCredential);
    }

    Ok(token)
}

/// Resolves the `Authorization` header value to the stored user.
///
/// Performs one read (user by subject id) and only after the token verified.
pub async fn authenticate(
    db: &SqlitePool,
    secret: &str,
    raw_header: Option<&str>,
    now: DateTime<Utc>,
) -> Result<User, AuthError> {
    let token = bearer_token(raw_header).map_err(|e| {
        warn!(has_header = raw_header.is_some(), "Authentication failed: missing bearer credential");
        e
    })?;

    let claims = match token::verify(token, secret, now) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
            warn!(token = %safe_token_log(token), "Authentication failed: token expired");
            return Err(AuthError::ExpiredCredential);
        }
        Err(e) => {
            warn!(error = %e, token = %safe_token_log(token), "Authentication failed: token rejected");
            return Err(AuthError::InvalidCredential);
        }
    };

    let user = UsersService::new(db.clone())
        .find_by_google_id(&claims.sub)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                google_id = %claims.sub,
                "Database error during user lookup in authentication"
            );
            AuthError::Storage(e)
        })?;

    match user {
        Some(user) => {
            debug!(
                user_id = %user.id,
                email = %safe_email_log(&user.email),
                "User authentication successful"
            );
            Ok(user)
        }
        None => {
            warn!(google_id = %claims.sub, "Authentication failed: user not found in database");
            Err(AuthError::UnknownSubject)
        }
    }
}
