//! Google sign-in handshake
//!
//! `begin_login` sends the browser to the provider with a signed `state`
//! parameter and sets a nonce cookie; `complete_login` runs when the provider
//! redirects back, checks that the state and cookie belong together,
//! exchanges the authorization code for a profile, mints a bearer token and
//! upserts the user. The upsert is the last fallible step, so a failed
//! handshake never writes.

use async_trait::async_trait;
use axum::http::{header::COOKIE, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::{CallbackParams, Identity, ProviderProfile, ProviderUserInfo};
use super::services::UsersService;
use super::token::{self, TokenError};
use crate::common::{now_rfc3339, safe_email_log, AppState};

/// Cookie holding the nonce that binds a callback to the browser that
/// started the login.
pub const STATE_COOKIE: &str = "oauth_state";

/// Path the state cookie is scoped to.
pub const STATE_COOKIE_PATH: &str = "/api/auth";

/// How long a started login may wait for the provider callback.
pub const STATE_TTL_MINUTES: i64 = 10;

/// Frontend path that receives the token when no valid target was requested.
pub const DEFAULT_RETURN_TARGET: &str = "/auth/callback";

const STATE_PURPOSE: &str = "oauth_state";
const MAX_RETURN_TARGET_LEN: usize = 512;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Google OAuth not configured")]
    NotConfigured,

    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("Sign-in was cancelled or denied: {0}")]
    ProviderDenied(String),

    #[error("Missing sign-in state")]
    MissingState,

    #[error("Sign-in state is invalid or has expired")]
    InvalidState,

    #[error("Sign-in state does not match this browser session")]
    StateMismatch,

    #[error("Missing authorization code")]
    MissingCode,

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("Identity provider did not return the {0} field")]
    IncompleteProfile(&'static str),

    #[error("Failed to issue session token")]
    Token(#[from] TokenError),

    #[error("Failed to store user profile")]
    Storage(#[from] sqlx::Error),
}

/// The identity provider behind the handshake.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to in order to sign in.
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String, ProviderError>;

    /// Exchanges an authorization code for the signed-in user's profile.
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ProviderUserInfo, ProviderError>;
}

#[derive(Serialize, Deserialize, Debug)]
struct StateClaims {
    purpose: String,
    nonce: String,
    return_to: String,
    exp: i64,
}

/// Where to send the browser to start a login, and the nonce to pin in a cookie.
#[derive(Debug)]
pub struct LoginRedirect {
    pub url: String,
    pub nonce: String,
}

/// A finished handshake: the minted token and the frontend path to land on.
#[derive(Debug)]
pub struct CompletedLogin {
    pub token: String,
    pub return_to: String,
}

/// Accepts frontend-relative paths only, so the callback can't be turned into
/// an open redirect.
pub fn sanitize_return_target(requested: Option<&str>) -> String {
    match requested {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control)
                && path.len() <= MAX_RETURN_TARGET_LEN =>
        {
            path.to_string()
        }
        _ => DEFAULT_RETURN_TARGET.to_string(),
    }
}

pub fn begin_login(
    state: &AppState,
    return_target: Option<&str>,
    now: DateTime<Utc>,
) -> Result<LoginRedirect, HandshakeError> {
    let nonce = Uuid::new_v4().simple().to_string();
    let claims = StateClaims {
        purpose: STATE_PURPOSE.to_string(),
        nonce: nonce.clone(),
        return_to: sanitize_return_target(return_target),
        exp: (now + Duration::minutes(STATE_TTL_MINUTES)).timestamp(),
    };

    let signed_state = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret().as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))?;

    let url = state
        .identity_provider
        .authorization_url(&state.config.google_redirect_uri, &signed_state)?;

    debug!(return_to = %claims.return_to, "Prepared provider authorization redirect");

    Ok(LoginRedirect { url, nonce })
}

fn verify_state(
    signed_state: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<StateClaims, HandshakeError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;

    let claims = decode::<StateClaims>(
        signed_state,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| HandshakeError::InvalidState)?
    .claims;

    if claims.purpose != STATE_PURPOSE || claims.exp <= now.timestamp() {
        return Err(HandshakeError::InvalidState);
    }

    Ok(claims)
}

fn nonces_match(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}

fn complete_profile(info: ProviderUserInfo) -> Result<ProviderProfile, HandshakeError> {
    fn required(value: Option<String>, field: &'static str) -> Result<String, HandshakeError> {
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or(HandshakeError::IncompleteProfile(field))
    }

    Ok(ProviderProfile {
        sub: required(info.sub, "sub")?,
        email: required(info.email, "email")?,
        name: required(info.name, "name")?,
        picture: info.picture.filter(|p| !p.is_empty()),
    })
}

pub async fn complete_login(
    state: &AppState,
    params: CallbackParams,
    cookie_nonce: Option<&str>,
    now: DateTime<Utc>,
) -> Result<CompletedLogin, HandshakeError> {
    if let Some(error) = params.error {
        return Err(HandshakeError::ProviderDenied(error));
    }

    let signed_state = params.state.ok_or(HandshakeError::MissingState)?;
    let state_claims = verify_state(&signed_state, state.jwt_secret(), now)?;

    match cookie_nonce {
        Some(nonce) if nonces_match(nonce, &state_claims.nonce) => {}
        _ => return Err(HandshakeError::StateMismatch),
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(HandshakeError::MissingCode)?;

    let info = state
        .identity_provider
        .exchange_code(&code, &state.config.google_redirect_uri)
        .await?;
    let profile = complete_profile(info)?;

    let identity = Identity {
        sub: profile.sub.clone(),
        email: profile.email.clone(),
        name: profile.name.clone(),
    };
    let token = token::mint(&identity, state.jwt_secret(), state.config.token_ttl(), now)?;

    UsersService::new(state.db.clone())
        .upsert_from_provider(&profile, &now_rfc3339())
        .await?;

    info!(
        google_id = %profile.sub,
        email = %safe_email_log(&profile.email),
        provider = "google",
        "User authentication successful via Google OAuth"
    );

    Ok(CompletedLogin {
        token,
        return_to: state_claims.return_to,
    })
}

/// Reads the state nonce from the request's `Cookie` headers.
pub fn state_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == STATE_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value pinning `nonce` to this browser for the handshake.
pub fn state_cookie_header(nonce: &str, secure: bool) -> String {
    format!(
        "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite=Lax{}",
        STATE_COOKIE,
        nonce,
        STATE_COOKIE_PATH,
        STATE_TTL_MINUTES * 60,
        if secure { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` value that removes the state cookie.
pub fn clear_state_cookie_header() -> String {
    format!(
        "{}=; Path={}; Max-Age=0; HttpOnly; SameSite=Lax",
        STATE_COOKIE, STATE_COOKIE_PATH
    )
}

/// Appends `key=value` to `url`, url-encoding the value.
pub fn with_query_param(url: &str, key: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, separator, key, urlencoding::encode(value))
}
