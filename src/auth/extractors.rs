//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use std::sync::Arc;

use super::models::User;
use super::resolver::authenticate;
use crate::common::{ApiError, AppState};

/// Authenticated user extractor
///
/// Resolves the `Authorization: Bearer <token>` header to the stored user.
/// Handlers that take an `AuthedUser` argument are rejected with 401 before
/// they run when the header is missing, the token is invalid or expired, or
/// the user no longer exists.
#[derive(Debug)]
pub struct AuthedUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        // Non-UTF8 header values are treated as absent.
        let raw_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let user = authenticate(&app_state.db, app_state.jwt_secret(), raw_header, Utc::now())
            .await?;

        Ok(AuthedUser(user))
    }
}
