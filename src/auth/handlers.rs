//! Authentication handlers

use axum::{
    extract::{Extension, Json, Query},
    http::{
        header::{HeaderMap, LOCATION, SET_COOKIE},
        StatusCode,
    },
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::extractors::AuthedUser;
use super::models::{CallbackParams, LoginParams, MessageResponse, User};
use super::oauth::{self, HandshakeError};
use crate::common::AppState;

/// 302 to `location`, setting or clearing the handshake state cookie.
fn found(location: &str, cookie: String) -> Response {
    (
        StatusCode::FOUND,
        [(LOCATION, location.to_string()), (SET_COOKIE, cookie)],
    )
        .into_response()
}

fn error_redirect(state: &AppState, error: &HandshakeError) -> String {
    oauth::with_query_param(
        &format!("{}/auth/error", state.config.frontend_url),
        "message",
        &error.to_string(),
    )
}

/// GET /api/auth/login/google
/// Redirects the browser to Google's consent page.
///
/// An optional `?redirect=/path` names the frontend path that receives the
/// token once sign-in completes.
pub async fn google_login(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<LoginParams>,
) -> Response {
    match oauth::begin_login(&state, params.redirect.as_deref(), Utc::now()) {
        Ok(redirect) => {
            info!("Starting Google OAuth flow");
            let secure = state.config.google_redirect_uri.starts_with("https://");
            found(
                &redirect.url,
                oauth::state_cookie_header(&redirect.nonce, secure),
            )
        }
        Err(e) => {
            warn!(error = %e, "Failed to start Google OAuth flow");
            found(&error_redirect(&state, &e), oauth::clear_state_cookie_header())
        }
    }
}

/// GET /api/auth/google
/// Google's callback. Always answers with a redirect to the frontend: the
/// token on success, `/auth/error?message=` otherwise.
pub async fn google_callback(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    let cookie_nonce = oauth::state_cookie(&headers);

    match oauth::complete_login(&state, params, cookie_nonce.as_deref(), Utc::now()).await {
        Ok(completed) => {
            let target = oauth::with_query_param(
                &format!("{}{}", state.config.frontend_url, completed.return_to),
                "token",
                &completed.token,
            );
            found(&target, oauth::clear_state_cookie_header())
        }
        Err(e) => {
            warn!(error = %e, "Google OAuth handshake failed");
            found(&error_redirect(&state, &e), oauth::clear_state_cookie_header())
        }
    }
}

/// GET /api/auth/me
/// Returns the current authenticated user's profile
pub async fn me_handler(AuthedUser(user): AuthedUser) -> Json<User> {
    Json(user)
}

/// POST /api/auth/logout
/// Tokens are self-contained, so logout is the client discarding its token.
/// This endpoint only acknowledges the request.
pub async fn logout_handler() -> Json<MessageResponse> {
    info!("User logout acknowledged");
    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}
