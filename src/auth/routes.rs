//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /api/auth/login/google` - Start Google sign-in
/// - `GET /api/auth/google` - Google OAuth callback
/// - `GET /api/auth/me` - Get current user profile
/// - `POST /api/auth/logout` - Logout (client-side token removal)
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/login/google", get(handlers::google_login))
        .route("/api/auth/google", get(handlers::google_callback))
        .route("/api/auth/me", get(handlers::me_handler))
        .route("/api/auth/logout", post(handlers::logout_handler))
}
