// src/profile/routes.rs

use axum::{routing::put, Router};

use super::handlers;

pub fn profile_routes() -> Router {
    Router::new().route("/api/auth/profile", put(handlers::update_profile_handler))
}
