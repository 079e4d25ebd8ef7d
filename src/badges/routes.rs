// src/badges/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers;

pub fn badges_routes() -> Router {
    Router::new()
        .route("/api/badges", post(handlers::create_badge))
        .route("/api/badges/me", get(handlers::list_my_badges))
        .route("/api/badges/user/:id", get(handlers::list_user_badges))
        .route("/api/badges/:id", put(handlers::update_badge_course_title))
}
