// src/status/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn status_routes() -> Router {
    Router::new()
        .route("/api/", get(handlers::root))
        .route(
            "/api/status",
            get(handlers::list_status_checks).post(handlers::create_status_check),
        )
}
