// src/courses/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

pub fn courses_routes() -> Router {
    Router::new()
        .route(
            "/api/courses",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route("/api/courses/created", get(handlers::list_created_courses))
        .route(
            "/api/courses/:id",
            get(handlers::get_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        .route("/api/courses/:id/publish", post(handlers::publish_course))
        .route("/api/courses/:id/unpublish", post(handlers::unpublish_course))
}
