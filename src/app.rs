// src/app.rs
//! Router composition and HTTP layers

use axum::{
    extract::Extension,
    http::{header, HeaderName, HeaderValue, Method},
    middleware, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::common::AppState;
use crate::{auth, badges, courses, logging_middleware, profile, status};

/// Builds the full application router around `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        // ====================================================================
        // AUTHENTICATION ROUTES (Google sign-in, current user, logout)
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // PROFILE ROUTES
        // ====================================================================
        .merge(profile::profile_routes())
        // ====================================================================
        // BADGE ROUTES
        // ====================================================================
        .merge(badges::badges_routes())
        // ====================================================================
        // COURSE ROUTES
        // ====================================================================
        .merge(courses::courses_routes())
        // ====================================================================
        // STATUS ROUTES
        // ====================================================================
        .merge(status::status_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
}
