// src/status/mod.rs
//! Liveness probe and client check-ins

pub mod handlers;
pub mod models;
pub mod routes;


pub use routes::status_routes;
