//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Google OAuth sign-in handshake
//! - JWT bearer token minting and verification
//! - Resolving a bearer token to the stored user
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod oauth;
pub mod resolver;
pub mod routes;
pub mod services;
pub mod token;

#[cfg(test)]
mod tests;

pub use extractors::AuthedUser;
pub use models::User;
pub use routes::auth_routes;
pub use services::UsersService;
