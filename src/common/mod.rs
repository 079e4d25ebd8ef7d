// Common module - shared types and utilities across all modules

pub mod config;
pub mod error;
pub mod helpers;
pub mod id_generator;
pub mod json;
pub mod migrations;
pub mod patch;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::ApiError;
pub use helpers::{now_rfc3339, safe_email_log, safe_token_log, title_case};
pub use id_generator::*;
pub use json::{AppJson, AppQuery};
pub use patch::Patch;
pub use state::AppState;
pub use validation::{require_text, ValidationResult, Validator};
