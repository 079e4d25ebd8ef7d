// src/common/config.rs
//! Process configuration read from the environment at startup

use chrono::Duration;
use std::env;
use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "replace_with_strong_secret";

/// Lifetime of a bearer token minted at the end of the Google handshake.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_redirect_uri: String,
    pub frontend_url: String,
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub reset_db: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://course_badges.db".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .or_else(|_| env::var("SECRET_KEY"))
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                warn!("JWT_SECRET not set, falling back to an insecure development secret");
                DEFAULT_JWT_SECRET.to_string()
            });

        let google_client_id = env::var("GOOGLE_CLIENT_ID").ok().filter(|s| !s.is_empty());
        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let google_redirect_uri = env::var("GOOGLE_OAUTH_REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:8080/api/auth/google".to_string());

        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        let reset_db = env::var("RESET_DB")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        Self {
            database_url,
            jwt_secret,
            google_client_id,
            google_client_secret,
            google_redirect_uri,
            frontend_url,
            cors_origins,
            port,
            reset_db,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::hours(TOKEN_TTL_HOURS)
    }

    /// Configuration for tests: in-memory database, fixed secret.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test_secret_key".to_string(),
            google_client_id: Some("test_client_id".to_string()),
            google_client_secret: Some("test_client_secret".to_string()),
            google_redirect_uri: "http://localhost:8080/api/auth/google".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
            port: 0,
            reset_db: false,
        }
    }
}
